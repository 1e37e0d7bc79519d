//! notepad - Terminal notepad with JSON backup and restore
//!
//! Notes and categories live in a SQLite database under `.notepad/`. The whole
//! collection can be exported to a versioned JSON document and merged back in
//! by id, with both operations running on a background thread.

pub mod application;
pub mod cli;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use error::NotepadError;
