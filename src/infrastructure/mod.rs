//! Infrastructure layer - External I/O and persistence

pub mod config;
pub mod files;
pub mod logging;
pub mod repository;
pub mod sqlite;
pub mod store;

pub use config::Config;
pub use repository::{FileSystemRepository, NotebookRepository};
pub use sqlite::SqliteStore;
pub use store::{CategoryStore, NoteQuery, NoteStore};
