//! CLI layer - Command-line interface

pub mod commands;
pub mod output;

pub use commands::{CategoryCommand, Cli, Commands};
pub use output::{format_category_list, format_note_detail, format_note_list};
