//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "notepad")]
#[command(about = "Terminal notepad with JSON backup and restore", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new notebook
    Init {
        /// Directory to initialize (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// View or modify configuration
    Config {
        /// Config key to get or set
        key: Option<String>,

        /// Value to set (if provided, sets the key)
        value: Option<String>,

        /// List all configuration
        #[arg(short, long)]
        list: bool,
    },

    /// Create a note
    Add {
        title: String,

        #[arg(short, long, default_value = "")]
        content: String,

        /// Category id (0 = uncategorized)
        #[arg(long, default_value_t = 0)]
        category: i64,
    },

    /// Change an existing note
    Edit {
        id: i64,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        content: Option<String>,

        #[arg(long)]
        category: Option<i64>,
    },

    /// Print a note
    Show { id: i64 },

    /// Delete a note
    Delete { id: i64 },

    /// List notes, most recently modified first
    List {
        /// Only notes whose title or content contains TEXT
        #[arg(short, long, value_name = "TEXT")]
        search: Option<String>,

        /// Only notes in this category
        #[arg(long, value_name = "ID")]
        category: Option<i64>,
    },

    /// Manage categories
    #[command(subcommand)]
    Category(CategoryCommand),

    /// Export all notes to a JSON file
    Export {
        /// File name (".json" is appended if missing)
        #[arg(short, long, value_name = "NAME")]
        file: Option<String>,

        /// Destination directory (default: configured export_dir)
        #[arg(short, long, value_name = "DIR")]
        dir: Option<PathBuf>,
    },

    /// Import notes from a JSON export
    Import { file: PathBuf },
}

#[derive(Subcommand, Debug)]
pub enum CategoryCommand {
    /// Create a category
    Add { name: String },

    /// Rename a category
    Rename { id: i64, name: String },

    /// Delete an unused category
    Delete { id: i64 },

    /// List categories with note counts
    List,
}
