//! Notebook root directory

use crate::error::{NotepadError, Result};
use crate::infrastructure::config::NOTEPAD_DIR;
use crate::infrastructure::{Config, SqliteStore};
use std::fs;
use std::path::{Path, PathBuf};

const DATABASE_FILE: &str = "notes.db";

/// Abstract repository for notebook metadata
pub trait NotebookRepository {
    /// Get the root directory of this notebook
    fn root(&self) -> &Path;

    /// Load configuration from .notepad/config.toml
    fn load_config(&self) -> Result<Config>;

    /// Save configuration to .notepad/config.toml
    fn save_config(&self, config: &Config) -> Result<()>;

    /// Check if .notepad directory exists
    fn is_initialized(&self) -> bool;

    /// Create .notepad directory structure
    fn initialize(&self) -> Result<()>;
}

/// File system implementation of NotebookRepository
#[derive(Debug, Clone)]
pub struct FileSystemRepository {
    pub root: PathBuf,
}

impl FileSystemRepository {
    /// Create a new repository with the given root directory
    pub fn new(root: PathBuf) -> Self {
        FileSystemRepository { root }
    }

    /// Discover notebook root by walking up from current directory
    /// First checks NOTEPAD_ROOT environment variable, then falls back to discovery
    pub fn discover() -> Result<Self> {
        if let Ok(root_path) = std::env::var("NOTEPAD_ROOT") {
            let path = PathBuf::from(root_path);
            if Self::has_notepad_dir(&path) {
                return Ok(FileSystemRepository::new(path));
            } else {
                return Err(NotepadError::Config(format!(
                    "NOTEPAD_ROOT is set to '{}' but no .notepad directory found. \
                    Run 'notepad init' in that directory or unset NOTEPAD_ROOT.",
                    path.display()
                )));
            }
        }

        let current_dir = std::env::current_dir()?;
        Self::discover_from(&current_dir)
    }

    /// Discover notebook root by walking up from a specific starting directory
    pub fn discover_from(start: &Path) -> Result<Self> {
        let mut current = start.to_path_buf();

        loop {
            if Self::has_notepad_dir(&current) {
                return Ok(FileSystemRepository::new(current));
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => {
                    return Err(NotepadError::NotNotepadDirectory(start.to_path_buf()));
                }
            }
        }
    }

    fn has_notepad_dir(path: &Path) -> bool {
        path.join(NOTEPAD_DIR).is_dir()
    }

    /// Path of the note database inside .notepad
    pub fn database_path(&self) -> PathBuf {
        self.root.join(NOTEPAD_DIR).join(DATABASE_FILE)
    }

    /// Open the notebook's note store
    pub fn open_store(&self) -> Result<SqliteStore> {
        if !self.is_initialized() {
            return Err(NotepadError::NotNotepadDirectory(self.root.clone()));
        }
        SqliteStore::open(&self.database_path())
    }
}

impl NotebookRepository for FileSystemRepository {
    fn root(&self) -> &Path {
        &self.root
    }

    fn load_config(&self) -> Result<Config> {
        Config::load_from_dir(&self.root)
    }

    fn save_config(&self, config: &Config) -> Result<()> {
        config.save_to_dir(&self.root)
    }

    fn is_initialized(&self) -> bool {
        Self::has_notepad_dir(&self.root)
    }

    fn initialize(&self) -> Result<()> {
        let notepad_dir = self.root.join(NOTEPAD_DIR);

        if notepad_dir.exists() {
            return Err(NotepadError::Config(format!(
                "Directory already initialized: {}",
                self.root.display()
            )));
        }

        fs::create_dir(&notepad_dir)?;
        Ok(())
    }
}
