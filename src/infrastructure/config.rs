//! Configuration management

use crate::error::{NotepadError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory holding notebook metadata
pub const NOTEPAD_DIR: &str = ".notepad";

const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Default export directory, relative to the notebook root unless absolute
    #[serde(default = "default_export_dir")]
    pub export_dir: String,
    /// Log filter used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
    pub created: DateTime<Utc>,
}

fn default_export_dir() -> String {
    "exports".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}

impl Config {
    /// Create a new config with default values
    pub fn new() -> Self {
        Config {
            export_dir: default_export_dir(),
            log_level: default_log_level(),
            created: Utc::now(),
        }
    }

    /// Load config from .notepad/config.toml in the given directory
    pub fn load_from_dir(path: &Path) -> Result<Self> {
        let config_path = path.join(NOTEPAD_DIR).join(CONFIG_FILE);

        let contents = fs::read_to_string(&config_path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                NotepadError::NotNotepadDirectory(path.to_path_buf())
            } else {
                NotepadError::Io(e)
            }
        })?;

        toml::from_str(&contents)
            .map_err(|e| NotepadError::Config(format!("Failed to parse config.toml: {}", e)))
    }

    /// Save config to .notepad/config.toml in the given directory
    pub fn save_to_dir(&self, path: &Path) -> Result<()> {
        let notepad_dir = path.join(NOTEPAD_DIR);
        let config_path = notepad_dir.join(CONFIG_FILE);

        if !notepad_dir.exists() {
            fs::create_dir(&notepad_dir)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| NotepadError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(&config_path, contents)?;

        Ok(())
    }

    /// Resolve the export directory against the notebook root
    pub fn export_dir_in(&self, root: &Path) -> PathBuf {
        let dir = PathBuf::from(&self.export_dir);
        if dir.is_absolute() {
            dir
        } else {
            root.join(dir)
        }
    }
}
