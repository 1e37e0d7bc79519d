//! Config management use case

use crate::error::{NotepadError, Result};
use crate::infrastructure::{Config, FileSystemRepository, NotebookRepository};
use tracing_subscriber::EnvFilter;

/// Service for managing notebook configuration
pub struct ConfigService {
    repository: FileSystemRepository,
}

impl ConfigService {
    pub fn new(repository: FileSystemRepository) -> Self {
        ConfigService { repository }
    }

    /// Get a single config value
    pub fn get(&self, key: &str) -> Result<String> {
        let config = self.repository.load_config()?;

        match key {
            "export_dir" => Ok(config.export_dir),
            "log_level" => Ok(config.log_level),
            "created" => Ok(config.created.to_rfc3339()),
            _ => Err(NotepadError::Config(format!(
                "Unknown config key: '{}'. Valid keys are: export_dir, log_level, created",
                key
            ))),
        }
    }

    /// Set a config value
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut config = self.repository.load_config()?;

        match key {
            "export_dir" => {
                let value = value.trim();
                if value.is_empty() {
                    return Err(NotepadError::Config(
                        "export_dir cannot be empty".to_string(),
                    ));
                }
                config.export_dir = value.to_string();
            }
            "log_level" => {
                EnvFilter::try_new(value).map_err(|e| {
                    NotepadError::Config(format!("Invalid log_level '{}': {}", value, e))
                })?;
                config.log_level = value.to_string();
            }
            "created" => {
                return Err(NotepadError::Config(
                    "Cannot modify 'created' field (read-only)".to_string(),
                ));
            }
            _ => {
                return Err(NotepadError::Config(format!(
                    "Unknown config key: '{}'. Valid keys are: export_dir, log_level",
                    key
                )));
            }
        }

        self.repository.save_config(&config)
    }

    /// List all config values
    pub fn list(&self) -> Result<Config> {
        self.repository.load_config()
    }
}
