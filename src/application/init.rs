//! Initialize notebook use case

use crate::error::Result;
use crate::infrastructure::{Config, FileSystemRepository, NotebookRepository};
use std::fs;
use std::path::Path;
use tracing::info;

/// Initialize a new notebook at the specified path.
///
/// Creates `.notepad/` with a default config and an empty note database.
pub fn init(path: &Path) -> Result<FileSystemRepository> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }

    let repo = FileSystemRepository::new(path.to_path_buf());
    repo.initialize()?;
    repo.save_config(&Config::new())?;

    // Opening the store creates the schema
    repo.open_store()?;

    info!(root = %path.display(), "initialized notebook");
    Ok(repo)
}
