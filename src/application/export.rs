//! Export notes use case

use crate::application::task::{spawn_operation, CancelToken, OperationHandle};
use crate::domain::{document, now_millis};
use crate::error::{NotepadError, Result};
use crate::infrastructure::{files, NoteStore};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Progress reported once the document has been serialized
pub const PROGRESS_SERIALIZED: u8 = 50;

/// Result of a completed export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub note_count: usize,
    pub bytes_written: u64,
    pub export_time: i64,
}

/// Default export file name: notes_backup_<millis>.json
pub fn default_file_name(now: i64) -> String {
    format!("notes_backup_{}.json", now)
}

/// Append `.json` unless the name already ends with it (any case)
pub fn ensure_json_extension(name: &str) -> String {
    if name.to_lowercase().ends_with(".json") {
        name.to_string()
    } else {
        format!("{}.json", name)
    }
}

/// Build the destination path from a directory and an optional user-supplied name
pub fn resolve_destination(dir: &Path, file_name: Option<&str>, now: i64) -> Result<PathBuf> {
    let name = match file_name.map(str::trim) {
        Some("") => {
            return Err(NotepadError::InvalidInput(
                "Export file name cannot be empty".to_string(),
            ))
        }
        Some(name) => ensure_json_extension(name),
        None => default_file_name(now),
    };
    Ok(dir.join(name))
}

/// Writes the complete note collection to a JSON file
pub struct ExportManager<S> {
    store: Arc<S>,
    clock: fn() -> i64,
}

impl<S: NoteStore> ExportManager<S> {
    pub fn new(store: Arc<S>) -> Self {
        ExportManager {
            store,
            clock: now_millis,
        }
    }

    /// Replace the wall clock used to stamp the export
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    /// Export every note to `path`.
    ///
    /// # Errors
    ///
    /// Returns the first failure:
    /// - `DataAccess` if the store cannot be read
    /// - `Serialization` if the document cannot be built
    /// - `Storage` if the destination directory cannot be created or written
    /// - `Io` if writing fails or the written file does not verify
    pub fn export_to(&self, path: &Path, progress: &mut dyn FnMut(u8)) -> Result<ExportSummary> {
        info!(path = %path.display(), "starting export");

        // 1. Read all notes in store order
        let notes = self.store.get_all()?;
        if notes.is_empty() {
            warn!("no notes to export, writing an empty document");
        }
        debug!(count = notes.len(), "loaded notes");

        // 2. Serialize
        let export_time = (self.clock)();
        let text = document::serialize(&notes, export_time)?;
        debug!(bytes = text.len(), "serialized notes");
        progress(PROGRESS_SERIALIZED);

        // 3-5. Ensure the directory, write, then verify size on disk
        let bytes_written = files::write_text(path, &text)?;

        progress(100);
        info!(path = %path.display(), count = notes.len(), bytes_written, "export complete");

        Ok(ExportSummary {
            path: path.to_path_buf(),
            note_count: notes.len(),
            bytes_written,
            export_time,
        })
    }
}

impl<S: NoteStore + Send + Sync + 'static> ExportManager<S> {
    /// Run [`ExportManager::export_to`] on a background thread
    pub fn spawn_export(
        self: &Arc<Self>,
        path: PathBuf,
        cancel: CancelToken,
    ) -> OperationHandle<ExportSummary> {
        spawn_operation(self, "export", cancel, move |manager, progress| {
            manager.export_to(&path, progress)
        })
    }
}
