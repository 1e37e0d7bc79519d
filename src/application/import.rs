//! Import notes use case

use crate::application::task::{spawn_operation, CancelToken, OperationHandle};
use crate::domain::{document, now_millis, Note, UNCATEGORIZED};
use crate::error::{NotepadError, Result};
use crate::infrastructure::{files, NoteStore};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

pub const PROGRESS_READ: u8 = 30;
pub const PROGRESS_PARSED: u8 = 60;

/// Records between progress updates while merging
const PROGRESS_STRIDE: usize = 5;

/// Result of a completed import
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub processed: usize,
    pub inserted: usize,
    pub updated: usize,
    /// Export timestamp recorded in the source document
    pub source_export_time: i64,
}

/// Merges an exported document into the note store
pub struct ImportManager<S> {
    store: Arc<S>,
    clock: fn() -> i64,
}

impl<S: NoteStore> ImportManager<S> {
    pub fn new(store: Arc<S>) -> Self {
        ImportManager {
            store,
            clock: now_millis,
        }
    }

    /// Replace the wall clock used for imported timestamps
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    /// Import the document at `path`.
    ///
    /// Notes whose id already exists get the imported title and content and a
    /// fresh modify time. Other notes are inserted under their document id
    /// with both timestamps set to now. Timestamps from the document are never
    /// trusted. The merge runs in one transaction: any failure leaves the
    /// store untouched.
    pub fn import_from(&self, path: &Path, progress: &mut dyn FnMut(u8)) -> Result<ImportSummary> {
        info!(path = %path.display(), "starting import");

        let text = files::read_text(path)?;
        progress(PROGRESS_READ);

        let document = document::deserialize(&text)?;
        debug!(
            version = %document.version,
            export_time = document.export_time,
            count = document.notes.len(),
            "parsed document"
        );
        progress(PROGRESS_PARSED);

        let total = document.notes.len();
        let mut summary = ImportSummary {
            source_export_time: document.export_time,
            ..ImportSummary::default()
        };

        self.store.transaction(&mut |store: &dyn NoteStore| {
            for (index, imported) in document.notes.iter().enumerate() {
                if self.merge_note(store, imported)? {
                    summary.updated += 1;
                } else {
                    summary.inserted += 1;
                }

                if index % PROGRESS_STRIDE == 0 {
                    progress(merge_progress(index, total));
                }
            }
            Ok(())
        })?;

        summary.processed = summary.inserted + summary.updated;
        progress(100);
        info!(
            processed = summary.processed,
            inserted = summary.inserted,
            updated = summary.updated,
            "import complete"
        );

        Ok(summary)
    }

    /// Upsert one imported note. Returns true when an existing note was updated.
    fn merge_note(&self, store: &dyn NoteStore, imported: &Note) -> Result<bool> {
        let now = (self.clock)();

        match store.get_by_id(imported.id)? {
            Some(mut existing) => {
                existing.title = imported.title.clone();
                existing.content = imported.content.clone();
                existing.touch(now);
                if store.update(&existing)? == 0 {
                    return Err(NotepadError::DataAccess(format!(
                        "Note {} disappeared during import",
                        existing.id
                    )));
                }
                debug!(id = existing.id, "updated existing note");
                Ok(true)
            }
            None => {
                let fresh = Note {
                    id: imported.id,
                    title: imported.title.clone(),
                    content: imported.content.clone(),
                    create_time: now,
                    modify_time: now,
                    category_id: UNCATEGORIZED,
                };
                let id = store.insert(&fresh)?;
                debug!(id, "inserted imported note");
                Ok(false)
            }
        }
    }
}

impl<S: NoteStore + Send + Sync + 'static> ImportManager<S> {
    /// Run [`ImportManager::import_from`] on a background thread
    pub fn spawn_import(
        self: &Arc<Self>,
        path: PathBuf,
        cancel: CancelToken,
    ) -> OperationHandle<ImportSummary> {
        spawn_operation(self, "import", cancel, move |manager, progress| {
            manager.import_from(&path, progress)
        })
    }
}

fn merge_progress(index: usize, total: usize) -> u8 {
    let span = (100 - PROGRESS_PARSED) as usize;
    (PROGRESS_PARSED as usize + index * span / total.max(1)) as u8
}
