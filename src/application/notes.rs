//! Note management use cases

use crate::domain::{now_millis, Note, UNCATEGORIZED};
use crate::error::{NotepadError, Result};
use crate::infrastructure::{CategoryStore, NoteQuery, NoteStore};
use std::sync::Arc;
use tracing::info;

/// Fields to change on an existing note; `None` leaves a field as is
#[derive(Debug, Clone, Default)]
pub struct NoteChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category_id: Option<i64>,
}

impl NoteChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.category_id.is_none()
    }
}

/// Service for creating, editing and browsing notes
pub struct NoteService<S> {
    store: Arc<S>,
}

impl<S: NoteStore + CategoryStore> NoteService<S> {
    pub fn new(store: Arc<S>) -> Self {
        NoteService { store }
    }

    /// Create a note and return it with its assigned id
    pub fn add(&self, title: &str, content: &str, category_id: i64) -> Result<Note> {
        self.check_category(category_id)?;

        let mut note = Note::new(title.trim(), content, now_millis());
        note.category_id = category_id;
        note.id = self.store.insert(&note)?;

        info!(id = note.id, "created note");
        Ok(note)
    }

    /// Apply `changes` to note `id`
    pub fn edit(&self, id: i64, changes: NoteChanges) -> Result<Note> {
        if changes.is_empty() {
            return Err(NotepadError::InvalidInput(
                "Nothing to change: pass --title, --content or --category".to_string(),
            ));
        }

        let mut note = self.show(id)?;
        if let Some(title) = changes.title {
            note.title = title.trim().to_string();
        }
        if let Some(content) = changes.content {
            note.content = content;
        }
        if let Some(category_id) = changes.category_id {
            self.check_category(category_id)?;
            note.category_id = category_id;
        }
        note.touch(now_millis());

        if self.store.update(&note)? == 0 {
            return Err(NotepadError::NoteNotFound(id));
        }
        info!(id, "updated note");
        Ok(note)
    }

    pub fn show(&self, id: i64) -> Result<Note> {
        self.store
            .get_by_id(id)?
            .ok_or(NotepadError::NoteNotFound(id))
    }

    pub fn delete(&self, id: i64) -> Result<()> {
        if self.store.delete(id)? == 0 {
            return Err(NotepadError::NoteNotFound(id));
        }
        info!(id, "deleted note");
        Ok(())
    }

    pub fn list(&self, query: &NoteQuery) -> Result<Vec<Note>> {
        if let Some(category_id) = query.category_id {
            self.check_category(category_id)?;
        }
        self.store.list(query)
    }

    fn check_category(&self, category_id: i64) -> Result<()> {
        if category_id == UNCATEGORIZED {
            return Ok(());
        }
        match self.store.get_category(category_id)? {
            Some(_) => Ok(()),
            None => Err(NotepadError::CategoryNotFound(category_id)),
        }
    }
}
