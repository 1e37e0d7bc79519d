//! Category management use cases

use crate::domain::{now_millis, Category};
use crate::error::{NotepadError, Result};
use crate::infrastructure::CategoryStore;
use std::sync::Arc;
use tracing::info;

/// A category with the number of notes filed under it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryUsage {
    pub category: Category,
    pub note_count: i64,
}

/// Service for managing categories
pub struct CategoryService<S> {
    store: Arc<S>,
}

impl<S: CategoryStore> CategoryService<S> {
    pub fn new(store: Arc<S>) -> Self {
        CategoryService { store }
    }

    pub fn add(&self, name: &str) -> Result<Category> {
        let mut category = Category::new(name, now_millis())?;
        self.check_name_free(&category.name, None)?;

        category.id = self.store.insert_category(&category)?;
        info!(id = category.id, name = %category.name, "created category");
        Ok(category)
    }

    pub fn rename(&self, id: i64, name: &str) -> Result<Category> {
        let mut category = self
            .store
            .get_category(id)?
            .ok_or(NotepadError::CategoryNotFound(id))?;

        category.rename(name, now_millis())?;
        self.check_name_free(&category.name, Some(id))?;

        self.store.update_category(&category)?;
        info!(id, name = %category.name, "renamed category");
        Ok(category)
    }

    /// Delete a category; refused while any note still references it
    pub fn delete(&self, id: i64) -> Result<()> {
        if self.store.get_category(id)?.is_none() {
            return Err(NotepadError::CategoryNotFound(id));
        }

        let notes = self.store.count_notes(id)?;
        if notes > 0 {
            return Err(NotepadError::CategoryInUse { id, notes });
        }

        self.store.delete_category(id)?;
        info!(id, "deleted category");
        Ok(())
    }

    pub fn list(&self) -> Result<Vec<CategoryUsage>> {
        self.store
            .get_all_categories()?
            .into_iter()
            .map(|category| {
                let note_count = self.store.count_notes(category.id)?;
                Ok(CategoryUsage {
                    category,
                    note_count,
                })
            })
            .collect()
    }

    fn check_name_free(&self, name: &str, own_id: Option<i64>) -> Result<()> {
        match self.store.find_category_by_name(name)? {
            Some(existing) if Some(existing.id) != own_id => Err(NotepadError::InvalidInput(
                format!("Category '{}' already exists", name),
            )),
            _ => Ok(()),
        }
    }
}
