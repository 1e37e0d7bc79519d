//! Category record

use crate::error::{NotepadError, Result};

/// A named group of notes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub created_time: i64,
    pub modified_time: i64,
}

impl Category {
    pub fn new(name: &str, now: i64) -> Result<Self> {
        Ok(Category {
            id: 0,
            name: Self::normalize_name(name)?,
            created_time: now,
            modified_time: now,
        })
    }

    /// Trim a category name and reject empty ones
    pub fn normalize_name(name: &str) -> Result<String> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(NotepadError::InvalidInput(
                "Category name cannot be empty".to_string(),
            ));
        }
        Ok(trimmed.to_string())
    }

    pub fn rename(&mut self, name: &str, now: i64) -> Result<()> {
        self.name = Self::normalize_name(name)?;
        self.modified_time = now.max(self.created_time);
        Ok(())
    }
}
