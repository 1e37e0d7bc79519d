//! Record store abstractions

use crate::domain::{Category, Note};
use crate::error::Result;

/// Filter for listing notes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteQuery {
    /// Case-insensitive substring matched against title or content
    pub search: Option<String>,
    /// Only notes in this category (0 selects uncategorized notes)
    pub category_id: Option<i64>,
}

impl NoteQuery {
    pub fn all() -> Self {
        NoteQuery::default()
    }

    pub fn search(text: impl Into<String>) -> Self {
        NoteQuery {
            search: Some(text.into()),
            category_id: None,
        }
    }

    pub fn in_category(category_id: i64) -> Self {
        NoteQuery {
            search: None,
            category_id: Some(category_id),
        }
    }
}

/// Abstract store for note records.
///
/// Every listing uses the store's default order: most recently modified first.
pub trait NoteStore {
    /// All notes in default order
    fn get_all(&self) -> Result<Vec<Note>>;

    /// Notes matching `query`, in default order
    fn list(&self, query: &NoteQuery) -> Result<Vec<Note>>;

    fn get_by_id(&self, id: i64) -> Result<Option<Note>>;

    /// Insert a note and return its identifier.
    ///
    /// A positive `note.id` is kept as the identifier; otherwise the store assigns one.
    fn insert(&self, note: &Note) -> Result<i64>;

    /// Persist title, content, modify time and category. Returns rows affected.
    fn update(&self, note: &Note) -> Result<usize>;

    /// Returns rows affected
    fn delete(&self, id: i64) -> Result<usize>;

    /// Run `work` against a transactional view of the store.
    ///
    /// Changes are committed when `work` returns `Ok` and rolled back otherwise.
    fn transaction(&self, work: &mut dyn FnMut(&dyn NoteStore) -> Result<()>) -> Result<()>;
}

/// Abstract store for categories
pub trait CategoryStore {
    /// All categories ordered by name
    fn get_all_categories(&self) -> Result<Vec<Category>>;

    fn get_category(&self, id: i64) -> Result<Option<Category>>;

    fn find_category_by_name(&self, name: &str) -> Result<Option<Category>>;

    fn insert_category(&self, category: &Category) -> Result<i64>;

    fn update_category(&self, category: &Category) -> Result<usize>;

    fn delete_category(&self, id: i64) -> Result<usize>;

    /// Number of notes referencing `category_id`
    fn count_notes(&self, category_id: i64) -> Result<i64>;
}
