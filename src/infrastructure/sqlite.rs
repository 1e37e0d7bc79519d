//! SQLite-backed note and category store

use crate::domain::{Category, Note};
use crate::error::Result;
use crate::infrastructure::store::{CategoryStore, NoteQuery, NoteStore};
use rusqlite::types::Value;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::fs;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

const SCHEMA_VERSION: &str = "1";

const NOTE_COLUMNS: &str = "id, title, content, created, modified, category_id";

const DEFAULT_NOTE_ORDER: &str = "modified DESC, id DESC";

fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
CREATE TABLE IF NOT EXISTS meta (
  key TEXT PRIMARY KEY,
  value TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS notes (
  id INTEGER PRIMARY KEY,
  title TEXT NOT NULL DEFAULT '',
  content TEXT NOT NULL DEFAULT '',
  created INTEGER NOT NULL,
  modified INTEGER NOT NULL,
  category_id INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS notes_modified_idx ON notes(modified DESC);
CREATE INDEX IF NOT EXISTS notes_category_idx ON notes(category_id);

CREATE TABLE IF NOT EXISTS categories (
  id INTEGER PRIMARY KEY,
  name TEXT NOT NULL UNIQUE,
  created INTEGER NOT NULL,
  modified INTEGER NOT NULL
);
"#,
    )?;

    conn.execute(
        "INSERT OR REPLACE INTO meta(key, value) VALUES('schema_version', ?1)",
        [SCHEMA_VERSION],
    )?;

    Ok(())
}

fn note_from_row(row: &Row<'_>) -> rusqlite::Result<Note> {
    Ok(Note {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        create_time: row.get(3)?,
        modify_time: row.get(4)?,
        category_id: row.get(5)?,
    })
}

fn category_from_row(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        created_time: row.get(2)?,
        modified_time: row.get(3)?,
    })
}

// Statement helpers shared by the store and its transactional view.

fn list_notes(conn: &Connection, query: &NoteQuery) -> Result<Vec<Note>> {
    let mut clauses = Vec::new();
    let mut args: Vec<Value> = Vec::new();

    if let Some(text) = query.search.as_deref().filter(|t| !t.is_empty()) {
        clauses.push(r"(title LIKE ? ESCAPE '\' OR content LIKE ? ESCAPE '\')");
        let pattern = format!("%{}%", escape_like(text));
        args.push(Value::Text(pattern.clone()));
        args.push(Value::Text(pattern));
    }
    if let Some(category_id) = query.category_id {
        clauses.push("category_id = ?");
        args.push(Value::Integer(category_id));
    }

    let mut sql = format!("SELECT {} FROM notes", NOTE_COLUMNS);
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(" ORDER BY ");
    sql.push_str(DEFAULT_NOTE_ORDER);

    let mut stmt = conn.prepare(&sql)?;
    let notes = stmt
        .query_map(rusqlite::params_from_iter(args.iter()), note_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(notes)
}

/// Make `%`, `_` and `\` match literally inside a LIKE pattern
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn get_note(conn: &Connection, id: i64) -> Result<Option<Note>> {
    let sql = format!("SELECT {} FROM notes WHERE id = ?1", NOTE_COLUMNS);
    let note = conn.query_row(&sql, [id], note_from_row).optional()?;
    Ok(note)
}

fn insert_note(conn: &Connection, note: &Note) -> Result<i64> {
    let explicit_id = (note.id > 0).then_some(note.id);
    conn.execute(
        "INSERT INTO notes(id, title, content, created, modified, category_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            explicit_id,
            note.title,
            note.content,
            note.create_time,
            note.modify_time,
            note.category_id
        ],
    )?;
    let id = conn.last_insert_rowid();
    debug!(id, "inserted note");
    Ok(id)
}

fn update_note(conn: &Connection, note: &Note) -> Result<usize> {
    let rows = conn.execute(
        "UPDATE notes SET title = ?1, content = ?2, modified = ?3, category_id = ?4 WHERE id = ?5",
        params![
            note.title,
            note.content,
            note.modify_time,
            note.category_id,
            note.id
        ],
    )?;
    debug!(id = note.id, rows, "updated note");
    Ok(rows)
}

fn delete_note(conn: &Connection, id: i64) -> Result<usize> {
    let rows = conn.execute("DELETE FROM notes WHERE id = ?1", [id])?;
    debug!(id, rows, "deleted note");
    Ok(rows)
}

/// Note and category store over a single SQLite connection
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database file at `path`
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        ensure_schema(&conn)?;
        debug!(path = %path.display(), "opened note database");
        Ok(SqliteStore {
            conn: Mutex::new(conn),
        })
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        ensure_schema(&conn)?;
        Ok(SqliteStore {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|p| p.into_inner())
    }
}

impl NoteStore for SqliteStore {
    fn get_all(&self) -> Result<Vec<Note>> {
        list_notes(&self.lock(), &NoteQuery::all())
    }

    fn list(&self, query: &NoteQuery) -> Result<Vec<Note>> {
        list_notes(&self.lock(), query)
    }

    fn get_by_id(&self, id: i64) -> Result<Option<Note>> {
        get_note(&self.lock(), id)
    }

    fn insert(&self, note: &Note) -> Result<i64> {
        insert_note(&self.lock(), note)
    }

    fn update(&self, note: &Note) -> Result<usize> {
        update_note(&self.lock(), note)
    }

    fn delete(&self, id: i64) -> Result<usize> {
        delete_note(&self.lock(), id)
    }

    fn transaction(&self, work: &mut dyn FnMut(&dyn NoteStore) -> Result<()>) -> Result<()> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;
        // Dropping `tx` without commit rolls back.
        work(&TransactionView { conn: &*tx })?;
        tx.commit()?;
        Ok(())
    }
}

impl CategoryStore for SqliteStore {
    fn get_all_categories(&self) -> Result<Vec<Category>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT id, name, created, modified FROM categories ORDER BY name COLLATE NOCASE, id",
        )?;
        let categories = stmt
            .query_map([], category_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(categories)
    }

    fn get_category(&self, id: i64) -> Result<Option<Category>> {
        let category = self
            .lock()
            .query_row(
                "SELECT id, name, created, modified FROM categories WHERE id = ?1",
                [id],
                category_from_row,
            )
            .optional()?;
        Ok(category)
    }

    fn find_category_by_name(&self, name: &str) -> Result<Option<Category>> {
        let category = self
            .lock()
            .query_row(
                "SELECT id, name, created, modified FROM categories WHERE name = ?1",
                [name],
                category_from_row,
            )
            .optional()?;
        Ok(category)
    }

    fn insert_category(&self, category: &Category) -> Result<i64> {
        let conn = self.lock();
        conn.execute(
            "INSERT INTO categories(name, created, modified) VALUES (?1, ?2, ?3)",
            params![category.name, category.created_time, category.modified_time],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn update_category(&self, category: &Category) -> Result<usize> {
        let rows = self.lock().execute(
            "UPDATE categories SET name = ?1, modified = ?2 WHERE id = ?3",
            params![category.name, category.modified_time, category.id],
        )?;
        Ok(rows)
    }

    fn delete_category(&self, id: i64) -> Result<usize> {
        let rows = self
            .lock()
            .execute("DELETE FROM categories WHERE id = ?1", [id])?;
        Ok(rows)
    }

    fn count_notes(&self, category_id: i64) -> Result<i64> {
        let count = self.lock().query_row(
            "SELECT COUNT(*) FROM notes WHERE category_id = ?1",
            [category_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

/// Note operations bound to an open transaction
struct TransactionView<'a> {
    conn: &'a Connection,
}

impl NoteStore for TransactionView<'_> {
    fn get_all(&self) -> Result<Vec<Note>> {
        list_notes(self.conn, &NoteQuery::all())
    }

    fn list(&self, query: &NoteQuery) -> Result<Vec<Note>> {
        list_notes(self.conn, query)
    }

    fn get_by_id(&self, id: i64) -> Result<Option<Note>> {
        get_note(self.conn, id)
    }

    fn insert(&self, note: &Note) -> Result<i64> {
        insert_note(self.conn, note)
    }

    fn update(&self, note: &Note) -> Result<usize> {
        update_note(self.conn, note)
    }

    fn delete(&self, id: i64) -> Result<usize> {
        delete_note(self.conn, id)
    }

    // Already inside a transaction: run inline.
    fn transaction(&self, work: &mut dyn FnMut(&dyn NoteStore) -> Result<()>) -> Result<()> {
        work(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NotepadError;
    use tempfile::TempDir;

    fn note(title: &str, content: &str, modified: i64) -> Note {
        Note {
            id: 0,
            title: title.to_string(),
            content: content.to_string(),
            create_time: 1,
            modify_time: modified,
            category_id: 0,
        }
    }

    #[test]
    fn test_insert_assigns_id() {
        let store = SqliteStore::open_in_memory().unwrap();
        let first = store.insert(&note("a", "", 1)).unwrap();
        let second = store.insert(&note("b", "", 1)).unwrap();
        assert!(first > 0);
        assert_ne!(first, second);
    }

    #[test]
    fn test_insert_keeps_explicit_id() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut explicit = note("seven", "", 1);
        explicit.id = 7;

        assert_eq!(store.insert(&explicit).unwrap(), 7);
        assert_eq!(store.get_by_id(7).unwrap().unwrap().title, "seven");
    }

    #[test]
    fn test_insert_duplicate_id_fails() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut explicit = note("seven", "", 1);
        explicit.id = 7;
        store.insert(&explicit).unwrap();

        assert!(matches!(
            store.insert(&explicit),
            Err(NotepadError::DataAccess(_))
        ));
    }

    #[test]
    fn test_get_missing_returns_none() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(store.get_by_id(42).unwrap().is_none());
    }

    #[test]
    fn test_update_and_delete_report_rows() {
        let store = SqliteStore::open_in_memory().unwrap();
        let id = store.insert(&note("old", "body", 1)).unwrap();

        let mut stored = store.get_by_id(id).unwrap().unwrap();
        stored.title = "new".to_string();
        stored.modify_time = 10;
        assert_eq!(store.update(&stored).unwrap(), 1);

        let reloaded = store.get_by_id(id).unwrap().unwrap();
        assert_eq!(reloaded.title, "new");
        assert_eq!(reloaded.modify_time, 10);
        assert_eq!(reloaded.create_time, 1);

        assert_eq!(store.delete(id).unwrap(), 1);
        assert_eq!(store.delete(id).unwrap(), 0);
    }

    #[test]
    fn test_default_order_is_most_recent_first() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.insert(&note("old", "", 100)).unwrap();
        store.insert(&note("newest", "", 300)).unwrap();
        store.insert(&note("middle", "", 200)).unwrap();

        let titles: Vec<String> = store
            .get_all()
            .unwrap()
            .into_iter()
            .map(|n| n.title)
            .collect();
        assert_eq!(titles, vec!["newest", "middle", "old"]);
    }

    #[test]
    fn test_list_search_matches_title_or_content() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.insert(&note("Groceries", "milk", 1)).unwrap();
        store.insert(&note("Ideas", "buy MILK later", 2)).unwrap();
        store.insert(&note("Other", "nothing", 3)).unwrap();

        let found = store.list(&NoteQuery::search("milk")).unwrap();
        assert_eq!(found.len(), 2);

        let found = store.list(&NoteQuery::search("idea")).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Ideas");
    }

    #[test]
    fn test_search_wildcards_match_literally() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.insert(&note("50% off", "", 1)).unwrap();
        store.insert(&note("snake_case", "", 2)).unwrap();
        store.insert(&note("C:\\notes", "", 3)).unwrap();
        store.insert(&note("plain", "nothing special", 4)).unwrap();

        let titles = |text: &str| -> Vec<String> {
            store
                .list(&NoteQuery::search(text))
                .unwrap()
                .into_iter()
                .map(|n| n.title)
                .collect()
        };

        assert_eq!(titles("%"), vec!["50% off"]);
        assert_eq!(titles("_"), vec!["snake_case"]);
        assert_eq!(titles("\\"), vec!["C:\\notes"]);
        assert!(titles("a_e").is_empty());
    }

    #[test]
    fn test_list_by_category() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut work = note("work", "", 1);
        work.category_id = 3;
        store.insert(&work).unwrap();
        store.insert(&note("loose", "", 2)).unwrap();

        let found = store.list(&NoteQuery::in_category(3)).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "work");

        let uncategorized = store.list(&NoteQuery::in_category(0)).unwrap();
        assert_eq!(uncategorized.len(), 1);
        assert_eq!(uncategorized[0].title, "loose");
    }

    #[test]
    fn test_transaction_commits_on_ok() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .transaction(&mut |tx: &dyn NoteStore| {
                tx.insert(&note("a", "", 1))?;
                tx.insert(&note("b", "", 2))?;
                Ok(())
            })
            .unwrap();
        assert_eq!(store.get_all().unwrap().len(), 2);
    }

    #[test]
    fn test_transaction_rolls_back_on_err() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.insert(&note("kept", "", 1)).unwrap();

        let result = store.transaction(&mut |tx: &dyn NoteStore| {
            tx.insert(&note("discarded", "", 2))?;
            Err(NotepadError::DataAccess("boom".to_string()))
        });

        assert!(result.is_err());
        let titles: Vec<String> = store
            .get_all()
            .unwrap()
            .into_iter()
            .map(|n| n.title)
            .collect();
        assert_eq!(titles, vec!["kept"]);
    }

    #[test]
    fn test_categories_crud_and_count() {
        let store = SqliteStore::open_in_memory().unwrap();
        let id = store
            .insert_category(&Category::new("Work", 1).unwrap())
            .unwrap();
        store
            .insert_category(&Category::new("Home", 1).unwrap())
            .unwrap();

        let names: Vec<String> = store
            .get_all_categories()
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Home", "Work"]);

        let mut categorized = note("t", "", 1);
        categorized.category_id = id;
        store.insert(&categorized).unwrap();
        assert_eq!(store.count_notes(id).unwrap(), 1);

        let mut category = store.get_category(id).unwrap().unwrap();
        category.rename("Office", 5).unwrap();
        assert_eq!(store.update_category(&category).unwrap(), 1);
        assert!(store.find_category_by_name("Office").unwrap().is_some());
        assert!(store.find_category_by_name("Work").unwrap().is_none());

        assert_eq!(store.delete_category(id).unwrap(), 1);
        assert!(store.get_category(id).unwrap().is_none());
    }

    #[test]
    fn test_file_database_persists() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("data").join("notes.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            store.insert(&note("persisted", "", 1)).unwrap();
        }

        let reopened = SqliteStore::open(&path).unwrap();
        let notes = reopened.get_all().unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, "persisted");
    }
}
