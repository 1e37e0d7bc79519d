//! Error types for notepad

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for notepad application
#[derive(Debug, Error)]
pub enum NotepadError {
    #[error("Not a notepad directory: {0}")]
    NotNotepadDirectory(PathBuf),

    #[error("Note not found: {0}")]
    NoteNotFound(i64),

    #[error("Category not found: {0}")]
    CategoryNotFound(i64),

    #[error("Category {id} is still used by {notes} note(s)")]
    CategoryInUse { id: i64, notes: i64 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Data access error: {0}")]
    DataAccess(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Operation cancelled: {0}")]
    Cancelled(String),

    #[error("{0} is no longer available")]
    CoordinatorGone(String),

    #[error("Background task failed: {0}")]
    TaskFailed(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl From<rusqlite::Error> for NotepadError {
    fn from(err: rusqlite::Error) -> Self {
        NotepadError::DataAccess(err.to_string())
    }
}

impl NotepadError {
    /// Build an IO error for a file that failed post-write verification
    pub fn verification(msg: impl Into<String>) -> Self {
        NotepadError::Io(std::io::Error::other(msg.into()))
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            NotepadError::NotNotepadDirectory(_) => 2,
            NotepadError::NoteNotFound(_) | NotepadError::CategoryNotFound(_) => 3,
            NotepadError::MalformedDocument(_) => 4,
            NotepadError::Cancelled(_) => 130,
            _ => 1,
        }
    }

    /// Get a user-friendly error message with suggestions
    pub fn display_with_suggestions(&self) -> String {
        match self {
            NotepadError::NotNotepadDirectory(path) => {
                format!(
                    "Not a notepad directory: {}\n\n\
                    Suggestions:\n\
                    • Run 'notepad init' in this directory to create a new notebook\n\
                    • Navigate to an existing notebook directory\n\
                    • Set NOTEPAD_ROOT environment variable to your notebook path",
                    path.display()
                )
            }
            NotepadError::NoteNotFound(id) => {
                format!(
                    "Note not found: {}\n\n\
                    Suggestions:\n\
                    • Use 'notepad list' to see note IDs\n\
                    • Use 'notepad list --search <text>' to find a note by title or content",
                    id
                )
            }
            NotepadError::CategoryInUse { id, notes } => {
                format!(
                    "Category {} is still used by {} note(s)\n\n\
                    Suggestions:\n\
                    • Move those notes first: notepad edit <ID> --category 0\n\
                    • Use 'notepad list --category {}' to see them",
                    id, notes, id
                )
            }
            NotepadError::MalformedDocument(msg) => {
                format!(
                    "Malformed document: {}\n\n\
                    Expected a file produced by 'notepad export' with the fields:\n\
                    version, exportTime, notes[id, title, content, createTime, modifyTime]",
                    msg
                )
            }
            NotepadError::Storage(msg) => {
                format!(
                    "{}\n\n\
                    Suggestions:\n\
                    • Check that the destination directory is writable\n\
                    • Export somewhere else: notepad export --dir <DIR>\n\
                    • Change the default: notepad config export_dir <DIR>",
                    msg
                )
            }
            _ => self.to_string(),
        }
    }
}

/// Result type using NotepadError
pub type Result<T> = std::result::Result<T, NotepadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_notepad_directory_suggestion() {
        let err = NotepadError::NotNotepadDirectory(PathBuf::from("/tmp/test"));
        let msg = err.display_with_suggestions();
        assert!(msg.contains("notepad init"));
        assert!(msg.contains("NOTEPAD_ROOT"));
        assert!(msg.contains("Suggestions"));
    }

    #[test]
    fn test_category_in_use_suggestions() {
        let err = NotepadError::CategoryInUse { id: 3, notes: 2 };
        let msg = err.display_with_suggestions();
        assert!(msg.contains("2 note(s)"));
        assert!(msg.contains("--category 3"));
    }

    #[test]
    fn test_malformed_document_lists_fields() {
        let err = NotepadError::MalformedDocument("missing field `version`".to_string());
        let msg = err.display_with_suggestions();
        assert!(msg.contains("missing field `version`"));
        assert!(msg.contains("exportTime"));
    }

    #[test]
    fn test_verification_error_is_io() {
        let err = NotepadError::verification("file is empty");
        assert!(matches!(err, NotepadError::Io(_)));
        assert_eq!(err.to_string(), "IO error: file is empty");
    }

    #[test]
    fn test_rusqlite_error_maps_to_data_access() {
        let err: NotepadError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, NotepadError::DataAccess(_)));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            NotepadError::NotNotepadDirectory(PathBuf::from(".")).exit_code(),
            2
        );
        assert_eq!(NotepadError::NoteNotFound(1).exit_code(), 3);
        assert_eq!(NotepadError::Config("x".into()).exit_code(), 1);
    }

    #[test]
    fn test_other_errors_fallback() {
        let err = NotepadError::Config("bad key".to_string());
        let msg = err.display_with_suggestions();
        assert_eq!(msg, "Configuration error: bad key");
    }
}
