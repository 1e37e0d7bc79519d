//! Export document format
//!
//! An export is a single JSON object:
//!
//! ```text
//! {"version":"1.0","exportTime":<ms>,"notes":[{"id":..,"title":..,"content":..,
//!   "createTime":..,"modifyTime":..}, ...]}
//! ```
//!
//! Parsing is all-or-nothing: one bad note entry rejects the whole document.

use crate::domain::note::{Note, UNCATEGORIZED};
use crate::error::{NotepadError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Known export format versions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatVersion {
    #[default]
    V1_0,
}

impl FormatVersion {
    /// Version written by this build
    pub const CURRENT: FormatVersion = FormatVersion::V1_0;

    pub fn as_str(&self) -> &'static str {
        match self {
            FormatVersion::V1_0 => "1.0",
        }
    }
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormatVersion {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "1.0" => Ok(FormatVersion::V1_0),
            _ => Err(format!(
                "Unsupported format version: '{}'. Supported versions: 1.0",
                s
            )),
        }
    }
}

/// A parsed export document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDocument {
    pub version: FormatVersion,
    pub export_time: i64,
    pub notes: Vec<Note>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DocumentOut<'a> {
    version: &'static str,
    export_time: i64,
    notes: Vec<NoteOut<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NoteOut<'a> {
    id: i64,
    title: &'a str,
    content: &'a str,
    create_time: i64,
    modify_time: i64,
}

// Notes stay as raw values at this stage so a failure can be reported with its index.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DocumentIn {
    version: String,
    export_time: i64,
    notes: Vec<serde_json::Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NoteIn {
    id: i64,
    title: String,
    content: String,
    create_time: i64,
    modify_time: i64,
}

impl From<NoteIn> for Note {
    fn from(entry: NoteIn) -> Self {
        Note {
            id: entry.id,
            title: entry.title,
            content: entry.content,
            create_time: entry.create_time,
            modify_time: entry.modify_time,
            category_id: UNCATEGORIZED,
        }
    }
}

/// Serialize notes into an export document stamped with `export_time`
pub fn serialize(notes: &[Note], export_time: i64) -> Result<String> {
    let document = DocumentOut {
        version: FormatVersion::CURRENT.as_str(),
        export_time,
        notes: notes
            .iter()
            .map(|note| NoteOut {
                id: note.id,
                title: &note.title,
                content: &note.content,
                create_time: note.create_time,
                modify_time: note.modify_time,
            })
            .collect(),
    };

    serde_json::to_string(&document).map_err(|e| NotepadError::Serialization(e.to_string()))
}

/// Parse an export document
pub fn deserialize(text: &str) -> Result<ExportDocument> {
    let raw: DocumentIn =
        serde_json::from_str(text).map_err(|e| NotepadError::MalformedDocument(e.to_string()))?;

    let version =
        FormatVersion::from_str(&raw.version).map_err(NotepadError::MalformedDocument)?;

    let notes = raw
        .notes
        .into_iter()
        .enumerate()
        .map(|(index, value)| -> Result<Note> {
            let entry = serde_json::from_value::<NoteIn>(value)
                .map_err(|e| NotepadError::MalformedDocument(format!("note #{}: {}", index, e)))?;
            // Stores only hand out positive ids.
            if entry.id <= 0 {
                return Err(NotepadError::MalformedDocument(format!(
                    "note #{}: id must be positive, found {}",
                    index, entry.id
                )));
            }
            Ok(Note::from(entry))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ExportDocument {
        version,
        export_time: raw.export_time,
        notes,
    })
}
