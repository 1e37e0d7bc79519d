//! Domain layer - Business logic and domain models

pub mod category;
pub mod document;
pub mod note;

pub use category::Category;
pub use document::{ExportDocument, FormatVersion};
pub use note::{now_millis, Note, UNCATEGORIZED};
