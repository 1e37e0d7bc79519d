//! Application layer - Use cases and orchestration

pub mod categories;
pub mod export;
pub mod import;
pub mod init;
pub mod manage_config;
pub mod notes;
pub mod task;

pub use categories::{CategoryService, CategoryUsage};
pub use export::{ExportManager, ExportSummary};
pub use import::{ImportManager, ImportSummary};
pub use manage_config::ConfigService;
pub use notes::{NoteChanges, NoteService};
pub use task::{CancelToken, OperationHandle};
