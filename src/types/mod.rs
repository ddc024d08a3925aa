//! Core type definitions for sortfiles

mod category;
mod entry;
mod error;
mod options;
mod policy;
mod record;
mod summary;

pub use category::Category;
pub use entry::FileEntry;
pub use error::SortError;
pub use options::{default_ignore_patterns, OrganizeOptions, DEFAULT_IGNORE_PATTERNS};
pub use policy::{Disposition, DuplicatePolicy};
pub use record::{OperationRecord, Outcome};
pub use summary::ProgressSummary;
