//! # sortfiles - Categorized File Organizer
//!
//! Moves or copies files from a source tree into
//! `destination/<category>/<name>`, skipping content-identical duplicates,
//! renaming conflicts, and tidying the empty directories left behind.

// Module declarations
pub mod classify;
pub mod cleanup;
pub mod commands;
pub mod config;
pub mod executor;
pub mod hash;
pub mod logging;
pub mod organize;
pub mod progress;
pub mod resolver;
pub mod scanner;
pub mod types;
pub mod ui;

// Re-export commonly used types
pub use config::Config;
pub use organize::{organize, CancelToken, OrganizeEngine};
pub use progress::{ProgressEvent, ProgressTracker};
pub use types::{
    Category, DuplicatePolicy, FileEntry, OperationRecord, OrganizeOptions, Outcome,
    ProgressSummary, SortError,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
