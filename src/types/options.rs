//! OrganizeOptions - Per-run behavior switches

use super::{Category, DuplicatePolicy};

/// Directory names cleanup never removes
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[
    ".git",
    "__pycache__",
    ".pytest_cache",
    ".mypy_cache",
    "node_modules",
    "venv",
    ".venv",
];

/// Options for one organize run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizeOptions {
    /// Descend into subdirectories of the source root
    pub recursive: bool,

    /// Decide everything, touch nothing
    pub dry_run: bool,

    /// Move instead of copy
    pub delete_source: bool,

    /// Only transfer files of this category
    pub category_filter: Option<Category>,

    /// Remove empty source directories afterwards
    pub cleanup_enabled: bool,

    /// Clean nested directories, not just direct children of the root
    pub cleanup_recursive: bool,

    /// Directory name globs cleanup leaves in place
    pub ignore_patterns: Vec<String>,

    /// Handling of destinations that hold different content
    pub duplicate_policy: DuplicatePolicy,

    /// Concurrent transfers; 1 runs in the calling thread
    pub workers: usize,
}

impl Default for OrganizeOptions {
    fn default() -> Self {
        Self {
            recursive: false,
            dry_run: false,
            delete_source: false,
            category_filter: None,
            cleanup_enabled: true,
            cleanup_recursive: true,
            ignore_patterns: default_ignore_patterns(),
            duplicate_policy: DuplicatePolicy::default(),
            workers: 1,
        }
    }
}

pub fn default_ignore_patterns() -> Vec<String> {
    DEFAULT_IGNORE_PATTERNS
        .iter()
        .map(|p| p.to_string())
        .collect()
}
