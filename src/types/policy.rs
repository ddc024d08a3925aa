//! DuplicatePolicy and Disposition - How occupied destinations are handled

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// What to do when a destination holds different content
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Leave the source alone
    Skip,

    /// Place the file under `<stem>_<n>.<ext>`
    #[default]
    Rename,

    /// Replace the existing destination file
    Overwrite,
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DuplicatePolicy::Skip => "skip",
            DuplicatePolicy::Rename => "rename",
            DuplicatePolicy::Overwrite => "overwrite",
        })
    }
}

/// Decision reached for one file's destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// Destination is free
    Proceed,

    /// An identical file already exists at the given path
    SkipDuplicate(PathBuf),

    /// Destination taken by different content; use this path instead
    Rename(PathBuf),

    /// Replace the destination
    Overwrite,

    /// Destination taken by different content and the policy says skip
    SkipConflict,
}
