//! ProgressSummary - Aggregate counters for one run

use super::{Category, OperationRecord, Outcome};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregate counters for a run.
///
/// Invariant: `transferred() + skipped() + failed == processed()`, and
/// `per_category` sums to `transferred()`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSummary {
    pub moved: u64,
    pub copied: u64,
    pub skipped_duplicate: u64,
    pub skipped_filtered: u64,
    pub skipped_conflict: u64,
    pub failed: u64,

    /// Transferred file count per category
    pub per_category: BTreeMap<Category, u64>,

    /// Bytes written at the destination
    pub bytes_transferred: u64,

    /// Directories or entries the scanner could not read
    pub scan_errors: u64,

    /// Cleanup counters
    pub empty_dirs_found: u64,
    pub empty_dirs_removed: u64,
    pub cleanup_errors: u64,

    /// Terminal flags
    pub completed: bool,
    pub cancelled: bool,
}

impl ProgressSummary {
    /// Fold one finished record into the counters
    pub fn apply(&mut self, record: &OperationRecord) {
        match record.outcome {
            Outcome::Moved => self.moved += 1,
            Outcome::Copied => self.copied += 1,
            Outcome::SkippedDuplicate => self.skipped_duplicate += 1,
            Outcome::SkippedFiltered => self.skipped_filtered += 1,
            Outcome::SkippedConflict => self.skipped_conflict += 1,
            Outcome::Failed => self.failed += 1,
        }

        if record.outcome.is_transfer() {
            *self.per_category.entry(record.category).or_default() += 1;
            self.bytes_transferred += record.bytes_transferred;
        }
    }

    /// Files placed at the destination
    pub fn transferred(&self) -> u64 {
        self.moved + self.copied
    }

    /// Files deliberately left alone
    pub fn skipped(&self) -> u64 {
        self.skipped_duplicate + self.skipped_filtered + self.skipped_conflict
    }

    /// Files that reached a terminal outcome
    pub fn processed(&self) -> u64 {
        self.transferred() + self.skipped() + self.failed
    }

    /// Transferred count for one category
    pub fn category_count(&self, category: Category) -> u64 {
        self.per_category.get(&category).copied().unwrap_or(0)
    }
}
