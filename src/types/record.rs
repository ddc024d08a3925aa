//! OperationRecord - The terminal result of processing one file

use super::{Category, FileEntry, SortError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Terminal outcome tag of one processed file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Placed at the destination and removed from the source
    Moved,
    /// Placed at the destination, source kept
    Copied,
    /// Destination already holds identical content
    SkippedDuplicate,
    /// Excluded by the category filter
    SkippedFiltered,
    /// Destination differs and the policy allows neither rename nor overwrite
    SkippedConflict,
    /// Processing failed; see the record's error
    Failed,
}

impl Outcome {
    /// Whether the file landed at its destination
    pub fn is_transfer(&self) -> bool {
        matches!(self, Outcome::Moved | Outcome::Copied)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Moved => "moved",
            Outcome::Copied => "copied",
            Outcome::SkippedDuplicate => "skipped_duplicate",
            Outcome::SkippedFiltered => "skipped_filtered",
            Outcome::SkippedConflict => "skipped_conflict",
            Outcome::Failed => "failed",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One record per processed FileEntry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationRecord {
    /// Source file path
    pub source: PathBuf,

    /// Resolved destination (after rename; the existing copy for duplicates)
    pub destination: PathBuf,

    /// Category the file was classified as
    pub category: Category,

    /// Terminal outcome
    pub outcome: Outcome,

    /// Error description for failures and partial moves
    pub error: Option<String>,

    /// Bytes written at the destination
    pub bytes_transferred: u64,

    /// When the record was finalized
    pub recorded_at: DateTime<Utc>,
}

impl OperationRecord {
    /// Pending record created right before a file is dispatched.
    ///
    /// Starts as `Failed` so a record that is never finalized cannot count
    /// as a success.
    pub fn pending(entry: &FileEntry, destination: PathBuf) -> Self {
        Self {
            source: entry.path.clone(),
            destination,
            category: entry.category,
            outcome: Outcome::Failed,
            error: None,
            bytes_transferred: 0,
            recorded_at: Utc::now(),
        }
    }

    /// Finalize with a non-failure outcome
    pub fn finish(mut self, outcome: Outcome, bytes_transferred: u64) -> Self {
        self.outcome = outcome;
        self.bytes_transferred = if outcome.is_transfer() {
            bytes_transferred
        } else {
            0
        };
        self.recorded_at = Utc::now();
        self
    }

    /// Finalize as failed, capturing the triggering error
    pub fn fail(self, error: &SortError) -> Self {
        self.fail_with(error.to_string())
    }

    pub fn fail_with(mut self, message: impl Into<String>) -> Self {
        self.outcome = Outcome::Failed;
        self.error = Some(message.into());
        self.bytes_transferred = 0;
        self.recorded_at = Utc::now();
        self
    }

    /// Point the record at a different destination (rename or duplicate)
    pub fn with_destination(mut self, destination: PathBuf) -> Self {
        self.destination = destination;
        self
    }

    /// Attach a note without changing the outcome
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.error = Some(note.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    fn entry() -> FileEntry {
        FileEntry::new(
            PathBuf::from("/src/a.jpg"),
            10,
            UNIX_EPOCH + Duration::from_secs(1_000),
            Category::Image,
        )
    }

    #[test]
    fn test_pending_record_is_not_a_success() {
        let record = OperationRecord::pending(&entry(), PathBuf::from("/dest/images/a.jpg"));
        assert_eq!(record.outcome, Outcome::Failed);
        assert_eq!(record.bytes_transferred, 0);
        assert_eq!(record.category, Category::Image);
    }

    #[test]
    fn test_finish_only_counts_bytes_for_transfers() {
        let pending = OperationRecord::pending(&entry(), PathBuf::from("/dest/images/a.jpg"));
        let copied = pending.clone().finish(Outcome::Copied, 10);
        let duplicate = pending.finish(Outcome::SkippedDuplicate, 10);

        assert_eq!(copied.bytes_transferred, 10);
        assert_eq!(duplicate.bytes_transferred, 0);
        assert!(copied.error.is_none());
    }

    #[test]
    fn test_fail_captures_error() {
        let err = SortError::transfer("/src/a.jpg", std::io::Error::other("disk full"));
        let record =
            OperationRecord::pending(&entry(), PathBuf::from("/dest/images/a.jpg")).fail(&err);

        assert_eq!(record.outcome, Outcome::Failed);
        assert!(record.error.as_deref().is_some_and(|e| e.contains("disk full")));
    }

    #[test]
    fn test_outcome_serializes_snake_case() {
        let json = serde_json::to_string(&Outcome::SkippedDuplicate).expect("serialize");
        assert_eq!(json, "\"skipped_duplicate\"");
        assert_eq!(Outcome::SkippedFiltered.to_string(), "skipped_filtered");
    }

    #[test]
    fn test_outcome_classes() {
        assert!(Outcome::Moved.is_transfer());
        assert!(Outcome::Copied.is_transfer());
        assert!(!Outcome::SkippedConflict.is_transfer());
        assert!(!Outcome::Failed.is_transfer());
    }
}
