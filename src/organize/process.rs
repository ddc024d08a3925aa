//! Per-file state machine

use crate::executor::TransferExecutor;
use crate::progress::ProgressTracker;
use crate::resolver::DuplicateResolver;
use crate::types::{Category, Disposition, FileEntry, OperationRecord, Outcome};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

/// Carries one file from classification to its recorded outcome
pub(crate) struct FileProcessor {
    pub(crate) destination: PathBuf,
    pub(crate) category_filter: Option<Category>,
    pub(crate) resolver: DuplicateResolver,
    pub(crate) executor: TransferExecutor,
    pub(crate) tracker: Arc<ProgressTracker>,
}

impl FileProcessor {
    /// Process `entry` and record exactly one outcome for it
    ///
    /// A panic while processing becomes a `Failed` record.
    pub(crate) fn handle(&self, entry: FileEntry) {
        let record = match panic::catch_unwind(AssertUnwindSafe(|| self.process_file(&entry))) {
            Ok(record) => record,
            Err(payload) => {
                let natural = entry.destination_in(&self.destination);
                OperationRecord::pending(&entry, natural).fail_with(format!(
                    "Processing panicked: {}",
                    panic_message(payload.as_ref())
                ))
            }
        };

        match record.outcome {
            Outcome::Failed => warn!(
                source = %record.source.display(),
                error = record.error.as_deref().unwrap_or("unknown error"),
                "file failed"
            ),
            outcome => debug!(
                source = %record.source.display(),
                destination = %record.destination.display(),
                %outcome,
                "file processed"
            ),
        }

        self.tracker.record(record);
    }

    /// Classified → (Filtered | DuplicateChecked) → Transferred
    pub(crate) fn process_file(&self, entry: &FileEntry) -> OperationRecord {
        let natural = entry.destination_in(&self.destination);
        let pending = OperationRecord::pending(entry, natural.clone());

        if let Some(wanted) = self.category_filter {
            if entry.category != wanted {
                return pending.finish(Outcome::SkippedFiltered, 0);
            }
        }

        let resolution = match self.resolver.resolve(entry, &natural) {
            Ok(resolution) => resolution,
            Err(e) => return pending.fail(&e),
        };

        let target = match (&resolution.disposition, resolution.target(&natural)) {
            (_, Some(target)) => target.to_path_buf(),
            (Disposition::SkipDuplicate(existing), None) => {
                return pending
                    .with_destination(existing.clone())
                    .finish(Outcome::SkippedDuplicate, 0);
            }
            (_, None) => return pending.finish(Outcome::SkippedConflict, 0),
        };

        if resolution.disposition == Disposition::Overwrite {
            debug!(target = %target.display(), "overwriting different content");
        }

        // The claims in `resolution` stay held until the transfer returns
        let record = match self.executor.transfer(entry, &target) {
            Ok(result) => {
                let record = pending
                    .with_destination(target)
                    .finish(result.outcome, result.bytes);
                match result.note {
                    Some(note) => record.with_note(note),
                    None => record,
                }
            }
            Err(e) => pending.with_destination(target).fail(&e),
        };
        drop(resolution);

        record
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
