//! Run-wide progress aggregation
//!
//! [`ProgressTracker`] is the single owner of a run's counters and record
//! list. Workers report through [`ProgressTracker::record`]; observers read
//! copies through [`ProgressTracker::snapshot`] or consume the event stream
//! from [`ProgressTracker::subscribe`].

mod event;

pub use event::{ProgressEvent, ProgressReceiver};

use crate::cleanup::CleanupReport;
use crate::types::{OperationRecord, ProgressSummary, SortError};
use event::ProgressSender;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;

#[derive(Debug, Default)]
struct TrackerState {
    summary: ProgressSummary,
    records: Vec<OperationRecord>,
    subscribers: Vec<ProgressSender>,
    finished: bool,
}

impl TrackerState {
    fn broadcast(&mut self, event: ProgressEvent) {
        // Drop observers that went away
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    fn broadcast_summary(&mut self) {
        let snapshot = self.summary.clone();
        self.broadcast(ProgressEvent::Summary(snapshot));
    }
}

/// Thread-safe aggregate of outcomes for one run
#[derive(Debug, Default)]
pub struct ProgressTracker {
    state: Mutex<TrackerState>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, TrackerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fold a finished record into the run
    ///
    /// Observers receive the record followed by the updated summary.
    pub fn record(&self, record: OperationRecord) {
        let mut state = self.lock();
        state.summary.apply(&record);
        state.records.push(record.clone());
        state.broadcast(ProgressEvent::Operation(record));
        state.broadcast_summary();
    }

    /// Count an entry the scanner could not read
    pub fn record_scan_error(&self, _error: &SortError) {
        let mut state = self.lock();
        state.summary.scan_errors += 1;
        state.broadcast_summary();
    }

    /// Fold a cleanup pass into the counters
    pub fn record_cleanup(&self, report: &CleanupReport) {
        let mut state = self.lock();
        state.summary.empty_dirs_found += report.found;
        state.summary.empty_dirs_removed += report.removed.len() as u64;
        state.summary.cleanup_errors += report.errors;
        state.broadcast_summary();
    }

    /// Consistent copy of the counters
    pub fn snapshot(&self) -> ProgressSummary {
        self.lock().summary.clone()
    }

    /// Copy of every record so far, in record order
    pub fn records(&self) -> Vec<OperationRecord> {
        self.lock().records.clone()
    }

    /// Subscribe to events from now on
    ///
    /// A subscriber added after the run finished gets the terminal summary
    /// and a closed channel.
    pub fn subscribe(&self) -> ProgressReceiver {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut state = self.lock();
        if state.finished {
            let _ = tx.send(ProgressEvent::Summary(state.summary.clone()));
        } else {
            state.subscribers.push(tx);
        }
        rx
    }

    /// Mark the run finished normally
    pub fn mark_completed(&self) -> ProgressSummary {
        self.finish(false)
    }

    /// Mark the run stopped by cancellation
    pub fn mark_cancelled(&self) -> ProgressSummary {
        self.finish(true)
    }

    fn finish(&self, cancelled: bool) -> ProgressSummary {
        let mut state = self.lock();
        if !state.finished {
            state.finished = true;
            state.summary.completed = true;
            state.summary.cancelled = cancelled;
            state.broadcast_summary();
            // Closing the senders ends every observer's stream
            state.subscribers.clear();
        }
        state.summary.clone()
    }
}
