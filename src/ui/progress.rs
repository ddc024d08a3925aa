//! Progress reporting

use crate::progress::{ProgressEvent, ProgressReceiver};
use crate::types::{OperationRecord, Outcome, ProgressSummary};
use indicatif::{HumanBytes, ProgressBar, ProgressStyle};
use std::thread;
use std::time::Duration;

/// Terminal spinner fed by run events
pub struct ProgressReporter {
    bar: ProgressBar,
    failures: u64,
}

impl ProgressReporter {
    /// Create a new progress reporter
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.enable_steady_tick(Duration::from_millis(120));
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            bar.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "));
        }
        bar.set_message("Scanning...".to_string());

        Self { bar, failures: 0 }
    }

    /// Reporter that draws nothing
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
            failures: 0,
        }
    }

    /// Apply one event to the display
    pub fn handle(&mut self, event: &ProgressEvent) {
        match event {
            ProgressEvent::Operation(record) => {
                if record.outcome == Outcome::Failed {
                    self.failures += 1;
                    self.bar.println(format_failure(record));
                }
            }
            ProgressEvent::Summary(summary) => {
                self.bar.set_position(summary.processed());
                if summary.completed {
                    self.bar.finish_with_message(format_final(summary));
                } else {
                    self.bar.set_message(format_progress(summary));
                }
            }
        }
    }

    /// Consume events on a background thread until the run ends
    pub fn spawn(mut self, mut rx: ProgressReceiver) -> thread::JoinHandle<Self> {
        thread::spawn(move || {
            while let Some(event) = rx.blocking_recv() {
                self.handle(&event);
            }
            if !self.bar.is_finished() {
                self.bar.finish_and_clear();
            }
            self
        })
    }

    pub fn failures(&self) -> u64 {
        self.failures
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

fn format_failure(record: &OperationRecord) -> String {
    format!(
        "FAILED {}: {}",
        record.source.display(),
        record.error.as_deref().unwrap_or("unknown error")
    )
}

/// One-line running status
pub fn format_progress(summary: &ProgressSummary) -> String {
    format!(
        "{} processed | {} moved, {} copied, {} skipped, {} failed | {}",
        summary.processed(),
        summary.moved,
        summary.copied,
        summary.skipped(),
        summary.failed,
        HumanBytes(summary.bytes_transferred)
    )
}

fn format_final(summary: &ProgressSummary) -> String {
    let state = if summary.cancelled {
        "Cancelled"
    } else {
        "Done"
    };
    format!("{}: {}", state, format_progress(summary))
}
