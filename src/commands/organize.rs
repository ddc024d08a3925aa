//! Main organize command

use crate::organize::{CancelToken, OrganizeEngine};
use crate::types::{Category, OperationRecord, Outcome, ProgressSummary, SortError};
use crate::ui::{spawn_json_printer, ProgressReporter};
use crate::Config;
use indicatif::HumanBytes;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::thread;
use tracing::{debug, warn};

/// Run the organize operation
///
/// Returns the final summary. Per-file failures are reported but do not
/// make this an error.
pub fn run(config: Config) -> Result<ProgressSummary, SortError> {
    let dry_run = config.options.dry_run;
    let engine = OrganizeEngine::new(&config.source, &config.destination, config.options)?
        .with_rules(config.rules);

    let tracker = engine.tracker();
    install_ctrlc_handler(engine.cancel_token());

    let observer = if config.json {
        Observer::Json(spawn_json_printer(tracker.subscribe()))
    } else if config.show_progress {
        Observer::Spinner(ProgressReporter::new().spawn(tracker.subscribe()))
    } else {
        Observer::None
    };

    let result = engine.run();
    observer.join();

    let summary = result?;

    if !config.json {
        println!("{}", format_summary(&summary, dry_run));

        let failures: Vec<ErrorRecord> = tracker
            .records()
            .iter()
            .filter(|r| r.outcome == Outcome::Failed)
            .map(ErrorRecord::from_record)
            .collect();
        if !failures.is_empty() {
            println!("{}", format_error_summary(&failures));
        }
    }

    Ok(summary)
}

/// Thread consuming the run's event stream
enum Observer {
    Json(thread::JoinHandle<()>),
    Spinner(thread::JoinHandle<ProgressReporter>),
    None,
}

impl Observer {
    /// Wait for the stream to close
    fn join(self) {
        let panicked = match self {
            Observer::Json(handle) => handle.join().is_err(),
            Observer::Spinner(handle) => handle.join().is_err(),
            Observer::None => false,
        };
        if panicked {
            warn!("progress observer thread panicked");
        }
    }
}

/// Raise `cancel` on Ctrl-C
fn install_ctrlc_handler(cancel: CancelToken) {
    let spawned = thread::Builder::new()
        .name("sortfiles-ctrlc".to_string())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(e) => {
                    warn!("cannot listen for Ctrl-C: {}", e);
                    return;
                }
            };

            if runtime.block_on(tokio::signal::ctrl_c()).is_ok() {
                eprintln!("Stopping after files in progress...");
                cancel.cancel();
            }
        });

    if let Err(e) = spawned {
        debug!("Ctrl-C listener not started: {}", e);
    }
}

/// Human summary printed after a run
pub fn format_summary(summary: &ProgressSummary, dry_run: bool) -> String {
    let mut lines = Vec::new();

    let heading = match (dry_run, summary.cancelled) {
        (_, true) => "Run cancelled:",
        (true, false) => "Dry run complete (no changes were made):",
        (false, false) => "Organize complete:",
    };
    lines.push(heading.to_string());
    lines.push(format!(
        "  Moved: {}  Copied: {}  Failed: {}",
        summary.moved, summary.copied, summary.failed
    ));
    lines.push(format!(
        "  Skipped: {} duplicate, {} filtered, {} conflict",
        summary.skipped_duplicate, summary.skipped_filtered, summary.skipped_conflict
    ));
    lines.push(format!(
        "  Total transferred: {}",
        HumanBytes(summary.bytes_transferred)
    ));

    let per_category: Vec<String> = Category::ALL
        .iter()
        .filter_map(|c| match summary.category_count(*c) {
            0 => None,
            n => Some(format!("{} {}", n, c.dir_name())),
        })
        .collect();
    if !per_category.is_empty() {
        lines.push(format!("  By category: {}", per_category.join(", ")));
    }

    if summary.empty_dirs_found > 0 || summary.cleanup_errors > 0 {
        lines.push(format!(
            "  Empty directories: {} found, {} removed, {} errors",
            summary.empty_dirs_found, summary.empty_dirs_removed, summary.cleanup_errors
        ));
    }
    if summary.scan_errors > 0 {
        lines.push(format!("  Unreadable entries: {}", summary.scan_errors));
    }

    lines.join("\n")
}

#[derive(Debug)]
struct ErrorRecord {
    kind: String,
    path: PathBuf,
    message: String,
    suggestion: Option<&'static str>,
}

impl ErrorRecord {
    fn from_record(record: &OperationRecord) -> Self {
        let message = record
            .error
            .clone()
            .unwrap_or_else(|| "unknown error".to_string());
        Self {
            kind: failure_kind(&message).to_string(),
            path: record.source.clone(),
            suggestion: suggest(&message),
            message,
        }
    }
}

/// Leading label of an error message, e.g. `Transfer error`
fn failure_kind(message: &str) -> &str {
    message
        .split_once(':')
        .map(|(kind, _)| kind.trim())
        .filter(|kind| !kind.is_empty())
        .unwrap_or("Error")
}

fn suggest(message: &str) -> Option<&'static str> {
    let lower = message.to_ascii_lowercase();
    if lower.contains("permission denied") {
        Some("Check file permissions or run with a user that has access.")
    } else if lower.contains("no space") || lower.contains("disk full") {
        Some("Free disk space on the destination and retry.")
    } else if lower.contains("no free name") {
        Some("Tidy up renamed copies in the destination, or use --on-duplicate skip.")
    } else if lower.contains("not found") || lower.contains("no such file") {
        Some("The file may have been moved or deleted during the run; retry.")
    } else {
        None
    }
}

fn format_error_summary(records: &[ErrorRecord]) -> String {
    let mut groups: BTreeMap<&str, Vec<&ErrorRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(record.kind.as_str()).or_default().push(record);
    }

    let mut lines = Vec::new();
    lines.push("Error summary:".to_string());
    for (kind, items) in groups {
        lines.push(format!("  {} ({}):", kind, items.len()));
        for record in items.iter().take(3) {
            lines.push(format!("    - {}", record.message));
            lines.push(format!("      Path: {}", record.path.display()));
            if let Some(suggestion) = record.suggestion {
                lines.push(format!("      Try: {}", suggestion));
            }
        }
        if items.len() > 3 {
            lines.push(format!("    - ... {} more", items.len() - 3));
        }
    }
    lines.join("\n")
}
