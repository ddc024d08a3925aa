//! Organize runs
//!
//! [`OrganizeEngine`] drives one source/destination pair through the whole
//! pipeline: scan, classify, filter, resolve duplicates, transfer, record,
//! and finally clean up empty source directories.
//!
//! ```no_run
//! use sortfiles::organize::organize;
//! use sortfiles::OrganizeOptions;
//! use std::path::Path;
//!
//! let options = OrganizeOptions {
//!     recursive: true,
//!     ..Default::default()
//! };
//! let summary = organize(Path::new("Downloads"), Path::new("Sorted"), options)?;
//! println!("{} files placed", summary.transferred());
//! # Ok::<(), sortfiles::types::SortError>(())
//! ```

mod cancel;
mod process;

pub use cancel::CancelToken;

use crate::classify::{CategoryRules, Classifier};
use crate::cleanup::CleanupEngine;
use crate::executor::{DestinationClaims, ParallelExecutor, TransferExecutor, TransferJob};
use crate::progress::ProgressTracker;
use crate::resolver::{DestinationIndex, DuplicateResolver};
use crate::scanner::DirectoryScanner;
use crate::types::{FileEntry, OrganizeOptions, Outcome, ProgressSummary, SortError};
use process::FileProcessor;
use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Inbox depth per worker
const QUEUE_DEPTH_PER_WORKER: usize = 4;

/// Organizes one source tree into one destination tree
pub struct OrganizeEngine {
    source: PathBuf,
    destination: PathBuf,
    options: OrganizeOptions,
    rules: CategoryRules,
    cleanup: CleanupEngine,
    tracker: Arc<ProgressTracker>,
    cancel: CancelToken,
}

impl OrganizeEngine {
    /// Validate the pair and options
    ///
    /// # Errors
    /// `SortError::Config` when the source is missing or not a directory,
    /// when source and destination are the same, when the destination lies
    /// inside the source, or when an ignore pattern is invalid.
    pub fn new(
        source: &Path,
        destination: &Path,
        options: OrganizeOptions,
    ) -> Result<Self, SortError> {
        let metadata = fs::metadata(source).map_err(|_| {
            SortError::Config(format!("Source path does not exist: {}", source.display()))
        })?;
        if !metadata.is_dir() {
            return Err(SortError::Config(format!(
                "Source path is not a directory: {}",
                source.display()
            )));
        }

        let source = fs::canonicalize(source)?;
        let destination = resolve_destination(destination)?;

        if source == destination {
            return Err(SortError::Config(
                "Source and destination cannot be the same".to_string(),
            ));
        }
        if destination.starts_with(&source) {
            return Err(SortError::Config(format!(
                "Destination {} cannot be inside the source {}",
                destination.display(),
                source.display()
            )));
        }

        let cleanup = CleanupEngine::new(options.ignore_patterns.as_slice())?;

        Ok(Self {
            source,
            destination,
            options,
            rules: CategoryRules::default(),
            cleanup,
            tracker: Arc::new(ProgressTracker::new()),
            cancel: CancelToken::new(),
        })
    }

    /// Replace the extension rules
    pub fn with_rules(mut self, rules: CategoryRules) -> Self {
        self.rules = rules;
        self
    }

    /// Tracker observers can subscribe to before the run starts
    pub fn tracker(&self) -> Arc<ProgressTracker> {
        Arc::clone(&self.tracker)
    }

    /// Token that stops the run when cancelled
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Canonical source root
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Absolute destination root
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn options(&self) -> &OrganizeOptions {
        &self.options
    }

    /// Run to completion or cancellation
    ///
    /// Per-file problems never abort the run; they show up as `failed`
    /// records. Only an uncreatable destination root is fatal here.
    pub fn run(self) -> Result<ProgressSummary, SortError> {
        let result = self.run_inner();
        if result.is_err() {
            // Observers must not wait on a run that never finishes
            self.tracker.mark_cancelled();
        }
        result
    }

    fn run_inner(&self) -> Result<ProgressSummary, SortError> {
        let started = Instant::now();
        info!(
            source = %self.source.display(),
            destination = %self.destination.display(),
            recursive = self.options.recursive,
            dry_run = self.options.dry_run,
            delete_source = self.options.delete_source,
            policy = %self.options.duplicate_policy,
            workers = self.options.workers,
            "organize run starting"
        );

        if !self.options.dry_run {
            fs::create_dir_all(&self.destination).map_err(|source| {
                SortError::DestinationUnwritable {
                    path: self.destination.clone(),
                    source,
                }
            })?;
        }

        let processor = Arc::new(self.build_processor());
        self.dispatch(&processor)?;

        if self.cancel.is_cancelled() {
            let summary = self.tracker.mark_cancelled();
            info!(processed = summary.processed(), "organize run cancelled; cleanup skipped");
            return Ok(summary);
        }

        if self.options.cleanup_enabled {
            self.run_cleanup();
        }

        let summary = self.tracker.mark_completed();
        info!(
            transferred = summary.transferred(),
            skipped = summary.skipped(),
            failed = summary.failed,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "organize run finished"
        );
        Ok(summary)
    }

    fn build_processor(&self) -> FileProcessor {
        let index = Arc::new(if self.options.dry_run {
            DestinationIndex::staged()
        } else {
            DestinationIndex::live()
        });

        FileProcessor {
            destination: self.destination.clone(),
            category_filter: self.options.category_filter,
            resolver: DuplicateResolver::new(
                self.options.duplicate_policy,
                Arc::clone(&index),
                DestinationClaims::new(),
            ),
            executor: TransferExecutor::new(
                self.options.delete_source,
                self.options.dry_run,
                index,
            ),
            tracker: Arc::clone(&self.tracker),
        }
    }

    fn dispatch(&self, processor: &Arc<FileProcessor>) -> Result<(), SortError> {
        let classifier = Arc::new(Classifier::new(self.rules.clone()));
        let scanner = DirectoryScanner::new(&self.source, self.options.recursive, classifier);

        if self.options.workers <= 1 {
            return self.for_each_entry(&scanner, |entry, _| {
                processor.handle(entry);
                Ok(())
            });
        }

        let handler = {
            let processor = Arc::clone(processor);
            Arc::new(move |job: TransferJob| processor.handle(job.entry))
        };
        let pool = ParallelExecutor::new(
            self.options.workers,
            self.options.workers * QUEUE_DEPTH_PER_WORKER,
            handler,
            self.cancel.clone(),
        )?;

        let dispatched = self.for_each_entry(&scanner, |entry, index| {
            pool.enqueue(TransferJob { index, entry })
        });
        let stats = pool.close_and_wait()?;
        debug!(
            completed = stats.completed,
            abandoned = stats.abandoned,
            panicked = stats.panicked,
            "worker pool drained"
        );
        dispatched
    }

    /// Walk the scan, feeding entries to `sink` until done or cancelled
    fn for_each_entry<F>(&self, scanner: &DirectoryScanner, mut sink: F) -> Result<(), SortError>
    where
        F: FnMut(FileEntry, usize) -> Result<(), SortError>,
    {
        let mut index = 0usize;
        for item in scanner.scan() {
            if self.cancel.is_cancelled() {
                debug!("cancellation requested; stopping dispatch");
                break;
            }

            match item {
                Ok(entry) => {
                    sink(entry, index)?;
                    index += 1;
                }
                Err(e) => {
                    warn!("{}", e);
                    self.tracker.record_scan_error(&e);
                }
            }
        }
        info!(files = index, "scan finished");
        Ok(())
    }

    fn run_cleanup(&self) {
        let report = if self.options.dry_run {
            let vacated: HashSet<PathBuf> = self
                .tracker
                .records()
                .into_iter()
                .filter(|r| r.outcome == Outcome::Moved)
                .map(|r| r.source)
                .collect();
            self.cleanup
                .clone()
                .dry_run(vacated)
                .cleanup(&self.source, self.options.cleanup_recursive)
        } else {
            self.cleanup
                .cleanup(&self.source, self.options.cleanup_recursive)
        };

        self.tracker.record_cleanup(&report);
    }
}

/// Organize `source` into `destination` in one call
pub fn organize(
    source: &Path,
    destination: &Path,
    options: OrganizeOptions,
) -> Result<ProgressSummary, SortError> {
    OrganizeEngine::new(source, destination, options)?.run()
}

/// Absolute form of `path` with its existing prefix canonicalized
///
/// The destination may not exist yet, so the nearest existing ancestor is
/// canonicalized and the missing tail appended.
fn resolve_destination(path: &Path) -> Result<PathBuf, SortError> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    let mut existing = absolute.as_path();
    let mut tail: Vec<Component<'_>> = Vec::new();
    loop {
        if let Ok(canonical) = fs::canonicalize(existing) {
            let mut resolved = canonical;
            for component in tail.iter().rev() {
                match component {
                    Component::ParentDir => {
                        resolved.pop();
                    }
                    Component::CurDir => {}
                    other => resolved.push(other.as_os_str()),
                }
            }
            return Ok(resolved);
        }

        match (existing.parent(), existing.components().next_back()) {
            (Some(parent), Some(last)) => {
                tail.push(last);
                existing = parent;
            }
            _ => return Ok(absolute),
        }
    }
}
