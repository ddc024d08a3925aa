//! Executor module for file transfers

pub mod claims;
pub mod copy;
pub mod pool;

pub use claims::{ClaimGuard, DestinationClaims};
pub use copy::copy_file_atomic;
pub use pool::{JobHandler, ParallelExecutor, PoolStats, TransferJob};

use crate::resolver::DestinationIndex;
use crate::types::{FileEntry, Outcome, SortError};
use std::fs;
use std::io::{Error, ErrorKind};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// What a single transfer produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferResult {
    /// `Moved` or `Copied`
    pub outcome: Outcome,
    /// Bytes now present at the target
    pub bytes: u64,
    /// Non-fatal problem worth surfacing (e.g. a source that could not be removed)
    pub note: Option<String>,
}

impl TransferResult {
    fn new(outcome: Outcome, bytes: u64) -> Self {
        Self {
            outcome,
            bytes,
            note: None,
        }
    }
}

/// Moves or copies one file into the destination tree
///
/// In dry-run mode nothing on disk changes; the target is staged in the
/// shared [`DestinationIndex`] and the would-be result is returned.
#[derive(Debug, Clone)]
pub struct TransferExecutor {
    delete_source: bool,
    dry_run: bool,
    index: Arc<DestinationIndex>,
}

impl TransferExecutor {
    pub fn new(delete_source: bool, dry_run: bool, index: Arc<DestinationIndex>) -> Self {
        Self {
            delete_source,
            dry_run,
            index,
        }
    }

    /// Place `entry` at `target`
    ///
    /// The caller must hold the claim on `target` and must only call this
    /// when `target` is free or is to be overwritten.
    pub fn transfer(&self, entry: &FileEntry, target: &Path) -> Result<TransferResult, SortError> {
        let outcome = if self.delete_source {
            Outcome::Moved
        } else {
            Outcome::Copied
        };

        if self.dry_run {
            debug!(
                source = %entry.path.display(),
                target = %target.display(),
                "dry run: would {}",
                if self.delete_source { "move" } else { "copy" }
            );
            self.index.stage(target, &entry.path);
            return Ok(TransferResult::new(outcome, entry.size));
        }

        if self.delete_source {
            move_file(&entry.path, target)
        } else {
            copy_file_atomic(&entry.path, target).map(|bytes| TransferResult::new(outcome, bytes))
        }
    }
}

/// Move `src` to `dest`, falling back to copy + unlink across devices
///
/// A symlinked source always takes the copy path, so `dest` receives the
/// linked file's bytes and only the link is removed.
///
/// If the copy lands but the source cannot be removed the result is
/// `Copied` with a note.
pub fn move_file(src: &Path, dest: &Path) -> Result<TransferResult, SortError> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|e| SortError::transfer(dest, e))?;
    }

    let link_metadata = fs::symlink_metadata(src).map_err(|e| SortError::transfer(src, e))?;

    // Renaming a link would move the link, not the file it points at
    if link_metadata.file_type().is_symlink() {
        debug!(source = %src.display(), "source is a symlink, copying its target");
    } else {
        match fs::rename(src, dest) {
            Ok(()) => return Ok(TransferResult::new(Outcome::Moved, link_metadata.len())),
            Err(e) if is_cross_device(&e) => {
                debug!(source = %src.display(), "rename crosses devices, copying instead");
            }
            Err(e) => return Err(SortError::transfer(src, e)),
        }
    }

    let bytes = copy_file_atomic(src, dest)?;

    match fs::remove_file(src) {
        Ok(()) => Ok(TransferResult::new(Outcome::Moved, bytes)),
        Err(e) => {
            warn!(source = %src.display(), error = %e, "copied but could not remove source");
            Ok(TransferResult {
                outcome: Outcome::Copied,
                bytes,
                note: Some(format!("Failed to remove source after copy: {}", e)),
            })
        }
    }
}

fn is_cross_device(error: &Error) -> bool {
    error.kind() == ErrorKind::CrossesDevices
}
