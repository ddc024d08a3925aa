//! Per-destination claim table
//!
//! Two files bound for the same destination path must not be resolved and
//! written at the same time. A worker claims the path before looking at it and
//! keeps the claim until its transfer is done; a second claimant blocks until
//! the first guard drops.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Condvar, Mutex, PoisonError};

#[derive(Debug, Default)]
struct ClaimTable {
    held: Mutex<HashSet<PathBuf>>,
    released: Condvar,
}

/// Shared set of destination paths currently being worked on
#[derive(Debug, Clone, Default)]
pub struct DestinationClaims {
    inner: Arc<ClaimTable>,
}

impl DestinationClaims {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `path`, blocking while another holder has it
    pub fn acquire(&self, path: &Path) -> ClaimGuard {
        let mut held = self
            .inner
            .held
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        while held.contains(path) {
            held = self
                .inner
                .released
                .wait(held)
                .unwrap_or_else(PoisonError::into_inner);
        }
        held.insert(path.to_path_buf());

        ClaimGuard {
            table: Arc::clone(&self.inner),
            path: path.to_path_buf(),
        }
    }

    /// Number of paths currently claimed
    pub fn held_count(&self) -> usize {
        self.inner
            .held
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Releases its path on drop
#[derive(Debug)]
pub struct ClaimGuard {
    table: Arc<ClaimTable>,
    path: PathBuf,
}

impl Drop for ClaimGuard {
    fn drop(&mut self) {
        let mut held = self
            .table
            .held
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        held.remove(&self.path);
        drop(held);
        self.table.released.notify_all();
    }
}
