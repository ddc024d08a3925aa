//! Duplicate resolution
//!
//! Decides what happens to a file whose natural destination may already be
//! taken. Content equality is judged by size first and blake3 digest second;
//! names alone never decide anything.

mod compare;
mod index;
mod rename;

pub use index::DestinationIndex;
pub use rename::{candidate_name, MAX_RENAME_ATTEMPTS};

use crate::executor::{ClaimGuard, DestinationClaims};
use crate::types::{Disposition, DuplicatePolicy, FileEntry, SortError};
use compare::SourceComparer;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Outcome of resolving one file
///
/// Holds the destination claims taken while resolving. They are released
/// when the resolution is dropped, which callers do after the transfer.
#[derive(Debug)]
pub struct Resolution {
    pub disposition: Disposition,
    _claims: Vec<ClaimGuard>,
}

impl Resolution {
    fn new(disposition: Disposition, claims: Vec<ClaimGuard>) -> Self {
        Self {
            disposition,
            _claims: claims,
        }
    }

    /// Path the transfer writes to, for dispositions that transfer
    pub fn target<'a>(&'a self, natural: &'a Path) -> Option<&'a Path> {
        match &self.disposition {
            Disposition::Proceed | Disposition::Overwrite => Some(natural),
            Disposition::Rename(to) => Some(to.as_path()),
            Disposition::SkipDuplicate(_) | Disposition::SkipConflict => None,
        }
    }
}

/// Resolves destinations against the index under a policy
#[derive(Debug, Clone)]
pub struct DuplicateResolver {
    policy: DuplicatePolicy,
    index: Arc<DestinationIndex>,
    claims: DestinationClaims,
}

impl DuplicateResolver {
    pub fn new(
        policy: DuplicatePolicy,
        index: Arc<DestinationIndex>,
        claims: DestinationClaims,
    ) -> Self {
        Self {
            policy,
            index,
            claims,
        }
    }

    /// Decide the disposition for `entry` bound for `natural`
    ///
    /// 1. Nothing at `natural` → `Proceed`
    /// 2. Same size and digest → `SkipDuplicate`
    /// 3. Otherwise the policy decides; `Rename` probes `<stem>_<n>.<ext>`
    pub fn resolve(&self, entry: &FileEntry, natural: &Path) -> Result<Resolution, SortError> {
        let natural_claim = self.claims.acquire(natural);

        let Some(existing) = self.index.lookup(natural) else {
            return Ok(Resolution::new(Disposition::Proceed, vec![natural_claim]));
        };

        let mut comparer = SourceComparer::new(entry);
        if comparer.matches(&existing)? {
            debug!(path = %entry.path.display(), "identical file already at destination");
            return Ok(Resolution::new(
                Disposition::SkipDuplicate(natural.to_path_buf()),
                vec![natural_claim],
            ));
        }

        match self.policy {
            DuplicatePolicy::Skip => Ok(Resolution::new(
                Disposition::SkipConflict,
                vec![natural_claim],
            )),
            DuplicatePolicy::Overwrite => Ok(Resolution::new(
                Disposition::Overwrite,
                vec![natural_claim],
            )),
            DuplicatePolicy::Rename => self.probe(entry, natural, natural_claim, &mut comparer),
        }
    }

    fn probe(
        &self,
        entry: &FileEntry,
        natural: &Path,
        natural_claim: ClaimGuard,
        comparer: &mut SourceComparer<'_>,
    ) -> Result<Resolution, SortError> {
        for candidate in rename::candidates(natural) {
            // Candidates are longer than `natural`, so holding both cannot deadlock
            let candidate_claim = self.claims.acquire(&candidate);

            match self.index.lookup(&candidate) {
                None => {
                    return Ok(Resolution::new(
                        Disposition::Rename(candidate),
                        vec![natural_claim, candidate_claim],
                    ));
                }
                Some(existing) => {
                    if comparer.matches(&existing)? {
                        debug!(
                            path = %entry.path.display(),
                            existing = %candidate.display(),
                            "identical file already at renamed destination"
                        );
                        return Ok(Resolution::new(
                            Disposition::SkipDuplicate(candidate),
                            vec![natural_claim, candidate_claim],
                        ));
                    }
                }
            }
        }

        Err(no_free_name(natural))
    }
}

fn no_free_name(natural: &Path) -> SortError {
    SortError::Transfer {
        path: PathBuf::from(natural),
        source: io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("no free name after {} attempts", MAX_RENAME_ATTEMPTS),
        ),
    }
}
