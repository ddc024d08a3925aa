//! Content comparison with a cached source digest

use crate::hash::compute_hash;
use crate::types::{FileEntry, SortError};
use std::fs;
use std::path::Path;

/// Compares one source file against any number of existing files
///
/// The source digest is computed at most once, and only when some
/// candidate has the same size.
pub(crate) struct SourceComparer<'a> {
    entry: &'a FileEntry,
    source_hash: Option<[u8; 32]>,
}

impl<'a> SourceComparer<'a> {
    pub(crate) fn new(entry: &'a FileEntry) -> Self {
        Self {
            entry,
            source_hash: None,
        }
    }

    /// Whether `existing` holds the same bytes as the source
    pub(crate) fn matches(&mut self, existing: &Path) -> Result<bool, SortError> {
        let existing_size = fs::metadata(existing)
            .map(|m| m.len())
            .map_err(|source| SortError::Hash {
                path: existing.to_path_buf(),
                source,
            })?;

        if existing_size != self.entry.size {
            return Ok(false);
        }

        let source_hash = match self.source_hash {
            Some(hash) => hash,
            None => {
                let hash = compute_hash(&self.entry.path)?;
                self.source_hash = Some(hash);
                hash
            }
        };

        Ok(compute_hash(existing)? == source_hash)
    }

    #[cfg(test)]
    fn hashed(&self) -> bool {
        self.source_hash.is_some()
    }
}
