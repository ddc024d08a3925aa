//! View of which destination paths are taken

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Answers "what content sits at this destination path?"
///
/// A live index just looks at the disk. A staged index also remembers the
/// targets a dry run decided to write, mapped to the source file that would
/// have been placed there, so later files in the same dry run resolve
/// exactly as they would in a real run.
#[derive(Debug)]
pub struct DestinationIndex {
    staged: Option<Mutex<HashMap<PathBuf, PathBuf>>>,
}

impl DestinationIndex {
    /// Disk-only index for real runs
    pub fn live() -> Self {
        Self { staged: None }
    }

    /// Index that also tracks dry-run placements
    pub fn staged() -> Self {
        Self {
            staged: Some(Mutex::new(HashMap::new())),
        }
    }

    /// Path whose bytes occupy `dest`, if any
    ///
    /// Staged placements shadow the disk.
    pub fn lookup(&self, dest: &Path) -> Option<PathBuf> {
        if let Some(staged) = &self.staged {
            let map = staged.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(source) = map.get(dest) {
                return Some(source.clone());
            }
        }

        // symlink_metadata so a dangling link still counts as taken
        match std::fs::symlink_metadata(dest) {
            Ok(_) => Some(dest.to_path_buf()),
            Err(_) => None,
        }
    }

    /// Record that `source` would now occupy `dest`
    ///
    /// A no-op on a live index.
    pub fn stage(&self, dest: &Path, source: &Path) {
        if let Some(staged) = &self.staged {
            staged
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(dest.to_path_buf(), source.to_path_buf());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_live_index_reflects_disk() {
        let temp = tempfile::tempdir().expect("create tempdir");
        let taken = temp.path().join("taken.txt");
        fs::write(&taken, "x").expect("write");

        let index = DestinationIndex::live();
        assert_eq!(index.lookup(&taken), Some(taken.clone()));
        assert_eq!(index.lookup(&temp.path().join("free.txt")), None);

        index.stage(&temp.path().join("free.txt"), &taken);
        assert_eq!(index.lookup(&temp.path().join("free.txt")), None);
    }

    #[test]
    fn test_staged_index_remembers_placements() {
        let temp = tempfile::tempdir().expect("create tempdir");
        let source = temp.path().join("a.jpg");
        let dest = temp.path().join("images/a.jpg");

        let index = DestinationIndex::staged();
        assert_eq!(index.lookup(&dest), None);

        index.stage(&dest, &source);
        assert_eq!(index.lookup(&dest), Some(source));
        assert!(!dest.exists());
    }
}
