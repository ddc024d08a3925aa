//! Empty directory cleanup
//!
//! After files have been moved out of the source tree, the directories they
//! lived in are often left empty. [`CleanupEngine`] walks the tree bottom-up
//! and removes every directory that no longer holds anything, never touching
//! the root itself or a directory whose name matches an ignore pattern.

use crate::types::SortError;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Result of one cleanup pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    /// Removed directories, deepest first
    pub removed: Vec<PathBuf>,
    /// Directories found removable
    pub found: u64,
    /// Directories that could not be read or removed
    pub errors: u64,
}

/// A directory and whether anything was left inside it
#[derive(Debug)]
struct DirectoryNode {
    occupied: bool,
}

/// Removes empty directories under a root
#[derive(Debug, Clone)]
pub struct CleanupEngine {
    ignore: GlobSet,
    dry_run: bool,
    vacated: HashSet<PathBuf>,
}

impl CleanupEngine {
    /// Build an engine whose ignore set matches directory names
    pub fn new<S: AsRef<str>>(ignore_patterns: &[S]) -> Result<Self, SortError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in ignore_patterns {
            let pattern = pattern.as_ref();
            let glob = Glob::new(pattern).map_err(|e| {
                SortError::Config(format!("Invalid ignore pattern '{}': {}", pattern, e))
            })?;
            builder.add(glob);
        }

        let ignore = builder
            .build()
            .map_err(|e| SortError::Config(format!("Failed to build ignore patterns: {}", e)))?;

        Ok(Self {
            ignore,
            dry_run: false,
            vacated: HashSet::new(),
        })
    }

    /// Report removals without touching the disk
    ///
    /// `vacated` lists files a dry run would have moved away; they do not
    /// keep their directory occupied.
    pub fn dry_run(mut self, vacated: HashSet<PathBuf>) -> Self {
        self.dry_run = true;
        self.vacated = vacated;
        self
    }

    /// Whether a directory name is protected from removal
    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignore.is_match(name)
    }

    /// Clean `root`
    ///
    /// With `recursive` off only direct children of `root` are candidates,
    /// and a child holding any subdirectory is kept.
    pub fn cleanup(&self, root: &Path, recursive: bool) -> CleanupReport {
        let mut report = CleanupReport::default();
        self.visit(root, root, true, recursive, &mut report);

        info!(
            root = %root.display(),
            found = report.found,
            removed = report.removed.len(),
            errors = report.errors,
            dry_run = self.dry_run,
            "cleanup finished"
        );
        report
    }

    fn visit(
        &self,
        dir: &Path,
        root: &Path,
        descend: bool,
        recursive: bool,
        report: &mut CleanupReport,
    ) -> DirectoryNode {
        let mut node = DirectoryNode { occupied: false };

        let mut children = match read_children(dir) {
            Ok(children) => children,
            Err(e) => {
                warn!(path = %dir.display(), error = %e, "cannot read directory during cleanup");
                report.errors += 1;
                return DirectoryNode { occupied: true };
            }
        };
        children.sort_by(|a, b| a.0.cmp(&b.0));

        for (path, is_dir) in children {
            if !is_dir {
                if !self.vacated.contains(&path) {
                    node.occupied = true;
                }
                continue;
            }

            let ignored = path
                .file_name()
                .map(|n| self.is_ignored(&n.to_string_lossy()))
                .unwrap_or(false);

            if ignored || !descend {
                node.occupied = true;
                continue;
            }

            let child = self.visit(&path, root, recursive, recursive, report);
            if child.occupied {
                node.occupied = true;
            }
        }

        if dir == root || node.occupied {
            return node;
        }

        report.found += 1;

        if self.dry_run {
            debug!(path = %dir.display(), "dry run: would remove empty directory");
            report.removed.push(dir.to_path_buf());
            return node;
        }

        match fs::remove_dir(dir) {
            Ok(()) => {
                debug!(path = %dir.display(), "removed empty directory");
                report.removed.push(dir.to_path_buf());
            }
            Err(e) => {
                let err = SortError::Cleanup {
                    path: dir.to_path_buf(),
                    source: e,
                };
                warn!("{}", err);
                report.errors += 1;
                node.occupied = true;
            }
        }

        node
    }
}

/// `(path, is_dir)` for every entry; symlinks count as files
fn read_children(dir: &Path) -> std::io::Result<Vec<(PathBuf, bool)>> {
    let mut children = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let is_dir = entry.file_type()?.is_dir();
        children.push((entry.path(), is_dir));
    }
    Ok(children)
}

/// One-shot cleanup with the given ignore patterns
pub fn cleanup_empty_directories<S: AsRef<str>>(
    root: &Path,
    recursive: bool,
    ignore_patterns: &[S],
) -> Result<CleanupReport, SortError> {
    Ok(CleanupEngine::new(ignore_patterns)?.cleanup(root, recursive))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DEFAULT_IGNORE_PATTERNS;
    use tempfile::TempDir;

    fn engine() -> CleanupEngine {
        CleanupEngine::new(DEFAULT_IGNORE_PATTERNS).expect("default patterns are valid")
    }

    #[test]
    fn test_invalid_pattern_is_config_error() {
        let result = CleanupEngine::new(&["[unclosed"]);
        assert!(matches!(result, Err(SortError::Config(_))));
    }

    #[test]
    fn test_glob_patterns_match_names() {
        let engine = CleanupEngine::new(&["keep-*", ".git"]).expect("valid patterns");
        assert!(engine.is_ignored("keep-me"));
        assert!(engine.is_ignored(".git"));
        assert!(!engine.is_ignored("remove-me"));
    }

    #[test]
    fn test_removes_nested_empty_directories_bottom_up() {
        let temp = TempDir::new().expect("create tempdir");
        let root = temp.path();
        fs::create_dir_all(root.join("a/b/c")).expect("mkdir");

        let report = engine().cleanup(root, true);

        assert_eq!(report.found, 3);
        assert_eq!(
            report.removed,
            vec![root.join("a/b/c"), root.join("a/b"), root.join("a")]
        );
        assert!(!root.join("a").exists());
        assert!(root.exists(), "root is never removed");
    }

    #[test]
    fn test_directories_with_files_survive() {
        let temp = TempDir::new().expect("create tempdir");
        let root = temp.path();
        fs::create_dir_all(root.join("full/empty")).expect("mkdir");
        fs::write(root.join("full/file.txt"), "x").expect("write");

        let report = engine().cleanup(root, true);

        assert_eq!(report.removed, vec![root.join("full/empty")]);
        assert!(root.join("full/file.txt").exists());
    }

    #[test]
    fn test_ignored_directories_are_kept_and_keep_parent() {
        let temp = TempDir::new().expect("create tempdir");
        let root = temp.path();
        fs::create_dir_all(root.join("project/.git")).expect("mkdir");
        fs::create_dir_all(root.join("node_modules")).expect("mkdir");

        let report = engine().cleanup(root, true);

        assert!(report.removed.is_empty());
        assert!(root.join("project/.git").exists());
        assert!(root.join("node_modules").exists());
    }

    #[test]
    fn test_non_recursive_only_removes_direct_empty_children() {
        let temp = TempDir::new().expect("create tempdir");
        let root = temp.path();
        fs::create_dir(root.join("empty")).expect("mkdir");
        fs::create_dir_all(root.join("outer/inner")).expect("mkdir");

        let report = engine().cleanup(root, false);

        assert_eq!(report.removed, vec![root.join("empty")]);
        assert!(root.join("outer/inner").exists());
    }

    #[test]
    fn test_dry_run_reports_without_removing() {
        let temp = TempDir::new().expect("create tempdir");
        let root = temp.path();
        fs::create_dir_all(root.join("photos/2024")).expect("mkdir");
        fs::write(root.join("photos/2024/a.jpg"), "img").expect("write");
        fs::create_dir(root.join("docs")).expect("mkdir");
        fs::write(root.join("docs/keep.txt"), "txt").expect("write");

        let vacated: HashSet<PathBuf> = [root.join("photos/2024/a.jpg")].into_iter().collect();
        let report = engine().dry_run(vacated).cleanup(root, true);

        assert_eq!(
            report.removed,
            vec![root.join("photos/2024"), root.join("photos")]
        );
        assert_eq!(report.found, 2);
        assert!(root.join("photos/2024/a.jpg").exists());
    }

    #[test]
    fn test_free_function_wraps_engine() {
        let temp = TempDir::new().expect("create tempdir");
        let root = temp.path();
        fs::create_dir(root.join("gone")).expect("mkdir");

        let report = cleanup_empty_directories(root, true, DEFAULT_IGNORE_PATTERNS)
            .expect("cleanup");
        assert_eq!(report.removed.len(), 1);
    }

    #[test]
    #[cfg(unix)]
    fn test_unreadable_directory_counts_error_and_is_kept() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().expect("create tempdir");
        let root = temp.path();
        let locked = root.join("locked");
        fs::create_dir_all(locked.join("inner")).expect("mkdir");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).expect("chmod");

        // Root ignores permission bits; nothing to assert there
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).expect("chmod");
            return;
        }

        let report = engine().cleanup(root, true);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).expect("chmod");

        assert_eq!(report.errors, 1);
        assert!(report.removed.is_empty());
        assert!(locked.exists());
    }
}
