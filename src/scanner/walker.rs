//! Lazy directory walker

use crate::classify::Classifier;
use crate::types::{FileEntry, SortError};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Yields candidate files under a source root
///
/// Every call to [`DirectoryScanner::scan`] starts a fresh traversal.
/// Unreadable directories, symlink loops and unreadable metadata are yielded
/// as `SortError::Scan` items so the caller decides what to do with them; the
/// walk itself never aborts.
#[derive(Debug, Clone)]
pub struct DirectoryScanner {
    root: PathBuf,
    recursive: bool,
    classifier: Arc<Classifier>,
}

impl DirectoryScanner {
    pub fn new(root: impl Into<PathBuf>, recursive: bool, classifier: Arc<Classifier>) -> Self {
        Self {
            root: root.into(),
            recursive,
            classifier,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Start a traversal
    pub fn scan(&self) -> ScanIter {
        // Hidden files count; ignore files do not apply to organizing
        let mut builder = ignore::WalkBuilder::new(&self.root);
        builder
            .standard_filters(false)
            .hidden(false)
            .follow_links(true)
            .sort_by_file_name(|a, b| a.cmp(b));

        if !self.recursive {
            builder.max_depth(Some(1));
        }

        ScanIter {
            walk: builder.build(),
            classifier: Arc::clone(&self.classifier),
        }
    }
}

/// Iterator returned by [`DirectoryScanner::scan`]
pub struct ScanIter {
    walk: ignore::Walk,
    classifier: Arc<Classifier>,
}

impl Iterator for ScanIter {
    type Item = Result<FileEntry, SortError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.walk.next()? {
                Ok(entry) => entry,
                Err(e) => return Some(Err(scan_error(&e))),
            };

            // The root itself is never a candidate
            if entry.depth() == 0 {
                continue;
            }

            match entry.file_type() {
                Some(ft) if ft.is_file() => {}
                _ => continue, // Directories, pipes, sockets, devices
            }

            let metadata = match entry.metadata() {
                Ok(m) => m,
                Err(e) => return Some(Err(scan_error(&e))),
            };

            let modified = match metadata.modified() {
                Ok(t) => t,
                Err(e) => {
                    return Some(Err(SortError::Scan {
                        path: Some(entry.path().to_path_buf()),
                        message: format!("Failed to read modification time: {}", e),
                    }))
                }
            };

            let path = entry.into_path();
            let category = self.classifier.classify_path(&path);

            return Some(Ok(FileEntry::new(path, metadata.len(), modified, category)));
        }
    }
}

fn scan_error(err: &ignore::Error) -> SortError {
    let message = match err.io_error() {
        Some(io) => io.to_string(),
        None => err.to_string(),
    };

    SortError::Scan {
        path: error_path(err),
        message,
    }
}

fn error_path(err: &ignore::Error) -> Option<PathBuf> {
    match err {
        ignore::Error::WithPath { path, .. } => Some(path.clone()),
        ignore::Error::Loop { child, .. } => Some(child.clone()),
        ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
            error_path(err)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;
    use std::fs;
    use tempfile::TempDir;

    fn scanner(root: &Path, recursive: bool) -> DirectoryScanner {
        DirectoryScanner::new(root, recursive, Arc::new(Classifier::default()))
    }

    fn collect_ok(scanner: &DirectoryScanner) -> Vec<FileEntry> {
        scanner
            .scan()
            .collect::<Result<Vec<_>, _>>()
            .expect("scan should succeed")
    }

    #[test]
    fn test_scan_empty_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let entries = collect_ok(&scanner(temp_dir.path(), true));
        assert!(entries.is_empty(), "Empty dir should yield nothing");
    }

    #[test]
    fn test_scan_classifies_and_records_size() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path();
        fs::write(root.join("a.jpg"), vec![0u8; 10]).expect("Failed to write a.jpg");
        fs::write(root.join("b.mp3"), vec![1u8; 20]).expect("Failed to write b.mp3");

        let entries = collect_ok(&scanner(root, false));

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].path, root.join("a.jpg"));
        assert_eq!(entries[0].size, 10);
        assert_eq!(entries[0].category, Category::Image);
        assert_eq!(entries[1].category, Category::Audio);
        assert!(entries.iter().all(|e| e.path.is_absolute()));
    }

    #[test]
    fn test_non_recursive_only_sees_top_level() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path();
        fs::create_dir_all(root.join("nested/deeper")).expect("Failed to create dirs");
        fs::write(root.join("top.txt"), "top").expect("Failed to write");
        fs::write(root.join("nested/mid.txt"), "mid").expect("Failed to write");
        fs::write(root.join("nested/deeper/low.txt"), "low").expect("Failed to write");

        let flat = collect_ok(&scanner(root, false));
        assert_eq!(flat.len(), 1);
        assert_eq!(flat[0].path, root.join("top.txt"));

        let deep = collect_ok(&scanner(root, true));
        assert_eq!(deep.len(), 3);
    }

    #[test]
    fn test_hidden_and_gitignored_files_are_included() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path();
        fs::create_dir(root.join(".git")).expect("Failed to create .git");
        fs::write(root.join(".gitignore"), "*.log\n").expect("Failed to write .gitignore");
        fs::write(root.join("debug.log"), "log").expect("Failed to write");
        fs::write(root.join(".hidden.txt"), "hidden").expect("Failed to write");

        let names: Vec<_> = collect_ok(&scanner(root, false))
            .into_iter()
            .filter_map(|e| e.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect();

        assert!(names.contains(&"debug.log".to_string()));
        assert!(names.contains(&".hidden.txt".to_string()));
        assert!(names.contains(&".gitignore".to_string()));
    }

    #[test]
    fn test_order_is_deterministic() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path();
        for name in ["c.txt", "a.txt", "b.txt"] {
            fs::write(root.join(name), name).expect("Failed to write");
        }

        let first: Vec<_> = collect_ok(&scanner(root, false))
            .into_iter()
            .map(|e| e.path)
            .collect();
        let second: Vec<_> = collect_ok(&scanner(root, false))
            .into_iter()
            .map(|e| e.path)
            .collect();

        assert_eq!(first, second);
        assert_eq!(first[0], root.join("a.txt"));
    }

    #[test]
    #[cfg(unix)]
    fn test_symlink_loop_is_yielded_as_scan_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path();
        fs::create_dir(root.join("dir")).expect("Failed to create dir");
        fs::write(root.join("dir/file.txt"), "x").expect("Failed to write");
        std::os::unix::fs::symlink(root, root.join("dir/loop")).expect("Failed to symlink");

        let results: Vec<_> = scanner(root, true).scan().collect();

        assert!(results
            .iter()
            .any(|r| matches!(r, Err(SortError::Scan { .. }))));
        assert!(results
            .iter()
            .any(|r| matches!(r, Ok(e) if e.path.ends_with("file.txt"))));
    }

    #[test]
    #[cfg(unix)]
    fn test_broken_symlink_does_not_abort_scan() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path();
        fs::write(root.join("real.txt"), "real").expect("Failed to write");
        std::os::unix::fs::symlink(root.join("missing.txt"), root.join("broken.txt"))
            .expect("Failed to symlink");

        let ok: Vec<_> = scanner(root, false).scan().filter_map(Result::ok).collect();
        assert_eq!(ok.len(), 1);
        assert_eq!(ok[0].path, root.join("real.txt"));
    }
}
