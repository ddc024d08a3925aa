//! FileEntry - One discovered source file

use super::Category;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Represents a file found under the source root
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileEntry {
    /// Absolute path of the source file
    pub path: PathBuf,

    /// File size in bytes
    pub size: u64,

    /// Last modification time
    pub modified: SystemTime,

    /// Category assigned by the classifier
    pub category: Category,
}

impl FileEntry {
    /// Create a new FileEntry with the given parameters
    pub fn new(path: PathBuf, size: u64, modified: SystemTime, category: Category) -> Self {
        Self {
            path,
            size,
            modified,
            category,
        }
    }

    /// Final path component, used as the destination file name
    pub fn file_name(&self) -> Option<&std::ffi::OsStr> {
        self.path.file_name()
    }

    /// Natural destination: `<destination_root>/<category dir>/<file name>`
    pub fn destination_in(&self, destination_root: &Path) -> PathBuf {
        let dir = destination_root.join(self.category.dir_name());
        match self.file_name() {
            Some(name) => dir.join(name),
            None => dir,
        }
    }
}
