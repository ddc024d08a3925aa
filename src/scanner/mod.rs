//! Source tree scanning

mod walker;

pub use walker::{DirectoryScanner, ScanIter};
