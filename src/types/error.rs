//! Error types for sortfiles

use std::path::PathBuf;
use thiserror::Error;

/// Error types for organize runs
#[derive(Debug, Error)]
pub enum SortError {
    /// Standard IO error (automatically converted via #[from])
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration or source/destination pair
    #[error("Configuration error: {0}")]
    Config(String),

    /// Directory or entry could not be read during the scan
    #[error("Scan error{}: {message}", display_path(.path))]
    Scan {
        path: Option<PathBuf>,
        message: String,
    },

    /// File became unreadable while computing its digest
    #[error("Hash error: {path}: {source}")]
    Hash {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Copy, move or source removal failed
    #[error("Transfer error: {path}: {source}")]
    Transfer {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Empty directory could not be removed
    #[error("Cleanup error: {path}: {source}")]
    Cleanup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Destination root could not be created
    #[error("Destination is not writable: {path}: {source}")]
    DestinationUnwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn display_path(path: &Option<PathBuf>) -> String {
    match path {
        Some(p) => format!(" at {}", p.display()),
        None => String::new(),
    }
}

impl SortError {
    pub(crate) fn transfer(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SortError::Transfer {
            path: path.into(),
            source,
        }
    }
}
