//! Rename candidates for occupied destinations

use std::path::{Path, PathBuf};

/// Upper bound on `_<n>` suffixes tried before a file fails
pub const MAX_RENAME_ATTEMPTS: u32 = 1000;

/// `dir/stem.ext` becomes `dir/stem_<n>.ext`
///
/// Only the last extension is kept after the suffix, so `backup.tar.gz`
/// becomes `backup.tar_1.gz`. Names without an extension (including
/// dotfiles) get the suffix appended.
pub fn candidate_name(natural: &Path, n: u32) -> PathBuf {
    let stem = natural
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let name = match natural.extension() {
        Some(ext) => format!("{}_{}.{}", stem, n, ext.to_string_lossy()),
        None => format!("{}_{}", stem, n),
    };

    natural.with_file_name(name)
}

/// Candidates in probing order
pub fn candidates(natural: &Path) -> impl Iterator<Item = PathBuf> + '_ {
    (1..=MAX_RENAME_ATTEMPTS).map(move |n| candidate_name(natural, n))
}
