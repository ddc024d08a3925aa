//! Content hashing for duplicate detection

use crate::types::SortError;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const CHUNK_SIZE: usize = 64 * 1024;

/// Compute the Blake3 digest of a file
///
/// The file is streamed in 64KB chunks, so memory use does not grow with
/// file size.
///
/// # Example
/// ```no_run
/// use sortfiles::hash::compute_hash;
/// use std::path::Path;
///
/// let hash = compute_hash(Path::new("photo.jpg"))?;
/// # Ok::<(), sortfiles::types::SortError>(())
/// ```
pub fn compute_hash(file_path: &Path) -> Result<[u8; 32], SortError> {
    let hash_err = |source| SortError::Hash {
        path: file_path.to_path_buf(),
        source,
    };

    let mut file = File::open(file_path).map_err(hash_err)?;
    let mut hasher = blake3::Hasher::new();
    let mut buffer = vec![0u8; CHUNK_SIZE];

    loop {
        let bytes_read = file.read(&mut buffer).map_err(hash_err)?;

        if bytes_read == 0 {
            break; // EOF
        }

        hasher.update(&buffer[..bytes_read]);
    }

    Ok(*hasher.finalize().as_bytes())
}

/// Whether two files hold the same bytes
///
/// Sizes are compared first; the files are only hashed when they match.
pub fn files_identical(a: &Path, b: &Path) -> Result<bool, SortError> {
    let size_of = |path: &Path| {
        std::fs::metadata(path)
            .map(|m| m.len())
            .map_err(|source| SortError::Hash {
                path: path.to_path_buf(),
                source,
            })
    };

    if size_of(a)? != size_of(b)? {
        return Ok(false);
    }

    Ok(compute_hash(a)? == compute_hash(b)?)
}
