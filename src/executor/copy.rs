//! Atomic file copy implementation

use crate::types::SortError;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

const BUFFER_SIZE: usize = 128 * 1024;

/// Temp names tried before giving up on a destination directory
const MAX_PART_ATTEMPTS: u32 = 100;

/// Copy a file atomically using the write-then-rename strategy
///
/// 1. Create a fresh hidden `.<name>.part` file next to the target
/// 2. Flush and sync to disk
/// 3. Preserve metadata (permissions, mtime)
/// 4. Rename onto the final destination
///
/// The part file is created exclusively: a file already sitting at
/// `.<name>.part` is never opened, and the next free `.<name>.<n>.part` is
/// used instead. On any failure the part file is removed, so the
/// destination tree never holds a truncated file.
///
/// # Returns
/// * `Ok(u64)` - Number of bytes copied
/// * `Err(SortError::Transfer)` - the copy failed; `dest` is untouched
///
/// # Example
/// ```no_run
/// use sortfiles::executor::copy_file_atomic;
/// use std::path::Path;
///
/// let bytes = copy_file_atomic(Path::new("a.jpg"), Path::new("images/a.jpg"))?;
/// # Ok::<(), sortfiles::types::SortError>(())
/// ```
pub fn copy_file_atomic(src: &Path, dest: &Path) -> Result<u64, SortError> {
    // ═══════════════════════════════════════════════════════════
    // STEP 1: Prepare - Create parent directories and .part path
    // ═══════════════════════════════════════════════════════════
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|e| SortError::transfer(dest, e))?;
    }

    let (part_file, part_path) = create_part_file(dest)?;

    match write_part_and_commit(src, dest, part_file, &part_path) {
        Ok(bytes) => Ok(bytes),
        Err(e) => {
            // Never leave a partial artifact behind
            let _ = fs::remove_file(&part_path);
            Err(e)
        }
    }
}

/// Open a part file that did not exist before this call
fn create_part_file(dest: &Path) -> Result<(File, PathBuf), SortError> {
    for attempt in 0..MAX_PART_ATTEMPTS {
        let part_path = part_path_candidate(dest, attempt);
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&part_path)
        {
            Ok(file) => return Ok((file, part_path)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(SortError::transfer(dest, e)),
        }
    }

    Err(SortError::transfer(
        dest,
        io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("no free temp name after {} attempts", MAX_PART_ATTEMPTS),
        ),
    ))
}

fn write_part_and_commit(
    src: &Path,
    dest: &Path,
    mut part_file: File,
    part_path: &Path,
) -> Result<u64, SortError> {
    let src_err = |e| SortError::transfer(src, e);
    let dest_err = |e| SortError::transfer(dest, e);

    // ═══════════════════════════════════════════════════════════
    // STEP 2: Copy - Stream from src to .part file
    // ═══════════════════════════════════════════════════════════
    let mut src_file = File::open(src).map_err(src_err)?;

    let mut buffer = vec![0u8; BUFFER_SIZE];
    let mut total_bytes = 0u64;

    loop {
        let bytes_read = src_file.read(&mut buffer).map_err(src_err)?;

        if bytes_read == 0 {
            break; // EOF
        }

        part_file
            .write_all(&buffer[..bytes_read])
            .map_err(dest_err)?;
        total_bytes += bytes_read as u64;
    }

    // ═══════════════════════════════════════════════════════════
    // STEP 3: Flush - Force OS to write data to physical disk
    // ═══════════════════════════════════════════════════════════
    part_file.sync_all().map_err(dest_err)?;

    // Drop the file handle before rename (required on Windows)
    drop(part_file);

    // ═══════════════════════════════════════════════════════════
    // STEP 4: Metadata - Preserve permissions and mtime
    // ═══════════════════════════════════════════════════════════
    let src_metadata = fs::metadata(src).map_err(src_err)?;

    fs::set_permissions(part_path, src_metadata.permissions()).map_err(dest_err)?;

    let mtime = src_metadata.modified().map_err(src_err)?;
    filetime::set_file_mtime(part_path, filetime::FileTime::from_system_time(mtime))
        .map_err(dest_err)?;

    // ═══════════════════════════════════════════════════════════
    // STEP 5: Commit - Atomic rename to final destination
    // ═══════════════════════════════════════════════════════════
    fs::rename(part_path, dest).map_err(dest_err)?;

    Ok(total_bytes)
}

/// Preferred hidden temp path used while `dest` is being written
pub fn part_path_for(dest: &Path) -> PathBuf {
    part_path_candidate(dest, 0)
}

/// `.<name>.part`, then `.<name>.<n>.part`
fn part_path_candidate(dest: &Path, attempt: u32) -> PathBuf {
    let name = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if attempt == 0 {
        dest.with_file_name(format!(".{}.part", name))
    } else {
        dest.with_file_name(format!(".{}.{}.part", name, attempt))
    }
}
