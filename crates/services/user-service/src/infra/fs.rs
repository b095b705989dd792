//! Store file primitives.
//!
//! Writes use temp -> rename so a destination is never observed half
//! written: the temporary file lives in the destination directory (same
//! file system), is flushed to disk, then renamed over the destination.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use common::{AppError, AppResult};

/// Read a whole store file. A missing file is an I/O failure.
pub fn read_file(path: &Path) -> AppResult<Vec<u8>> {
    fs::read(path).map_err(|e| AppError::io("read", path, e))
}

/// Create an empty file at `path` unless one already exists.
///
/// Returns `true` if the file was created.
pub fn ensure_file(path: &Path) -> AppResult<bool> {
    if path.exists() {
        return Ok(false);
    }
    atomic_write(path, &[])?;
    Ok(true)
}

/// Atomically replace `target_path` with `content`.
pub fn atomic_write(target_path: &Path, content: &[u8]) -> AppResult<()> {
    atomic_write_with(target_path, content, |_| Ok(()))
}

/// Atomically replace `target_path`, running `before_rename` once the
/// temporary file is fully written and synced.
///
/// If `before_rename` fails, the temporary file is removed and the
/// destination is left exactly as it was.
pub fn atomic_write_with<F>(target_path: &Path, content: &[u8], before_rename: F) -> AppResult<()>
where
    F: FnOnce(&Path) -> io::Result<()>,
{
    let dir = match target_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    fs::create_dir_all(dir).map_err(|e| AppError::io("create_dir", dir, e))?;

    let mut temp = NamedTempFile::new_in(dir).map_err(|e| AppError::io("create_temp", dir, e))?;
    temp.write_all(content)
        .map_err(|e| AppError::io("write_temp", temp.path(), e))?;
    temp.as_file()
        .sync_all()
        .map_err(|e| AppError::io("sync_temp", temp.path(), e))?;

    before_rename(temp.path()).map_err(|e| AppError::io("before_rename", target_path, e))?;

    temp.persist(target_path)
        .map_err(|e| AppError::io("rename", target_path, e.error))?;

    tracing::trace!("Replaced {} ({} bytes)", target_path.display(), content.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn leftover_files(dir: &Path) -> usize {
        fs::read_dir(dir).unwrap().filter_map(|e| e.ok()).count()
    }

    #[test]
    fn test_atomic_write() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("users.txt");

        atomic_write(&target, b"hello").unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"hello");

        atomic_write(&target, b"replaced").unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"replaced");
    }

    #[test]
    fn test_atomic_write_creates_parent() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("data").join("users.txt");

        atomic_write(&target, b"nested").unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"nested");
    }

    #[test]
    fn test_no_temp_files_after_write() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("users.txt");

        atomic_write(&target, b"clean").unwrap();
        assert_eq!(leftover_files(temp_dir.path()), 1);
    }

    #[test]
    fn test_failure_before_rename_keeps_destination() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("users.txt");
        atomic_write(&target, b"original").unwrap();

        let result = atomic_write_with(&target, b"new content", |temp_path| {
            assert_eq!(fs::read(temp_path)?, b"new content");
            Err(io::Error::new(io::ErrorKind::Other, "simulated crash"))
        });

        assert!(matches!(result, Err(AppError::Io { op: "before_rename", .. })));
        assert_eq!(fs::read(&target).unwrap(), b"original");
        assert_eq!(leftover_files(temp_dir.path()), 1);
    }

    #[test]
    fn test_read_missing_file_is_io_failure() {
        let temp_dir = TempDir::new().unwrap();
        let result = read_file(&temp_dir.path().join("missing.txt"));

        assert!(matches!(result, Err(AppError::Io { op: "read", .. })));
    }

    #[test]
    fn test_ensure_file_does_not_truncate() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("users.txt");

        assert!(ensure_file(&target).unwrap());
        atomic_write(&target, b"data").unwrap();
        assert!(!ensure_file(&target).unwrap());
        assert_eq!(fs::read(&target).unwrap(), b"data");
    }
}
