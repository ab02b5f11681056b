//! Ensures only one uniattend-server instance owns a data file.

use anyhow::{Context, Result};
use fs2::FileExt;
use std::ffi::OsString;
use std::fs::File;
use std::path::{Path, PathBuf};

/// A lock guard that releases the lock when dropped
pub struct LockGuard {
    _file: File,
}

fn lock_path(data_file: &Path) -> PathBuf {
    let mut path = OsString::from(data_file.as_os_str());
    path.push(".lock");
    PathBuf::from(path)
}

/// Acquire an exclusive lock next to `data_file`, failing if another
/// server already holds it
pub fn acquire_lock(data_file: &Path) -> Result<LockGuard> {
    let path = lock_path(data_file);
    let file = File::create(&path).context("Failed to create lock file")?;

    file.try_lock_exclusive().map_err(|_| {
        anyhow::anyhow!(
            "Another uniattend-server instance is already using {}.\n\
            If you believe this is an error, remove: {}",
            data_file.display(),
            path.display()
        )
    })?;

    Ok(LockGuard { _file: file })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_lock_on_same_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let data_file = dir.path().join("attendance.json");

        let guard = acquire_lock(&data_file).unwrap();
        assert!(acquire_lock(&data_file).is_err());

        drop(guard);
        assert!(acquire_lock(&data_file).is_ok());
    }
}
