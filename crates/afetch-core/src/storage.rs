//! Destination file lifecycle.
//!
//! The artifact is written to `<dest>.part`, synced, and atomically renamed
//! over the destination, so a failed write never leaves a partial file at
//! the final path. After the rename the size on disk is read back and
//! compared with the number of bytes written.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::PersistError;

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `a.jar` → `a.jar.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// Create the directory that will hold `final_path`, recursively.
pub fn ensure_parent_dir(final_path: &Path) -> Result<(), PersistError> {
    match final_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|source| PersistError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}

/// Write `bytes` to `final_path` atomically and verify the size on disk.
/// Returns the number of bytes persisted.
pub fn persist(final_path: &Path, bytes: &[u8]) -> Result<u64, PersistError> {
    ensure_parent_dir(final_path)?;

    let tp = temp_path(final_path);
    if let Err(e) = write_synced(&tp, bytes) {
        let _ = fs::remove_file(&tp);
        return Err(e);
    }

    if let Err(source) = fs::rename(&tp, final_path) {
        let _ = fs::remove_file(&tp);
        return Err(PersistError::Rename {
            from: tp,
            to: final_path.to_path_buf(),
            source,
        });
    }

    let expected = bytes.len() as u64;
    let actual = fs::metadata(final_path)
        .map_err(|source| PersistError::ReadBack {
            path: final_path.to_path_buf(),
            source,
        })?
        .len();
    if actual != expected {
        return Err(PersistError::SizeMismatch {
            path: final_path.to_path_buf(),
            expected,
            actual,
        });
    }

    tracing::debug!(path = %final_path.display(), bytes = actual, "artifact persisted");
    Ok(actual)
}

fn write_synced(path: &Path, bytes: &[u8]) -> Result<(), PersistError> {
    let write_err = |source| PersistError::Write {
        path: path.to_path_buf(),
        source,
    };
    let mut f = File::options()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map_err(write_err)?;
    f.write_all(bytes).map_err(write_err)?;
    f.sync_all().map_err(write_err)?;
    Ok(())
}
