//! File helpers shared by every writer
//!
//!     Writes replace the target in three steps: rename the existing file to `<name>.bak`, write
//!     the new content, and on failure rename the backup back. The caller never sees a half
//!     written target.

use crate::error::FormatError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// `<path>.bak`
pub fn backup_path(path: &Path) -> PathBuf {
    append_extension(path, "bak")
}

/// `<path>.lock`, the sentinel yWriter places next to an open project.
pub fn lock_path(path: &Path) -> PathBuf {
    append_extension(path, "lock")
}

pub fn is_locked(path: &Path) -> bool {
    lock_path(path).is_file()
}

fn append_extension(path: &Path, extension: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}

/// Path for messages, with forward slashes.
pub fn norm_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Read a whole file, mapping a missing file to [`FormatError::NotFound`].
pub fn read_file(path: &Path) -> Result<Vec<u8>, FormatError> {
    if !path.is_file() {
        return Err(FormatError::NotFound(norm_path(path)));
    }
    fs::read(path).map_err(|e| {
        FormatError::ParseError(format!("Cannot read file: \"{}\" ({e}).", norm_path(path)))
    })
}

/// Replace `path` with `bytes`, keeping a backup of the previous file.
///
/// With `keep_backup` unset the backup is removed once the new file is in place.
pub fn write_with_backup(path: &Path, bytes: &[u8], keep_backup: bool) -> Result<(), FormatError> {
    let backup = backup_path(path);
    let backed_up = if path.is_file() {
        fs::rename(path, &backup).map_err(|e| {
            FormatError::WriteError(format!("Cannot overwrite file: \"{}\" ({e}).", norm_path(path)))
        })?;
        debug!(backup = %norm_path(&backup), "previous file backed up");
        true
    } else {
        false
    };

    if let Err(e) = fs::write(path, bytes) {
        if backed_up {
            if let Err(restore) = fs::rename(&backup, path) {
                warn!(error = %restore, "could not restore backup");
            }
        }
        return Err(FormatError::WriteError(format!(
            "\"{}\" ({e}).",
            norm_path(path)
        )));
    }

    if backed_up && !keep_backup {
        if let Err(e) = fs::remove_file(&backup) {
            warn!(error = %e, backup = %norm_path(&backup), "could not remove backup");
        }
    }
    Ok(())
}
