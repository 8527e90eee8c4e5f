use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("target has no usable parent directory: {0}")]
    ParentDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Atomically replaces the file at `path` with `content`.
///
/// The content goes to a temp file in the target's directory, is flushed and
/// synced, then renamed over the target. A crash mid-write leaves the
/// previously durable file intact.
pub fn write_atomic(path: &Path, content: &str) -> Result<(), PersistError> {
    let dir = parent_dir(path);
    if dir.exists() {
        let meta = fs::metadata(&dir).map_err(|e| PersistError::ParentDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::ParentDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(&dir).map_err(|e| PersistError::ParentDir(e.to_string()))?;
    }

    let mut tmp = NamedTempFile::new_in(&dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()?;

    // Rename-over-existing is the atomicity guarantee; never unlink first.
    tmp.persist(path).map_err(|e| PersistError::Io(e.error))?;
    Ok(())
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
