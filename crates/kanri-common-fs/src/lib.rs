//! File system utilities for Kanri.
//!
//! The entity store and audit ledger funnel all disk access through this
//! crate. Writes are atomic (temp file + rename) so a concurrent reader
//! never observes a partially written entity.

use kanri_common_core::{Error, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Read a file to string.
pub fn read_to_string(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    fs::read_to_string(path).map_err(|e| Error::io(path.display().to_string(), e))
}

/// Write to a file atomically (write to temp, then rename).
///
/// Creates missing parent directories. The temp file lives in the target's
/// directory so the rename stays on one filesystem.
pub fn write_atomic(path: impl AsRef<Path>, contents: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let parent = path.parent().unwrap_or(Path::new("."));
    ensure_dir(parent)?;

    let mut temp_path = path.to_path_buf();
    match path.file_name() {
        Some(name) => temp_path.set_file_name(format!(".{}.tmp", name.to_string_lossy())),
        None => temp_path.push(".tmp"),
    }

    {
        let mut file = File::create(&temp_path)
            .map_err(|e| Error::io(temp_path.display().to_string(), e))?;
        file.write_all(contents)
            .map_err(|e| Error::io(temp_path.display().to_string(), e))?;
        file.sync_all()
            .map_err(|e| Error::io(temp_path.display().to_string(), e))?;
    }

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        Error::io(path.display().to_string(), e)
    })
}

/// Write a string to a file atomically.
pub fn write_string_atomic(path: impl AsRef<Path>, contents: &str) -> Result<()> {
    write_atomic(path, contents.as_bytes())
}

/// Ensure a directory exists.
pub fn ensure_dir(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if !path.exists() {
        fs::create_dir_all(path).map_err(|e| Error::io(path.display().to_string(), e))?;
    }
    Ok(())
}

/// Delete a file if it exists. Returns whether anything was removed.
pub fn remove_file_if_exists(path: impl AsRef<Path>) -> Result<bool> {
    let path = path.as_ref();
    if path.exists() {
        fs::remove_file(path).map_err(|e| Error::io(path.display().to_string(), e))?;
        Ok(true)
    } else {
        Ok(false)
    }
}

/// Delete a directory and its contents if it exists.
pub fn remove_dir_if_exists(path: impl AsRef<Path>) -> Result<bool> {
    let path = path.as_ref();
    if path.exists() {
        fs::remove_dir_all(path).map_err(|e| Error::io(path.display().to_string(), e))?;
        Ok(true)
    } else {
        Ok(false)
    }
}

/// List regular files in a directory. Missing directory yields an empty list.
pub fn list_files(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let read_dir = fs::read_dir(dir).map_err(|e| Error::io(dir.display().to_string(), e))?;
    let mut files = Vec::new();
    for entry in read_dir {
        let entry = entry.map_err(|e| Error::io(dir.display().to_string(), e))?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }
    Ok(files)
}

/// List subdirectories of a directory. Missing directory yields an empty list.
pub fn list_dirs(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let read_dir = fs::read_dir(dir).map_err(|e| Error::io(dir.display().to_string(), e))?;
    let mut dirs = Vec::new();
    for entry in read_dir {
        let entry = entry.map_err(|e| Error::io(dir.display().to_string(), e))?;
        let path = entry.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    Ok(dirs)
}

/// File name without extension, as a string.
pub fn file_stem(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
}
