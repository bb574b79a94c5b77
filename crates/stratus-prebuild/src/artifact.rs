//! Artifact writing.
//!
//! Fragments are written to a temporary sibling first and only renamed
//! over the final path when the contents actually changed, so downstream
//! build systems never see half-written files and never rebuild on
//! byte-identical output. On a failed run the previous artifact stays
//! untouched.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Writes `contents` to `path` atomically; returns whether the file
/// changed.
pub fn write_if_changed(path: &Path, contents: &str) -> io::Result<bool> {
    if let Ok(existing) = fs::read_to_string(path) {
        if existing == contents {
            debug!(path = %path.display(), "artifact unchanged");
            return Ok(false);
        }
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let temp = temp_path(path);
    fs::write(&temp, contents)?;
    fs::rename(&temp, path)?;
    debug!(path = %path.display(), "artifact written");
    Ok(true)
}

/// Removes a generated artifact, ignoring files that do not exist.
pub fn remove(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err),
    }
}
