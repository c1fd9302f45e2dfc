//! Artifact writing.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::info;

use crate::error::{AnalysisError, Result};

/// Returns the directory `path` will be written into, failing if it does not exist.
///
/// Callers producing several artifacts check every destination before writing any.
///
/// # Errors
///
/// [`AnalysisError::MissingInput`] naming the missing directory.
pub fn check_destination(path: &Path) -> Result<&Path> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    if dir.is_dir() {
        Ok(dir)
    } else {
        Err(AnalysisError::MissingInput {
            path: dir.to_path_buf(),
        })
    }
}

/// Writes `contents` to `path` as one unit.
///
/// The text goes to a temporary file in the destination directory, which is then
/// renamed over `path`. On error the destination is left untouched and the
/// temporary file is removed.
///
/// # Errors
///
/// [`AnalysisError::MissingInput`] if the destination directory does not exist,
/// [`AnalysisError::Io`] if writing or renaming fails.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let dir = check_destination(path)?;
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| AnalysisError::io(dir, e))?;
    tmp.write_all(contents.as_bytes())
        .and_then(|()| tmp.flush())
        .map_err(|e| AnalysisError::io(tmp.path(), e))?;
    let _ = tmp
        .persist(path)
        .map_err(|e| AnalysisError::io(path, e.error))?;

    info!(path = %path.display(), bytes = contents.len(), "wrote artifact");
    Ok(())
}
