use crate::error::{PipelineError, Result};
use log::debug;
use std::fs;
use std::path::Path;

/// Makes sure `path` and all of its missing ancestors exist.
///
/// Succeeds silently when the directory is already there.
///
/// # Errors
///
/// Returns [`PipelineError::Io`] on permission or filesystem errors, including when `path`
/// exists but is not a directory.
pub fn ensure_directory(path: &Path) -> Result<()> {
    if path.is_dir() {
        return Ok(());
    }
    debug!("Creating directory {}", path.display());
    fs::create_dir_all(path).map_err(|e| PipelineError::io(path, e))
}
