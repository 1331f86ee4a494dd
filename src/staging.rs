//! Optional import of newly dropped specs from a staging directory.
//!
//! Runs to completion before any generation starts, so a failed generation can simply be
//! retried against the spec root.

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::fs_util::ensure_directory;
use crate::walker::FileWalker;
use log::{debug, info};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Moves every file under `staging_dir` to the same relative path under the spec root.
///
/// `staging_dir` is resolved against the config root. Existing files in the spec root are
/// replaced. A missing staging directory means there is nothing to import.
///
/// # Returns
///
/// Returns the moved files, relative to the spec root.
pub fn import_staged(config: &PipelineConfig, staging_dir: &Path) -> Result<Vec<PathBuf>> {
    let staging_root = config.root.join(staging_dir);
    if !staging_root.exists() {
        debug!("No staging directory at {}", staging_root.display());
        return Ok(Vec::new());
    }

    let specs_root = config.specs_root();
    let staged = FileWalker::new(&staging_root).walk()?;
    for relative in &staged {
        let source = staging_root.join(relative);
        let target = specs_root.join(relative);
        if let Some(parent) = target.parent() {
            ensure_directory(parent)?;
        }
        move_file(&source, &target)?;
        debug!("Moved {} -> {}", source.display(), target.display());
    }

    if !staged.is_empty() {
        info!(
            "Imported {} staged spec files into {}",
            staged.len(),
            specs_root.display()
        );
    }
    Ok(staged)
}

fn move_file(source: &Path, target: &Path) -> Result<()> {
    match fs::rename(source, target) {
        Ok(()) => Ok(()),
        Err(e) if is_cross_device(&e) => {
            debug!("{} is on another filesystem, copying", source.display());
            fs::copy(source, target).map_err(|e| PipelineError::io(target, e))?;
            fs::remove_file(source).map_err(|e| PipelineError::io(source, e))
        }
        Err(e) => Err(PipelineError::io(source, e)),
    }
}

/// EXDEV on unix, ERROR_NOT_SAME_DEVICE on windows.
fn is_cross_device(err: &io::Error) -> bool {
    const CROSS_DEVICE: i32 = if cfg!(windows) { 17 } else { 18 };
    err.raw_os_error() == Some(CROSS_DEVICE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_import_moves_files_into_spec_root() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("generate-content/a")).unwrap();
        fs::write(root.join("generate-content/a/x.yaml"), "openapi: 3.0.0").unwrap();
        fs::write(root.join("generate-content/top.json"), "{}").unwrap();

        let config = PipelineConfig::new(root);
        let mut moved = import_staged(&config, Path::new("generate-content")).unwrap();
        moved.sort();

        assert_eq!(moved, vec![PathBuf::from("a/x.yaml"), PathBuf::from("top.json")]);
        assert_eq!(
            fs::read_to_string(root.join("specs/a/x.yaml")).unwrap(),
            "openapi: 3.0.0"
        );
        assert!(root.join("specs/top.json").is_file());
        assert!(!root.join("generate-content/a/x.yaml").exists());
    }

    #[test]
    fn test_import_replaces_existing_spec() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("staging")).unwrap();
        fs::create_dir_all(root.join("specs")).unwrap();
        fs::write(root.join("specs/x.yaml"), "old").unwrap();
        fs::write(root.join("staging/x.yaml"), "new").unwrap();

        import_staged(&PipelineConfig::new(root), Path::new("staging")).unwrap();

        assert_eq!(fs::read_to_string(root.join("specs/x.yaml")).unwrap(), "new");
    }

    #[test]
    fn test_failed_move_reports_source() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("gone.yaml");
        let target = temp_dir.path().join("specs/gone.yaml");

        let err = move_file(&source, &target).unwrap_err();

        match err {
            PipelineError::Io { path, source: cause } => {
                assert_eq!(path, source);
                assert_eq!(cause.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {}", other),
        }
        assert!(!target.exists());
    }

    #[test]
    fn test_cross_device_detection() {
        let code = if cfg!(windows) { 17 } else { 18 };
        assert!(is_cross_device(&io::Error::from_raw_os_error(code)));
        assert!(!is_cross_device(&io::Error::new(io::ErrorKind::NotFound, "gone")));
    }

    #[test]
    fn test_missing_staging_dir_is_empty_import() {
        let temp_dir = TempDir::new().unwrap();
        let moved =
            import_staged(&PipelineConfig::new(temp_dir.path()), Path::new("staging")).unwrap();

        assert!(moved.is_empty());
        assert!(!temp_dir.path().join("specs").exists());
    }
}
