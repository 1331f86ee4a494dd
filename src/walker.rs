use crate::error::{PipelineError, Result};
use log::debug;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Recursive file enumerator.
///
/// The `FileWalker` descends every subdirectory under a root and returns each regular file as
/// a path relative to a declared base. The base is usually the root itself but may be any
/// ancestor of it.
///
/// Entries are returned sorted by file name within each directory. Callers should only rely
/// on that for display.
///
/// # Example
///
/// ```no_run
/// use openapi_content_pipeline::walker::FileWalker;
///
/// let pages = FileWalker::new("content/apis")
///     .with_extension("mdx")
///     .walk()
///     .unwrap();
/// println!("Found {} pages", pages.len());
/// ```
pub struct FileWalker {
    root: PathBuf,
    base: PathBuf,
    extension: Option<String>,
}

impl FileWalker {
    /// Creates a walker whose results are relative to `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            base: root.clone(),
            root,
            extension: None,
        }
    }

    /// Makes results relative to `base` instead of the root.
    pub fn relative_to(mut self, base: impl Into<PathBuf>) -> Self {
        self.base = base.into();
        self
    }

    /// Only keeps files with the given extension (without the dot).
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }

    /// Walks the tree and collects matching files.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Walk`] if the root does not exist or any directory under it
    /// cannot be read, and [`PipelineError::Validation`] if a file is not under the base. No
    /// partial result is returned.
    pub fn walk(&self) -> Result<Vec<PathBuf>> {
        debug!("Walking {}", self.root.display());
        let mut files = Vec::new();

        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = entry.map_err(|e| PipelineError::Walk {
                path: e
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| self.root.clone()),
                source: e,
            })?;

            let path = entry.path();
            if !path.is_file() || !self.matches_extension(path) {
                continue;
            }

            let relative = path.strip_prefix(&self.base).map_err(|_| {
                PipelineError::Validation(format!(
                    "{} is not under {}",
                    path.display(),
                    self.base.display()
                ))
            })?;
            files.push(relative.to_path_buf());
        }

        debug!("Found {} files under {}", files.len(), self.root.display());
        Ok(files)
    }

    fn matches_extension(&self, path: &Path) -> bool {
        match &self.extension {
            Some(wanted) => path.extension().and_then(|s| s.to_str()) == Some(wanted.as_str()),
            None => true,
        }
    }
}

/// Every regular file under `root`, relative to `base`.
pub fn list_files(root: &Path, base: &Path) -> Result<Vec<PathBuf>> {
    FileWalker::new(root).relative_to(base).walk()
}
