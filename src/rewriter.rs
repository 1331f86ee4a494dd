//! Second-pass rewrite of document references in generated pages.
//!
//! Generated pages can point at their spec in two places:
//!
//! - the front matter: `document: "specs/pets.yaml"`
//! - the `APIPage` component: `<APIPage document={"specs/pets.yaml"} ... />`
//!
//! Any such reference still holding a local relative path is replaced by the spec's
//! raw-content URL. Values that already carry a URL scheme are left alone, so running the
//! rewriter again changes nothing.

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::pages::API_PAGE_COMPONENT;
use crate::paths::{derive_remote_url, is_absolute_url, to_url_path};
use log::{debug, info};
use regex::{Captures, Regex};
use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;
use std::thread;

fn front_matter_regex() -> &'static Regex {
    static FRONT_MATTER: OnceLock<Regex> = OnceLock::new();
    FRONT_MATTER.get_or_init(|| {
        Regex::new(r#"(?m)^(?P<head>document:[ \t]*)(?:"(?P<dq>[^"\n]*)"|'(?P<sq>[^'\n]*)')"#)
            .expect("Invalid regex")
    })
}

fn component_regex() -> &'static Regex {
    static COMPONENT: OnceLock<Regex> = OnceLock::new();
    COMPONENT.get_or_init(|| {
        let pattern = format!(
            r#"(?P<head><{}\b[^>]*?\bdocument=(?:\{{\s*)?)(?:"(?P<dq>[^"]*)"|'(?P<sq>[^']*)')"#,
            API_PAGE_COMPONENT
        );
        Regex::new(&pattern).expect("Invalid regex")
    })
}

/// Rewrites relative document references into raw-content URLs.
#[derive(Debug, Clone)]
pub struct UrlRewriter {
    remote_root: String,
    specs_root_name: String,
}

impl UrlRewriter {
    /// `remote_root` must be in raw-content form, e.g.
    /// `https://raw.githubusercontent.com/<owner>/<repo>/<ref>`.
    pub fn new(remote_root: impl Into<String>, specs_root_name: impl Into<String>) -> Self {
        Self {
            remote_root: remote_root.into(),
            specs_root_name: specs_root_name.into(),
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.remote.raw_root(), config.specs_root_name())
    }

    /// Remote URL for a relative document reference.
    ///
    /// Leading `./` and `../` segments are dropped, as is a leading spec-root segment, since
    /// the generator records the spec's local path (`specs/a/x.yaml`) rather than its path
    /// within the spec root.
    pub fn resolve(&self, relative: &str) -> String {
        let normalized = to_url_path(Path::new(relative));
        let within_specs = if self.specs_root_name.is_empty() {
            normalized.as_str()
        } else {
            normalized
                .strip_prefix(self.specs_root_name.as_str())
                .and_then(|rest| rest.strip_prefix('/'))
                .unwrap_or(normalized.as_str())
        };
        derive_remote_url(
            Path::new(within_specs),
            &self.remote_root,
            &self.specs_root_name,
        )
    }

    /// Returns `content` with every relative document reference replaced.
    pub fn rewrite_content(&self, content: &str) -> String {
        let content = front_matter_regex()
            .replace_all(content, |caps: &Captures<'_>| self.replace_match(caps));
        component_regex()
            .replace_all(&content, |caps: &Captures<'_>| self.replace_match(caps))
            .into_owned()
    }

    fn replace_match(&self, caps: &Captures<'_>) -> String {
        let (quote, value) = match (caps.name("dq"), caps.name("sq")) {
            (Some(value), _) => ('"', value.as_str()),
            (None, Some(value)) => ('\'', value.as_str()),
            (None, None) => return caps[0].to_string(),
        };
        if value.is_empty() || is_absolute_url(value) {
            return caps[0].to_string();
        }
        format!("{}{}{}{}", &caps["head"], quote, self.resolve(value), quote)
    }

    /// Rewrites one file in place. The file is only written when something changed.
    ///
    /// # Returns
    ///
    /// Returns `true` if the file was modified.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Rewrite`] if the file cannot be read or written.
    pub fn rewrite_file(&self, path: &Path) -> Result<bool> {
        let rewrite_error = |source| PipelineError::Rewrite {
            path: path.to_path_buf(),
            source,
        };

        let content = fs::read_to_string(path).map_err(rewrite_error)?;
        let updated = self.rewrite_content(&content);
        if updated == content {
            debug!("{} already up to date", path.display());
            return Ok(false);
        }

        fs::write(path, updated).map_err(rewrite_error)?;
        debug!("Rewrote document URLs in {}", path.display());
        Ok(true)
    }

    /// Rewrites every file concurrently and waits for all of them.
    ///
    /// Every file is attempted even when others fail. Failures are collected and returned
    /// together, sorted by path.
    ///
    /// # Returns
    ///
    /// Returns the number of files that were modified.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::RewriteFailures`] if any file could not be rewritten.
    pub fn rewrite_all(&self, paths: &[PathBuf]) -> Result<usize> {
        if paths.is_empty() {
            return Ok(0);
        }

        let workers = thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(4)
            .min(paths.len());
        debug!("Rewriting {} files on {} workers", paths.len(), workers);

        let next = AtomicUsize::new(0);
        let changed = AtomicUsize::new(0);

        let mut failures: Vec<PipelineError> = thread::scope(|scope| {
            let mut handles = Vec::with_capacity(workers);
            for _ in 0..workers {
                handles.push(scope.spawn(|| {
                    let mut failed = Vec::new();
                    while let Some(path) = paths.get(next.fetch_add(1, Ordering::Relaxed)) {
                        match self.rewrite_file(path) {
                            Ok(true) => {
                                changed.fetch_add(1, Ordering::Relaxed);
                            }
                            Ok(false) => {}
                            Err(e) => failed.push(e),
                        }
                    }
                    failed
                }));
            }

            handles
                .into_iter()
                .flat_map(|handle| match handle.join() {
                    Ok(failed) => failed,
                    Err(panic) => std::panic::resume_unwind(panic),
                })
                .collect()
        });

        if failures.is_empty() {
            let changed = changed.into_inner();
            info!("Updated document URLs in {} of {} files", changed, paths.len());
            return Ok(changed);
        }

        failures.sort_by(|a, b| failure_path(a).cmp(&failure_path(b)));
        Err(PipelineError::RewriteFailures(failures))
    }
}

fn failure_path(err: &PipelineError) -> Option<&Path> {
    match err {
        PipelineError::Rewrite { path, .. } => Some(path),
        _ => None,
    }
}

/// Rewrites document references in `paths` using the remote identity in `config`.
pub fn rewrite_urls(config: &PipelineConfig, paths: &[PathBuf]) -> Result<usize> {
    UrlRewriter::from_config(config).rewrite_all(paths)
}
