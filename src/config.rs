//! Pipeline configuration.
//!
//! All locations and the remote repository identity live in one immutable [`PipelineConfig`]
//! that is built once at startup and handed to the pipeline by reference. Tests build their
//! own config pointing at a temporary root and a fake remote.

use crate::error::{PipelineError, Result};
use crate::paths::is_absolute_url;
use log::debug;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_SPECS_DIR: &str = "specs";
pub const DEFAULT_APIS_DIR: &str = "content/apis";
pub const DEFAULT_PAGE_EXTENSION: &str = "mdx";
pub const DEFAULT_RAW_HOST: &str = "https://raw.githubusercontent.com";

const BROWSER_HOST: &str = "https://github.com";

/// Identity of the repository that hosts the spec files.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RemoteRepository {
    /// Raw-content host, e.g. `https://raw.githubusercontent.com`
    pub host: String,
    pub owner: String,
    pub repo: String,
    /// Branch, tag or commit the URLs point at
    #[serde(rename = "ref")]
    pub git_ref: String,
}

impl Default for RemoteRepository {
    fn default() -> Self {
        Self {
            host: DEFAULT_RAW_HOST.to_string(),
            owner: "SonuMondal06".to_string(),
            repo: "content-stack".to_string(),
            git_ref: "main".to_string(),
        }
    }
}

impl RemoteRepository {
    /// Root of every raw-content URL: `<host>/<owner>/<repo>/<ref>`.
    pub fn raw_root(&self) -> String {
        format!(
            "{}/{}/{}/{}",
            self.host.trim_end_matches('/'),
            self.owner,
            self.repo,
            self.git_ref
        )
    }

    /// Builds a repository identity from a browser URL of the form
    /// `https://github.com/<owner>/<repo>/blob/<ref>` (or `/tree/<ref>`).
    ///
    /// This is the only place browser URLs are translated into the raw-content form; it runs
    /// once while the configuration is assembled, never per file.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Validation`] if the URL does not have that shape.
    pub fn from_browser_url(url: &str) -> Result<Self> {
        let invalid = || {
            PipelineError::Validation(format!(
                "expected {}/<owner>/<repo>/blob/<ref>, got '{}'",
                BROWSER_HOST, url
            ))
        };

        let rest = url
            .trim_end_matches('/')
            .strip_prefix(BROWSER_HOST)
            .and_then(|rest| rest.strip_prefix('/'))
            .ok_or_else(invalid)?;

        let segments: Vec<&str> = rest.split('/').collect();
        match segments.as_slice() {
            [owner, repo, kind, git_ref @ ..]
                if (*kind == "blob" || *kind == "tree")
                    && !owner.is_empty()
                    && !repo.is_empty()
                    && !git_ref.is_empty()
                    && git_ref.iter().all(|s| !s.is_empty()) =>
            {
                Ok(Self {
                    host: DEFAULT_RAW_HOST.to_string(),
                    owner: owner.to_string(),
                    repo: repo.to_string(),
                    git_ref: git_ref.join("/"),
                })
            }
            _ => Err(invalid()),
        }
    }
}

/// Immutable settings for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Directory every relative location below is resolved against
    pub root: PathBuf,
    /// Spec root, relative to `root`; also the path segment used in remote URLs
    pub specs_dir: PathBuf,
    /// Documentation output root, relative to `root`
    pub apis_dir: PathBuf,
    /// Extension of generated documentation pages, without the dot
    pub page_extension: String,
    pub remote: RemoteRepository,
}

impl PipelineConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            specs_dir: PathBuf::from(DEFAULT_SPECS_DIR),
            apis_dir: PathBuf::from(DEFAULT_APIS_DIR),
            page_extension: DEFAULT_PAGE_EXTENSION.to_string(),
            remote: RemoteRepository::default(),
        }
    }

    pub fn with_remote(mut self, remote: RemoteRepository) -> Self {
        self.remote = remote;
        self
    }

    pub fn specs_root(&self) -> PathBuf {
        self.root.join(&self.specs_dir)
    }

    pub fn apis_root(&self) -> PathBuf {
        self.root.join(&self.apis_dir)
    }

    /// Name of the spec root as it appears in remote URLs, always `/`-separated.
    pub fn specs_root_name(&self) -> String {
        crate::paths::to_url_path(&self.specs_dir)
    }

    /// Applies the values present in a config file on top of this config.
    pub fn merge_file(mut self, file: ConfigFile) -> Self {
        if let Some(root) = file.root {
            self.root = root;
        }
        if let Some(specs_dir) = file.specs_dir {
            self.specs_dir = specs_dir;
        }
        if let Some(apis_dir) = file.apis_dir {
            self.apis_dir = apis_dir;
        }
        if let Some(ext) = file.page_extension {
            self.page_extension = ext.trim_start_matches('.').to_string();
        }
        if let Some(remote) = file.remote {
            self.remote = remote;
        }
        self
    }
}

/// On-disk form of the configuration. Every field is optional.
///
/// ```yaml
/// specs_dir: specs
/// apis_dir: content/apis
/// remote:
///   owner: acme
///   repo: api-docs
///   ref: main
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub root: Option<PathBuf>,
    pub specs_dir: Option<PathBuf>,
    pub apis_dir: Option<PathBuf>,
    pub page_extension: Option<String>,
    pub remote: Option<RemoteRepository>,
}

impl ConfigFile {
    /// Reads and parses a YAML config file.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Config`] if the file cannot be read, is not valid YAML for
    /// this schema, or names a remote host without a URL scheme.
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading config file {}", path.display());
        let content = fs::read_to_string(path).map_err(|e| PipelineError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(&content, path)
    }

    fn parse(content: &str, path: &Path) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let file: Self = serde_yaml::from_str(content).map_err(|e| PipelineError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        if let Some(remote) = &file.remote {
            if !is_absolute_url(&remote.host) {
                return Err(PipelineError::Config {
                    path: path.to_path_buf(),
                    message: format!(
                        "remote host '{}' must start with a URL scheme such as https://",
                        remote.host
                    ),
                });
            }
        }
        Ok(file)
    }
}
