//! Spec tree to documentation tree.
//!
//! [`Pipeline::generate_all`] walks the spec root, generates pages for every spec one at a
//! time, then rewrites the document references of every generated page concurrently.

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::fs_util::ensure_directory;
use crate::generator::{DocGenerator, FrontMatter, GenerationRequest, Granularity, PageInfo};
use crate::paths::{derive_output_dir, derive_remote_url, to_url_path};
use crate::rewriter::rewrite_urls;
use crate::walker::FileWalker;
use log::{debug, info};
use std::io;
use std::path::{Path, PathBuf};

pub const SUCCESS_MESSAGE: &str = "Documentation generated successfully";

/// Outcome of a full run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    /// Processed spec files, relative to the spec root, in processing order
    pub files: Vec<PathBuf>,
    pub message: String,
}

/// Drives a [`DocGenerator`] over the spec tree described by a [`PipelineConfig`].
pub struct Pipeline<'a, G> {
    config: &'a PipelineConfig,
    generator: G,
}

impl<'a, G: DocGenerator> Pipeline<'a, G> {
    pub fn new(config: &'a PipelineConfig, generator: G) -> Self {
        Self { config, generator }
    }

    /// Generates the pages of one spec file.
    ///
    /// The spec is read in place from the spec root. Its pages go into the directory given by
    /// [`derive_output_dir`], each with front matter pointing at the spec's remote URL.
    ///
    /// # Returns
    ///
    /// Returns the pages the generator wrote.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Generation`] naming `spec_relative_path` for any failure,
    /// including creating the output directory.
    pub fn generate_one(
        &self,
        spec_relative_path: &Path,
        granularity: Granularity,
    ) -> Result<Vec<PathBuf>> {
        self.try_generate_one(spec_relative_path, granularity)
            .map_err(|e| PipelineError::Generation {
                spec: spec_relative_path.to_path_buf(),
                source: Box::new(e),
            })
    }

    fn try_generate_one(
        &self,
        spec_relative_path: &Path,
        granularity: Granularity,
    ) -> Result<Vec<PathBuf>> {
        let config = self.config;
        let output_dir = derive_output_dir(spec_relative_path, &config.apis_root());
        ensure_directory(&output_dir)?;

        let remote_url = derive_remote_url(
            spec_relative_path,
            &config.remote.raw_root(),
            &config.specs_root_name(),
        );
        let input = config.specs_root().join(spec_relative_path);
        let document_path = to_url_path(&config.specs_dir.join(spec_relative_path));
        debug!(
            "Generating {} -> {} ({})",
            input.display(),
            output_dir.display(),
            remote_url
        );

        let front_matter = |page: &PageInfo| FrontMatter {
            title: page.title.clone(),
            description: page.description.clone(),
            full: true,
            document: remote_url.clone(),
        };
        let request = GenerationRequest {
            input: &input,
            document_path: &document_path,
            output_dir: &output_dir,
            granularity,
        };

        let pages = self.generator.generate(&request, &front_matter)?;
        debug!(
            "Generated {} pages for {}",
            pages.len(),
            spec_relative_path.display()
        );
        Ok(pages)
    }

    /// Generates pages for every spec under the spec root, then rewrites document references.
    ///
    /// Specs are processed sequentially in walk order. The first failure aborts the run;
    /// pages already written for earlier specs stay on disk.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Io`] if the spec root does not exist, and propagates walk,
    /// generation and rewrite errors.
    pub fn generate_all(&self, granularity: Granularity) -> Result<GenerationResult> {
        let config = self.config;
        let specs_root = config.specs_root();
        let apis_root = config.apis_root();

        if !specs_root.is_dir() {
            return Err(PipelineError::io(
                &specs_root,
                io::Error::new(io::ErrorKind::NotFound, "spec root is not a directory"),
            ));
        }
        ensure_directory(&apis_root)?;

        info!("Scanning spec root {}...", specs_root.display());
        let specs = FileWalker::new(&specs_root).walk()?;
        info!("Found {} spec files", specs.len());

        for spec in &specs {
            info!("Generating documentation for {}", spec.display());
            self.generate_one(spec, granularity)?;
        }

        let pages: Vec<PathBuf> = FileWalker::new(&apis_root)
            .with_extension(config.page_extension.as_str())
            .walk()?
            .into_iter()
            .map(|page| apis_root.join(page))
            .collect();
        info!("Updating document URLs in {} pages...", pages.len());
        rewrite_urls(config, &pages)?;

        Ok(GenerationResult {
            files: specs,
            message: SUCCESS_MESSAGE.to_string(),
        })
    }
}
