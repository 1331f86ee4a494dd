use crate::config::{ConfigFile, PipelineConfig, RemoteRepository};
use crate::error::PipelineError;
use crate::generator::Granularity;
use crate::pages::OpenApiPageGenerator;
use crate::pipeline::{GenerationResult, Pipeline};
use crate::staging::import_staged;
use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};
use std::path::PathBuf;

/// OpenAPI content pipeline - Generate API reference pages from a tree of OpenAPI specs
#[derive(Parser, Debug)]
#[command(name = "openapi-content-pipeline")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// How to split each spec into pages: file, operation or tag (default: generator default)
    #[arg(value_name = "GRANULARITY")]
    pub granularity: Option<String>,

    /// Directory all other paths are resolved against (default: current directory)
    #[arg(long = "root", value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// YAML config file
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Spec root directory
    #[arg(long = "specs-dir", value_name = "DIR")]
    pub specs_dir: Option<PathBuf>,

    /// Documentation output root directory
    #[arg(long = "apis-dir", value_name = "DIR")]
    pub apis_dir: Option<PathBuf>,

    /// Move specs from this directory into the spec root before generating
    #[arg(long = "stage-dir", value_name = "DIR")]
    pub stage_dir: Option<PathBuf>,

    /// Repository browser URL, e.g. https://github.com/<owner>/<repo>/blob/<ref>
    #[arg(long = "remote-url", value_name = "URL")]
    pub remote_url: Option<String>,

    /// Repository owner
    #[arg(long = "owner")]
    pub owner: Option<String>,

    /// Repository name
    #[arg(long = "repo")]
    pub repo: Option<String>,

    /// Branch, tag or commit the remote URLs point at
    #[arg(long = "ref", value_name = "REF")]
    pub git_ref: Option<String>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Everything a run needs, resolved from the command line and config file.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub config: PipelineConfig,
    pub granularity: Granularity,
    pub stage_dir: Option<PathBuf>,
}

/// Validate already-parsed arguments and assemble the run configuration.
///
/// The granularity is checked before anything touches the filesystem.
pub fn parse_args_from_parsed(args: CliArgs) -> Result<RunOptions> {
    debug!("Parsed arguments: {:?}", args);

    let granularity = match args.granularity.as_deref() {
        Some(value) => value.parse::<Granularity>()?,
        None => Granularity::Default,
    };

    let root = match args.root {
        Some(root) => root,
        None => std::env::current_dir().context("Cannot determine the working directory")?,
    };
    let mut config = PipelineConfig::new(root);

    if let Some(path) = &args.config {
        config = config.merge_file(ConfigFile::load(path)?);
    }
    if let Some(specs_dir) = args.specs_dir {
        config.specs_dir = specs_dir;
    }
    if let Some(apis_dir) = args.apis_dir {
        config.apis_dir = apis_dir;
    }
    if let Some(url) = &args.remote_url {
        config.remote = RemoteRepository::from_browser_url(url)?;
    }
    if let Some(owner) = args.owner {
        config.remote.owner = owner;
    }
    if let Some(repo) = args.repo {
        config.remote.repo = repo;
    }
    if let Some(git_ref) = args.git_ref {
        config.remote.git_ref = git_ref;
    }

    if config.specs_dir.as_os_str().is_empty() || config.apis_dir.as_os_str().is_empty() {
        return Err(PipelineError::Validation(
            "spec and output directories must not be empty".to_string(),
        )
        .into());
    }

    info!("Root: {}", config.root.display());
    info!("Spec root: {}", config.specs_dir.display());
    info!("Output root: {}", config.apis_dir.display());
    info!("Remote root: {}", config.remote.raw_root());
    info!("Granularity: {}", granularity);

    Ok(RunOptions {
        config,
        granularity,
        stage_dir: args.stage_dir,
    })
}

/// Run the main workflow
pub fn run(options: RunOptions) -> Result<GenerationResult> {
    let config = &options.config;

    if let Some(stage_dir) = &options.stage_dir {
        info!("Importing staged specs from {}...", stage_dir.display());
        import_staged(config, stage_dir)
            .with_context(|| format!("Failed to import specs from {}", stage_dir.display()))?;
    }

    let generator = OpenApiPageGenerator::new(config.page_extension.clone());
    let result = Pipeline::new(config, generator)
        .generate_all(options.granularity)
        .context("Failed to generate documentation")?;

    info!("Generation complete!");
    info!("Summary:");
    info!("  - Specs processed: {}", result.files.len());
    info!("  - Output root: {}", config.apis_root().display());

    Ok(result)
}
