//! OpenAPI content pipeline - Command-line tool for generating API reference pages.
//!
//! Walks the spec root, writes documentation pages for every OpenAPI spec into a mirrored
//! tree under the output root, and points every page at the raw-content URL of its spec.
//!
//! # Usage
//!
//! ```bash
//! openapi-content-pipeline [GRANULARITY] [OPTIONS]
//! ```
//!
//! # Examples
//!
//! One page per operation:
//! ```bash
//! openapi-content-pipeline operation
//! ```
//!
//! Point pages at a different repository:
//! ```bash
//! openapi-content-pipeline --remote-url https://github.com/acme/api-docs/blob/main
//! ```

use anyhow::Result;
use clap::Parser;
use log::info;
use openapi_content_pipeline::cli;

fn main() -> Result<()> {
    let args = cli::CliArgs::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("OpenAPI content pipeline starting...");

    let options = cli::parse_args_from_parsed(args)?;
    let result = cli::run(options)?;

    println!("Documentation generation: {}", result.message);
    println!("Generated files:");
    for file in &result.files {
        println!("  {}", file.display());
    }

    Ok(())
}
