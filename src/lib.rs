//! OpenAPI content pipeline - API reference pages from a tree of OpenAPI specs.
//!
//! Given a spec root such as `specs/`, the pipeline writes a mirrored tree of documentation
//! pages under an output root such as `content/apis/`, one subdirectory per spec, and makes
//! every page point at the raw-content URL of its spec in the hosting repository.
//!
//! # Architecture
//!
//! 1. [`walker`] - Recursively lists spec files and generated pages
//! 2. [`paths`] - Derives output directories and remote URLs from spec paths
//! 3. [`fs_util`] - Creates output directories
//! 4. [`generator`] - Interface to the page generation service
//! 5. [`pages`] - Built-in page generator
//! 6. [`pipeline`] - Runs the generator over the whole spec tree
//! 7. [`rewriter`] - Replaces relative document references with remote URLs
//! 8. [`staging`] - Optional import of specs from a staging directory
//!
//! # Example Usage
//!
//! ```no_run
//! use openapi_content_pipeline::{
//!     config::PipelineConfig,
//!     generator::Granularity,
//!     pages::OpenApiPageGenerator,
//!     pipeline::Pipeline,
//! };
//!
//! let config = PipelineConfig::new(".");
//! let result = Pipeline::new(&config, OpenApiPageGenerator::default())
//!     .generate_all(Granularity::Operation)
//!     .unwrap();
//! println!("{}: {:?}", result.message, result.files);
//! ```
//!
//! # Command-Line Interface
//!
//! See the [`cli`] module.

pub mod cli;
pub mod config;
pub mod error;
pub mod fs_util;
pub mod generator;
pub mod pages;
pub mod paths;
pub mod pipeline;
pub mod rewriter;
pub mod staging;
pub mod walker;
