//! Interface to the page generation service.
//!
//! Turning an OpenAPI spec into documentation pages is a black box to the pipeline. Anything
//! that implements [`DocGenerator`] can be plugged in: the built-in
//! [`OpenApiPageGenerator`](crate::pages::OpenApiPageGenerator), or a stub in tests that writes
//! fixture pages.

use crate::error::{PipelineError, Result};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// How finely one spec is split into output pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Granularity {
    /// One page for the whole spec
    File,
    /// One page per operation
    Operation,
    /// One page per tag
    Tag,
    /// Whatever the generator does when not told otherwise
    #[default]
    Default,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::File => "file",
            Granularity::Operation => "operation",
            Granularity::Tag => "tag",
            Granularity::Default => "default",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "file" => Ok(Granularity::File),
            "operation" => Ok(Granularity::Operation),
            "tag" => Ok(Granularity::Tag),
            other => Err(PipelineError::Validation(format!(
                "unknown granularity '{}', expected one of: file, operation, tag",
                other
            ))),
        }
    }
}

/// What the generator knows about a page it is about to write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageInfo {
    pub title: String,
    pub description: Option<String>,
}

/// Front matter attached to every generated page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrontMatter {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Render the page full width
    pub full: bool,
    /// Canonical location of the source spec
    pub document: String,
}

/// Hook the generator calls once per page to obtain its front matter.
pub type MetadataHook<'a> = dyn Fn(&PageInfo) -> FrontMatter + 'a;

/// One invocation of the generator.
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    /// Local spec file to read
    pub input: &'a Path,
    /// Path of the spec as the generated pages should refer to it locally
    pub document_path: &'a str,
    /// Existing directory the pages are written into
    pub output_dir: &'a Path,
    pub granularity: Granularity,
}

/// Trait for services that render documentation pages from a spec file.
///
/// Implementations may keep shared state between calls; the pipeline never calls
/// `generate` concurrently.
pub trait DocGenerator {
    /// Renders pages for one spec file into `request.output_dir`.
    ///
    /// # Returns
    ///
    /// Returns the paths of the files written.
    fn generate(
        &self,
        request: &GenerationRequest<'_>,
        front_matter: &MetadataHook<'_>,
    ) -> Result<Vec<PathBuf>>;
}

impl<T: DocGenerator + ?Sized> DocGenerator for Box<T> {
    fn generate(
        &self,
        request: &GenerationRequest<'_>,
        front_matter: &MetadataHook<'_>,
    ) -> Result<Vec<PathBuf>> {
        (**self).generate(request, front_matter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_granularity() {
        assert_eq!("file".parse::<Granularity>().unwrap(), Granularity::File);
        assert_eq!(
            "operation".parse::<Granularity>().unwrap(),
            Granularity::Operation
        );
        assert_eq!("tag".parse::<Granularity>().unwrap(), Granularity::Tag);
    }

    #[test]
    fn test_reject_unknown_granularity() {
        for value in ["bogus", "File", "", "default"] {
            let err = value.parse::<Granularity>().unwrap_err();
            assert!(matches!(err, PipelineError::Validation(_)), "{:?}", value);
        }
    }

    #[test]
    fn test_front_matter_omits_missing_description() {
        let front_matter = FrontMatter {
            title: "Pets".to_string(),
            description: None,
            full: true,
            document: "https://raw.example.com/org/repo/main/specs/pets.yaml".to_string(),
        };

        let yaml = serde_yaml::to_string(&front_matter).unwrap();
        assert!(!yaml.contains("description"));
        assert!(yaml.contains("full: true"));
    }
}
