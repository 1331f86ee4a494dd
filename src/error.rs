use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for the pipeline
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Error types for the pipeline.
///
/// Every variant names the file or directory it concerns so the message is actionable
/// on its own.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("IO error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to enumerate {}: {source}", .path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to process file {}: {source}", .spec.display())]
    Generation {
        spec: PathBuf,
        #[source]
        source: Box<PipelineError>,
    },

    #[error("invalid argument: {0}")]
    Validation(String),

    #[error("failed to rewrite {}: {source}", .path.display())]
    Rewrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} generated file(s) could not be rewritten: {}", .0.len(), join_messages(.0))]
    RewriteFailures(Vec<PipelineError>),

    #[error("invalid configuration in {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },

    #[error("malformed spec {}: {message}", .path.display())]
    MalformedSpec { path: PathBuf, message: String },
}

impl PipelineError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipelineError::Io {
            path: path.into(),
            source,
        }
    }

    /// True for filesystem read, write and enumeration failures.
    pub fn is_io(&self) -> bool {
        matches!(self, PipelineError::Io { .. } | PipelineError::Walk { .. })
    }
}

fn join_messages(errors: &[PipelineError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_generation_error_names_spec() {
        let err = PipelineError::Generation {
            spec: PathBuf::from("a/x.yaml"),
            source: Box::new(PipelineError::io(
                "content/apis/a/x",
                io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
            )),
        };

        let message = err.to_string();
        assert!(message.contains("a/x.yaml"), "got: {}", message);
        assert!(message.contains("content/apis/a/x"), "got: {}", message);
    }

    #[test]
    fn test_rewrite_failures_lists_every_file() {
        let err = PipelineError::RewriteFailures(vec![
            PipelineError::Rewrite {
                path: PathBuf::from("one.mdx"),
                source: io::Error::new(io::ErrorKind::NotFound, "gone"),
            },
            PipelineError::Rewrite {
                path: PathBuf::from("two.mdx"),
                source: io::Error::new(io::ErrorKind::NotFound, "gone"),
            },
        ]);

        let message = err.to_string();
        assert!(message.starts_with("2 generated file(s)"));
        assert!(message.contains("one.mdx"));
        assert!(message.contains("two.mdx"));
    }

    #[test]
    fn test_is_io() {
        let err = PipelineError::io("specs", io::Error::new(io::ErrorKind::NotFound, "missing"));
        assert!(err.is_io());
        assert!(!PipelineError::Validation("bogus".to_string()).is_io());
    }
}
