//! Error types for rs-courseware.
//!
//! Most per-page problems degrade instead of failing (missing markers,
//! unresolved images). The variants here cover what cannot degrade: I/O on
//! the narrowest scope (one file or one course) and malformed configuration.

use std::path::PathBuf;

/// Error type for pipeline operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reading, writing or copying a file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A source page named by a section or a crawl does not exist.
    #[error("Source page not found: {}", .0.display())]
    MissingSource(PathBuf),

    /// Two different source pages map to the same lesson key.
    #[error("Lesson key {key} already written from {}", first.display())]
    DuplicateLesson { key: String, first: PathBuf },

    /// Neither crawl entry point exists in the course directory.
    #[error("No crawl entry point found in {}", .0.display())]
    MissingEntryPoint(PathBuf),

    /// JSON (de)serialization of a manifest, curriculum or catalog failed.
    #[error("JSON error on {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The course manifest is structurally valid JSON but semantically wrong.
    #[error("Invalid manifest: {0}")]
    Manifest(String),

    /// An element's opening tag was found but its closing tag never balanced.
    #[error("Unbalanced <{tag}> element starting at byte {offset}")]
    Unbalanced { tag: String, offset: usize },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json { path: path.into(), source }
    }
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;
