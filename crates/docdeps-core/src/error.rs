//! Error types for docdeps operations

use std::path::PathBuf;

/// Result type alias for docdeps operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised around the dependency graph.
///
/// Rejected edges are not errors; they are filtered silently while recording.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The accumulator was frozen while producers still held a handle to it.
    #[error("cannot freeze dependency accumulator: {handles} other handle(s) still alive")]
    WritersActive { handles: usize },

    /// I/O error.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The build manifest could not be parsed.
    #[error("malformed build manifest: {0}")]
    Manifest(#[from] serde_json::Error),

    /// The configuration file could not be parsed.
    #[error("malformed configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// Invalid configuration provided.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
