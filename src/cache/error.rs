//! Cache error taxonomy

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the digest engine, the layouts and the cache store.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("missing project identifier")]
    InvalidIdentifier,

    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("unknown tile layout: {0}")]
    UnknownLayout(String),

    #[error("Collection '{0}' not found")]
    CollectionNotFound(String),

    #[error("Layer '{0}' not found")]
    LayerNotFound(String),

    #[error("missing request parameter {0}")]
    MissingParameter(&'static str),

    #[error("invalid value for {name}: {value:?}")]
    InvalidCoordinate { name: &'static str, value: String },

    #[error("invalid path component for {name}: {value:?}")]
    InvalidPathComponent { name: &'static str, value: String },

    #[error("cache metadata not found: {}", .0.display())]
    MissingMetadata(PathBuf),

    #[error("invalid cache root {}: {reason}", path.display())]
    InvalidRoot { path: PathBuf, reason: &'static str },

    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl CacheError {
    /// Wrap an i/o error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CacheError::Io {
            path: path.into(),
            source,
        }
    }

    /// True for lookup failures that map to "not found" responses
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CacheError::CollectionNotFound(_) | CacheError::LayerNotFound(_)
        )
    }
}

pub type CacheResult<T> = Result<T, CacheError>;
