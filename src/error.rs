//! Error types for document flattening and source loading.
//!
//! None of these abort a multi-source load: the merge engine logs them and
//! treats the failing source as contributing nothing.

use std::fmt;
use thiserror::Error;

/// A document that could not be flattened.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("document is empty")]
    Empty,

    #[error("XML syntax error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("JSON syntax error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("element <{0}> is never closed")]
    Unclosed(String),

    #[error("document has more than one root element")]
    MultipleRoots,

    #[error("no `keyValueProperties` or `xmlStructure` block found")]
    UnrecognizedStructure,

    #[error("`{0}` block must be an object")]
    InvalidBlock(&'static str),
}

/// A configuration source that contributed nothing.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("configuration source not found: {0}")]
    MissingSource(String),

    #[error("malformed document {location}: {source}")]
    MalformedDocument {
        location: String,
        #[source]
        source: DocumentError,
    },

    #[error("discovery property {0} is not set")]
    MissingDiscoveryProperty(&'static str),

    #[error("failed to read {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to fetch {location}: {source}")]
    Fetch {
        location: String,
        #[source]
        source: reqwest::Error,
    },
}

impl LoadError {
    pub fn malformed(location: impl fmt::Display, source: DocumentError) -> Self {
        Self::MalformedDocument {
            location: location.to_string(),
            source,
        }
    }

    /// Map an I/O error, turning `NotFound` into [`LoadError::MissingSource`].
    pub fn io(location: impl fmt::Display, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::MissingSource(location.to_string())
        } else {
            Self::Io {
                location: location.to_string(),
                source,
            }
        }
    }

    pub fn fetch(location: impl fmt::Display, source: reqwest::Error) -> Self {
        Self::Fetch {
            location: location.to_string(),
            source,
        }
    }

    /// True when the source simply does not exist.
    pub fn is_missing(&self) -> bool {
        matches!(
            self,
            LoadError::MissingSource(_) | LoadError::MissingDiscoveryProperty(_)
        )
    }
}

/// Result type for loading operations.
pub type LoadResult<T> = std::result::Result<T, LoadError>;
