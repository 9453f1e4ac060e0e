//! Error types for the cutting simulation

use thiserror::Error;

/// Main error type for the crate
#[derive(Debug, Error)]
pub enum Error {
    /// Construction or refinement parameters that cannot produce a usable tree
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A structural invariant of the octree was violated during an operation.
    /// The tree is left traversable but its contents are unspecified.
    #[error("internal inconsistency: {0}")]
    InternalInconsistency(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Error::InvalidConfiguration(msg.into())
    }

    pub(crate) fn inconsistency(msg: impl Into<String>) -> Self {
        Error::InternalInconsistency(msg.into())
    }
}
