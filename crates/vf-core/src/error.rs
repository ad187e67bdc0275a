//! Unified error type for the vodforge engine.
//!
//! All crates funnel their failures into [`Error`]. The three variants the
//! conversion pipeline cares about are [`Error::NotFound`] (asset id did not
//! resolve, nothing was mutated), [`Error::Encode`] (the external encoder was
//! missing, exited non-zero, or timed out), and [`Error::Store`] (the
//! persistence update failed after encoding succeeded).

use std::fmt;

/// Unified error type covering all failure modes in vodforge.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested entity could not be found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity (e.g. "video").
        entity: String,
        /// The identifier that was looked up.
        id: String,
    },

    /// The external encoder failed: missing tool, non-zero exit, or timeout.
    #[error("Encode error [{tool}]: {message}")]
    Encode {
        /// Name of the tool that failed.
        tool: String,
        /// Human-readable error description.
        message: String,
    },

    /// A store (persistence) operation failed.
    #[error("Store error: {0}")]
    Store(String),

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Input data failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected internal errors.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Convenience constructor for [`Error::NotFound`].
    pub fn not_found(entity: impl Into<String>, id: impl fmt::Display) -> Self {
        Error::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Convenience constructor for [`Error::Encode`].
    pub fn encode(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Encode {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Convenience constructor for [`Error::Store`].
    pub fn store(message: impl Into<String>) -> Self {
        Error::Store(message.into())
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
