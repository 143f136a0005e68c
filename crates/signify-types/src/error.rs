//! Error types for signify.
//!
//! [`SignifyError`] covers the failures that cross the request boundary.
//! Resolution misses are not errors: they are reported through
//! `notFoundWords` in the resolve response.

use thiserror::Error;

/// Top-level error type shared by the signify crates.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SignifyError {
    /// The caller sent a request the service cannot act on (e.g. a resolve
    /// request with neither `text` nor `words`).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Configuration is malformed or semantically invalid.
    #[error("invalid config: {reason}")]
    ConfigInvalid {
        /// What is wrong with the configuration.
        reason: String,
    },

    /// Underlying I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization / deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for results using [`SignifyError`].
pub type Result<T> = std::result::Result<T, SignifyError>;
