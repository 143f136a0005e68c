//! Playback error types.

use thiserror::Error;

/// Typed failure of a media fetch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("media not found")]
    NotFound,

    #[error("media fetch timed out")]
    Timeout,

    #[error("media unreachable: {0}")]
    Unreachable(String),
}

/// Failure reported by a rendering surface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    /// The payload could not be decoded into playable media.
    #[error("failed to decode media: {0}")]
    Decode(String),

    /// Playback started but could not run to completion.
    #[error("playback failed: {0}")]
    Playback(String),
}

/// Failure talking to the resolve service.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("resolve service unreachable: {0}")]
    Unreachable(String),

    #[error("resolve service returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("invalid resolve response: {0}")]
    Decode(String),

    /// The resolver refused the request (for example, neither text nor
    /// words given).
    #[error("resolve rejected: {0}")]
    Rejected(String),
}

/// Errors surfaced by the playback handle and caption session.
#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("playback controller has shut down")]
    Closed,

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}
