//! Service error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use signify_types::SignifyError;

/// Errors produced by the HTTP service.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request body was missing a required field or could not be parsed.
    #[error("{0}")]
    InvalidRequest(String),

    /// Anything that is not the caller's fault.
    #[error("internal error: {0}")]
    Internal(String),

    /// The listener could not be bound or the server loop failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<SignifyError> for ApiError {
    fn from(err: SignifyError) -> Self {
        match err {
            SignifyError::InvalidRequest(msg) => Self::InvalidRequest(msg),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) | Self::Io(_) => {
                error!(error = %self, "request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = Json(json!({ "success": false, "error": self.to_string() }));
        (status, body).into_response()
    }
}

/// Convenience alias for results in this crate.
pub type Result<T> = std::result::Result<T, ApiError>;
