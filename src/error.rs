use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::models::ErrorResponse;

// Startup / configuration errors
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Graceful shutdown did not finish within {0}s")]
    ShutdownTimeout(u64),

    #[error("Server task failed: {0}")]
    Join(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Error returned from handlers and middleware.
///
/// Each variant maps to an HTTP status and renders as an [`ErrorResponse`] body.
#[derive(Debug)]
pub enum ApiError {
    /// 404
    NotFound(String),
    /// 429
    TooManyRequests(String),
    /// 500
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::TooManyRequests(_) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    // machine-readable code for the `error` field
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "not_found",
            ApiError::TooManyRequests(_) => "rate_limited",
            ApiError::Internal(_) => "internal_error",
        }
    }

    pub fn into_body(self) -> ErrorResponse {
        let status = self.status();
        let error = self.code().to_string();
        let message = match self {
            ApiError::NotFound(msg)
            | ApiError::TooManyRequests(msg)
            | ApiError::Internal(msg) => msg,
        };
        ErrorResponse {
            error,
            message,
            code: status.as_u16(),
            request_id: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(self.into_body())).into_response()
    }
}
