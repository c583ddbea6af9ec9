//! Error types for the visualization service.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Result type for service operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors returned by the HTTP API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Rejected or cancelled by the engine
    #[error(transparent)]
    Core(#[from] algoviz_core::Error),

    /// Request was well-formed but incomplete
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Body missing, not JSON, or the wrong shape
    #[error("Invalid input: {}", .0.body_text())]
    Body(#[from] JsonRejection),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Core(algoviz_core::Error::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            ApiError::Core(algoviz_core::Error::Cancelled(_)) => StatusCode::CONFLICT,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Body(JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_)) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Body(rejection) => rejection.status(),
        }
    }

    /// Machine-readable error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Core(algoviz_core::Error::InvalidInput(_)) => "INVALID_INPUT",
            ApiError::Core(algoviz_core::Error::Cancelled(_)) => "CANCELLED",
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Body(_) => "INVALID_INPUT",
        }
    }
}

/// JSON body of an error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: self.to_string(),
            code: self.error_code(),
        };
        (status, Json(body)).into_response()
    }
}
