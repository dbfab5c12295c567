//! Failure-to-response mapping for the HTTP surface.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use taskdeck_store_json::StoreError;
use tracing::error;

/// Body shape shared by every failed response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Human-readable failure message; no structured codes beyond the status.
    pub error: String,
}

/// Error returned by route handlers, carrying the client-facing status.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// An internal failure reported as 500.
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        let status = match &err {
            StoreError::NotFound(_) => StatusCode::NOT_FOUND,
            StoreError::Validation(_) => StatusCode::BAD_REQUEST,
            StoreError::Corrupt { .. } | StoreError::Encode(..) | StoreError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            // The process keeps running; the client may simply retry.
            error!(status = %self.status, message = %self.message, "request failed");
        }
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}
