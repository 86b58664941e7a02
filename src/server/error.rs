use crate::analysis::RecordError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use tracing::warn;

/// Unified error type that renders as a JSON `{"error": "..."}` response
/// with an appropriate HTTP status code.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.into(),
        }
    }

    pub fn unprocessable(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: msg.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            warn!("Request failed: {}", self.message);
        }
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<RecordError> for AppError {
    fn from(e: RecordError) -> Self {
        AppError::unprocessable(e.to_string())
    }
}

impl From<prometheus::Error> for AppError {
    fn from(e: prometheus::Error) -> Self {
        AppError::internal(format!("metrics encoding failed: {}", e))
    }
}
