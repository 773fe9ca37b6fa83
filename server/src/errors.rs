//! HTTP error responses.
//!
//! Bodies look like `{"status": 500, "message": "..."}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use engine::SearchError;
use serde_json::json;

#[derive(Debug)]
pub enum ApiError {
    /// Query rejected before ranking (400).
    BadRequest(String),
    /// Corpus could not be loaded or the worker failed (500).
    Internal(String),
}

impl From<SearchError> for ApiError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::InvalidQuery(msg) => ApiError::BadRequest(msg),
            other @ SearchError::IngestionFailure { .. } => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        if status.is_server_error() {
            tracing::error!(%status, %message, "request failed");
        }
        let body = axum::Json(json!({ "status": status.as_u16(), "message": message }));
        (status, body).into_response()
    }
}
