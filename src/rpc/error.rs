//! Mapping of directory failures onto HTTP responses.

use super::protocol::ErrorResponse;
use crate::directory::error::{DirectoryError, ErrorKind};

use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;

/// Structured error returned by handlers: a status code plus a JSON [`ErrorResponse`].
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<DirectoryError> for ApiError {
    fn from(err: DirectoryError) -> Self {
        match err.kind() {
            ErrorKind::NotFound => api_not_found(&err.to_string()),
        }
    }
}

/// Build a 404 Not Found error.
pub fn api_not_found(message: &str) -> ApiError {
    ApiError {
        status: StatusCode::NOT_FOUND,
        body: ErrorResponse {
            code: "not_found".to_string(),
            message: message.to_string(),
        },
    }
}
