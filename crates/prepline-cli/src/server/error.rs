//! API error types and handling.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use prepline::PreplineError;
use serde::Serialize;

/// API error type.
#[derive(Debug)]
pub enum ApiError {
    /// Bad request from client.
    BadRequest(String),
    /// Internal server error.
    Internal(String),
    /// Error from the prepline library.
    Pipeline(PreplineError),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Pipeline(e) => pipeline_status(e),
        }
    }
}

/// HTTP status for a library error; stage wrappers use their cause.
fn pipeline_status(err: &PreplineError) -> StatusCode {
    match err {
        PreplineError::StageFailed { source, .. } => pipeline_status(source),
        PreplineError::NoInput { .. }
        | PreplineError::InvalidTable(_)
        | PreplineError::Config(_)
        | PreplineError::Json(_) => StatusCode::BAD_REQUEST,
        PreplineError::FileNotFound(_) | PreplineError::TableNotFound(_) => StatusCode::NOT_FOUND,
        PreplineError::TableExists(_) => StatusCode::CONFLICT,
        PreplineError::UnsupportedFormat(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        PreplineError::Transform { .. }
        | PreplineError::Csv(_)
        | PreplineError::Spreadsheet(_)
        | PreplineError::EmptyData(_) => StatusCode::UNPROCESSABLE_ENTITY,
        PreplineError::Io { .. } | PreplineError::Persistence(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (error, message) = match self {
            ApiError::BadRequest(msg) => ("bad_request", msg),
            ApiError::Internal(msg) => ("internal", msg),
            ApiError::Pipeline(e) => (e.code(), e.to_string()),
        };

        (
            status,
            Json(ErrorResponse {
                error: error.to_string(),
                message,
            }),
        )
            .into_response()
    }
}

impl From<PreplineError> for ApiError {
    fn from(err: PreplineError) -> Self {
        ApiError::Pipeline(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
            ApiError::Pipeline(e) => write!(f, "Pipeline error: {}", e),
        }
    }
}

impl std::error::Error for ApiError {}
