// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
///
/// The grading-specific variants mirror the pipeline's failure taxonomy:
/// an incomplete submission blocks grading, an empty recognition pass is
/// distinct from success, a vision-service failure is surfaced verbatim, and
/// a malformed stored answer key refuses to grade at all.
#[derive(Debug)]
pub enum AppError {
    // 500 Internal Server Error
    InternalServerError(String),

    // 400 Bad Request
    BadRequest(String),

    // 400 Bad Request: submission does not cover every question yet
    IncompleteSubmission(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict (e.g., duplicate question number)
    Conflict(String),

    // 422 Unprocessable: text recognition produced zero parseable lines
    RecognitionEmpty(String),

    // 422 Unprocessable: stored data (answer key) is malformed
    DataIntegrity(String),

    // 502 Bad Gateway: the AI vision collaborator failed
    RemoteFailure(String),
}

impl AppError {
    /// Stable machine-readable code included in the JSON body alongside the
    /// human-readable message.
    fn code(&self) -> &'static str {
        match self {
            AppError::InternalServerError(_) => "internal",
            AppError::BadRequest(_) => "bad_request",
            AppError::IncompleteSubmission(_) => "incomplete_submission",
            AppError::NotFound(_) => "not_found",
            AppError::Conflict(_) => "conflict",
            AppError::RecognitionEmpty(_) => "recognition_empty",
            AppError::DataIntegrity(_) => "data_integrity",
            AppError::RemoteFailure(_) => "remote_failure",
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for AppError {}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into a JSON response with appropriate HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();
        let (status, error_message) = match self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::IncompleteSubmission(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::RecognitionEmpty(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            AppError::DataIntegrity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            AppError::RemoteFailure(msg) => {
                tracing::error!("Vision grading service failed: {}", msg);
                (StatusCode::BAD_GATEWAY, msg)
            }
        };
        let body = Json(json!({
            "error": error_message,
            "code": code,
        }));

        (status, body).into_response()
    }
}

/// Converts `sqlx::Error` into `AppError::InternalServerError`.
/// Allows using `?` operator on database queries.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::InternalServerError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::BadRequest(err.to_string())
    }
}
