//! Application error type mapping relay outcomes to HTTP status codes.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use askrelay_types::error::{AnswerError, RelayError, ValidationError};

pub const MISSING_QUESTION: &str = "Missing question parameter";
pub const OVERLOADED: &str = "API is overloaded, please try again later.";

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Body was not JSON, or had no `question` field.
    MissingQuestion,
    /// The relay refused or failed the question.
    Answer(AnswerError),
}

impl From<AnswerError> for AppError {
    fn from(e: AnswerError) -> Self {
        AppError::Answer(e)
    }
}

impl From<RelayError> for AppError {
    fn from(e: RelayError) -> Self {
        AppError::Answer(AnswerError::Relay(e))
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::MissingQuestion => (
                StatusCode::BAD_REQUEST,
                "MISSING_QUESTION",
                MISSING_QUESTION.to_string(),
            ),
            AppError::Answer(AnswerError::Invalid(e @ ValidationError::EmptyQuestion)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", e.to_string())
            }
            AppError::Answer(AnswerError::Relay(e)) => {
                let status = match e {
                    RelayError::RateLimited { .. } => StatusCode::SERVICE_UNAVAILABLE,
                    RelayError::ProviderFailure(_) | RelayError::MalformedResponse(_) => {
                        StatusCode::BAD_GATEWAY
                    }
                    RelayError::Cancelled => StatusCode::GATEWAY_TIMEOUT,
                };
                let message = match e {
                    RelayError::RateLimited { .. } => OVERLOADED.to_string(),
                    other => other.to_string(),
                };
                (status, e.code(), message)
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        if status.is_server_error() {
            tracing::warn!(status = status.as_u16(), code, error = %message, "Request failed");
        }

        (status, Json(json!({ "error": message, "code": code }))).into_response()
    }
}
