//! HTTP error responses.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use laterlock_core::LaterlockError;

#[derive(Debug)]
pub enum ApiError {
    Core(LaterlockError),
    /// Body could not be read or parsed.
    Rejected(JsonRejection),
    /// A blocking task panicked or was cancelled.
    Task(String),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    error: String,
    reason: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    remaining_seconds: Option<u64>,
}

impl ErrorBody {
    fn new(error: impl Into<String>, reason: &'static str) -> Self {
        Self {
            error: error.into(),
            reason,
            remaining_seconds: None,
        }
    }
}

impl From<LaterlockError> for ApiError {
    fn from(err: LaterlockError) -> Self {
        ApiError::Core(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Rejected(rejection)
    }
}

impl ApiError {
    fn parts(&self) -> (StatusCode, ErrorBody) {
        match self {
            ApiError::Core(err) => core_parts(err),
            ApiError::Rejected(rejection) => {
                let status = match rejection.status() {
                    StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
                    _ => StatusCode::BAD_REQUEST,
                };
                (
                    status,
                    ErrorBody::new(rejection.body_text(), "validation_error"),
                )
            }
            ApiError::Task(detail) => {
                tracing::error!(error = %detail, "blocking task failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new("Internal server error", "internal_error"),
                )
            }
        }
    }
}

fn core_parts(err: &LaterlockError) -> (StatusCode, ErrorBody) {
    let reason = err.reason();
    match err {
        LaterlockError::Validation(message) => {
            (StatusCode::BAD_REQUEST, ErrorBody::new(message.clone(), reason))
        }
        LaterlockError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            ErrorBody::new("Lock not found", reason),
        ),
        LaterlockError::NotRequested => (
            StatusCode::FORBIDDEN,
            ErrorBody::new("Access has not been requested for this lock", reason),
        ),
        LaterlockError::WaitNotElapsed { remaining_seconds } => (
            StatusCode::FORBIDDEN,
            ErrorBody {
                error: "Wait time not elapsed".to_string(),
                reason,
                remaining_seconds: Some(*remaining_seconds),
            },
        ),
        LaterlockError::Decryption => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorBody::new("Failed to decrypt content", reason),
        ),
        LaterlockError::Crypto(_) | LaterlockError::Storage(_) => {
            tracing::error!(error = %err, "internal error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody::new("Internal server error", reason),
            )
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = self.parts();
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (LaterlockError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (LaterlockError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (LaterlockError::NotRequested, StatusCode::FORBIDDEN),
            (
                LaterlockError::WaitNotElapsed {
                    remaining_seconds: 3,
                },
                StatusCode::FORBIDDEN,
            ),
            (LaterlockError::Decryption, StatusCode::INTERNAL_SERVER_ERROR),
            (
                LaterlockError::Storage("disk full".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(core_parts(&err).0, expected, "{:?}", err);
        }
    }

    #[test]
    fn test_internal_detail_is_hidden() {
        let (_, body) = core_parts(&LaterlockError::Storage("disk full at /var/x".into()));
        assert_eq!(body.error, "Internal server error");
        assert_eq!(body.reason, "internal_error");
    }

    #[test]
    fn test_wait_not_elapsed_carries_seconds() {
        let (_, body) = core_parts(&LaterlockError::WaitNotElapsed {
            remaining_seconds: 42,
        });
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["remainingSeconds"], 42);
        assert_eq!(json["reason"], "wait_not_elapsed");
    }
}
