use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::wizard::controller::TransitionError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Evaluation service failures are not here: they are recoverable and end up
/// in the session banner of an otherwise normal response.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(#[from] TransitionError),

    #[error("A submission is already in progress")]
    SubmissionInProgress,

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::InvalidTransition(e) => {
                // The client asked for a screen change the wizard does not allow.
                tracing::error!("Rejected wizard transition: {e}");
                (StatusCode::CONFLICT, "INVALID_TRANSITION", e.to_string())
            }
            AppError::SubmissionInProgress => (
                StatusCode::CONFLICT,
                "SUBMISSION_IN_PROGRESS",
                "Your skills are already being evaluated".to_string(),
            ),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::controller::ScreenKind;

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::NotFound("session".into()), StatusCode::NOT_FOUND),
            (AppError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (AppError::SubmissionInProgress, StatusCode::CONFLICT),
            (
                AppError::InvalidTransition(TransitionError {
                    from: ScreenKind::Landing,
                    action: "go back",
                }),
                StatusCode::CONFLICT,
            ),
            (
                AppError::Internal(anyhow::anyhow!("boom")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_transition_message() {
        let err = AppError::from(TransitionError {
            from: ScreenKind::Landing,
            action: "go back",
        });
        assert_eq!(
            err.to_string(),
            "Invalid transition: cannot go back from the Landing screen"
        );
    }
}
