use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;
use crate::resume::sections::ResumeParseError;
use crate::resume::upload::UploadError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Maps a generation failure for `what` (e.g. "job details") to an error the
    /// client can act on. Unparseable output is retryable and reported as such.
    pub fn from_llm(what: &str, err: LlmError) -> Self {
        match err {
            LlmError::Parse(failure) => {
                tracing::warn!("Model output for {what} was unusable: {failure}");
                AppError::UnprocessableEntity(format!(
                    "Could not parse {what} from the model response; please retry"
                ))
            }
            other => AppError::Llm(format!("Generating {what} failed: {other}")),
        }
    }
}

impl From<ResumeParseError> for AppError {
    fn from(err: ResumeParseError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::Unreadable(_) => AppError::UnprocessableEntity(err.to_string()),
            other => AppError::Validation(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnprocessableEntity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_ENTITY",
                msg.clone(),
            ),
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "LLM_ERROR",
                    "The AI service could not complete the request; please retry".to_string(),
                )
            }
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
    use crate::llm_client::json_recovery::ParseFailure;

    #[test]
    fn test_parse_failure_maps_to_retryable_422() {
        let err = AppError::from_llm("analysis", LlmError::Parse(ParseFailure::NoJsonFound));
        match &err {
            AppError::UnprocessableEntity(msg) => {
                assert!(msg.contains("analysis"));
                assert!(msg.contains("retry"));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_other_llm_failures_map_to_bad_gateway() {
        let err = AppError::from_llm("job details", LlmError::EmptyContent);
        assert!(matches!(err, AppError::Llm(_)));
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_empty_resume_is_bad_request() {
        let err = AppError::from(ResumeParseError::EmptyInput);
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_unreadable_upload_is_unprocessable() {
        let err = AppError::from(UploadError::Unreadable("bad xref".to_string()));
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
        let err = AppError::from(UploadError::TooLarge { max_bytes: 1 });
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_validation_is_bad_request() {
        let response = AppError::Validation("nope".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
