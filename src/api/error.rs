//! HTTP error responses for the coach API.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{error, warn};

use crate::error::{ChecklistError, LlmError, ScreenshotError};

/// Message returned for unknown task types.
pub const INVALID_TASK_TYPE: &str = "Invalid task type";

/// An API failure, rendered as `{"error": message}` with a matching status.
#[derive(Debug)]
pub enum ApiError {
    /// Missing or invalid request input.
    BadRequest(String),
    /// Unknown resource named in the path.
    NotFound(String),
    /// Collaborator failure or unexpected fault.
    Internal(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Map a checklist error for a task type taken from the URL path.
    pub fn from_path_lookup(err: ChecklistError) -> Self {
        match err {
            ChecklistError::UnknownTaskType(_) => Self::NotFound(INVALID_TASK_TYPE.to_string()),
            other => Self::from_body_lookup(other),
        }
    }

    /// Map a checklist error for a task type or step taken from a request body.
    pub fn from_body_lookup(err: ChecklistError) -> Self {
        match err {
            ChecklistError::UnknownTaskType(_) => Self::BadRequest(INVALID_TASK_TYPE.to_string()),
            invalid @ ChecklistError::InvalidStep { .. } => Self::BadRequest(invalid.to_string()),
            other => Self::Internal(other.to_string()),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest(m) | Self::NotFound(m) | Self::Internal(m) => m,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<ScreenshotError> for ApiError {
    fn from(err: ScreenshotError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<LlmError> for ApiError {
    fn from(err: LlmError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = %status, error = self.message(), "Request failed");
        } else {
            warn!(status = %status, error = self.message(), "Request rejected");
        }
        (status, Json(serde_json::json!({ "error": self.message() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_task_type_in_path_is_not_found() {
        let err = ApiError::from_path_lookup(ChecklistError::UnknownTaskType("x".into()));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.message(), INVALID_TASK_TYPE);
    }

    #[test]
    fn unknown_task_type_in_body_is_bad_request() {
        let err = ApiError::from_body_lookup(ChecklistError::UnknownTaskType("x".into()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), INVALID_TASK_TYPE);
    }

    #[test]
    fn invalid_step_is_bad_request_on_both_paths() {
        let step_err = || ChecklistError::InvalidStep { step: 9, total: 7 };
        assert_eq!(
            ApiError::from_path_lookup(step_err()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from_body_lookup(step_err()).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn llm_failures_are_internal() {
        let err: ApiError = LlmError::RateLimited {
            provider: "gemini".into(),
        }
        .into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.message().contains("rate limited"));
    }
}
