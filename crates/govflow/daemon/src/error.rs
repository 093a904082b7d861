//! Error types for govflow-daemon

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use govflow_types::{ChecklistItemInstanceId, GovernanceError, IdError};
use serde::Serialize;
use thiserror::Error;

/// Daemon-level errors
#[derive(Debug, Error)]
pub enum DaemonError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Server startup error
    #[error("Server error: {0}")]
    Server(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// API-specific errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found
    #[error("{0}")]
    NotFound(String),

    /// Bad request
    #[error("{0}")]
    BadRequest(String),

    /// Conflict
    #[error("{0}")]
    Conflict(String),

    /// Completion refused because prerequisites are not complete
    #[error("{message}")]
    PreconditionFailed {
        message: String,
        unmet: Vec<ChecklistItemInstanceId>,
    },

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            ApiError::PreconditionFailed { .. } => {
                (StatusCode::PRECONDITION_FAILED, "PRECONDITION_FAILED")
            }
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let details = match &self {
            ApiError::PreconditionFailed { unmet, .. } => {
                Some(serde_json::json!({ "unmet_dependencies": unmet }))
            }
            ApiError::Internal(message) => {
                tracing::error!(error = %message, "Request failed");
                None
            }
            _ => None,
        };

        let body = ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<GovernanceError> for ApiError {
    fn from(err: GovernanceError) -> Self {
        match err {
            GovernanceError::NotFound(message) => ApiError::NotFound(message),
            GovernanceError::PreconditionFailed { message, unmet } => {
                ApiError::PreconditionFailed { message, unmet }
            }
            GovernanceError::Conflict(message) => ApiError::Conflict(message),
            GovernanceError::BadRequest(message) => ApiError::BadRequest(message),
            err @ GovernanceError::Validation(_) => ApiError::BadRequest(err.to_string()),
            GovernanceError::Internal(message) => ApiError::Internal(message),
        }
    }
}

impl From<IdError> for ApiError {
    fn from(err: IdError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Result type alias for daemon operations
pub type DaemonResult<T> = Result<T, DaemonError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_status_codes() {
        assert_eq!(
            ApiError::NotFound("test".to_string()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::BadRequest("test".to_string()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Conflict("test".to_string()).into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Internal("test".to_string()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_domain_errors_map_to_status() {
        let gate = GovernanceError::dependencies_incomplete(vec![ChecklistItemInstanceId::generate()]);
        assert_eq!(
            ApiError::from(gate).into_response().status(),
            StatusCode::PRECONDITION_FAILED
        );

        let validation = ApiError::from(GovernanceError::Validation("name must not be empty".into()));
        assert!(matches!(&validation, ApiError::BadRequest(msg) if msg.contains("name")));

        let storage = ApiError::from(GovernanceError::Internal("disk full".into()));
        assert_eq!(storage.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_malformed_id_is_bad_request() {
        let err = govflow_types::ProjectId::parse("nope").unwrap_err();
        assert!(matches!(ApiError::from(err), ApiError::BadRequest(_)));
    }
}
