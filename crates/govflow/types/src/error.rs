//! Domain error taxonomy shared by every Govflow layer

use crate::{ChecklistItemInstanceId, IdError};

/// Result alias for domain operations
pub type GovernanceResult<T> = Result<T, GovernanceError>;

/// Errors surfaced by governance operations.
///
/// `Internal` is kept apart from the client-error variants so storage
/// failures are never reported as bad requests.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GovernanceError {
    #[error("{0}")]
    NotFound(String),

    /// The dependency gate refused a transition to `complete`
    #[error("{message}")]
    PreconditionFailed {
        message: String,
        unmet: Vec<ChecklistItemInstanceId>,
    },

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl GovernanceError {
    pub fn not_found(kind: &str, id: impl std::fmt::Display) -> Self {
        GovernanceError::NotFound(format!("{} {} not found", kind, id))
    }

    /// Dependency-gate refusal listing the prerequisites that are not complete
    pub fn dependencies_incomplete(unmet: Vec<ChecklistItemInstanceId>) -> Self {
        GovernanceError::PreconditionFailed {
            message: "Cannot mark as complete - dependencies are not complete".to_string(),
            unmet,
        }
    }

    pub fn is_client_error(&self) -> bool {
        !matches!(self, GovernanceError::Internal(_))
    }
}

impl From<IdError> for GovernanceError {
    fn from(err: IdError) -> Self {
        GovernanceError::BadRequest(err.to_string())
    }
}
