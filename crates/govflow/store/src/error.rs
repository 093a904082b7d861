//! Storage error type and its translation into the domain taxonomy

use govflow_types::{ChecklistItemInstanceId, GovernanceError};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StorageError {
    #[error("{collection} {id} not found")]
    NotFound { collection: &'static str, id: String },

    /// Unique-constraint violation
    #[error("{0}")]
    Conflict(String),

    /// A conditional write found prerequisites that are not complete
    #[error("{} prerequisite(s) not complete", unmet.len())]
    PreconditionFailed { unmet: Vec<ChecklistItemInstanceId> },

    #[error("stale version for {id}: expected {expected}, found {actual}")]
    StaleVersion {
        id: ChecklistItemInstanceId,
        expected: u64,
        actual: u64,
    },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("storage backend error: {0}")]
    Backend(String),
}

impl StorageError {
    pub fn not_found(collection: &'static str, id: impl std::fmt::Display) -> Self {
        StorageError::NotFound {
            collection,
            id: id.to_string(),
        }
    }
}

impl From<StorageError> for GovernanceError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { .. } => GovernanceError::NotFound(err.to_string()),
            StorageError::Conflict(message) => GovernanceError::Conflict(message),
            StorageError::PreconditionFailed { unmet } => {
                GovernanceError::dependencies_incomplete(unmet)
            }
            StorageError::StaleVersion { .. } => GovernanceError::Conflict(err.to_string()),
            StorageError::InvalidInput(message) => GovernanceError::BadRequest(message),
            StorageError::Backend(message) => GovernanceError::Internal(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_failures_stay_internal() {
        let err: GovernanceError = StorageError::Backend("connection reset".into()).into();
        assert_eq!(err, GovernanceError::Internal("connection reset".into()));
    }

    #[test]
    fn test_unmet_prerequisites_become_precondition_failure() {
        let dep = ChecklistItemInstanceId::generate();
        let err: GovernanceError = StorageError::PreconditionFailed { unmet: vec![dep] }.into();
        assert!(matches!(
            err,
            GovernanceError::PreconditionFailed { ref unmet, .. } if unmet == &vec![dep]
        ));
    }

    #[test]
    fn test_not_found_message() {
        let err = StorageError::not_found("project", "abc");
        assert_eq!(err.to_string(), "project abc not found");
        assert!(matches!(
            GovernanceError::from(err),
            GovernanceError::NotFound(_)
        ));
    }
}
