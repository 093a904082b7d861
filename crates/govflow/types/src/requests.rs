//! Creation requests and partial updates accepted by the governance service
//!
//! Every patch rejects an empty body; creation requests reject blank names.

use crate::{
    ChecklistItemType, ChecklistStatus, GovernanceError, GovernanceResult, GovernanceTemplateId,
    Metadata, WorkflowStatus, WorkflowTemplateId, ChecklistItemTemplateId,
};
use serde::{Deserialize, Serialize};

fn require_text(field: &str, value: &str) -> GovernanceResult<()> {
    if value.trim().is_empty() {
        return Err(GovernanceError::Validation(format!("{} must not be empty", field)));
    }
    Ok(())
}

fn require_optional_text(field: &str, value: Option<&str>) -> GovernanceResult<()> {
    match value {
        Some(value) => require_text(field, value),
        None => Ok(()),
    }
}

fn empty_patch() -> GovernanceError {
    GovernanceError::Validation("at least one field must be provided".to_string())
}

// ── Governance templates ─────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGovernanceTemplate {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewGovernanceTemplate {
    pub fn validate(&self) -> GovernanceResult<()> {
        require_text("name", &self.name)?;
        require_text("version", &self.version)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GovernanceTemplatePatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl GovernanceTemplatePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.version.is_none() && self.description.is_none()
    }

    pub fn validate(&self) -> GovernanceResult<()> {
        if self.is_empty() {
            return Err(empty_patch());
        }
        require_optional_text("name", self.name.as_deref())?;
        require_optional_text("version", self.version.as_deref())
    }
}

// ── Workflow templates ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewWorkflowTemplate {
    pub governance_template_id: GovernanceTemplateId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl NewWorkflowTemplate {
    pub fn validate(&self) -> GovernanceResult<()> {
        require_text("name", &self.name)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkflowTemplatePatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub metadata: Option<Metadata>,
    /// Target position; siblings shift to make room
    #[serde(default)]
    pub order: Option<u32>,
}

impl WorkflowTemplatePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.metadata.is_none()
            && self.order.is_none()
    }

    pub fn validate(&self) -> GovernanceResult<()> {
        if self.is_empty() {
            return Err(empty_patch());
        }
        require_optional_text("name", self.name.as_deref())
    }
}

// ── Checklist-item templates ─────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewChecklistItemTemplate {
    pub workflow_template_id: WorkflowTemplateId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub item_type: ChecklistItemType,
    #[serde(default)]
    pub dependencies_requires: Vec<ChecklistItemTemplateId>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl NewChecklistItemTemplate {
    pub fn validate(&self) -> GovernanceResult<()> {
        require_text("name", &self.name)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChecklistItemTemplatePatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "type")]
    pub item_type: Option<ChecklistItemType>,
    /// Replaces the whole dependency set
    #[serde(default)]
    pub dependencies_requires: Option<Vec<ChecklistItemTemplateId>>,
    #[serde(default)]
    pub metadata: Option<Metadata>,
    #[serde(default)]
    pub order: Option<u32>,
}

impl ChecklistItemTemplatePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.item_type.is_none()
            && self.dependencies_requires.is_none()
            && self.metadata.is_none()
            && self.order.is_none()
    }

    pub fn validate(&self) -> GovernanceResult<()> {
        if self.is_empty() {
            return Err(empty_patch());
        }
        require_optional_text("name", self.name.as_deref())
    }
}

// ── Projects ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProject {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub governance_template_id: GovernanceTemplateId,
    pub selected_workflow_template_ids: Vec<WorkflowTemplateId>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl NewProject {
    pub fn validate(&self) -> GovernanceResult<()> {
        require_text("name", &self.name)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub metadata: Option<Metadata>,
}

impl ProjectPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.metadata.is_none()
    }

    pub fn validate(&self) -> GovernanceResult<()> {
        if self.is_empty() {
            return Err(empty_patch());
        }
        require_optional_text("name", self.name.as_deref())
    }
}

// ── Workflow instances ───────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkflowInstancePatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub metadata: Option<Metadata>,
    #[serde(default)]
    pub status: Option<WorkflowStatus>,
}

impl WorkflowInstancePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.metadata.is_none()
            && self.status.is_none()
    }

    pub fn validate(&self) -> GovernanceResult<()> {
        if self.is_empty() {
            return Err(empty_patch());
        }
        require_optional_text("name", self.name.as_deref())
    }
}

// ── Checklist-item instances ─────────────────────────────────────────

pub const DEPENDENCIES_MANAGED_MESSAGE: &str =
    "Cannot update dependencies - they are managed by the system";

/// Partial update of a checklist-item instance.
///
/// `dependencies_requires` is captured only so its presence can be
/// rejected; instance dependency sets are never client-writable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChecklistItemInstancePatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<ChecklistStatus>,
    #[serde(default)]
    pub metadata: Option<Metadata>,
    #[serde(default)]
    pub order: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies_requires: Option<serde_json::Value>,
}

impl ChecklistItemInstancePatch {
    pub fn touches_dependencies(&self) -> bool {
        self.dependencies_requires.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.metadata.is_none()
            && self.order.is_none()
            && self.dependencies_requires.is_none()
    }

    /// Rejects system-managed fields first, then empty or malformed input
    pub fn validate(&self) -> GovernanceResult<()> {
        if self.touches_dependencies() {
            return Err(GovernanceError::BadRequest(
                DEPENDENCIES_MANAGED_MESSAGE.to_string(),
            ));
        }
        if self.is_empty() {
            return Err(empty_patch());
        }
        require_optional_text("name", self.name.as_deref())
    }
}

/// Body of the dedicated status-transition call
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: ChecklistStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_patches_rejected() {
        assert!(GovernanceTemplatePatch::default().validate().is_err());
        assert!(WorkflowTemplatePatch::default().validate().is_err());
        assert!(ChecklistItemTemplatePatch::default().validate().is_err());
        assert!(ProjectPatch::default().validate().is_err());
        assert!(WorkflowInstancePatch::default().validate().is_err());
        assert!(ChecklistItemInstancePatch::default().validate().is_err());
    }

    #[test]
    fn test_blank_name_rejected() {
        let request = NewGovernanceTemplate {
            name: "  ".into(),
            version: "1".into(),
            description: None,
        };
        assert!(matches!(
            request.validate(),
            Err(GovernanceError::Validation(_))
        ));
    }

    #[test]
    fn test_instance_patch_detects_dependencies_even_when_empty() {
        let patch: ChecklistItemInstancePatch =
            serde_json::from_str(r#"{"dependencies_requires": []}"#).unwrap();
        assert!(patch.touches_dependencies());
        match patch.validate() {
            Err(GovernanceError::BadRequest(message)) => {
                assert_eq!(message, DEPENDENCIES_MANAGED_MESSAGE)
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_instance_patch_status_only() {
        let patch: ChecklistItemInstancePatch =
            serde_json::from_str(r#"{"status": "not_required"}"#).unwrap();
        assert!(patch.validate().is_ok());
        assert_eq!(patch.status, Some(ChecklistStatus::NotRequired));
    }

    #[test]
    fn test_template_patch_type_field() {
        let patch: ChecklistItemTemplatePatch =
            serde_json::from_str(r#"{"type": "document"}"#).unwrap();
        assert_eq!(patch.item_type, Some(ChecklistItemType::Document));
        assert!(patch.validate().is_ok());
    }
}
