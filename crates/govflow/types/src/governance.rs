//! Governance templates: the top-level reusable definition of a process

use crate::{GovernanceTemplateId, WorkflowTemplate};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Top-level reusable governance process definition.
///
/// `(name, version)` is unique across all governance templates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GovernanceTemplate {
    pub id: GovernanceTemplateId,
    pub name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GovernanceTemplate {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: GovernanceTemplateId::generate(),
            name: name.into(),
            version: version.into(),
            description: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Whether this template occupies the given `(name, version)` slot
    pub fn has_identity(&self, name: &str, version: &str) -> bool {
        self.name == name && self.version == version
    }
}

/// A governance template together with its workflow templates in order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GovernanceTemplateOverview {
    #[serde(flatten)]
    pub template: GovernanceTemplate,
    pub workflow_templates: Vec<WorkflowTemplate>,
}
