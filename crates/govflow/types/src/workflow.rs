//! Workflow templates and the per-project workflow instances cloned from them

use crate::{GovernanceTemplateId, Metadata, ProjectId, WorkflowInstanceId, WorkflowTemplateId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An ordered phase within a governance template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowTemplate {
    pub id: WorkflowTemplateId,
    pub governance_template_id: GovernanceTemplateId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub metadata: Metadata,
    /// Dense zero-based position within the governance template
    pub order: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WorkflowTemplate {
    pub fn new(governance_template_id: GovernanceTemplateId, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: WorkflowTemplateId::generate(),
            governance_template_id,
            name: name.into(),
            description: None,
            metadata: Metadata::new(),
            order: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_order(mut self, order: u32) -> Self {
        self.order = order;
        self
    }
}

/// Lifecycle of a workflow instance. Never advanced automatically.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    #[default]
    Active,
    Completed,
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowStatus::Active => write!(f, "active"),
            WorkflowStatus::Completed => write!(f, "completed"),
        }
    }
}

/// A workflow template instantiated inside one project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowInstance {
    pub id: WorkflowInstanceId,
    pub project_id: ProjectId,
    pub workflow_template_id: WorkflowTemplateId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: WorkflowStatus,
    #[serde(default)]
    pub metadata: Metadata,
    /// Copied from the template at creation time
    #[serde(default)]
    pub order: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WorkflowInstance {
    pub fn from_template(template: &WorkflowTemplate, project_id: ProjectId) -> Self {
        let now = Utc::now();
        Self {
            id: WorkflowInstanceId::generate(),
            project_id,
            workflow_template_id: template.id,
            name: template.name.clone(),
            description: template.description.clone(),
            status: WorkflowStatus::Active,
            metadata: template.metadata.clone(),
            order: template.order,
            created_at: now,
            updated_at: now,
        }
    }
}
