//! Projects: concrete instantiations of a governance template

use crate::{GovernanceTemplateId, Metadata, ProjectId, WorkflowInstance, WorkflowTemplateId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub governance_template_id: GovernanceTemplateId,
    /// Workflow templates chosen at creation; fixed afterwards
    pub selected_workflow_template_ids: Vec<WorkflowTemplateId>,
    #[serde(default)]
    pub metadata: Metadata,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn new(
        name: impl Into<String>,
        governance_template_id: GovernanceTemplateId,
        selected_workflow_template_ids: Vec<WorkflowTemplateId>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ProjectId::generate(),
            name: name.into(),
            description: None,
            governance_template_id,
            selected_workflow_template_ids,
            metadata: Metadata::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_selected(&self, workflow_template_id: &WorkflowTemplateId) -> bool {
        self.selected_workflow_template_ids
            .contains(workflow_template_id)
    }
}

/// Result of project creation: the project and the workflow instances
/// projected from its selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectWithWorkflows {
    #[serde(flatten)]
    pub project: Project,
    pub workflow_instances: Vec<WorkflowInstance>,
}
