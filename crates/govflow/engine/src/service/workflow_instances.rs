//! Workflow instance operations

use super::GovernanceService;
use crate::progress::{rank_by_progress, WorkflowInstanceProgress};
use chrono::Utc;
use govflow_store::{ChecklistInstanceStore, WorkflowInstanceStore};
use govflow_types::{
    GovernanceError, GovernanceResult, ProjectId, WorkflowInstance, WorkflowInstanceId,
    WorkflowInstancePatch,
};
use tracing::info;

impl GovernanceService {
    /// Workflow instances of a project, most advanced first
    pub async fn list_workflow_instances(
        &self,
        project_id: &ProjectId,
    ) -> GovernanceResult<Vec<WorkflowInstanceProgress>> {
        self.get_project(project_id).await?;

        let workflows = self.store.list_workflow_instances(project_id).await?;
        let workflow_ids: Vec<_> = workflows.iter().map(|w| w.id).collect();
        let items = self
            .store
            .list_checklist_instances_for_workflows(&workflow_ids)
            .await?;

        Ok(rank_by_progress(workflows, &items))
    }

    pub async fn get_workflow_instance(
        &self,
        id: &WorkflowInstanceId,
    ) -> GovernanceResult<WorkflowInstance> {
        self.store
            .get_workflow_instance(id)
            .await?
            .ok_or_else(|| GovernanceError::not_found("Workflow instance", id))
    }

    pub async fn update_workflow_instance(
        &self,
        id: &WorkflowInstanceId,
        patch: WorkflowInstancePatch,
    ) -> GovernanceResult<WorkflowInstance> {
        patch.validate()?;
        let mut instance = self.get_workflow_instance(id).await?;

        if let Some(name) = patch.name {
            instance.name = name;
        }
        if let Some(description) = patch.description {
            instance.description = Some(description);
        }
        if let Some(metadata) = patch.metadata {
            instance.metadata = metadata;
        }
        if let Some(status) = patch.status {
            instance.status = status;
        }
        instance.updated_at = Utc::now();

        self.store.update_workflow_instance(instance.clone()).await?;
        info!(workflow_instance_id = %id, status = %instance.status, "Updated workflow instance");
        Ok(instance)
    }
}
