//! Workflow template operations

use super::GovernanceService;
use crate::sequencing::{next_order, plan_compaction, plan_move};
use chrono::Utc;
use govflow_store::{ChecklistTemplateStore, WorkflowTemplateStore};
use govflow_types::{
    GovernanceError, GovernanceResult, GovernanceTemplateId, NewWorkflowTemplate,
    WorkflowTemplate, WorkflowTemplateId, WorkflowTemplatePatch,
};
use tracing::{debug, info};

impl GovernanceService {
    pub async fn create_workflow_template(
        &self,
        request: NewWorkflowTemplate,
    ) -> GovernanceResult<WorkflowTemplate> {
        request.validate()?;
        let governance_id = request.governance_template_id;
        self.get_governance_template(&governance_id).await?;

        let siblings = self.store.list_workflow_templates(Some(&governance_id)).await?;
        let mut template = WorkflowTemplate::new(governance_id, request.name)
            .with_order(next_order(siblings.iter().map(|w| w.order)));
        template.description = request.description;
        template.metadata = request.metadata;

        self.store.insert_workflow_template(template.clone()).await?;
        info!(
            workflow_template_id = %template.id,
            governance_template_id = %governance_id,
            order = template.order,
            "Created workflow template"
        );
        Ok(template)
    }

    pub async fn get_workflow_template(
        &self,
        id: &WorkflowTemplateId,
    ) -> GovernanceResult<WorkflowTemplate> {
        self.store
            .get_workflow_template(id)
            .await?
            .ok_or_else(|| GovernanceError::not_found("Workflow template", id))
    }

    pub async fn list_workflow_templates(
        &self,
        governance_template_id: Option<&GovernanceTemplateId>,
    ) -> GovernanceResult<Vec<WorkflowTemplate>> {
        Ok(self.store.list_workflow_templates(governance_template_id).await?)
    }

    pub async fn update_workflow_template(
        &self,
        id: &WorkflowTemplateId,
        patch: WorkflowTemplatePatch,
    ) -> GovernanceResult<WorkflowTemplate> {
        patch.validate()?;
        let mut template = self.get_workflow_template(id).await?;

        let has_fields = patch.name.is_some() || patch.description.is_some() || patch.metadata.is_some();
        if let Some(name) = patch.name {
            template.name = name;
        }
        if let Some(description) = patch.description {
            template.description = Some(description);
        }
        if let Some(metadata) = patch.metadata {
            template.metadata = metadata;
        }
        if has_fields {
            template.updated_at = Utc::now();
            self.store.update_workflow_template(template.clone()).await?;
        }

        if let Some(target) = patch.order {
            let siblings = self
                .store
                .list_workflow_templates(Some(&template.governance_template_id))
                .await?;
            let positions: Vec<_> = siblings.iter().map(|w| (w.id, w.order)).collect();
            let plan = plan_move(&positions, *id, target)
                .ok_or_else(|| GovernanceError::not_found("Workflow template", id))?;
            debug!(workflow_template_id = %id, target, changed = plan.len(), "Moving workflow template");
            self.store.apply_workflow_template_orders(&plan).await?;
        }

        info!(workflow_template_id = %id, "Updated workflow template");
        self.get_workflow_template(id).await
    }

    /// Delete the template and its checklist-item templates, then close
    /// the order gap among its siblings
    pub async fn delete_workflow_template(&self, id: &WorkflowTemplateId) -> GovernanceResult<()> {
        let template = self.get_workflow_template(id).await?;

        let items = self.store.list_checklist_templates(Some(id)).await?;
        let item_ids: Vec<_> = items.iter().map(|t| t.id).collect();
        let detached = self.store.pull_checklist_dependencies(&item_ids).await?;
        for item_id in &item_ids {
            self.store.delete_checklist_template(item_id).await?;
        }
        self.store.delete_workflow_template(id).await?;

        self.compact_workflow_templates(&template.governance_template_id).await?;

        info!(
            workflow_template_id = %id,
            checklist_item_templates = item_ids.len(),
            detached_dependents = detached,
            "Deleted workflow template"
        );
        Ok(())
    }

    async fn compact_workflow_templates(
        &self,
        governance_template_id: &GovernanceTemplateId,
    ) -> GovernanceResult<()> {
        let siblings = self
            .store
            .list_workflow_templates(Some(governance_template_id))
            .await?;
        let positions: Vec<_> = siblings.iter().map(|w| (w.id, w.order)).collect();
        let plan = plan_compaction(&positions);
        if !plan.is_empty() {
            self.store.apply_workflow_template_orders(&plan).await?;
        }
        Ok(())
    }
}
