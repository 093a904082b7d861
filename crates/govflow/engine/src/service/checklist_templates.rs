//! Checklist-item template operations and dependency maintenance

use super::GovernanceService;
use crate::maintenance::{check_dependency_scope, ensure_acyclic, normalize_dependencies};
use crate::sequencing::{next_order, plan_compaction, plan_move};
use chrono::Utc;
use govflow_store::{ChecklistTemplateStore, WorkflowTemplateStore};
use govflow_types::{
    ChecklistItemTemplate, ChecklistItemTemplateId, ChecklistItemTemplatePatch, GovernanceError,
    GovernanceResult, NewChecklistItemTemplate, WorkflowTemplate, WorkflowTemplateId,
};
use tracing::{debug, info};

impl GovernanceService {
    pub async fn create_checklist_item_template(
        &self,
        request: NewChecklistItemTemplate,
    ) -> GovernanceResult<ChecklistItemTemplate> {
        request.validate()?;
        let workflow = self.get_workflow_template(&request.workflow_template_id).await?;

        let mut template =
            ChecklistItemTemplate::new(workflow.id, request.name, request.item_type);
        template.description = request.description;
        template.metadata = request.metadata;
        template.dependencies_requires =
            normalize_dependencies(template.id, request.dependencies_requires);

        let universe = self.template_universe(&workflow).await?;
        check_dependency_scope(&template.dependencies_requires, &universe)?;
        ensure_acyclic(&universe, &template)?;

        template.order = next_order(
            universe
                .iter()
                .filter(|t| t.workflow_template_id == workflow.id)
                .map(|t| t.order),
        );

        self.store.insert_checklist_template(template.clone()).await?;
        info!(
            checklist_item_template_id = %template.id,
            workflow_template_id = %workflow.id,
            dependencies = template.dependencies_requires.len(),
            order = template.order,
            "Created checklist item template"
        );
        Ok(template)
    }

    pub async fn get_checklist_item_template(
        &self,
        id: &ChecklistItemTemplateId,
    ) -> GovernanceResult<ChecklistItemTemplate> {
        self.store
            .get_checklist_template(id)
            .await?
            .ok_or_else(|| GovernanceError::not_found("Checklist item template", id))
    }

    pub async fn list_checklist_item_templates(
        &self,
        workflow_template_id: Option<&WorkflowTemplateId>,
    ) -> GovernanceResult<Vec<ChecklistItemTemplate>> {
        Ok(self.store.list_checklist_templates(workflow_template_id).await?)
    }

    /// Apply a patch. A new dependency set replaces the old one after
    /// normalisation, scope and cycle checks; a new `order` moves the
    /// template among its siblings.
    pub async fn update_checklist_item_template(
        &self,
        id: &ChecklistItemTemplateId,
        patch: ChecklistItemTemplatePatch,
    ) -> GovernanceResult<ChecklistItemTemplate> {
        patch.validate()?;
        let mut template = self.get_checklist_item_template(id).await?;

        if let Some(name) = patch.name {
            template.name = name;
        }
        if let Some(description) = patch.description {
            template.description = Some(description);
        }
        if let Some(item_type) = patch.item_type {
            template.item_type = item_type;
        }
        if let Some(metadata) = patch.metadata {
            template.metadata = metadata;
        }
        if let Some(requested) = patch.dependencies_requires {
            template.dependencies_requires = normalize_dependencies(template.id, requested);
            let workflow = self.get_workflow_template(&template.workflow_template_id).await?;
            let universe = self.template_universe(&workflow).await?;
            check_dependency_scope(&template.dependencies_requires, &universe)?;
            ensure_acyclic(&universe, &template)?;
        }
        template.updated_at = Utc::now();
        self.store.update_checklist_template(template.clone()).await?;

        if let Some(target) = patch.order {
            let siblings = self
                .store
                .list_checklist_templates(Some(&template.workflow_template_id))
                .await?;
            let positions: Vec<_> = siblings.iter().map(|t| (t.id, t.order)).collect();
            let plan = plan_move(&positions, *id, target)
                .ok_or_else(|| GovernanceError::not_found("Checklist item template", id))?;
            debug!(checklist_item_template_id = %id, target, changed = plan.len(), "Moving checklist item template");
            self.store.apply_checklist_template_orders(&plan).await?;
        }

        info!(checklist_item_template_id = %id, "Updated checklist item template");
        self.get_checklist_item_template(id).await
    }

    /// Pull the id from every dependency set, delete the template, then
    /// re-densify sibling orders
    pub async fn delete_checklist_item_template(
        &self,
        id: &ChecklistItemTemplateId,
    ) -> GovernanceResult<()> {
        let template = self.get_checklist_item_template(id).await?;

        let detached = self.store.pull_checklist_dependencies(&[*id]).await?;
        self.store.delete_checklist_template(id).await?;

        let siblings = self
            .store
            .list_checklist_templates(Some(&template.workflow_template_id))
            .await?;
        let positions: Vec<_> = siblings.iter().map(|t| (t.id, t.order)).collect();
        let plan = plan_compaction(&positions);
        if !plan.is_empty() {
            self.store.apply_checklist_template_orders(&plan).await?;
        }

        info!(
            checklist_item_template_id = %id,
            detached_dependents = detached,
            resequenced = plan.len(),
            "Deleted checklist item template"
        );
        Ok(())
    }

    /// Every checklist-item template of the governance template owning `workflow`
    async fn template_universe(
        &self,
        workflow: &WorkflowTemplate,
    ) -> GovernanceResult<Vec<ChecklistItemTemplate>> {
        let workflows = self
            .store
            .list_workflow_templates(Some(&workflow.governance_template_id))
            .await?;
        let workflow_ids: Vec<_> = workflows.iter().map(|w| w.id).collect();
        Ok(self
            .store
            .list_checklist_templates_for_workflows(&workflow_ids)
            .await?)
    }
}
