//! Governance template operations

use super::GovernanceService;
use chrono::Utc;
use govflow_store::{ChecklistTemplateStore, GovernanceTemplateStore, WorkflowTemplateStore};
use govflow_types::{
    GovernanceError, GovernanceResult, GovernanceTemplate, GovernanceTemplateId,
    GovernanceTemplateOverview, GovernanceTemplatePatch, NewGovernanceTemplate,
};
use tracing::info;

impl GovernanceService {
    pub async fn create_governance_template(
        &self,
        request: NewGovernanceTemplate,
    ) -> GovernanceResult<GovernanceTemplate> {
        request.validate()?;

        let mut template = GovernanceTemplate::new(request.name, request.version);
        template.description = request.description;
        self.store.insert_governance_template(template.clone()).await?;

        info!(
            governance_template_id = %template.id,
            name = %template.name,
            version = %template.version,
            "Created governance template"
        );
        Ok(template)
    }

    pub async fn get_governance_template(
        &self,
        id: &GovernanceTemplateId,
    ) -> GovernanceResult<GovernanceTemplate> {
        self.store
            .get_governance_template(id)
            .await?
            .ok_or_else(|| GovernanceError::not_found("Governance template", id))
    }

    /// Newest first, each with its workflow templates in order
    pub async fn list_governance_templates(
        &self,
    ) -> GovernanceResult<Vec<GovernanceTemplateOverview>> {
        let templates = self.store.list_governance_templates().await?;
        let mut overviews = Vec::with_capacity(templates.len());
        for template in templates {
            let workflow_templates = self.store.list_workflow_templates(Some(&template.id)).await?;
            overviews.push(GovernanceTemplateOverview {
                template,
                workflow_templates,
            });
        }
        Ok(overviews)
    }

    pub async fn update_governance_template(
        &self,
        id: &GovernanceTemplateId,
        patch: GovernanceTemplatePatch,
    ) -> GovernanceResult<GovernanceTemplate> {
        patch.validate()?;
        let mut template = self.get_governance_template(id).await?;

        if let Some(name) = patch.name {
            template.name = name;
        }
        if let Some(version) = patch.version {
            template.version = version;
        }
        if let Some(description) = patch.description {
            template.description = Some(description);
        }
        template.updated_at = Utc::now();

        self.store.update_governance_template(template.clone()).await?;
        info!(governance_template_id = %id, "Updated governance template");
        Ok(template)
    }

    /// Delete the template with all of its workflow and checklist-item templates
    pub async fn delete_governance_template(&self, id: &GovernanceTemplateId) -> GovernanceResult<()> {
        self.get_governance_template(id).await?;

        let workflows = self.store.list_workflow_templates(Some(id)).await?;
        let workflow_ids: Vec<_> = workflows.iter().map(|w| w.id).collect();
        let items = self
            .store
            .list_checklist_templates_for_workflows(&workflow_ids)
            .await?;
        let item_ids: Vec<_> = items.iter().map(|t| t.id).collect();

        self.store.pull_checklist_dependencies(&item_ids).await?;
        for item_id in &item_ids {
            self.store.delete_checklist_template(item_id).await?;
        }
        for workflow_id in &workflow_ids {
            self.store.delete_workflow_template(workflow_id).await?;
        }
        self.store.delete_governance_template(id).await?;

        info!(
            governance_template_id = %id,
            workflow_templates = workflow_ids.len(),
            checklist_item_templates = item_ids.len(),
            "Deleted governance template"
        );
        Ok(())
    }
}
