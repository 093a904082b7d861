//! Project operations, including instance projection at creation

use super::GovernanceService;
use crate::projection::{plan_projection, ProjectionPlan};
use chrono::Utc;
use govflow_store::{
    ChecklistInstanceStore, ChecklistTemplateStore, GovernanceTemplateStore, ProjectStore,
    WorkflowInstanceStore, WorkflowTemplateStore,
};
use govflow_types::{
    ChecklistItemInstanceId, GovernanceError, GovernanceResult, NewProject, Project, ProjectId,
    ProjectPatch, ProjectWithWorkflows, WorkflowInstanceId,
};
use std::collections::{HashMap, HashSet};
use tracing::{error, info, warn};

/// A document written during project creation
#[derive(Debug, Clone, Copy)]
enum Inserted {
    Project(ProjectId),
    WorkflowInstance(WorkflowInstanceId),
    ChecklistInstance(ChecklistItemInstanceId),
}

impl GovernanceService {
    /// Create a project and project the selected workflows into instances.
    ///
    /// Either every document is written or none are: on failure the
    /// documents inserted so far are deleted in reverse order.
    pub async fn create_project(&self, request: NewProject) -> GovernanceResult<ProjectWithWorkflows> {
        request.validate()?;
        let governance_id = request.governance_template_id;

        if self
            .store
            .get_governance_template(&governance_id)
            .await?
            .is_none()
        {
            warn!(governance_template_id = %governance_id, "Governance template not found");
            return Err(GovernanceError::BadRequest(
                "Governance template not found".to_string(),
            ));
        }

        let selected = request.selected_workflow_template_ids.clone();
        let workflows: Vec<_> = self
            .store
            .get_workflow_templates(&selected)
            .await?
            .into_iter()
            .filter(|w| w.governance_template_id == governance_id)
            .collect();
        if workflows.len() != selected.len() {
            warn!(
                governance_template_id = %governance_id,
                selected = selected.len(),
                found = workflows.len(),
                "Invalid workflow template selection"
            );
            return Err(GovernanceError::BadRequest(
                "One or more workflow templates are invalid or do not belong to the specified governance template"
                    .to_string(),
            ));
        }

        let workflow_ids: Vec<_> = workflows.iter().map(|w| w.id).collect();
        let templates = self
            .store
            .list_checklist_templates_for_workflows(&workflow_ids)
            .await?;

        let referenced: Vec<_> = templates
            .iter()
            .flat_map(|t| t.dependencies_requires.iter().copied())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let owners: HashMap<_, _> = self
            .store
            .get_checklist_templates(&referenced)
            .await?
            .into_iter()
            .map(|t| (t.id, t.workflow_template_id))
            .collect();

        let mut project = Project::new(request.name, governance_id, selected);
        project.description = request.description;
        project.metadata = request.metadata;

        let plan = plan_projection(project, &workflows, &templates, |id| owners.get(id).copied());

        let mut journal = Vec::new();
        if let Err(err) = self.persist_projection(&plan, &mut journal).await {
            error!(
                project_id = %plan.project.id,
                error = %err,
                written = journal.len(),
                "Project creation failed, rolling back"
            );
            self.roll_back(journal).await;
            return Err(err);
        }

        info!(
            project_id = %plan.project.id,
            governance_template_id = %governance_id,
            workflow_instances = plan.workflow_instances.len(),
            checklist_item_instances = plan.checklist_instances.len(),
            "Created project"
        );

        Ok(ProjectWithWorkflows {
            project: plan.project,
            workflow_instances: plan.workflow_instances,
        })
    }

    async fn persist_projection(
        &self,
        plan: &ProjectionPlan,
        journal: &mut Vec<Inserted>,
    ) -> GovernanceResult<()> {
        self.store.insert_project(plan.project.clone()).await?;
        journal.push(Inserted::Project(plan.project.id));

        for instance in &plan.workflow_instances {
            self.store.insert_workflow_instance(instance.clone()).await?;
            journal.push(Inserted::WorkflowInstance(instance.id));
        }

        for instance in &plan.checklist_instances {
            self.store.insert_checklist_instance(instance.clone()).await?;
            journal.push(Inserted::ChecklistInstance(instance.id));
        }

        for (instance_id, dependencies) in &plan.dependency_edges {
            self.store
                .set_checklist_instance_dependencies(instance_id, dependencies.clone())
                .await?;
        }
        Ok(())
    }

    async fn roll_back(&self, journal: Vec<Inserted>) {
        for entry in journal.into_iter().rev() {
            let outcome = match entry {
                Inserted::Project(id) => self.store.delete_project(&id).await,
                Inserted::WorkflowInstance(id) => self.store.delete_workflow_instance(&id).await,
                Inserted::ChecklistInstance(id) => self.store.delete_checklist_instance(&id).await,
            };
            if let Err(err) = outcome {
                error!(document = ?entry, error = %err, "Failed to roll back project document");
            }
        }
    }

    pub async fn get_project(&self, id: &ProjectId) -> GovernanceResult<Project> {
        self.store
            .get_project(id)
            .await?
            .ok_or_else(|| GovernanceError::not_found("Project", id))
    }

    pub async fn list_projects(&self) -> GovernanceResult<Vec<Project>> {
        Ok(self.store.list_projects().await?)
    }

    pub async fn update_project(&self, id: &ProjectId, patch: ProjectPatch) -> GovernanceResult<Project> {
        patch.validate()?;
        let mut project = self.get_project(id).await?;

        if let Some(name) = patch.name {
            project.name = name;
        }
        if let Some(description) = patch.description {
            project.description = Some(description);
        }
        if let Some(metadata) = patch.metadata {
            project.metadata = metadata;
        }
        project.updated_at = Utc::now();

        self.store.update_project(project.clone()).await?;
        info!(project_id = %id, "Updated project");
        Ok(project)
    }

    /// Delete the project with its workflow and checklist-item instances.
    /// Status history is retained.
    pub async fn delete_project(&self, id: &ProjectId) -> GovernanceResult<()> {
        self.get_project(id).await?;

        let workflows = self.store.list_workflow_instances(id).await?;
        let workflow_ids: Vec<_> = workflows.iter().map(|w| w.id).collect();
        let items = self
            .store
            .list_checklist_instances_for_workflows(&workflow_ids)
            .await?;

        for item in &items {
            self.store.delete_checklist_instance(&item.id).await?;
        }
        for workflow_id in &workflow_ids {
            self.store.delete_workflow_instance(workflow_id).await?;
        }
        self.store.delete_project(id).await?;

        info!(
            project_id = %id,
            workflow_instances = workflow_ids.len(),
            checklist_item_instances = items.len(),
            "Deleted project"
        );
        Ok(())
    }
}
