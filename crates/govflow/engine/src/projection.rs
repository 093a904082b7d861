//! Template-to-instance projection at project creation
//!
//! Planning is pure: given the selected workflow templates and their
//! checklist-item templates it produces every document to insert and the
//! remapped dependency edges to write afterwards. Ids are generated here,
//! so the plan is complete before anything touches storage.

use govflow_types::{
    ChecklistItemInstance, ChecklistItemInstanceId, ChecklistItemTemplate,
    ChecklistItemTemplateId, Project, WorkflowInstance, WorkflowTemplate, WorkflowTemplateId,
};
use std::collections::{HashMap, HashSet};

/// Everything project creation will write
#[derive(Debug, Clone)]
pub struct ProjectionPlan {
    pub project: Project,
    /// One per selected workflow template, by template order
    pub workflow_instances: Vec<WorkflowInstance>,
    /// One per checklist-item template, all with empty dependency sets
    pub checklist_instances: Vec<ChecklistItemInstance>,
    /// Second-pass writes: instance id and its remapped prerequisites
    pub dependency_edges: Vec<(ChecklistItemInstanceId, Vec<ChecklistItemInstanceId>)>,
}

/// Build the projection for `project`.
///
/// `workflows` are the selected workflow templates and `templates` the
/// checklist-item templates they own. `owner_of` resolves any template id
/// referenced by a dependency to its owning workflow template; edges whose
/// target belongs to an unselected (or unknown) workflow are dropped.
pub fn plan_projection<F>(
    project: Project,
    workflows: &[WorkflowTemplate],
    templates: &[ChecklistItemTemplate],
    owner_of: F,
) -> ProjectionPlan
where
    F: Fn(&ChecklistItemTemplateId) -> Option<WorkflowTemplateId>,
{
    let mut ordered_workflows: Vec<&WorkflowTemplate> = workflows.iter().collect();
    ordered_workflows.sort_by_key(|w| (w.order, w.created_at, w.id));

    let selected: HashSet<WorkflowTemplateId> = ordered_workflows.iter().map(|w| w.id).collect();

    let mut workflow_map = HashMap::with_capacity(ordered_workflows.len());
    let workflow_instances: Vec<WorkflowInstance> = ordered_workflows
        .iter()
        .map(|template| {
            let instance = WorkflowInstance::from_template(template, project.id);
            workflow_map.insert(template.id, instance.id);
            instance
        })
        .collect();

    let mut instance_map: HashMap<ChecklistItemTemplateId, ChecklistItemInstanceId> =
        HashMap::with_capacity(templates.len());
    let mut checklist_instances = Vec::with_capacity(templates.len());
    for workflow in &ordered_workflows {
        let Some(&workflow_instance_id) = workflow_map.get(&workflow.id) else {
            continue;
        };
        let mut owned: Vec<&ChecklistItemTemplate> = templates
            .iter()
            .filter(|t| t.workflow_template_id == workflow.id)
            .collect();
        owned.sort_by_key(|t| (t.order, t.created_at, t.id));
        for template in owned {
            let instance = ChecklistItemInstance::from_template(template, workflow_instance_id);
            instance_map.insert(template.id, instance.id);
            checklist_instances.push(instance);
        }
    }

    let mut dependency_edges = Vec::new();
    for template in templates {
        if template.dependencies_requires.is_empty() {
            continue;
        }
        let Some(&instance_id) = instance_map.get(&template.id) else {
            continue;
        };
        let remapped: Vec<ChecklistItemInstanceId> = template
            .dependencies_requires
            .iter()
            .filter(|dep| owner_of(dep).is_some_and(|owner| selected.contains(&owner)))
            .filter_map(|dep| instance_map.get(dep).copied())
            .collect();
        dependency_edges.push((instance_id, remapped));
    }

    ProjectionPlan {
        project,
        workflow_instances,
        checklist_instances,
        dependency_edges,
    }
}
