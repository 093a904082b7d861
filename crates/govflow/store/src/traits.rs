//! Storage trait definitions

use crate::error::StorageError;
use async_trait::async_trait;
use govflow_types::{
    ChecklistItemInstance, ChecklistItemInstanceId, ChecklistItemTemplate,
    ChecklistItemTemplateId, GovernanceTemplate, GovernanceTemplateId, Project, ProjectId,
    StatusChangeRecord, WorkflowInstance, WorkflowInstanceId, WorkflowTemplate,
    WorkflowTemplateId,
};

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Combined storage trait
#[async_trait]
pub trait Store:
    GovernanceTemplateStore
    + WorkflowTemplateStore
    + ChecklistTemplateStore
    + ProjectStore
    + WorkflowInstanceStore
    + ChecklistInstanceStore
    + AuditStore
    + Send
    + Sync
{
}

/// Storage for governance templates
#[async_trait]
pub trait GovernanceTemplateStore: Send + Sync {
    /// Insert a template; `(name, version)` must be unused
    async fn insert_governance_template(&self, template: GovernanceTemplate) -> StorageResult<()>;

    async fn get_governance_template(
        &self,
        id: &GovernanceTemplateId,
    ) -> StorageResult<Option<GovernanceTemplate>>;

    /// List all templates, newest first
    async fn list_governance_templates(&self) -> StorageResult<Vec<GovernanceTemplate>>;

    /// Replace an existing template, re-checking `(name, version)` uniqueness
    async fn update_governance_template(&self, template: GovernanceTemplate) -> StorageResult<()>;

    async fn delete_governance_template(&self, id: &GovernanceTemplateId) -> StorageResult<bool>;
}

/// Storage for workflow templates
#[async_trait]
pub trait WorkflowTemplateStore: Send + Sync {
    /// Insert a template; the name must be unused within its governance template
    async fn insert_workflow_template(&self, template: WorkflowTemplate) -> StorageResult<()>;

    async fn get_workflow_template(
        &self,
        id: &WorkflowTemplateId,
    ) -> StorageResult<Option<WorkflowTemplate>>;

    /// Fetch the templates that exist among `ids`, in storage order
    async fn get_workflow_templates(
        &self,
        ids: &[WorkflowTemplateId],
    ) -> StorageResult<Vec<WorkflowTemplate>>;

    /// By `order` when scoped to a governance template, newest first otherwise
    async fn list_workflow_templates(
        &self,
        governance_template_id: Option<&GovernanceTemplateId>,
    ) -> StorageResult<Vec<WorkflowTemplate>>;

    async fn update_workflow_template(&self, template: WorkflowTemplate) -> StorageResult<()>;

    async fn delete_workflow_template(&self, id: &WorkflowTemplateId) -> StorageResult<bool>;

    /// Apply a batch of `(id, order)` assignments atomically
    async fn apply_workflow_template_orders(
        &self,
        assignments: &[(WorkflowTemplateId, u32)],
    ) -> StorageResult<()>;
}

/// Storage for checklist-item templates
#[async_trait]
pub trait ChecklistTemplateStore: Send + Sync {
    async fn insert_checklist_template(&self, template: ChecklistItemTemplate) -> StorageResult<()>;

    async fn get_checklist_template(
        &self,
        id: &ChecklistItemTemplateId,
    ) -> StorageResult<Option<ChecklistItemTemplate>>;

    /// Fetch the templates that exist among `ids`
    async fn get_checklist_templates(
        &self,
        ids: &[ChecklistItemTemplateId],
    ) -> StorageResult<Vec<ChecklistItemTemplate>>;

    /// By `order` when scoped to a workflow template, newest first otherwise
    async fn list_checklist_templates(
        &self,
        workflow_template_id: Option<&WorkflowTemplateId>,
    ) -> StorageResult<Vec<ChecklistItemTemplate>>;

    /// Every template owned by one of `workflow_template_ids`, grouped by
    /// workflow in the given order and by `order` within a workflow
    async fn list_checklist_templates_for_workflows(
        &self,
        workflow_template_ids: &[WorkflowTemplateId],
    ) -> StorageResult<Vec<ChecklistItemTemplate>>;

    async fn update_checklist_template(&self, template: ChecklistItemTemplate) -> StorageResult<()>;

    async fn delete_checklist_template(&self, id: &ChecklistItemTemplateId) -> StorageResult<bool>;

    /// Remove every id in `ids` from every template's dependency set.
    /// Returns the number of templates modified.
    async fn pull_checklist_dependencies(
        &self,
        ids: &[ChecklistItemTemplateId],
    ) -> StorageResult<usize>;

    /// Apply a batch of `(id, order)` assignments atomically
    async fn apply_checklist_template_orders(
        &self,
        assignments: &[(ChecklistItemTemplateId, u32)],
    ) -> StorageResult<()>;
}

/// Storage for projects
#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn insert_project(&self, project: Project) -> StorageResult<()>;

    async fn get_project(&self, id: &ProjectId) -> StorageResult<Option<Project>>;

    /// List all projects, newest first
    async fn list_projects(&self) -> StorageResult<Vec<Project>>;

    async fn update_project(&self, project: Project) -> StorageResult<()>;

    async fn delete_project(&self, id: &ProjectId) -> StorageResult<bool>;
}

/// Storage for workflow instances
#[async_trait]
pub trait WorkflowInstanceStore: Send + Sync {
    async fn insert_workflow_instance(&self, instance: WorkflowInstance) -> StorageResult<()>;

    async fn get_workflow_instance(
        &self,
        id: &WorkflowInstanceId,
    ) -> StorageResult<Option<WorkflowInstance>>;

    /// Instances of one project, by `order`
    async fn list_workflow_instances(
        &self,
        project_id: &ProjectId,
    ) -> StorageResult<Vec<WorkflowInstance>>;

    async fn update_workflow_instance(&self, instance: WorkflowInstance) -> StorageResult<()>;

    async fn delete_workflow_instance(&self, id: &WorkflowInstanceId) -> StorageResult<bool>;
}

/// A version-guarded replacement of a checklist-item instance.
///
/// The write applies only if the stored version equals `expected_version`.
/// With `require_prerequisites` set, every id in the *stored* document's
/// `dependencies_requires` must also resolve to a `complete` instance. Both
/// checks and the write happen as one atomic step.
#[derive(Debug, Clone)]
pub struct ConditionalWrite {
    pub instance: ChecklistItemInstance,
    pub expected_version: u64,
    pub require_prerequisites: bool,
}

/// Storage for checklist-item instances
#[async_trait]
pub trait ChecklistInstanceStore: Send + Sync {
    async fn insert_checklist_instance(&self, instance: ChecklistItemInstance)
        -> StorageResult<()>;

    async fn get_checklist_instance(
        &self,
        id: &ChecklistItemInstanceId,
    ) -> StorageResult<Option<ChecklistItemInstance>>;

    /// Fetch the instances that exist among `ids`
    async fn get_checklist_instances(
        &self,
        ids: &[ChecklistItemInstanceId],
    ) -> StorageResult<Vec<ChecklistItemInstance>>;

    /// Instances of one workflow instance, by `order`
    async fn list_checklist_instances(
        &self,
        workflow_instance_id: &WorkflowInstanceId,
    ) -> StorageResult<Vec<ChecklistItemInstance>>;

    /// Instances of several workflow instances, by workflow then `order`
    async fn list_checklist_instances_for_workflows(
        &self,
        workflow_instance_ids: &[WorkflowInstanceId],
    ) -> StorageResult<Vec<ChecklistItemInstance>>;

    /// Overwrite the dependency set, bumping the version
    async fn set_checklist_instance_dependencies(
        &self,
        id: &ChecklistItemInstanceId,
        dependencies: Vec<ChecklistItemInstanceId>,
    ) -> StorageResult<ChecklistItemInstance>;

    /// Apply a [`ConditionalWrite`] and return the stored document.
    ///
    /// The stored dependency set is kept; the one on `write.instance` is ignored.
    async fn write_checklist_instance(
        &self,
        write: ConditionalWrite,
    ) -> StorageResult<ChecklistItemInstance>;

    async fn delete_checklist_instance(&self, id: &ChecklistItemInstanceId)
        -> StorageResult<bool>;
}

/// Append-only storage for status-change records
#[async_trait]
pub trait AuditStore: Send + Sync {
    async fn append_status_change(&self, record: StatusChangeRecord) -> StorageResult<()>;

    /// Records for one instance, oldest first
    async fn list_status_changes(
        &self,
        object_id: &ChecklistItemInstanceId,
    ) -> StorageResult<Vec<StatusChangeRecord>>;
}
