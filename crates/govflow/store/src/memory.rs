//! In-memory storage implementation

use crate::error::StorageError;
use crate::traits::*;
use async_trait::async_trait;
use govflow_types::{
    ChecklistItemInstance, ChecklistItemInstanceId, ChecklistItemTemplate,
    ChecklistItemTemplateId, ChecklistStatus, GovernanceTemplate, GovernanceTemplateId, Project,
    ProjectId, StatusChangeRecord, WorkflowInstance, WorkflowInstanceId, WorkflowTemplate,
    WorkflowTemplateId,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Bounds applied by [`InMemoryStore`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryLimits {
    /// Maximum documents held per collection; unbounded when absent
    #[serde(default)]
    pub max_documents_per_collection: Option<usize>,
}

/// In-memory storage for development and testing
#[derive(Debug)]
pub struct InMemoryStore {
    limits: MemoryLimits,
    governance_templates: Arc<RwLock<BTreeMap<GovernanceTemplateId, GovernanceTemplate>>>,
    workflow_templates: Arc<RwLock<BTreeMap<WorkflowTemplateId, WorkflowTemplate>>>,
    checklist_templates: Arc<RwLock<BTreeMap<ChecklistItemTemplateId, ChecklistItemTemplate>>>,
    projects: Arc<RwLock<BTreeMap<ProjectId, Project>>>,
    workflow_instances: Arc<RwLock<BTreeMap<WorkflowInstanceId, WorkflowInstance>>>,
    checklist_instances: Arc<RwLock<BTreeMap<ChecklistItemInstanceId, ChecklistItemInstance>>>,
    status_changes: Arc<RwLock<Vec<StatusChangeRecord>>>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// Create a new unbounded in-memory store
    pub fn new() -> Self {
        Self::with_limits(MemoryLimits::default())
    }

    pub fn with_limits(limits: MemoryLimits) -> Self {
        Self {
            limits,
            governance_templates: Arc::new(RwLock::new(BTreeMap::new())),
            workflow_templates: Arc::new(RwLock::new(BTreeMap::new())),
            checklist_templates: Arc::new(RwLock::new(BTreeMap::new())),
            projects: Arc::new(RwLock::new(BTreeMap::new())),
            workflow_instances: Arc::new(RwLock::new(BTreeMap::new())),
            checklist_instances: Arc::new(RwLock::new(BTreeMap::new())),
            status_changes: Arc::new(RwLock::new(Vec::new())),
        }
    }

    fn check_capacity(&self, collection: &str, current: usize) -> StorageResult<()> {
        match self.limits.max_documents_per_collection {
            Some(max) if current >= max => Err(StorageError::Backend(format!(
                "{} collection is full ({} documents)",
                collection, max
            ))),
            _ => Ok(()),
        }
    }
}

fn duplicate_id(collection: &str, id: impl std::fmt::Display) -> StorageError {
    StorageError::Conflict(format!("{} {} already exists", collection, id))
}

impl Store for InMemoryStore {}

#[async_trait]
impl GovernanceTemplateStore for InMemoryStore {
    async fn insert_governance_template(&self, template: GovernanceTemplate) -> StorageResult<()> {
        let mut templates = self.governance_templates.write().await;
        self.check_capacity("governance template", templates.len())?;
        if templates.contains_key(&template.id) {
            return Err(duplicate_id("governance template", template.id));
        }
        if templates
            .values()
            .any(|t| t.has_identity(&template.name, &template.version))
        {
            return Err(StorageError::Conflict(
                "A template with this name and version already exists".to_string(),
            ));
        }
        templates.insert(template.id, template);
        Ok(())
    }

    async fn get_governance_template(
        &self,
        id: &GovernanceTemplateId,
    ) -> StorageResult<Option<GovernanceTemplate>> {
        let templates = self.governance_templates.read().await;
        Ok(templates.get(id).cloned())
    }

    async fn list_governance_templates(&self) -> StorageResult<Vec<GovernanceTemplate>> {
        let templates = self.governance_templates.read().await;
        let mut listed: Vec<_> = templates.values().cloned().collect();
        listed.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(listed)
    }

    async fn update_governance_template(&self, template: GovernanceTemplate) -> StorageResult<()> {
        let mut templates = self.governance_templates.write().await;
        if !templates.contains_key(&template.id) {
            return Err(StorageError::not_found("governance template", template.id));
        }
        if templates.values().any(|t| {
            t.id != template.id && t.has_identity(&template.name, &template.version)
        }) {
            return Err(StorageError::Conflict(
                "A template with this name and version already exists".to_string(),
            ));
        }
        templates.insert(template.id, template);
        Ok(())
    }

    async fn delete_governance_template(&self, id: &GovernanceTemplateId) -> StorageResult<bool> {
        let mut templates = self.governance_templates.write().await;
        Ok(templates.remove(id).is_some())
    }
}

#[async_trait]
impl WorkflowTemplateStore for InMemoryStore {
    async fn insert_workflow_template(&self, template: WorkflowTemplate) -> StorageResult<()> {
        let mut templates = self.workflow_templates.write().await;
        self.check_capacity("workflow template", templates.len())?;
        if templates.contains_key(&template.id) {
            return Err(duplicate_id("workflow template", template.id));
        }
        if templates.values().any(|t| {
            t.governance_template_id == template.governance_template_id && t.name == template.name
        }) {
            return Err(StorageError::Conflict(format!(
                "A workflow template named '{}' already exists in this governance template",
                template.name
            )));
        }
        templates.insert(template.id, template);
        Ok(())
    }

    async fn get_workflow_template(
        &self,
        id: &WorkflowTemplateId,
    ) -> StorageResult<Option<WorkflowTemplate>> {
        let templates = self.workflow_templates.read().await;
        Ok(templates.get(id).cloned())
    }

    async fn get_workflow_templates(
        &self,
        ids: &[WorkflowTemplateId],
    ) -> StorageResult<Vec<WorkflowTemplate>> {
        let wanted: HashSet<_> = ids.iter().collect();
        let templates = self.workflow_templates.read().await;
        Ok(templates
            .values()
            .filter(|t| wanted.contains(&t.id))
            .cloned()
            .collect())
    }

    async fn list_workflow_templates(
        &self,
        governance_template_id: Option<&GovernanceTemplateId>,
    ) -> StorageResult<Vec<WorkflowTemplate>> {
        let templates = self.workflow_templates.read().await;
        let mut listed: Vec<_> = match governance_template_id {
            Some(owner) => templates
                .values()
                .filter(|t| &t.governance_template_id == owner)
                .cloned()
                .collect(),
            None => templates.values().cloned().collect(),
        };
        if governance_template_id.is_some() {
            listed.sort_by_key(|t| (t.order, t.created_at, t.id));
        } else {
            listed.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        }
        Ok(listed)
    }

    async fn update_workflow_template(&self, template: WorkflowTemplate) -> StorageResult<()> {
        let mut templates = self.workflow_templates.write().await;
        if !templates.contains_key(&template.id) {
            return Err(StorageError::not_found("workflow template", template.id));
        }
        if templates.values().any(|t| {
            t.id != template.id
                && t.governance_template_id == template.governance_template_id
                && t.name == template.name
        }) {
            return Err(StorageError::Conflict(format!(
                "A workflow template named '{}' already exists in this governance template",
                template.name
            )));
        }
        templates.insert(template.id, template);
        Ok(())
    }

    async fn delete_workflow_template(&self, id: &WorkflowTemplateId) -> StorageResult<bool> {
        let mut templates = self.workflow_templates.write().await;
        Ok(templates.remove(id).is_some())
    }

    async fn apply_workflow_template_orders(
        &self,
        assignments: &[(WorkflowTemplateId, u32)],
    ) -> StorageResult<()> {
        let mut templates = self.workflow_templates.write().await;
        if let Some((missing, _)) = assignments.iter().find(|(id, _)| !templates.contains_key(id)) {
            return Err(StorageError::not_found("workflow template", missing));
        }
        let now = chrono::Utc::now();
        for (id, order) in assignments {
            if let Some(template) = templates.get_mut(id) {
                template.order = *order;
                template.updated_at = now;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ChecklistTemplateStore for InMemoryStore {
    async fn insert_checklist_template(&self, template: ChecklistItemTemplate) -> StorageResult<()> {
        let mut templates = self.checklist_templates.write().await;
        self.check_capacity("checklist item template", templates.len())?;
        if templates.contains_key(&template.id) {
            return Err(duplicate_id("checklist item template", template.id));
        }
        templates.insert(template.id, template);
        Ok(())
    }

    async fn get_checklist_template(
        &self,
        id: &ChecklistItemTemplateId,
    ) -> StorageResult<Option<ChecklistItemTemplate>> {
        let templates = self.checklist_templates.read().await;
        Ok(templates.get(id).cloned())
    }

    async fn get_checklist_templates(
        &self,
        ids: &[ChecklistItemTemplateId],
    ) -> StorageResult<Vec<ChecklistItemTemplate>> {
        let wanted: HashSet<_> = ids.iter().collect();
        let templates = self.checklist_templates.read().await;
        Ok(templates
            .values()
            .filter(|t| wanted.contains(&t.id))
            .cloned()
            .collect())
    }

    async fn list_checklist_templates(
        &self,
        workflow_template_id: Option<&WorkflowTemplateId>,
    ) -> StorageResult<Vec<ChecklistItemTemplate>> {
        let templates = self.checklist_templates.read().await;
        let mut listed: Vec<_> = match workflow_template_id {
            Some(owner) => templates
                .values()
                .filter(|t| &t.workflow_template_id == owner)
                .cloned()
                .collect(),
            None => templates.values().cloned().collect(),
        };
        if workflow_template_id.is_some() {
            listed.sort_by_key(|t| (t.order, t.created_at, t.id));
        } else {
            listed.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        }
        Ok(listed)
    }

    async fn list_checklist_templates_for_workflows(
        &self,
        workflow_template_ids: &[WorkflowTemplateId],
    ) -> StorageResult<Vec<ChecklistItemTemplate>> {
        let templates = self.checklist_templates.read().await;
        let mut listed = Vec::new();
        for workflow_id in workflow_template_ids {
            let mut owned: Vec<_> = templates
                .values()
                .filter(|t| &t.workflow_template_id == workflow_id)
                .cloned()
                .collect();
            owned.sort_by_key(|t| (t.order, t.created_at, t.id));
            listed.extend(owned);
        }
        Ok(listed)
    }

    async fn update_checklist_template(&self, template: ChecklistItemTemplate) -> StorageResult<()> {
        let mut templates = self.checklist_templates.write().await;
        match templates.get_mut(&template.id) {
            Some(stored) => {
                *stored = template;
                Ok(())
            }
            None => Err(StorageError::not_found("checklist item template", template.id)),
        }
    }

    async fn delete_checklist_template(&self, id: &ChecklistItemTemplateId) -> StorageResult<bool> {
        let mut templates = self.checklist_templates.write().await;
        Ok(templates.remove(id).is_some())
    }

    async fn pull_checklist_dependencies(
        &self,
        ids: &[ChecklistItemTemplateId],
    ) -> StorageResult<usize> {
        let pulled: HashSet<_> = ids.iter().collect();
        let mut templates = self.checklist_templates.write().await;
        let now = chrono::Utc::now();
        let mut modified = 0;
        for template in templates.values_mut() {
            let before = template.dependencies_requires.len();
            template
                .dependencies_requires
                .retain(|dep| !pulled.contains(dep));
            if template.dependencies_requires.len() != before {
                template.updated_at = now;
                modified += 1;
            }
        }
        tracing::debug!(pulled = ids.len(), modified, "Pulled checklist template dependencies");
        Ok(modified)
    }

    async fn apply_checklist_template_orders(
        &self,
        assignments: &[(ChecklistItemTemplateId, u32)],
    ) -> StorageResult<()> {
        let mut templates = self.checklist_templates.write().await;
        if let Some((missing, _)) = assignments.iter().find(|(id, _)| !templates.contains_key(id)) {
            return Err(StorageError::not_found("checklist item template", missing));
        }
        let now = chrono::Utc::now();
        for (id, order) in assignments {
            if let Some(template) = templates.get_mut(id) {
                template.order = *order;
                template.updated_at = now;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ProjectStore for InMemoryStore {
    async fn insert_project(&self, project: Project) -> StorageResult<()> {
        let mut projects = self.projects.write().await;
        self.check_capacity("project", projects.len())?;
        if projects.contains_key(&project.id) {
            return Err(duplicate_id("project", project.id));
        }
        projects.insert(project.id, project);
        Ok(())
    }

    async fn get_project(&self, id: &ProjectId) -> StorageResult<Option<Project>> {
        let projects = self.projects.read().await;
        Ok(projects.get(id).cloned())
    }

    async fn list_projects(&self) -> StorageResult<Vec<Project>> {
        let projects = self.projects.read().await;
        let mut listed: Vec<_> = projects.values().cloned().collect();
        listed.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(listed)
    }

    async fn update_project(&self, project: Project) -> StorageResult<()> {
        let mut projects = self.projects.write().await;
        match projects.get_mut(&project.id) {
            Some(stored) => {
                *stored = project;
                Ok(())
            }
            None => Err(StorageError::not_found("project", project.id)),
        }
    }

    async fn delete_project(&self, id: &ProjectId) -> StorageResult<bool> {
        let mut projects = self.projects.write().await;
        Ok(projects.remove(id).is_some())
    }
}

#[async_trait]
impl WorkflowInstanceStore for InMemoryStore {
    async fn insert_workflow_instance(&self, instance: WorkflowInstance) -> StorageResult<()> {
        let mut instances = self.workflow_instances.write().await;
        self.check_capacity("workflow instance", instances.len())?;
        if instances.contains_key(&instance.id) {
            return Err(duplicate_id("workflow instance", instance.id));
        }
        instances.insert(instance.id, instance);
        Ok(())
    }

    async fn get_workflow_instance(
        &self,
        id: &WorkflowInstanceId,
    ) -> StorageResult<Option<WorkflowInstance>> {
        let instances = self.workflow_instances.read().await;
        Ok(instances.get(id).cloned())
    }

    async fn list_workflow_instances(
        &self,
        project_id: &ProjectId,
    ) -> StorageResult<Vec<WorkflowInstance>> {
        let instances = self.workflow_instances.read().await;
        let mut listed: Vec<_> = instances
            .values()
            .filter(|i| &i.project_id == project_id)
            .cloned()
            .collect();
        listed.sort_by_key(|i| (i.order, i.created_at, i.id));
        Ok(listed)
    }

    async fn update_workflow_instance(&self, instance: WorkflowInstance) -> StorageResult<()> {
        let mut instances = self.workflow_instances.write().await;
        match instances.get_mut(&instance.id) {
            Some(stored) => {
                *stored = instance;
                Ok(())
            }
            None => Err(StorageError::not_found("workflow instance", instance.id)),
        }
    }

    async fn delete_workflow_instance(&self, id: &WorkflowInstanceId) -> StorageResult<bool> {
        let mut instances = self.workflow_instances.write().await;
        Ok(instances.remove(id).is_some())
    }
}

#[async_trait]
impl ChecklistInstanceStore for InMemoryStore {
    async fn insert_checklist_instance(
        &self,
        instance: ChecklistItemInstance,
    ) -> StorageResult<()> {
        let mut instances = self.checklist_instances.write().await;
        self.check_capacity("checklist item instance", instances.len())?;
        if instances.contains_key(&instance.id) {
            return Err(duplicate_id("checklist item instance", instance.id));
        }
        instances.insert(instance.id, instance);
        Ok(())
    }

    async fn get_checklist_instance(
        &self,
        id: &ChecklistItemInstanceId,
    ) -> StorageResult<Option<ChecklistItemInstance>> {
        let instances = self.checklist_instances.read().await;
        Ok(instances.get(id).cloned())
    }

    async fn get_checklist_instances(
        &self,
        ids: &[ChecklistItemInstanceId],
    ) -> StorageResult<Vec<ChecklistItemInstance>> {
        let wanted: HashSet<_> = ids.iter().collect();
        let instances = self.checklist_instances.read().await;
        Ok(instances
            .values()
            .filter(|i| wanted.contains(&i.id))
            .cloned()
            .collect())
    }

    async fn list_checklist_instances(
        &self,
        workflow_instance_id: &WorkflowInstanceId,
    ) -> StorageResult<Vec<ChecklistItemInstance>> {
        let instances = self.checklist_instances.read().await;
        let mut listed: Vec<_> = instances
            .values()
            .filter(|i| &i.workflow_instance_id == workflow_instance_id)
            .cloned()
            .collect();
        listed.sort_by_key(|i| (i.order, i.created_at, i.id));
        Ok(listed)
    }

    async fn list_checklist_instances_for_workflows(
        &self,
        workflow_instance_ids: &[WorkflowInstanceId],
    ) -> StorageResult<Vec<ChecklistItemInstance>> {
        let instances = self.checklist_instances.read().await;
        let mut listed = Vec::new();
        for workflow_id in workflow_instance_ids {
            let mut owned: Vec<_> = instances
                .values()
                .filter(|i| &i.workflow_instance_id == workflow_id)
                .cloned()
                .collect();
            owned.sort_by_key(|i| (i.order, i.created_at, i.id));
            listed.extend(owned);
        }
        Ok(listed)
    }

    async fn set_checklist_instance_dependencies(
        &self,
        id: &ChecklistItemInstanceId,
        dependencies: Vec<ChecklistItemInstanceId>,
    ) -> StorageResult<ChecklistItemInstance> {
        let mut instances = self.checklist_instances.write().await;
        let instance = instances
            .get_mut(id)
            .ok_or_else(|| StorageError::not_found("checklist item instance", id))?;
        instance.dependencies_requires = dependencies;
        instance.version += 1;
        instance.updated_at = chrono::Utc::now();
        Ok(instance.clone())
    }

    async fn write_checklist_instance(
        &self,
        write: ConditionalWrite,
    ) -> StorageResult<ChecklistItemInstance> {
        let mut instances = self.checklist_instances.write().await;
        let id = write.instance.id;
        let stored = instances
            .get(&id)
            .ok_or_else(|| StorageError::not_found("checklist item instance", id))?;

        if stored.version != write.expected_version {
            tracing::debug!(
                instance_id = %id,
                expected = write.expected_version,
                actual = stored.version,
                "Rejected stale checklist item write"
            );
            return Err(StorageError::StaleVersion {
                id,
                expected: write.expected_version,
                actual: stored.version,
            });
        }

        if write.require_prerequisites {
            let unmet: Vec<_> = stored
                .dependencies_requires
                .iter()
                .filter(|dep| {
                    instances
                        .get(*dep)
                        .map_or(true, |d| d.status != ChecklistStatus::Complete)
                })
                .copied()
                .collect();
            if !unmet.is_empty() {
                return Err(StorageError::PreconditionFailed { unmet });
            }
        }

        let mut next = write.instance;
        next.dependencies_requires = stored.dependencies_requires.clone();
        next.version = stored.version + 1;
        instances.insert(id, next.clone());
        Ok(next)
    }

    async fn delete_checklist_instance(
        &self,
        id: &ChecklistItemInstanceId,
    ) -> StorageResult<bool> {
        let mut instances = self.checklist_instances.write().await;
        Ok(instances.remove(id).is_some())
    }
}

#[async_trait]
impl AuditStore for InMemoryStore {
    async fn append_status_change(&self, record: StatusChangeRecord) -> StorageResult<()> {
        let mut records = self.status_changes.write().await;
        self.check_capacity("status change", records.len())?;
        records.push(record);
        Ok(())
    }

    async fn list_status_changes(
        &self,
        object_id: &ChecklistItemInstanceId,
    ) -> StorageResult<Vec<StatusChangeRecord>> {
        let records = self.status_changes.read().await;
        Ok(records
            .iter()
            .filter(|r| &r.object_id == object_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use govflow_types::{Actor, ChecklistItemType};

    fn instance_in(workflow: WorkflowInstanceId, order: u32) -> ChecklistItemInstance {
        let template = ChecklistItemTemplate::new(
            WorkflowTemplateId::generate(),
            format!("item {}", order),
            ChecklistItemType::Task,
        )
        .with_order(order);
        ChecklistItemInstance::from_template(&template, workflow)
    }

    #[tokio::test]
    async fn test_governance_name_version_unique() {
        let store = InMemoryStore::new();
        store
            .insert_governance_template(GovernanceTemplate::new("ISO 42001", "1.0"))
            .await
            .unwrap();

        let err = store
            .insert_governance_template(GovernanceTemplate::new("ISO 42001", "1.0"))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Conflict(_)));

        let other = GovernanceTemplate::new("ISO 42001", "2.0");
        store.insert_governance_template(other.clone()).await.unwrap();

        let mut renamed = other;
        renamed.version = "1.0".into();
        assert!(store.update_governance_template(renamed).await.is_err());
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let store = InMemoryStore::new();
        let mut older = GovernanceTemplate::new("A", "1");
        older.created_at = older.created_at - chrono::Duration::minutes(5);
        let newer = GovernanceTemplate::new("B", "1");
        store.insert_governance_template(older.clone()).await.unwrap();
        store.insert_governance_template(newer.clone()).await.unwrap();

        let listed = store.list_governance_templates().await.unwrap();
        assert_eq!(listed[0].id, newer.id);
        assert_eq!(listed[1].id, older.id);
    }

    #[tokio::test]
    async fn test_workflow_name_unique_per_governance_template() {
        let store = InMemoryStore::new();
        let governance = GovernanceTemplateId::generate();
        store
            .insert_workflow_template(WorkflowTemplate::new(governance, "Design"))
            .await
            .unwrap();

        assert!(store
            .insert_workflow_template(WorkflowTemplate::new(governance, "Design"))
            .await
            .is_err());
        assert!(store
            .insert_workflow_template(WorkflowTemplate::new(GovernanceTemplateId::generate(), "Design"))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_apply_orders_is_all_or_nothing() {
        let store = InMemoryStore::new();
        let workflow = WorkflowTemplateId::generate();
        let a = ChecklistItemTemplate::new(workflow, "a", ChecklistItemType::Task).with_order(0);
        store.insert_checklist_template(a.clone()).await.unwrap();

        let err = store
            .apply_checklist_template_orders(&[(a.id, 5), (ChecklistItemTemplateId::generate(), 1)])
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound { .. }));
        assert_eq!(store.get_checklist_template(&a.id).await.unwrap().unwrap().order, 0);

        store.apply_checklist_template_orders(&[(a.id, 3)]).await.unwrap();
        assert_eq!(store.get_checklist_template(&a.id).await.unwrap().unwrap().order, 3);
    }

    #[tokio::test]
    async fn test_pull_dependencies() {
        let store = InMemoryStore::new();
        let workflow = WorkflowTemplateId::generate();
        let c = ChecklistItemTemplate::new(workflow, "c", ChecklistItemType::Task);
        let a = ChecklistItemTemplate::new(workflow, "a", ChecklistItemType::Task).with_dependency(c.id);
        let b = ChecklistItemTemplate::new(workflow, "b", ChecklistItemType::Task).with_dependency(c.id);
        for t in [&a, &b, &c] {
            store.insert_checklist_template(t.clone()).await.unwrap();
        }

        assert_eq!(store.pull_checklist_dependencies(&[c.id]).await.unwrap(), 2);
        for id in [a.id, b.id] {
            let t = store.get_checklist_template(&id).await.unwrap().unwrap();
            assert!(t.dependencies_requires.is_empty());
        }
    }

    #[tokio::test]
    async fn test_conditional_write_checks_prerequisites() {
        let store = InMemoryStore::new();
        let workflow = WorkflowInstanceId::generate();
        let dep = instance_in(workflow, 0);
        let item = instance_in(workflow, 1);
        store.insert_checklist_instance(dep.clone()).await.unwrap();
        store.insert_checklist_instance(item.clone()).await.unwrap();
        let item = store
            .set_checklist_instance_dependencies(&item.id, vec![dep.id])
            .await
            .unwrap();
        assert_eq!(item.version, 1);

        let mut complete = item.clone();
        complete.status = ChecklistStatus::Complete;
        let err = store
            .write_checklist_instance(ConditionalWrite {
                instance: complete.clone(),
                expected_version: 1,
                require_prerequisites: true,
            })
            .await
            .unwrap_err();
        assert_eq!(err, StorageError::PreconditionFailed { unmet: vec![dep.id] });
        assert_eq!(
            store.get_checklist_instance(&item.id).await.unwrap().unwrap().status,
            ChecklistStatus::Incomplete
        );

        let mut dep_done = dep.clone();
        dep_done.status = ChecklistStatus::Complete;
        store
            .write_checklist_instance(ConditionalWrite {
                instance: dep_done,
                expected_version: 0,
                require_prerequisites: true,
            })
            .await
            .unwrap();

        let written = store
            .write_checklist_instance(ConditionalWrite {
                instance: complete,
                expected_version: 1,
                require_prerequisites: true,
            })
            .await
            .unwrap();
        assert_eq!(written.status, ChecklistStatus::Complete);
        assert_eq!(written.version, 2);
        assert_eq!(written.dependencies_requires, vec![dep.id]);
    }

    #[tokio::test]
    async fn test_conditional_write_rejects_stale_version() {
        let store = InMemoryStore::new();
        let item = instance_in(WorkflowInstanceId::generate(), 0);
        store.insert_checklist_instance(item.clone()).await.unwrap();

        let err = store
            .write_checklist_instance(ConditionalWrite {
                instance: item.clone(),
                expected_version: 7,
                require_prerequisites: false,
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StorageError::StaleVersion { expected: 7, actual: 0, .. }
        ));
    }

    #[tokio::test]
    async fn test_write_keeps_stored_dependencies() {
        let store = InMemoryStore::new();
        let item = instance_in(WorkflowInstanceId::generate(), 0);
        store.insert_checklist_instance(item.clone()).await.unwrap();

        let mut tampered = item.clone();
        tampered.dependencies_requires = vec![ChecklistItemInstanceId::generate()];
        let written = store
            .write_checklist_instance(ConditionalWrite {
                instance: tampered,
                expected_version: 0,
                require_prerequisites: false,
            })
            .await
            .unwrap();
        assert!(written.dependencies_requires.is_empty());
    }

    #[tokio::test]
    async fn test_capacity_limit() {
        let store = InMemoryStore::with_limits(MemoryLimits {
            max_documents_per_collection: Some(1),
        });
        let workflow = WorkflowInstanceId::generate();
        store.insert_checklist_instance(instance_in(workflow, 0)).await.unwrap();
        let err = store
            .insert_checklist_instance(instance_in(workflow, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Backend(_)));
    }

    #[tokio::test]
    async fn test_status_changes_per_object() {
        let store = InMemoryStore::new();
        let a = ChecklistItemInstanceId::generate();
        let b = ChecklistItemInstanceId::generate();
        for (id, to) in [
            (a, ChecklistStatus::Complete),
            (b, ChecklistStatus::NotRequired),
            (a, ChecklistStatus::Incomplete),
        ] {
            store
                .append_status_change(StatusChangeRecord::new(
                    format!("{}-{}", id, to),
                    id,
                    ChecklistStatus::Incomplete,
                    to,
                    Actor::system(),
                ))
                .await
                .unwrap();
        }

        let history = store.list_status_changes(&a).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].to, ChecklistStatus::Complete);
        assert_eq!(history[1].to, ChecklistStatus::Incomplete);
    }
}
