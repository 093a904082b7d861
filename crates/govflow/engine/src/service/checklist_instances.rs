//! Checklist-item instance operations: ordered listings and gated writes

use super::GovernanceService;
use crate::gate::{apply_type_rules, display_bucket};
use crate::graph::{partitioned_order, topological_order};
use crate::views::{ChecklistListing, ChecklistSection, ProjectChecklist};
use chrono::Utc;
use govflow_store::{
    AuditStore, ChecklistInstanceStore, ConditionalWrite, StorageError, WorkflowInstanceStore,
};
use govflow_types::{
    Actor, ChecklistItemInstance, ChecklistItemInstanceId, ChecklistItemInstancePatch,
    ChecklistStatus, GovernanceError, GovernanceResult, ProjectId, StatusChangeRecord,
    WorkflowInstanceId,
};
use std::collections::HashMap;
use tracing::{debug, error, info, warn};

impl GovernanceService {
    pub async fn get_checklist_item_instance(
        &self,
        id: &ChecklistItemInstanceId,
    ) -> GovernanceResult<ChecklistItemInstance> {
        self.store
            .get_checklist_instance(id)
            .await?
            .ok_or_else(|| GovernanceError::not_found("Checklist item instance", id))
    }

    /// Items of one workflow instance in dependency order, ties broken by
    /// template order
    pub async fn list_checklist_item_instances(
        &self,
        workflow_instance_id: &WorkflowInstanceId,
    ) -> GovernanceResult<ChecklistListing> {
        self.get_workflow_instance(workflow_instance_id).await?;

        let items = self.store.list_checklist_instances(workflow_instance_id).await?;
        let order = topological_order(items);
        if !order.is_complete() {
            warn!(
                workflow_instance_id = %workflow_instance_id,
                excluded = order.excluded.len(),
                "Checklist items on a dependency cycle were left out"
            );
        }
        Ok(order.into())
    }

    /// Every item of a project, grouped by workflow instance and display bucket
    pub async fn project_checklist(&self, project_id: &ProjectId) -> GovernanceResult<ProjectChecklist> {
        self.get_project(project_id).await?;

        let workflows = self.store.list_workflow_instances(project_id).await?;
        let names: HashMap<_, _> = workflows.iter().map(|w| (w.id, w.name.clone())).collect();
        let workflow_ids: Vec<_> = workflows.iter().map(|w| w.id).collect();
        let items = self
            .store
            .list_checklist_instances_for_workflows(&workflow_ids)
            .await?;
        let statuses: HashMap<_, _> = items.iter().map(|i| (i.id, i.status)).collect();

        let partitions = partitioned_order(
            items,
            |item| {
                let name = names.get(&item.workflow_instance_id).cloned().unwrap_or_default();
                (name, item.workflow_instance_id)
            },
            |item| display_bucket(item, &statuses),
        );
        let sections: Vec<ChecklistSection> = partitions.into_iter().map(Into::into).collect();
        let excluded: usize = sections.iter().map(|s| s.excluded.len()).sum();
        if excluded > 0 {
            warn!(project_id = %project_id, excluded, "Checklist items on a dependency cycle were left out");
        }
        Ok(ProjectChecklist { sections })
    }

    /// Move an item to `status`. Completion is gated on its prerequisites.
    pub async fn update_checklist_item_status(
        &self,
        id: &ChecklistItemInstanceId,
        status: ChecklistStatus,
        actor: &Actor,
    ) -> GovernanceResult<ChecklistItemInstance> {
        let patch = ChecklistItemInstancePatch {
            status: Some(status),
            ..Default::default()
        };
        self.update_checklist_item_instance(id, patch, actor).await
    }

    /// Apply a patch to an instance.
    ///
    /// Dependency sets are system-managed and rejected outright. A status
    /// change goes through the completion gate; every write is guarded by
    /// the instance version and retried on a lost race.
    pub async fn update_checklist_item_instance(
        &self,
        id: &ChecklistItemInstanceId,
        patch: ChecklistItemInstancePatch,
        actor: &Actor,
    ) -> GovernanceResult<ChecklistItemInstance> {
        patch.validate()?;

        let attempts = self.config.max_transition_retries + 1;
        for attempt in 1..=attempts {
            let current = self.get_checklist_item_instance(id).await?;
            let target = patch.status.unwrap_or(current.status);
            let status_changed = target != current.status;

            let mut next = current.clone();
            if let Some(name) = &patch.name {
                next.name = name.clone();
            }
            if let Some(description) = &patch.description {
                next.description = Some(description.clone());
            }
            if let Some(order) = patch.order {
                next.order = order;
            }
            if let Some(metadata) = &patch.metadata {
                let mut metadata = metadata.clone();
                let completing = patch.status == Some(ChecklistStatus::Complete);
                apply_type_rules(current.item_type, &mut metadata, completing, actor, Utc::now())?;
                next.metadata = metadata;
            }

            if !status_changed && next == current {
                return Ok(current);
            }

            let completing = status_changed && target == ChecklistStatus::Complete;
            if completing {
                self.check_prerequisites(&current).await?;
            }
            next.status = target;
            next.updated_at = Utc::now();

            let write = ConditionalWrite {
                instance: next,
                expected_version: current.version,
                require_prerequisites: completing,
            };
            match self.store.write_checklist_instance(write).await {
                Ok(updated) => {
                    if status_changed {
                        info!(
                            checklist_item_instance_id = %id,
                            from = %current.status,
                            to = %target,
                            actor = %actor,
                            "Checklist item status changed"
                        );
                        self.record_status_change(&updated, current.status, actor).await;
                    } else {
                        debug!(checklist_item_instance_id = %id, "Updated checklist item");
                    }
                    return Ok(updated);
                }
                Err(StorageError::StaleVersion { actual, .. }) => {
                    debug!(
                        checklist_item_instance_id = %id,
                        attempt,
                        expected = current.version,
                        actual,
                        "Lost checklist item write race, retrying"
                    );
                }
                Err(err) => return Err(err.into()),
            }
        }

        warn!(checklist_item_instance_id = %id, attempts, "Giving up on contended checklist item");
        Err(GovernanceError::Conflict(format!(
            "Checklist item instance {} was modified concurrently, retry the request",
            id
        )))
    }

    /// Status history of one instance, oldest first
    pub async fn list_status_history(
        &self,
        id: &ChecklistItemInstanceId,
    ) -> GovernanceResult<Vec<StatusChangeRecord>> {
        self.get_checklist_item_instance(id).await?;
        Ok(self.store.list_status_changes(id).await?)
    }

    async fn check_prerequisites(&self, item: &ChecklistItemInstance) -> GovernanceResult<()> {
        if !item.has_dependencies() {
            return Ok(());
        }
        let prerequisites = self
            .store
            .get_checklist_instances(&item.dependencies_requires)
            .await?;
        let statuses: HashMap<_, _> = prerequisites.iter().map(|p| (p.id, p.status)).collect();
        self.gate
            .evaluate(item, ChecklistStatus::Complete, &statuses)
            .into_result()
    }

    async fn record_status_change(
        &self,
        item: &ChecklistItemInstance,
        from: ChecklistStatus,
        actor: &Actor,
    ) {
        if !self.config.audit_enabled {
            return;
        }
        let record = StatusChangeRecord::new(
            uuid::Uuid::new_v4().to_string(),
            item.id,
            from,
            item.status,
            actor.clone(),
        );
        if let Err(err) = self.store.append_status_change(record).await {
            error!(
                checklist_item_instance_id = %item.id,
                error = %err,
                "Failed to record status change"
            );
        }
    }
}
