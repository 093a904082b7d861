//! Checklist items: template definitions and their per-project instances
//!
//! A [`ChecklistItemTemplate`] lives inside a workflow template and may
//! depend on other templates of the same governance template. At project
//! creation each selected template is cloned into a
//! [`ChecklistItemInstance`] whose dependency edges point at sibling
//! instances only.

use crate::{
    ChecklistItemInstanceId, ChecklistItemTemplateId, Metadata, WorkflowInstanceId,
    WorkflowTemplateId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── Item type ────────────────────────────────────────────────────────

/// Kind of work a checklist item represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChecklistItemType {
    /// Needs a named approver
    Approval,
    /// Needs a document link before completion
    Document,
    /// Plain task
    Task,
}

impl ChecklistItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChecklistItemType::Approval => "approval",
            ChecklistItemType::Document => "document",
            ChecklistItemType::Task => "task",
        }
    }
}

impl fmt::Display for ChecklistItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Status ───────────────────────────────────────────────────────────

/// Live status of a checklist-item instance.
///
/// Transitions are free in every direction; only moving to `Complete` is
/// gated on the instance's dependencies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChecklistStatus {
    #[default]
    Incomplete,
    Complete,
    NotRequired,
}

impl ChecklistStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChecklistStatus::Incomplete => "incomplete",
            ChecklistStatus::Complete => "complete",
            ChecklistStatus::NotRequired => "not_required",
        }
    }

    /// Whether an item in this status unblocks its dependents.
    ///
    /// `NotRequired` does not: the gate asks for `complete` exactly.
    pub fn satisfies_dependents(&self) -> bool {
        matches!(self, ChecklistStatus::Complete)
    }

    /// Whether the item is finished for display purposes
    pub fn is_done(&self) -> bool {
        matches!(self, ChecklistStatus::Complete | ChecklistStatus::NotRequired)
    }
}

impl fmt::Display for ChecklistStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChecklistStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "incomplete" => Ok(ChecklistStatus::Incomplete),
            "complete" => Ok(ChecklistStatus::Complete),
            "not_required" => Ok(ChecklistStatus::NotRequired),
            other => Err(format!("unknown checklist status: {}", other)),
        }
    }
}

// ── Template ─────────────────────────────────────────────────────────

/// A checklist-item definition within a workflow template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItemTemplate {
    pub id: ChecklistItemTemplateId,
    /// Owning workflow template
    pub workflow_template_id: WorkflowTemplateId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub item_type: ChecklistItemType,
    /// Templates that must be completed before this one. Never contains `id`.
    #[serde(default)]
    pub dependencies_requires: Vec<ChecklistItemTemplateId>,
    #[serde(default)]
    pub metadata: Metadata,
    /// Dense zero-based position within the owning workflow template
    pub order: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ChecklistItemTemplate {
    pub fn new(
        workflow_template_id: WorkflowTemplateId,
        name: impl Into<String>,
        item_type: ChecklistItemType,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ChecklistItemTemplateId::generate(),
            workflow_template_id,
            name: name.into(),
            description: None,
            item_type,
            dependencies_requires: Vec::new(),
            metadata: Metadata::new(),
            order: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_dependency(mut self, dependency: ChecklistItemTemplateId) -> Self {
        if dependency != self.id && !self.dependencies_requires.contains(&dependency) {
            self.dependencies_requires.push(dependency);
        }
        self
    }

    pub fn with_order(mut self, order: u32) -> Self {
        self.order = order;
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn depends_on(&self, other: &ChecklistItemTemplateId) -> bool {
        self.dependencies_requires.contains(other)
    }
}

// ── Instance ─────────────────────────────────────────────────────────

/// A checklist item inside a running workflow instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItemInstance {
    pub id: ChecklistItemInstanceId,
    /// Owning workflow instance
    pub workflow_instance_id: WorkflowInstanceId,
    /// Template this instance was cloned from (provenance only)
    pub checklist_item_template_id: ChecklistItemTemplateId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub item_type: ChecklistItemType,
    #[serde(default)]
    pub status: ChecklistStatus,
    /// Sibling instances from the same project-creation batch. Managed by the
    /// system; immutable after creation.
    #[serde(default)]
    pub dependencies_requires: Vec<ChecklistItemInstanceId>,
    #[serde(default)]
    pub metadata: Metadata,
    /// Display tie-break copied from the source template
    #[serde(default)]
    pub order: u32,
    /// Optimistic concurrency token, bumped by every write
    #[serde(default)]
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ChecklistItemInstance {
    /// Clone a template into a fresh, dependency-free instance
    pub fn from_template(
        template: &ChecklistItemTemplate,
        workflow_instance_id: WorkflowInstanceId,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ChecklistItemInstanceId::generate(),
            workflow_instance_id,
            checklist_item_template_id: template.id,
            name: template.name.clone(),
            description: template.description.clone(),
            item_type: template.item_type,
            status: ChecklistStatus::Incomplete,
            dependencies_requires: Vec::new(),
            metadata: template.metadata.clone(),
            order: template.order,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_dependencies(&self) -> bool {
        !self.dependencies_requires.is_empty()
    }
}
