//! Govflow Types - Core documents for dependency-gated governance checklists
//!
//! ## Key Concepts
//!
//! - **GovernanceTemplate**: reusable definition of a governance process
//! - **WorkflowTemplate**: an ordered phase within a governance template
//! - **ChecklistItemTemplate**: a gate or task with `dependencies_requires`
//!   edges to other templates of the same governance template
//! - **Project**: a governance template instantiated with a chosen subset
//!   of workflows
//! - **WorkflowInstance / ChecklistItemInstance**: per-project clones that
//!   carry live status
//!
//! Every document is keyed by a typed [`ObjectId`] wrapper.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod audit;
pub mod checklist;
pub mod error;
pub mod governance;
pub mod ids;
pub mod project;
pub mod requests;
pub mod workflow;

/// Open key-value map attached to templates and instances
pub type Metadata = serde_json::Map<String, serde_json::Value>;

pub use audit::{Actor, StatusChangeRecord};
pub use checklist::{
    ChecklistItemInstance, ChecklistItemTemplate, ChecklistItemType, ChecklistStatus,
};
pub use error::{GovernanceError, GovernanceResult};
pub use governance::{GovernanceTemplate, GovernanceTemplateOverview};
pub use ids::{
    ChecklistItemInstanceId, ChecklistItemTemplateId, GovernanceTemplateId, IdError, ObjectId,
    ProjectId, WorkflowInstanceId, WorkflowTemplateId,
};
pub use project::{Project, ProjectWithWorkflows};
pub use requests::{
    ChecklistItemInstancePatch, ChecklistItemTemplatePatch, GovernanceTemplatePatch,
    NewChecklistItemTemplate, NewGovernanceTemplate, NewProject, NewWorkflowTemplate,
    ProjectPatch, StatusUpdate, WorkflowInstancePatch, WorkflowTemplatePatch,
    DEPENDENCIES_MANAGED_MESSAGE,
};
pub use workflow::{WorkflowInstance, WorkflowStatus, WorkflowTemplate};
