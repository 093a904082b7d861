//! Govflow Engine - dependency-gated governance checklists
//!
//! Pure building blocks:
//! - [`graph`]: stable topological ordering with cycle reporting
//! - [`gate`]: the completion gate and per-type metadata rules
//! - [`sequencing`]: dense `order` planning for sibling templates
//! - [`maintenance`]: dependency-set normalisation and cycle rejection
//! - [`projection`]: template-to-instance cloning with edge remapping
//!
//! [`GovernanceService`] wires them to a [`govflow_store::Store`] and
//! exposes every governance operation as an async function.

#![deny(unsafe_code)]

pub mod config;
pub mod gate;
pub mod graph;
pub mod maintenance;
pub mod progress;
pub mod projection;
pub mod sequencing;
pub mod service;
pub mod views;

pub use config::EngineConfig;
pub use gate::{GateResult, StatusGate};
pub use graph::{
    partitioned_order, topological_order, DependencyNode, DisplayBucket, Partition,
    TopologicalOrder,
};
pub use progress::WorkflowInstanceProgress;
pub use projection::{plan_projection, ProjectionPlan};
pub use service::GovernanceService;
pub use views::{ChecklistListing, ChecklistSection, ProjectChecklist};
