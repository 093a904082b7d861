//! Govflow Store - persistence contract for governance documents
//!
//! The governance service talks to storage only through the per-collection
//! traits in [`traits`], combined into [`Store`]. [`InMemoryStore`] is the
//! reference backend used by the daemon and by every test suite.
//!
//! Writes that must be atomic across several documents (order reassignment,
//! dependency pulls, the gated status write) are single trait calls so a
//! backend can run each one under one lock or one transaction.

#![deny(unsafe_code)]

pub mod error;
pub mod memory;
pub mod traits;

pub use error::StorageError;
pub use memory::{InMemoryStore, MemoryLimits};
pub use traits::{
    AuditStore, ChecklistInstanceStore, ChecklistTemplateStore, ConditionalWrite,
    GovernanceTemplateStore, ProjectStore, StorageResult, Store, WorkflowInstanceStore,
    WorkflowTemplateStore,
};
