//! Governance service: every operation exposed to the HTTP layer
//!
//! The service owns no state besides its configuration. Each call re-reads
//! what it needs from the store, runs the pure engine pieces, and writes
//! the result back.

mod checklist_instances;
mod checklist_templates;
mod governance;
mod projects;
mod workflow_instances;
mod workflow_templates;

use crate::config::EngineConfig;
use crate::gate::StatusGate;
use govflow_store::Store;
use std::sync::Arc;

/// Entry point for governance operations
#[derive(Clone)]
pub struct GovernanceService {
    store: Arc<dyn Store>,
    config: EngineConfig,
    gate: StatusGate,
}

impl GovernanceService {
    pub fn new(store: Arc<dyn Store>, config: EngineConfig) -> Self {
        Self {
            store,
            config,
            gate: StatusGate::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }
}

impl std::fmt::Debug for GovernanceService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GovernanceService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
