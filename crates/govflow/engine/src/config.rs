//! Engine configuration

use serde::{Deserialize, Serialize};

/// Tunables for [`crate::GovernanceService`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// How many times a status write is retried after losing a version race
    #[serde(default = "default_max_transition_retries")]
    pub max_transition_retries: u32,

    /// Record status-change audit entries
    #[serde(default = "default_true")]
    pub audit_enabled: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_transition_retries: default_max_transition_retries(),
            audit_enabled: true,
        }
    }
}

fn default_max_transition_retries() -> u32 {
    3
}

fn default_true() -> bool {
    true
}
