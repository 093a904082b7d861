//! Status-change audit records

use crate::{ChecklistItemInstanceId, ChecklistStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const STATUS_CHANGE_EVENT: &str = "checklist_item_status_change";
pub const CHECKLIST_ITEM_INSTANCE_OBJECT: &str = "checklist_item_instance";

const SYSTEM_ACTOR: &str = "system";

/// Identity of whoever caused a change
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Actor(String);

impl Actor {
    /// Blank identities collapse to the system actor
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        if id.trim().is_empty() {
            Self::system()
        } else {
            Self(id)
        }
    }

    pub fn system() -> Self {
        Self(SYSTEM_ACTOR.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_system(&self) -> bool {
        self.0 == SYSTEM_ACTOR
    }
}

impl Default for Actor {
    fn default() -> Self {
        Self::system()
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Immutable record of one checklist-item status transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusChangeRecord {
    pub id: String,
    pub event_type: String,
    pub object_type: String,
    pub object_id: ChecklistItemInstanceId,
    pub from: ChecklistStatus,
    pub to: ChecklistStatus,
    pub changed_at: DateTime<Utc>,
    pub changed_by: Actor,
}

impl StatusChangeRecord {
    pub fn new(
        id: impl Into<String>,
        object_id: ChecklistItemInstanceId,
        from: ChecklistStatus,
        to: ChecklistStatus,
        changed_by: Actor,
    ) -> Self {
        Self {
            id: id.into(),
            event_type: STATUS_CHANGE_EVENT.to_string(),
            object_type: CHECKLIST_ITEM_INSTANCE_OBJECT.to_string(),
            object_id,
            from,
            to,
            changed_at: Utc::now(),
            changed_by,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_actor_is_system() {
        assert!(Actor::new("  ").is_system());
        assert!(Actor::default().is_system());
        assert_eq!(Actor::new("alice@example.com").as_str(), "alice@example.com");
    }

    #[test]
    fn test_record_shape() {
        let record = StatusChangeRecord::new(
            "a1",
            ChecklistItemInstanceId::generate(),
            ChecklistStatus::Incomplete,
            ChecklistStatus::Complete,
            Actor::system(),
        );
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["event_type"], "checklist_item_status_change");
        assert_eq!(json["object_type"], "checklist_item_instance");
        assert_eq!(json["from"], "incomplete");
        assert_eq!(json["to"], "complete");
        assert_eq!(json["changed_by"], "system");
    }
}
