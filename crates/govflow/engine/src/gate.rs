//! Checklist-item status gate
//!
//! Moving an item to `complete` requires every prerequisite to exist and be
//! `complete`. Every other transition is free. The gate is a pure
//! evaluation; the store re-checks the same condition inside the
//! conditional write so the decision cannot go stale between read and write.

use crate::graph::DisplayBucket;
use chrono::{DateTime, Utc};
use govflow_types::{
    Actor, ChecklistItemInstance, ChecklistItemInstanceId, ChecklistItemType, ChecklistStatus,
    GovernanceError, GovernanceResult, Metadata,
};
use serde_json::Value;
use std::collections::HashMap;

pub const APPROVER_KEY: &str = "approver";
pub const APPROVAL_DATE_KEY: &str = "approvalDate";
pub const DOCUMENT_URL_KEY: &str = "documentUrl";
pub const COMPLETED_BY_KEY: &str = "completedBy";
pub const COMPLETED_DATE_KEY: &str = "completedDate";

/// Outcome of evaluating the gate for one transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateResult {
    Satisfied,
    Blocked {
        unmet: Vec<ChecklistItemInstanceId>,
    },
}

impl GateResult {
    pub fn is_satisfied(&self) -> bool {
        matches!(self, GateResult::Satisfied)
    }

    pub fn into_result(self) -> GovernanceResult<()> {
        match self {
            GateResult::Satisfied => Ok(()),
            GateResult::Blocked { unmet } => Err(GovernanceError::dependencies_incomplete(unmet)),
        }
    }
}

/// Evaluates status transitions against prerequisite statuses
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusGate;

impl StatusGate {
    pub fn new() -> Self {
        Self
    }

    /// `statuses` maps prerequisite ids to their current status; ids absent
    /// from the map are treated as deleted.
    pub fn evaluate(
        &self,
        item: &ChecklistItemInstance,
        target: ChecklistStatus,
        statuses: &HashMap<ChecklistItemInstanceId, ChecklistStatus>,
    ) -> GateResult {
        if target != ChecklistStatus::Complete {
            return GateResult::Satisfied;
        }
        let unmet = unmet_dependencies(item, statuses);
        if unmet.is_empty() {
            GateResult::Satisfied
        } else {
            GateResult::Blocked { unmet }
        }
    }
}

/// Prerequisites of `item` that are missing or not `complete`
pub fn unmet_dependencies(
    item: &ChecklistItemInstance,
    statuses: &HashMap<ChecklistItemInstanceId, ChecklistStatus>,
) -> Vec<ChecklistItemInstanceId> {
    item.dependencies_requires
        .iter()
        .filter(|dep| !statuses.get(*dep).is_some_and(ChecklistStatus::satisfies_dependents))
        .copied()
        .collect()
}

/// Where `item` sits in the partitioned checklist view
pub fn display_bucket(
    item: &ChecklistItemInstance,
    statuses: &HashMap<ChecklistItemInstanceId, ChecklistStatus>,
) -> DisplayBucket {
    if item.status.is_done() {
        DisplayBucket::Done
    } else if unmet_dependencies(item, statuses).is_empty() {
        DisplayBucket::Available
    } else {
        DisplayBucket::Blocked
    }
}

fn has_value(metadata: &Metadata, key: &str) -> bool {
    match metadata.get(key) {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(_) => true,
    }
}

/// Per-type metadata rules applied to an incoming metadata patch.
///
/// `completing` is true when the same patch moves the item to `complete`.
/// Derived fields are stamped in place.
pub fn apply_type_rules(
    item_type: ChecklistItemType,
    metadata: &mut Metadata,
    completing: bool,
    actor: &Actor,
    now: DateTime<Utc>,
) -> GovernanceResult<()> {
    match item_type {
        ChecklistItemType::Approval => {
            if !has_value(metadata, APPROVER_KEY) {
                return Err(GovernanceError::BadRequest(
                    "Approver is required for approval items".to_string(),
                ));
            }
            if completing && !has_value(metadata, APPROVAL_DATE_KEY) {
                metadata.insert(APPROVAL_DATE_KEY.to_string(), Value::String(now.to_rfc3339()));
            }
        }
        ChecklistItemType::Document => {
            if completing && !has_value(metadata, DOCUMENT_URL_KEY) {
                return Err(GovernanceError::BadRequest(
                    "Document URL is required for document items".to_string(),
                ));
            }
        }
        ChecklistItemType::Task => {
            if completing && !has_value(metadata, COMPLETED_BY_KEY) {
                metadata.insert(
                    COMPLETED_BY_KEY.to_string(),
                    Value::String(actor.as_str().to_string()),
                );
            }
            if completing && !has_value(metadata, COMPLETED_DATE_KEY) {
                metadata.insert(COMPLETED_DATE_KEY.to_string(), Value::String(now.to_rfc3339()));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use govflow_types::{ChecklistItemTemplate, WorkflowInstanceId, WorkflowTemplateId};
    use serde_json::json;

    fn item_with_deps(deps: &[ChecklistItemInstanceId]) -> ChecklistItemInstance {
        let template = ChecklistItemTemplate::new(
            WorkflowTemplateId::generate(),
            "Bias review",
            ChecklistItemType::Task,
        );
        let mut item = ChecklistItemInstance::from_template(&template, WorkflowInstanceId::generate());
        item.dependencies_requires = deps.to_vec();
        item
    }

    fn metadata(value: serde_json::Value) -> Metadata {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_gate_requires_complete_dependencies() {
        let dep = ChecklistItemInstanceId::generate();
        let item = item_with_deps(&[dep]);
        let gate = StatusGate::new();

        let mut statuses = HashMap::from([(dep, ChecklistStatus::Incomplete)]);
        assert_eq!(
            gate.evaluate(&item, ChecklistStatus::Complete, &statuses),
            GateResult::Blocked { unmet: vec![dep] }
        );

        statuses.insert(dep, ChecklistStatus::NotRequired);
        assert!(!gate.evaluate(&item, ChecklistStatus::Complete, &statuses).is_satisfied());

        statuses.insert(dep, ChecklistStatus::Complete);
        assert!(gate.evaluate(&item, ChecklistStatus::Complete, &statuses).is_satisfied());
    }

    #[test]
    fn test_missing_dependency_blocks_completion() {
        let dep = ChecklistItemInstanceId::generate();
        let item = item_with_deps(&[dep]);
        let result = StatusGate::new().evaluate(&item, ChecklistStatus::Complete, &HashMap::new());
        assert!(matches!(
            result.into_result(),
            Err(GovernanceError::PreconditionFailed { .. })
        ));
    }

    #[test]
    fn test_other_transitions_are_free() {
        let item = item_with_deps(&[ChecklistItemInstanceId::generate()]);
        let gate = StatusGate::new();
        assert!(gate.evaluate(&item, ChecklistStatus::NotRequired, &HashMap::new()).is_satisfied());
        assert!(gate.evaluate(&item, ChecklistStatus::Incomplete, &HashMap::new()).is_satisfied());
    }

    #[test]
    fn test_display_bucket() {
        let dep = ChecklistItemInstanceId::generate();
        let mut item = item_with_deps(&[dep]);
        let statuses = HashMap::from([(dep, ChecklistStatus::Incomplete)]);
        assert_eq!(display_bucket(&item, &statuses), DisplayBucket::Blocked);

        item.status = ChecklistStatus::NotRequired;
        assert_eq!(display_bucket(&item, &statuses), DisplayBucket::Done);

        let free = item_with_deps(&[]);
        assert_eq!(display_bucket(&free, &statuses), DisplayBucket::Available);
    }

    #[test]
    fn test_approval_requires_approver_and_stamps_date() {
        let now = Utc::now();
        let mut missing = metadata(json!({ "note": "x" }));
        assert!(apply_type_rules(ChecklistItemType::Approval, &mut missing, false, &Actor::system(), now).is_err());

        let mut present = metadata(json!({ "approver": "cro@example.com" }));
        apply_type_rules(ChecklistItemType::Approval, &mut present, true, &Actor::system(), now).unwrap();
        assert_eq!(present[APPROVAL_DATE_KEY], json!(now.to_rfc3339()));

        let mut kept = metadata(json!({ "approver": "cro@example.com", "approvalDate": "2024-01-01" }));
        apply_type_rules(ChecklistItemType::Approval, &mut kept, true, &Actor::system(), now).unwrap();
        assert_eq!(kept[APPROVAL_DATE_KEY], json!("2024-01-01"));
    }

    #[test]
    fn test_document_requires_url_only_when_completing() {
        let now = Utc::now();
        let mut empty = Metadata::new();
        assert!(apply_type_rules(ChecklistItemType::Document, &mut empty, false, &Actor::system(), now).is_ok());
        match apply_type_rules(ChecklistItemType::Document, &mut empty, true, &Actor::system(), now) {
            Err(GovernanceError::BadRequest(message)) => {
                assert_eq!(message, "Document URL is required for document items")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_task_stamps_completer() {
        let now = Utc::now();
        let actor = Actor::new("dana@example.com");
        let mut meta = Metadata::new();
        apply_type_rules(ChecklistItemType::Task, &mut meta, true, &actor, now).unwrap();
        assert_eq!(meta[COMPLETED_BY_KEY], json!("dana@example.com"));
        assert_eq!(meta[COMPLETED_DATE_KEY], json!(now.to_rfc3339()));

        let mut untouched = Metadata::new();
        apply_type_rules(ChecklistItemType::Task, &mut untouched, false, &actor, now).unwrap();
        assert!(untouched.is_empty());
    }
}
