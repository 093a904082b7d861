//! Progress ranking for workflow instances

use govflow_types::{ChecklistItemInstance, ChecklistStatus, WorkflowInstance, WorkflowInstanceId};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// A workflow instance with its checklist counts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowInstanceProgress {
    #[serde(flatten)]
    pub workflow_instance: WorkflowInstance,
    pub total_items: usize,
    pub completed_items: usize,
}

impl WorkflowInstanceProgress {
    pub fn is_empty(&self) -> bool {
        self.total_items == 0
    }
}

/// Non-empty workflows first, then more completed items, then more items,
/// then template order.
pub fn compare_progress(a: &WorkflowInstanceProgress, b: &WorkflowInstanceProgress) -> Ordering {
    let by_order = a.workflow_instance.order.cmp(&b.workflow_instance.order);
    match (a.is_empty(), b.is_empty()) {
        (true, true) => by_order,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b
            .completed_items
            .cmp(&a.completed_items)
            .then(b.total_items.cmp(&a.total_items))
            .then(by_order),
    }
}

/// Attach counts from `items` and rank
pub fn rank_by_progress(
    workflows: Vec<WorkflowInstance>,
    items: &[ChecklistItemInstance],
) -> Vec<WorkflowInstanceProgress> {
    let mut counts: HashMap<WorkflowInstanceId, (usize, usize)> = HashMap::new();
    for item in items {
        let entry = counts.entry(item.workflow_instance_id).or_default();
        entry.0 += 1;
        if item.status == ChecklistStatus::Complete {
            entry.1 += 1;
        }
    }

    let mut ranked: Vec<_> = workflows
        .into_iter()
        .map(|workflow_instance| {
            let (total_items, completed_items) =
                counts.get(&workflow_instance.id).copied().unwrap_or_default();
            WorkflowInstanceProgress {
                workflow_instance,
                total_items,
                completed_items,
            }
        })
        .collect();
    ranked.sort_by(compare_progress);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use govflow_types::{
        ChecklistItemTemplate, ChecklistItemType, GovernanceTemplateId, ProjectId,
        WorkflowTemplate, WorkflowTemplateId,
    };

    fn workflow(name: &str, order: u32) -> WorkflowInstance {
        let template = WorkflowTemplate::new(GovernanceTemplateId::generate(), name).with_order(order);
        WorkflowInstance::from_template(&template, ProjectId::generate())
    }

    fn items(workflow: &WorkflowInstance, total: usize, complete: usize) -> Vec<ChecklistItemInstance> {
        (0..total)
            .map(|i| {
                let template = ChecklistItemTemplate::new(
                    WorkflowTemplateId::generate(),
                    format!("{} {}", workflow.name, i),
                    ChecklistItemType::Task,
                );
                let mut item = ChecklistItemInstance::from_template(&template, workflow.id);
                if i < complete {
                    item.status = ChecklistStatus::Complete;
                }
                item
            })
            .collect()
    }

    #[test]
    fn test_ranking() {
        let empty = workflow("empty", 0);
        let small = workflow("small", 1);
        let large = workflow("large", 2);
        let ahead = workflow("ahead", 3);

        let mut all = Vec::new();
        all.extend(items(&small, 2, 1));
        all.extend(items(&large, 5, 1));
        all.extend(items(&ahead, 3, 2));

        let ranked = rank_by_progress(vec![empty, small, large, ahead], &all);
        let names: Vec<_> = ranked.iter().map(|p| p.workflow_instance.name.as_str()).collect();
        assert_eq!(names, vec!["ahead", "large", "small", "empty"]);
        assert_eq!(ranked[0].completed_items, 2);
        assert_eq!(ranked[3].total_items, 0);
    }
}
