//! Read models returned by checklist listings

use crate::graph::{DisplayBucket, Partition, TopologicalOrder};
use govflow_types::{ChecklistItemInstance, ChecklistItemInstanceId, WorkflowInstanceId};
use serde::{Deserialize, Serialize};

/// Checklist items of one workflow instance in dependency order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistListing {
    pub items: Vec<ChecklistItemInstance>,
    /// Items left out because they sit on or behind a dependency cycle
    pub excluded: Vec<ChecklistItemInstanceId>,
}

impl From<TopologicalOrder<ChecklistItemInstance>> for ChecklistListing {
    fn from(order: TopologicalOrder<ChecklistItemInstance>) -> Self {
        Self {
            items: order.ordered,
            excluded: order.excluded,
        }
    }
}

/// One `(workflow, bucket)` slice of a project's checklist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistSection {
    pub workflow_instance_id: WorkflowInstanceId,
    pub workflow_name: String,
    pub bucket: String,
    pub items: Vec<ChecklistItemInstance>,
    pub excluded: Vec<ChecklistItemInstanceId>,
}

/// Sections are keyed on the workflow instance as well as its name, so two
/// instances sharing a name stay apart.
pub type SectionKey = (String, WorkflowInstanceId);

impl From<Partition<ChecklistItemInstance, SectionKey>> for ChecklistSection {
    fn from(partition: Partition<ChecklistItemInstance, SectionKey>) -> Self {
        let (workflow_name, workflow_instance_id) = partition.group;
        Self {
            workflow_instance_id,
            workflow_name,
            bucket: partition.bucket.as_str().to_string(),
            items: partition.order.ordered,
            excluded: partition.order.excluded,
        }
    }
}

/// Every checklist item of a project, grouped for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectChecklist {
    pub sections: Vec<ChecklistSection>,
}

impl ProjectChecklist {
    pub fn items(&self) -> impl Iterator<Item = &ChecklistItemInstance> {
        self.sections.iter().flat_map(|s| s.items.iter())
    }

    pub fn section(&self, workflow_name: &str, bucket: DisplayBucket) -> Option<&ChecklistSection> {
        self.sections
            .iter()
            .find(|s| s.workflow_name == workflow_name && s.bucket == bucket.as_str())
    }
}
