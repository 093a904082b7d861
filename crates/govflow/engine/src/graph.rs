//! Dependency ordering over `dependencies_requires` edges
//!
//! Edges point from a prerequisite to its dependent. The adjacency and
//! in-degree tables are rebuilt on every call; nothing here is cached.
//!
//! Edges to ids outside the input are ignored, so a node whose prerequisite
//! was filtered out is treated as free. Nodes on a cycle (and anything
//! downstream of one) never reach zero in-degree: they are left out of the
//! ordering and reported in [`TopologicalOrder::excluded`].

use govflow_types::{
    ChecklistItemInstance, ChecklistItemInstanceId, ChecklistItemTemplate,
    ChecklistItemTemplateId,
};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fmt;
use std::hash::Hash;

/// A node with an identity and a "must complete before me" set
pub trait DependencyNode {
    type Id: Copy + Eq + Hash + fmt::Debug;

    fn node_id(&self) -> Self::Id;

    fn dependency_ids(&self) -> &[Self::Id];
}

impl DependencyNode for ChecklistItemInstance {
    type Id = ChecklistItemInstanceId;

    fn node_id(&self) -> Self::Id {
        self.id
    }

    fn dependency_ids(&self) -> &[Self::Id] {
        &self.dependencies_requires
    }
}

impl DependencyNode for ChecklistItemTemplate {
    type Id = ChecklistItemTemplateId;

    fn node_id(&self) -> Self::Id {
        self.id
    }

    fn dependency_ids(&self) -> &[Self::Id] {
        &self.dependencies_requires
    }
}

impl<N: DependencyNode> DependencyNode for &N {
    type Id = N::Id;

    fn node_id(&self) -> Self::Id {
        (**self).node_id()
    }

    fn dependency_ids(&self) -> &[Self::Id] {
        (**self).dependency_ids()
    }
}

/// Result of a topological sort
#[derive(Debug, Clone, PartialEq)]
pub struct TopologicalOrder<N: DependencyNode> {
    /// Nodes in dependency order; ties keep input order
    pub ordered: Vec<N>,
    /// Ids that could not be ordered, in input order
    pub excluded: Vec<N::Id>,
}

impl<N: DependencyNode> TopologicalOrder<N> {
    pub fn is_complete(&self) -> bool {
        self.excluded.is_empty()
    }
}

/// Kahn's algorithm with a FIFO queue seeded in input order
pub fn topological_order<N: DependencyNode>(nodes: Vec<N>) -> TopologicalOrder<N> {
    let mut index: HashMap<N::Id, usize> = HashMap::with_capacity(nodes.len());
    for (i, node) in nodes.iter().enumerate() {
        index.entry(node.node_id()).or_insert(i);
    }

    let mut in_degree = vec![0usize; nodes.len()];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    for (i, node) in nodes.iter().enumerate() {
        for dep in node.dependency_ids() {
            if let Some(&source) = index.get(dep) {
                dependents[source].push(i);
                in_degree[i] += 1;
            }
        }
    }

    let mut queue: VecDeque<usize> = (0..nodes.len()).filter(|&i| in_degree[i] == 0).collect();
    let mut emitted = Vec::with_capacity(nodes.len());
    while let Some(current) = queue.pop_front() {
        emitted.push(current);
        for &next in &dependents[current] {
            in_degree[next] -= 1;
            if in_degree[next] == 0 {
                queue.push_back(next);
            }
        }
    }

    let mut slots: Vec<Option<N>> = nodes.into_iter().map(Some).collect();
    let ordered: Vec<N> = emitted.iter().filter_map(|&i| slots[i].take()).collect();
    let excluded = slots
        .iter()
        .filter_map(|slot| slot.as_ref().map(|node| node.node_id()))
        .collect();

    TopologicalOrder { ordered, excluded }
}

/// Coarse display bucket, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DisplayBucket {
    /// `complete` or `not_required`
    Done,
    /// Every prerequisite is complete
    Available,
    /// At least one prerequisite is not complete
    Blocked,
}

impl DisplayBucket {
    pub const ALL: [DisplayBucket; 3] = [
        DisplayBucket::Done,
        DisplayBucket::Available,
        DisplayBucket::Blocked,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayBucket::Done => "done",
            DisplayBucket::Available => "available",
            DisplayBucket::Blocked => "blocked",
        }
    }
}

/// One independently sorted slice of a partitioned ordering
#[derive(Debug, Clone, PartialEq)]
pub struct Partition<N: DependencyNode, K = String> {
    pub group: K,
    pub bucket: DisplayBucket,
    pub order: TopologicalOrder<N>,
}

/// Sort within each `(group, bucket)` partition, then concatenate groups in
/// key order and buckets in [`DisplayBucket`] order. Empty partitions are
/// omitted.
pub fn partitioned_order<N, K, G, B>(
    nodes: Vec<N>,
    group_of: G,
    bucket_of: B,
) -> Vec<Partition<N, K>>
where
    N: DependencyNode,
    K: Ord + Clone,
    G: Fn(&N) -> K,
    B: Fn(&N) -> DisplayBucket,
{
    let mut grouped: BTreeMap<K, BTreeMap<DisplayBucket, Vec<N>>> = BTreeMap::new();
    for node in nodes {
        let group = group_of(&node);
        let bucket = bucket_of(&node);
        grouped
            .entry(group)
            .or_default()
            .entry(bucket)
            .or_default()
            .push(node);
    }

    let mut partitions = Vec::new();
    for (group, buckets) in grouped {
        for (bucket, members) in buckets {
            partitions.push(Partition {
                group: group.clone(),
                bucket,
                order: topological_order(members),
            });
        }
    }
    partitions
}
