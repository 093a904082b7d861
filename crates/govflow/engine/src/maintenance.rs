//! Template dependency maintenance
//!
//! Dependency sets on checklist-item templates are normalised before they
//! are persisted: the template's own id is dropped, duplicates collapse,
//! every target must live in the same governance template, and the result
//! must not close a cycle.

use govflow_types::{
    ChecklistItemTemplate, ChecklistItemTemplateId, GovernanceError, GovernanceResult,
};
use std::collections::{HashMap, HashSet};

/// Drop `own` and repeated ids, keeping first occurrences in order
pub fn normalize_dependencies(
    own: ChecklistItemTemplateId,
    requested: Vec<ChecklistItemTemplateId>,
) -> Vec<ChecklistItemTemplateId> {
    let mut seen = HashSet::with_capacity(requested.len());
    requested
        .into_iter()
        .filter(|dep| *dep != own && seen.insert(*dep))
        .collect()
}

/// Every dependency must name a template in `universe`, the checklist-item
/// templates of the owning governance template.
pub fn check_dependency_scope(
    dependencies: &[ChecklistItemTemplateId],
    universe: &[ChecklistItemTemplate],
) -> GovernanceResult<()> {
    let known: HashSet<_> = universe.iter().map(|t| t.id).collect();
    match dependencies.iter().find(|dep| !known.contains(dep)) {
        Some(unknown) => Err(GovernanceError::BadRequest(format!(
            "Dependency {} does not exist in this governance template",
            unknown
        ))),
        None => Ok(()),
    }
}

/// Reject `candidate` if saving it would put it on a dependency cycle.
///
/// Walks the proposed graph (`universe` with `candidate` swapped in) from
/// the candidate's dependencies and fails if the walk comes back to the
/// candidate. Cycles elsewhere in the universe neither block the edit nor
/// hide a new cycle through the candidate.
pub fn ensure_acyclic(
    universe: &[ChecklistItemTemplate],
    candidate: &ChecklistItemTemplate,
) -> GovernanceResult<()> {
    let mut edges: HashMap<ChecklistItemTemplateId, &[ChecklistItemTemplateId]> = universe
        .iter()
        .map(|t| (t.id, t.dependencies_requires.as_slice()))
        .collect();
    edges.insert(candidate.id, candidate.dependencies_requires.as_slice());

    let mut visited = HashSet::new();
    let mut stack: Vec<ChecklistItemTemplateId> = candidate.dependencies_requires.clone();
    while let Some(current) = stack.pop() {
        if current == candidate.id {
            return Err(GovernanceError::BadRequest("dependency cycle".to_string()));
        }
        if !visited.insert(current) {
            continue;
        }
        if let Some(deps) = edges.get(&current) {
            stack.extend(deps.iter().copied().filter(|dep| !visited.contains(dep)));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use govflow_types::{ChecklistItemType, WorkflowTemplateId};

    fn template(workflow: WorkflowTemplateId, name: &str) -> ChecklistItemTemplate {
        ChecklistItemTemplate::new(workflow, name, ChecklistItemType::Task)
    }

    #[test]
    fn test_normalize_drops_self_and_duplicates() {
        let own = ChecklistItemTemplateId::generate();
        let a = ChecklistItemTemplateId::generate();
        let b = ChecklistItemTemplateId::generate();
        assert_eq!(normalize_dependencies(own, vec![a, own, b, a]), vec![a, b]);
        assert!(normalize_dependencies(own, vec![own]).is_empty());
    }

    #[test]
    fn test_scope_rejects_foreign_template() {
        let workflow = WorkflowTemplateId::generate();
        let universe = vec![template(workflow, "a")];
        let foreign = ChecklistItemTemplateId::generate();

        assert!(check_dependency_scope(&[universe[0].id], &universe).is_ok());
        match check_dependency_scope(&[foreign], &universe) {
            Err(GovernanceError::BadRequest(message)) => {
                assert!(message.contains(&foreign.to_string()))
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_cycle_rejected() {
        let workflow = WorkflowTemplateId::generate();
        let a = template(workflow, "a");
        let b = template(workflow, "b").with_dependency(a.id);
        let universe = vec![a.clone(), b.clone()];

        let closing = a.clone().with_dependency(b.id);
        assert_eq!(
            ensure_acyclic(&universe, &closing),
            Err(GovernanceError::BadRequest("dependency cycle".to_string()))
        );

        let c = template(workflow, "c").with_dependency(a.id).with_dependency(b.id);
        assert!(ensure_acyclic(&universe, &c).is_ok());
    }

    #[test]
    fn test_legacy_cycle_does_not_block_unrelated_edit() {
        let workflow = WorkflowTemplateId::generate();
        let mut x = template(workflow, "x");
        let y = template(workflow, "y").with_dependency(x.id);
        x.dependencies_requires.push(y.id);
        let z = template(workflow, "z");
        let universe = vec![x, y, z.clone()];

        let renamed = ChecklistItemTemplate {
            name: "z2".into(),
            ..z
        };
        assert!(ensure_acyclic(&universe, &renamed).is_ok());

        let hanger = template(workflow, "w").with_dependency(universe[0].id);
        assert!(ensure_acyclic(&universe, &hanger).is_ok());
    }

    #[test]
    fn test_new_cycle_through_node_behind_legacy_cycle_rejected() {
        let workflow = WorkflowTemplateId::generate();
        let mut x = template(workflow, "x");
        let y = template(workflow, "y").with_dependency(x.id);
        x.dependencies_requires.push(y.id);
        let c = template(workflow, "c");
        let w = template(workflow, "w")
            .with_dependency(x.id)
            .with_dependency(c.id);
        let universe = vec![x, y, w.clone(), c.clone()];

        let closing = c.clone().with_dependency(w.id);
        assert_eq!(
            ensure_acyclic(&universe, &closing),
            Err(GovernanceError::BadRequest("dependency cycle".to_string()))
        );

        let renamed = ChecklistItemTemplate {
            name: "w2".into(),
            ..w
        };
        assert!(ensure_acyclic(&universe, &renamed).is_ok());
    }
}
