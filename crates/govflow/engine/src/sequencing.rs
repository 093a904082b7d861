//! Dense `order` sequencing for sibling templates
//!
//! Siblings of one scope (workflow templates of a governance template, or
//! checklist-item templates of a workflow template) carry orders
//! `0..n-1`. Every mutation is planned here as a batch of `(id, order)`
//! assignments which the store applies atomically.

/// Position for a newly created sibling: one past the current maximum
pub fn next_order<I>(orders: I) -> u32
where
    I: IntoIterator<Item = u32>,
{
    orders.into_iter().max().map_or(0, |max| max.saturating_add(1))
}

fn ranked<Id: Copy>(siblings: &[(Id, u32)]) -> Vec<(Id, u32)> {
    let mut ranked = siblings.to_vec();
    ranked.sort_by_key(|&(_, order)| order);
    ranked
}

fn changed<Id: Copy>(sequence: Vec<(Id, u32)>) -> Vec<(Id, u32)> {
    sequence
        .into_iter()
        .enumerate()
        .filter_map(|(position, (id, order))| {
            let position = position as u32;
            (position != order).then_some((id, position))
        })
        .collect()
}

/// Plan moving `moved` to `target` among `siblings`.
///
/// `target` is clamped to the last position. The moved node is taken out of
/// the current sequence and reinserted at `target`; every sibling whose
/// position changes as a result gets an assignment. Returns `None` when
/// `moved` is not among `siblings`.
pub fn plan_move<Id>(siblings: &[(Id, u32)], moved: Id, target: u32) -> Option<Vec<(Id, u32)>>
where
    Id: Copy + PartialEq,
{
    let mut sequence = ranked(siblings);
    let from = sequence.iter().position(|(id, _)| *id == moved)?;
    let entry = sequence.remove(from);
    let target = (target as usize).min(sequence.len());
    sequence.insert(target, entry);
    Some(changed(sequence))
}

/// Plan re-densifying `siblings` to `0..n-1`, keeping their relative order
pub fn plan_compaction<Id: Copy>(siblings: &[(Id, u32)]) -> Vec<(Id, u32)> {
    changed(ranked(siblings))
}

/// Apply a plan to an in-memory sibling list
pub fn apply_plan<Id: Copy + PartialEq>(siblings: &mut [(Id, u32)], plan: &[(Id, u32)]) {
    for (id, order) in plan {
        if let Some(sibling) = siblings.iter_mut().find(|(sid, _)| sid == id) {
            sibling.1 = *order;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dense(ids: &[char]) -> Vec<(char, u32)> {
        ids.iter().enumerate().map(|(i, &id)| (id, i as u32)).collect()
    }

    fn layout(mut siblings: Vec<(char, u32)>) -> String {
        siblings.sort_by_key(|&(_, order)| order);
        siblings.into_iter().map(|(id, _)| id).collect()
    }

    #[test]
    fn test_next_order() {
        assert_eq!(next_order(Vec::new()), 0);
        assert_eq!(next_order(vec![0, 1, 2]), 3);
        assert_eq!(next_order(vec![4, 1]), 5);
    }

    #[test]
    fn test_move_down() {
        let mut siblings = dense(&['a', 'b', 'c', 'd']);
        let plan = plan_move(&siblings, 'a', 2).unwrap();
        assert_eq!(plan, vec![('b', 0), ('c', 1), ('a', 2)]);
        apply_plan(&mut siblings, &plan);
        assert_eq!(layout(siblings), "bcad");
    }

    #[test]
    fn test_move_up() {
        let mut siblings = dense(&['a', 'b', 'c', 'd']);
        let plan = plan_move(&siblings, 'd', 1).unwrap();
        assert_eq!(plan, vec![('d', 1), ('b', 2), ('c', 3)]);
        apply_plan(&mut siblings, &plan);
        assert_eq!(layout(siblings), "adbc");
    }

    #[test]
    fn test_move_clamps_and_noops() {
        let siblings = dense(&['a', 'b', 'c']);
        assert_eq!(plan_move(&siblings, 'a', 99).unwrap(), vec![('b', 0), ('c', 1), ('a', 2)]);
        assert!(plan_move(&siblings, 'b', 1).unwrap().is_empty());
        assert!(plan_move(&siblings, 'z', 0).is_none());
    }

    #[test]
    fn test_compaction_closes_gap() {
        let siblings = vec![('a', 0), ('c', 2), ('d', 3)];
        assert_eq!(plan_compaction(&siblings), vec![('c', 1), ('d', 2)]);
    }

    #[test]
    fn test_compaction_heals_legacy_gaps() {
        let siblings = vec![('x', 7), ('y', 3), ('z', 3)];
        let mut healed = siblings.clone();
        apply_plan(&mut healed, &plan_compaction(&siblings));
        let mut orders: Vec<u32> = healed.iter().map(|&(_, o)| o).collect();
        orders.sort_unstable();
        assert_eq!(orders, vec![0, 1, 2]);
        assert_eq!(layout(healed), "yzx");
    }
}
