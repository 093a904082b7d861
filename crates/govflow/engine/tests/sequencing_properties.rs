//! Property tests for dense sibling ordering

use govflow_engine::sequencing::{apply_plan, next_order, plan_compaction, plan_move};
use proptest::prelude::*;
use proptest::sample::Index;

#[derive(Debug, Clone)]
enum Op {
    Create,
    Delete(Index),
    Move(Index, u32),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        2 => Just(Op::Create),
        1 => any::<Index>().prop_map(Op::Delete),
        2 => (any::<Index>(), 0u32..12).prop_map(|(i, target)| Op::Move(i, target)),
    ]
}

fn sorted_ids(siblings: &[(u32, u32)]) -> Vec<u32> {
    let mut ranked = siblings.to_vec();
    ranked.sort_by_key(|&(_, order)| order);
    ranked.into_iter().map(|(id, _)| id).collect()
}

proptest! {
    #[test]
    fn orders_stay_dense(ops in prop::collection::vec(op(), 0..40)) {
        let mut siblings: Vec<(u32, u32)> = Vec::new();
        let mut next_id = 0u32;

        for op in ops {
            match op {
                Op::Create => {
                    let order = next_order(siblings.iter().map(|&(_, o)| o));
                    siblings.push((next_id, order));
                    next_id += 1;
                }
                Op::Delete(index) => {
                    if siblings.is_empty() {
                        continue;
                    }
                    let before = sorted_ids(&siblings);
                    let removed = siblings.remove(index.index(siblings.len())).0;
                    let plan = plan_compaction(&siblings);
                    apply_plan(&mut siblings, &plan);

                    let expected: Vec<u32> = before.into_iter().filter(|id| *id != removed).collect();
                    prop_assert_eq!(sorted_ids(&siblings), expected);
                }
                Op::Move(index, target) => {
                    if siblings.is_empty() {
                        continue;
                    }
                    let moved = siblings[index.index(siblings.len())].0;
                    let plan = plan_move(&siblings, moved, target).unwrap();
                    apply_plan(&mut siblings, &plan);

                    let position = sorted_ids(&siblings).iter().position(|id| *id == moved).unwrap();
                    prop_assert_eq!(position, (target as usize).min(siblings.len() - 1));
                }
            }

            let mut orders: Vec<u32> = siblings.iter().map(|&(_, o)| o).collect();
            orders.sort_unstable();
            let dense: Vec<u32> = (0..siblings.len() as u32).collect();
            prop_assert_eq!(orders, dense);
        }
    }

    #[test]
    fn move_touches_only_the_shifted_range(len in 1usize..10, from in any::<Index>(), target in 0u32..12) {
        let siblings: Vec<(u32, u32)> = (0..len as u32).map(|i| (i, i)).collect();
        let moved = from.index(len) as u32;
        let plan = plan_move(&siblings, moved, target).unwrap();

        let clamped = (target as usize).min(len - 1) as u32;
        let (low, high) = if moved <= clamped { (moved, clamped) } else { (clamped, moved) };
        for (id, _) in &plan {
            prop_assert!(*id >= low && *id <= high);
        }
        if clamped == moved {
            prop_assert!(plan.is_empty());
        }
    }
}
