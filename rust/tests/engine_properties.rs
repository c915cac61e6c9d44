use std::collections::BTreeSet;

use multiway_tree::{BPlusTree, BTree, TreeEngine};
use paste::paste;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

fn assert_matches_reference<E: TreeEngine<i64>>(tree: &E, reference: &BTreeSet<i64>) {
    assert_eq!(tree.validate(), Ok(()));
    assert_eq!(tree.len(), reference.len());
    assert_eq!(tree.keys(), reference.iter().copied().collect::<Vec<_>>());
}

fn shuffled_round_trip<E: TreeEngine<i64>>(mut tree: E, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut keys: Vec<i64> = (0..300).collect();
    keys.shuffle(&mut rng);

    let mut reference = BTreeSet::new();
    for &key in &keys {
        tree.insert(key).unwrap();
        reference.insert(key);
    }
    assert_matches_reference(&tree, &reference);

    keys.shuffle(&mut rng);
    for &key in &keys {
        tree.delete(&key).unwrap();
        reference.remove(&key);
        assert_eq!(tree.validate(), Ok(()), "after deleting {}", key);
    }
    assert!(tree.is_empty());
    assert_eq!(tree.height(), 1);
}

fn random_mixed_workload<E: TreeEngine<i64>>(mut tree: E, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut reference = BTreeSet::new();
    for _ in 0..2_000 {
        let key = rng.gen_range(0..200);
        if rng.gen_bool(0.6) {
            assert_eq!(tree.insert(key).is_ok(), reference.insert(key));
        } else {
            assert_eq!(tree.delete(&key).is_ok(), reference.remove(&key));
        }
        assert_eq!(tree.contains(&key), reference.contains(&key));
    }
    assert_matches_reference(&tree, &reference);
}

fn failed_calls_leave_tree_untouched<E: TreeEngine<i64>>(mut tree: E) {
    for key in (0..60).step_by(2) {
        tree.insert(key).unwrap();
    }
    let before = tree.snapshot();
    for key in (0..60).step_by(2) {
        assert!(tree.insert(key).unwrap_err().is_duplicate());
    }
    for key in (1..60).step_by(2) {
        assert!(tree.delete(&key).unwrap_err().is_not_found());
    }
    assert_eq!(tree.snapshot(), before);
}

fn insert_then_delete_restores_keys<E: TreeEngine<i64>>(mut tree: E) {
    for key in [40, 10, 30, 20, 50, 60, 70, 80, 90] {
        tree.insert(key).unwrap();
    }
    let keys = tree.keys();
    tree.insert(35).unwrap();
    tree.delete(&35).unwrap();
    assert_eq!(tree.keys(), keys);
    assert!(!tree.search(&35).found);
}

fn search_path_starts_at_root<E: TreeEngine<i64>>(mut tree: E) {
    for key in 0..100 {
        tree.insert(key * 3).unwrap();
    }
    let snapshot = tree.snapshot();
    for probe in [-1, 0, 1, 150, 297, 298, 1_000] {
        let outcome = tree.search(&probe);
        assert_eq!(outcome.found, (0..=297).contains(&probe) && probe % 3 == 0);
        assert_eq!(outcome.path[0].node, snapshot.root);
        for pair in outcome.path.windows(2) {
            let parent = snapshot.node(pair[0].node).unwrap();
            assert_eq!(parent.children[pair[0].child_index], pair[1].node);
        }
    }
}

macro_rules! engine_suite {
    ($name:ident, $engine:ident) => {
        paste! {
            #[test]
            fn [<test_ $name _shuffled_round_trip>]() {
                for degree in 2..=5 {
                    shuffled_round_trip($engine::<i64>::new(degree).unwrap(), degree as u64);
                }
            }

            #[test]
            fn [<test_ $name _random_mixed_workload>]() {
                for seed in 0..4 {
                    random_mixed_workload($engine::<i64>::new(2 + seed as usize).unwrap(), seed);
                }
            }

            #[test]
            fn [<test_ $name _failed_calls_leave_tree_untouched>]() {
                failed_calls_leave_tree_untouched($engine::<i64>::new(2).unwrap());
                failed_calls_leave_tree_untouched($engine::<i64>::new(4).unwrap());
            }

            #[test]
            fn [<test_ $name _insert_then_delete_restores_keys>]() {
                insert_then_delete_restores_keys($engine::<i64>::new(2).unwrap());
                insert_then_delete_restores_keys($engine::<i64>::new(3).unwrap());
            }

            #[test]
            fn [<test_ $name _search_path_starts_at_root>]() {
                search_path_starts_at_root($engine::<i64>::new(3).unwrap());
            }
        }
    };
}

engine_suite!(btree, BTree);
engine_suite!(bplus, BPlusTree);

#[test]
fn test_engines_agree_on_contents() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut btree: BTree = BTree::new(3).unwrap();
    let mut bplus: BPlusTree = BPlusTree::new(3).unwrap();
    for _ in 0..500 {
        let key = rng.gen_range(-50..50);
        if rng.gen_bool(0.5) {
            assert_eq!(btree.insert(key).is_ok(), bplus.insert(key).is_ok());
        } else {
            assert_eq!(btree.delete(&key).is_ok(), bplus.delete(&key).is_ok());
        }
    }
    assert_eq!(btree.keys(), bplus.keys());
}

#[test]
fn test_bplus_chain_reaches_every_leaf() {
    let mut tree: BPlusTree = BPlusTree::new(2).unwrap();
    for key in (0..200).rev() {
        tree.insert(key).unwrap();
    }
    let snapshot = tree.snapshot();
    let leaf_count = snapshot.nodes.iter().filter(|view| view.is_leaf).count();
    assert_eq!(snapshot.leaf_chain().count(), leaf_count);
}

#[derive(Debug, Clone)]
enum Op {
    Insert(i64),
    Delete(i64),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0i64..64).prop_map(Op::Insert),
        2 => (0i64..64).prop_map(Op::Delete),
    ]
}

fn apply_ops<E: TreeEngine<i64>>(tree: &mut E, ops: &[Op]) -> BTreeSet<i64> {
    let mut reference = BTreeSet::new();
    for op in ops {
        match *op {
            Op::Insert(key) => assert_eq!(tree.insert(key).is_ok(), reference.insert(key)),
            Op::Delete(key) => assert_eq!(tree.delete(&key).is_ok(), reference.remove(&key)),
        }
    }
    reference
}

proptest! {
    #[test]
    fn prop_btree_matches_btreeset(degree in 2usize..6, ops in prop::collection::vec(op_strategy(), 0..300)) {
        let mut tree: BTree = BTree::new(degree).unwrap();
        let reference = apply_ops(&mut tree, &ops);
        prop_assert_eq!(tree.check_invariants_detailed(), Ok(()));
        prop_assert_eq!(tree.keys(), reference.into_iter().collect::<Vec<_>>());
    }

    #[test]
    fn prop_bplus_matches_btreeset(degree in 2usize..6, ops in prop::collection::vec(op_strategy(), 0..300)) {
        let mut tree: BPlusTree = BPlusTree::new(degree).unwrap();
        let reference = apply_ops(&mut tree, &ops);
        prop_assert_eq!(tree.check_invariants_detailed(), Ok(()));
        let chained: Vec<i64> = tree.snapshot().leaf_chain().flat_map(|leaf| leaf.keys.clone()).collect();
        prop_assert_eq!(chained, reference.into_iter().collect::<Vec<_>>());
    }
}
