//! DELETE operations for the B-Tree.
//!
//! Deletion makes a single pass down the tree. Before the descent enters a
//! child, that child is topped up to at least `t` keys by a rotation from a
//! sibling or by a merge, so removing one key below can never leave a node
//! short and nothing has to be fixed on the way back up.

use std::fmt::Display;

use crate::error::{ModifyResult, TreeError};
use crate::trace::{TraceEvent, TraceRecorder};
use crate::tree_structure::{subtree_max, subtree_min};
use crate::types::{Action, BTree, NodeId, Outcome};

impl<K: Ord + Clone + Display> BTree<K> {
    /// Delete `key`, rejecting absent keys without touching the tree.
    pub fn delete(&mut self, key: &K) -> ModifyResult<Outcome<K>> {
        if !self.descend(key).0 {
            tracing::debug!(key = %key, "delete rejected: key not found");
            return Err(TreeError::key_not_found(key));
        }

        let mut trace = TraceRecorder::new("delete");
        trace.record(TraceEvent::DeleteStart { key: key.clone() });
        self.remove_from(self.root, key.clone(), &mut trace);
        self.collapse_root(&mut trace);

        tracing::debug!(key = %key, "deleted");
        Ok(Outcome {
            key: key.clone(),
            action: Action::Deleted,
            trace: trace.finish(),
        })
    }

    /// Remove `key` from the subtree rooted at `start`.
    ///
    /// `start` is the root or a node already holding at least `t` keys.
    fn remove_from(&mut self, start: NodeId, key: K, trace: &mut TraceRecorder<K>) {
        let degree = self.degree;
        let mut current = start;
        let mut key = key;
        loop {
            let node = &self.nodes[current];
            let index = node.scan_position(&key);

            if node.keys.get(index) == Some(&key) {
                if node.leaf {
                    self.nodes[current].keys.remove(index);
                    trace.record(TraceEvent::LeafRemove { key, node: current });
                    return;
                }

                let left = node.children[index];
                let right = node.children[index + 1];
                if self.nodes[left].len() >= degree {
                    let replacement = self.extreme_key(subtree_max(&self.nodes, left));
                    trace.record(TraceEvent::Predecessor {
                        key,
                        replacement: replacement.clone(),
                    });
                    self.nodes[current].keys[index] = replacement.clone();
                    current = left;
                    key = replacement;
                } else if self.nodes[right].len() >= degree {
                    let replacement = self.extreme_key(subtree_min(&self.nodes, right));
                    trace.record(TraceEvent::Successor {
                        key,
                        replacement: replacement.clone(),
                    });
                    self.nodes[current].keys[index] = replacement.clone();
                    current = right;
                    key = replacement;
                } else {
                    trace.record(TraceEvent::MergeAroundKey {
                        key: key.clone(),
                        node: current,
                    });
                    self.merge_children(current, index, trace);
                    current = left;
                }
                continue;
            }

            if node.leaf {
                unreachable!("key {} vanished during descent to leaf {}", key, current);
            }

            let mut index = index;
            let child = node.children[index];
            if self.nodes[child].len() < degree {
                index = self.fill_child(current, index, trace);
            }
            current = self.nodes[current].children[index];
        }
    }

    fn extreme_key(&self, key: Option<K>) -> K {
        key.unwrap_or_else(|| unreachable!("non-root subtree without keys"))
    }

    /// Bring child `index` of `parent` up to `t` keys. Returns the index of the
    /// child now holding the keys of the child that was filled afterwards, which moves one to
    /// the left when it was merged into its left sibling.
    fn fill_child(&mut self, parent: NodeId, index: usize, trace: &mut TraceRecorder<K>) -> usize {
        let degree = self.degree;
        let parent_node = &self.nodes[parent];
        let key_count = parent_node.keys.len();
        trace.record(TraceEvent::Fill {
            node: parent_node.children[index],
            parent,
        });

        if index > 0 && self.nodes[parent_node.children[index - 1]].len() >= degree {
            self.borrow_from_left(parent, index, trace);
            index
        } else if index < key_count && self.nodes[parent_node.children[index + 1]].len() >= degree
        {
            self.borrow_from_right(parent, index, trace);
            index
        } else if index < key_count {
            self.merge_children(parent, index, trace);
            index
        } else {
            self.merge_children(parent, index - 1, trace);
            index - 1
        }
    }

    /// Rotate the left sibling's last key up through the parent separator.
    fn borrow_from_left(&mut self, parent: NodeId, index: usize, trace: &mut TraceRecorder<K>) {
        let child = self.nodes[parent].children[index];
        let sibling = self.nodes[parent].children[index - 1];

        let sibling_node = &mut self.nodes[sibling];
        let Some(lifted) = sibling_node.keys.pop() else {
            unreachable!("lending sibling {} has no keys", sibling);
        };
        let moved_child = if sibling_node.leaf {
            None
        } else {
            sibling_node.children.pop()
        };

        let separator = std::mem::replace(&mut self.nodes[parent].keys[index - 1], lifted);
        let child_node = &mut self.nodes[child];
        child_node.keys.insert(0, separator);
        if let Some(moved) = moved_child {
            child_node.children.insert(0, moved);
        }

        trace.record(TraceEvent::BorrowLeft {
            from: sibling,
            to: child,
        });
    }

    /// Rotate the right sibling's first key up through the parent separator.
    fn borrow_from_right(&mut self, parent: NodeId, index: usize, trace: &mut TraceRecorder<K>) {
        let child = self.nodes[parent].children[index];
        let sibling = self.nodes[parent].children[index + 1];

        let sibling_node = &mut self.nodes[sibling];
        let lifted = sibling_node.keys.remove(0);
        let moved_child = if sibling_node.leaf {
            None
        } else {
            Some(sibling_node.children.remove(0))
        };

        let separator = std::mem::replace(&mut self.nodes[parent].keys[index], lifted);
        let child_node = &mut self.nodes[child];
        child_node.keys.push(separator);
        if let Some(moved) = moved_child {
            child_node.children.push(moved);
        }

        trace.record(TraceEvent::BorrowRight {
            from: sibling,
            to: child,
        });
    }

    /// Merge child `index + 1` into child `index`, pulling the separator down
    /// between them. The right node is freed.
    fn merge_children(&mut self, parent: NodeId, index: usize, trace: &mut TraceRecorder<K>) {
        let parent_node = &mut self.nodes[parent];
        let left = parent_node.children[index];
        let right = parent_node.children.remove(index + 1);
        let separator = parent_node.keys.remove(index);

        let right_node = self.nodes.take(right);
        let left_node = &mut self.nodes[left];
        left_node.keys.push(separator.clone());
        left_node.keys.extend(right_node.keys);
        left_node.children.extend(right_node.children);

        trace.record(TraceEvent::Merge {
            into: left,
            from: right,
            parent,
            separator,
        });
    }

    /// An internal root left without keys hands the tree to its only child.
    fn collapse_root(&mut self, trace: &mut TraceRecorder<K>) {
        let root = self.root;
        let root_node = &self.nodes[root];
        if root_node.leaf || !root_node.is_empty() {
            return;
        }
        let new_root = root_node.children[0];
        self.nodes.take(root);
        self.root = new_root;
        trace.record(TraceEvent::RootCollapse {
            old_root: root,
            new_root,
        });
    }
}

#[cfg(test)]
mod tests {
    use crate::trace::TraceEvent;
    use crate::types::BTree;

    fn tree_with(degree: usize, keys: &[i64]) -> BTree {
        let mut tree = BTree::new(degree).unwrap();
        for &key in keys {
            tree.insert(key).unwrap();
        }
        tree
    }

    fn has_event(trace: &[TraceEvent<i64>], pred: impl Fn(&TraceEvent<i64>) -> bool) -> bool {
        trace.iter().any(pred)
    }

    #[test]
    fn test_delete_from_leaf() {
        let mut tree = tree_with(3, &[1, 2, 3]);
        let outcome = tree.delete(&2).unwrap();
        assert_eq!(outcome.message(), "Key 2 deleted.");
        assert_eq!(tree.keys(), vec![1, 3]);
    }

    #[test]
    fn test_delete_missing_key_leaves_tree_untouched() {
        let mut tree = tree_with(2, &[5, 1, 9, 3, 7]);
        let before = tree.snapshot();
        assert!(tree.delete(&4).unwrap_err().is_not_found());
        assert_eq!(tree.snapshot(), before);
    }

    #[test]
    fn test_delete_interior_key_uses_predecessor() {
        let mut tree = tree_with(2, &[1, 2, 3, 4, 5]);
        let root = tree.root_id();
        assert_eq!(tree.nodes[root].keys, vec![2]);
        tree.insert(0).unwrap();
        // root [2] over [0, 1] [3, 4, 5]; t = 2 so [0, 1] can give up a key
        let outcome = tree.delete(&2).unwrap();
        assert!(has_event(&outcome.trace, |e| matches!(
            e,
            TraceEvent::Predecessor {
                key: 2,
                replacement: 1
            }
        )));
        assert_eq!(tree.nodes[tree.root].keys, vec![1]);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_delete_interior_key_uses_successor() {
        // root [2] over [1] [3, 4, 5]
        let mut tree = tree_with(2, &[1, 2, 3, 4, 5]);
        let outcome = tree.delete(&2).unwrap();
        assert!(has_event(&outcome.trace, |e| matches!(
            e,
            TraceEvent::Successor {
                key: 2,
                replacement: 3
            }
        )));
        assert_eq!(tree.nodes[tree.root].keys, vec![3]);
        assert_eq!(tree.keys(), vec![1, 3, 4, 5]);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_delete_interior_key_merges_minimal_children_and_collapses_root() {
        // root [2] over [1] [3]
        let mut tree = tree_with(2, &[1, 2, 3]);
        tree.insert(4).unwrap();
        tree.delete(&4).unwrap();
        let old_root = tree.root_id();
        let outcome = tree.delete(&2).unwrap();
        assert!(has_event(&outcome.trace, |e| matches!(
            e,
            TraceEvent::MergeAroundKey { key: 2, .. }
        )));
        assert!(has_event(&outcome.trace, |e| matches!(
            e,
            TraceEvent::RootCollapse { old_root: r, .. } if *r == old_root
        )));
        assert_eq!(tree.height(), 1);
        assert_eq!(tree.keys(), vec![1, 3]);
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.nodes.len(), 1);
    }

    #[test]
    fn test_descent_borrows_from_right_sibling() {
        // root [2] over [1] [3, 4, 5]; deleting 1 must top up [1] first
        let mut tree = tree_with(2, &[1, 2, 3, 4, 5]);
        let outcome = tree.delete(&1).unwrap();
        assert!(has_event(&outcome.trace, |e| matches!(e, TraceEvent::BorrowRight { .. })));
        assert_eq!(tree.nodes[tree.root].keys, vec![3]);
        assert_eq!(tree.keys(), vec![2, 3, 4, 5]);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_descent_borrows_from_left_sibling() {
        // root [4] over [1, 2, 3] [5]
        let mut tree = tree_with(2, &[4, 5, 1, 2]);
        tree.insert(3).unwrap();
        let root = tree.root_id();
        assert_eq!(tree.nodes[root].keys, vec![4]);
        let outcome = tree.delete(&5).unwrap();
        assert!(has_event(&outcome.trace, |e| matches!(e, TraceEvent::BorrowLeft { .. })));
        assert_eq!(tree.keys(), vec![1, 2, 3, 4]);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_rightmost_child_merges_into_left_sibling() {
        let mut tree = tree_with(2, &[1, 2, 3, 4, 5, 6, 7]);
        // drain until the rightmost leaves sit at the minimum
        for key in [7, 6] {
            tree.delete(&key).unwrap();
            assert!(tree.validate().is_ok());
        }
        let outcome = tree.delete(&5).unwrap();
        assert!(has_event(&outcome.trace, |e| matches!(e, TraceEvent::Merge { .. })
            || matches!(e, TraceEvent::BorrowLeft { .. })));
        assert_eq!(tree.keys(), vec![1, 2, 3, 4]);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_delete_everything() {
        let keys: Vec<i64> = (0..200).map(|i| (i * 37) % 200).collect();
        let mut tree = tree_with(3, &keys);
        for &key in keys.iter().rev() {
            tree.delete(&key).unwrap();
            assert!(tree.validate().is_ok(), "after deleting {}", key);
        }
        assert!(tree.is_empty());
        assert_eq!(tree.height(), 1);
        assert_eq!(tree.nodes.len(), 1);
    }
}
