//! DELETE operations for the B+ tree.
//!
//! A key is removed from its leaf directly. If that leaves the leaf below
//! `t - 1` keys it borrows from a sibling or merges with one, and a merge can
//! push the underflow up level by level to the root, which is collapsed once it
//! runs out of keys. Last, guides on the way back up from the surviving leaf are
//! rewritten to the current minimum of the subtree they guard.

use std::fmt::Display;

use crate::error::{ModifyResult, TreeError};
use crate::trace::{TraceEvent, TraceRecorder};
use crate::tree_structure::subtree_min;
use crate::types::{Action, BPlusTree, NodeId, Outcome, NULL_NODE};

impl<K: Ord + Clone + Display> BPlusTree<K> {
    /// Delete `key` from its leaf, rejecting absent keys without touching the tree.
    pub fn delete(&mut self, key: &K) -> ModifyResult<Outcome<K>> {
        let (found, _, leaf) = self.descend(key);
        if !found {
            tracing::debug!(key = %key, "delete rejected: key not found");
            return Err(TreeError::key_not_found(key));
        }

        let mut trace = TraceRecorder::new("delete");
        trace.record(TraceEvent::DeleteStart { key: key.clone() });
        if let Some(removed) = self.nodes[leaf].remove_key(key) {
            trace.record(TraceEvent::LeafRemove {
                key: removed,
                node: leaf,
            });
        }

        let survivor = self.rebalance(leaf, &mut trace);
        self.collapse_root(&mut trace);
        self.refresh_guides(survivor, &mut trace);

        tracing::debug!(key = %key, "deleted");
        Ok(Outcome {
            key: key.clone(),
            action: Action::Deleted,
            trace: trace.finish(),
        })
    }

    /// Repair underflow starting at `leaf` and cascading upward. Returns the
    /// leaf that now holds what remains of `leaf`'s keys.
    fn rebalance(&mut self, leaf: NodeId, trace: &mut TraceRecorder<K>) -> NodeId {
        let degree = self.degree;
        let mut survivor = leaf;
        let mut current = leaf;

        while current != self.root && self.nodes[current].is_underfull(degree) {
            trace.record(TraceEvent::Underflow { node: current });
            let parent = self.nodes[current].parent;
            let index = self.position_in_parent(current, parent);
            let siblings = &self.nodes[parent].children;
            let left = index.checked_sub(1).map(|i| siblings[i]);
            let right = siblings.get(index + 1).copied();

            if left.is_some_and(|id| self.nodes[id].can_lend(degree)) {
                self.borrow_from_left(parent, index, trace);
                break;
            }
            if right.is_some_and(|id| self.nodes[id].can_lend(degree)) {
                self.borrow_from_right(parent, index, trace);
                break;
            }
            match (left, right) {
                (Some(left), _) => {
                    self.merge_children(parent, index - 1, trace);
                    if survivor == current {
                        survivor = left;
                    }
                }
                (None, Some(_)) => self.merge_children(parent, index, trace),
                (None, None) => unreachable!("non-root node {} has no siblings", current),
            }
            current = parent;
        }
        survivor
    }

    fn position_in_parent(&self, child: NodeId, parent: NodeId) -> usize {
        self.nodes[parent]
            .child_position(child)
            .unwrap_or_else(|| unreachable!("node {} is not a child of its parent {}", child, parent))
    }

    /// Move one key (and, for internal nodes, one child) from the left sibling
    /// into child `index` of `parent`, fixing the separator between them.
    fn borrow_from_left(&mut self, parent: NodeId, index: usize, trace: &mut TraceRecorder<K>) {
        let node = self.nodes[parent].children[index];
        let sibling = self.nodes[parent].children[index - 1];

        let sibling_node = &mut self.nodes[sibling];
        let Some(lifted) = sibling_node.keys.pop() else {
            unreachable!("lending sibling {} has no keys", sibling);
        };

        if self.nodes[node].leaf {
            self.nodes[node].keys.insert(0, lifted.clone());
            self.nodes[parent].keys[index - 1] = lifted;
        } else {
            let Some(moved) = self.nodes[sibling].children.pop() else {
                unreachable!("lending sibling {} has no children", sibling);
            };
            self.nodes[moved].parent = node;
            let separator = std::mem::replace(&mut self.nodes[parent].keys[index - 1], lifted);
            let node_ref = &mut self.nodes[node];
            node_ref.children.insert(0, moved);
            node_ref.keys.insert(0, separator);
        }

        trace.record(TraceEvent::BorrowLeft {
            from: sibling,
            to: node,
        });
    }

    /// Move one key (and, for internal nodes, one child) from the right sibling
    /// into child `index` of `parent`, fixing the separator between them.
    fn borrow_from_right(&mut self, parent: NodeId, index: usize, trace: &mut TraceRecorder<K>) {
        let node = self.nodes[parent].children[index];
        let sibling = self.nodes[parent].children[index + 1];

        let lifted = self.nodes[sibling].keys.remove(0);

        if self.nodes[node].leaf {
            self.nodes[node].keys.push(lifted);
            let new_boundary = self.nodes[sibling].keys[0].clone();
            self.nodes[parent].keys[index] = new_boundary;
        } else {
            let moved = self.nodes[sibling].children.remove(0);
            self.nodes[moved].parent = node;
            let separator = std::mem::replace(&mut self.nodes[parent].keys[index], lifted);
            let node_ref = &mut self.nodes[node];
            node_ref.children.push(moved);
            node_ref.keys.push(separator);
        }

        trace.record(TraceEvent::BorrowRight {
            from: sibling,
            to: node,
        });
    }

    /// Merge child `index + 1` of `parent` into child `index` and free it.
    ///
    /// Leaves drop the separator and take over the right leaf's chain link;
    /// internal nodes pull the separator down between the two child lists.
    fn merge_children(&mut self, parent: NodeId, index: usize, trace: &mut TraceRecorder<K>) {
        let parent_node = &mut self.nodes[parent];
        let left = parent_node.children[index];
        let right = parent_node.children.remove(index + 1);
        let separator = parent_node.keys.remove(index);

        let right_node = self.nodes.take(right);
        for &grandchild in &right_node.children {
            self.nodes[grandchild].parent = left;
        }

        let left_node = &mut self.nodes[left];
        if left_node.leaf {
            left_node.next = right_node.next;
        } else {
            left_node.keys.push(separator.clone());
        }
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
        self.nodes[new_root].parent = NULL_NODE;
        self.root = new_root;
        trace.record(TraceEvent::RootCollapse {
            old_root: root,
            new_root,
        });
    }

    /// Walk from `from` to the root and make every guide on the way equal to
    /// the minimum of the subtree to its right.
    fn refresh_guides(&mut self, from: NodeId, trace: &mut TraceRecorder<K>) {
        let mut current = from;
        while let Some(parent) = self.nodes[current].parent() {
            let index = self.position_in_parent(current, parent);
            if index > 0 {
                if let Some(minimum) = subtree_min(&self.nodes, current) {
                    let guide = &mut self.nodes[parent].keys[index - 1];
                    if *guide != minimum {
                        let old = std::mem::replace(guide, minimum.clone());
                        trace.record(TraceEvent::GuideUpdate {
                            parent,
                            old,
                            new: minimum,
                        });
                    }
                }
            }
            current = parent;
        }
    }
}
