//! INSERT operations for the B+ tree.
//!
//! Same top-down discipline as the B-Tree, but splits differ by node kind: a
//! leaf copies its right half's first key up as a guide and links the new leaf
//! into the chain, an internal node moves its median up.

use std::fmt::Display;

use crate::error::{ModifyResult, TreeError};
use crate::trace::{SplitKind, TraceEvent, TraceRecorder};
use crate::types::{Action, BPlusTree, Node, NodeId, Outcome};

impl<K: Ord + Clone + Display> BPlusTree<K> {
    /// Insert `key` into its leaf, rejecting duplicates without touching the tree.
    pub fn insert(&mut self, key: K) -> ModifyResult<Outcome<K>> {
        if self.descend(&key).0 {
            tracing::debug!(key = %key, "insert rejected: duplicate key");
            return Err(TreeError::duplicate_key(&key));
        }

        let mut trace = TraceRecorder::new("insert");
        let root = self.root;
        if self.nodes[root].is_full(self.degree) {
            trace.record(TraceEvent::RootFull { root });
            let mut new_root = Node::new_internal();
            new_root.children.push(root);
            let new_root = self.nodes.allocate(new_root);
            self.nodes[root].parent = new_root;
            self.root = new_root;
            self.split_child(new_root, 0, &mut trace);
        }
        self.insert_non_full(self.root, key.clone(), &mut trace);

        tracing::debug!(key = %key, "inserted");
        Ok(Outcome {
            key,
            action: Action::Inserted,
            trace: trace.finish(),
        })
    }

    fn insert_non_full(&mut self, start: NodeId, key: K, trace: &mut TraceRecorder<K>) {
        let mut current = start;
        loop {
            if self.nodes[current].leaf {
                trace.record(TraceEvent::LeafInsert {
                    key: key.clone(),
                    node: current,
                });
                self.nodes[current].insert_sorted(key);
                return;
            }

            let mut index = self.nodes[current].child_index(&key);
            trace.record(TraceEvent::Descend {
                node: current,
                child_index: index,
            });
            let child = self.nodes[current].children[index];
            if self.nodes[child].is_full(self.degree) {
                trace.record(TraceEvent::ChildFull {
                    parent: current,
                    child,
                });
                self.split_child(current, index, trace);
                let guide = &self.nodes[current].keys[index];
                if key > *guide {
                    trace.record(TraceEvent::DescendRightOfSplit {
                        key: key.clone(),
                        median: guide.clone(),
                        child_index: index + 1,
                    });
                    index += 1;
                }
            }
            current = self.nodes[current].children[index];
        }
    }

    /// Split the full child at `index` of `parent`.
    fn split_child(&mut self, parent: NodeId, index: usize, trace: &mut TraceRecorder<K>) {
        let child = self.nodes[parent].children[index];

        let (key, right_id, kind) = if self.nodes[child].leaf {
            let (guide, mut right) = self.nodes[child].split_leaf_copy_up(self.degree);
            right.parent = parent;
            let right_id = self.nodes.allocate(right);
            self.nodes[child].next = right_id;
            (guide, right_id, SplitKind::CopiedUp)
        } else {
            let (median, mut right) = self.nodes[child].split_at_median(self.degree);
            right.parent = parent;
            let moved_children = right.children.clone();
            let right_id = self.nodes.allocate(right);
            for grandchild in moved_children {
                self.nodes[grandchild].parent = right_id;
            }
            (median, right_id, SplitKind::MovedUp)
        };

        trace.record(TraceEvent::Split {
            kind,
            node: child,
            new_node: right_id,
            parent,
            key: key.clone(),
        });

        let parent_node = &mut self.nodes[parent];
        parent_node.keys.insert(index, key);
        parent_node.children.insert(index + 1, right_id);
    }
}
