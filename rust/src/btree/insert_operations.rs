//! INSERT operations for the B-Tree.
//!
//! Insertion splits top-down: a full root is split before descending, and any
//! full child is split before it is entered, so the node finally receiving the
//! key always has room.

use std::fmt::Display;

use crate::error::{ModifyResult, TreeError};
use crate::trace::{SplitKind, TraceEvent, TraceRecorder};
use crate::types::{Action, BTree, Node, NodeId, Outcome};

impl<K: Ord + Clone + Display> BTree<K> {
    /// Insert `key`, rejecting duplicates without touching the tree.
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
            self.root = self.nodes.allocate(new_root);
            self.split_child(self.root, 0, &mut trace);
        }
        self.insert_non_full(self.root, key.clone(), &mut trace);

        tracing::debug!(key = %key, "inserted");
        Ok(Outcome {
            key,
            action: Action::Inserted,
            trace: trace.finish(),
        })
    }

    /// Descend from `start`, which must not be full, and place `key` in a leaf.
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
                let median = &self.nodes[current].keys[index];
                if key > *median {
                    trace.record(TraceEvent::DescendRightOfSplit {
                        key: key.clone(),
                        median: median.clone(),
                        child_index: index + 1,
                    });
                    index += 1;
                }
            }
            current = self.nodes[current].children[index];
        }
    }

    /// Split the full child at `index` of `parent`, promoting its median.
    fn split_child(&mut self, parent: NodeId, index: usize, trace: &mut TraceRecorder<K>) {
        let child = self.nodes[parent].children[index];
        let (median, right) = self.nodes[child].split_at_median(self.degree);
        let right_id = self.nodes.allocate(right);

        trace.record(TraceEvent::Split {
            kind: SplitKind::Promoted,
            node: child,
            new_node: right_id,
            parent,
            key: median.clone(),
        });

        let parent_node = &mut self.nodes[parent];
        parent_node.keys.insert(index, median);
        parent_node.children.insert(index + 1, right_id);
    }
}
