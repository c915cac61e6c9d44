//! Search for the B+ tree.

use std::fmt::Display;

use crate::trace::{TraceEvent, TraceRecorder};
use crate::types::{BPlusTree, NodeId, PathStep, SearchOutcome};

impl<K: Ord + Clone + Display> BPlusTree<K> {
    /// Descend through the guides to a leaf, then match exactly there.
    ///
    /// The outcome always names the terminal leaf, so a delete can work on it
    /// without a second descent.
    pub fn search(&self, key: &K) -> SearchOutcome<K> {
        let (found, path, leaf) = self.descend(key);

        let mut trace = TraceRecorder::new("search");
        for step in &path[..path.len() - 1] {
            trace.record(TraceEvent::Visit {
                node: step.node,
                child_index: step.child_index,
            });
        }
        trace.record(if found {
            TraceEvent::Found {
                key: key.clone(),
                node: leaf,
            }
        } else {
            TraceEvent::NotFound {
                key: key.clone(),
                leaf,
            }
        });

        SearchOutcome {
            found,
            path,
            leaf: Some(leaf),
            trace: trace.finish(),
        }
    }

    /// Route `key` to its leaf. Internal steps record the child followed; the
    /// leaf step records the scan position inside the leaf.
    pub(crate) fn descend(&self, key: &K) -> (bool, Vec<PathStep>, NodeId) {
        let mut path = Vec::new();
        let mut current = self.root;
        loop {
            let node = &self.nodes[current];
            if node.leaf {
                let index = node.scan_position(key);
                path.push(PathStep {
                    node: current,
                    child_index: index,
                });
                let found = node.keys.get(index) == Some(key);
                return (found, path, current);
            }
            let index = node.child_index(key);
            path.push(PathStep {
                node: current,
                child_index: index,
            });
            current = node.children[index];
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::trace::TraceEvent;
    use crate::types::BPlusTree;

    #[test]
    fn test_search_always_reaches_a_leaf() {
        let mut tree: BPlusTree = BPlusTree::new(2).unwrap();
        for key in 1..=4 {
            tree.insert(key).unwrap();
        }
        // root [2] over [1] [2, 3, 4]; the guide 2 is not a match on its own
        let outcome = tree.search(&2);
        assert!(outcome.found);
        assert_eq!(outcome.path.len(), 2);
        assert_eq!(outcome.path[0].child_index, 1);
        let leaf = outcome.leaf.unwrap();
        assert!(tree.nodes[leaf].is_leaf());
        assert!(matches!(
            outcome.trace.as_slice(),
            [TraceEvent::Visit { child_index: 1, .. }, TraceEvent::Found { key: 2, .. }]
        ));
    }

    #[test]
    fn test_search_miss_reports_terminal_leaf() {
        let mut tree: BPlusTree = BPlusTree::new(2).unwrap();
        for key in [10, 20, 30, 40] {
            tree.insert(key).unwrap();
        }
        let outcome = tree.search(&25);
        assert!(!outcome.found);
        let leaf = outcome.leaf.unwrap();
        assert!(tree.nodes[leaf].keys.contains(&20));
    }
}
