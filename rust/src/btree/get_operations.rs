//! Search for the B-Tree.

use std::fmt::Display;

use crate::trace::{TraceEvent, TraceRecorder};
use crate::types::{BTree, PathStep, SearchOutcome};

impl<K: Ord + Clone + Display> BTree<K> {
    /// Exact-match search from the root.
    ///
    /// Each node on the way contributes one [`PathStep`] holding the index the
    /// scan stopped at: the matching key's position on success, otherwise the
    /// child the descent continued into.
    pub fn search(&self, key: &K) -> SearchOutcome<K> {
        let (found, path) = self.descend(key);

        let mut trace = TraceRecorder::new("search");
        let (last, visited) = path
            .split_last()
            .unwrap_or_else(|| unreachable!("a descent always visits the root"));
        for step in visited {
            trace.record(TraceEvent::Visit {
                node: step.node,
                child_index: step.child_index,
            });
        }
        trace.record(if found {
            TraceEvent::Found {
                key: key.clone(),
                node: last.node,
            }
        } else {
            TraceEvent::NotFound {
                key: key.clone(),
                leaf: last.node,
            }
        });

        SearchOutcome {
            found,
            path,
            leaf: None,
            trace: trace.finish(),
        }
    }

    /// Walk from the root to `key` or to the leaf where it would live.
    pub(crate) fn descend(&self, key: &K) -> (bool, Vec<PathStep>) {
        let mut path = Vec::new();
        let mut current = self.root;
        loop {
            let node = &self.nodes[current];
            let index = node.scan_position(key);
            path.push(PathStep {
                node: current,
                child_index: index,
            });
            if node.keys.get(index) == Some(key) {
                return (true, path);
            }
            if node.leaf {
                return (false, path);
            }
            current = node.children[index];
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::trace::TraceEvent;
    use crate::types::BTree;

    #[test]
    fn test_search_empty_tree() {
        let tree: BTree = BTree::new(3).unwrap();
        let outcome = tree.search(&1);
        assert!(!outcome.found);
        assert_eq!(outcome.path.len(), 1);
        assert_eq!(outcome.leaf, None);
    }

    #[test]
    fn test_search_stops_at_interior_match() {
        let mut tree: BTree = BTree::new(2).unwrap();
        for key in 1..=4 {
            tree.insert(key).unwrap();
        }
        // root [2] over [1] and [3, 4]
        let outcome = tree.search(&2);
        assert!(outcome.found);
        assert_eq!(outcome.path.len(), 1);
        assert_eq!(outcome.path[0].child_index, 0);
        assert_eq!(
            outcome.trace,
            vec![TraceEvent::Found {
                key: 2,
                node: tree.root_id()
            }]
        );
    }

    #[test]
    fn test_search_records_descent_index() {
        let mut tree: BTree = BTree::new(2).unwrap();
        for key in 1..=4 {
            tree.insert(key).unwrap();
        }
        let outcome = tree.search(&4);
        assert!(outcome.found);
        assert_eq!(outcome.path[0].child_index, 1);
        assert_eq!(outcome.path[1].child_index, 1);

        let missing = tree.search(&0);
        assert!(!missing.found);
        assert_eq!(missing.path.len(), 2);
        assert!(matches!(
            missing.trace.last(),
            Some(TraceEvent::NotFound { key: 0, .. })
        ));
    }
}
