//! Node-level operations shared by both engines.
//!
//! These methods only ever touch one node. Anything that needs a parent or a
//! sibling lives with the engine that owns the arena.

use crate::types::{Node, NodeId, NULL_NODE};

impl<K> Node<K> {
    // ============================================================================
    // CONSTRUCTION
    // ============================================================================

    pub fn new_leaf() -> Self {
        Self {
            leaf: true,
            keys: Vec::new(),
            children: Vec::new(),
            next: NULL_NODE,
            parent: NULL_NODE,
        }
    }

    pub fn new_internal() -> Self {
        Self {
            leaf: false,
            ..Self::new_leaf()
        }
    }

    // ============================================================================
    // ACCESSORS
    // ============================================================================

    pub fn is_leaf(&self) -> bool {
        self.leaf
    }

    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn next_leaf(&self) -> Option<NodeId> {
        link(self.next)
    }

    pub fn parent(&self) -> Option<NodeId> {
        link(self.parent)
    }

    // ============================================================================
    // STATUS CHECKS
    // ============================================================================

    /// Holds the maximum `2t - 1` keys.
    pub fn is_full(&self, degree: usize) -> bool {
        self.keys.len() >= 2 * degree - 1
    }

    /// Below the non-root minimum of `t - 1` keys.
    pub fn is_underfull(&self, degree: usize) -> bool {
        self.keys.len() < degree - 1
    }

    /// Can give a key away and stay at or above `t - 1`.
    pub fn can_lend(&self, degree: usize) -> bool {
        self.keys.len() > degree - 1
    }

    /// Position of `child` among this node's children.
    pub fn child_position(&self, child: NodeId) -> Option<usize> {
        self.children.iter().position(|&id| id == child)
    }

    // ============================================================================
    // SPLITTING
    // ============================================================================

    /// Split a full node around its median, which is removed and returned.
    ///
    /// The left half keeps `t - 1` keys (and `t` children when internal); the
    /// returned right sibling gets the top `t - 1` keys. The caller owns linking
    /// the new node into the tree.
    pub(crate) fn split_at_median(&mut self, degree: usize) -> (K, Node<K>) {
        let right_keys = self.keys.split_off(degree);
        let median = match self.keys.pop() {
            Some(median) => median,
            None => unreachable!("split of a node holding fewer than t keys"),
        };
        let right_children = if self.leaf {
            Vec::new()
        } else {
            self.children.split_off(degree)
        };
        let right = Node {
            leaf: self.leaf,
            keys: right_keys,
            children: right_children,
            next: NULL_NODE,
            parent: self.parent,
        };
        (median, right)
    }
}

impl<K: Ord> Node<K> {
    /// First index whose key is `>= key`.
    pub fn scan_position(&self, key: &K) -> usize {
        self.keys.partition_point(|probe| probe < key)
    }

    /// First index whose key is `> key`; the child a descent follows.
    pub fn child_index(&self, key: &K) -> usize {
        self.keys.partition_point(|probe| probe <= key)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.keys.binary_search(key).is_ok()
    }

    /// Shift-and-place insert keeping ascending order.
    pub(crate) fn insert_sorted(&mut self, key: K) {
        let index = self.scan_position(&key);
        self.keys.insert(index, key);
    }

    /// Remove `key` if present.
    pub(crate) fn remove_key(&mut self, key: &K) -> Option<K> {
        match self.keys.binary_search(key) {
            Ok(index) => Some(self.keys.remove(index)),
            Err(_) => None,
        }
    }
}

impl<K: Clone> Node<K> {
    /// B+ leaf split: keys from position `t - 1` onward move to the new right
    /// leaf, whose first key is copied (not moved) and returned as the guide.
    pub(crate) fn split_leaf_copy_up(&mut self, degree: usize) -> (K, Node<K>) {
        let right_keys = self.keys.split_off(degree - 1);
        let guide = right_keys[0].clone();
        let right = Node {
            leaf: true,
            keys: right_keys,
            children: Vec::new(),
            next: self.next,
            parent: self.parent,
        };
        (guide, right)
    }
}

fn link(id: NodeId) -> Option<NodeId> {
    if id == NULL_NODE {
        None
    } else {
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf_with(keys: &[i64]) -> Node<i64> {
        Node {
            keys: keys.to_vec(),
            ..Node::new_leaf()
        }
    }

    #[test]
    fn test_scan_and_child_index_differ_on_exact_match() {
        let node = leaf_with(&[10, 20, 30]);
        assert_eq!(node.scan_position(&20), 1);
        assert_eq!(node.child_index(&20), 2);
        assert_eq!(node.scan_position(&5), 0);
        assert_eq!(node.child_index(&35), 3);
    }

    #[test]
    fn test_occupancy_checks_for_degree_three() {
        let full = leaf_with(&[1, 2, 3, 4, 5]);
        assert!(full.is_full(3));
        assert!(full.can_lend(3));

        let minimal = leaf_with(&[1, 2]);
        assert!(!minimal.is_underfull(3));
        assert!(!minimal.can_lend(3));
        assert!(leaf_with(&[1]).is_underfull(3));
    }

    #[test]
    fn test_split_at_median_moves_median_out() {
        let mut node = Node {
            leaf: false,
            keys: vec![1, 2, 3, 4, 5],
            children: vec![10, 11, 12, 13, 14, 15],
            next: NULL_NODE,
            parent: 7,
        };
        let (median, right) = node.split_at_median(3);
        assert_eq!(median, 3);
        assert_eq!(node.keys, vec![1, 2]);
        assert_eq!(node.children, vec![10, 11, 12]);
        assert_eq!(right.keys, vec![4, 5]);
        assert_eq!(right.children, vec![13, 14, 15]);
        assert_eq!(right.parent, 7);
    }

    #[test]
    fn test_leaf_split_copies_guide_and_inherits_next() {
        let mut leaf = leaf_with(&[1, 2, 3, 4, 5]);
        leaf.next = 9;
        let (guide, right) = leaf.split_leaf_copy_up(3);
        assert_eq!(guide, 3);
        assert_eq!(leaf.keys, vec![1, 2]);
        assert_eq!(right.keys, vec![3, 4, 5]);
        assert_eq!(right.next, 9);
    }

    #[test]
    fn test_insert_sorted_and_remove_key() {
        let mut leaf = leaf_with(&[2, 8]);
        leaf.insert_sorted(5);
        assert_eq!(leaf.keys(), &[2, 5, 8]);
        assert_eq!(leaf.remove_key(&2), Some(2));
        assert_eq!(leaf.remove_key(&2), None);
        assert_eq!(leaf.keys(), &[5, 8]);
    }
}
