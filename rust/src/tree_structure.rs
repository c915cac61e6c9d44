//! Tree structure queries for both engines.
//!
//! Size, height, node counting and ordered enumeration. None of these mutate.

use crate::arena::NodeArena;
use crate::types::{BPlusTree, BTree, Node, NodeId, NULL_NODE};

// ============================================================================
// SHARED NAVIGATION HELPERS
// ============================================================================

pub(crate) fn leftmost_leaf<K>(nodes: &NodeArena<Node<K>>, mut id: NodeId) -> NodeId {
    while !nodes[id].leaf {
        id = nodes[id].children[0];
    }
    id
}

pub(crate) fn rightmost_leaf<K>(nodes: &NodeArena<Node<K>>, mut id: NodeId) -> NodeId {
    while !nodes[id].leaf {
        id = *nodes[id]
            .children
            .last()
            .unwrap_or_else(|| unreachable!("internal node {} has no children", id));
    }
    id
}

/// Smallest key stored under `id`, if the subtree holds any.
pub(crate) fn subtree_min<K: Clone>(nodes: &NodeArena<Node<K>>, id: NodeId) -> Option<K> {
    nodes[leftmost_leaf(nodes, id)].keys.first().cloned()
}

/// Largest key stored under `id`, if the subtree holds any.
pub(crate) fn subtree_max<K: Clone>(nodes: &NodeArena<Node<K>>, id: NodeId) -> Option<K> {
    nodes[rightmost_leaf(nodes, id)].keys.last().cloned()
}

fn height_from<K>(nodes: &NodeArena<Node<K>>, mut id: NodeId) -> usize {
    let mut height = 1;
    while !nodes[id].leaf {
        id = nodes[id].children[0];
        height += 1;
    }
    height
}

fn count_nodes<K>(nodes: &NodeArena<Node<K>>, id: NodeId) -> usize {
    1 + nodes[id]
        .children
        .iter()
        .map(|&child| count_nodes(nodes, child))
        .sum::<usize>()
}

// ============================================================================
// B-TREE
// ============================================================================

impl<K: Clone> BTree<K> {
    /// Number of keys, counting every level.
    pub fn len(&self) -> usize {
        self.len_recursive(self.root)
    }

    fn len_recursive(&self, id: NodeId) -> usize {
        let node = &self.nodes[id];
        node.keys.len()
            + node
                .children
                .iter()
                .map(|&child| self.len_recursive(child))
                .sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes[self.root].is_empty()
    }

    pub fn height(&self) -> usize {
        height_from(&self.nodes, self.root)
    }

    /// Nodes reachable from the root.
    pub fn node_count(&self) -> usize {
        count_nodes(&self.nodes, self.root)
    }

    pub fn root_id(&self) -> NodeId {
        self.root
    }

    /// In-order enumeration of every key.
    pub fn keys(&self) -> Vec<K> {
        let mut keys = Vec::new();
        self.collect_in_order(self.root, &mut keys);
        keys
    }

    fn collect_in_order(&self, id: NodeId, out: &mut Vec<K>) {
        let node = &self.nodes[id];
        if node.leaf {
            out.extend(node.keys.iter().cloned());
            return;
        }
        for (i, &child) in node.children.iter().enumerate() {
            self.collect_in_order(child, out);
            if let Some(key) = node.keys.get(i) {
                out.push(key.clone());
            }
        }
    }

    /// Smallest key in the tree.
    pub fn first(&self) -> Option<K> {
        subtree_min(&self.nodes, self.root)
    }

    /// Largest key in the tree.
    pub fn last(&self) -> Option<K> {
        subtree_max(&self.nodes, self.root)
    }
}

// ============================================================================
// B+ TREE
// ============================================================================

impl<K: Clone> BPlusTree<K> {
    /// Number of keys stored in leaves; guides are not counted.
    pub fn len(&self) -> usize {
        self.leaf_chain()
            .into_iter()
            .map(|id| self.nodes[id].keys.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        let root = &self.nodes[self.root];
        root.leaf && root.is_empty()
    }

    pub fn height(&self) -> usize {
        height_from(&self.nodes, self.root)
    }

    /// Nodes reachable from the root.
    pub fn node_count(&self) -> usize {
        count_nodes(&self.nodes, self.root)
    }

    pub fn root_id(&self) -> NodeId {
        self.root
    }

    /// The leftmost leaf, where the chain starts.
    pub fn first_leaf_id(&self) -> NodeId {
        leftmost_leaf(&self.nodes, self.root)
    }

    /// Leaf ids in chain order.
    pub fn leaf_chain(&self) -> Vec<NodeId> {
        let mut ids = Vec::new();
        let mut current = self.first_leaf_id();
        while current != NULL_NODE {
            ids.push(current);
            current = self.nodes[current].next;
        }
        ids
    }

    /// Every key, read off the leaf chain.
    pub fn keys(&self) -> Vec<K> {
        self.leaf_chain()
            .into_iter()
            .flat_map(|id| self.nodes[id].keys.iter().cloned())
            .collect()
    }

    pub fn first(&self) -> Option<K> {
        subtree_min(&self.nodes, self.root)
    }

    pub fn last(&self) -> Option<K> {
        subtree_max(&self.nodes, self.root)
    }
}

#[cfg(test)]
mod tests {
    use crate::types::{BPlusTree, BTree};

    #[test]
    fn test_btree_structure_queries() {
        let mut tree: BTree = BTree::new(2).unwrap();
        assert_eq!((tree.len(), tree.height(), tree.node_count()), (0, 1, 1));
        for key in [8, 3, 5, 1, 9, 7] {
            tree.insert(key).unwrap();
        }
        assert_eq!(tree.len(), 6);
        assert_eq!(tree.keys(), vec![1, 3, 5, 7, 8, 9]);
        assert_eq!((tree.first(), tree.last()), (Some(1), Some(9)));
        assert!(tree.height() >= 2);
    }

    #[test]
    fn test_bplus_leaf_chain_covers_every_leaf() {
        let mut tree: BPlusTree = BPlusTree::new(2).unwrap();
        for key in (1..=20).rev() {
            tree.insert(key).unwrap();
        }
        let chain = tree.leaf_chain();
        assert_eq!(chain[0], tree.first_leaf_id());
        assert_eq!(tree.len(), 20);
        assert_eq!(tree.keys(), (1..=20).collect::<Vec<_>>());
        assert!(tree.node_count() > chain.len());
    }
}
