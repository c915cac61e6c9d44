//! Construction and initialization logic for both engines.
//!
//! Degree validation, the initial empty root leaf, and the `clear` reset live
//! here.

use crate::arena::NodeArena;
use crate::error::{InitResult, TreeError};
use crate::types::{BPlusTree, BTree, Node, NodeId, DEFAULT_DEGREE, MIN_DEGREE};

/// Validate `degree` and build an arena holding a single empty root leaf.
fn empty_tree<K>(degree: usize) -> InitResult<(NodeArena<Node<K>>, NodeId)> {
    if degree < MIN_DEGREE {
        return Err(TreeError::invalid_degree(degree, MIN_DEGREE));
    }
    let mut nodes = NodeArena::new();
    let root = nodes.allocate(Node::new_leaf());
    Ok((nodes, root))
}

/// Free every node and allocate a fresh empty root. Ids keep increasing.
fn reset<K>(nodes: &mut NodeArena<Node<K>>) -> NodeId {
    let live: Vec<NodeId> = nodes.allocated_ids().collect();
    for id in live {
        nodes.deallocate(id);
    }
    nodes.allocate(Node::new_leaf())
}

impl<K> BTree<K> {
    /// Create an empty B-Tree with minimum degree `degree`.
    ///
    /// # Examples
    ///
    /// ```
    /// use multiway_tree::BTree;
    ///
    /// assert!(BTree::<i64>::new(3).is_ok());
    /// assert!(BTree::<i64>::new(1).is_err());
    /// ```
    pub fn new(degree: usize) -> InitResult<Self> {
        let (nodes, root) = empty_tree(degree)?;
        Ok(Self {
            degree,
            root,
            nodes,
        })
    }

    /// Create a B-Tree with [`DEFAULT_DEGREE`].
    pub fn with_default_degree() -> Self {
        let mut nodes = NodeArena::new();
        let root = nodes.allocate(Node::new_leaf());
        Self {
            degree: DEFAULT_DEGREE,
            root,
            nodes,
        }
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    /// `2t - 1`
    pub fn max_keys(&self) -> usize {
        2 * self.degree - 1
    }

    /// `t - 1`, binding every node except the root.
    pub fn min_keys(&self) -> usize {
        self.degree - 1
    }

    /// Remove every key.
    pub fn clear(&mut self) {
        self.root = reset(&mut self.nodes);
    }
}

impl<K> BPlusTree<K> {
    /// Create an empty B+ tree with minimum degree `degree`.
    ///
    /// # Examples
    ///
    /// ```
    /// use multiway_tree::BPlusTree;
    ///
    /// let err = BPlusTree::<i64>::new(0).unwrap_err();
    /// assert!(err.is_degree_error());
    /// ```
    pub fn new(degree: usize) -> InitResult<Self> {
        let (nodes, root) = empty_tree(degree)?;
        Ok(Self {
            degree,
            root,
            nodes,
        })
    }

    /// Create a B+ tree with [`DEFAULT_DEGREE`].
    pub fn with_default_degree() -> Self {
        let mut nodes = NodeArena::new();
        let root = nodes.allocate(Node::new_leaf());
        Self {
            degree: DEFAULT_DEGREE,
            root,
            nodes,
        }
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    /// `2t - 1`
    pub fn max_keys(&self) -> usize {
        2 * self.degree - 1
    }

    /// `t - 1`, binding every node except the root.
    pub fn min_keys(&self) -> usize {
        self.degree - 1
    }

    /// Remove every key.
    pub fn clear(&mut self) {
        self.root = reset(&mut self.nodes);
    }
}
