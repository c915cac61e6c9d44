//! Core types and data structures shared by the two engines.
//!
//! This module contains the node shape, the tree structs themselves, and the
//! records returned from public operations.

use std::fmt;

use crate::arena::NodeArena;
use crate::trace::TraceEvent;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Smallest minimum degree an engine accepts.
pub const MIN_DEGREE: usize = 2;

/// Minimum degree used by `with_default_degree`.
pub const DEFAULT_DEGREE: usize = 3;

// ============================================================================
// TYPE DEFINITIONS
// ============================================================================

/// Node ID type for arena-based allocation
pub type NodeId = u32;

/// Sentinel for an absent `next` or `parent` link.
pub const NULL_NODE: NodeId = u32::MAX;

/// Key type used when none is specified.
pub type Key = i64;

// ============================================================================
// CORE DATA STRUCTURES
// ============================================================================

/// Classic B-Tree of minimum degree `t`.
///
/// Every key is stored exactly once, at whatever level it landed, and keys in
/// interior nodes are authoritative. Deleting an interior key substitutes its
/// predecessor or successor.
///
/// # Examples
///
/// ```
/// use multiway_tree::BTree;
///
/// let mut tree: BTree = BTree::new(3).unwrap();
/// for key in [10, 20, 5, 6, 12, 30, 7, 17] {
///     tree.insert(key).unwrap();
/// }
/// tree.delete(&6).unwrap();
///
/// assert!(!tree.search(&6).found);
/// assert!(tree.search(&7).found);
/// assert_eq!(tree.keys(), vec![5, 7, 10, 12, 17, 20, 30]);
/// ```
#[derive(Debug, Clone)]
pub struct BTree<K = Key> {
    /// Minimum degree.
    pub(crate) degree: usize,
    /// The root node of the tree.
    pub(crate) root: NodeId,
    pub(crate) nodes: NodeArena<Node<K>>,
}

/// B+ tree of minimum degree `t`.
///
/// Only leaves hold authoritative keys; interior keys are routing guides equal
/// to the minimum key of the subtree to their right. Leaves are chained left to
/// right through `next`.
///
/// # Examples
///
/// ```
/// use multiway_tree::BPlusTree;
///
/// let mut tree: BPlusTree = BPlusTree::new(3).unwrap();
/// for key in 1..=10 {
///     tree.insert(key).unwrap();
/// }
/// tree.delete(&5).unwrap();
///
/// let chained: Vec<i64> = tree.snapshot().leaf_chain().flat_map(|leaf| leaf.keys.clone()).collect();
/// assert_eq!(chained, vec![1, 2, 3, 4, 6, 7, 8, 9, 10]);
/// ```
#[derive(Debug, Clone)]
pub struct BPlusTree<K = Key> {
    /// Minimum degree.
    pub(crate) degree: usize,
    /// The root node of the tree.
    pub(crate) root: NodeId,
    pub(crate) nodes: NodeArena<Node<K>>,
}

/// Node shape shared by both engines.
///
/// `next` and `parent` are non-owning links and only the B+ tree maintains
/// them; a B-Tree node leaves both at [`NULL_NODE`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node<K> {
    pub(crate) leaf: bool,
    /// Strictly ascending keys.
    pub(crate) keys: Vec<K>,
    /// Child ids, `keys.len() + 1` of them for an internal node.
    pub(crate) children: Vec<NodeId>,
    /// Next leaf in key order.
    pub(crate) next: NodeId,
    pub(crate) parent: NodeId,
}

impl<K> Default for Node<K> {
    fn default() -> Self {
        Self::new_leaf()
    }
}

// ============================================================================
// OPERATION RECORDS
// ============================================================================

/// One hop of a search: the node visited and the index the scan stopped at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathStep {
    pub node: NodeId,
    pub child_index: usize,
}

/// Result of a search on either engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome<K> {
    pub found: bool,
    /// Root first, terminal node last.
    pub path: Vec<PathStep>,
    /// Terminal leaf of a B+ tree descent; always `None` for a B-Tree.
    pub leaf: Option<NodeId>,
    pub trace: Vec<TraceEvent<K>>,
}

impl<K> SearchOutcome<K> {
    /// Ids of the nodes on the path, for highlighting.
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.path.iter().map(|step| step.node).collect()
    }
}

/// Which mutation an [`Outcome`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Inserted,
    Deleted,
}

/// Successful insert or delete, with the decisions taken along the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome<K> {
    pub key: K,
    pub action: Action,
    pub trace: Vec<TraceEvent<K>>,
}

impl<K: fmt::Display> Outcome<K> {
    /// Headline without the trace, e.g. `Key 5 inserted.`
    pub fn message(&self) -> String {
        match self.action {
            Action::Inserted => format!("Key {} inserted.", self.key),
            Action::Deleted => format!("Key {} deleted.", self.key),
        }
    }
}

impl<K: fmt::Display> fmt::Display for Outcome<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())?;
        for event in &self.trace {
            write!(f, "\n{}", event)?;
        }
        Ok(())
    }
}
