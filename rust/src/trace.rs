//! Decision trace produced by every public operation.
//!
//! A trace is a passive narration of what an operation did: nodes visited,
//! splits, borrows, merges. It is built fresh for each call, handed back inside
//! the operation's result, and never consulted by the algorithms themselves.

use std::fmt;

use crate::types::NodeId;

/// How a split sent a key to the parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitKind {
    /// B-Tree split: the median leaves the child.
    Promoted,
    /// B+ leaf split: the right half's first key is copied up as a guide.
    CopiedUp,
    /// B+ internal split: the median guide moves up.
    MovedUp,
}

/// One recorded decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEvent<K> {
    Visit { node: NodeId, child_index: usize },
    Found { key: K, node: NodeId },
    NotFound { key: K, leaf: NodeId },
    RootFull { root: NodeId },
    ChildFull { parent: NodeId, child: NodeId },
    Split {
        kind: SplitKind,
        node: NodeId,
        new_node: NodeId,
        parent: NodeId,
        key: K,
    },
    Descend { node: NodeId, child_index: usize },
    /// Insert descent re-aimed at the right half of a fresh split.
    DescendRightOfSplit { key: K, median: K, child_index: usize },
    LeafInsert { key: K, node: NodeId },
    DeleteStart { key: K },
    LeafRemove { key: K, node: NodeId },
    Predecessor { key: K, replacement: K },
    Successor { key: K, replacement: K },
    /// Both children around an interior key are minimal; they are merged with it.
    MergeAroundKey { key: K, node: NodeId },
    /// A child about to be descended into is topped up first.
    Fill { node: NodeId, parent: NodeId },
    Underflow { node: NodeId },
    BorrowLeft { from: NodeId, to: NodeId },
    BorrowRight { from: NodeId, to: NodeId },
    Merge {
        into: NodeId,
        from: NodeId,
        parent: NodeId,
        separator: K,
    },
    GuideUpdate { parent: NodeId, old: K, new: K },
    RootCollapse { old_root: NodeId, new_root: NodeId },
}

impl<K: fmt::Display> fmt::Display for TraceEvent<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceEvent::Visit { node, child_index } => {
                write!(f, "Node {}, descending to child {}.", node, child_index)
            }
            TraceEvent::Found { key, node } => write!(f, "Key {} found in node {}.", key, node),
            TraceEvent::NotFound { key, leaf } => {
                write!(f, "Reached leaf {}, key {} not found.", leaf, key)
            }
            TraceEvent::RootFull { root } => {
                write!(f, "Root {} is full. Splitting the root.", root)
            }
            TraceEvent::ChildFull { parent, child } => {
                write!(f, "Child {} of node {} is full. Splitting.", child, parent)
            }
            TraceEvent::Split {
                kind,
                node,
                new_node,
                parent,
                key,
            } => {
                let (label, verb) = match kind {
                    SplitKind::Promoted => ("Split", "promoted to"),
                    SplitKind::CopiedUp => ("Split (leaf)", "COPIED to"),
                    SplitKind::MovedUp => ("Split (internal)", "MOVED to"),
                };
                write!(
                    f,
                    "{}: node {} divided. Key {} {} {}. New node {} created.",
                    label, node, key, verb, parent, new_node
                )
            }
            TraceEvent::Descend { node, child_index } => {
                write!(f, "Descending from node {} to child {}.", node, child_index)
            }
            TraceEvent::DescendRightOfSplit {
                key,
                median,
                child_index,
            } => write!(
                f,
                "Key {} > median {}, descending to new child {}.",
                key, median, child_index
            ),
            TraceEvent::LeafInsert { key, node } => {
                write!(f, "Inserting key {} into leaf {}.", key, node)
            }
            TraceEvent::DeleteStart { key } => write!(f, "Starting removal of key {}...", key),
            TraceEvent::LeafRemove { key, node } => {
                write!(f, "Key {} removed from node {}.", key, node)
            }
            TraceEvent::Predecessor { key, replacement } => {
                write!(f, "Replacing {} with predecessor {}.", key, replacement)
            }
            TraceEvent::Successor { key, replacement } => {
                write!(f, "Replacing {} with successor {}.", key, replacement)
            }
            TraceEvent::MergeAroundKey { key, node } => write!(
                f,
                "Children around {} in node {} hold the minimum. Merging.",
                key, node
            ),
            TraceEvent::Fill { node, parent } => write!(
                f,
                "Node {} (child of {}) is at the minimum. Topping it up before descending.",
                node, parent
            ),
            TraceEvent::Underflow { node } => {
                write!(f, "Node {} is in underflow. Rebalancing.", node)
            }
            TraceEvent::BorrowLeft { from, to } => {
                write!(f, "-> Borrow (rotation) from left sibling {} into {}.", from, to)
            }
            TraceEvent::BorrowRight { from, to } => {
                write!(f, "-> Borrow (rotation) from right sibling {} into {}.", from, to)
            }
            TraceEvent::Merge {
                into,
                from,
                parent,
                separator,
            } => write!(
                f,
                "-> Merge of node {} into {}. Separator {} left {}.",
                from, into, separator, parent
            ),
            TraceEvent::GuideUpdate { parent, old, new } => {
                write!(f, "Updating guide in parent {}: {} -> {}.", parent, old, new)
            }
            TraceEvent::RootCollapse { old_root, new_root } => {
                write!(f, "Root {} became empty. New root is {}.", old_root, new_root)
            }
        }
    }
}

/// Collector for one operation's trace.
#[derive(Debug)]
pub struct TraceRecorder<K> {
    operation: &'static str,
    events: Vec<TraceEvent<K>>,
}

impl<K: fmt::Display> TraceRecorder<K> {
    pub fn new(operation: &'static str) -> Self {
        Self {
            operation,
            events: Vec::new(),
        }
    }

    /// Append an event and mirror it to the `tracing` subscriber.
    pub fn record(&mut self, event: TraceEvent<K>) {
        tracing::debug!(operation = self.operation, step = self.events.len(), "{}", event);
        self.events.push(event);
    }

    pub fn events(&self) -> &[TraceEvent<K>] {
        &self.events
    }

    pub fn finish(self) -> Vec<TraceEvent<K>> {
        self.events
    }
}
