//! Frozen, read-only views of a tree for display collaborators.
//!
//! A snapshot copies out node ids, keys, leaf flags, child ids and leaf-chain
//! links. Nothing in it refers back into the engine, so holding one never
//! blocks further mutation.

use std::collections::HashSet;
use std::fmt;

use crate::arena::NodeArena;
use crate::types::{Node, NodeId, PathStep};

/// How a display layer should tint a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeStatus {
    Normal,
    /// On the highlighted search path.
    Highlighted,
    /// Holds `2t - 1` keys.
    Full,
    /// Non-root node below `t - 1` keys. Never seen between operations.
    Underflow,
}

/// One node as seen from outside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeView<K> {
    pub id: NodeId,
    pub keys: Vec<K>,
    pub is_leaf: bool,
    pub children: Vec<NodeId>,
    /// Next leaf in chain order; B+ tree leaves only.
    pub next: Option<NodeId>,
}

/// Every node reachable from the root, in pre-order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeSnapshot<K> {
    pub degree: usize,
    pub root: NodeId,
    pub nodes: Vec<NodeView<K>>,
    pub highlighted: HashSet<NodeId>,
}

impl<K: Clone> TreeSnapshot<K> {
    pub(crate) fn capture(degree: usize, root: NodeId, arena: &NodeArena<Node<K>>) -> Self {
        let mut nodes = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let node = &arena[id];
            stack.extend(node.children.iter().rev());
            nodes.push(NodeView {
                id,
                keys: node.keys.clone(),
                is_leaf: node.leaf,
                children: node.children.clone(),
                next: node.next_leaf(),
            });
        }
        Self {
            degree,
            root,
            nodes,
            highlighted: HashSet::new(),
        }
    }
}

impl<K> TreeSnapshot<K> {
    /// Mark the nodes of a search path.
    pub fn with_highlight(mut self, path: &[PathStep]) -> Self {
        self.highlighted = path.iter().map(|step| step.node).collect();
        self
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeView<K>> {
        self.nodes.iter().find(|view| view.id == id)
    }

    pub fn root_view(&self) -> Option<&NodeView<K>> {
        self.node(self.root)
    }

    /// The tree holds no keys: the root is a childless empty leaf.
    pub fn is_empty(&self) -> bool {
        self.root_view()
            .map(|root| root.is_leaf && root.keys.is_empty())
            .unwrap_or(true)
    }

    pub fn status(&self, view: &NodeView<K>) -> NodeStatus {
        if self.highlighted.contains(&view.id) {
            NodeStatus::Highlighted
        } else if view.id != self.root && view.keys.len() < self.degree - 1 {
            NodeStatus::Underflow
        } else if view.keys.len() >= 2 * self.degree - 1 {
            NodeStatus::Full
        } else {
            NodeStatus::Normal
        }
    }

    /// Leaves in chain order, starting from the leftmost leaf and following
    /// `next`. Yields nothing for a B-Tree beyond its leftmost leaf.
    pub fn leaf_chain(&self) -> impl Iterator<Item = &NodeView<K>> + '_ {
        let mut current = self.leftmost_leaf();
        std::iter::from_fn(move || {
            let view = current?;
            current = view.next.and_then(|next| self.node(next));
            Some(view)
        })
    }

    fn leftmost_leaf(&self) -> Option<&NodeView<K>> {
        let mut view = self.root_view()?;
        while !view.is_leaf {
            view = self.node(*view.children.first()?)?;
        }
        Some(view)
    }
}

impl<K: fmt::Display> TreeSnapshot<K> {
    /// One line per step: `node 3 [1,2] -> child 0`.
    pub fn describe_path(&self, path: &[PathStep]) -> Vec<String> {
        path.iter()
            .map(|step| {
                let keys = self
                    .node(step.node)
                    .map(|view| join_keys(&view.keys, ","))
                    .unwrap_or_default();
                format!("node {} [{}] -> child {}", step.node, keys, step.child_index)
            })
            .collect()
    }

    fn write_subtree(&self, f: &mut fmt::Formatter<'_>, id: NodeId, depth: usize) -> fmt::Result {
        let Some(view) = self.node(id) else {
            return writeln!(f, "{}[{}] <missing>", "  ".repeat(depth), id);
        };
        let marker = match self.status(view) {
            NodeStatus::Highlighted => " *",
            NodeStatus::Full => " (full)",
            NodeStatus::Underflow => " (underflow)",
            NodeStatus::Normal => "",
        };
        writeln!(
            f,
            "{}[{}] <{}>{}",
            "  ".repeat(depth),
            id,
            join_keys(&view.keys, " | "),
            marker
        )?;
        for &child in &view.children {
            self.write_subtree(f, child, depth + 1)?;
        }
        Ok(())
    }
}

impl<K: fmt::Display> fmt::Display for TreeSnapshot<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_subtree(f, self.root, 0)?;
        let chain: Vec<String> = self.leaf_chain().map(|leaf| leaf.id.to_string()).collect();
        if chain.len() > 1 {
            write!(f, "leaves: {}", chain.join(" -> "))?;
        }
        Ok(())
    }
}

fn join_keys<K: fmt::Display>(keys: &[K], separator: &str) -> String {
    keys.iter()
        .map(|key| key.to_string())
        .collect::<Vec<_>>()
        .join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BPlusTree, BTree};

    #[test]
    fn test_snapshot_lists_nodes_in_preorder() {
        let mut tree: BTree = BTree::new(2).unwrap();
        for key in 1..=4 {
            tree.insert(key).unwrap();
        }
        let snapshot = tree.snapshot();
        let root = snapshot.root_view().unwrap();
        assert_eq!(snapshot.nodes[0].id, root.id);
        assert_eq!(root.keys, vec![2]);
        assert_eq!(snapshot.nodes.len(), 3);
        assert!(snapshot.nodes.iter().all(|view| view.next.is_none()));
    }

    #[test]
    fn test_empty_tree_snapshot() {
        let tree: BPlusTree = BPlusTree::new(3).unwrap();
        let snapshot = tree.snapshot();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.leaf_chain().count(), 1);
    }

    #[test]
    fn test_highlight_and_status() {
        let mut tree: BPlusTree = BPlusTree::new(2).unwrap();
        for key in [5, 1, 9] {
            tree.insert(key).unwrap();
        }
        let full = tree.snapshot();
        assert_eq!(full.status(full.root_view().unwrap()), NodeStatus::Full);

        tree.insert(7).unwrap();
        let search = tree.search(&7);
        let snapshot = tree.snapshot().with_highlight(&search.path);
        let leaf = snapshot.node(search.leaf.unwrap()).unwrap();
        assert_eq!(snapshot.status(leaf), NodeStatus::Highlighted);
        assert_eq!(snapshot.describe_path(&search.path).len(), search.path.len());
    }

    #[test]
    fn test_display_prints_tree_and_chain() {
        let mut tree: BPlusTree = BPlusTree::new(2).unwrap();
        for key in 1..=4 {
            tree.insert(key).unwrap();
        }
        let text = tree.snapshot().to_string();
        assert!(text.starts_with(&format!("[{}] <2>", tree.root_id())));
        assert!(text.contains("<2 | 3 | 4> (full)"));
        assert!(text.contains("leaves: "));
    }
}
