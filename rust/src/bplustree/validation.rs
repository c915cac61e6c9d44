//! Invariant checking for the B+ tree.

use std::fmt::Display;

use crate::error::{TreeError, TreeResult};
use crate::tree_structure::subtree_min;
use crate::types::{BPlusTree, NodeId, NULL_NODE};

impl<K: Ord + Clone + Display> BPlusTree<K> {
    /// Returns true if all invariants hold.
    pub fn check_invariants(&self) -> bool {
        self.check_invariants_detailed().is_ok()
    }

    /// Check invariants with detailed error reporting.
    ///
    /// On top of the structural checks shared with the B-Tree this verifies
    /// that each guide equals the minimum of the subtree to its right, that
    /// parent links point back up, and that the leaf chain visits exactly the
    /// leaves in key order.
    pub fn check_invariants_detailed(&self) -> Result<(), String> {
        if self.nodes[self.root].parent != NULL_NODE {
            return Err(format!("root {} has a parent link", self.root));
        }

        let mut leaves = Vec::new();
        let mut leaf_depth = None;
        self.check_node(self.root, None, None, 0, &mut leaf_depth, &mut leaves)?;
        self.check_leaf_chain(&leaves)?;

        let reachable = self.node_count();
        let allocated = self.nodes.len();
        if reachable != allocated {
            return Err(format!(
                "{} nodes reachable from the root but {} allocated",
                reachable, allocated
            ));
        }
        Ok(())
    }

    fn check_node(
        &self,
        id: NodeId,
        lower: Option<&K>,
        upper: Option<&K>,
        depth: usize,
        leaf_depth: &mut Option<usize>,
        leaves: &mut Vec<NodeId>,
    ) -> Result<(), String> {
        let node = self
            .nodes
            .get(id)
            .ok_or_else(|| format!("node {} is referenced but not allocated", id))?;

        if node.keys.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(format!("node {} keys are not strictly ascending", id));
        }
        if node.keys.len() > self.max_keys() {
            return Err(format!("node {} holds {} keys", id, node.keys.len()));
        }
        if id != self.root && node.keys.len() < self.min_keys() {
            return Err(format!("non-root node {} is underfull", id));
        }
        // a guide equals the smallest key on its right, so the lower bound is inclusive
        if let (Some(lower), Some(first)) = (lower, node.keys.first()) {
            if first < lower {
                return Err(format!("node {} key {} is below {}", id, first, lower));
            }
        }
        if let (Some(upper), Some(last)) = (upper, node.keys.last()) {
            if last >= upper {
                return Err(format!("node {} key {} is not below {}", id, last, upper));
            }
        }

        if node.leaf {
            if !node.children.is_empty() {
                return Err(format!("leaf {} has children", id));
            }
            let expected = *leaf_depth.get_or_insert(depth);
            if expected != depth {
                return Err(format!(
                    "leaf {} at depth {} but other leaves at {}",
                    id, depth, expected
                ));
            }
            leaves.push(id);
            return Ok(());
        }

        if node.children.len() != node.keys.len() + 1 {
            return Err(format!(
                "internal node {} has {} keys and {} children",
                id,
                node.keys.len(),
                node.children.len()
            ));
        }
        if node.next != NULL_NODE {
            return Err(format!("internal node {} has a next link", id));
        }
        for (i, &child) in node.children.iter().enumerate() {
            let child_node = self
                .nodes
                .get(child)
                .ok_or_else(|| format!("node {} is referenced but not allocated", child))?;
            if child_node.parent != id {
                return Err(format!(
                    "node {} has parent link {} but is a child of {}",
                    child, child_node.parent, id
                ));
            }
            if i > 0 {
                let guide = &node.keys[i - 1];
                match subtree_min(&self.nodes, child) {
                    Some(minimum) if minimum == *guide => {}
                    Some(minimum) => {
                        return Err(format!(
                            "guide {} in node {} but subtree {} starts at {}",
                            guide, id, child, minimum
                        ))
                    }
                    None => return Err(format!("subtree {} under guide {} is empty", child, guide)),
                }
            }
            let child_lower = if i == 0 { lower } else { node.keys.get(i - 1) };
            let child_upper = node.keys.get(i).or(upper);
            self.check_node(child, child_lower, child_upper, depth + 1, leaf_depth, leaves)?;
        }
        Ok(())
    }

    /// Following `next` from the first leaf must give `leaves` exactly, with
    /// keys ascending across leaf boundaries.
    fn check_leaf_chain(&self, leaves: &[NodeId]) -> Result<(), String> {
        let mut chained = Vec::with_capacity(leaves.len());
        let mut current = leaves.first().copied().unwrap_or(NULL_NODE);
        while current != NULL_NODE {
            if chained.len() > leaves.len() {
                return Err("leaf chain does not terminate".to_string());
            }
            chained.push(current);
            current = self
                .nodes
                .get(current)
                .ok_or_else(|| format!("leaf chain reaches unallocated node {}", current))?
                .next;
        }
        if chained != leaves {
            return Err(format!(
                "leaf chain {:?} does not match in-order leaves {:?}",
                chained, leaves
            ));
        }

        let mut previous: Option<&K> = None;
        for key in leaves.iter().flat_map(|&id| self.nodes[id].keys.iter()) {
            if previous.is_some_and(|previous| previous >= key) {
                return Err(format!("leaf chain is out of order at {}", key));
            }
            previous = Some(key);
        }
        Ok(())
    }

    /// Like `check_invariants_detailed`, but logs the violation and reports it
    /// as a [`TreeError::DataIntegrityError`].
    pub fn validate(&self) -> TreeResult<()> {
        self.check_invariants_detailed().map_err(|violation| {
            tracing::warn!(%violation, "B+ tree invariant violated");
            TreeError::data_integrity("B+ tree", &violation)
        })
    }
}
