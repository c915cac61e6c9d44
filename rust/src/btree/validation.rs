//! Invariant checking for the B-Tree.

use std::fmt::Display;

use crate::error::{TreeError, TreeResult};
use crate::types::{BTree, NodeId};

impl<K: Ord + Clone + Display> BTree<K> {
    /// Returns true if all invariants hold.
    pub fn check_invariants(&self) -> bool {
        self.check_invariants_detailed().is_ok()
    }

    /// Check invariants with detailed error reporting.
    ///
    /// Verifies ordering, occupancy bounds, child counts, key ranges per
    /// subtree, uniform leaf depth, and that the arena holds exactly the nodes
    /// reachable from the root.
    pub fn check_invariants_detailed(&self) -> Result<(), String> {
        let mut reachable = 0;
        let mut leaf_depth = None;
        self.check_node(self.root, None, None, 0, &mut leaf_depth, &mut reachable)?;

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
        reachable: &mut usize,
    ) -> Result<(), String> {
        let node = self
            .nodes
            .get(id)
            .ok_or_else(|| format!("node {} is referenced but not allocated", id))?;
        *reachable += 1;

        if node.keys.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(format!("node {} keys are not strictly ascending", id));
        }
        if node.keys.len() > self.max_keys() {
            return Err(format!("node {} holds {} keys", id, node.keys.len()));
        }
        if id != self.root && node.keys.len() < self.min_keys() {
            return Err(format!("non-root node {} is underfull", id));
        }
        if let (Some(lower), Some(first)) = (lower, node.keys.first()) {
            if first <= lower {
                return Err(format!("node {} key {} is not above {}", id, first, lower));
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
        for (i, &child) in node.children.iter().enumerate() {
            let child_lower = if i == 0 { lower } else { node.keys.get(i - 1) };
            let child_upper = node.keys.get(i).or(upper);
            self.check_node(child, child_lower, child_upper, depth + 1, leaf_depth, reachable)?;
        }
        Ok(())
    }

    /// Like `check_invariants_detailed`, but logs the violation and reports it
    /// as a [`TreeError::DataIntegrityError`].
    pub fn validate(&self) -> TreeResult<()> {
        self.check_invariants_detailed().map_err(|violation| {
            tracing::warn!(%violation, "B-Tree invariant violated");
            TreeError::data_integrity("B-Tree", &violation)
        })
    }
}
