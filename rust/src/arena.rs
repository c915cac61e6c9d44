//! Arena storage for tree nodes.
//!
//! Nodes are addressed by [`NodeId`], which is simply the slot index. Ids are
//! handed out in increasing order and never reused, so an id stays a stable
//! display identity for as long as the engine lives. Freed slots keep an empty
//! default value and are marked unallocated.

use std::convert::TryFrom;
use std::ops::{Index, IndexMut};

use crate::types::{NodeId, NULL_NODE};

/// Statistics for a node arena
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArenaStats {
    pub allocated_count: usize,
    pub freed_count: usize,
    pub next_id: NodeId,
}

/// Append-only arena with an allocation mask.
#[derive(Debug, Clone)]
pub struct NodeArena<T> {
    storage: Vec<T>,
    allocated_mask: Vec<bool>,
}

impl<T> NodeArena<T> {
    pub fn new() -> Self {
        Self {
            storage: Vec::new(),
            allocated_mask: Vec::new(),
        }
    }

    /// Allocate a new item and return its id.
    ///
    /// # Panics
    ///
    /// Panics if the arena has handed out `u32::MAX` ids.
    #[inline]
    pub fn allocate(&mut self, item: T) -> NodeId {
        let index = self.storage.len();
        let id = match NodeId::try_from(index) {
            Ok(id) if id != NULL_NODE => id,
            _ => panic!("node arena exhausted after {} allocations", index),
        };
        self.storage.push(item);
        self.allocated_mask.push(true);
        id
    }

    /// Free a slot, returning the node it held.
    #[inline]
    pub fn deallocate(&mut self, id: NodeId) -> Option<T>
    where
        T: Default,
    {
        let index = self.live_index(id)?;
        self.allocated_mask[index] = false;
        Some(std::mem::take(&mut self.storage[index]))
    }

    /// Free a slot that must be live, returning its node.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not allocated; callers only free nodes they just
    /// unlinked from the tree.
    pub fn take(&mut self, id: NodeId) -> T
    where
        T: Default,
    {
        match self.deallocate(id) {
            Some(item) => item,
            None => panic!("node {} is not allocated", id),
        }
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.live_index(id).map(|index| &self.storage[index])
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.live_index(id).map(move |index| &mut self.storage[index])
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.live_index(id).is_some()
    }

    /// Ids of every allocated slot, ascending.
    pub fn allocated_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.allocated_mask
            .iter()
            .enumerate()
            .filter(|(_, &allocated)| allocated)
            .map(|(index, _)| index as NodeId)
    }

    /// Number of allocated items
    pub fn len(&self) -> usize {
        self.allocated_mask.iter().filter(|&&allocated| allocated).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The id the next allocation will receive.
    pub fn next_id(&self) -> NodeId {
        self.storage.len() as NodeId
    }

    pub fn stats(&self) -> ArenaStats {
        let allocated_count = self.len();
        ArenaStats {
            allocated_count,
            freed_count: self.storage.len() - allocated_count,
            next_id: self.next_id(),
        }
    }

    fn live_index(&self, id: NodeId) -> Option<usize> {
        if id == NULL_NODE {
            return None;
        }
        let index = usize::try_from(id).ok()?;
        if self.allocated_mask.get(index).copied().unwrap_or(false) {
            Some(index)
        } else {
            None
        }
    }
}

impl<T> Default for NodeArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<NodeId> for NodeArena<T> {
    type Output = T;

    fn index(&self, id: NodeId) -> &T {
        match self.get(id) {
            Some(item) => item,
            None => panic!("node {} is not allocated", id),
        }
    }
}

impl<T> IndexMut<NodeId> for NodeArena<T> {
    fn index_mut(&mut self, id: NodeId) -> &mut T {
        match self.live_index(id) {
            Some(index) => &mut self.storage[index],
            None => panic!("node {} is not allocated", id),
        }
    }
}
