//! B-Tree engine: keys are authoritative at every level.

mod delete_operations;
mod get_operations;
mod insert_operations;
mod validation;

use std::fmt::Display;

use crate::engine::TreeEngine;
use crate::error::{ModifyResult, TreeResult};
use crate::snapshot::TreeSnapshot;
use crate::types::{BTree, Outcome, SearchOutcome};

impl<K: Clone> BTree<K> {
    /// Frozen view of every node reachable from the root.
    pub fn snapshot(&self) -> TreeSnapshot<K> {
        TreeSnapshot::capture(self.degree, self.root, &self.nodes)
    }
}

impl<K: Ord + Clone + Display> TreeEngine<K> for BTree<K> {
    fn degree(&self) -> usize {
        self.degree
    }

    fn search(&self, key: &K) -> SearchOutcome<K> {
        BTree::search(self, key)
    }

    fn insert(&mut self, key: K) -> ModifyResult<Outcome<K>> {
        BTree::insert(self, key)
    }

    fn delete(&mut self, key: &K) -> ModifyResult<Outcome<K>> {
        BTree::delete(self, key)
    }

    fn snapshot(&self) -> TreeSnapshot<K> {
        BTree::snapshot(self)
    }

    fn len(&self) -> usize {
        BTree::len(self)
    }

    fn keys(&self) -> Vec<K> {
        BTree::keys(self)
    }

    fn height(&self) -> usize {
        BTree::height(self)
    }

    fn validate(&self) -> TreeResult<()> {
        BTree::validate(self)
    }
}
