//! B+ tree engine: leaves hold the keys, interior nodes only route.

mod delete_operations;
mod get_operations;
mod insert_operations;
mod validation;

use std::fmt::Display;

use crate::engine::TreeEngine;
use crate::error::{ModifyResult, TreeResult};
use crate::snapshot::TreeSnapshot;
use crate::types::{BPlusTree, Outcome, SearchOutcome};

impl<K: Clone> BPlusTree<K> {
    /// Frozen view of every node reachable from the root.
    pub fn snapshot(&self) -> TreeSnapshot<K> {
        TreeSnapshot::capture(self.degree, self.root, &self.nodes)
    }
}

impl<K: Ord + Clone + Display> TreeEngine<K> for BPlusTree<K> {
    fn degree(&self) -> usize {
        self.degree
    }

    fn search(&self, key: &K) -> SearchOutcome<K> {
        BPlusTree::search(self, key)
    }

    fn insert(&mut self, key: K) -> ModifyResult<Outcome<K>> {
        BPlusTree::insert(self, key)
    }

    fn delete(&mut self, key: &K) -> ModifyResult<Outcome<K>> {
        BPlusTree::delete(self, key)
    }

    fn snapshot(&self) -> TreeSnapshot<K> {
        BPlusTree::snapshot(self)
    }

    fn len(&self) -> usize {
        BPlusTree::len(self)
    }

    fn keys(&self) -> Vec<K> {
        BPlusTree::keys(self)
    }

    fn height(&self) -> usize {
        BPlusTree::height(self)
    }

    fn validate(&self) -> TreeResult<()> {
        BPlusTree::validate(self)
    }
}
