//! The call surface both engines share.

use std::fmt::Display;
use std::str::FromStr;

use crate::error::{parse_key, ModifyResult, TreeResult};
use crate::snapshot::TreeSnapshot;
use crate::types::{Outcome, SearchOutcome};

/// Search, insert and delete over a multiway search tree of minimum degree `t`.
///
/// Every mutating call is atomic from the caller's side: on `Err` the tree is
/// untouched, on `Ok` every structural invariant holds again.
pub trait TreeEngine<K: Ord + Clone + Display> {
    /// Minimum degree `t`.
    fn degree(&self) -> usize;

    /// Exact-match lookup, reporting the descent path.
    fn search(&self, key: &K) -> SearchOutcome<K>;

    /// Insert `key`, failing with `DuplicateKey` if it is already present.
    fn insert(&mut self, key: K) -> ModifyResult<Outcome<K>>;

    /// Delete `key`, failing with `KeyNotFound` if it is absent.
    fn delete(&mut self, key: &K) -> ModifyResult<Outcome<K>>;

    /// Frozen read-only view of every reachable node.
    fn snapshot(&self) -> TreeSnapshot<K>;

    /// Number of stored keys.
    fn len(&self) -> usize;

    /// All stored keys, ascending.
    fn keys(&self) -> Vec<K>;

    /// Number of levels; an empty tree still has its root leaf.
    fn height(&self) -> usize;

    /// Full structural check, reporting the first violation found as a
    /// `DataIntegrityError`.
    fn validate(&self) -> TreeResult<()>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains(&self, key: &K) -> bool {
        self.search(key).found
    }

    /// Parse `input` and insert it. Unparseable input is rejected before the
    /// tree is inspected.
    fn insert_str(&mut self, input: &str) -> ModifyResult<Outcome<K>>
    where
        K: FromStr,
    {
        let key = parse_key(input)?;
        self.insert(key)
    }

    /// Parse `input` and delete it.
    fn delete_str(&mut self, input: &str) -> ModifyResult<Outcome<K>>
    where
        K: FromStr,
    {
        let key: K = parse_key(input)?;
        self.delete(&key)
    }

    /// Parse `input` and search for it.
    fn search_str(&self, input: &str) -> TreeResult<SearchOutcome<K>>
    where
        K: FromStr,
    {
        let key: K = parse_key(input)?;
        Ok(self.search(&key))
    }
}
