//! B-Tree and B+ tree engines in Rust with a step-by-step operation trace.
//!
//! Both engines share one arena-backed node shape and one call surface,
//! [`TreeEngine`]. Every insert and delete returns an [`Outcome`] whose trace
//! narrates the splits, borrows, merges and guide rewrites it performed, and
//! either engine can hand out a [`TreeSnapshot`] for rendering.
//!
//! ```
//! use multiway_tree::{BPlusTree, BTree, TreeEngine};
//!
//! fn fill<E: TreeEngine<i64>>(engine: &mut E) {
//!     for key in [10, 20, 5, 6, 30, 12] {
//!         engine.insert(key).unwrap();
//!     }
//! }
//!
//! let mut btree: BTree = BTree::new(3).unwrap();
//! let mut bplus: BPlusTree = BPlusTree::new(3).unwrap();
//! fill(&mut btree);
//! fill(&mut bplus);
//!
//! assert_eq!(btree.keys(), bplus.keys());
//! assert!(bplus.delete(&10).unwrap().message().contains("deleted"));
//! ```

mod arena;
mod bplustree;
mod btree;
mod construction;
mod engine;
mod error;
mod node;
mod snapshot;
mod trace;
mod tree_structure;
mod types;

pub use arena::{ArenaStats, NodeArena};
pub use engine::TreeEngine;
pub use error::{parse_key, InitResult, ModifyResult, TreeError, TreeResult};
pub use snapshot::{NodeStatus, NodeView, TreeSnapshot};
pub use trace::{SplitKind, TraceEvent, TraceRecorder};
pub use types::{
    Action, BPlusTree, BTree, Key, Node, NodeId, Outcome, PathStep, SearchOutcome,
    DEFAULT_DEGREE, MIN_DEGREE, NULL_NODE,
};
