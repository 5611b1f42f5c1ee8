//! Control flow graph normalization and dominance analysis.
//!
//! This module is the domain layer of the crate. It consumes a finished
//! adjacency list (external scanner territory), normalizes it into a
//! single-entry/single-exit DAG, and derives the two dominance artifacts
//! compilers lean on: the dominator tree and the postdominator tree.
//!
//! # Key Components
//!
//! - [`ControlFlowGraph`] - the normalized DAG with analysis entry points
//! - [`DominanceTree`] - an assembled dominator or postdominator tree
//! - [`BlockId`] - the external block identifier carried as node data
//!
//! # Pipeline
//!
//! ```text
//! raw edges -> normalize -> DAG -> cycle-checked traversal
//!           -> dominator sets -> immediate dominators -> dominator tree
//! DAG -> reverse -> (same pipeline) -> postdominator tree
//! ```
//!
//! Each stage owns its input or produces a fresh copy; nothing is shared
//! mutably between a graph and its derived trees.
//!
//! # Examples
//!
//! ```rust
//! use flowdom::ControlFlowGraph;
//!
//! let cfg = ControlFlowGraph::from_adjacency([
//!     (0, vec![1, 2]),
//!     (1, vec![3]),
//!     (2, vec![3]),
//! ])?;
//!
//! let doms = cfg.dominator_tree()?;
//! let postdoms = cfg.postdominator_tree()?;
//!
//! // The join block 3 is immediately dominated by the fork 0
//! let join = doms.node_of(3).unwrap();
//! assert_eq!(doms.block(doms.parent(join).unwrap()), Some(0));
//!
//! // Dually, 0 is immediately postdominated by 3
//! let fork = postdoms.node_of(0).unwrap();
//! assert_eq!(postdoms.block(postdoms.parent(fork).unwrap()), Some(3));
//! # Ok::<(), flowdom::Error>(())
//! ```

mod graph;
mod tree;

pub use graph::{BlockId, ControlFlowGraph};
pub use tree::DominanceTree;
