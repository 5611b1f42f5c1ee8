//! Analysis layers built on the graph infrastructure.
//!
//! Currently a single layer: [`cfg`], providing control flow graph
//! normalization and dominator/postdominator tree construction.

pub mod cfg;

pub use cfg::{BlockId, ControlFlowGraph, DominanceTree};
