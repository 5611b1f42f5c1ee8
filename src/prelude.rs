//! Convenient re-exports of the most commonly used types and traits.
//!
//! This module provides a curated selection of the most frequently used
//! types from across the library, allowing for convenient glob imports.
//!
//! # Example
//!
//! ```rust
//! use flowdom::prelude::*;
//!
//! let cfg = ControlFlowGraph::from_adjacency([(0, vec![1])])?;
//! let order: Vec<NodeId> = cfg.topological_order()?;
//! assert_eq!(order.len(), 4);
//! # Ok::<(), flowdom::Error>(())
//! ```

pub use crate::{
    analysis::cfg::{BlockId, ControlFlowGraph, DominanceTree},
    utils::graph::{
        algorithms::Dominators, DirectedGraph, EdgeId, GraphBase, NodeId, Predecessors,
        RootedGraph, Successors,
    },
    Error, Result,
};
