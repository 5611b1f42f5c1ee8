//! Graph algorithms for dominance analysis.
//!
//! This module provides the two algorithmic building blocks of the
//! pipeline:
//!
//! ## Cycle-Checked Traversal
//!
//! - [`cycle_checked_postorder`] - depth-first post-order that fails fast
//!   on any back edge
//! - [`topological_order`] - reverse post-order, the iteration order for
//!   the dominance engine
//! - [`check_acyclic`] - whole-graph cycle rejection, covering regions no
//!   start node reaches
//!
//! ## Dominator Analysis
//!
//! - [`compute_dominators`] - iterative dominator-set computation over the
//!   topological order
//! - [`compute_dominators_rooted`] - convenience form for [`RootedGraph`]
//!   implementers
//! - [`Dominators`] - the per-node dominator sets and immediate dominators
//!   with query API
//!
//! [`RootedGraph`]: crate::utils::graph::RootedGraph
//!
//! | Algorithm | Time Complexity | Use Case |
//! |-----------|-----------------|----------|
//! | Traversal | O(V + E) | Cycle rejection, iteration order |
//! | Dominators | O(V·E) | Dominator/postdominator tree construction |

mod dominators;
mod traversal;

pub use dominators::{compute_dominators, compute_dominators_rooted, Dominators};
pub use traversal::{check_acyclic, cycle_checked_postorder, topological_order};
