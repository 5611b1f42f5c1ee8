//! Generic directed graph infrastructure for the analysis pipeline.
//!
//! This module provides the graph store every other component builds on:
//! strongly-typed identifiers, an adjacency-list arena, abstraction traits,
//! and the traversal/dominance algorithms.
//!
//! # Design Principles
//!
//! ## Strongly-Typed Identifiers
//!
//! Node and edge identifiers use newtype wrappers ([`NodeId`], [`EdgeId`])
//! to prevent accidental mixing of indices, in particular with the external
//! block ids carried as node data.
//!
//! ## Immutable After Construction
//!
//! Graphs are built incrementally during construction, then treated as
//! immutable for analysis. Transformations (normalization, reversal, tree
//! assembly) produce fresh owned graphs instead of mutating shared state,
//! so no aliasing hazards arise between a graph and its derived trees.
//!
//! # Key Components
//!
//! - [`NodeId`] / [`EdgeId`] - strongly-typed identifiers
//! - [`DirectedGraph`] - adjacency-list arena with forward and backward
//!   traversal
//! - [`algorithms`] - cycle-checked traversal and dominator computation
//! - [`GraphBase`], [`Successors`], [`Predecessors`], [`RootedGraph`] -
//!   abstraction traits the algorithms are written against

mod directed;
mod edge;
mod node;
mod traits;

pub mod algorithms;

pub use directed::DirectedGraph;
pub use edge::EdgeId;
pub use node::NodeId;
pub use traits::{GraphBase, Predecessors, RootedGraph, Successors};
