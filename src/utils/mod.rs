//! Shared infrastructure used by the analysis layer.
//!
//! - [`graph`] - directed graph arena, traversal, and dominator algorithms
//! - [`bitset`] - dense bit sets used as dominator sets
//! - [`dot`] - DOT output escaping helpers

pub mod bitset;
pub mod dot;
pub mod graph;

pub use bitset::BitSet;
pub use dot::escape_dot;
