//! Trait definitions for graph abstractions.
//!
//! These traits let the algorithms in
//! [`algorithms`](crate::utils::graph::algorithms) work against any graph
//! representation. The hierarchy is deliberately minimal:
//!
//! - [`GraphBase`] - node count and node iteration
//! - [`Successors`] - forward edge traversal
//! - [`Predecessors`] - backward edge traversal
//! - [`RootedGraph`] - graphs with a designated entry node
//!
//! All adjacency queries return iterators rather than collections, so simple
//! traversals allocate nothing.

use crate::utils::graph::NodeId;

/// Base trait providing core graph properties.
pub trait GraphBase {
    /// Returns the number of nodes in the graph, regardless of connectivity.
    fn node_count(&self) -> usize;

    /// Returns an iterator over all node identifiers, in ascending index
    /// order.
    fn node_ids(&self) -> impl Iterator<Item = NodeId>;
}

/// Trait for graphs that support forward edge traversal.
pub trait Successors: GraphBase {
    /// Returns an iterator over the successors of `node`.
    ///
    /// For a directed edge `(u, v)`, node `v` is a successor of `u`.
    /// Successors are yielded in edge insertion order.
    ///
    /// # Panics
    ///
    /// May panic if `node` is not a valid node in the graph.
    fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId>;
}

/// Trait for graphs that support backward edge traversal.
pub trait Predecessors: GraphBase {
    /// Returns an iterator over the predecessors of `node`.
    ///
    /// For a directed edge `(u, v)`, node `u` is a predecessor of `v`.
    ///
    /// # Panics
    ///
    /// May panic if `node` is not a valid node in the graph.
    fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId>;
}

/// Trait for graphs with a designated entry (root) node.
///
/// Dominator computation and rooted traversals require a well-defined
/// starting point; control flow graphs provide their synthesized entry
/// block, dominance trees their root.
pub trait RootedGraph: Successors + Predecessors {
    /// Returns the entry (root) node of the graph.
    fn entry(&self) -> NodeId;
}
