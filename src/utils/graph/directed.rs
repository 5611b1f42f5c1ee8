//! Core directed graph implementation.
//!
//! This module provides [`DirectedGraph`], the arena the whole analysis
//! pipeline is built on. Nodes and edges live in contiguous vectors indexed
//! by [`NodeId`] and [`EdgeId`]; per-node adjacency lists store edge ids in
//! insertion order, which keeps every traversal reproducible.
//!
//! Graphs are built incrementally during construction and treated as
//! immutable afterwards. Each pipeline stage (normalization, reversal, tree
//! assembly) produces a fresh owned graph rather than mutating a shared one.

use crate::{
    utils::graph::{
        edge::EdgeId,
        node::NodeId,
        traits::{GraphBase, Predecessors, Successors},
    },
    Error, Result,
};

/// Internal storage for edge data and endpoints.
#[derive(Debug, Clone)]
struct EdgeData<E> {
    /// Source node of the edge
    source: NodeId,
    /// Target node of the edge
    target: NodeId,
    /// User-provided edge data
    data: E,
}

/// A directed graph with typed node and edge data.
///
/// `DirectedGraph` provides the graph-store primitives the analysis layer
/// consumes:
///
/// - Generic node data (`N`) - in this crate, the external block id
/// - Generic edge data (`E`) - unused by the analysis layer (`()`)
/// - Adjacency queries in both directions via [`Successors`] and
///   [`Predecessors`]
/// - Degree queries and entry/exit node enumeration for normalization
/// - Structural reversal via [`reversed`](Self::reversed)
///
/// # Memory Layout
///
/// Nodes are stored in a vector indexed by `NodeId`, edges in a vector
/// indexed by `EdgeId`; the outgoing/incoming adjacency lists hold `EdgeId`
/// references. Node and edge access is O(1).
///
/// # Thread Safety
///
/// `DirectedGraph<N, E>` is [`Send`] and [`Sync`] when `N` and `E` are.
/// Build the graph single-threaded, then read it freely.
#[derive(Debug, Clone)]
pub struct DirectedGraph<N, E> {
    /// Node data storage
    nodes: Vec<N>,
    /// Edge data storage
    edges: Vec<EdgeData<E>>,
    /// Outgoing edges per node (adjacency list for successors)
    outgoing: Vec<Vec<EdgeId>>,
    /// Incoming edges per node (adjacency list for predecessors)
    incoming: Vec<Vec<EdgeId>>,
}

impl<N, E> Default for DirectedGraph<N, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N, E> DirectedGraph<N, E> {
    /// Creates a new empty directed graph.
    #[must_use]
    pub fn new() -> Self {
        DirectedGraph {
            nodes: Vec::new(),
            edges: Vec::new(),
            outgoing: Vec::new(),
            incoming: Vec::new(),
        }
    }

    /// Creates a new directed graph with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(node_capacity: usize, edge_capacity: usize) -> Self {
        DirectedGraph {
            nodes: Vec::with_capacity(node_capacity),
            edges: Vec::with_capacity(edge_capacity),
            outgoing: Vec::with_capacity(node_capacity),
            incoming: Vec::with_capacity(node_capacity),
        }
    }

    /// Adds a new node with the given data to the graph.
    ///
    /// The node is assigned the next sequential `NodeId`, starting from 0.
    pub fn add_node(&mut self, data: N) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(data);
        self.outgoing.push(Vec::new());
        self.incoming.push(Vec::new());
        id
    }

    /// Returns a reference to the data associated with the given node, or
    /// `None` if the id is out of range.
    #[must_use]
    pub fn node(&self, node: NodeId) -> Option<&N> {
        self.nodes.get(node.index())
    }

    /// Returns the number of nodes in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns an iterator over all node identifiers, in insertion order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId::new)
    }

    /// Returns an iterator over all nodes with their identifiers.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &N)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, data)| (NodeId::new(i), data))
    }

    /// Adds a directed edge from `source` to `target` with the given data.
    ///
    /// Multiple edges between the same pair of nodes are allowed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GraphError`] if either endpoint does not exist in
    /// the graph.
    pub fn add_edge(&mut self, source: NodeId, target: NodeId, data: E) -> Result<EdgeId> {
        if source.index() >= self.nodes.len() {
            return Err(Error::GraphError(format!(
                "source node {} does not exist in graph with {} nodes",
                source,
                self.nodes.len()
            )));
        }
        if target.index() >= self.nodes.len() {
            return Err(Error::GraphError(format!(
                "target node {} does not exist in graph with {} nodes",
                target,
                self.nodes.len()
            )));
        }

        let id = EdgeId::new(self.edges.len());
        self.edges.push(EdgeData {
            source,
            target,
            data,
        });

        self.outgoing[source.index()].push(id);
        self.incoming[target.index()].push(id);

        Ok(id)
    }

    /// Returns the source and target nodes of the given edge, or `None` if
    /// the id is out of range.
    #[must_use]
    pub fn edge_endpoints(&self, edge: EdgeId) -> Option<(NodeId, NodeId)> {
        self.edges.get(edge.index()).map(|e| (e.source, e.target))
    }

    /// Returns the number of edges in the graph.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns an iterator over the successors of the given node, in edge
    /// insertion order.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not a valid node in the graph.
    pub fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.outgoing[node.index()]
            .iter()
            .map(|&edge_id| self.edges[edge_id.index()].target)
    }

    /// Returns an iterator over the predecessors of the given node.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not a valid node in the graph.
    pub fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.incoming[node.index()]
            .iter()
            .map(|&edge_id| self.edges[edge_id.index()].source)
    }

    /// Returns the out-degree (number of outgoing edges) of a node.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not a valid node in the graph.
    #[must_use]
    pub fn out_degree(&self, node: NodeId) -> usize {
        self.outgoing[node.index()].len()
    }

    /// Returns the in-degree (number of incoming edges) of a node.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not a valid node in the graph.
    #[must_use]
    pub fn in_degree(&self, node: NodeId) -> usize {
        self.incoming[node.index()].len()
    }

    /// Returns `true` if the graph contains no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns an iterator over entry nodes (nodes with no incoming edges).
    ///
    /// These are the sources the normalizer wires the synthetic entry node
    /// to.
    pub fn entry_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.node_ids().filter(|&node| self.in_degree(node) == 0)
    }

    /// Returns an iterator over exit nodes (nodes with no outgoing edges).
    ///
    /// These are the sinks the normalizer wires to the synthetic exit node.
    pub fn exit_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.node_ids().filter(|&node| self.out_degree(node) == 0)
    }

    /// Checks if the given node id is valid for this graph.
    #[must_use]
    pub fn contains_node(&self, node: NodeId) -> bool {
        node.index() < self.nodes.len()
    }
}

impl<N: Clone, E: Clone> DirectedGraph<N, E> {
    /// Returns a structural copy of this graph with every edge reversed.
    ///
    /// Each edge `u -> v` becomes `v -> u`; node data and node id
    /// assignment are preserved, so analysis results on the reversed graph
    /// line up index-for-index with the original. The input is not mutated.
    #[must_use]
    pub fn reversed(&self) -> DirectedGraph<N, E> {
        let mut reversed = DirectedGraph::with_capacity(self.nodes.len(), self.edges.len());
        for data in &self.nodes {
            reversed.add_node(data.clone());
        }
        for edge in &self.edges {
            // Endpoints were validated when the edge was first inserted.
            let _ = reversed.add_edge(edge.target, edge.source, edge.data.clone());
        }
        reversed
    }
}

impl<N, E> GraphBase for DirectedGraph<N, E> {
    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId::new)
    }
}

impl<N, E> Successors for DirectedGraph<N, E> {
    fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
        self.outgoing[node.index()]
            .iter()
            .map(|&edge_id| self.edges[edge_id.index()].target)
    }
}

impl<N, E> Predecessors for DirectedGraph<N, E> {
    fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
        self.incoming[node.index()]
            .iter()
            .map(|&edge_id| self.edges[edge_id.index()].source)
    }
}
