//! Control flow graph construction and analysis entry points.
//!
//! This module provides [`ControlFlowGraph`], the normalized
//! single-entry/single-exit DAG the dominance pipeline runs on, together
//! with the normalizer that produces it from a raw adjacency list.

use std::{collections::HashMap, fmt::Write, sync::OnceLock};

use crate::{
    analysis::cfg::DominanceTree,
    utils::{
        dot::escape_dot,
        graph::{
            algorithms::{self, Dominators},
            DirectedGraph, GraphBase, NodeId, Predecessors, RootedGraph, Successors,
        },
    },
    Result,
};

/// External identifier of a basic block, as produced by the input scanner.
///
/// Block ids are non-negative integers chosen by the input; they are
/// carried as node data and never used to index storage. The dense
/// [`NodeId`] assigned during construction is the index every algorithm
/// works with.
pub type BlockId = u64;

/// A control flow graph normalized to a single entry and a single exit.
///
/// # Construction
///
/// [`from_adjacency`](Self::from_adjacency) consumes a finished adjacency
/// list and performs normalization:
///
/// 1. Every id that appears only as a successor is materialized as a node
///    with an empty successor list (implicit leaves).
/// 2. A synthetic entry block (`max id + 1`) gains an edge to every node
///    without incoming edges; a synthetic exit block (`max id + 2`) gains
///    an edge from every node without outgoing edges. The synthesized ids
///    cannot collide with input ids.
/// 3. An entirely empty input yields just the entry/exit pair joined by a
///    single edge.
///
/// Normalization itself never fails on cyclic input; cycles are rejected
/// by the traversal stage when an analysis is requested.
///
/// # Analyses
///
/// Dominator results are computed on first use and cached; the dominator
/// and postdominator trees ([`dominator_tree`](Self::dominator_tree),
/// [`postdominator_tree`](Self::postdominator_tree)) are assembled from
/// them as independent [`DominanceTree`] values. The postdominator tree is
/// the dominator tree of the [`reversed`](Self::reversed) graph, whose
/// entry and exit roles are swapped.
///
/// # Thread Safety
///
/// `ControlFlowGraph` is [`Send`] and [`Sync`]; the lazily computed
/// dominator results use [`OnceLock`] for initialization.
///
/// # Examples
///
/// ```rust
/// use flowdom::ControlFlowGraph;
///
/// let cfg = ControlFlowGraph::from_adjacency([
///     (3, vec![5, 7, 2]),
///     (5, vec![9]),
///     (7, vec![9]),
/// ])?;
///
/// // 2 and 9 were materialized as implicit leaves; entry/exit synthesized
/// assert_eq!(cfg.block_count(), 7);
/// assert_eq!(cfg.entry_block(), 10);
/// assert_eq!(cfg.exit_block(), 11);
///
/// let tree = cfg.dominator_tree()?;
/// assert_eq!(tree.root_block(), 10);
/// # Ok::<(), flowdom::Error>(())
/// ```
#[derive(Debug)]
pub struct ControlFlowGraph {
    /// The underlying directed graph; node data is the external block id.
    graph: DirectedGraph<BlockId, ()>,
    /// Map from external block id to dense node id.
    index: HashMap<BlockId, NodeId>,
    /// The synthesized entry node.
    entry: NodeId,
    /// The synthesized exit node.
    exit: NodeId,
    /// Lazily computed dominator results.
    dominators: OnceLock<Dominators>,
}

impl ControlFlowGraph {
    /// Builds a normalized control flow graph from a raw adjacency list.
    ///
    /// `adjacency` yields `(block, successors)` pairs; pair order and
    /// successor order are preserved, so construction is deterministic. A
    /// block id that appears as a key more than once has its successor
    /// lists concatenated in encounter order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedReference`](crate::Error::MalformedReference)
    /// if a successor id fails to resolve during edge wiring. This is a
    /// defensive check of the materialization step and cannot fire for
    /// inputs processed by it.
    pub fn from_adjacency<I>(adjacency: I) -> Result<Self>
    where
        I: IntoIterator<Item = (BlockId, Vec<BlockId>)>,
    {
        let mut graph: DirectedGraph<BlockId, ()> = DirectedGraph::new();
        let mut index: HashMap<BlockId, NodeId> = HashMap::new();
        let mut pending: Vec<(NodeId, Vec<BlockId>)> = Vec::new();

        // First pass: materialize every mentioned id, implicit leaves in
        // first-reference order
        for (block, successors) in adjacency {
            let node = *index
                .entry(block)
                .or_insert_with(|| graph.add_node(block));
            for &succ in &successors {
                if !index.contains_key(&succ) {
                    log::trace!("materializing implicit leaf block {succ}");
                    let leaf = graph.add_node(succ);
                    index.insert(succ, leaf);
                }
            }
            pending.push((node, successors));
        }

        // Second pass: wire the declared edges
        for (node, successors) in pending {
            for succ in successors {
                let target = index.get(&succ).copied().ok_or_else(|| {
                    malformed_error!("successor {} resolves to no materialized block", succ)
                })?;
                graph.add_edge(node, target, ())?;
            }
        }

        // Synthesize entry and exit above the largest id in use
        let max_id = graph.nodes().map(|(_, &block)| block).max().unwrap_or(0);
        let entry_block = max_id + 1;
        let exit_block = max_id + 2;
        log::debug!("synthesizing entry {entry_block} and exit {exit_block}");

        let sources: Vec<NodeId> = graph.entry_nodes().collect();
        let sinks: Vec<NodeId> = graph.exit_nodes().collect();

        let entry = graph.add_node(entry_block);
        index.insert(entry_block, entry);
        let exit = graph.add_node(exit_block);
        index.insert(exit_block, exit);

        for source in sources {
            log::trace!("wiring entry edge to source {source}");
            graph.add_edge(entry, source, ())?;
        }
        for sink in sinks {
            log::trace!("wiring exit edge from sink {sink}");
            graph.add_edge(sink, exit, ())?;
        }

        // Empty input leaves nothing to wire; the entry still reaches the
        // exit
        if graph.node_count() == 2 {
            graph.add_edge(entry, exit, ())?;
        }

        Ok(Self {
            graph,
            index,
            entry,
            exit,
            dominators: OnceLock::new(),
        })
    }

    /// Returns the node id of the synthesized entry block.
    #[must_use]
    pub const fn entry(&self) -> NodeId {
        self.entry
    }

    /// Returns the node id of the synthesized exit block.
    #[must_use]
    pub const fn exit(&self) -> NodeId {
        self.exit
    }

    /// Returns the external id of the synthesized entry block.
    #[must_use]
    pub fn entry_block(&self) -> BlockId {
        self.graph.node(self.entry).copied().unwrap_or_default()
    }

    /// Returns the external id of the synthesized exit block.
    #[must_use]
    pub fn exit_block(&self) -> BlockId {
        self.graph.node(self.exit).copied().unwrap_or_default()
    }

    /// Returns the number of blocks in the graph, including the synthetic
    /// entry and exit.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the external block id for a node, or `None` if the node id
    /// is out of range.
    #[must_use]
    pub fn block(&self, node: NodeId) -> Option<BlockId> {
        self.graph.node(node).copied()
    }

    /// Returns the node for an external block id, or `None` if the id
    /// names no block in this graph.
    #[must_use]
    pub fn node_of(&self, block: BlockId) -> Option<NodeId> {
        self.index.get(&block).copied()
    }

    /// Returns an iterator over the successors of a node, in edge
    /// insertion order.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not a valid node in the graph.
    pub fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.successors(node)
    }

    /// Returns an iterator over the predecessors of a node.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not a valid node in the graph.
    pub fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.predecessors(node)
    }

    /// Computes a topological order of the blocks reachable from the
    /// entry.
    ///
    /// The whole edge relation is checked for cycles first, so cyclic
    /// input is rejected even when the cycle is unreachable from the
    /// synthesized entry (a pure cycle has no in-degree-zero node for the
    /// normalizer to wire the entry to).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Cycle`](crate::Error::Cycle) if the graph is not
    /// acyclic.
    pub fn topological_order(&self) -> Result<Vec<NodeId>> {
        algorithms::check_acyclic(&self.graph)?;
        algorithms::topological_order(&self.graph, self.entry)
    }

    /// Returns the dominator results for this graph, computing them on
    /// first access.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Cycle`](crate::Error::Cycle) if the graph is not
    /// acyclic; no partial result is cached or returned.
    pub fn dominators(&self) -> Result<&Dominators> {
        if let Some(dominators) = self.dominators.get() {
            return Ok(dominators);
        }

        algorithms::check_acyclic(&self.graph)?;
        let dominators = algorithms::compute_dominators_rooted(self)?;
        Ok(self.dominators.get_or_init(|| dominators))
    }

    /// Builds the dominator tree of this graph.
    ///
    /// The tree contains every block of this graph (blocks unreachable
    /// from the entry appear childless and parentless) and exactly the
    /// edges `idom(n) -> n`. Its root is the entry block.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Cycle`](crate::Error::Cycle) if the graph is not
    /// acyclic.
    pub fn dominator_tree(&self) -> Result<DominanceTree> {
        let dominators = self.dominators()?;
        DominanceTree::assemble(&self.graph, dominators)
    }

    /// Builds the postdominator tree of this graph.
    ///
    /// Computed as the dominator tree of the reversed graph: every edge is
    /// flipped and the entry/exit roles are swapped, so an immediate
    /// dominator there is exactly an immediate postdominator here. The
    /// root is the exit block.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Cycle`](crate::Error::Cycle) if the graph is not
    /// acyclic.
    pub fn postdominator_tree(&self) -> Result<DominanceTree> {
        self.reversed().dominator_tree()
    }

    /// Returns a new graph with every edge reversed and the entry/exit
    /// roles swapped.
    ///
    /// This is a pure structural transform: the receiver is not mutated,
    /// and block ids keep their node id assignment, so analysis results on
    /// the reversed graph line up with the original.
    #[must_use]
    pub fn reversed(&self) -> Self {
        ControlFlowGraph {
            graph: self.graph.reversed(),
            index: self.index.clone(),
            entry: self.exit,
            exit: self.entry,
            dominators: OnceLock::new(),
        }
    }

    /// Enumerates the graph as `(block, ordered successor blocks)` pairs,
    /// in node insertion order.
    ///
    /// Together with [`entry_block`](Self::entry_block) and
    /// [`exit_block`](Self::exit_block) this is sufficient for any
    /// external serializer or visualization consumer.
    pub fn adjacency(&self) -> impl Iterator<Item = (BlockId, Vec<BlockId>)> + '_ {
        self.graph.nodes().map(|(node, &block)| {
            let successors = self
                .graph
                .successors(node)
                .filter_map(|succ| self.graph.node(succ).copied())
                .collect();
            (block, successors)
        })
    }

    /// Generates a DOT format representation of this control flow graph.
    ///
    /// The output can be rendered with Graphviz tools. The entry block is
    /// highlighted in green, the exit block in red.
    #[must_use]
    pub fn to_dot(&self, title: Option<&str>) -> String {
        let mut dot = String::new();

        dot.push_str("digraph CFG {\n");
        if let Some(name) = title {
            let _ = writeln!(dot, "    label=\"CFG: {}\";", escape_dot(name));
        }
        dot.push_str("    labelloc=t;\n");
        dot.push_str("    node [shape=box, fontname=\"Courier\", fontsize=10];\n\n");

        for (node, &block) in self.graph.nodes() {
            let is_entry = node == self.entry;
            let is_exit = node == self.exit;

            let mut label = format!("B{block}");
            if is_entry {
                label.push_str(" (entry)");
            }
            if is_exit {
                label.push_str(" (exit)");
            }

            let style = if is_entry {
                ", style=filled, fillcolor=lightgreen"
            } else if is_exit {
                ", style=filled, fillcolor=lightcoral"
            } else {
                ""
            };

            let _ = writeln!(dot, "    B{block} [label=\"{}\"{style}];", escape_dot(&label));
        }

        dot.push('\n');
        for (node, &block) in self.graph.nodes() {
            for succ in self.graph.successors(node) {
                if let Some(&succ_block) = self.graph.node(succ) {
                    let _ = writeln!(dot, "    B{block} -> B{succ_block};");
                }
            }
        }

        dot.push_str("}\n");
        dot
    }
}

impl GraphBase for ControlFlowGraph {
    fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        GraphBase::node_ids(&self.graph)
    }
}

impl Successors for ControlFlowGraph {
    fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
        Successors::successors(&self.graph, node)
    }
}

impl Predecessors for ControlFlowGraph {
    fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
        Predecessors::predecessors(&self.graph, node)
    }
}

impl RootedGraph for ControlFlowGraph {
    fn entry(&self) -> NodeId {
        self.entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn example_cfg() -> ControlFlowGraph {
        // 3 -> {5, 7, 2}; 5 -> 9; 7 -> 9; 2 and 9 are implicit leaves
        ControlFlowGraph::from_adjacency([(3, vec![5, 7, 2]), (5, vec![9]), (7, vec![9])])
            .unwrap()
    }

    fn successor_blocks(cfg: &ControlFlowGraph, block: BlockId) -> Vec<BlockId> {
        let node = cfg.node_of(block).unwrap();
        cfg.successors(node)
            .filter_map(|succ| cfg.block(succ))
            .collect()
    }

    #[test]
    fn test_normalizer_materializes_leaves() {
        let cfg = example_cfg();

        // 5 declared blocks + entry + exit
        assert_eq!(cfg.block_count(), 7);
        for block in [3, 5, 7, 2, 9] {
            assert!(cfg.node_of(block).is_some(), "block {block} missing");
        }
    }

    #[test]
    fn test_normalizer_synthesizes_entry_and_exit_above_max_id() {
        let cfg = example_cfg();

        assert_eq!(cfg.entry_block(), 10);
        assert_eq!(cfg.exit_block(), 11);
        assert_eq!(cfg.block(cfg.entry()), Some(10));
        assert_eq!(cfg.block(cfg.exit()), Some(11));
    }

    #[test]
    fn test_normalizer_wires_sources_and_sinks() {
        let cfg = example_cfg();

        // 3 is the only source; 2 and 9 are the sinks
        assert_eq!(successor_blocks(&cfg, 10), vec![3]);
        assert_eq!(successor_blocks(&cfg, 2), vec![11]);
        assert_eq!(successor_blocks(&cfg, 9), vec![11]);

        // Declared edges survive normalization untouched
        assert_eq!(successor_blocks(&cfg, 3), vec![5, 7, 2]);
        assert_eq!(successor_blocks(&cfg, 5), vec![9]);
    }

    #[test]
    fn test_normalizer_single_entry_single_exit() {
        let cfg = example_cfg();

        let entries: Vec<NodeId> = GraphBase::node_ids(&cfg)
            .filter(|&n| cfg.predecessors(n).next().is_none())
            .collect();
        let exits: Vec<NodeId> = GraphBase::node_ids(&cfg)
            .filter(|&n| cfg.successors(n).next().is_none())
            .collect();

        assert_eq!(entries, vec![cfg.entry()]);
        assert_eq!(exits, vec![cfg.exit()]);
    }

    #[test]
    fn test_empty_input_yields_entry_to_exit() {
        let cfg = ControlFlowGraph::from_adjacency(std::iter::empty()).unwrap();

        assert_eq!(cfg.block_count(), 2);
        assert_eq!(cfg.entry_block(), 1);
        assert_eq!(cfg.exit_block(), 2);
        assert_eq!(successor_blocks(&cfg, 1), vec![2]);
    }

    #[test]
    fn test_single_isolated_node() {
        let cfg = ControlFlowGraph::from_adjacency([(7, vec![])]).unwrap();

        assert_eq!(cfg.block_count(), 3);
        assert_eq!(cfg.entry_block(), 8);
        assert_eq!(cfg.exit_block(), 9);
        assert_eq!(successor_blocks(&cfg, 8), vec![7]);
        assert_eq!(successor_blocks(&cfg, 7), vec![9]);
    }

    #[test]
    fn test_duplicate_keys_concatenate() {
        let cfg =
            ControlFlowGraph::from_adjacency([(1, vec![2]), (1, vec![3])]).unwrap();

        assert_eq!(successor_blocks(&cfg, 1), vec![2, 3]);
    }

    #[test]
    fn test_topological_order_respects_edges() {
        let cfg = example_cfg();
        let order = cfg.topological_order().unwrap();

        assert_eq!(order.len(), cfg.block_count());
        assert_eq!(order[0], cfg.entry());
        assert_eq!(*order.last().unwrap(), cfg.exit());

        let pos = |n: NodeId| order.iter().position(|&x| x == n).unwrap();
        for node in GraphBase::node_ids(&cfg) {
            for succ in cfg.successors(node) {
                assert!(pos(node) < pos(succ));
            }
        }
    }

    #[test]
    fn test_cycle_rejected() {
        let cfg = ControlFlowGraph::from_adjacency([(1, vec![2]), (2, vec![1])]).unwrap();

        assert!(matches!(cfg.topological_order(), Err(Error::Cycle { .. })));
        assert!(matches!(cfg.dominators(), Err(Error::Cycle { .. })));
        assert!(matches!(cfg.dominator_tree(), Err(Error::Cycle { .. })));
    }

    #[test]
    fn test_self_loop_rejected() {
        let cfg = ControlFlowGraph::from_adjacency([(1, vec![1])]).unwrap();
        assert!(matches!(cfg.dominator_tree(), Err(Error::Cycle { .. })));
    }

    #[test]
    fn test_dominators_cached() {
        let cfg = example_cfg();
        let first = cfg.dominators().unwrap() as *const Dominators;
        let second = cfg.dominators().unwrap() as *const Dominators;
        assert_eq!(first, second);
    }

    #[test]
    fn test_reversed_swaps_roles_without_mutating() {
        let cfg = example_cfg();
        let reversed = cfg.reversed();

        assert_eq!(reversed.entry_block(), cfg.exit_block());
        assert_eq!(reversed.exit_block(), cfg.entry_block());
        assert_eq!(reversed.block_count(), cfg.block_count());

        // Edge 3 -> 5 became 5 -> 3
        assert_eq!(successor_blocks(&reversed, 5), vec![3]);
        // The original is untouched
        assert_eq!(successor_blocks(&cfg, 3), vec![5, 7, 2]);
    }

    #[test]
    fn test_adjacency_export_round_trips_blocks() {
        let cfg = example_cfg();
        let pairs: Vec<(BlockId, Vec<BlockId>)> = cfg.adjacency().collect();

        assert_eq!(pairs.len(), cfg.block_count());
        assert_eq!(pairs[0], (3, vec![5, 7, 2]));

        let entry_pair = pairs.iter().find(|(b, _)| *b == 10).unwrap();
        assert_eq!(entry_pair.1, vec![3]);
        let exit_pair = pairs.iter().find(|(b, _)| *b == 11).unwrap();
        assert!(exit_pair.1.is_empty());
    }

    #[test]
    fn test_to_dot_output() {
        let cfg = ControlFlowGraph::from_adjacency([(0, vec![1])]).unwrap();
        let dot = cfg.to_dot(Some("tiny"));

        assert!(dot.starts_with("digraph CFG {"));
        assert!(dot.contains("label=\"CFG: tiny\";"));
        assert!(dot.contains("B2 -> B0;")); // entry (2) to source
        assert!(dot.contains("B0 -> B1;"));
        assert!(dot.contains("B1 -> B3;")); // sink to exit (3)
        assert!(dot.contains("fillcolor=lightgreen"));
        assert!(dot.contains("fillcolor=lightcoral"));
        assert!(dot.ends_with("}\n"));
    }
}
