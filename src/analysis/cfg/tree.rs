//! Dominance tree assembly and queries.
//!
//! A dominance tree is a graph value in its own right: the same blocks as
//! the analyzed control flow graph, with exactly the edges
//! `idom(n) -> n`. Built once from a finished dominator computation and
//! immutable afterwards.

use std::fmt::Write;

use crate::{
    analysis::cfg::BlockId,
    utils::{
        dot::escape_dot,
        graph::{algorithms::Dominators, DirectedGraph, NodeId},
    },
    Result,
};

/// A dominator or postdominator tree.
///
/// Every block of the source graph appears, with the same [`NodeId`]
/// assignment; blocks that were unreachable from the analysis root appear
/// as isolated nodes with neither parent nor children. Each remaining
/// non-root node has exactly one parent - its immediate dominator (or
/// immediate postdominator, when assembled over a reversed graph).
///
/// # Examples
///
/// ```rust
/// use flowdom::ControlFlowGraph;
///
/// let cfg = ControlFlowGraph::from_adjacency([(0, vec![1, 2])])?;
/// let tree = cfg.dominator_tree()?;
///
/// // The root is the synthesized entry block and has no parent
/// let root = tree.root();
/// assert_eq!(tree.parent(root), None);
/// assert_eq!(tree.root_block(), cfg.entry_block());
/// # Ok::<(), flowdom::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct DominanceTree {
    /// The tree edges, stored in the same arena form as the source graph.
    graph: DirectedGraph<BlockId, ()>,
    /// The root node (the analysis entry; the exit for postdominance).
    root: NodeId,
}

impl DominanceTree {
    /// Assembles the tree from a finished dominator computation.
    ///
    /// Every node of `source` is mirrored into the tree in node id order,
    /// then one edge `idom(n) -> n` is added per computed immediate
    /// dominator. Since idom is a function, no node can gain more than one
    /// parent; this invariant is spot-checked after assembly.
    pub(crate) fn assemble(
        source: &DirectedGraph<BlockId, ()>,
        dominators: &Dominators,
    ) -> Result<DominanceTree> {
        let mut graph: DirectedGraph<BlockId, ()> =
            DirectedGraph::with_capacity(source.node_count(), source.node_count());

        for (_, &block) in source.nodes() {
            graph.add_node(block);
        }
        for (node, idom) in dominators.immediate_dominators() {
            graph.add_edge(idom, node, ())?;
        }

        debug_assert!(
            graph.node_ids().all(|node| graph.in_degree(node) <= 1),
            "a node has more than one parent in the dominance tree"
        );

        Ok(DominanceTree {
            graph,
            root: dominators.entry(),
        })
    }

    /// Returns the root node of the tree.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// Returns the external block id of the root.
    #[must_use]
    pub fn root_block(&self) -> BlockId {
        self.graph.node(self.root).copied().unwrap_or_default()
    }

    /// Returns the number of blocks in the tree (equal to the source
    /// graph's block count).
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
    /// names no block.
    #[must_use]
    pub fn node_of(&self, block: BlockId) -> Option<NodeId> {
        self.graph
            .nodes()
            .find(|(_, &b)| b == block)
            .map(|(node, _)| node)
    }

    /// Returns the parent of a node: its immediate dominator.
    ///
    /// `None` for the root and for nodes that were unreachable in the
    /// source graph.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not a valid node in the tree.
    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.graph.predecessors(node).next()
    }

    /// Returns an iterator over the children of a node: the nodes it
    /// immediately dominates.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not a valid node in the tree.
    pub fn children(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.successors(node)
    }

    /// Enumerates the tree as `(block, ordered child blocks)` pairs, in
    /// node insertion order.
    pub fn adjacency(&self) -> impl Iterator<Item = (BlockId, Vec<BlockId>)> + '_ {
        self.graph.nodes().map(|(node, &block)| {
            let children = self
                .graph
                .successors(node)
                .filter_map(|child| self.graph.node(child).copied())
                .collect();
            (block, children)
        })
    }

    /// Generates a DOT format representation of this tree.
    ///
    /// The output can be rendered with Graphviz tools. The root is
    /// highlighted.
    #[must_use]
    pub fn to_dot(&self, title: Option<&str>) -> String {
        let mut dot = String::new();

        dot.push_str("digraph DominanceTree {\n");
        if let Some(name) = title {
            let _ = writeln!(dot, "    label=\"{}\";", escape_dot(name));
        }
        dot.push_str("    labelloc=t;\n");
        dot.push_str("    node [shape=box, fontname=\"Courier\", fontsize=10];\n\n");

        for (node, &block) in self.graph.nodes() {
            let style = if node == self.root {
                ", style=filled, fillcolor=lightgreen"
            } else {
                ""
            };
            let _ = writeln!(dot, "    B{block} [label=\"B{block}\"{style}];");
        }

        dot.push('\n');
        for (node, &block) in self.graph.nodes() {
            for child in self.graph.successors(node) {
                if let Some(&child_block) = self.graph.node(child) {
                    let _ = writeln!(dot, "    B{block} -> B{child_block};");
                }
            }
        }

        dot.push_str("}\n");
        dot
    }
}

#[cfg(test)]
mod tests {
    use crate::analysis::cfg::{BlockId, ControlFlowGraph};

    fn child_blocks(tree: &crate::analysis::cfg::DominanceTree, block: BlockId) -> Vec<BlockId> {
        let node = tree.node_of(block).unwrap();
        tree.children(node)
            .filter_map(|child| tree.block(child))
            .collect()
    }

    #[test]
    fn test_tree_contains_every_block() {
        let cfg = ControlFlowGraph::from_adjacency([(3, vec![5, 7, 2]), (5, vec![9]), (7, vec![9])])
            .unwrap();
        let tree = cfg.dominator_tree().unwrap();

        assert_eq!(tree.block_count(), cfg.block_count());
        for block in [3, 5, 7, 2, 9, 10, 11] {
            assert!(tree.node_of(block).is_some(), "block {block} missing");
        }
    }

    #[test]
    fn test_tree_edges_follow_idom() {
        let cfg = ControlFlowGraph::from_adjacency([(3, vec![5, 7, 2]), (5, vec![9]), (7, vec![9])])
            .unwrap();
        let tree = cfg.dominator_tree().unwrap();

        assert_eq!(tree.root_block(), 10);
        assert_eq!(child_blocks(&tree, 10), vec![3]);
        // 9 joins two paths, so its immediate dominator is 3, not 5 or 7
        let mut children = child_blocks(&tree, 3);
        children.sort_unstable();
        assert_eq!(children, vec![2, 5, 7, 9, 11]);
        assert!(child_blocks(&tree, 5).is_empty());
        assert!(child_blocks(&tree, 7).is_empty());
    }

    #[test]
    fn test_every_non_root_has_exactly_one_parent() {
        let cfg = ControlFlowGraph::from_adjacency([(0, vec![1, 2]), (1, vec![3]), (2, vec![3])])
            .unwrap();
        let tree = cfg.dominator_tree().unwrap();

        for block in [0, 1, 2, 3, 4, 5] {
            let node = tree.node_of(block).unwrap();
            if node == tree.root() {
                assert_eq!(tree.parent(node), None);
            } else {
                assert!(tree.parent(node).is_some(), "block {block} has no parent");
            }
        }
    }

    #[test]
    fn test_tree_is_acyclic_and_rooted() {
        let cfg = ControlFlowGraph::from_adjacency([(0, vec![1, 2]), (1, vec![3]), (2, vec![3])])
            .unwrap();
        let tree = cfg.dominator_tree().unwrap();

        // Walking parents from any node terminates at the root
        for block in [0, 1, 2, 3] {
            let mut current = tree.node_of(block).unwrap();
            let mut steps = 0;
            while let Some(parent) = tree.parent(current) {
                current = parent;
                steps += 1;
                assert!(steps <= tree.block_count(), "parent chain cycles");
            }
            assert_eq!(current, tree.root());
        }
    }

    #[test]
    fn test_single_node_tree() {
        let cfg = ControlFlowGraph::from_adjacency([(0, vec![])]).unwrap();
        let tree = cfg.dominator_tree().unwrap();

        // entry(1) -> 0 -> exit(2)
        assert_eq!(tree.root_block(), 1);
        assert_eq!(child_blocks(&tree, 1), vec![0]);
        assert_eq!(child_blocks(&tree, 0), vec![2]);
    }

    #[test]
    fn test_postdominator_tree_rooted_at_exit() {
        let cfg = ControlFlowGraph::from_adjacency([(0, vec![])]).unwrap();
        let tree = cfg.postdominator_tree().unwrap();

        // exit(2) -> 0 -> entry(1)
        assert_eq!(tree.root_block(), 2);
        assert_eq!(child_blocks(&tree, 2), vec![0]);
        assert_eq!(child_blocks(&tree, 0), vec![1]);
    }

    #[test]
    fn test_tree_to_dot() {
        let cfg = ControlFlowGraph::from_adjacency([(0, vec![])]).unwrap();
        let tree = cfg.dominator_tree().unwrap();
        let dot = tree.to_dot(Some("doms"));

        assert!(dot.starts_with("digraph DominanceTree {"));
        assert!(dot.contains("B1 -> B0;"));
        assert!(dot.contains("B0 -> B2;"));
        assert!(dot.contains("fillcolor=lightgreen"));
    }
}
