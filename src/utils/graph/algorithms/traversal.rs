//! Cycle-checked graph traversal.
//!
//! This module provides the depth-first traversal the dominance engine is
//! built on. The traversal colors nodes white/grey/black (unvisited,
//! in-progress, finished) while walking an explicit stack; an edge to a
//! grey node is a back edge, which makes the input invalid for dominance
//! analysis and aborts the traversal with [`Error::Cycle`].
//!
//! Finished nodes are collected in post-order. Reversing that sequence
//! yields a topological order: every node precedes all of its successors,
//! which is exactly the precondition the single-pass dominator computation
//! relies on.
//!
//! [`cycle_checked_postorder`] and [`topological_order`] visit only nodes
//! reachable from the start node; unreachable nodes appear in no order and
//! in no dominator set. [`check_acyclic`] sweeps every node instead, so
//! cycles confined to unreachable regions are rejected too.

use crate::{
    utils::graph::{NodeId, Successors},
    Error, Result,
};

/// Traversal frame state for the explicit DFS stack.
#[derive(Clone, Copy)]
enum Frame {
    Enter,
    Exit,
}

/// Colored depth-first visit from `root`, appending finished nodes to
/// `result` in post-order.
///
/// `visited` and `on_stack` are shared across calls so multi-root sweeps
/// classify edges consistently.
fn visit<G: Successors>(
    graph: &G,
    root: NodeId,
    visited: &mut [bool],
    on_stack: &mut [bool],
    result: &mut Vec<NodeId>,
) -> Result<()> {
    let mut stack = vec![(root, Frame::Enter)];

    while let Some((node, frame)) = stack.pop() {
        match frame {
            Frame::Enter => {
                if visited[node.index()] {
                    continue;
                }
                visited[node.index()] = true;
                on_stack[node.index()] = true;

                // Exit frame first so it is processed after all children
                stack.push((node, Frame::Exit));

                // Push successors in reverse so they are visited in
                // insertion order
                let successors: Vec<NodeId> = graph.successors(node).collect();
                for &succ in successors.iter().rev() {
                    if on_stack[succ.index()] {
                        log::debug!("back edge {node} -> {succ}");
                        return Err(Error::Cycle { node: succ });
                    }
                    if !visited[succ.index()] {
                        stack.push((succ, Frame::Enter));
                    }
                }
            }
            Frame::Exit => {
                on_stack[node.index()] = false;
                log::trace!("postorder visit {node}");
                result.push(node);
            }
        }
    }

    Ok(())
}

/// Computes the post-order of nodes reachable from `start`, failing on any
/// back edge.
///
/// The traversal is iterative (no recursion), so the only bound on input
/// depth is available memory. Successors are expanded in insertion order,
/// making the resulting sequence deterministic for a given graph.
///
/// # Errors
///
/// Returns [`Error::Cycle`] carrying the node at which an in-progress node
/// was re-entered. No partial order is returned; a cyclic graph has no
/// valid post-order.
pub fn cycle_checked_postorder<G: Successors>(graph: &G, start: NodeId) -> Result<Vec<NodeId>> {
    let node_count = graph.node_count();
    if start.index() >= node_count {
        return Ok(Vec::new());
    }

    let mut visited = vec![false; node_count];
    let mut on_stack = vec![false; node_count];
    let mut result = Vec::with_capacity(node_count);

    visit(graph, start, &mut visited, &mut on_stack, &mut result)?;

    Ok(result)
}

/// Computes a topological order of the nodes reachable from `start`.
///
/// This is the reversed [`cycle_checked_postorder`]: for every edge
/// `u -> v` between reachable nodes, `u` appears strictly before `v`.
///
/// # Errors
///
/// Returns [`Error::Cycle`] if the reachable subgraph contains a cycle.
pub fn topological_order<G: Successors>(graph: &G, start: NodeId) -> Result<Vec<NodeId>> {
    let mut order = cycle_checked_postorder(graph, start)?;
    order.reverse();
    Ok(order)
}

/// Verifies that the entire edge relation of the graph is acyclic.
///
/// Runs the colored depth-first sweep from every not-yet-visited node in
/// index order, sharing the coloring across roots. Unlike the rooted
/// traversals this also rejects cycles confined to regions no start node
/// reaches - the whole edge relation must be acyclic for dominance
/// analysis to be meaningful.
///
/// # Errors
///
/// Returns [`Error::Cycle`] at the first back edge found.
pub fn check_acyclic<G: Successors>(graph: &G) -> Result<()> {
    let node_count = graph.node_count();
    let mut visited = vec![false; node_count];
    let mut on_stack = vec![false; node_count];
    let mut discarded = Vec::new();

    for root in graph.node_ids() {
        if !visited[root.index()] {
            visit(graph, root, &mut visited, &mut on_stack, &mut discarded)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::{
        utils::graph::{
            algorithms::traversal::{check_acyclic, cycle_checked_postorder, topological_order},
            DirectedGraph, NodeId, Successors,
        },
        Error,
    };

    fn create_linear_graph() -> DirectedGraph<&'static str, ()> {
        let mut graph = DirectedGraph::new();
        let a = graph.add_node("A");
        let b = graph.add_node("B");
        let c = graph.add_node("C");
        graph.add_edge(a, b, ()).unwrap();
        graph.add_edge(b, c, ()).unwrap();
        graph
    }

    fn create_diamond_graph() -> DirectedGraph<&'static str, ()> {
        let mut graph = DirectedGraph::new();
        let a = graph.add_node("A");
        let b = graph.add_node("B");
        let c = graph.add_node("C");
        let d = graph.add_node("D");
        graph.add_edge(a, b, ()).unwrap();
        graph.add_edge(a, c, ()).unwrap();
        graph.add_edge(b, d, ()).unwrap();
        graph.add_edge(c, d, ()).unwrap();
        graph
    }

    #[test]
    fn test_postorder_linear() {
        let graph = create_linear_graph();
        let order = cycle_checked_postorder(&graph, NodeId::new(0)).unwrap();
        assert_eq!(order, vec![NodeId::new(2), NodeId::new(1), NodeId::new(0)]);
    }

    #[test]
    fn test_postorder_diamond() {
        let graph = create_diamond_graph();
        let order = cycle_checked_postorder(&graph, NodeId::new(0)).unwrap();

        assert_eq!(order.len(), 4);
        // Root finishes last; the join finishes before both branch heads
        assert_eq!(*order.last().unwrap(), NodeId::new(0));
        let pos = |n: usize| order.iter().position(|&x| x == NodeId::new(n)).unwrap();
        assert!(pos(3) < pos(1));
        assert!(pos(3) < pos(2));
    }

    #[test]
    fn test_topological_order_edge_property() {
        let graph = create_diamond_graph();
        let order = topological_order(&graph, NodeId::new(0)).unwrap();

        // Every edge points from an earlier to a later position
        let pos = |n: NodeId| order.iter().position(|&x| x == n).unwrap();
        for node in order.iter().copied() {
            for succ in graph.successors(node) {
                assert!(pos(node) < pos(succ), "edge {node} -> {succ} out of order");
            }
        }
    }

    #[test]
    fn test_cycle_detected() {
        let mut graph: DirectedGraph<(), ()> = DirectedGraph::new();
        let a = graph.add_node(());
        let b = graph.add_node(());
        graph.add_edge(a, b, ()).unwrap();
        graph.add_edge(b, a, ()).unwrap();

        let result = topological_order(&graph, a);
        assert!(matches!(result, Err(Error::Cycle { node }) if node == a));
    }

    #[test]
    fn test_self_loop_detected() {
        let mut graph: DirectedGraph<(), ()> = DirectedGraph::new();
        let a = graph.add_node(());
        graph.add_edge(a, a, ()).unwrap();

        let result = cycle_checked_postorder(&graph, a);
        assert!(matches!(result, Err(Error::Cycle { node }) if node == a));
    }

    #[test]
    fn test_deep_cycle_detected() {
        // A -> B -> C -> D -> B
        let mut graph: DirectedGraph<&str, ()> = DirectedGraph::new();
        let a = graph.add_node("A");
        let b = graph.add_node("B");
        let c = graph.add_node("C");
        let d = graph.add_node("D");
        graph.add_edge(a, b, ()).unwrap();
        graph.add_edge(b, c, ()).unwrap();
        graph.add_edge(c, d, ()).unwrap();
        graph.add_edge(d, b, ()).unwrap();

        let result = topological_order(&graph, a);
        assert!(matches!(result, Err(Error::Cycle { node }) if node == b));
    }

    #[test]
    fn test_converging_edges_are_not_cycles() {
        // Two paths into the same node must not be mistaken for a back edge
        let graph = create_diamond_graph();
        assert!(topological_order(&graph, NodeId::new(0)).is_ok());
        assert!(check_acyclic(&graph).is_ok());
    }

    #[test]
    fn test_unreachable_nodes_excluded_from_order() {
        let mut graph: DirectedGraph<&str, ()> = DirectedGraph::new();
        let a = graph.add_node("A");
        let b = graph.add_node("B");
        let orphan = graph.add_node("orphan");
        graph.add_edge(a, b, ()).unwrap();

        let order = topological_order(&graph, a).unwrap();
        assert_eq!(order, vec![a, b]);
        assert!(!order.contains(&orphan));
    }

    #[test]
    fn test_rooted_traversal_ignores_unreachable_cycle() {
        // The rooted traversal never sees garbage the start cannot reach
        let mut graph: DirectedGraph<&str, ()> = DirectedGraph::new();
        let a = graph.add_node("A");
        let x = graph.add_node("X");
        let y = graph.add_node("Y");
        graph.add_edge(x, y, ()).unwrap();
        graph.add_edge(y, x, ()).unwrap();

        let order = topological_order(&graph, a).unwrap();
        assert_eq!(order, vec![a]);
    }

    #[test]
    fn test_check_acyclic_finds_unreachable_cycle() {
        let mut graph: DirectedGraph<&str, ()> = DirectedGraph::new();
        let _a = graph.add_node("A");
        let x = graph.add_node("X");
        let y = graph.add_node("Y");
        graph.add_edge(x, y, ()).unwrap();
        graph.add_edge(y, x, ()).unwrap();

        let result = check_acyclic(&graph);
        assert!(matches!(result, Err(Error::Cycle { node }) if node == x));
    }

    #[test]
    fn test_check_acyclic_shared_coloring_across_roots() {
        // 1 -> 2 -> {1, 3}: sweeping from 3 first must not hide the cycle
        let mut graph: DirectedGraph<usize, ()> = DirectedGraph::new();
        let n3 = graph.add_node(3);
        let n1 = graph.add_node(1);
        let n2 = graph.add_node(2);
        graph.add_edge(n1, n2, ()).unwrap();
        graph.add_edge(n2, n1, ()).unwrap();
        graph.add_edge(n2, n3, ()).unwrap();

        assert!(check_acyclic(&graph).is_err());
    }

    #[test]
    fn test_single_node() {
        let mut graph: DirectedGraph<(), ()> = DirectedGraph::new();
        let a = graph.add_node(());
        let order = topological_order(&graph, a).unwrap();
        assert_eq!(order, vec![a]);
        assert!(check_acyclic(&graph).is_ok());
    }

    #[test]
    fn test_deep_chain_does_not_overflow() {
        // The traversal is stack-based, so path length is not bounded by
        // call depth
        let mut graph: DirectedGraph<usize, ()> = DirectedGraph::new();
        let nodes: Vec<NodeId> = (0..50_000).map(|i| graph.add_node(i)).collect();
        for w in nodes.windows(2) {
            graph.add_edge(w[0], w[1], ()).unwrap();
        }

        let order = topological_order(&graph, nodes[0]).unwrap();
        assert_eq!(order.len(), 50_000);
        assert_eq!(order[0], nodes[0]);
        assert_eq!(*order.last().unwrap(), *nodes.last().unwrap());
    }
}
