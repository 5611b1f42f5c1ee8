//! Dominator computation over acyclic rooted graphs.
//!
//! This module implements the classical iterative dominator-set algorithm:
//! nodes are processed in topological order, and every node's dominator set
//! is the intersection of its predecessors' dominator sets plus the node
//! itself. Because predecessors always precede a node in topological order,
//! a single forward pass suffices - no fixpoint loop is needed. Immediate
//! dominators are then extracted from the finished sets, giving the edge
//! relation of the dominator tree.
//!
//! # Theory
//!
//! A node `d` **dominates** a node `n` if every path from the entry node to
//! `n` passes through `d`. Every node dominates itself. The **immediate
//! dominator** of `n` (idom(n)) is the unique closest strict dominator of
//! `n`; the entry node has none.
//!
//! # Algorithm
//!
//! This is deliberately not the asymptotically optimal Lengauer-Tarjan
//! form. Predecessor sets are recomputed by a full successor-list scan per
//! node (O(V·E) overall) and dominator sets are dense bitsets; at the
//! intended input scale the simple, obviously-correct formulation wins.
//! Set intersection is order-independent, so predecessor visitation order
//! never affects the result.

use crate::{
    utils::{
        bitset::BitSet,
        graph::{algorithms::traversal::topological_order, NodeId, RootedGraph, Successors},
    },
    Error, Result,
};

/// Result of dominator computation over a rooted acyclic graph.
///
/// Holds, for every node reachable from the entry, its full dominator set
/// and its immediate dominator. Unreachable nodes own neither - they are
/// reported as not reachable and excluded from the dominator tree.
#[derive(Debug, Clone)]
pub struct Dominators {
    /// The entry (root) node the analysis ran from
    entry: NodeId,
    /// Dominator set per node, indexed by node id; `None` for unreachable
    /// nodes
    dom_sets: Vec<Option<BitSet>>,
    /// Immediate dominator per node; `None` for the entry and for
    /// unreachable nodes
    idom: Vec<Option<NodeId>>,
}

impl Dominators {
    /// Returns the entry node of the analyzed graph.
    #[must_use]
    pub fn entry(&self) -> NodeId {
        self.entry
    }

    /// Returns the number of nodes the analysis covered (reachable or not).
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.dom_sets.len()
    }

    /// Returns `true` if the node was reachable from the entry.
    ///
    /// # Panics
    ///
    /// Panics if the node index is out of bounds.
    #[must_use]
    pub fn is_reachable(&self, node: NodeId) -> bool {
        self.dom_sets[node.index()].is_some()
    }

    /// Returns the immediate dominator of a node.
    ///
    /// `None` for the entry node and for unreachable nodes.
    ///
    /// # Panics
    ///
    /// Panics if the node index is out of bounds.
    #[must_use]
    pub fn immediate_dominator(&self, node: NodeId) -> Option<NodeId> {
        self.idom[node.index()]
    }

    /// Returns an iterator over the dominators of a node in ascending index
    /// order, or `None` if the node is unreachable.
    ///
    /// The set is reflexive: it contains the node itself.
    ///
    /// # Panics
    ///
    /// Panics if the node index is out of bounds.
    pub fn dominators_of(&self, node: NodeId) -> Option<impl Iterator<Item = NodeId> + '_> {
        self.dom_sets[node.index()]
            .as_ref()
            .map(|set| set.iter().map(NodeId::new))
    }

    /// Checks if node `a` dominates node `b`.
    ///
    /// A node dominates itself; the entry dominates every reachable node.
    /// Returns `false` if `b` is unreachable.
    ///
    /// # Panics
    ///
    /// Panics if either node index is out of bounds.
    #[must_use]
    pub fn dominates(&self, a: NodeId, b: NodeId) -> bool {
        self.dom_sets[b.index()]
            .as_ref()
            .is_some_and(|set| set.contains(a.index()))
    }

    /// Checks if node `a` strictly dominates node `b` (dominates and
    /// `a != b`).
    ///
    /// # Panics
    ///
    /// Panics if either node index is out of bounds.
    #[must_use]
    pub fn strictly_dominates(&self, a: NodeId, b: NodeId) -> bool {
        a != b && self.dominates(a, b)
    }

    /// Returns an iterator over `(node, idom(node))` pairs for every node
    /// with a defined immediate dominator.
    ///
    /// This is exactly the edge relation of the dominator tree.
    pub fn immediate_dominators(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.idom
            .iter()
            .enumerate()
            .filter_map(|(i, idom)| idom.map(|d| (NodeId::new(i), d)))
    }
}

/// Computes dominator sets and immediate dominators for every node
/// reachable from `entry`.
///
/// The graph must be acyclic in its reachable region; the topological
/// order required by the single-pass computation is obtained via
/// [`topological_order`] and its cycle check.
///
/// # Errors
///
/// - [`Error::Cycle`] if the reachable region contains a cycle; no partial
///   result is produced.
/// - [`Error::GraphError`] if a dominator set turns out internally
///   inconsistent during immediate-dominator extraction (a defect, not an
///   input condition).
pub fn compute_dominators<G: Successors>(graph: &G, entry: NodeId) -> Result<Dominators> {
    let node_count = graph.node_count();
    if node_count == 0 {
        return Ok(Dominators {
            entry,
            dom_sets: Vec::new(),
            idom: Vec::new(),
        });
    }

    let order = topological_order(graph, entry)?;

    let mut dom_sets: Vec<Option<BitSet>> = vec![None; node_count];
    for &node in &order {
        let mut dom: Option<BitSet> = None;
        for pred in predecessors_of(graph, node) {
            // A predecessor outside the topological order is unreachable
            // and owns no dominator set; it contributes nothing.
            let Some(pred_dom) = dom_sets[pred.index()].as_ref() else {
                continue;
            };
            match dom.as_mut() {
                Some(set) => {
                    set.intersect_with(pred_dom);
                }
                None => dom = Some(pred_dom.clone()),
            }
        }

        // Only the entry has no reachable predecessors; its set is {self}
        let mut dom = dom.unwrap_or_else(|| BitSet::new(node_count));
        dom.insert(node.index());
        log::trace!("dom({node}) = {dom:?}");
        dom_sets[node.index()] = Some(dom);
    }

    let mut idom: Vec<Option<NodeId>> = vec![None; node_count];
    for &node in &order {
        if node == entry {
            continue;
        }
        idom[node.index()] = Some(extract_idom(&dom_sets, node)?);
    }

    Ok(Dominators {
        entry,
        dom_sets,
        idom,
    })
}

/// Convenience function to compute dominators for a [`RootedGraph`].
///
/// Equivalent to calling [`compute_dominators`] with the graph's own entry
/// node.
///
/// # Errors
///
/// Same conditions as [`compute_dominators`].
pub fn compute_dominators_rooted<G: RootedGraph>(graph: &G) -> Result<Dominators> {
    compute_dominators(graph, graph.entry())
}

/// Collects the predecessors of `node` by scanning every node's successor
/// list.
///
/// O(V + E) per call; repeated edges contribute a single predecessor.
fn predecessors_of<G: Successors>(graph: &G, node: NodeId) -> Vec<NodeId> {
    let mut preds = Vec::new();
    for v in graph.node_ids() {
        for succ in graph.successors(v) {
            if succ == node {
                preds.push(v);
                break;
            }
        }
    }
    preds
}

/// Selects the immediate dominator of `node` from its finished dominator
/// set.
///
/// Over the candidate set `dom(node) \ {node}`, the immediate dominator is
/// the unique candidate that strictly dominates no other candidate (the
/// dominator closest to the node along the dominating chain). Candidates
/// are scanned in ascending index order; for a valid dominator set exactly
/// one qualifies, which is asserted.
fn extract_idom(dom_sets: &[Option<BitSet>], node: NodeId) -> Result<NodeId> {
    let Some(dom) = dom_sets[node.index()].as_ref() else {
        return Err(Error::GraphError(format!(
            "no dominator set computed for {node}"
        )));
    };

    let mut candidates = dom.clone();
    candidates.remove(node.index()); // idom(n) != n

    let mut selected: Option<NodeId> = None;
    for d in candidates.iter() {
        let dominates_other_candidate = candidates.iter().any(|d2| {
            d2 != d
                && dom_sets[d2]
                    .as_ref()
                    .is_some_and(|set| set.contains(d))
        });
        if dominates_other_candidate {
            continue;
        }

        match selected {
            None => selected = Some(NodeId::new(d)),
            Some(other) => {
                debug_assert!(
                    false,
                    "both {other} and n{d} qualify as immediate dominator of {node}"
                );
            }
        }
    }

    log::trace!("idom({node}) = {:?}", selected);
    selected.ok_or_else(|| {
        Error::GraphError(format!("no immediate dominator candidate for {node}"))
    })
}
