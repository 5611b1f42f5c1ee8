use thiserror::Error;

use crate::utils::graph::NodeId;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::MalformedReference {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::MalformedReference {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this
/// library can potentially return.
///
/// Every failure is detected close to its source - graph construction or
/// traversal time - and surfaced as a terminal result for that analysis
/// run. There is no retry or partial-recovery path: a cyclic or malformed
/// graph has no well-defined dominance relation, so no partial artifact is
/// ever produced.
///
/// # Error Categories
///
/// - [`Error::Cycle`] - the input graph is not acyclic
/// - [`Error::MalformedReference`] - a successor id resolves to no node
/// - [`Error::GraphError`] - arena preconditions or internal defects
///
/// # Examples
///
/// ```rust
/// use flowdom::{ControlFlowGraph, Error};
///
/// let result = ControlFlowGraph::from_adjacency([(1, vec![2]), (2, vec![1])])
///     .and_then(|cfg| cfg.dominator_tree());
///
/// match result {
///     Err(Error::Cycle { node }) => eprintln!("not a DAG, back edge at {node}"),
///     Err(e) => eprintln!("analysis failed: {e}"),
///     Ok(_) => unreachable!("1 <-> 2 is cyclic"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// A back edge was found during depth-first traversal.
    ///
    /// The dominance relation is only defined for acyclic graphs; a cycle
    /// is fatal to the current analysis run and no partial order or
    /// dominator result is returned. The carried node is the in-progress
    /// node that was re-entered.
    #[error("Cycle detected at node {node}")]
    Cycle {
        /// The node at which the traversal re-entered an in-progress node
        node: NodeId,
    },

    /// A successor id does not resolve to any materialized node.
    ///
    /// The normalizer materializes every id that appears anywhere as a
    /// successor before analysis begins, so this error indicates a broken
    /// precondition rather than ordinary bad input. The error includes the
    /// source location where the dangling reference was detected.
    ///
    /// # Fields
    ///
    /// * `message` - Description of the dangling reference
    /// * `file` - Source file in which the error was detected
    /// * `line` - Source line in which the error was detected
    #[error("Malformed reference - {file}:{line}: {message}")]
    MalformedReference {
        /// The message to be printed for the malformed reference
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// Graph arena or dominance-engine error.
    ///
    /// Raised when an edge references a node outside the arena, or when
    /// immediate-dominator extraction finds an internally inconsistent
    /// dominator set (a defect, not an input condition).
    #[error("{0}")]
    GraphError(String),
}
