// Copyright 2026 flowdom contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![deny(missing_docs)]
#![allow(dead_code)]

//! # flowdom
//!
//! Control flow graph normalization and dominator/postdominator tree
//! analysis.
//!
//! `flowdom` ingests an adjacency-list description of a directed graph
//! (typically a control flow graph), normalizes it into a
//! single-entry/single-exit DAG, verifies acyclicity, and derives the two
//! dominance artifacts used pervasively in compiler construction: the
//! dominator tree and the postdominator tree. Dominators are computed with
//! the classical topological-order iterative dominator-set algorithm -
//! deliberately simple and obviously correct rather than asymptotically
//! optimal.
//!
//! ## Quick Start
//!
//! ```rust
//! use flowdom::ControlFlowGraph;
//!
//! // 3 branches to 5, 7 and 2; 5 and 7 rejoin at 9.
//! // 2 and 9 are implicit leaves the normalizer materializes.
//! let cfg = ControlFlowGraph::from_adjacency([
//!     (3, vec![5, 7, 2]),
//!     (5, vec![9]),
//!     (7, vec![9]),
//! ])?;
//!
//! let doms = cfg.dominator_tree()?;
//!
//! // 9 is reached through both 5 and 7, so its immediate dominator is 3
//! let join = doms.node_of(9).unwrap();
//! assert_eq!(doms.block(doms.parent(join).unwrap()), Some(3));
//!
//! // Both trees serialize to Graphviz DOT for inspection
//! println!("{}", doms.to_dot(Some("dominator tree")));
//! # Ok::<(), flowdom::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`analysis::cfg`] - the domain layer: normalization
//!   ([`ControlFlowGraph::from_adjacency`]), graph reversal, dominance
//!   tree assembly, and the export surface (adjacency enumeration and DOT
//!   emission)
//! - [`utils::graph`] - the graph store and algorithms: adjacency-list
//!   arena, cycle-checked traversal, iterative dominator computation
//! - [`Error`] and [`Result`] - the error taxonomy; a cyclic input aborts
//!   an analysis run with no partial result
//!
//! ## Scope
//!
//! Parsing text into an adjacency list, file output, and process wiring
//! belong to the surrounding application. The crate consumes a finished
//! node/edge collection and exposes finished node/edge collections (plus
//! DOT text) back; the pipeline is single-threaded, synchronous, and free
//! of recursion.
//!
//! ## Logging
//!
//! The library emits trace/debug events through the [`log`] facade at the
//! decision points of normalization and dominance computation. Install any
//! `log`-compatible logger (e.g. `env_logger`) in the consuming
//! application to see them; the library never initializes logging itself.

#[macro_use]
pub(crate) mod error;

pub mod analysis;
pub mod prelude;
pub mod utils;

/// `flowdom` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type
/// is always [`Error`]. Used consistently throughout the crate for all
/// fallible operations.
pub type Result<T> = std::result::Result<T, Error>;

/// `flowdom` Error type
///
/// The main error type for all operations in this crate. See the variant
/// documentation for the failure taxonomy; every error is terminal for the
/// analysis run that produced it.
pub use error::Error;

/// The normalized single-entry/single-exit control flow graph.
///
/// See [`analysis::cfg::ControlFlowGraph`] for construction and the
/// analysis entry points.
pub use analysis::cfg::ControlFlowGraph;

/// An assembled dominator or postdominator tree.
///
/// See [`analysis::cfg::DominanceTree`].
pub use analysis::cfg::DominanceTree;

/// External block identifier carried as node data.
pub use analysis::cfg::BlockId;
