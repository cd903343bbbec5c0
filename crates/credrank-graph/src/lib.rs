#![deny(deprecated)]

//! CredRank Engine
//!
//! Builds a discrete-time Markov chain from a weighted, timestamped
//! contribution graph, a set of scoring participants, and an ordered
//! interval sequence, then overlays an externally computed stationary
//! distribution to assign cred to every node and every per-participant
//! epoch.
//!
//! # Architecture
//!
//! - **builder**: phased construction enforcing the budget invariants
//! - **graph**: the immutable chain view (iteration, in-neighbors,
//!   virtual-node synthesis)
//! - **sparse**: the `(node_order, in-edges)` export an eigensolver
//!   consumes
//! - **serialization**: versioned JSON documents with stable bytes
//! - **cred**: the score overlay and per-participant reporting
//! - **error**: `GraphError` and `GraphResult`
//!
//! The eigensolver itself is a collaborator, not part of this crate: the
//! engine defines the chain it is handed and leaves convergence strategy
//! to the caller.
//!
//! # Example
//!
//! ```
//! use credrank_core::{Interval, Parameters, Weights, WeightedGraph};
//! use credrank_graph::{BuildArgs, MarkovProcessGraph};
//!
//! # fn main() -> Result<(), credrank_graph::GraphError> {
//! let weighted_graph = WeightedGraph::new(
//!     vec![credrank_core::GraphNode {
//!         address: credrank_core::NodeAddress::from_parts(["repo"]).unwrap(),
//!         description: "repo".to_string(),
//!     }],
//!     vec![],
//!     Weights::default(),
//! );
//! let graph = MarkovProcessGraph::new(BuildArgs {
//!     weighted_graph: &weighted_graph,
//!     participants: &[],
//!     intervals: &[Interval { start_time_ms: 0, end_time_ms: 10 }],
//!     parameters: Parameters {
//!         alpha: 0.1,
//!         beta: 0.2,
//!         gamma_forward: 0.1,
//!         gamma_backward: 0.1,
//!     },
//! })?;
//! let chain = graph.to_sparse_chain()?;
//! assert_eq!(chain.len(), graph.node_order().len());
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod cred;
pub mod error;
pub mod graph;
pub mod serialization;
pub mod sparse;

// Re-exports for convenience
pub use builder::BuildArgs;
pub use cred::{CredEdge, CredGraph, CredNode, ParticipantCred};
pub use error::{GraphError, GraphResult};
pub use graph::MarkovProcessGraph;
pub use sparse::{SparseChainEntry, SparseMarkovChain, OUT_MASS_TOLERANCE};
