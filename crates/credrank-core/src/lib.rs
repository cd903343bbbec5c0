#![deny(deprecated)]

//! CredRank Core Library
//!
//! Domain types and pure algebra for the CredRank engine:
//!
//! - Address algebra: [`NodeAddress`], [`EdgeAddress`], [`MarkovEdgeAddress`]
//! - Structural gadgets (the single source of truth for reserved-namespace
//!   addresses): [`gadgets`]
//! - Weight configuration and evaluators: [`weights`]
//! - Time boundaries and intervals: [`time`]
//! - Participants, Markov nodes and edges, and the input weighted graph
//!
//! The engine itself (graph builder, chain view, cred graph) lives in
//! `credrank-graph`; this crate has no construction logic beyond
//! validation.

pub mod address;
pub mod error;
pub mod gadgets;
pub mod graph;
pub mod markov;
pub mod params;
pub mod participant;
pub mod time;
pub mod weights;

// Re-exports for convenience
pub use address::{EdgeAddress, MarkovEdgeAddress, NodeAddress};
pub use error::{CoreError, CoreResult};
pub use graph::{GraphEdge, GraphNode, WeightedGraph};
pub use markov::{markov_edge_address, MarkovEdge, MarkovNode};
pub use params::Parameters;
pub use participant::{Participant, ParticipantId};
pub use time::{Interval, TimeBoundary};
pub use weights::{EdgeWeight, Weights};
