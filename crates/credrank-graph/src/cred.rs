//! Cred graph: stationary scores bound onto the chain.
//!
//! The score vector comes from an external eigensolver and is aligned to
//! the canonical node order. Once bound, nodes carry `cred`, edges carry
//! `cred_flow = cred(src) * transition_probability`, and participants
//! report one cred entry per epoch boundary (the flow of their payout
//! edge) plus the total.

use serde::{Deserialize, Serialize};

use credrank_core::gadgets::{PayoutGadget, UserEpoch};
use credrank_core::{markov_edge_address, MarkovEdge, MarkovNode, NodeAddress, Participant};

use crate::error::{GraphError, GraphResult};
use crate::graph::MarkovProcessGraph;
use crate::serialization::{check_envelope, Envelope, MarkovProcessGraphPayload};

/// Type tag of a cred graph document.
pub const CRED_GRAPH_TYPE: &str = "sourcecred/credGraph";
/// Version a cred graph document must report.
pub const CRED_GRAPH_VERSION: &str = "0.1.0";

/// A node together with its cred.
#[derive(Debug, Clone, PartialEq)]
pub struct CredNode {
    /// The underlying Markov node.
    pub node: MarkovNode,
    /// Stationary probability mass accumulated by the node.
    pub cred: f64,
}

/// An edge together with its steady-state flow.
#[derive(Debug, Clone, PartialEq)]
pub struct CredEdge<'a> {
    /// The underlying Markov edge.
    pub edge: &'a MarkovEdge,
    /// Per-step mass traversing the edge: `cred(src) * p`.
    pub cred_flow: f64,
}

/// A participant's cred, per epoch and in total.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticipantCred {
    /// The participant.
    pub participant: Participant,
    /// Payout-edge cred flow at each epoch boundary, in boundary order.
    pub cred_per_epoch: Vec<f64>,
    /// Sum of `cred_per_epoch`.
    pub cred: f64,
}

/// The chain plus its stationary score vector. Immutable.
#[derive(Debug, Clone, PartialEq)]
pub struct CredGraph {
    graph: MarkovProcessGraph,
    scores: Vec<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CredGraphPayload {
    mpg: Envelope<MarkovProcessGraphPayload>,
    scores: Vec<f64>,
}

impl CredGraph {
    /// Bind `scores` (in canonical node order) onto `graph`.
    ///
    /// # Errors
    ///
    /// [`GraphError::ScoreMismatch`] if the vector length does not match
    /// the node order; [`GraphError::InvalidScore`] for a negative or
    /// non-finite entry.
    pub fn new(graph: MarkovProcessGraph, scores: Vec<f64>) -> GraphResult<Self> {
        if scores.len() != graph.node_count() {
            return Err(GraphError::ScoreMismatch {
                expected: graph.node_count(),
                actual: scores.len(),
            });
        }
        for (index, &value) in scores.iter().enumerate() {
            if !value.is_finite() || value < 0.0 {
                return Err(GraphError::InvalidScore { index, value });
            }
        }
        Ok(Self { graph, scores })
    }

    /// The underlying chain.
    pub fn graph(&self) -> &MarkovProcessGraph {
        &self.graph
    }

    /// The score vector, in canonical node order.
    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    /// The cred of the node at `address`, if present.
    pub fn cred(&self, address: &NodeAddress) -> Option<f64> {
        self.graph
            .node_index(address)
            .map(|index| self.scores[index])
    }

    /// The node at `address` with its cred.
    pub fn node(&self, address: &NodeAddress) -> Option<CredNode> {
        let node = self.graph.node(address)?;
        let cred = self.cred(address)?;
        Some(CredNode { node, cred })
    }

    /// All nodes with cred, lazily, in canonical node order.
    pub fn nodes(&self) -> impl Iterator<Item = CredNode> + '_ {
        self.graph
            .nodes()
            .zip(self.scores.iter())
            .map(|(node, &cred)| CredNode { node, cred })
    }

    /// All edges with cred flow, in canonical edge order.
    pub fn edges(&self) -> impl Iterator<Item = CredEdge<'_>> {
        self.graph.edges().filter_map(move |edge| {
            let cred = self.cred(&edge.src)?;
            Some(CredEdge {
                edge,
                cred_flow: cred * edge.transition_probability,
            })
        })
    }

    /// Edges into `address` with cred flow, lazily.
    pub fn in_neighbors<'a>(
        &'a self,
        address: &NodeAddress,
    ) -> impl Iterator<Item = CredEdge<'a>> + 'a {
        self.graph.in_neighbors(address).filter_map(move |edge| {
            let cred = self.cred(&edge.src)?;
            Some(CredEdge {
                edge,
                cred_flow: cred * edge.transition_probability,
            })
        })
    }

    /// Per-participant cred: the payout-edge flow at every epoch boundary
    /// and the total.
    ///
    /// # Errors
    ///
    /// [`GraphError::Internal`] if a payout edge the time skeleton must
    /// have produced is missing.
    pub fn participants(&self) -> GraphResult<Vec<ParticipantCred>> {
        let mut result = Vec::with_capacity(self.graph.participants().len());
        for participant in self.graph.participants().to_vec() {
            let mut cred_per_epoch = Vec::with_capacity(self.graph.epoch_boundaries().len());
            for &epoch_start in self.graph.epoch_boundaries() {
                let key = UserEpoch {
                    owner: participant.id,
                    epoch_start,
                };
                let address = markov_edge_address(&PayoutGadget.to_raw(key), false);
                let edge = self.graph.edge(&address).ok_or_else(|| {
                    GraphError::Internal(format!("missing payout edge: {}", address))
                })?;
                let cred = self.cred(&edge.src).ok_or_else(|| {
                    GraphError::Internal(format!("missing payout source: {}", edge.src))
                })?;
                cred_per_epoch.push(cred * edge.transition_probability);
            }
            let cred = cred_per_epoch.iter().sum();
            result.push(ParticipantCred {
                participant,
                cred_per_epoch,
                cred,
            });
        }
        Ok(result)
    }

    /// Encode as a versioned JSON string: the chain's own document under
    /// `mpg` plus the score vector under `scores`.
    pub fn to_json_string(&self) -> GraphResult<String> {
        let envelope = Envelope {
            doc_type: CRED_GRAPH_TYPE.to_string(),
            version: CRED_GRAPH_VERSION.to_string(),
            payload: CredGraphPayload {
                mpg: Envelope {
                    doc_type: crate::serialization::MARKOV_PROCESS_GRAPH_TYPE.to_string(),
                    version: crate::serialization::MARKOV_PROCESS_GRAPH_VERSION.to_string(),
                    payload: self.graph.to_payload()?,
                },
                scores: self.scores.clone(),
            },
        };
        serde_json::to_string(&envelope).map_err(|e| GraphError::MalformedDocument {
            message: e.to_string(),
        })
    }

    /// Decode a versioned JSON string.
    pub fn from_json_str(json: &str) -> GraphResult<Self> {
        let envelope: Envelope<serde_json::Value> =
            serde_json::from_str(json).map_err(|e| GraphError::MalformedDocument {
                message: e.to_string(),
            })?;
        check_envelope(
            &envelope.doc_type,
            &envelope.version,
            CRED_GRAPH_TYPE,
            CRED_GRAPH_VERSION,
        )?;
        let payload: CredGraphPayload =
            serde_json::from_value(envelope.payload).map_err(|e| GraphError::MalformedDocument {
                message: e.to_string(),
            })?;
        check_envelope(
            &payload.mpg.doc_type,
            &payload.mpg.version,
            crate::serialization::MARKOV_PROCESS_GRAPH_TYPE,
            crate::serialization::MARKOV_PROCESS_GRAPH_VERSION,
        )?;
        let graph = MarkovProcessGraph::from_payload(payload.mpg.payload)?;
        Self::new(graph, payload.scores)
    }
}
