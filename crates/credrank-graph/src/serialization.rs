//! Versioned JSON documents for the Markov process graph.
//!
//! # Format
//!
//! ```text
//! {
//!   "type": "sourcecred/markovProcessGraph",
//!   "version": "0.1.0",
//!   "payload": {
//!     "sortedNodes": [{"address": [...], "description": "...", "mint": 0.0}, ...],
//!     "indexedEdges": [{"address": [...], "reversed": false,
//!                       "src": 0, "dst": 1, "transitionProbability": 0.5}, ...],
//!     "participants": [...],
//!     "finiteEpochBoundaries": [0, 604800000, ...]
//!   }
//! }
//! ```
//!
//! `sortedNodes` holds the real nodes in address order; the infinite
//! boundary sentinels and the virtual nodes are omitted. Edge endpoints
//! are indices into the *full* node order, which the decoder reconstructs
//! deterministically by re-inserting the sentinels and regenerating the
//! virtual addresses. Output is a byte-wise function of the graph.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use credrank_core::gadgets::{AccumulatorGadget, SeedGadget};
use credrank_core::{
    markov_edge_address, EdgeAddress, MarkovEdge, MarkovNode, NodeAddress, Participant,
    TimeBoundary,
};

use crate::error::{GraphError, GraphResult};
use crate::graph::MarkovProcessGraph;

/// Type tag of a Markov process graph document.
pub const MARKOV_PROCESS_GRAPH_TYPE: &str = "sourcecred/markovProcessGraph";
/// Version a Markov process graph document must report.
pub const MARKOV_PROCESS_GRAPH_VERSION: &str = "0.1.0";

/// The versioned envelope every document family shares.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Envelope<P> {
    #[serde(rename = "type")]
    pub doc_type: String,
    pub version: String,
    pub payload: P,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IndexedEdge {
    address: EdgeAddress,
    reversed: bool,
    src: u32,
    dst: u32,
    transition_probability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MarkovProcessGraphPayload {
    sorted_nodes: Vec<MarkovNode>,
    indexed_edges: Vec<IndexedEdge>,
    participants: Vec<Participant>,
    finite_epoch_boundaries: Vec<i64>,
}

pub(crate) fn check_envelope(
    doc_type: &str,
    version: &str,
    expected_type: &str,
    expected_version: &str,
) -> GraphResult<()> {
    if doc_type != expected_type {
        return Err(GraphError::MalformedDocument {
            message: format!("expected type {}, got {}", expected_type, doc_type),
        });
    }
    if version != expected_version {
        return Err(GraphError::VersionMismatch {
            expected: expected_version.to_string(),
            actual: version.to_string(),
        });
    }
    Ok(())
}

impl MarkovProcessGraph {
    pub(crate) fn to_payload(&self) -> GraphResult<MarkovProcessGraphPayload> {
        let sorted_nodes: Vec<MarkovNode> = self.real_nodes().cloned().collect();
        let mut indexed_edges = Vec::with_capacity(self.edge_count());
        for edge in self.edges() {
            let src = self
                .node_index(&edge.src)
                .ok_or_else(|| GraphError::Internal(format!("unindexed source: {}", edge.src)))?;
            let dst = self
                .node_index(&edge.dst)
                .ok_or_else(|| {
                    GraphError::Internal(format!("unindexed destination: {}", edge.dst))
                })?;
            indexed_edges.push(IndexedEdge {
                address: edge.address.clone(),
                reversed: edge.reversed,
                src: src as u32,
                dst: dst as u32,
                transition_probability: edge.transition_probability,
            });
        }
        let finite_epoch_boundaries: Vec<i64> = self
            .epoch_boundaries()
            .iter()
            .filter_map(|b| b.finite())
            .collect();
        Ok(MarkovProcessGraphPayload {
            sorted_nodes,
            indexed_edges,
            participants: self.participants().to_vec(),
            finite_epoch_boundaries,
        })
    }

    pub(crate) fn from_payload(payload: MarkovProcessGraphPayload) -> GraphResult<Self> {
        let MarkovProcessGraphPayload {
            sorted_nodes,
            indexed_edges,
            participants,
            finite_epoch_boundaries,
        } = payload;

        let mut epoch_boundaries = Vec::with_capacity(finite_epoch_boundaries.len() + 2);
        epoch_boundaries.push(TimeBoundary::NegInfinity);
        epoch_boundaries.extend(finite_epoch_boundaries.into_iter().map(TimeBoundary::Finite));
        epoch_boundaries.push(TimeBoundary::PosInfinity);

        // The document's own node order: its real nodes, then the
        // regenerated virtual addresses, matching the encoder's layout.
        let mut order: Vec<NodeAddress> =
            sorted_nodes.iter().map(|n| n.address.clone()).collect();
        order.push(SeedGadget.to_raw());
        for &boundary in &epoch_boundaries {
            order.push(AccumulatorGadget.to_raw(boundary));
        }

        let mut nodes: BTreeMap<NodeAddress, MarkovNode> = BTreeMap::new();
        for node in sorted_nodes {
            if nodes.insert(node.address.clone(), node.clone()).is_some() {
                return Err(GraphError::NodeConflict {
                    address: node.address.to_string(),
                });
            }
        }

        let resolve = |index: u32| -> GraphResult<NodeAddress> {
            order
                .get(index as usize)
                .cloned()
                .ok_or_else(|| GraphError::MalformedDocument {
                    message: format!(
                        "edge endpoint index {} out of range ({} nodes)",
                        index,
                        order.len()
                    ),
                })
        };

        let mut edges = BTreeMap::new();
        for indexed in indexed_edges {
            let edge = MarkovEdge {
                src: resolve(indexed.src)?,
                dst: resolve(indexed.dst)?,
                address: indexed.address,
                reversed: indexed.reversed,
                transition_probability: indexed.transition_probability,
            };
            let markov_address = markov_edge_address(&edge.address, edge.reversed);
            if edges.insert(markov_address.clone(), edge).is_some() {
                return Err(GraphError::EdgeConflict {
                    address: markov_address.to_string(),
                });
            }
        }

        Self::from_parts(nodes, edges, participants, epoch_boundaries)
    }

    /// Encode as a versioned JSON value.
    pub fn to_json_value(&self) -> GraphResult<serde_json::Value> {
        let envelope = Envelope {
            doc_type: MARKOV_PROCESS_GRAPH_TYPE.to_string(),
            version: MARKOV_PROCESS_GRAPH_VERSION.to_string(),
            payload: self.to_payload()?,
        };
        serde_json::to_value(&envelope).map_err(|e| GraphError::MalformedDocument {
            message: e.to_string(),
        })
    }

    /// Encode as a JSON string. The bytes are a stable function of the
    /// graph.
    pub fn to_json_string(&self) -> GraphResult<String> {
        let envelope = Envelope {
            doc_type: MARKOV_PROCESS_GRAPH_TYPE.to_string(),
            version: MARKOV_PROCESS_GRAPH_VERSION.to_string(),
            payload: self.to_payload()?,
        };
        serde_json::to_string(&envelope).map_err(|e| GraphError::MalformedDocument {
            message: e.to_string(),
        })
    }

    /// Decode a versioned JSON value.
    ///
    /// # Errors
    ///
    /// [`GraphError::VersionMismatch`] for an unknown version,
    /// [`GraphError::MalformedDocument`] for a wrong type tag, an
    /// undecodable payload, or an unresolvable endpoint index.
    pub fn from_json_value(value: serde_json::Value) -> GraphResult<Self> {
        let envelope: Envelope<serde_json::Value> =
            serde_json::from_value(value).map_err(|e| GraphError::MalformedDocument {
                message: e.to_string(),
            })?;
        check_envelope(
            &envelope.doc_type,
            &envelope.version,
            MARKOV_PROCESS_GRAPH_TYPE,
            MARKOV_PROCESS_GRAPH_VERSION,
        )?;
        let payload: MarkovProcessGraphPayload = serde_json::from_value(envelope.payload)
            .map_err(|e| GraphError::MalformedDocument {
                message: e.to_string(),
            })?;
        trace!(
            node_count = payload.sorted_nodes.len(),
            edge_count = payload.indexed_edges.len(),
            "decoding markov process graph document"
        );
        Self::from_payload(payload)
    }

    /// Decode a versioned JSON string.
    pub fn from_json_str(json: &str) -> GraphResult<Self> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| GraphError::MalformedDocument {
                message: e.to_string(),
            })?;
        Self::from_json_value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrong_type_is_malformed() {
        let doc = serde_json::json!({
            "type": "sourcecred/somethingElse",
            "version": "0.1.0",
            "payload": {}
        });
        let err = MarkovProcessGraph::from_json_value(doc).unwrap_err();
        assert!(matches!(err, GraphError::MalformedDocument { .. }));
    }

    #[test]
    fn test_wrong_version_is_version_mismatch() {
        let doc = serde_json::json!({
            "type": "sourcecred/markovProcessGraph",
            "version": "9.9.9",
            "payload": {}
        });
        let err = MarkovProcessGraph::from_json_value(doc).unwrap_err();
        match err {
            GraphError::VersionMismatch { expected, actual } => {
                assert_eq!(expected, "0.1.0");
                assert_eq!(actual, "9.9.9");
            }
            other => panic!("expected VersionMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_out_of_range_index_is_malformed() {
        let doc = serde_json::json!({
            "type": "sourcecred/markovProcessGraph",
            "version": "0.1.0",
            "payload": {
                "sortedNodes": [
                    {"address": ["a"], "description": "a", "mint": 1.0}
                ],
                "indexedEdges": [
                    {"address": ["e"], "reversed": false,
                     "src": 99, "dst": 0, "transitionProbability": 1.0}
                ],
                "participants": [],
                "finiteEpochBoundaries": []
            }
        });
        let err = MarkovProcessGraph::from_json_value(doc).unwrap_err();
        assert!(matches!(err, GraphError::MalformedDocument { .. }));
    }

    #[test]
    fn test_garbage_payload_is_malformed() {
        let err = MarkovProcessGraph::from_json_str("{\"nope\": true}").unwrap_err();
        assert!(matches!(err, GraphError::MalformedDocument { .. }));
        let err = MarkovProcessGraph::from_json_str("not json at all").unwrap_err();
        assert!(matches!(err, GraphError::MalformedDocument { .. }));
    }
}
