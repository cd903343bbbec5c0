//! The input weighted contribution graph.
//!
//! This is the boundary type handed to the graph builder by the plugin
//! ecosystem. Edge iteration skips dangling entries (edges whose endpoints
//! are not both present), mirroring the upstream contract of querying with
//! dangling edges hidden.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::address::{EdgeAddress, NodeAddress};
use crate::weights::Weights;

/// A node of the input contribution graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Unique address within the input graph.
    pub address: NodeAddress,
    /// Free-form text for reporting.
    pub description: String,
}

/// A timestamped edge of the input contribution graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    /// Unique address within the input graph.
    pub address: EdgeAddress,
    /// Source node address.
    pub src: NodeAddress,
    /// Destination node address.
    pub dst: NodeAddress,
    /// Creation time, in milliseconds since the Unix epoch.
    pub timestamp_ms: i64,
}

/// The weighted contribution graph: nodes, timestamped edges, and the
/// weight configuration consumed by the evaluators.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeightedGraph {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    node_addresses: BTreeSet<NodeAddress>,
    /// Weight configuration for nodes and edges.
    pub weights: Weights,
}

impl WeightedGraph {
    /// Assemble a weighted graph from its parts.
    pub fn new(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>, weights: Weights) -> Self {
        let node_addresses = nodes.iter().map(|n| n.address.clone()).collect();
        Self {
            nodes,
            edges,
            node_addresses,
            weights,
        }
    }

    /// Look up a node by address.
    pub fn node(&self, address: &NodeAddress) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| &n.address == address)
    }

    /// Whether a node with `address` is present.
    pub fn contains_node(&self, address: &NodeAddress) -> bool {
        self.node_addresses.contains(address)
    }

    /// All nodes, in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter()
    }

    /// Non-dangling edges, in insertion order. Edges referencing a missing
    /// endpoint are skipped.
    pub fn edges(&self) -> impl Iterator<Item = &GraphEdge> {
        self.edges
            .iter()
            .filter(move |e| {
                self.node_addresses.contains(&e.src) && self.node_addresses.contains(&e.dst)
            })
    }
}
