//! Nodes and edges of the Markov process graph.

use serde::{Deserialize, Serialize};

use crate::address::{EdgeAddress, MarkovEdgeAddress, NodeAddress};

/// A node of the Markov process graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkovNode {
    /// Unique address within the graph.
    pub address: NodeAddress,
    /// Free-form text for reporting.
    pub description: String,
    /// Non-negative flow sourced from the seed node. Zero for structural
    /// nodes and for nodes not eligible to mint.
    pub mint: f64,
}

/// A directed edge of the Markov process graph.
///
/// Input edges contribute both directions when weighted; `reversed`
/// records which direction this entry is. Structural edges synthesized by
/// gadgets are never reversed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkovEdge {
    /// The input edge address, or a gadget-generated structural address.
    pub address: EdgeAddress,
    /// Whether this entry is the reversed direction of its input edge.
    pub reversed: bool,
    /// Source node address.
    pub src: NodeAddress,
    /// Destination node address.
    pub dst: NodeAddress,
    /// Transition probability in [0, 1].
    pub transition_probability: f64,
}

impl MarkovEdge {
    /// The Markov edge address keying this edge.
    pub fn markov_address(&self) -> MarkovEdgeAddress {
        markov_edge_address(&self.address, self.reversed)
    }
}

/// Derive the unique Markov edge address for `(address, reversed)`: the
/// edge address parts qualified by a leading direction marker.
pub fn markov_edge_address(address: &EdgeAddress, reversed: bool) -> MarkovEdgeAddress {
    let direction = if reversed { "B" } else { "F" };
    let mut parts = Vec::with_capacity(address.len() + 1);
    parts.push(direction.to_string());
    parts.extend(address.parts().iter().cloned());
    MarkovEdgeAddress::from_valid_parts(parts)
}
