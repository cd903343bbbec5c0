//! The immutable Markov process graph and its chain view.
//!
//! The graph stores real nodes (base and user-epoch) in address order.
//! Seed and accumulator nodes are deterministic functions of the
//! participants and boundaries, so they are never stored: they occupy
//! known positions at the end of the canonical node order and are
//! synthesized on demand.

use std::collections::BTreeMap;

use credrank_core::gadgets::{core_node_kind, AccumulatorGadget, CoreNodeKind, SeedGadget};
use credrank_core::{
    MarkovEdge, MarkovEdgeAddress, MarkovNode, NodeAddress, Participant, TimeBoundary,
};

use crate::builder::{self, BuildArgs};
use crate::error::{GraphError, GraphResult};

/// A discrete-time Markov chain over contributions, user epochs, and the
/// structural seed/accumulator nodes. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkovProcessGraph {
    nodes: BTreeMap<NodeAddress, MarkovNode>,
    edges: BTreeMap<MarkovEdgeAddress, MarkovEdge>,
    participants: Vec<Participant>,
    epoch_boundaries: Vec<TimeBoundary>,
    full_order: Vec<NodeAddress>,
    index_of: BTreeMap<NodeAddress, usize>,
    in_edges: BTreeMap<NodeAddress, Vec<MarkovEdgeAddress>>,
}

impl MarkovProcessGraph {
    /// Build the graph from its inputs. See the builder phases in
    /// [`crate::builder`].
    pub fn new(args: BuildArgs<'_>) -> GraphResult<Self> {
        builder::build(args)
    }

    /// Assemble a graph from already-validated maps, deriving the canonical
    /// order and the in-neighbor index. Shared by the builder and the JSON
    /// decoder.
    pub(crate) fn from_parts(
        nodes: BTreeMap<NodeAddress, MarkovNode>,
        edges: BTreeMap<MarkovEdgeAddress, MarkovEdge>,
        participants: Vec<Participant>,
        epoch_boundaries: Vec<TimeBoundary>,
    ) -> GraphResult<Self> {
        let mut full_order: Vec<NodeAddress> = nodes.keys().cloned().collect();
        full_order.push(SeedGadget.to_raw());
        for &boundary in &epoch_boundaries {
            full_order.push(AccumulatorGadget.to_raw(boundary));
        }
        let index_of: BTreeMap<NodeAddress, usize> = full_order
            .iter()
            .enumerate()
            .map(|(i, a)| (a.clone(), i))
            .collect();
        if index_of.len() != full_order.len() {
            return Err(GraphError::Internal(
                "node order contains duplicate addresses".to_string(),
            ));
        }

        let mut in_edges: BTreeMap<NodeAddress, Vec<MarkovEdgeAddress>> = BTreeMap::new();
        for (markov_address, edge) in &edges {
            for endpoint in [&edge.src, &edge.dst] {
                if !index_of.contains_key(endpoint) {
                    return Err(GraphError::Internal(format!(
                        "edge endpoint not in node order: {}",
                        endpoint
                    )));
                }
            }
            let p = edge.transition_probability;
            if !p.is_finite() || !(0.0..=1.0).contains(&p) {
                return Err(GraphError::InvalidTransitionProbability {
                    address: markov_address.to_string(),
                    probability: p,
                });
            }
            in_edges
                .entry(edge.dst.clone())
                .or_default()
                .push(markov_address.clone());
        }

        Ok(Self {
            nodes,
            edges,
            participants,
            epoch_boundaries,
            full_order,
            index_of,
            in_edges,
        })
    }

    /// The canonical node order: real nodes sorted by address, then the
    /// seed, then one accumulator per boundary in boundary order.
    pub fn node_order(&self) -> &[NodeAddress] {
        &self.full_order
    }

    /// Position of `address` in the canonical node order.
    pub fn node_index(&self, address: &NodeAddress) -> Option<usize> {
        self.index_of.get(address).copied()
    }

    /// The node at `address`: stored if real, synthesized if virtual,
    /// `None` if absent.
    pub fn node(&self, address: &NodeAddress) -> Option<MarkovNode> {
        if let Some(node) = self.nodes.get(address) {
            return Some(node.clone());
        }
        match core_node_kind(address).ok()? {
            Some(CoreNodeKind::Seed) => Some(SeedGadget.node()),
            Some(CoreNodeKind::Accumulator(boundary))
                if self.epoch_boundaries.contains(&boundary) =>
            {
                Some(AccumulatorGadget.node(boundary))
            }
            _ => None,
        }
    }

    /// All nodes, lazily, in canonical node order.
    pub fn nodes(&self) -> impl Iterator<Item = MarkovNode> + '_ {
        self.full_order.iter().filter_map(|a| self.node(a))
    }

    /// Nodes whose address starts with `prefix`, lazily, in canonical node
    /// order.
    pub fn nodes_with_prefix<'a>(
        &'a self,
        prefix: &'a NodeAddress,
    ) -> impl Iterator<Item = MarkovNode> + 'a {
        self.full_order
            .iter()
            .filter(move |a| a.has_prefix(prefix))
            .filter_map(|a| self.node(a))
    }

    /// The canonical edge order: Markov edge addresses, sorted.
    pub fn edge_order(&self) -> impl Iterator<Item = &MarkovEdgeAddress> {
        self.edges.keys()
    }

    /// The edge at `address`, if present.
    pub fn edge(&self, address: &MarkovEdgeAddress) -> Option<&MarkovEdge> {
        self.edges.get(address)
    }

    /// All edges, in canonical edge order.
    pub fn edges(&self) -> impl Iterator<Item = &MarkovEdge> {
        self.edges.values()
    }

    /// Edges whose destination is `address`, lazily.
    pub fn in_neighbors<'a>(
        &'a self,
        address: &NodeAddress,
    ) -> impl Iterator<Item = &'a MarkovEdge> + 'a {
        self.in_edges
            .get(address)
            .into_iter()
            .flatten()
            .filter_map(|markov_address| self.edges.get(markov_address))
    }

    /// The scoring participants, in their original order.
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// The boundary sequence, sentinels included.
    pub fn epoch_boundaries(&self) -> &[TimeBoundary] {
        &self.epoch_boundaries
    }

    /// Stored (real) nodes in address order. Virtual nodes are excluded.
    pub(crate) fn real_nodes(&self) -> impl Iterator<Item = &MarkovNode> {
        self.nodes.values()
    }

    /// Number of nodes in the canonical order, virtual nodes included.
    pub fn node_count(&self) -> usize {
        self.full_order.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}
