//! Sparse Markov chain export.
//!
//! The chain enumerates, per node, its *in*-edges: parallel arrays of
//! source indices into the node order and transition probabilities. This
//! is the shape an external eigensolver consumes; the engine defines the
//! chain and leaves convergence strategy to the solver.

use serde::{Deserialize, Serialize};

use credrank_core::NodeAddress;

use crate::error::{GraphError, GraphResult};
use crate::graph::MarkovProcessGraph;

/// Tolerance for the out-transition sum check performed before export.
pub const OUT_MASS_TOLERANCE: f64 = 1e-3;

/// In-edges of one node: `neighbor[i]` is the index of the i-th source in
/// the node order, `weight[i]` its transition probability. The two arrays
/// always have equal length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparseChainEntry {
    /// Source indices into the node order.
    pub neighbor: Vec<u32>,
    /// Transition probabilities, aligned with `neighbor`.
    pub weight: Vec<f64>,
}

/// The sparse chain: the canonical node order plus one in-edge entry per
/// node, aligned with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparseMarkovChain {
    /// The canonical node order the entries are indexed against.
    pub node_order: Vec<NodeAddress>,
    /// One in-edge entry per node, in node order.
    pub entries: Vec<SparseChainEntry>,
}

impl MarkovProcessGraph {
    /// Export the sparse chain.
    ///
    /// Verifies that every node's outgoing probabilities sum to 1 within
    /// [`OUT_MASS_TOLERANCE`] first; a violation is fatal and names the
    /// offending node.
    ///
    /// Duplicate and parallel edges stay distinct entries; no grouping by
    /// source happens here.
    pub fn to_sparse_chain(&self) -> GraphResult<SparseMarkovChain> {
        let node_order: Vec<NodeAddress> = self.node_order().to_vec();
        let mut out_mass = vec![0.0f64; node_order.len()];
        let mut entries: Vec<SparseChainEntry> = node_order
            .iter()
            .map(|_| SparseChainEntry {
                neighbor: Vec::new(),
                weight: Vec::new(),
            })
            .collect();

        for edge in self.edges() {
            let src = self
                .node_index(&edge.src)
                .ok_or_else(|| GraphError::Internal(format!("unindexed source: {}", edge.src)))?;
            let dst = self
                .node_index(&edge.dst)
                .ok_or_else(|| {
                    GraphError::Internal(format!("unindexed destination: {}", edge.dst))
                })?;
            out_mass[src] += edge.transition_probability;
            entries[dst].neighbor.push(src as u32);
            entries[dst].weight.push(edge.transition_probability);
        }

        for (index, mass) in out_mass.iter().enumerate() {
            if (mass - 1.0).abs() > OUT_MASS_TOLERANCE {
                return Err(GraphError::SumCheckViolation {
                    address: node_order[index].to_string(),
                    mass: *mass,
                });
            }
        }

        Ok(SparseMarkovChain {
            node_order,
            entries,
        })
    }
}

impl SparseMarkovChain {
    /// Number of nodes in the chain.
    pub fn len(&self) -> usize {
        self.node_order.len()
    }

    /// Whether the chain has no nodes.
    pub fn is_empty(&self) -> bool {
        self.node_order.is_empty()
    }
}
