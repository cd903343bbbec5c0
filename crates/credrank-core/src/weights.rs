//! Weight configuration and evaluators.
//!
//! Weights are keyed by address and inherit by prefix: evaluating an
//! address multiplies every entry whose key is a prefix of it, starting
//! from 1.0. An address matching no entry therefore weighs 1.0, and a
//! prefix entry of 0.0 silences a whole subtree.
//!
//! Evaluation is pure; the evaluators borrow the tables and hold no
//! mutable state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::address::{EdgeAddress, NodeAddress};
use crate::error::{CoreError, CoreResult};

/// Weight of an edge in each direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeWeight {
    /// Weight of the edge in its stated direction.
    pub forwards: f64,
    /// Weight of the edge against its stated direction.
    pub backwards: f64,
}

/// Weight configuration carried by a weighted graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Weights {
    /// Per-address node weights, inherited by prefix.
    pub node_weights: BTreeMap<NodeAddress, f64>,
    /// Per-address edge weights, inherited by prefix.
    pub edge_weights: BTreeMap<EdgeAddress, EdgeWeight>,
}

impl Weights {
    /// A node-weight evaluator over this configuration.
    pub fn node_evaluator(&self) -> NodeWeightEvaluator<'_> {
        NodeWeightEvaluator { weights: self }
    }

    /// An edge-weight evaluator over this configuration.
    pub fn edge_evaluator(&self) -> EdgeWeightEvaluator<'_> {
        EdgeWeightEvaluator { weights: self }
    }
}

/// Reduces node addresses to scalar weights.
#[derive(Debug, Clone, Copy)]
pub struct NodeWeightEvaluator<'a> {
    weights: &'a Weights,
}

impl NodeWeightEvaluator<'_> {
    /// The weight of `address`: the product of every matching prefix entry.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidNodeWeight`] if any contributing entry,
    /// or the resulting product, is negative or non-finite.
    pub fn node_weight(&self, address: &NodeAddress) -> CoreResult<f64> {
        let mut weight = 1.0;
        for (prefix, w) in &self.weights.node_weights {
            if address.has_prefix(prefix) {
                if !w.is_finite() || *w < 0.0 {
                    return Err(CoreError::InvalidNodeWeight {
                        address: prefix.to_string(),
                        weight: *w,
                    });
                }
                weight *= w;
            }
        }
        if !weight.is_finite() {
            return Err(CoreError::InvalidNodeWeight {
                address: address.to_string(),
                weight,
            });
        }
        Ok(weight)
    }
}

/// Reduces edge addresses to forward/backward weight pairs.
#[derive(Debug, Clone, Copy)]
pub struct EdgeWeightEvaluator<'a> {
    weights: &'a Weights,
}

impl EdgeWeightEvaluator<'_> {
    /// The weight of `address` in both directions: per-direction products
    /// of every matching prefix entry.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidEdgeWeight`] if any contributing entry,
    /// or a resulting product, is negative or non-finite.
    pub fn edge_weight(&self, address: &EdgeAddress) -> CoreResult<EdgeWeight> {
        let mut forwards = 1.0;
        let mut backwards = 1.0;
        for (prefix, w) in &self.weights.edge_weights {
            if address.has_prefix(prefix) {
                if !w.forwards.is_finite()
                    || w.forwards < 0.0
                    || !w.backwards.is_finite()
                    || w.backwards < 0.0
                {
                    return Err(CoreError::InvalidEdgeWeight {
                        address: prefix.to_string(),
                        forwards: w.forwards,
                        backwards: w.backwards,
                    });
                }
                forwards *= w.forwards;
                backwards *= w.backwards;
            }
        }
        if !forwards.is_finite() || !backwards.is_finite() {
            return Err(CoreError::InvalidEdgeWeight {
                address: address.to_string(),
                forwards,
                backwards,
            });
        }
        Ok(EdgeWeight {
            forwards,
            backwards,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(parts: &[&str]) -> NodeAddress {
        NodeAddress::from_parts(parts.iter().copied()).unwrap()
    }

    fn edge(parts: &[&str]) -> EdgeAddress {
        EdgeAddress::from_parts(parts.iter().copied()).unwrap()
    }

    #[test]
    fn test_node_weight_defaults_to_one() {
        let weights = Weights::default();
        let w = weights.node_evaluator().node_weight(&node(&["a"])).unwrap();
        assert_eq!(w, 1.0);
    }

    #[test]
    fn test_node_weight_prefix_product() {
        let mut weights = Weights::default();
        weights.node_weights.insert(node(&["plugin"]), 2.0);
        weights.node_weights.insert(node(&["plugin", "commit"]), 3.0);
        weights.node_weights.insert(node(&["other"]), 100.0);

        let eval = weights.node_evaluator();
        assert_eq!(eval.node_weight(&node(&["plugin", "commit", "abc"])).unwrap(), 6.0);
        assert_eq!(eval.node_weight(&node(&["plugin", "issue", "1"])).unwrap(), 2.0);
        assert_eq!(eval.node_weight(&node(&["unrelated"])).unwrap(), 1.0);
    }

    #[test]
    fn test_empty_prefix_applies_to_everything() {
        let mut weights = Weights::default();
        weights.node_weights.insert(NodeAddress::empty(), 0.5);
        weights.node_weights.insert(node(&["a"]), 4.0);
        let eval = weights.node_evaluator();
        assert_eq!(eval.node_weight(&node(&["a", "b"])).unwrap(), 2.0);
        assert_eq!(eval.node_weight(&node(&["z"])).unwrap(), 0.5);
    }

    #[test]
    fn test_negative_node_weight_is_error() {
        let mut weights = Weights::default();
        weights.node_weights.insert(node(&["a"]), -1.0);
        let err = weights
            .node_evaluator()
            .node_weight(&node(&["a", "b"]))
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidNodeWeight { .. }));
    }

    #[test]
    fn test_non_finite_node_weight_is_error() {
        let mut weights = Weights::default();
        weights.node_weights.insert(node(&["a"]), f64::INFINITY);
        assert!(weights
            .node_evaluator()
            .node_weight(&node(&["a", "b"]))
            .is_err());
    }

    #[test]
    fn test_unmatched_invalid_entry_is_not_consulted() {
        let mut weights = Weights::default();
        weights.node_weights.insert(node(&["bad"]), -1.0);
        // A query outside that subtree never touches the bad entry.
        assert_eq!(
            weights.node_evaluator().node_weight(&node(&["ok"])).unwrap(),
            1.0
        );
    }

    #[test]
    fn test_edge_weight_directions_independent() {
        let mut weights = Weights::default();
        weights.edge_weights.insert(
            edge(&["plugin"]),
            EdgeWeight {
                forwards: 2.0,
                backwards: 0.0,
            },
        );
        weights.edge_weights.insert(
            edge(&["plugin", "authored"]),
            EdgeWeight {
                forwards: 3.0,
                backwards: 5.0,
            },
        );

        let w = weights
            .edge_evaluator()
            .edge_weight(&edge(&["plugin", "authored", "1"]))
            .unwrap();
        assert_eq!(w.forwards, 6.0);
        assert_eq!(w.backwards, 0.0);

        let unmatched = weights
            .edge_evaluator()
            .edge_weight(&edge(&["other"]))
            .unwrap();
        assert_eq!(unmatched.forwards, 1.0);
        assert_eq!(unmatched.backwards, 1.0);
    }

    #[test]
    fn test_negative_edge_weight_is_error() {
        let mut weights = Weights::default();
        weights.edge_weights.insert(
            edge(&["e"]),
            EdgeWeight {
                forwards: 1.0,
                backwards: -0.5,
            },
        );
        let err = weights
            .edge_evaluator()
            .edge_weight(&edge(&["e", "1"]))
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidEdgeWeight { .. }));
    }
}
