//! Shared fixtures for the scenario and round-trip tests.
#![allow(dead_code)]

use credrank_core::{
    EdgeAddress, GraphEdge, GraphNode, Interval, NodeAddress, Parameters, Participant, Weights,
    WeightedGraph,
};
use credrank_graph::{BuildArgs, MarkovProcessGraph};
use uuid::Uuid;

/// The parameter set used across the literal scenarios.
pub fn scenario_parameters() -> Parameters {
    Parameters {
        alpha: 0.2,
        beta: 0.3,
        gamma_forward: 0.1,
        gamma_backward: 0.1,
    }
}

pub fn one_interval() -> Vec<Interval> {
    vec![Interval {
        start_time_ms: 0,
        end_time_ms: 10,
    }]
}

pub fn participant(name: &str, id: u128) -> Participant {
    Participant {
        address: NodeAddress::from_parts(["user", name]).unwrap(),
        description: name.to_string(),
        id: Uuid::from_u128(id),
    }
}

pub fn graph_node(parts: &[&str]) -> GraphNode {
    GraphNode {
        address: NodeAddress::from_parts(parts.iter().copied()).unwrap(),
        description: parts.join("/"),
    }
}

pub fn graph_edge(name: &str, src: &NodeAddress, dst: &NodeAddress, timestamp_ms: i64) -> GraphEdge {
    GraphEdge {
        address: EdgeAddress::from_parts(["edge", name]).unwrap(),
        src: src.clone(),
        dst: dst.clone(),
        timestamp_ms,
    }
}

/// One base node with weight 1, no input edges, one participant, one
/// interval.
pub fn minimal_weighted_graph(p: &Participant) -> WeightedGraph {
    let base = graph_node(&["repo", "contribution"]);
    let participant_node = GraphNode {
        address: p.address.clone(),
        description: p.description.clone(),
    };
    WeightedGraph::new(vec![base, participant_node], vec![], Weights::default())
}

pub fn build(
    weighted_graph: &WeightedGraph,
    participants: &[Participant],
    intervals: &[Interval],
    parameters: Parameters,
) -> Result<MarkovProcessGraph, credrank_graph::GraphError> {
    MarkovProcessGraph::new(BuildArgs {
        weighted_graph,
        participants,
        intervals,
        parameters,
    })
}

/// Out-transition mass of `address` summed straight off the edge list.
pub fn out_mass(graph: &MarkovProcessGraph, address: &NodeAddress) -> f64 {
    graph
        .edges()
        .filter(|e| &e.src == address)
        .map(|e| e.transition_probability)
        .sum()
}
