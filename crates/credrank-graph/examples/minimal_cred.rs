//! Build a minimal contribution graph, score it, and print cred.
//!
//! The eigensolver is the caller's job; this example stands one in with a
//! plain power iteration over the exported sparse chain.
//!
//! Run with: cargo run --example minimal_cred

use credrank_core::{
    EdgeAddress, GraphEdge, GraphNode, Interval, NodeAddress, Parameters, Participant, Weights,
    WeightedGraph,
};
use credrank_graph::{BuildArgs, CredGraph, GraphResult, MarkovProcessGraph, SparseMarkovChain};
use uuid::Uuid;

fn stationary_distribution(chain: &SparseMarkovChain, iterations: usize) -> Vec<f64> {
    let n = chain.len();
    let mut pi = vec![1.0 / n as f64; n];
    for _ in 0..iterations {
        let mut next = vec![0.0; n];
        for (dst, entry) in chain.entries.iter().enumerate() {
            for (&src, &weight) in entry.neighbor.iter().zip(entry.weight.iter()) {
                next[dst] += pi[src as usize] * weight;
            }
        }
        pi = next;
    }
    pi
}

fn main() -> GraphResult<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let alice = Participant {
        address: NodeAddress::from_parts(["example", "user", "alice"])?,
        description: "alice".to_string(),
        id: Uuid::from_u128(1),
    };
    let doc = GraphNode {
        address: NodeAddress::from_parts(["example", "doc"])?,
        description: "a document".to_string(),
    };
    let authored = GraphEdge {
        address: EdgeAddress::from_parts(["example", "authored"])?,
        src: alice.address.clone(),
        dst: doc.address.clone(),
        timestamp_ms: 5,
    };
    let weighted_graph = WeightedGraph::new(
        vec![
            doc,
            GraphNode {
                address: alice.address.clone(),
                description: alice.description.clone(),
            },
        ],
        vec![authored],
        Weights::default(),
    );

    let graph = MarkovProcessGraph::new(BuildArgs {
        weighted_graph: &weighted_graph,
        participants: std::slice::from_ref(&alice),
        intervals: &[Interval {
            start_time_ms: 0,
            end_time_ms: 10,
        }],
        parameters: Parameters {
            alpha: 0.2,
            beta: 0.3,
            gamma_forward: 0.1,
            gamma_backward: 0.1,
        },
    })?;

    let chain = graph.to_sparse_chain()?;
    let scores = stationary_distribution(&chain, 200);
    let cred_graph = CredGraph::new(graph, scores)?;

    for entry in cred_graph.participants()? {
        println!(
            "{}: cred {:.6} across {} epochs",
            entry.participant.description,
            entry.cred,
            entry.cred_per_epoch.len()
        );
        for (boundary, epoch_cred) in cred_graph
            .graph()
            .epoch_boundaries()
            .iter()
            .zip(entry.cred_per_epoch.iter())
        {
            println!("  epoch {}: {:.6}", boundary, epoch_cred);
        }
    }
    Ok(())
}
