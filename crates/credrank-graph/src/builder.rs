//! Construction of the Markov process graph.
//!
//! Building proceeds in phases, each establishing the invariants the next
//! one relies on:
//!
//! 1. validate parameters and intervals
//! 2. ingest base nodes from the input graph
//! 3. build the time skeleton (user-epoch nodes, payout, webbing)
//! 4. emit seed-mint edges proportional to each node's share of mint
//! 5. fibrate contribution edges and normalize them to each source's
//!    out-budget
//! 6. close every non-seed node's budget with a radiation edge to seed
//!
//! The builder is a pure function of its inputs; the result is immutable.

use std::collections::BTreeMap;

use tracing::debug;

use credrank_core::gadgets::{
    core_node_kind, core_prefix, AccumulatorGadget, AccumulatorRadiationGadget,
    BackwardWebbingGadget, ContributionRadiationGadget, CoreNodeKind, EpochRadiationGadget,
    ForwardWebbingGadget, PayoutGadget, SeedMintGadget, UserEpoch, UserEpochGadget, Webbing,
};
use credrank_core::time::{boundary_preceding, time_boundaries};
use credrank_core::{
    EdgeAddress, Interval, MarkovEdge, MarkovEdgeAddress, MarkovNode, NodeAddress, Parameters,
    Participant, ParticipantId, TimeBoundary, WeightedGraph,
};

use crate::error::{GraphError, GraphResult};
use crate::graph::MarkovProcessGraph;

/// Inputs to [`MarkovProcessGraph::new`].
#[derive(Debug, Clone, Copy)]
pub struct BuildArgs<'a> {
    /// The weighted contribution graph. Dangling edges are skipped by its
    /// edge accessor.
    pub weighted_graph: &'a WeightedGraph,
    /// Scoring participants. Their original nodes are fibrated, not
    /// ingested.
    pub participants: &'a [Participant],
    /// Contiguous, ordered scoring intervals.
    pub intervals: &'a [Interval],
    /// Transition-probability budget.
    pub parameters: Parameters,
}

/// Mutable state threaded through the phases: the node and edge maps plus
/// a running out-mass tally per source.
#[derive(Default)]
struct BuilderState {
    nodes: BTreeMap<NodeAddress, MarkovNode>,
    edges: BTreeMap<MarkovEdgeAddress, MarkovEdge>,
    out_mass: BTreeMap<NodeAddress, f64>,
}

impl BuilderState {
    fn add_node(&mut self, node: MarkovNode) -> GraphResult<()> {
        if self.nodes.contains_key(&node.address) {
            return Err(GraphError::NodeConflict {
                address: node.address.to_string(),
            });
        }
        self.nodes.insert(node.address.clone(), node);
        Ok(())
    }

    fn add_edge(&mut self, edge: MarkovEdge) -> GraphResult<()> {
        let markov_address = edge.markov_address();
        if self.edges.contains_key(&markov_address) {
            return Err(GraphError::EdgeConflict {
                address: markov_address.to_string(),
            });
        }
        *self.out_mass.entry(edge.src.clone()).or_insert(0.0) += edge.transition_probability;
        self.edges.insert(markov_address, edge);
        Ok(())
    }

    fn out_mass(&self, address: &NodeAddress) -> f64 {
        self.out_mass.get(address).copied().unwrap_or(0.0)
    }
}

pub(crate) fn build(args: BuildArgs<'_>) -> GraphResult<MarkovProcessGraph> {
    let BuildArgs {
        weighted_graph,
        participants,
        intervals,
        parameters,
    } = args;

    // Phase 1: parameters and intervals.
    validate_parameters(&parameters)?;
    validate_intervals(intervals)?;
    let epoch_transition_remainder = parameters.epoch_transition_remainder();
    let boundaries = time_boundaries(intervals);

    let participant_ids: BTreeMap<NodeAddress, ParticipantId> = participants
        .iter()
        .map(|p| (p.address.clone(), p.id))
        .collect();

    let mut state = BuilderState::default();

    // Phase 2: base nodes.
    let node_evaluator = weighted_graph.weights.node_evaluator();
    let reserved = core_prefix();
    for node in weighted_graph.nodes() {
        if participant_ids.contains_key(&node.address) {
            continue;
        }
        if node.address.has_prefix(&reserved) {
            return Err(GraphError::CoreNodeLeakage {
                address: node.address.to_string(),
            });
        }
        let mint = node_evaluator.node_weight(&node.address)?;
        state.add_node(MarkovNode {
            address: node.address.clone(),
            description: node.description.clone(),
            mint,
        })?;
    }
    debug!(node_count = state.nodes.len(), "ingested base nodes");

    // Phase 3: time skeleton.
    for participant in participants {
        let mut previous: Option<TimeBoundary> = None;
        for &boundary in &boundaries {
            let key = UserEpoch {
                owner: participant.id,
                epoch_start: boundary,
            };
            state.add_node(UserEpochGadget.node(key, &participant.description))?;
            state.add_edge(PayoutGadget.edge(key, parameters.beta))?;
            if let Some(last_start) = previous {
                let webbing = Webbing {
                    owner: participant.id,
                    last_start,
                    this_start: boundary,
                };
                state.add_edge(ForwardWebbingGadget.edge(webbing, parameters.gamma_forward))?;
                state.add_edge(BackwardWebbingGadget.edge(webbing, parameters.gamma_backward))?;
            }
            previous = Some(boundary);
        }
    }
    debug!(
        boundary_count = boundaries.len(),
        participant_count = participants.len(),
        "built time skeleton"
    );

    // Phase 4: minting.
    let total_mint: f64 = state.nodes.values().map(|n| n.mint).sum();
    if total_mint == 0.0 {
        return Err(GraphError::NoMintingSource);
    }
    let minting: Vec<(NodeAddress, f64)> = state
        .nodes
        .values()
        .filter(|n| n.mint > 0.0)
        .map(|n| (n.address.clone(), n.mint))
        .collect();
    let minting_count = minting.len();
    for (address, mint) in minting {
        state.add_edge(SeedMintGadget.edge(&address, mint / total_mint))?;
    }
    debug!(total_mint, minting_count, "emitted seed mint edges");

    // Phase 5: fibrate and absorb contribution edges.
    struct Candidate {
        address: EdgeAddress,
        reversed: bool,
        dst: NodeAddress,
        weight: f64,
    }
    let edge_evaluator = weighted_graph.weights.edge_evaluator();
    let mut groups: BTreeMap<NodeAddress, Vec<Candidate>> = BTreeMap::new();
    for edge in weighted_graph.edges() {
        let weight = edge_evaluator.edge_weight(&edge.address)?;
        let src = rewrite_epoch_endpoint(&edge.src, edge.timestamp_ms, &participant_ids, &boundaries);
        let dst = rewrite_epoch_endpoint(&edge.dst, edge.timestamp_ms, &participant_ids, &boundaries);
        if weight.forwards > 0.0 {
            groups.entry(src.clone()).or_default().push(Candidate {
                address: edge.address.clone(),
                reversed: false,
                dst: dst.clone(),
                weight: weight.forwards,
            });
        }
        if weight.backwards > 0.0 {
            groups.entry(dst).or_default().push(Candidate {
                address: edge.address.clone(),
                reversed: true,
                dst: src,
                weight: weight.backwards,
            });
        }
    }
    let mut contribution_count = 0usize;
    for (src, candidates) in groups {
        let total_weight: f64 = candidates.iter().map(|c| c.weight).sum();
        let budget = if UserEpochGadget.from_raw(&src).is_ok() {
            epoch_transition_remainder
        } else {
            1.0 - parameters.alpha
        };
        for candidate in candidates {
            let probability = candidate.weight / total_weight * budget;
            if !(0.0..=1.0).contains(&probability) {
                return Err(GraphError::InvalidTransitionProbability {
                    address: candidate.address.to_string(),
                    probability,
                });
            }
            state.add_edge(MarkovEdge {
                address: candidate.address,
                reversed: candidate.reversed,
                src: src.clone(),
                dst: candidate.dst,
                transition_probability: probability,
            })?;
            contribution_count += 1;
        }
    }
    debug!(contribution_count, "fibrated contribution edges");

    // Phase 6: radiation. Every node but seed closes its budget with a
    // teleportation edge back to seed, routed through the gadget matching
    // its class. A user-epoch node with no outgoing contributions absorbs
    // the whole leftover (beta, webbing, and remainder) into this single
    // edge.
    let stored: Vec<NodeAddress> = state.nodes.keys().cloned().collect();
    let mut radiation_count = 0usize;
    for address in stored {
        let residual = residual_probability(&state, &address)?;
        let kind = core_node_kind(&address).map_err(|e| GraphError::Internal(e.to_string()))?;
        let edge = match kind {
            None => ContributionRadiationGadget.edge(&address, residual),
            Some(CoreNodeKind::UserEpoch(key)) => EpochRadiationGadget.edge(key, residual),
            Some(other) => {
                return Err(GraphError::Internal(format!(
                    "virtual node stored as real: {:?} at {}",
                    other, address
                )));
            }
        };
        state.add_edge(edge)?;
        radiation_count += 1;
    }
    for &boundary in &boundaries {
        let address = AccumulatorGadget.to_raw(boundary);
        let residual = residual_probability(&state, &address)?;
        state.add_edge(AccumulatorRadiationGadget.edge(boundary, residual))?;
        radiation_count += 1;
    }
    debug!(radiation_count, "closed out-budgets with radiation");

    MarkovProcessGraph::from_parts(
        state.nodes,
        state.edges,
        participants.to_vec(),
        boundaries,
    )
}

fn validate_parameters(parameters: &Parameters) -> GraphResult<()> {
    let named = [
        ("alpha", parameters.alpha),
        ("beta", parameters.beta),
        ("gammaForward", parameters.gamma_forward),
        ("gammaBackward", parameters.gamma_backward),
    ];
    for (name, value) in named {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(GraphError::InvalidParameter { name, value });
        }
    }
    let total =
        parameters.alpha + parameters.beta + parameters.gamma_forward + parameters.gamma_backward;
    if total > 1.0 {
        return Err(GraphError::InvalidParameter {
            name: "total",
            value: total,
        });
    }
    Ok(())
}

fn validate_intervals(intervals: &[Interval]) -> GraphResult<()> {
    for interval in intervals {
        if interval.start_time_ms >= interval.end_time_ms {
            return Err(GraphError::InvalidIntervals {
                message: format!(
                    "empty interval [{}, {})",
                    interval.start_time_ms, interval.end_time_ms
                ),
            });
        }
    }
    for pair in intervals.windows(2) {
        if pair[0].end_time_ms != pair[1].start_time_ms {
            return Err(GraphError::InvalidIntervals {
                message: format!(
                    "gap between interval ending {} and interval starting {}",
                    pair[0].end_time_ms, pair[1].start_time_ms
                ),
            });
        }
    }
    Ok(())
}

/// Map a participant address to its user-epoch node at the boundary
/// immediately preceding `timestamp_ms`; any other address passes through.
fn rewrite_epoch_endpoint(
    address: &NodeAddress,
    timestamp_ms: i64,
    participant_ids: &BTreeMap<NodeAddress, ParticipantId>,
    boundaries: &[TimeBoundary],
) -> NodeAddress {
    match participant_ids.get(address) {
        Some(&owner) => UserEpochGadget.to_raw(UserEpoch {
            owner,
            epoch_start: boundary_preceding(boundaries, timestamp_ms),
        }),
        None => address.clone(),
    }
}

/// The probability left to a node's radiation edge: `1 - out_mass`, with
/// sub-nanoprobability float residue clamped to zero.
fn residual_probability(state: &BuilderState, address: &NodeAddress) -> GraphResult<f64> {
    let residual = 1.0 - state.out_mass(address);
    if residual < 0.0 {
        if residual > -1e-9 {
            return Ok(0.0);
        }
        return Err(GraphError::Internal(format!(
            "out-mass exceeds 1 at {}: residual {}",
            address, residual
        )));
    }
    Ok(residual)
}
