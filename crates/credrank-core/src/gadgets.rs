//! Structural node and edge gadgets.
//!
//! A gadget bundles, for one structural role: a prefix, a function mapping
//! a structured key to a raw address, its inverse (an error for addresses
//! not matching the prefix), and a factory producing the corresponding
//! node or edge. Gadgets are the single source of truth for the structural
//! naming convention; no component outside this module may synthesize
//! structural addresses.
//!
//! # Address conventions
//!
//! - seed: `sourcecred/core/SEED`
//! - accumulator: `sourcecred/core/EPOCH_ACCUMULATOR/<epochStart>`
//! - user-epoch: `sourcecred/core/USER_EPOCH/<epochStart>/<ownerId>`
//!
//! with `<epochStart>` rendered as `-Infinity`, `Infinity`, or decimal
//! milliseconds, and `<ownerId>` as a hyphenated lowercase UUID.

use uuid::Uuid;

use crate::address::{EdgeAddress, NodeAddress};
use crate::error::{CoreError, CoreResult};
use crate::markov::{MarkovEdge, MarkovNode};
use crate::participant::ParticipantId;
use crate::time::TimeBoundary;

const CORE_PARTS: [&str; 2] = ["sourcecred", "core"];

/// The reserved prefix under which every structural address lives. Input
/// nodes bearing this prefix are rejected by the builder.
pub fn core_prefix() -> NodeAddress {
    NodeAddress::from_valid_parts(CORE_PARTS)
}

fn node_prefix(tail: &str) -> NodeAddress {
    NodeAddress::from_valid_parts([CORE_PARTS[0], CORE_PARTS[1], tail])
}

fn edge_prefix(tail: &str) -> EdgeAddress {
    EdgeAddress::from_valid_parts([CORE_PARTS[0], CORE_PARTS[1], tail])
}

fn parse_error(expected: &str, address: impl ToString) -> CoreError {
    CoreError::AddressParseError {
        expected: expected.to_string(),
        address: address.to_string(),
    }
}

fn parse_boundary(expected: &str, address: &NodeAddress, part: &str) -> CoreResult<TimeBoundary> {
    TimeBoundary::parse(part).ok_or_else(|| parse_error(expected, address))
}

fn parse_owner(expected: &str, address: &NodeAddress, part: &str) -> CoreResult<ParticipantId> {
    Uuid::parse_str(part).map_err(|_| parse_error(expected, address))
}

/// Key of a user-epoch node: one per (participant, boundary).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UserEpoch {
    /// The owning participant.
    pub owner: ParticipantId,
    /// The boundary starting this epoch.
    pub epoch_start: TimeBoundary,
}

/// Key of a webbing edge: consecutive user-epoch nodes of one participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Webbing {
    /// The owning participant.
    pub owner: ParticipantId,
    /// The earlier boundary.
    pub last_start: TimeBoundary,
    /// The later boundary.
    pub this_start: TimeBoundary,
}

// ---------------------------------------------------------------------------
// Node gadgets
// ---------------------------------------------------------------------------

/// The singleton seed node realizing PageRank-style teleportation.
pub struct SeedGadget;

impl SeedGadget {
    /// The seed address, which is its own prefix.
    pub fn prefix(&self) -> NodeAddress {
        node_prefix("SEED")
    }

    /// The seed address.
    pub fn to_raw(&self) -> NodeAddress {
        self.prefix()
    }

    /// Accept exactly the seed address.
    pub fn from_raw(&self, address: &NodeAddress) -> CoreResult<()> {
        if *address == self.to_raw() {
            Ok(())
        } else {
            Err(parse_error("seed address", address))
        }
    }

    /// Materialize the seed node. It never mints.
    pub fn node(&self) -> MarkovNode {
        MarkovNode {
            address: self.to_raw(),
            description: "seed".to_string(),
            mint: 0.0,
        }
    }
}

/// Epoch accumulator nodes: one per boundary, collecting payout flow.
pub struct AccumulatorGadget;

impl AccumulatorGadget {
    /// Prefix of every accumulator address.
    pub fn prefix(&self) -> NodeAddress {
        node_prefix("EPOCH_ACCUMULATOR")
    }

    /// The accumulator address for `epoch_start`.
    pub fn to_raw(&self, epoch_start: TimeBoundary) -> NodeAddress {
        NodeAddress::from_valid_parts([
            CORE_PARTS[0].to_string(),
            CORE_PARTS[1].to_string(),
            "EPOCH_ACCUMULATOR".to_string(),
            epoch_start.to_string(),
        ])
    }

    /// Recover the boundary from an accumulator address.
    pub fn from_raw(&self, address: &NodeAddress) -> CoreResult<TimeBoundary> {
        const EXPECTED: &str = "epoch accumulator address";
        if !address.has_prefix(&self.prefix()) || address.len() != 4 {
            return Err(parse_error(EXPECTED, address));
        }
        parse_boundary(EXPECTED, address, &address.parts()[3])
    }

    /// Materialize the accumulator node for `epoch_start`.
    pub fn node(&self, epoch_start: TimeBoundary) -> MarkovNode {
        MarkovNode {
            address: self.to_raw(epoch_start),
            description: format!("epoch accumulator starting {}", epoch_start),
            mint: 0.0,
        }
    }
}

/// User-epoch nodes: the fibration of one participant across boundaries.
pub struct UserEpochGadget;

impl UserEpochGadget {
    /// Prefix of every user-epoch address.
    pub fn prefix(&self) -> NodeAddress {
        node_prefix("USER_EPOCH")
    }

    /// The user-epoch address for `key`.
    pub fn to_raw(&self, key: UserEpoch) -> NodeAddress {
        NodeAddress::from_valid_parts([
            CORE_PARTS[0].to_string(),
            CORE_PARTS[1].to_string(),
            "USER_EPOCH".to_string(),
            key.epoch_start.to_string(),
            key.owner.to_string(),
        ])
    }

    /// Recover the key from a user-epoch address.
    pub fn from_raw(&self, address: &NodeAddress) -> CoreResult<UserEpoch> {
        const EXPECTED: &str = "user-epoch address";
        if !address.has_prefix(&self.prefix()) || address.len() != 5 {
            return Err(parse_error(EXPECTED, address));
        }
        let epoch_start = parse_boundary(EXPECTED, address, &address.parts()[3])?;
        let owner = parse_owner(EXPECTED, address, &address.parts()[4])?;
        Ok(UserEpoch { owner, epoch_start })
    }

    /// Materialize the user-epoch node for `key`. Structural, so it never
    /// mints; `owner_description` feeds the reporting text.
    pub fn node(&self, key: UserEpoch, owner_description: &str) -> MarkovNode {
        MarkovNode {
            address: self.to_raw(key),
            description: format!("epoch starting {} for {}", key.epoch_start, owner_description),
            mint: 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Edge gadgets
// ---------------------------------------------------------------------------

/// Seed-to-node minting edges, weighted by each node's share of total mint.
pub struct SeedMintGadget;

impl SeedMintGadget {
    /// Prefix of every seed-mint edge address.
    pub fn prefix(&self) -> EdgeAddress {
        edge_prefix("SEED_MINT")
    }

    /// The seed-mint edge address for `recipient`.
    pub fn to_raw(&self, recipient: &NodeAddress) -> EdgeAddress {
        let mut parts: Vec<String> = CORE_PARTS.iter().map(|p| p.to_string()).collect();
        parts.push("SEED_MINT".to_string());
        parts.extend(recipient.parts().iter().cloned());
        EdgeAddress::from_valid_parts(parts)
    }

    /// Recover the recipient from a seed-mint edge address.
    pub fn from_raw(&self, address: &EdgeAddress) -> CoreResult<NodeAddress> {
        if !address.has_prefix(&self.prefix()) {
            return Err(CoreError::AddressParseError {
                expected: "seed-mint edge address".to_string(),
                address: address.to_string(),
            });
        }
        Ok(NodeAddress::from_valid_parts(
            address.parts()[3..].iter().cloned().collect::<Vec<_>>(),
        ))
    }

    /// Materialize a seed-mint edge to `recipient`.
    pub fn edge(&self, recipient: &NodeAddress, transition_probability: f64) -> MarkovEdge {
        MarkovEdge {
            address: self.to_raw(recipient),
            reversed: false,
            src: SeedGadget.to_raw(),
            dst: recipient.clone(),
            transition_probability,
        }
    }
}

/// Payout edges from a user-epoch node to its epoch's accumulator.
pub struct PayoutGadget;

impl PayoutGadget {
    /// Prefix of every payout edge address.
    pub fn prefix(&self) -> EdgeAddress {
        edge_prefix("PAYOUT")
    }

    /// The payout edge address for `key`.
    pub fn to_raw(&self, key: UserEpoch) -> EdgeAddress {
        EdgeAddress::from_valid_parts([
            CORE_PARTS[0].to_string(),
            CORE_PARTS[1].to_string(),
            "PAYOUT".to_string(),
            key.epoch_start.to_string(),
            key.owner.to_string(),
        ])
    }

    /// Recover the key from a payout edge address.
    pub fn from_raw(&self, address: &EdgeAddress) -> CoreResult<UserEpoch> {
        const EXPECTED: &str = "payout edge address";
        if !address.has_prefix(&self.prefix()) || address.len() != 5 {
            return Err(CoreError::AddressParseError {
                expected: EXPECTED.to_string(),
                address: address.to_string(),
            });
        }
        let epoch_start = TimeBoundary::parse(&address.parts()[3])
            .ok_or_else(|| parse_error(EXPECTED, address))?;
        let owner = Uuid::parse_str(&address.parts()[4])
            .map_err(|_| parse_error(EXPECTED, address))?;
        Ok(UserEpoch { owner, epoch_start })
    }

    /// Materialize the payout edge for `key` with probability `beta`.
    pub fn edge(&self, key: UserEpoch, beta: f64) -> MarkovEdge {
        MarkovEdge {
            address: self.to_raw(key),
            reversed: false,
            src: UserEpochGadget.to_raw(key),
            dst: AccumulatorGadget.to_raw(key.epoch_start),
            transition_probability: beta,
        }
    }
}

fn webbing_to_raw(tail: &str, key: Webbing) -> EdgeAddress {
    EdgeAddress::from_valid_parts([
        CORE_PARTS[0].to_string(),
        CORE_PARTS[1].to_string(),
        tail.to_string(),
        key.last_start.to_string(),
        key.this_start.to_string(),
        key.owner.to_string(),
    ])
}

fn webbing_from_raw(
    expected: &str,
    prefix: &EdgeAddress,
    address: &EdgeAddress,
) -> CoreResult<Webbing> {
    if !address.has_prefix(prefix) || address.len() != 6 {
        return Err(CoreError::AddressParseError {
            expected: expected.to_string(),
            address: address.to_string(),
        });
    }
    let err = || CoreError::AddressParseError {
        expected: expected.to_string(),
        address: address.to_string(),
    };
    let last_start = TimeBoundary::parse(&address.parts()[3]).ok_or_else(err)?;
    let this_start = TimeBoundary::parse(&address.parts()[4]).ok_or_else(err)?;
    let owner = Uuid::parse_str(&address.parts()[5]).map_err(|_| err())?;
    Ok(Webbing {
        owner,
        last_start,
        this_start,
    })
}

/// Forward temporal webbing: earlier user-epoch to the next one.
pub struct ForwardWebbingGadget;

impl ForwardWebbingGadget {
    /// Prefix of every forward webbing edge address.
    pub fn prefix(&self) -> EdgeAddress {
        edge_prefix("FORWARD_WEBBING")
    }

    /// The forward webbing edge address for `key`.
    pub fn to_raw(&self, key: Webbing) -> EdgeAddress {
        webbing_to_raw("FORWARD_WEBBING", key)
    }

    /// Recover the key from a forward webbing edge address.
    pub fn from_raw(&self, address: &EdgeAddress) -> CoreResult<Webbing> {
        webbing_from_raw("forward webbing edge address", &self.prefix(), address)
    }

    /// Materialize the forward webbing edge for `key` with probability
    /// `gamma_forward`.
    pub fn edge(&self, key: Webbing, gamma_forward: f64) -> MarkovEdge {
        MarkovEdge {
            address: self.to_raw(key),
            reversed: false,
            src: UserEpochGadget.to_raw(UserEpoch {
                owner: key.owner,
                epoch_start: key.last_start,
            }),
            dst: UserEpochGadget.to_raw(UserEpoch {
                owner: key.owner,
                epoch_start: key.this_start,
            }),
            transition_probability: gamma_forward,
        }
    }
}

/// Backward temporal webbing: later user-epoch back to the previous one.
pub struct BackwardWebbingGadget;

impl BackwardWebbingGadget {
    /// Prefix of every backward webbing edge address.
    pub fn prefix(&self) -> EdgeAddress {
        edge_prefix("BACKWARD_WEBBING")
    }

    /// The backward webbing edge address for `key`.
    pub fn to_raw(&self, key: Webbing) -> EdgeAddress {
        webbing_to_raw("BACKWARD_WEBBING", key)
    }

    /// Recover the key from a backward webbing edge address.
    pub fn from_raw(&self, address: &EdgeAddress) -> CoreResult<Webbing> {
        webbing_from_raw("backward webbing edge address", &self.prefix(), address)
    }

    /// Materialize the backward webbing edge for `key` with probability
    /// `gamma_backward`.
    pub fn edge(&self, key: Webbing, gamma_backward: f64) -> MarkovEdge {
        MarkovEdge {
            address: self.to_raw(key),
            reversed: false,
            src: UserEpochGadget.to_raw(UserEpoch {
                owner: key.owner,
                epoch_start: key.this_start,
            }),
            dst: UserEpochGadget.to_raw(UserEpoch {
                owner: key.owner,
                epoch_start: key.last_start,
            }),
            transition_probability: gamma_backward,
        }
    }
}

/// Residual teleportation from a base node back to the seed.
pub struct ContributionRadiationGadget;

impl ContributionRadiationGadget {
    /// Prefix of every contribution radiation edge address.
    pub fn prefix(&self) -> EdgeAddress {
        edge_prefix("CONTRIBUTION_RADIATION")
    }

    /// The radiation edge address for `source`.
    pub fn to_raw(&self, source: &NodeAddress) -> EdgeAddress {
        let mut parts: Vec<String> = CORE_PARTS.iter().map(|p| p.to_string()).collect();
        parts.push("CONTRIBUTION_RADIATION".to_string());
        parts.extend(source.parts().iter().cloned());
        EdgeAddress::from_valid_parts(parts)
    }

    /// Recover the source from a contribution radiation edge address.
    pub fn from_raw(&self, address: &EdgeAddress) -> CoreResult<NodeAddress> {
        if !address.has_prefix(&self.prefix()) {
            return Err(CoreError::AddressParseError {
                expected: "contribution radiation edge address".to_string(),
                address: address.to_string(),
            });
        }
        Ok(NodeAddress::from_valid_parts(
            address.parts()[3..].iter().cloned().collect::<Vec<_>>(),
        ))
    }

    /// Materialize the radiation edge from `source` to the seed.
    pub fn edge(&self, source: &NodeAddress, transition_probability: f64) -> MarkovEdge {
        MarkovEdge {
            address: self.to_raw(source),
            reversed: false,
            src: source.clone(),
            dst: SeedGadget.to_raw(),
            transition_probability,
        }
    }
}

/// Residual teleportation from a user-epoch node back to the seed.
pub struct EpochRadiationGadget;

impl EpochRadiationGadget {
    /// Prefix of every epoch radiation edge address.
    pub fn prefix(&self) -> EdgeAddress {
        edge_prefix("EPOCH_RADIATION")
    }

    /// The radiation edge address for `key`.
    pub fn to_raw(&self, key: UserEpoch) -> EdgeAddress {
        EdgeAddress::from_valid_parts([
            CORE_PARTS[0].to_string(),
            CORE_PARTS[1].to_string(),
            "EPOCH_RADIATION".to_string(),
            key.epoch_start.to_string(),
            key.owner.to_string(),
        ])
    }

    /// Recover the key from an epoch radiation edge address.
    pub fn from_raw(&self, address: &EdgeAddress) -> CoreResult<UserEpoch> {
        const EXPECTED: &str = "epoch radiation edge address";
        if !address.has_prefix(&self.prefix()) || address.len() != 5 {
            return Err(CoreError::AddressParseError {
                expected: EXPECTED.to_string(),
                address: address.to_string(),
            });
        }
        let epoch_start = TimeBoundary::parse(&address.parts()[3])
            .ok_or_else(|| parse_error(EXPECTED, address))?;
        let owner = Uuid::parse_str(&address.parts()[4])
            .map_err(|_| parse_error(EXPECTED, address))?;
        Ok(UserEpoch { owner, epoch_start })
    }

    /// Materialize the radiation edge from the user-epoch node to the seed.
    pub fn edge(&self, key: UserEpoch, transition_probability: f64) -> MarkovEdge {
        MarkovEdge {
            address: self.to_raw(key),
            reversed: false,
            src: UserEpochGadget.to_raw(key),
            dst: SeedGadget.to_raw(),
            transition_probability,
        }
    }
}

/// Residual teleportation from an accumulator back to the seed.
pub struct AccumulatorRadiationGadget;

impl AccumulatorRadiationGadget {
    /// Prefix of every accumulator radiation edge address.
    pub fn prefix(&self) -> EdgeAddress {
        edge_prefix("ACCUMULATOR_RADIATION")
    }

    /// The radiation edge address for `epoch_start`.
    pub fn to_raw(&self, epoch_start: TimeBoundary) -> EdgeAddress {
        EdgeAddress::from_valid_parts([
            CORE_PARTS[0].to_string(),
            CORE_PARTS[1].to_string(),
            "ACCUMULATOR_RADIATION".to_string(),
            epoch_start.to_string(),
        ])
    }

    /// Recover the boundary from an accumulator radiation edge address.
    pub fn from_raw(&self, address: &EdgeAddress) -> CoreResult<TimeBoundary> {
        const EXPECTED: &str = "accumulator radiation edge address";
        if !address.has_prefix(&self.prefix()) || address.len() != 4 {
            return Err(CoreError::AddressParseError {
                expected: EXPECTED.to_string(),
                address: address.to_string(),
            });
        }
        TimeBoundary::parse(&address.parts()[3]).ok_or_else(|| parse_error(EXPECTED, address))
    }

    /// Materialize the radiation edge from the accumulator to the seed.
    pub fn edge(&self, epoch_start: TimeBoundary, transition_probability: f64) -> MarkovEdge {
        MarkovEdge {
            address: self.to_raw(epoch_start),
            reversed: false,
            src: AccumulatorGadget.to_raw(epoch_start),
            dst: SeedGadget.to_raw(),
            transition_probability,
        }
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// The structural class of a core-prefixed node address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreNodeKind {
    /// The singleton seed node.
    Seed,
    /// An epoch accumulator.
    Accumulator(TimeBoundary),
    /// A user-epoch node.
    UserEpoch(UserEpoch),
}

/// Classify a node address under the reserved core prefix.
///
/// Returns `Ok(None)` for addresses outside the core prefix. A
/// core-prefixed address matching no structural class is an error: the
/// core namespace is closed.
pub fn core_node_kind(address: &NodeAddress) -> CoreResult<Option<CoreNodeKind>> {
    if !address.has_prefix(&core_prefix()) {
        return Ok(None);
    }
    if SeedGadget.from_raw(address).is_ok() {
        return Ok(Some(CoreNodeKind::Seed));
    }
    if let Ok(boundary) = AccumulatorGadget.from_raw(address) {
        return Ok(Some(CoreNodeKind::Accumulator(boundary)));
    }
    if let Ok(key) = UserEpochGadget.from_raw(address) {
        return Ok(Some(CoreNodeKind::UserEpoch(key)));
    }
    Err(CoreError::AddressParseError {
        expected: "seed, epoch accumulator, or user-epoch address".to_string(),
        address: address.to_string(),
    })
}
