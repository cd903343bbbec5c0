//! Scoring participants.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::address::NodeAddress;

/// Type alias for participant identifiers (UUID v4).
///
/// The id is a stable opaque identifier: it survives renames of the
/// participant's original node and is what user-epoch addresses embed.
pub type ParticipantId = Uuid;

/// A scoring participant.
///
/// `address` identifies the participant's original node in the input
/// graph; that node is absent from the Markov process graph itself, having
/// been fibrated into one user-epoch node per time boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Address of the original scoring node in the input graph.
    pub address: NodeAddress,
    /// Free-form text for reporting.
    pub description: String,
    /// Stable opaque identifier used inside user-epoch addresses.
    pub id: ParticipantId,
}
