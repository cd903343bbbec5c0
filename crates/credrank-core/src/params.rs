//! Transition-probability budget parameters.

use serde::{Deserialize, Serialize};

/// The four probabilities apportioning every node's outgoing budget.
///
/// Each must lie in [0, 1] and their sum must not exceed 1; the builder
/// validates this before any other work.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameters {
    /// Radiation: probability of jumping to the seed from any organic
    /// source.
    pub alpha: f64,
    /// Payout: probability from a user-epoch node to its accumulator.
    pub beta: f64,
    /// Forward temporal webbing probability.
    pub gamma_forward: f64,
    /// Backward temporal webbing probability.
    pub gamma_backward: f64,
}

impl Parameters {
    /// The out-budget left to a user-epoch node's contribution edges after
    /// radiation, payout, and webbing take their shares.
    pub fn epoch_transition_remainder(&self) -> f64 {
        1.0 - self.alpha - self.beta - self.gamma_forward - self.gamma_backward
    }
}
