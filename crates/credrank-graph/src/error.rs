//! Error types for credrank-graph.
//!
//! All variants are construction-time failures surfaced to the caller;
//! none are recoverable locally and none are retried. Each carries the
//! offending address or value in its message.

use credrank_core::CoreError;
use thiserror::Error;

/// Top-level error type for graph construction, export, and scoring.
#[derive(Debug, Error)]
pub enum GraphError {
    /// A probability parameter is outside [0, 1], or the four together
    /// exceed the unit budget (reported under the name `total`).
    #[error("invalid parameter {name}: {value}")]
    InvalidParameter {
        /// Which parameter (alpha, beta, gammaForward, gammaBackward, or
        /// total).
        name: &'static str,
        /// The offending value.
        value: f64,
    },

    /// The interval sequence is not ordered and contiguous.
    #[error("invalid intervals: {message}")]
    InvalidIntervals {
        /// What was wrong with the sequence.
        message: String,
    },

    /// An input node carries the reserved core prefix.
    #[error("input node bears the reserved core prefix: {address}")]
    CoreNodeLeakage {
        /// Canonical rendering of the offending address.
        address: String,
    },

    /// A node address was added twice.
    #[error("node conflict: {address}")]
    NodeConflict {
        /// Canonical rendering of the conflicting address.
        address: String,
    },

    /// A Markov edge address was added twice.
    #[error("edge conflict: {address}")]
    EdgeConflict {
        /// Canonical rendering of the conflicting Markov edge address.
        address: String,
    },

    /// Total mint weight is zero, so the seed has no outflow.
    #[error("no minting source: total mint weight is zero")]
    NoMintingSource,

    /// A computed transition probability fell outside [0, 1].
    #[error("invalid transition probability for {address}: {probability}")]
    InvalidTransitionProbability {
        /// Canonical rendering of the edge address.
        address: String,
        /// The offending probability.
        probability: f64,
    },

    /// A node's outgoing probabilities deviate from 1 beyond tolerance on
    /// chain export.
    #[error("out-transition sum check failed for {address}: mass {mass}")]
    SumCheckViolation {
        /// Canonical rendering of the offending node address.
        address: String,
        /// The node's out-transition mass.
        mass: f64,
    },

    /// A serialized envelope reports an unknown version.
    #[error("version mismatch: expected {expected}, got {actual}")]
    VersionMismatch {
        /// The version this build understands.
        expected: String,
        /// The version found in the document.
        actual: String,
    },

    /// A serialized document is structurally unusable (wrong type tag,
    /// unresolvable index, or undecodable payload).
    #[error("malformed document: {message}")]
    MalformedDocument {
        /// What was wrong with the document.
        message: String,
    },

    /// The score vector does not match the node order.
    #[error("score vector length {actual} does not match node order length {expected}")]
    ScoreMismatch {
        /// Node order length.
        expected: usize,
        /// Score vector length.
        actual: usize,
    },

    /// A score entry is negative or non-finite.
    #[error("invalid score at index {index}: {value}")]
    InvalidScore {
        /// Index into the node order.
        index: usize,
        /// The offending value.
        value: f64,
    },

    /// Failure from the core algebra (address parsing, weight evaluation).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// An internal invariant was violated. These indicate bugs and should
    /// be reported.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type alias for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;
