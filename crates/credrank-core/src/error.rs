//! Error types for credrank-core.
//!
//! This module defines the central error type [`CoreError`] used throughout
//! the credrank-core crate, along with the [`CoreResult<T>`] type alias.
//! All variants are construction-time failures: none are recoverable
//! locally, and each carries the offending address or value.

use thiserror::Error;

/// Top-level error type for credrank-core operations.
///
/// # Examples
///
/// ```
/// use credrank_core::CoreError;
///
/// let error = CoreError::InvalidNodeWeight {
///     address: "NodeAddress[\"repo\"]".to_string(),
///     weight: -1.0,
/// };
/// assert!(error.to_string().contains("-1"));
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// An address part failed validation.
    ///
    /// Parts are separator-free strings; a NUL byte inside a part would
    /// make the canonical rendering ambiguous.
    #[error("invalid address part: {part:?}")]
    InvalidPart {
        /// The offending part.
        part: String,
    },

    /// A structural address failed a gadget's inverse parse.
    ///
    /// Raised when an address does not carry the gadget's prefix, or when
    /// the key parts after the prefix are malformed.
    #[error("address parse error: expected {expected}, got {address}")]
    AddressParseError {
        /// Human-readable description of what the gadget expected.
        expected: String,
        /// Canonical rendering of the address that failed to parse.
        address: String,
    },

    /// The weight evaluator produced a negative or non-finite node weight.
    #[error("invalid node weight for {address}: {weight}")]
    InvalidNodeWeight {
        /// Canonical rendering of the node address.
        address: String,
        /// The invalid weight value.
        weight: f64,
    },

    /// The weight evaluator produced a negative or non-finite edge weight.
    #[error("invalid edge weight for {address}: forwards {forwards}, backwards {backwards}")]
    InvalidEdgeWeight {
        /// Canonical rendering of the edge address.
        address: String,
        /// The forward weight component.
        forwards: f64,
        /// The backward weight component.
        backwards: f64,
    },
}

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_part_display() {
        let err = CoreError::InvalidPart {
            part: "a\0b".to_string(),
        };
        assert!(err.to_string().contains("invalid address part"));
    }

    #[test]
    fn test_address_parse_error_display() {
        let err = CoreError::AddressParseError {
            expected: "user-epoch prefix".to_string(),
            address: "NodeAddress[\"foo\"]".to_string(),
        };
        assert!(err.to_string().contains("user-epoch prefix"));
        assert!(err.to_string().contains("NodeAddress[\"foo\"]"));
    }

    #[test]
    fn test_invalid_weight_display() {
        let err = CoreError::InvalidNodeWeight {
            address: "NodeAddress[\"repo\"]".to_string(),
            weight: f64::NAN,
        };
        assert!(err.to_string().contains("NaN"));
    }
}
