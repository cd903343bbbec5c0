//! Hierarchical, prefix-ordered addresses for nodes and edges.
//!
//! An address is an ordered sequence of string parts. Node addresses, edge
//! addresses, and Markov edge addresses share the same algebra but are
//! distinct, non-interchangeable types, so a node address can never be
//! passed where an edge address is expected.
//!
//! # Ordering
//!
//! Addresses are totally ordered lexicographically over their *parts*, not
//! over the rendered string. This keeps sorting stable even when a part
//! contains characters that would sort differently once escaped into the
//! canonical string form.
//!
//! # Serialization
//!
//! Addresses serialize as their parts array. The rendered form produced by
//! `Display` (e.g. `NodeAddress["sourcecred","core","SEED"]`) is canonical
//! and injective but is used for human-facing output only.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, CoreResult};

fn validate_part(part: &str) -> CoreResult<()> {
    if part.contains('\0') {
        return Err(CoreError::InvalidPart {
            part: part.to_string(),
        });
    }
    Ok(())
}

macro_rules! define_address_type {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name {
            parts: Vec<String>,
        }

        impl $name {
            /// The empty address. It is a prefix of every address.
            pub fn empty() -> Self {
                Self { parts: Vec::new() }
            }

            /// Construct an address from parts, validating each part.
            ///
            /// # Errors
            ///
            /// Returns [`CoreError::InvalidPart`] if any part contains a NUL
            /// byte.
            pub fn from_parts<I, S>(parts: I) -> CoreResult<Self>
            where
                I: IntoIterator<Item = S>,
                S: Into<String>,
            {
                let parts: Vec<String> = parts.into_iter().map(Into::into).collect();
                for part in &parts {
                    validate_part(part)?;
                }
                Ok(Self { parts })
            }

            /// Construct from parts known to be valid (gadget-synthesized
            /// literals and rendered keys). Not exposed outside the crate.
            pub(crate) fn from_valid_parts<I, S>(parts: I) -> Self
            where
                I: IntoIterator<Item = S>,
                S: Into<String>,
            {
                Self {
                    parts: parts.into_iter().map(Into::into).collect(),
                }
            }

            /// A new address with `parts` appended after this address's parts.
            ///
            /// # Errors
            ///
            /// Returns [`CoreError::InvalidPart`] if any appended part is
            /// invalid.
            pub fn append<I, S>(&self, parts: I) -> CoreResult<Self>
            where
                I: IntoIterator<Item = S>,
                S: Into<String>,
            {
                let mut all = self.parts.clone();
                for part in parts {
                    let part = part.into();
                    validate_part(&part)?;
                    all.push(part);
                }
                Ok(Self { parts: all })
            }

            /// The parts of this address, in order.
            pub fn parts(&self) -> &[String] {
                &self.parts
            }

            /// Whether `prefix` is a (non-strict) prefix of this address.
            pub fn has_prefix(&self, prefix: &Self) -> bool {
                self.parts.len() >= prefix.parts.len()
                    && self.parts[..prefix.parts.len()] == prefix.parts[..]
            }

            /// Number of parts.
            pub fn len(&self) -> usize {
                self.parts.len()
            }

            /// Whether this is the empty address.
            pub fn is_empty(&self) -> bool {
                self.parts.is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}[", $label)?;
                for (i, part) in self.parts.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{:?}", part)?;
                }
                write!(f, "]")
            }
        }
    };
}

define_address_type!(
    /// Address of a node in a contribution or Markov process graph.
    NodeAddress,
    "NodeAddress"
);

define_address_type!(
    /// Address of an edge in a contribution graph, or a structural edge
    /// synthesized by a gadget.
    EdgeAddress,
    "EdgeAddress"
);

define_address_type!(
    /// Address of a directed Markov edge: an edge address qualified by its
    /// direction. See [`crate::markov::markov_edge_address`].
    MarkovEdgeAddress,
    "MarkovEdgeAddress"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_parts_and_back() {
        let addr = NodeAddress::from_parts(["a", "b", "c"]).unwrap();
        assert_eq!(addr.parts(), &["a", "b", "c"]);
        assert_eq!(addr.len(), 3);
        assert!(!addr.is_empty());
    }

    #[test]
    fn test_empty_is_prefix_of_everything() {
        let empty = NodeAddress::empty();
        let addr = NodeAddress::from_parts(["x"]).unwrap();
        assert!(addr.has_prefix(&empty));
        assert!(empty.has_prefix(&empty));
        assert!(!empty.has_prefix(&addr));
    }

    #[test]
    fn test_has_prefix() {
        let prefix = NodeAddress::from_parts(["a", "b"]).unwrap();
        let addr = NodeAddress::from_parts(["a", "b", "c"]).unwrap();
        let other = NodeAddress::from_parts(["a", "x", "c"]).unwrap();
        assert!(addr.has_prefix(&prefix));
        assert!(prefix.has_prefix(&prefix));
        assert!(!other.has_prefix(&prefix));
        assert!(!prefix.has_prefix(&addr));
    }

    #[test]
    fn test_append() {
        let base = NodeAddress::from_parts(["a"]).unwrap();
        let full = base.append(["b", "c"]).unwrap();
        assert_eq!(full.parts(), &["a", "b", "c"]);
        // the original is untouched
        assert_eq!(base.parts(), &["a"]);
    }

    #[test]
    fn test_nul_part_rejected() {
        let err = NodeAddress::from_parts(["ok", "bad\0part"]).unwrap_err();
        assert!(matches!(err, CoreError::InvalidPart { .. }));
        let base = NodeAddress::empty();
        assert!(base.append(["a\0"]).is_err());
    }

    #[test]
    fn test_ordering_is_over_parts_not_strings() {
        // As rendered strings, `["a\"", "b"]` and `["a", "zb"]` would
        // compare through the escape characters; over parts the order is
        // unambiguous.
        let a = NodeAddress::from_parts(["a", "b"]).unwrap();
        let b = NodeAddress::from_parts(["a", "b", "c"]).unwrap();
        let c = NodeAddress::from_parts(["ab"]).unwrap();
        assert!(a < b);
        assert!(b < c);

        let mut sorted = vec![c.clone(), a.clone(), b.clone()];
        sorted.sort();
        assert_eq!(sorted, vec![a, b, c]);
    }

    #[test]
    fn test_display_is_injective_for_tricky_parts() {
        let a = NodeAddress::from_parts(["a\"b"]).unwrap();
        let b = NodeAddress::from_parts(["a", "b"]).unwrap();
        assert_ne!(a.to_string(), b.to_string());
        assert_eq!(b.to_string(), "NodeAddress[\"a\",\"b\"]");
    }

    #[test]
    fn test_node_and_edge_addresses_are_distinct_types() {
        // Compile-time property; spot-check the labels differ.
        let n = NodeAddress::from_parts(["a"]).unwrap();
        let e = EdgeAddress::from_parts(["a"]).unwrap();
        assert!(n.to_string().starts_with("NodeAddress["));
        assert!(e.to_string().starts_with("EdgeAddress["));
    }

    #[test]
    fn test_serde_roundtrip_as_parts_array() {
        let addr = NodeAddress::from_parts(["sourcecred", "core", "SEED"]).unwrap();
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, r#"["sourcecred","core","SEED"]"#);
        let back: NodeAddress = serde_json::from_str(&json).unwrap();
        assert_eq!(addr, back);
    }
}
