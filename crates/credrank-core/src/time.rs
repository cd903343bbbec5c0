//! Time boundaries and interval sequences.
//!
//! An interval sequence produces the time boundaries
//! `[-Infinity, start_0, start_1, ..., +Infinity]`. Epochs are consecutive
//! pairs of boundaries and are indexed by their start boundary; every
//! participant has one user-epoch node per boundary.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A boundary of the epoch skeleton: negative infinity, a finite epoch
/// start in milliseconds, or positive infinity.
///
/// The derived ordering places `NegInfinity` before every finite boundary
/// and `PosInfinity` after, so a sorted boundary sequence is the natural
/// one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TimeBoundary {
    /// Sentinel preceding every finite time.
    NegInfinity,
    /// A finite boundary, in milliseconds since the Unix epoch.
    Finite(i64),
    /// Sentinel following every finite time.
    PosInfinity,
}

impl TimeBoundary {
    /// The finite value, if this boundary is finite.
    pub fn finite(self) -> Option<i64> {
        match self {
            TimeBoundary::Finite(ms) => Some(ms),
            _ => None,
        }
    }

    /// Parse the address-part rendering produced by `Display`.
    ///
    /// Returns `None` for anything that is not `-Infinity`, `Infinity`, or
    /// a decimal integer.
    pub fn parse(s: &str) -> Option<TimeBoundary> {
        match s {
            "-Infinity" => Some(TimeBoundary::NegInfinity),
            "Infinity" => Some(TimeBoundary::PosInfinity),
            _ => s.parse::<i64>().ok().map(TimeBoundary::Finite),
        }
    }
}

impl fmt::Display for TimeBoundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeBoundary::NegInfinity => write!(f, "-Infinity"),
            TimeBoundary::Finite(ms) => write!(f, "{}", ms),
            TimeBoundary::PosInfinity => write!(f, "Infinity"),
        }
    }
}

/// A half-open time interval `[start_time_ms, end_time_ms)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interval {
    /// Inclusive start, in milliseconds since the Unix epoch.
    pub start_time_ms: i64,
    /// Exclusive end, in milliseconds since the Unix epoch.
    pub end_time_ms: i64,
}

/// The boundary sequence for an interval sequence: the infinite sentinels
/// wrapped around every interval start.
pub fn time_boundaries(intervals: &[Interval]) -> Vec<TimeBoundary> {
    let mut boundaries = Vec::with_capacity(intervals.len() + 2);
    boundaries.push(TimeBoundary::NegInfinity);
    boundaries.extend(intervals.iter().map(|i| TimeBoundary::Finite(i.start_time_ms)));
    boundaries.push(TimeBoundary::PosInfinity);
    boundaries
}

/// The boundary immediately preceding `timestamp_ms`: the last boundary
/// less than or equal to it. Always defined because the sequence starts at
/// `-Infinity`.
pub fn boundary_preceding(boundaries: &[TimeBoundary], timestamp_ms: i64) -> TimeBoundary {
    let t = TimeBoundary::Finite(timestamp_ms);
    let idx = boundaries.partition_point(|b| *b <= t);
    boundaries[idx - 1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_ordering() {
        assert!(TimeBoundary::NegInfinity < TimeBoundary::Finite(i64::MIN));
        assert!(TimeBoundary::Finite(i64::MAX) < TimeBoundary::PosInfinity);
        assert!(TimeBoundary::Finite(-5) < TimeBoundary::Finite(3));
    }

    #[test]
    fn test_boundary_display_parse_roundtrip() {
        for b in [
            TimeBoundary::NegInfinity,
            TimeBoundary::Finite(-42),
            TimeBoundary::Finite(0),
            TimeBoundary::Finite(1700000000000),
            TimeBoundary::PosInfinity,
        ] {
            assert_eq!(TimeBoundary::parse(&b.to_string()), Some(b));
        }
        assert_eq!(TimeBoundary::parse("not-a-boundary"), None);
    }

    #[test]
    fn test_time_boundaries_wraps_sentinels() {
        let intervals = [
            Interval {
                start_time_ms: 0,
                end_time_ms: 10,
            },
            Interval {
                start_time_ms: 10,
                end_time_ms: 20,
            },
        ];
        assert_eq!(
            time_boundaries(&intervals),
            vec![
                TimeBoundary::NegInfinity,
                TimeBoundary::Finite(0),
                TimeBoundary::Finite(10),
                TimeBoundary::PosInfinity,
            ]
        );
    }

    #[test]
    fn test_boundary_preceding() {
        let boundaries = time_boundaries(&[
            Interval {
                start_time_ms: 0,
                end_time_ms: 10,
            },
            Interval {
                start_time_ms: 10,
                end_time_ms: 20,
            },
        ]);
        assert_eq!(boundary_preceding(&boundaries, -5), TimeBoundary::NegInfinity);
        assert_eq!(boundary_preceding(&boundaries, 0), TimeBoundary::Finite(0));
        assert_eq!(boundary_preceding(&boundaries, 9), TimeBoundary::Finite(0));
        assert_eq!(boundary_preceding(&boundaries, 10), TimeBoundary::Finite(10));
        assert_eq!(boundary_preceding(&boundaries, 99), TimeBoundary::Finite(10));
    }
}
