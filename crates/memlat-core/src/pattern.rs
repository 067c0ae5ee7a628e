// SPDX-License-Identifier: MIT OR Apache-2.0
//! Access pattern definitions
//!
//! Each [`AccessPattern`] names the sequence of vector operations applied to
//! every chunk of the measured region during one pass.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single vector-width memory operation on one chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VectorOp {
    /// Aligned vector load into the suppression register
    Load,
    /// Aligned vector store of the suppression register
    Store,
}

/// The six measured access patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessPattern {
    /// One load per chunk
    Read,
    /// One store per chunk
    Write,
    /// Two loads from the same chunk
    ReadRead,
    /// Load then store to the same chunk
    ReadWrite,
    /// Store then load from the same chunk
    WriteRead,
    /// Two stores to the same chunk
    WriteWrite,
}

impl AccessPattern {
    /// Number of patterns
    pub const COUNT: usize = 6;

    /// All patterns in display order (table column order)
    pub const ALL: [Self; Self::COUNT] = [
        Self::Read,
        Self::Write,
        Self::ReadRead,
        Self::ReadWrite,
        Self::WriteRead,
        Self::WriteWrite,
    ];

    /// Order in which patterns are measured within a round.
    ///
    /// Double-op patterns run first, single-op patterns last.
    pub const MEASUREMENT_ORDER: [Self; Self::COUNT] = [
        Self::ReadRead,
        Self::ReadWrite,
        Self::WriteRead,
        Self::WriteWrite,
        Self::Read,
        Self::Write,
    ];

    /// Per-chunk operation schedule, applied in order
    #[must_use]
    pub const fn ops(self) -> &'static [VectorOp] {
        use VectorOp::{Load, Store};
        match self {
            Self::Read => &[Load],
            Self::Write => &[Store],
            Self::ReadRead => &[Load, Load],
            Self::ReadWrite => &[Load, Store],
            Self::WriteRead => &[Store, Load],
            Self::WriteWrite => &[Store, Store],
        }
    }

    /// Short column label, e.g. `R->W`
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Read => "R",
            Self::Write => "W",
            Self::ReadRead => "R->R",
            Self::ReadWrite => "R->W",
            Self::WriteRead => "W->R",
            Self::WriteWrite => "W->W",
        }
    }

    /// Position of this pattern in [`AccessPattern::ALL`]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Read => 0,
            Self::Write => 1,
            Self::ReadRead => 2,
            Self::ReadWrite => 3,
            Self::WriteRead => 4,
            Self::WriteWrite => 5,
        }
    }
}

impl fmt::Display for AccessPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_display_order() {
        for (i, pattern) in AccessPattern::ALL.iter().enumerate() {
            assert_eq!(pattern.index(), i);
        }
    }

    #[test]
    fn test_measurement_order_is_permutation() {
        let mut sorted = AccessPattern::MEASUREMENT_ORDER;
        sorted.sort();
        assert_eq!(sorted, AccessPattern::ALL);
    }

    #[test]
    fn test_ops_schedule() {
        assert_eq!(AccessPattern::Read.ops(), &[VectorOp::Load]);
        assert_eq!(AccessPattern::Write.ops(), &[VectorOp::Store]);
        assert_eq!(
            AccessPattern::WriteRead.ops(),
            &[VectorOp::Store, VectorOp::Load]
        );
        for pattern in AccessPattern::ALL {
            let expected = if matches!(pattern, AccessPattern::Read | AccessPattern::Write) {
                1
            } else {
                2
            };
            assert_eq!(pattern.ops().len(), expected, "{pattern:?}");
        }
    }

    #[test]
    fn test_labels() {
        let labels: Vec<&str> = AccessPattern::ALL.iter().map(|p| p.label()).collect();
        assert_eq!(labels, vec!["R", "W", "R->R", "R->W", "W->R", "W->W"]);
        assert_eq!(AccessPattern::ReadWrite.to_string(), "R->W");
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&AccessPattern::WriteWrite).unwrap();
        assert_eq!(json, "\"write_write\"");
        let back: AccessPattern = serde_json::from_str("\"read_write\"").unwrap();
        assert_eq!(back, AccessPattern::ReadWrite);
    }
}
