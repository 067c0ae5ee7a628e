// SPDX-License-Identifier: MIT OR Apache-2.0
//! Core types, error handling, and foundational types for memlat
//!
//! This crate provides the foundational types used across the memlat workspace:
//!
//! - [`error`] - Error types and Result alias
//! - [`pattern`] - The six access patterns and their per-chunk operation schedule
//! - [`stats`] - Per-round samples and cumulative running averages
//! - [`runner`] - The pass-runner seam between the engine and the aggregator

#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
#![deny(clippy::cargo)]

/// Error types for memlat operations
pub mod error;
/// Access pattern definitions
pub mod pattern;
/// Pass runner trait
pub mod runner;
/// Round samples and running averages
pub mod stats;

// Re-exports for convenience
pub use error::{MemlatError, Result};
pub use pattern::{AccessPattern, VectorOp};
pub use runner::PassRunner;
pub use stats::{RoundSample, RunningAverage};

/// Total size of the measured region in bytes (32 MiB).
pub const ARRAY_SIZE: usize = 32 * 1024 * 1024;

/// Number of timed passes averaged into one round sample.
pub const ITERATIONS: usize = 100;

/// Byte width of one vector load or store.
pub const VECTOR_WIDTH: usize = 32;

/// Number of machine-word slots in the measured region.
pub const ARRAY_LEN: usize = ARRAY_SIZE / std::mem::size_of::<usize>();

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_region_is_whole_chunks() {
        assert_eq!(ARRAY_SIZE % VECTOR_WIDTH, 0);
        assert_eq!(ARRAY_LEN * std::mem::size_of::<usize>(), ARRAY_SIZE);
    }

    #[test]
    fn test_manifest_readme_exists() {
        let readme = Path::new(env!("CARGO_MANIFEST_DIR")).join(env!("CARGO_PKG_README"));
        assert!(readme.is_file(), "missing {}", readme.display());
    }
}
