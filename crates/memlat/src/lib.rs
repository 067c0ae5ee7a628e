// SPDX-License-Identifier: MIT OR Apache-2.0
//! # memlat
//!
//! Continuous memory latency and bandwidth checker.
//!
//! memlat streams 32-byte vector loads and stores over a 32 MiB region in six
//! access patterns (`R`, `W`, `R->R`, `R->W`, `W->R`, `W->W`), times 100
//! passes of each per round, and keeps an unweighted running mean of every
//! round's latency and derived bandwidth.
//!
//! ## Usage
//!
//! ```no_run
//! use memlat::{AccessPatternEngine, LatencyAggregator, MonotonicClock};
//!
//! let mut engine = AccessPatternEngine::allocate()?;
//! engine.buffer_mut().init_pointer_chain();
//! let mut aggregator = LatencyAggregator::new(engine, MonotonicClock::new());
//!
//! for _ in 0..10 {
//!     let report = aggregator.run_round();
//!     println!("round {}: {:.2} ns", report.round, report.mean_latency_ns());
//! }
//! # Ok::<(), memlat::MemlatError>(())
//! ```
//!
//! ## Crates
//!
//! - `memlat-core` - error type, constants, patterns, running averages
//! - `memlat-simd` - aligned buffer and vector backends
//! - `memlat-cli` - the `memlat` binary

#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]

/// Timed measurement and running averages
pub mod aggregator;
/// Per-round snapshots
pub mod report;
/// Timing sources
pub mod timing;

pub use aggregator::{BANDWIDTH_DIVISOR, GIB, LatencyAggregator, bandwidth_gbps};
pub use report::{PatternAverage, RoundReport};
pub use timing::{CycleCounter, MonotonicClock, TimerKind, TimingSource};

pub use memlat_core::{
    ARRAY_LEN, ARRAY_SIZE, AccessPattern, ITERATIONS, MemlatError, PassRunner, Result,
    RoundSample, RunningAverage, VECTOR_WIDTH,
};
pub use memlat_simd::{AccessPatternEngine, AlignedBuffer, Backend};

#[cfg(test)]
mod tests {
    #[test]
    fn test_workspace_readme_exists() {
        let readme =
            std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join(env!("CARGO_PKG_README"));
        assert!(readme.is_file(), "missing {}", readme.display());
    }
}
