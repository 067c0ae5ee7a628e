// SPDX-License-Identifier: MIT OR Apache-2.0
//! Round snapshots handed to the display layer

use memlat_core::{AccessPattern, RunningAverage};
use serde::Serialize;

/// Running average for one pattern
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PatternAverage {
    /// Pattern measured
    pub pattern: AccessPattern,
    /// Cumulative means for it
    #[serde(flatten)]
    pub average: RunningAverage,
}

/// Snapshot of every running average after a round
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundReport {
    /// Rounds completed so far (1-based after the first round)
    pub round: u64,
    /// One entry per pattern, in display order
    pub patterns: [PatternAverage; AccessPattern::COUNT],
}

impl RoundReport {
    /// Builds a report from averages indexed by [`AccessPattern::index`]
    #[must_use]
    pub fn new(round: u64, averages: &[RunningAverage; AccessPattern::COUNT]) -> Self {
        let patterns = AccessPattern::ALL.map(|pattern| PatternAverage {
            pattern,
            average: averages[pattern.index()],
        });
        Self { round, patterns }
    }

    /// Average for `pattern`
    #[must_use]
    pub const fn get(&self, pattern: AccessPattern) -> &RunningAverage {
        &self.patterns[pattern.index()].average
    }

    /// Unweighted mean latency across all six patterns
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_latency_ns(&self) -> f64 {
        self.patterns
            .iter()
            .map(|p| p.average.mean_latency_ns)
            .sum::<f64>()
            / AccessPattern::COUNT as f64
    }

    /// Unweighted mean bandwidth across all six patterns
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_bandwidth_gbps(&self) -> f64 {
        self.patterns
            .iter()
            .map(|p| p.average.mean_bandwidth_gbps)
            .sum::<f64>()
            / AccessPattern::COUNT as f64
    }
}
