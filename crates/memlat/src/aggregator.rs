// SPDX-License-Identifier: MIT OR Apache-2.0
//! Latency aggregation
//!
//! [`LatencyAggregator::measure`] times [`ITERATIONS`] passes of one pattern
//! and derives bandwidth from the mean; [`LatencyAggregator::run_round`]
//! measures all six patterns and folds the results into per-pattern running
//! averages. The caller decides how many rounds to run.

use crate::report::RoundReport;
use crate::timing::TimingSource;
use memlat_core::{AccessPattern, ITERATIONS, PassRunner, RoundSample, RunningAverage};

/// Bytes in one GiB, the numerator of the bandwidth model
pub const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Empirical divisor of the bandwidth model
pub const BANDWIDTH_DIVISOR: f64 = 5.0;

/// Bandwidth derived from latency: `GIB / (len_elements * latency_ns / 5)`.
///
/// `len_elements` counts machine words, not bytes. The result is a model
/// figure, not an independently measured throughput. A zero latency yields
/// `f64::INFINITY`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn bandwidth_gbps(len_elements: usize, latency_ns: f64) -> f64 {
    GIB / (len_elements as f64 * latency_ns / BANDWIDTH_DIVISOR)
}

/// Times passes and keeps one running average per pattern
#[derive(Debug)]
pub struct LatencyAggregator<R, C> {
    runner: R,
    clock: C,
    averages: [RunningAverage; AccessPattern::COUNT],
    rounds: u64,
}

impl<R: PassRunner, C: TimingSource> LatencyAggregator<R, C> {
    /// Creates an aggregator with empty averages
    #[must_use]
    pub fn new(runner: R, clock: C) -> Self {
        log::debug!(
            "aggregator over {} elements timed by {} clock",
            runner.len_elements(),
            clock.name()
        );
        Self {
            runner,
            clock,
            averages: [RunningAverage::new(); AccessPattern::COUNT],
            rounds: 0,
        }
    }

    /// Mean duration of [`ITERATIONS`] timed passes of `pattern`, plus the
    /// bandwidth derived from it. Does not touch the running averages.
    #[allow(clippy::cast_precision_loss)]
    pub fn measure(&mut self, pattern: AccessPattern) -> RoundSample {
        let mut total_ns = 0.0;
        for _ in 0..ITERATIONS {
            let start = self.clock.now();
            self.runner.run_pass(pattern);
            let end = self.clock.now();
            total_ns += self.clock.ticks_to_ns(end.saturating_sub(start));
        }

        let latency_ns = total_ns / ITERATIONS as f64;
        RoundSample {
            latency_ns,
            bandwidth_gbps: bandwidth_gbps(self.runner.len_elements(), latency_ns),
        }
    }

    /// Folds `sample` into the running average of `pattern`
    pub fn record(&mut self, pattern: AccessPattern, sample: RoundSample) {
        self.averages[pattern.index()].fold(sample);
    }

    /// Measures every pattern once, in [`AccessPattern::MEASUREMENT_ORDER`],
    /// then folds all six samples and returns the updated snapshot.
    pub fn run_round(&mut self) -> RoundReport {
        let mut samples = [RoundSample::default(); AccessPattern::COUNT];
        for pattern in AccessPattern::MEASUREMENT_ORDER {
            samples[pattern.index()] = self.measure(pattern);
        }
        for pattern in AccessPattern::ALL {
            self.record(pattern, samples[pattern.index()]);
        }
        self.rounds += 1;

        log::trace!("round {} complete", self.rounds);
        self.report()
    }

    /// Snapshot of the current averages
    #[must_use]
    pub fn report(&self) -> RoundReport {
        RoundReport::new(self.rounds, &self.averages)
    }

    /// Running average for `pattern`
    #[must_use]
    pub const fn average(&self, pattern: AccessPattern) -> RunningAverage {
        self.averages[pattern.index()]
    }

    /// Rounds completed
    #[must_use]
    pub const fn rounds(&self) -> u64 {
        self.rounds
    }

    /// The pass runner
    #[must_use]
    pub const fn runner(&self) -> &R {
        &self.runner
    }

    /// The timing source
    #[must_use]
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    /// Consumes the aggregator, returning runner and clock
    #[must_use]
    pub fn into_parts(self) -> (R, C) {
        (self.runner, self.clock)
    }
}
