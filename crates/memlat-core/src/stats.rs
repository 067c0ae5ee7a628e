// SPDX-License-Identifier: MIT OR Apache-2.0
//! Round samples and cumulative running averages

use serde::{Deserialize, Serialize};

/// Result of one `measure` call for a single pattern
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RoundSample {
    /// Mean pass duration in nanoseconds
    pub latency_ns: f64,
    /// Bandwidth derived from `latency_ns`
    pub bandwidth_gbps: f64,
}

/// Cumulative unweighted mean of every sample folded so far.
///
/// There is no decay and no window: after `k` folds each mean equals the
/// arithmetic mean of the `k` samples.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RunningAverage {
    /// Mean latency in nanoseconds
    pub mean_latency_ns: f64,
    /// Mean bandwidth in GB/s
    pub mean_bandwidth_gbps: f64,
    /// Number of samples folded in
    pub round_count: u64,
}

impl RunningAverage {
    /// Creates an empty average
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mean_latency_ns: 0.0,
            mean_bandwidth_gbps: 0.0,
            round_count: 0,
        }
    }

    /// Folds one sample into both means and bumps the count
    #[allow(clippy::cast_precision_loss)]
    pub fn fold(&mut self, sample: RoundSample) {
        let n = self.round_count as f64;
        self.mean_latency_ns = self.mean_latency_ns.mul_add(n, sample.latency_ns) / (n + 1.0);
        self.mean_bandwidth_gbps =
            self.mean_bandwidth_gbps.mul_add(n, sample.bandwidth_gbps) / (n + 1.0);
        self.round_count += 1;
    }

    /// True until the first sample has been folded
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.round_count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample(latency_ns: f64, bandwidth_gbps: f64) -> RoundSample {
        RoundSample {
            latency_ns,
            bandwidth_gbps,
        }
    }

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn test_single_fold_equals_sample() {
        let mut avg = RunningAverage::new();
        assert!(avg.is_empty());
        avg.fold(sample(123.5, 4.25));
        assert_eq!(avg.mean_latency_ns, 123.5);
        assert_eq!(avg.mean_bandwidth_gbps, 4.25);
        assert_eq!(avg.round_count, 1);
        assert!(!avg.is_empty());
    }

    #[test]
    fn test_identical_samples_stay_put() {
        let mut avg = RunningAverage::new();
        for _ in 0..1000 {
            avg.fold(sample(250.0, 8.0));
            assert!(approx_eq(avg.mean_latency_ns, 250.0));
            assert!(approx_eq(avg.mean_bandwidth_gbps, 8.0));
        }
        assert_eq!(avg.round_count, 1000);
    }

    #[test]
    fn test_means_are_independent() {
        let mut avg = RunningAverage::new();
        avg.fold(sample(10.0, 1.0));
        avg.fold(sample(20.0, 5.0));
        avg.fold(sample(30.0, 0.0));
        assert!(approx_eq(avg.mean_latency_ns, 20.0));
        assert!(approx_eq(avg.mean_bandwidth_gbps, 2.0));
    }

    proptest! {
        #[test]
        fn prop_mean_matches_arithmetic_mean(
            samples in prop::collection::vec((0.0f64..1e9, 0.0f64..1e4), 1..200)
        ) {
            let mut avg = RunningAverage::new();
            for &(l, b) in &samples {
                avg.fold(sample(l, b));
            }
            let k = samples.len() as f64;
            let lat: f64 = samples.iter().map(|s| s.0).sum::<f64>() / k;
            let bw: f64 = samples.iter().map(|s| s.1).sum::<f64>() / k;
            prop_assert_eq!(avg.round_count, samples.len() as u64);
            prop_assert!((avg.mean_latency_ns - lat).abs() <= 1e-6 * lat.max(1.0));
            prop_assert!((avg.mean_bandwidth_gbps - bw).abs() <= 1e-6 * bw.max(1.0));
        }
    }
}
