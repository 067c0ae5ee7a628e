// SPDX-License-Identifier: MIT OR Apache-2.0
//! End-to-end measurement over a real engine and clock

use memlat::{
    AccessPattern, AccessPatternEngine, AlignedBuffer, Backend, LatencyAggregator, MemlatError,
    MonotonicClock, PassRunner, TimingSource, bandwidth_gbps,
};

/// 64 Ki words: large enough that a pass is measurably non-zero
const LEN: usize = 64 * 1024;

fn engine() -> AccessPatternEngine {
    let mut engine = AccessPatternEngine::new(AlignedBuffer::new(LEN).unwrap());
    engine.buffer_mut().init_pointer_chain();
    engine
}

#[test]
fn test_real_rounds_produce_finite_averages() {
    let mut agg = LatencyAggregator::new(engine(), MonotonicClock::new());
    let _ = agg.run_round();
    let report = agg.run_round();

    assert_eq!(report.round, 2);
    for entry in &report.patterns {
        let avg = entry.average;
        assert_eq!(avg.round_count, 2);
        assert!(avg.mean_latency_ns > 0.0, "{:?}", entry.pattern);
        assert!(avg.mean_latency_ns.is_finite());
        assert!(avg.mean_bandwidth_gbps.is_finite());
        assert!(avg.mean_bandwidth_gbps > 0.0);
    }
    assert!(report.mean_latency_ns() > 0.0);
}

#[test]
fn test_measure_bandwidth_follows_latency() {
    let mut agg = LatencyAggregator::new(engine(), MonotonicClock::new());
    let sample = agg.measure(AccessPattern::ReadWrite);
    assert_eq!(sample.bandwidth_gbps, bandwidth_gbps(LEN, sample.latency_ns));
}

#[test]
fn test_portable_backend_through_aggregator() {
    let engine =
        AccessPatternEngine::with_backend(AlignedBuffer::new(LEN).unwrap(), Backend::Portable)
            .unwrap();
    let mut agg = LatencyAggregator::new(engine, MonotonicClock::new());
    let report = agg.run_round();
    assert_eq!(report.round, 1);
    let (engine, clock) = agg.into_parts();
    assert_eq!(engine.len_elements(), LEN);
    assert_eq!(clock.name(), "monotonic");
}

#[test]
fn test_boxed_clock_and_borrowed_runner() {
    let mut engine = engine();
    let clock: Box<dyn TimingSource> = Box::new(MonotonicClock::new());
    let mut agg = LatencyAggregator::new(&mut engine, clock);
    let _ = agg.run_round();
    assert_eq!(agg.rounds(), 1);
}

#[test]
fn test_misaligned_length_rejected() {
    assert!(matches!(
        AlignedBuffer::new(LEN + 1),
        Err(MemlatError::InvalidLength { .. })
    ));
}
