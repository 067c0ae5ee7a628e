// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timing sources
//!
//! A [`TimingSource`] hands out raw ticks and converts tick deltas to
//! nanoseconds. Running averages mix samples additively, so one source must
//! be used for the whole run; the aggregator owns exactly one for its
//! lifetime.

use memlat_core::{MemlatError, Result};
use std::fmt;
use std::time::{Duration, Instant};

/// Monotonic tick source with a fixed tick-to-nanosecond conversion
pub trait TimingSource {
    /// Current tick value
    fn now(&mut self) -> u64;

    /// Converts a tick delta to nanoseconds
    fn ticks_to_ns(&self, ticks: u64) -> f64;

    /// Short name for logs and reports
    fn name(&self) -> &'static str;
}

impl<T: TimingSource + ?Sized> TimingSource for Box<T> {
    fn now(&mut self) -> u64 {
        (**self).now()
    }

    fn ticks_to_ns(&self, ticks: u64) -> f64 {
        (**self).ticks_to_ns(ticks)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// OS monotonic clock; one tick is one nanosecond
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Starts the clock at zero
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimingSource for MonotonicClock {
    #[inline]
    fn now(&mut self) -> u64 {
        u64::try_from(self.origin.elapsed().as_nanos()).unwrap_or(u64::MAX)
    }

    #[inline]
    #[allow(clippy::cast_precision_loss)]
    fn ticks_to_ns(&self, ticks: u64) -> f64 {
        ticks as f64
    }

    fn name(&self) -> &'static str {
        "monotonic"
    }
}

/// Default calibration window for [`CycleCounter::calibrate`]
pub const CALIBRATION_WINDOW: Duration = Duration::from_millis(50);

/// CPU timestamp counter with a frequency measured once at construction
#[derive(Debug, Clone, Copy)]
pub struct CycleCounter {
    ns_per_tick: f64,
}

impl CycleCounter {
    /// Calibrates over [`CALIBRATION_WINDOW`].
    ///
    /// # Errors
    ///
    /// See [`CycleCounter::calibrate_for`].
    pub fn calibrate() -> Result<Self> {
        Self::calibrate_for(CALIBRATION_WINDOW)
    }

    /// Measures the counter frequency against the monotonic clock over `window`.
    ///
    /// # Errors
    ///
    /// - [`MemlatError::UnsupportedTimer`] on targets without a readable counter
    /// - [`MemlatError::Calibration`] if the counter did not advance
    #[cfg(target_arch = "x86_64")]
    pub fn calibrate_for(window: Duration) -> Result<Self> {
        let start = Instant::now();
        let c0 = read_tsc();
        while start.elapsed() < window {
            std::hint::spin_loop();
        }
        let c1 = read_tsc();
        let elapsed = start.elapsed();

        Self::from_measurement(c1.wrapping_sub(c0), elapsed)
    }

    /// Measures the counter frequency against the monotonic clock over `window`.
    ///
    /// # Errors
    ///
    /// Always [`MemlatError::UnsupportedTimer`] on this target.
    #[cfg(not(target_arch = "x86_64"))]
    pub fn calibrate_for(_window: Duration) -> Result<Self> {
        Err(MemlatError::UnsupportedTimer("cycles"))
    }

    /// Builds a counter from `ticks` observed over `elapsed`.
    ///
    /// # Errors
    ///
    /// [`MemlatError::Calibration`] if either value is zero.
    #[allow(clippy::cast_precision_loss)]
    pub fn from_measurement(ticks: u64, elapsed: Duration) -> Result<Self> {
        if ticks == 0 || elapsed.is_zero() {
            return Err(MemlatError::Calibration(format!(
                "{ticks} ticks over {elapsed:?}"
            )));
        }
        let ns_per_tick = elapsed.as_nanos() as f64 / ticks as f64;
        let counter = Self { ns_per_tick };
        log::info!(
            "cycle counter calibrated at {:.3} GHz",
            counter.frequency_hz() / 1e9
        );
        Ok(counter)
    }

    /// Calibrated frequency in Hz
    #[must_use]
    pub fn frequency_hz(&self) -> f64 {
        1e9 / self.ns_per_tick
    }
}

impl TimingSource for CycleCounter {
    #[inline]
    fn now(&mut self) -> u64 {
        read_tsc()
    }

    #[inline]
    #[allow(clippy::cast_precision_loss)]
    fn ticks_to_ns(&self, ticks: u64) -> f64 {
        ticks as f64 * self.ns_per_tick
    }

    fn name(&self) -> &'static str {
        "cycles"
    }
}

/// Reads the timestamp counter between two `lfence`s.
///
/// The leading fence keeps the read from starting before earlier loads and
/// stores retire; the trailing one keeps later work from starting before the
/// read. Without them a stamp taken after a pass can land inside it.
#[cfg(target_arch = "x86_64")]
#[inline]
fn read_tsc() -> u64 {
    use std::arch::x86_64::{_mm_lfence, _rdtsc};
    // SAFETY: lfence and rdtsc have no preconditions on x86_64 (SSE2 is baseline)
    unsafe {
        _mm_lfence();
        let tsc = _rdtsc();
        _mm_lfence();
        tsc
    }
}

// Unreachable: CycleCounter cannot be constructed off x86_64.
#[cfg(not(target_arch = "x86_64"))]
#[inline]
const fn read_tsc() -> u64 {
    0
}

/// Selects which [`TimingSource`] a run uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TimerKind {
    /// [`MonotonicClock`]
    #[default]
    Monotonic,
    /// [`CycleCounter`]
    Cycles,
}

impl TimerKind {
    /// Constructs the selected source.
    ///
    /// # Errors
    ///
    /// Propagates [`CycleCounter::calibrate`] failures.
    pub fn build(self) -> Result<Box<dyn TimingSource>> {
        Ok(match self {
            Self::Monotonic => Box::new(MonotonicClock::new()),
            Self::Cycles => Box::new(CycleCounter::calibrate()?),
        })
    }
}

impl fmt::Display for TimerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Monotonic => "monotonic",
            Self::Cycles => "cycles",
        })
    }
}
