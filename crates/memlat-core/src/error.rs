// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error types for memlat operations

use thiserror::Error;

/// Errors raised while setting up a measurement run.
///
/// None of these can occur once a round has started: `run_round` is infallible.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MemlatError {
    /// The aligned allocation for the measured region failed
    #[error("failed to allocate {bytes} bytes aligned to {align}")]
    Allocation {
        /// Requested size in bytes
        bytes: usize,
        /// Requested alignment in bytes
        align: usize,
    },

    /// The buffer length is zero or not a whole number of vector chunks
    #[error("buffer of {bytes} bytes is not a non-zero multiple of the {vector_width}-byte vector width")]
    InvalidLength {
        /// Requested size in bytes
        bytes: usize,
        /// Required granularity in bytes
        vector_width: usize,
    },

    /// The requested timing source is not available on this target
    #[error("timing source '{0}' is not supported on this target")]
    UnsupportedTimer(&'static str),

    /// The requested vector backend is not supported by this CPU
    #[error("vector backend '{0}' is not supported by this CPU")]
    UnsupportedBackend(&'static str),

    /// Cycle counter frequency calibration produced an unusable value
    #[error("cycle counter calibration failed: {0}")]
    Calibration(String),
}

/// Result type alias for memlat operations
pub type Result<T> = std::result::Result<T, MemlatError>;
