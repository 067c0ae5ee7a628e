// SPDX-License-Identifier: MIT OR Apache-2.0
//! Vectorized access-pattern passes for memlat
//!
//! - [`buffer`] - Vector-aligned measured region
//! - [`access`] - Chunk-access trait and the shared pass schedule
//! - [`backends`] - AVX2 and portable chunk accessors
//! - [`engine`] - [`AccessPatternEngine`], the pass runner used by the aggregator

#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]

/// Chunk-access trait and pass driver
pub mod access;
/// Vector backends
pub mod backends;
/// Aligned buffer
pub mod buffer;
/// Access pattern engine
pub mod engine;

pub use access::{ChunkAccess, drive_pass};
pub use backends::Backend;
pub use buffer::AlignedBuffer;
pub use engine::AccessPatternEngine;
