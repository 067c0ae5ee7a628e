// SPDX-License-Identifier: MIT OR Apache-2.0
//! Access pattern engine
//!
//! Owns the measured region and the backend chosen for it, and exposes one
//! pass per [`AccessPattern`] through the [`PassRunner`] seam.

use crate::backends::Backend;
use crate::buffer::AlignedBuffer;
use memlat_core::{ARRAY_LEN, AccessPattern, MemlatError, PassRunner, Result};

/// Executes vectorized passes over an exclusively owned buffer
#[derive(Debug)]
pub struct AccessPatternEngine {
    buffer: AlignedBuffer,
    backend: Backend,
}

impl AccessPatternEngine {
    /// Wraps `buffer` with the best backend for this CPU
    #[must_use]
    pub fn new(buffer: AlignedBuffer) -> Self {
        let backend = Backend::detect();
        log::debug!("access pattern engine using {backend} backend");
        Self { buffer, backend }
    }

    /// Wraps `buffer` with an explicit backend.
    ///
    /// # Errors
    ///
    /// [`MemlatError::UnsupportedBackend`] if the CPU cannot run `backend`.
    pub fn with_backend(buffer: AlignedBuffer, backend: Backend) -> Result<Self> {
        if !backend.is_available() {
            return Err(MemlatError::UnsupportedBackend(backend.name()));
        }
        Ok(Self { buffer, backend })
    }

    /// Allocates the standard `ARRAY_SIZE` region and wraps it.
    ///
    /// # Errors
    ///
    /// [`MemlatError::Allocation`] if the region cannot be allocated.
    pub fn allocate() -> Result<Self> {
        AlignedBuffer::new(ARRAY_LEN).map(Self::new)
    }

    /// Runs one full pass of `pattern`
    pub fn run(&mut self, pattern: AccessPattern) {
        // SAFETY: backend availability is checked at construction
        unsafe { self.backend.run(&mut self.buffer, pattern) };
    }

    /// Backend in use
    #[must_use]
    pub const fn backend(&self) -> Backend {
        self.backend
    }

    /// The measured region
    #[must_use]
    pub const fn buffer(&self) -> &AlignedBuffer {
        &self.buffer
    }

    /// The measured region, mutably (e.g. to seed it before measuring)
    pub const fn buffer_mut(&mut self) -> &mut AlignedBuffer {
        &mut self.buffer
    }
}

impl PassRunner for AccessPatternEngine {
    fn run_pass(&mut self, pattern: AccessPattern) {
        self.run(pattern);
    }

    fn len_elements(&self) -> usize {
        self.buffer.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runs_every_pattern() {
        let mut engine = AccessPatternEngine::new(AlignedBuffer::new(512).unwrap());
        engine.buffer_mut().init_pointer_chain();
        for pattern in AccessPattern::MEASUREMENT_ORDER {
            engine.run_pass(pattern);
        }
        assert_eq!(engine.len_elements(), 512);
        assert!(engine.backend().is_available());
    }

    #[test]
    fn test_portable_backend_always_accepted() {
        let engine =
            AccessPatternEngine::with_backend(AlignedBuffer::new(64).unwrap(), Backend::Portable)
                .unwrap();
        assert_eq!(engine.backend(), Backend::Portable);
        assert_eq!(engine.buffer().len(), 64);
    }

    #[test]
    fn test_unavailable_backend_rejected() {
        if Backend::Avx2.is_available() {
            return;
        }
        let err = AccessPatternEngine::with_backend(AlignedBuffer::new(64).unwrap(), Backend::Avx2)
            .unwrap_err();
        assert_eq!(err, MemlatError::UnsupportedBackend("avx2"));
    }

    #[test]
    fn test_read_only_passes_preserve_chain() {
        let mut engine = AccessPatternEngine::new(AlignedBuffer::new(256).unwrap());
        engine.buffer_mut().init_pointer_chain();
        let before = engine.buffer().as_slice().to_vec();
        engine.run(AccessPattern::Read);
        engine.run(AccessPattern::ReadRead);
        engine.run(AccessPattern::ReadWrite);
        assert_eq!(engine.buffer().as_slice(), &before[..]);
    }
}
