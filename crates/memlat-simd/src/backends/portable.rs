// SPDX-License-Identifier: MIT OR Apache-2.0
//! Portable backend: 32-byte lanes moved with volatile reads and writes

use crate::access::{ChunkAccess, drive_pass};
use crate::buffer::AlignedBuffer;
use memlat_core::{AccessPattern, VECTOR_WIDTH};
use std::marker::PhantomData;
use std::ptr;

/// One vector-width chunk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[repr(C, align(32))]
pub struct Lane(pub [u64; 4]);

const _: () = assert!(std::mem::size_of::<Lane>() == VECTOR_WIDTH);

/// Chunk accessor over an [`AlignedBuffer`] viewed as [`Lane`]s
pub struct PortableLanes<'a> {
    base: *mut Lane,
    chunks: usize,
    sink: Lane,
    _buffer: PhantomData<&'a mut AlignedBuffer>,
}

impl<'a> PortableLanes<'a> {
    /// Borrows `buffer` for the duration of a pass
    pub fn new(buffer: &'a mut AlignedBuffer) -> Self {
        Self {
            chunks: buffer.chunk_count(),
            base: buffer.as_mut_ptr().cast::<Lane>(),
            sink: Lane::default(),
            _buffer: PhantomData,
        }
    }

    /// Current content of the suppression register
    #[must_use]
    pub fn sink(&self) -> Lane {
        // SAFETY: sink is a valid, aligned field of self
        unsafe { ptr::read_volatile(&raw const self.sink) }
    }
}

impl ChunkAccess for PortableLanes<'_> {
    #[inline]
    fn chunk_count(&self) -> usize {
        self.chunks
    }

    #[inline]
    unsafe fn load(&mut self, chunk: usize) {
        // SAFETY: chunk < chunks; base is VECTOR_WIDTH aligned and valid for chunks lanes
        unsafe {
            let lane = ptr::read_volatile(self.base.add(chunk));
            ptr::write_volatile(&raw mut self.sink, lane);
        }
    }

    #[inline]
    unsafe fn store(&mut self, chunk: usize) {
        // SAFETY: as for load
        unsafe {
            let lane = ptr::read_volatile(&raw const self.sink);
            ptr::write_volatile(self.base.add(chunk), lane);
        }
    }
}

/// One full pass over `buffer`
pub fn pass(buffer: &mut AlignedBuffer, pattern: AccessPattern) {
    let mut lanes = PortableLanes::new(buffer);
    drive_pass(&mut lanes, pattern);
}
