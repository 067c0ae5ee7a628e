// SPDX-License-Identifier: MIT OR Apache-2.0
//! AVX2 backend
//!
//! Each chunk is one `__m256i`. The suppression register is written with a
//! volatile store after every load so the loads cannot be dropped as dead.

use crate::access::{ChunkAccess, drive_pass};
use crate::buffer::AlignedBuffer;
use memlat_core::AccessPattern;
use std::arch::x86_64::{__m256i, _mm256_load_si256, _mm256_store_si256};
use std::marker::PhantomData;
use std::ptr;

/// Chunk accessor over an [`AlignedBuffer`] viewed as `__m256i`s
pub struct Avx2Lanes<'a> {
    base: *mut __m256i,
    chunks: usize,
    sink: __m256i,
    _buffer: PhantomData<&'a mut AlignedBuffer>,
}

impl<'a> Avx2Lanes<'a> {
    /// Borrows `buffer` for the duration of a pass
    pub fn new(buffer: &'a mut AlignedBuffer) -> Self {
        Self {
            chunks: buffer.chunk_count(),
            base: buffer.as_mut_ptr().cast::<__m256i>(),
            // SAFETY: all-zero bits are a valid __m256i
            sink: unsafe { std::mem::zeroed() },
            _buffer: PhantomData,
        }
    }
}

impl ChunkAccess for Avx2Lanes<'_> {
    #[inline]
    fn chunk_count(&self) -> usize {
        self.chunks
    }

    #[inline]
    unsafe fn load(&mut self, chunk: usize) {
        // SAFETY: chunk < chunks, base is 32-byte aligned, AVX2 checked by caller
        unsafe {
            let v = _mm256_load_si256(self.base.add(chunk));
            ptr::write_volatile(&raw mut self.sink, v);
        }
    }

    #[inline]
    unsafe fn store(&mut self, chunk: usize) {
        // SAFETY: as for load
        unsafe {
            let v = ptr::read_volatile(&raw const self.sink);
            _mm256_store_si256(self.base.add(chunk), v);
        }
    }
}

/// One full pass over `buffer`.
///
/// # Safety
///
/// The CPU must support AVX2.
#[target_feature(enable = "avx2")]
pub unsafe fn pass(buffer: &mut AlignedBuffer, pattern: AccessPattern) {
    let mut lanes = Avx2Lanes::new(buffer);
    drive_pass(&mut lanes, pattern);
}
