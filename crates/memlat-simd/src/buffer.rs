// SPDX-License-Identifier: MIT OR Apache-2.0
//! Vector-aligned measured region
//!
//! `Vec<usize>` only guarantees `align_of::<usize>()`, so the region is
//! allocated directly through [`std::alloc`] with a [`VECTOR_WIDTH`] alignment.

use memlat_core::{MemlatError, Result, VECTOR_WIDTH};
use std::alloc::{Layout, alloc_zeroed, dealloc};
use std::fmt;
use std::ptr::NonNull;

const WORD: usize = std::mem::size_of::<usize>();

/// Owned, zero-initialised, `VECTOR_WIDTH`-aligned array of machine words.
///
/// # Invariants
///
/// - `ptr` is non-null, aligned to `VECTOR_WIDTH`, and valid for `len` words
/// - `len * size_of::<usize>()` is a non-zero multiple of `VECTOR_WIDTH`
pub struct AlignedBuffer {
    ptr: NonNull<usize>,
    len: usize,
    layout: Layout,
}

// SAFETY: the buffer exclusively owns its allocation, like a Box<[usize]>.
unsafe impl Send for AlignedBuffer {}

impl AlignedBuffer {
    /// Allocates a buffer of `len` words.
    ///
    /// # Errors
    ///
    /// - [`MemlatError::InvalidLength`] if the byte size is zero or not a
    ///   multiple of the vector width. The length is never rounded.
    /// - [`MemlatError::Allocation`] if the size exceeds what a [`Layout`]
    ///   can describe (`isize::MAX` bytes) or the allocator returns null.
    pub fn new(len: usize) -> Result<Self> {
        let bytes = len.checked_mul(WORD).ok_or(MemlatError::InvalidLength {
            bytes: usize::MAX,
            vector_width: VECTOR_WIDTH,
        })?;
        if bytes == 0 || !bytes.is_multiple_of(VECTOR_WIDTH) {
            return Err(MemlatError::InvalidLength {
                bytes,
                vector_width: VECTOR_WIDTH,
            });
        }

        let alloc_err = MemlatError::Allocation {
            bytes,
            align: VECTOR_WIDTH,
        };
        let layout = Layout::from_size_align(bytes, VECTOR_WIDTH).map_err(|_| alloc_err.clone())?;

        // SAFETY: layout has a non-zero size (checked above)
        let raw = unsafe { alloc_zeroed(layout) };
        let ptr = NonNull::new(raw.cast::<usize>()).ok_or(alloc_err)?;

        log::debug!("allocated {bytes} byte region aligned to {VECTOR_WIDTH}");
        Ok(Self { ptr, len, layout })
    }

    /// Length in machine words
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Always false; zero-length buffers are rejected at construction
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Length in bytes
    #[must_use]
    pub const fn byte_len(&self) -> usize {
        self.layout.size()
    }

    /// Number of `VECTOR_WIDTH` chunks in the region.
    ///
    /// A pass visits all of them, so it covers `byte_len()` bytes. A walk
    /// sized by the word count instead (`len() / VECTOR_WIDTH` chunks) covers
    /// only one eighth of the region on 64-bit targets; latencies from such a
    /// walk are not comparable with memlat's.
    #[must_use]
    pub const fn chunk_count(&self) -> usize {
        self.byte_len() / VECTOR_WIDTH
    }

    /// Base pointer, aligned to `VECTOR_WIDTH`
    #[must_use]
    pub const fn as_mut_ptr(&mut self) -> *mut usize {
        self.ptr.as_ptr()
    }

    /// Words as a slice
    #[must_use]
    pub const fn as_slice(&self) -> &[usize] {
        // SAFETY: ptr is valid for len initialised words (alloc_zeroed)
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    /// Words as a mutable slice
    #[must_use]
    pub const fn as_mut_slice(&mut self) -> &mut [usize] {
        // SAFETY: ptr is valid for len initialised words and uniquely borrowed
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    /// Fills the buffer with a cyclic pointer chain.
    ///
    /// Slot `i` receives the address of slot `(i + 1) % len`. Timed passes
    /// never follow the chain; writing it touches every page up front.
    pub fn init_pointer_chain(&mut self) {
        let base = self.ptr.as_ptr();
        let len = self.len;
        for (i, slot) in self.as_mut_slice().iter_mut().enumerate() {
            *slot = base.wrapping_add((i + 1) % len).addr();
        }
        log::debug!("initialised pointer chain over {len} slots");
    }
}

impl Drop for AlignedBuffer {
    fn drop(&mut self) {
        // SAFETY: ptr was allocated with exactly this layout
        unsafe { dealloc(self.ptr.as_ptr().cast::<u8>(), self.layout) };
    }
}

impl fmt::Debug for AlignedBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlignedBuffer")
            .field("len", &self.len)
            .field("bytes", &self.byte_len())
            .finish_non_exhaustive()
    }
}
