// SPDX-License-Identifier: MIT OR Apache-2.0
//! Chunk-access trait and the shared pass schedule
//!
//! Every backend implements [`ChunkAccess`]; [`drive_pass`] is the single
//! place that decides which operations hit which chunk, so the instrumented
//! accessor used in tests sees exactly the traffic a real pass produces.

use memlat_core::AccessPattern;

/// Vector-width load/store primitives over a chunked region.
///
/// Implementations hold a suppression register: loads overwrite it through a
/// volatile write, stores write its current content back to memory.
pub trait ChunkAccess {
    /// Number of vector chunks in the region
    fn chunk_count(&self) -> usize;

    /// Loads chunk `chunk` into the suppression register.
    ///
    /// # Safety
    ///
    /// `chunk < self.chunk_count()`.
    unsafe fn load(&mut self, chunk: usize);

    /// Stores the suppression register to chunk `chunk`.
    ///
    /// # Safety
    ///
    /// `chunk < self.chunk_count()`.
    unsafe fn store(&mut self, chunk: usize);
}

/// Runs one pass of `pattern`: chunk indices `0..chunk_count()` in ascending
/// order, each receiving the pattern's one or two operations back to back.
#[allow(clippy::inline_always)] // must inline into the backend's target_feature context
#[inline(always)]
pub fn drive_pass<A: ChunkAccess + ?Sized>(access: &mut A, pattern: AccessPattern) {
    let chunks = access.chunk_count();
    // SAFETY (all arms): j < chunks == access.chunk_count()
    match pattern {
        AccessPattern::Read => {
            for j in 0..chunks {
                unsafe { access.load(j) };
            }
        }
        AccessPattern::Write => {
            for j in 0..chunks {
                unsafe { access.store(j) };
            }
        }
        AccessPattern::ReadRead => {
            for j in 0..chunks {
                unsafe {
                    access.load(j);
                    access.load(j);
                }
            }
        }
        AccessPattern::ReadWrite => {
            for j in 0..chunks {
                unsafe {
                    access.load(j);
                    access.store(j);
                }
            }
        }
        AccessPattern::WriteRead => {
            for j in 0..chunks {
                unsafe {
                    access.store(j);
                    access.load(j);
                }
            }
        }
        AccessPattern::WriteWrite => {
            for j in 0..chunks {
                unsafe {
                    access.store(j);
                    access.store(j);
                }
            }
        }
    }
}
