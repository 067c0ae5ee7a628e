// SPDX-License-Identifier: MIT OR Apache-2.0
//! Vector backends
//!
//! - [`portable`] - 32-byte lanes moved with volatile reads/writes, any target
//! - `avx2` - `_mm256_load_si256` / `_mm256_store_si256`, x86_64 only

use crate::buffer::AlignedBuffer;
use memlat_core::AccessPattern;
use std::fmt;

#[cfg(target_arch = "x86_64")]
pub mod avx2;
pub mod portable;

/// Which accessor executes the passes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    /// 256-bit AVX2 loads and stores
    Avx2,
    /// Volatile 32-byte lane copies
    Portable,
}

impl Backend {
    /// Best backend supported by the running CPU
    #[must_use]
    pub fn detect() -> Self {
        if Self::Avx2.is_available() {
            Self::Avx2
        } else {
            Self::Portable
        }
    }

    /// Whether the running CPU can execute this backend
    #[must_use]
    pub fn is_available(self) -> bool {
        match self {
            #[cfg(target_arch = "x86_64")]
            Self::Avx2 => std::is_x86_feature_detected!("avx2"),
            #[cfg(not(target_arch = "x86_64"))]
            Self::Avx2 => false,
            Self::Portable => true,
        }
    }

    /// Lowercase name, e.g. `avx2`
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Avx2 => "avx2",
            Self::Portable => "portable",
        }
    }

    /// Runs one pass over `buffer` with this backend.
    ///
    /// # Safety
    ///
    /// `self.is_available()` must be true.
    pub(crate) unsafe fn run(self, buffer: &mut AlignedBuffer, pattern: AccessPattern) {
        match self {
            #[cfg(target_arch = "x86_64")]
            // SAFETY: caller checked AVX2 support
            Self::Avx2 => unsafe { avx2::pass(buffer, pattern) },
            #[cfg(not(target_arch = "x86_64"))]
            Self::Avx2 => unreachable!("avx2 backend is never available off x86_64"),
            Self::Portable => portable::pass(buffer, pattern),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_is_available() {
        assert!(Backend::detect().is_available());
        assert!(Backend::Portable.is_available());
    }

    #[test]
    fn test_names() {
        assert_eq!(Backend::Avx2.to_string(), "avx2");
        assert_eq!(Backend::Portable.name(), "portable");
    }
}
