// SPDX-License-Identifier: MIT OR Apache-2.0
//! # memlat-cli
//!
//! Command-line shell for memlat: pins the measuring thread, raises its
//! priority, runs rounds forever and redraws a live table.
//!
//! ## Usage
//!
//! ```bash
//! # Live table, pinned to core 2, until Ctrl-C
//! memlat
//!
//! # Timestamp counter instead of the OS clock
//! memlat --timer cycles
//!
//! # Ten rounds as JSON lines
//! memlat --rounds 10 --format json
//! ```
//!
//! ## Output
//!
//! | Column | Meaning |
//! |--------|---------|
//! | `R`, `W` | single load / single store per chunk |
//! | `R->R` ... `W->W` | two operations per chunk, in order |
//! | `Cycles` | rounds completed |
//! | `Mean` | unweighted mean over the six patterns |

#![warn(missing_docs)]

/// Thread affinity and priority hints
pub mod os;
/// Table and JSON-lines renderers
pub mod render;

/// Re-export of memlat for library access.
pub use memlat;

#[cfg(test)]
mod tests {
    #[test]
    fn test_manifest_readme_exists() {
        let readme =
            std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join(env!("CARGO_PKG_README"));
        assert!(readme.is_file(), "missing {}", readme.display());
    }
}
