// SPDX-License-Identifier: MIT OR Apache-2.0
//! Pass runner trait
//!
//! The aggregator times passes through this trait so that it never depends on
//! a concrete buffer or backend.

use crate::AccessPattern;

/// Something that can execute one full pass of an access pattern
pub trait PassRunner {
    /// Runs one pass of `pattern` over the whole region
    fn run_pass(&mut self, pattern: AccessPattern);

    /// Length of the region in machine-word elements.
    ///
    /// This is the `buffer_length` term of the bandwidth formula.
    fn len_elements(&self) -> usize;
}

impl<R: PassRunner + ?Sized> PassRunner for &mut R {
    fn run_pass(&mut self, pattern: AccessPattern) {
        (**self).run_pass(pattern);
    }

    fn len_elements(&self) -> usize {
        (**self).len_elements()
    }
}
