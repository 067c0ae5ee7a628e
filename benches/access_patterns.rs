// SPDX-License-Identifier: MIT OR Apache-2.0
// Benchmarks: missing_docs - criterion_group! macro generates undocumentable code
#![allow(missing_docs)]
// Benchmarks: clippy lints relaxed for benchmark code (not production)
#![allow(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Access pattern pass benchmarks
//!
//! Measures one pass of each access pattern per backend across region sizes
//! that fall in L1, L2, LLC and DRAM, as a cross-check of the figures the
//! `memlat` binary reports.
//!
//! ```bash
//! cargo bench --bench access_patterns
//! cargo bench --bench access_patterns -- avx2
//! ```

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use memlat::{AccessPattern, AccessPatternEngine, AlignedBuffer, Backend};
use std::time::Duration;

const WORD: usize = std::mem::size_of::<usize>();

/// Region sizes in bytes
const SIZES: &[(usize, &str)] = &[
    (16 * 1024, "16KB"),
    (256 * 1024, "256KB"),
    (4 * 1024 * 1024, "4MB"),
    (32 * 1024 * 1024, "32MB"),
];

fn bench_backend(c: &mut Criterion, backend: Backend) {
    let mut group = c.benchmark_group(format!("pass/{backend}"));
    group.sample_size(20);
    group.measurement_time(Duration::from_secs(3));

    for &(bytes, name) in SIZES {
        let buffer = AlignedBuffer::new(bytes / WORD).expect("allocate");
        let mut engine = AccessPatternEngine::with_backend(buffer, backend).expect("backend");
        engine.buffer_mut().init_pointer_chain();

        for pattern in AccessPattern::ALL {
            let touched = bytes * pattern.ops().len();
            group.throughput(Throughput::Bytes(touched as u64));
            group.bench_with_input(
                BenchmarkId::new(pattern.label(), name),
                &pattern,
                |b, &pattern| b.iter(|| engine.run(pattern)),
            );
        }
    }

    group.finish();
}

fn bench_portable(c: &mut Criterion) {
    bench_backend(c, Backend::Portable);
}

fn bench_avx2(c: &mut Criterion) {
    if Backend::Avx2.is_available() {
        bench_backend(c, Backend::Avx2);
    }
}

criterion_group!(access_pattern_benchmarks, bench_avx2, bench_portable);
criterion_main!(access_pattern_benchmarks);
