//! Workload Primitive Benchmarks
//!
//! Measures the harness's own per-operation overhead, which every reported
//! latency includes:
//! - Key generation per distribution
//! - Value generation (random vs compressible)
//! - Latency recording, contended and uncontended
//! - Percentile summary over a full run's samples
//!
//! ## Running
//!
//! ```bash
//! cargo bench --bench workload_primitives
//! cargo bench --bench workload_primitives -- "keygen"
//! cargo bench --bench workload_primitives -- "latency"
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::time::Duration;
use strata_bench::keygen::{scrambled_index, shuffled_indices};
use strata_bench::{generate_key, generate_value, KeyDistribution, LatencyTracker, RunCounters};

// =============================================================================
// Constants and Configuration
// =============================================================================

/// Value sizes for generation benchmarks.
const VALUE_SIZES: &[usize] = &[100, 1024, 16384];

/// Sample counts for the percentile summary.
const SAMPLE_COUNTS: &[usize] = &[10_000, 100_000, 1_000_000];

// =============================================================================
// Key and value generation
// =============================================================================

fn keygen(c: &mut Criterion) {
    let mut group = c.benchmark_group("keygen");
    group.throughput(Throughput::Elements(1));

    for dist in [
        KeyDistribution::Sequential,
        KeyDistribution::Random,
        KeyDistribution::Zipfian,
    ] {
        group.bench_function(BenchmarkId::new("key_16", dist.as_str()), |b| {
            let mut i = 0u64;
            b.iter(|| {
                i = i.wrapping_add(1);
                black_box(generate_key(black_box(i), 16, dist, None))
            });
        });
    }

    group.bench_function("key_16_prefixed", |b| {
        let mut i = 0u64;
        b.iter(|| {
            i = i.wrapping_add(1);
            black_box(generate_key(i, 16, KeyDistribution::Sequential, Some("session_")))
        });
    });

    group.bench_function("scrambled_index", |b| {
        let mut i = 0u64;
        b.iter(|| {
            i = i.wrapping_add(1);
            black_box(scrambled_index(black_box(i), 1_000_000))
        });
    });

    group.finish();
}

fn valuegen(c: &mut Criterion) {
    let mut group = c.benchmark_group("valuegen");

    for &size in VALUE_SIZES {
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("random", size), &size, |b, &size| {
            b.iter(|| black_box(generate_value(size, false)));
        });
        group.bench_with_input(BenchmarkId::new("compressible", size), &size, |b, &size| {
            b.iter(|| black_box(generate_value(size, true)));
        });
    }

    group.bench_function("shuffle_100k", |b| {
        b.iter(|| black_box(shuffled_indices(100_000, 42)));
    });

    group.finish();
}

// =============================================================================
// Measurement
// =============================================================================

fn latency_record(c: &mut Criterion) {
    let mut group = c.benchmark_group("latency/record");
    group.throughput(Throughput::Elements(1));

    group.bench_function("uncontended", |b| {
        let tracker = LatencyTracker::new();
        b.iter(|| tracker.record(black_box(Duration::from_nanos(1234))));
    });

    group.bench_function("contended_4", |b| {
        b.iter_custom(|iters| {
            let tracker = LatencyTracker::new();
            let tracker = &tracker;
            let per_thread = iters / 4 + 1;
            let start = std::time::Instant::now();
            std::thread::scope(|s| {
                for _ in 0..4 {
                    s.spawn(move || {
                        for _ in 0..per_thread {
                            tracker.record(Duration::from_nanos(1234));
                        }
                    });
                }
            });
            start.elapsed()
        });
    });

    group.bench_function("counters", |b| {
        let counters = RunCounters::new();
        b.iter(|| {
            counters.add_written(black_box(116));
            counters.add_ops(1);
        });
    });

    group.finish();
}

fn latency_summary(c: &mut Criterion) {
    let mut group = c.benchmark_group("latency/summary");
    group.sample_size(10);

    for &n in SAMPLE_COUNTS {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter_with_setup(
                || {
                    let tracker = LatencyTracker::with_capacity(n);
                    for i in 0..n {
                        tracker.record(Duration::from_nanos((i as u64 * 7919) % 100_000));
                    }
                    tracker
                },
                |tracker| black_box(tracker.summarize(true)),
            );
        });
    }

    group.finish();
}

criterion_group! {
    name = generation;
    config = Criterion::default();
    targets = keygen, valuegen
}

criterion_group! {
    name = measurement;
    config = Criterion::default();
    targets = latency_record, latency_summary
}

criterion_main!(generation, measurement);
