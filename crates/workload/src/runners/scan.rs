//! Iterator benchmarks
//!
//! These record one latency sample per scan, not per key, and report the
//! number of scans (or, for `iterseq`, keys visited) as the op count.

use std::time::Instant;

use strata_core::{Engine, Entry, StrataResult, Transaction};

use super::{for_each_index, RunContext};
use crate::keygen::{prefix_for, KEY_PREFIXES};

fn entry_bytes(entry: &Entry) -> u64 {
    (entry.key.len() + entry.value.len()) as u64
}

/// Consume up to `cap` entries, returning (entries, bytes)
fn drain<I: Iterator<Item = Entry>>(iter: I, cap: usize) -> (u64, u64) {
    iter.take(cap)
        .fold((0, 0), |(n, bytes), e| (n + 1, bytes + entry_bytes(&e)))
}

fn finish_scan(ctx: &RunContext<'_>, start: Instant, result: StrataResult<(u64, u64)>) {
    ctx.tracker.record(start.elapsed());
    match result {
        Ok((_, bytes)) => ctx.counters.add_read(bytes),
        Err(_) => ctx.counters.add_errors(1),
    }
    ctx.counters.add_ops(1);
}

/// `iterseq`: one ascending scan of up to `num_operations` keys
///
/// Runs on a single thread as one timed call.
pub fn iter_seq<E: Engine>(engine: &E, ctx: &RunContext<'_>) {
    let cap = usize::try_from(ctx.num()).unwrap_or(usize::MAX);
    let start = Instant::now();
    let result = engine.view(|txn| Ok(drain(txn.iter(true)?, cap)));
    ctx.tracker.record(start.elapsed());
    match result {
        Ok((visited, bytes)) => {
            ctx.counters.add_read(bytes);
            ctx.counters.set_ops(visited);
        }
        Err(_) => {
            ctx.counters.add_errors(1);
            ctx.counters.set_ops(0);
        }
    }
}

/// `iterrandom`: bounded range scans over consecutive key windows
///
/// Scan `k` covers `[key(k*w), key(k*w + w))` with `w = range_width`.
pub fn iter_random<E: Engine>(engine: &E, ctx: &RunContext<'_>) {
    let limits = ctx.config.iterator_limits;
    let width = limits.range_width.max(1);
    let iterations = match ctx.num() / width {
        0 => limits.min_range_iterations,
        n => n,
    };
    for_each_index(ctx, iterations, |k| {
        let lo = ctx.key(k * width);
        let hi = ctx.key(k * width + width);
        let start = Instant::now();
        let result = engine.view(|txn| Ok(drain(txn.range_iter(&lo, &hi, true)?, limits.range_scan_cap)));
        finish_scan(ctx, start, result);
    });
}

/// `iterprefix`: prefix scans cycling through the fill prefixes
pub fn iter_prefix<E: Engine>(engine: &E, ctx: &RunContext<'_>) {
    let limits = ctx.config.iterator_limits;
    let iterations = match ctx.num() / limits.prefix_iterations_divisor.max(1) {
        0 => KEY_PREFIXES.len() as u64,
        n => n,
    };
    for_each_index(ctx, iterations, |k| {
        let prefix = prefix_for(k);
        let start = Instant::now();
        let result = engine.view(|txn| {
            Ok(drain(
                txn.prefix_iter(prefix.as_bytes(), true)?,
                limits.prefix_scan_cap,
            ))
        });
        finish_scan(ctx, start, result);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_caps_and_sums() {
        let entries = (0..10).map(|i| Entry {
            key: vec![i; 2],
            value: vec![0; 3],
            version: 1,
        });
        assert_eq!(drain(entries.clone(), 4), (4, 20));
        assert_eq!(drain(entries, 100), (10, 50));
    }
}
