//! Point-read benchmarks, including the read/write mixes

use std::time::Instant;

use strata_core::Engine;

use super::{for_each_index, fork_join, get_single, partition, put_single, RunContext};
use crate::keygen::scrambled_index;

/// `readseq`: read key `i mod existing_keys`
pub fn read_seq<E: Engine>(engine: &E, ctx: &RunContext<'_>) {
    let existing = ctx.config.existing_keys();
    for_each_index(ctx, ctx.num(), |i| {
        let key = ctx.key(i % existing);
        let start = Instant::now();
        let result = get_single(engine, ctx, &key);
        ctx.finish_read(start.elapsed(), result, key.len());
    });
}

/// `readrandom`: read a scrambled index over the existing keys
pub fn read_random<E: Engine>(engine: &E, ctx: &RunContext<'_>) {
    let existing = ctx.config.existing_keys();
    for_each_index(ctx, ctx.num(), |i| {
        let key = ctx.key(scrambled_index(i, existing));
        let start = Instant::now();
        let result = get_single(engine, ctx, &key);
        ctx.finish_read(start.elapsed(), result, key.len());
    });
}

/// `readmissing`: read keys past the existing range
///
/// Absence is the expected outcome and is not an error; any other failure
/// is.
pub fn read_missing<E: Engine>(engine: &E, ctx: &RunContext<'_>) {
    let existing = ctx.config.existing_keys();
    for_each_index(ctx, ctx.num(), |i| {
        let key = ctx.key(existing + i);
        let start = Instant::now();
        let result = get_single(engine, ctx, &key);
        ctx.record_latency(start.elapsed(), &result);
        match result {
            Ok(value) => ctx.counters.add_read((key.len() + value.len()) as u64),
            Err(e) if e.is_not_found() => {}
            Err(_) => ctx.counters.add_errors(1),
        }
        ctx.counters.add_ops(1);
    });
}

/// `readwhilewriting`: disjoint reader and writer pools running together
///
/// Readers get `max(threads/2, 1)` workers and half the budget; writers get
/// the rest of both. Each pool splits its budget with the usual remainder
/// rule, so the two budgets sum to the configured count.
pub fn read_while_writing<E: Engine>(engine: &E, ctx: &RunContext<'_>) {
    let threads = ctx.threads();
    let readers = (threads / 2).max(1);
    let writers = threads.saturating_sub(readers).max(1);
    let read_budget = ctx.num() / 2;
    let write_budget = ctx.num() - read_budget;
    let existing = ctx.config.existing_keys();

    fork_join(readers + writers, |worker| {
        if worker < readers {
            for i in partition(read_budget, readers, worker) {
                let key = ctx.key(scrambled_index(i, existing));
                let start = Instant::now();
                let result = get_single(engine, ctx, &key);
                ctx.finish_read(start.elapsed(), result, key.len());
            }
        } else {
            for i in partition(write_budget, writers, worker - readers) {
                let key = ctx.key(scrambled_index(i, existing));
                let value = ctx.value();
                let start = Instant::now();
                let result = put_single(engine, ctx, &key, &value);
                ctx.finish_write(start.elapsed(), result, key.len() + value.len());
            }
        }
    });
}

/// `mixedworkload`: each operation reads or writes by `read_ratio`
///
/// Operation `i` reads when `i mod 100 < read_ratio`, which gives the exact
/// ratio over every hundred consecutive operations. The `(i * 100) mod 100`
/// form this replaces is always 0, so any positive ratio would read on
/// every operation and never write.
pub fn mixed_workload<E: Engine>(engine: &E, ctx: &RunContext<'_>) {
    let existing = ctx.config.existing_keys();
    let read_ratio = u64::from(ctx.config.read_ratio);
    for_each_index(ctx, ctx.num(), |i| {
        let key = ctx.key(scrambled_index(i, existing));
        if i % 100 < read_ratio {
            let start = Instant::now();
            let result = get_single(engine, ctx, &key);
            ctx.finish_read(start.elapsed(), result, key.len());
        } else {
            let value = ctx.value();
            let start = Instant::now();
            let result = put_single(engine, ctx, &key, &value);
            ctx.finish_write(start.elapsed(), result, key.len() + value.len());
        }
    });
}
