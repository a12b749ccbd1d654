//! Explicit-transaction write benchmarks
//!
//! Batched runners count work in units of the batch size: a batch either
//! commits all of its writes or none, and a failed batch charges every
//! write in it to the error counter.

use std::time::Instant;

use strata_core::{Engine, Transaction};

use super::{begin, for_each_index, put_explicit, OpResult, RunContext};

/// Batch size used by `concurrent_transactions` when none is configured
pub const DEFAULT_TRANSACTION_BATCH: u64 = 10;

/// Batch size used by `batch_concurrent_writes` when none is configured
pub const DEFAULT_WRITE_BATCH: u64 = 100;

/// `concurrent_writers`: one explicit transaction per write
pub fn concurrent_writers<E: Engine>(engine: &E, ctx: &RunContext<'_>) {
    for_each_index(ctx, ctx.num(), |i| {
        let key = ctx.key(i);
        let value = ctx.value();
        let start = Instant::now();
        let result = put_explicit(engine, &key, &value);
        ctx.finish_write(start.elapsed(), result, key.len() + value.len());
    });
}

/// `concurrent_transactions`: small multi-write transactions
pub fn concurrent_transactions<E: Engine>(engine: &E, ctx: &RunContext<'_>) {
    run_batched(engine, ctx, DEFAULT_TRANSACTION_BATCH);
}

/// `batch_concurrent_writes`: large multi-write transactions
pub fn batch_concurrent_writes<E: Engine>(engine: &E, ctx: &RunContext<'_>) {
    run_batched(engine, ctx, DEFAULT_WRITE_BATCH);
}

/// Configured batch size, or `default` when it is not positive
pub fn effective_batch_size(ctx: &RunContext<'_>, default: u64) -> u64 {
    u64::try_from(ctx.config.batch_size)
        .ok()
        .filter(|&n| n > 0)
        .unwrap_or(default)
}

/// Split `num / batch` whole batches across the workers
///
/// The trailing `num % batch` operations are not issued.
pub(crate) fn run_batched<E: Engine>(engine: &E, ctx: &RunContext<'_>, default_batch: u64) {
    let batch = effective_batch_size(ctx, default_batch);
    let batches = ctx.num() / batch;
    for_each_index(ctx, batches, |b| {
        let start = Instant::now();
        let result = write_batch(engine, ctx, b * batch, batch);
        ctx.record_latency(start.elapsed(), &result);
        match result {
            Ok(bytes) => ctx.counters.add_written(bytes),
            Err(_) => ctx.counters.add_errors(batch),
        }
        ctx.counters.add_ops(batch);
    });
}

/// Write keys `first..first+len` in one transaction, returning bytes written
fn write_batch<E: Engine>(
    engine: &E,
    ctx: &RunContext<'_>,
    first: u64,
    len: u64,
) -> OpResult<u64> {
    let mut txn = begin(engine)?;
    let mut bytes = 0u64;
    for index in first..first + len {
        let key = ctx.key(index);
        let value = ctx.value();
        if let Err(e) = txn.put(&key, &value) {
            let _ = txn.rollback();
            return Err(e.into());
        }
        bytes += (key.len() + value.len()) as u64;
    }
    txn.commit()?;
    Ok(bytes)
}
