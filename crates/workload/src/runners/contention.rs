//! Contention benchmarks
//!
//! These squeeze every worker onto a small, overlapping key space so the
//! backend's conflict handling dominates. Their key spaces are fixed, so
//! keys always use the sequential distribution, except for
//! `concurrent_read_write` which spreads over the existing keys.

use std::thread;
use std::time::{Duration, Instant};

use strata_core::{Engine, Transaction};

use super::{begin, for_each_index, get_single, put_explicit, OpResult, RunContext};
use crate::keygen::scrambled_index;

/// Keys shared by `transaction_conflicts`
pub const CONFLICT_KEY_SPACE: u64 = 10;

/// Keys shared by `heavy_contention`
pub const HEAVY_CONTENTION_KEYS: u64 = 3;

/// Percentage of reads in `concurrent_read_write`
pub const READ_WRITE_READ_PERCENT: u64 = 70;

/// Pause between read and write in `heavy_contention`
const HEAVY_CONTENTION_PAUSE: Duration = Duration::from_micros(1);

/// `high_contention_writes`: blind writes into a quarter of the key space
pub fn high_contention_writes<E: Engine>(engine: &E, ctx: &RunContext<'_>) {
    let range = (ctx.num() / 4).max(1);
    for_each_index(ctx, ctx.num(), |i| {
        let key = ctx.sequential_key(i % range);
        let value = ctx.value();
        let start = Instant::now();
        let result = put_explicit(engine, &key, &value);
        ctx.finish_write(start.elapsed(), result, key.len() + value.len());
    });
}

/// `transaction_conflicts`: read-then-write on ten shared keys
pub fn transaction_conflicts<E: Engine>(engine: &E, ctx: &RunContext<'_>) {
    for_each_index(ctx, ctx.num(), |i| {
        let key = ctx.sequential_key(i % CONFLICT_KEY_SPACE);
        let value = ctx.value();
        let start = Instant::now();
        let result = read_then_write(engine, &key, |_| value);
        let bytes = result.as_ref().map_or(0, |written| key.len() + written);
        ctx.finish_write(start.elapsed(), result.map(|_| ()), bytes);
    });
}

/// `concurrent_read_write`: 70% closure-scoped reads, 30% explicit writes
///
/// Operation `i` reads when `i mod 100 < 70`.
pub fn concurrent_read_write<E: Engine>(engine: &E, ctx: &RunContext<'_>) {
    let existing = ctx.config.existing_keys();
    for_each_index(ctx, ctx.num(), |i| {
        let key = ctx.key(scrambled_index(i, existing));
        if i % 100 < READ_WRITE_READ_PERCENT {
            let start = Instant::now();
            let result = get_single(engine, ctx, &key);
            ctx.finish_read(start.elapsed(), result, key.len());
        } else {
            let value = ctx.value();
            let start = Instant::now();
            let result = put_explicit(engine, &key, &value);
            ctx.finish_write(start.elapsed(), result, key.len() + value.len());
        }
    });
}

/// `heavy_contention`: read-modify-write on three keys
///
/// Each write appends a fresh value to whatever the key held, with a short
/// pause between the read and the write to widen the conflict window.
pub fn heavy_contention<E: Engine>(engine: &E, ctx: &RunContext<'_>) {
    for_each_index(ctx, ctx.num(), |i| {
        let key = ctx.sequential_key(i % HEAVY_CONTENTION_KEYS);
        let fresh = ctx.value();
        let start = Instant::now();
        let result = read_then_write(engine, &key, |old| {
            thread::sleep(HEAVY_CONTENTION_PAUSE);
            match old {
                Some(mut prior) => {
                    prior.extend_from_slice(&fresh);
                    prior
                }
                None => fresh,
            }
        });
        let bytes = result.as_ref().map_or(0, |written| key.len() + written);
        ctx.finish_write(start.elapsed(), result.map(|_| ()), bytes);
    });
}

/// Read `key`, write `next(old)`, commit; returns the value length written
///
/// A missing key reads as `None`; any other read failure aborts the
/// transaction.
fn read_then_write<E, F>(engine: &E, key: &[u8], next: F) -> OpResult<usize>
where
    E: Engine,
    F: FnOnce(Option<Vec<u8>>) -> Vec<u8>,
{
    let mut txn = begin(engine)?;
    let old = match txn.get(key) {
        Ok(value) => Some(value),
        Err(e) if e.is_not_found() => None,
        Err(e) => {
            let _ = txn.rollback();
            return Err(e.into());
        }
    };
    let value = next(old);
    if let Err(e) = txn.put(key, &value) {
        let _ = txn.rollback();
        return Err(e.into());
    }
    txn.commit()?;
    Ok(value.len())
}
