//! Fill benchmarks: independent single-key writes

use std::time::Instant;

use strata_core::Engine;

use super::{for_each_index, put_single, RunContext};
use crate::keygen::{generate_key, prefix_for, shuffled_indices};

/// `fillseq`: write key `i` for every `i` in the budget
pub fn fill_seq<E: Engine>(engine: &E, ctx: &RunContext<'_>) {
    for_each_index(ctx, ctx.num(), |i| {
        let key = ctx.key(i);
        let value = ctx.value();
        let start = Instant::now();
        let result = put_single(engine, ctx, &key, &value);
        ctx.finish_write(start.elapsed(), result, key.len() + value.len());
    });
}

/// `fillprefixed`: like `fillseq`, with the key prefix rotating per index
pub fn fill_prefixed<E: Engine>(engine: &E, ctx: &RunContext<'_>) {
    let config = ctx.config;
    for_each_index(ctx, ctx.num(), |i| {
        let key = generate_key(i, config.key_size, config.key_distribution, Some(prefix_for(i)));
        let value = ctx.value();
        let start = Instant::now();
        let result = put_single(engine, ctx, &key, &value);
        ctx.finish_write(start.elapsed(), result, key.len() + value.len());
    });
}

/// `fillrandom`: write every key once, in a seeded random order
pub fn fill_random<E: Engine>(engine: &E, ctx: &RunContext<'_>) {
    let order = shuffled_indices(ctx.num(), ctx.config.seed);
    for_each_index(ctx, ctx.num(), |i| {
        let key = ctx.key(order[i as usize]);
        let value = ctx.value();
        let start = Instant::now();
        let result = put_single(engine, ctx, &key, &value);
        ctx.finish_write(start.elapsed(), result, key.len() + value.len());
    });
}
