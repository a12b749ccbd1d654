//! Workload runners
//!
//! Every runner has the same skeleton: split an operation budget across a
//! fixed pool of workers ([`partition`]), fork the workers
//! ([`fork_join`]), and inside each worker generate a key (and value), time
//! one logical operation, then record latency and counters through the
//! [`RunContext`]. A runner returns only after every worker has joined.
//!
//! Backend failures never escape a runner: they are counted as errors and
//! the worker moves on. No operation is retried.

pub mod contention;
pub mod fill;
pub mod read;
pub mod scan;
pub mod txn;

use std::ops::Range;
use std::thread;
use std::time::Duration;

use strata_core::{Engine, StrataError, Transaction};
use tracing::debug;

use crate::config::{BenchmarkConfig, KeyDistribution};
use crate::counters::RunCounters;
use crate::keygen::{generate_key, generate_value};
use crate::latency::LatencyTracker;

/// Shared state handed to every runner and borrowed by its workers
#[derive(Clone, Copy)]
pub struct RunContext<'a> {
    /// Run configuration
    pub config: &'a BenchmarkConfig,
    /// Latency samples for this run
    pub tracker: &'a LatencyTracker,
    /// Operation, byte and error totals for this run
    pub counters: &'a RunCounters,
}

impl<'a> RunContext<'a> {
    /// Bundle the per-run collaborators
    pub fn new(
        config: &'a BenchmarkConfig,
        tracker: &'a LatencyTracker,
        counters: &'a RunCounters,
    ) -> Self {
        Self {
            config,
            tracker,
            counters,
        }
    }

    /// Worker pool size
    pub fn threads(&self) -> usize {
        self.config.threads.max(1)
    }

    /// Operation budget
    pub fn num(&self) -> u64 {
        self.config.num_operations
    }

    /// Key for `index` with the configured distribution
    pub fn key(&self, index: u64) -> Vec<u8> {
        generate_key(index, self.config.key_size, self.config.key_distribution, None)
    }

    /// Key for `index` with the sequential distribution
    pub fn sequential_key(&self, index: u64) -> Vec<u8> {
        generate_key(index, self.config.key_size, KeyDistribution::Sequential, None)
    }

    /// Fresh value of the configured size
    pub fn value(&self) -> Vec<u8> {
        generate_value(self.config.value_size, self.config.compressible)
    }

    /// Record `latency` unless the operation never started
    pub fn record_latency<T>(&self, latency: Duration, result: &OpResult<T>) {
        if !matches!(result, Err(OpError::Begin(_))) {
            self.tracker.record(latency);
        }
    }

    /// Account for one timed write of `bytes` key and value bytes
    pub fn finish_write(&self, latency: Duration, result: OpResult<()>, bytes: usize) {
        self.record_latency(latency, &result);
        match result {
            Ok(()) => self.counters.add_written(bytes as u64),
            Err(_) => self.counters.add_errors(1),
        }
        self.counters.add_ops(1);
    }

    /// Account for one timed read of a key of `key_len` bytes
    pub fn finish_read(&self, latency: Duration, result: OpResult<Vec<u8>>, key_len: usize) {
        self.record_latency(latency, &result);
        match result {
            Ok(value) => self.counters.add_read((key_len + value.len()) as u64),
            Err(_) => self.counters.add_errors(1),
        }
        self.counters.add_ops(1);
    }
}

/// Failure of one timed operation
///
/// An operation whose transaction could not begin still counts as an
/// error, but contributes no latency sample.
#[derive(Debug)]
pub enum OpError {
    /// `begin` failed before any work was issued
    Begin(StrataError),
    /// The operation ran and failed
    Failed(StrataError),
}

impl OpError {
    /// True if the operation ran and found no value
    pub fn is_not_found(&self) -> bool {
        matches!(self, OpError::Failed(e) if e.is_not_found())
    }
}

impl From<StrataError> for OpError {
    fn from(e: StrataError) -> Self {
        OpError::Failed(e)
    }
}

/// Result of one timed operation
pub type OpResult<T> = Result<T, OpError>;

/// Begin an explicit transaction, tagging a failure as [`OpError::Begin`]
pub(crate) fn begin<E: Engine>(engine: &E) -> OpResult<E::Txn<'_>> {
    engine.begin().map_err(|e| {
        debug!(target: "strata::bench", error = %e, "Transaction begin failed");
        OpError::Begin(e)
    })
}

/// Index range of `worker` when `total` is split across `workers`
///
/// Every worker gets `total / workers`; the last one also takes the
/// remainder, so the ranges tile `0..total` exactly.
pub fn partition(total: u64, workers: usize, worker: usize) -> Range<u64> {
    let workers = workers.max(1) as u64;
    let worker = worker as u64;
    let share = total / workers;
    let start = worker * share;
    let end = if worker + 1 == workers {
        total
    } else {
        start + share
    };
    start..end
}

/// Run `work(worker_id)` on `workers` named threads and wait for all of them
///
/// A panicking worker propagates its panic once every worker has finished.
pub fn fork_join<F>(workers: usize, work: F)
where
    F: Fn(usize) + Sync,
{
    let work = &work;
    thread::scope(|s| {
        for id in 0..workers.max(1) {
            thread::Builder::new()
                .name(format!("bench-worker-{}", id))
                .spawn_scoped(s, move || work(id))
                .expect("Failed to spawn benchmark worker");
        }
    });
}

/// Split `total` across a pool and run `op(index)` for each index
pub(crate) fn for_each_index<F>(ctx: &RunContext<'_>, total: u64, op: F)
where
    F: Fn(u64) + Sync,
{
    let workers = ctx.threads();
    fork_join(workers, |worker| {
        for i in partition(total, workers, worker) {
            op(i);
        }
    });
}

/// Single put in its own explicit transaction
pub(crate) fn put_explicit<E: Engine>(engine: &E, key: &[u8], value: &[u8]) -> OpResult<()> {
    let mut txn = begin(engine)?;
    if let Err(e) = txn.put(key, value) {
        let _ = txn.rollback();
        return Err(e.into());
    }
    Ok(txn.commit()?)
}

/// Single get in its own explicit transaction
pub(crate) fn get_explicit<E: Engine>(engine: &E, key: &[u8]) -> OpResult<Vec<u8>> {
    let mut txn = begin(engine)?;
    match txn.get(key) {
        Ok(value) => {
            txn.commit()?;
            Ok(value)
        }
        Err(e) => {
            let _ = txn.rollback();
            Err(e.into())
        }
    }
}

/// Single put, closure-scoped unless explicit transactions are configured
pub(crate) fn put_single<E: Engine>(
    engine: &E,
    ctx: &RunContext<'_>,
    key: &[u8],
    value: &[u8],
) -> OpResult<()> {
    if ctx.config.use_transactions {
        put_explicit(engine, key, value)
    } else {
        Ok(engine.update(|txn| txn.put(key, value))?)
    }
}

/// Single get, closure-scoped unless explicit transactions are configured
pub(crate) fn get_single<E: Engine>(
    engine: &E,
    ctx: &RunContext<'_>,
    key: &[u8],
) -> OpResult<Vec<u8>> {
    if ctx.config.use_transactions {
        get_explicit(engine, key)
    } else {
        Ok(engine.view(|txn| txn.get(key))?)
    }
}
