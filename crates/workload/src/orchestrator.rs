//! Benchmark orchestration
//!
//! The orchestrator owns the engine handle for one run: it opens the
//! database, starts the progress reporter, times the runner, and turns the
//! final counters and latency samples into a [`BenchmarkResult`]. The
//! engine type is a generic parameter; nothing here names a concrete
//! backend.

use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;

use strata_core::{Engine, StrataResult};
use tracing::{debug, info, warn};

use crate::config::BenchmarkConfig;
use crate::counters::RunCounters;
use crate::latency::LatencyTracker;
use crate::progress::ProgressReporter;
use crate::result::BenchmarkResult;
use crate::runners::RunContext;
use crate::workload::Workload;

/// Upper bound on samples reserved up front
const MAX_PREALLOCATED_SAMPLES: usize = 1 << 22;

/// One finished benchmark and its optional engine stats snapshot
#[derive(Debug, Clone)]
pub struct BenchmarkOutcome {
    /// Measured result
    pub result: BenchmarkResult,
    /// `Engine::stats` taken after the run, when enabled
    pub stats: Option<String>,
}

/// Run one workload against a freshly opened engine
///
/// The engine is closed before this returns. Backend failures during the
/// run are counted in the result, not returned.
pub fn run_single_benchmark<E: Engine>(
    config: &BenchmarkConfig,
    workload: Workload,
) -> StrataResult<BenchmarkResult> {
    let engine = E::open(&config.engine_options())?;

    let reserve = usize::try_from(config.num_operations)
        .unwrap_or(usize::MAX)
        .min(MAX_PREALLOCATED_SAMPLES);
    let tracker = LatencyTracker::with_capacity(reserve);
    let counters = Arc::new(RunCounters::new());
    let ctx = RunContext::new(config, &tracker, &counters);

    info!(
        target: "strata::bench",
        benchmark = %workload,
        num = config.num_operations,
        threads = config.threads,
        "Benchmark started"
    );

    let progress = config
        .report_interval()
        .map(|interval| ProgressReporter::start(workload.name(), Arc::clone(&counters), interval));

    let started_at = Utc::now();
    let start = Instant::now();
    workload.run(&engine, &ctx);
    let duration = start.elapsed();

    if let Some(progress) = progress {
        progress.stop();
    }

    let result = BenchmarkResult::new(
        workload.name(),
        started_at,
        duration,
        counters.snapshot(),
        tracker.summarize(config.histogram),
    );

    info!(
        target: "strata::bench",
        benchmark = %workload,
        ops = result.operations,
        errors = result.errors,
        duration_ms = duration.as_millis() as u64,
        ops_per_sec = result.ops_per_sec as u64,
        "Benchmark finished"
    );

    engine.close()?;
    Ok(result)
}

/// Parse `name` and run it
///
/// # Errors
///
/// `UnknownBenchmark` before anything is opened if `name` is not in the
/// catalogue.
pub fn run_named<E: Engine>(config: &BenchmarkConfig, name: &str) -> StrataResult<BenchmarkResult> {
    let workload: Workload = name.parse()?;
    run_single_benchmark::<E>(config, workload)
}

/// Reopen the database and capture its stats string
pub fn database_stats<E: Engine>(config: &BenchmarkConfig) -> StrataResult<String> {
    let engine = E::open(&config.engine_options())?;
    let stats = engine.stats();
    engine.close()?;
    Ok(stats)
}

/// Run every configured benchmark in order
///
/// The whole list is resolved and the configuration validated before the
/// first run, so a bad name produces no partial results. `on_complete` sees
/// each outcome as soon as it is available.
pub fn run_benchmarks<E, F>(
    config: &BenchmarkConfig,
    mut on_complete: F,
) -> StrataResult<Vec<BenchmarkOutcome>>
where
    E: Engine,
    F: FnMut(&BenchmarkOutcome),
{
    config.validate()?;
    let workloads = config.workloads()?;
    debug!(target: "strata::bench", count = workloads.len(), "Resolved benchmark list");

    let mut outcomes = Vec::with_capacity(workloads.len());
    for workload in workloads {
        let result = run_single_benchmark::<E>(config, workload)?;
        let stats = if config.stats {
            match database_stats::<E>(config) {
                Ok(stats) => Some(stats),
                Err(e) => {
                    warn!(target: "strata::bench", benchmark = %workload, error = %e, "Failed to collect database stats");
                    None
                }
            }
        } else {
            None
        };
        let outcome = BenchmarkOutcome { result, stats };
        on_complete(&outcome);
        outcomes.push(outcome);
    }
    Ok(outcomes)
}
