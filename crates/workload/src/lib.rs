//! Workload generation and measurement for Strata benchmarks
//!
//! This crate is the benchmark execution engine. It is generic over
//! [`strata_core::Engine`] and never names a concrete backend.
//! - Config: `BenchmarkConfig` (defaults, TOML, validation)
//! - Generation: deterministic keys, random or compressible values
//! - Measurement: `LatencyTracker`, `RunCounters`, `ProgressReporter`
//! - Execution: the `Workload` catalogue, its runners and the orchestrator
//! - Output: `BenchmarkResult`, `ResultSummary` and text rendering

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod counters;
pub mod keygen;
pub mod latency;
pub mod orchestrator;
pub mod progress;
pub mod report;
pub mod result;
pub mod runners;
pub mod workload;

pub use config::{BenchmarkConfig, IteratorLimits, KeyDistribution, DEFAULT_BENCHMARKS};
pub use counters::{CounterSnapshot, RunCounters};
pub use keygen::{generate_key, generate_value};
pub use latency::{HistogramBucket, LatencySummary, LatencyTracker, Percentiles};
pub use orchestrator::{
    database_stats, run_benchmarks, run_named, run_single_benchmark, BenchmarkOutcome,
};
pub use progress::ProgressReporter;
pub use result::{BenchmarkResult, ResultSummary};
pub use runners::RunContext;
pub use workload::Workload;
