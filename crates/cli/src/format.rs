//! Console and JSON output.
//!
//! Result tables come from `strata_workload::report`; this module adds the
//! banner, the configuration block, the benchmark listing and the JSON
//! export document.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use strata_workload::report::format_bytes;
use strata_workload::{BenchmarkConfig, BenchmarkResult, ResultSummary, Workload};

/// Startup banner.
pub const BANNER: &str = r"
  ____  _             _
 / ___|| |_ _ __ __ _| |_ __ _
 \___ \| __| '__/ _` | __/ _` |
  ___) | |_| | | (_| | || (_| |
 |____/ \__|_|  \__,_|\__\__,_|
";

/// The configuration block printed before the first run.
pub fn format_config(config: &BenchmarkConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Configuration");
    let _ = writeln!(out, "=========================");
    let _ = writeln!(out, "  Database Path: {}", config.db_path.display());
    let _ = writeln!(
        out,
        "  Write Buffer Size: {}",
        format_bytes(config.write_buffer_size)
    );
    let _ = writeln!(out, "  Sync Option: {}", config.sync);
    let _ = writeln!(out, "  Levels: {}", config.levels);
    let _ = writeln!(out, "  Bloom Filter: {}", config.bloom_filter);
    let _ = writeln!(out, "  Operations: {}", config.num_operations);
    let _ = writeln!(out, "  Key Size: {} bytes", config.key_size);
    let _ = writeln!(out, "  Value Size: {} bytes", config.value_size);
    let _ = writeln!(out, "  Threads: {}", config.threads);
    let _ = writeln!(out, "  Batch Size: {}", config.batch_size);
    let _ = writeln!(out, "  Benchmarks: {}", config.benchmarks.join(", "));
    let _ = writeln!(out, "  Key Distribution: {}", config.key_distribution);
    if config.use_transactions {
        let _ = writeln!(out, "  Transactions: explicit");
    }
    let _ = writeln!(out, "  Seed: {}", config.seed);
    out
}

/// One line per benchmark in the catalogue.
pub fn format_benchmark_list() -> String {
    let mut out = String::new();
    for w in Workload::ALL {
        let tag = if w.is_iterator() {
            " [scan]"
        } else if w.is_batched() {
            " [batched]"
        } else {
            ""
        };
        let _ = writeln!(out, "  {:<25} {}{}", w.name(), w.description(), tag);
    }
    out
}

#[derive(Serialize)]
struct JsonReport<'a> {
    config: &'a BenchmarkConfig,
    results: &'a [BenchmarkResult],
    summary: ResultSummary,
}

/// Render results as a pretty-printed JSON document.
pub fn format_json(
    config: &BenchmarkConfig,
    results: &[BenchmarkResult],
) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport {
        config,
        results,
        summary: ResultSummary::from_results(results),
    })
}

/// Write the JSON document to `path`.
pub fn write_json(
    path: &Path,
    config: &BenchmarkConfig,
    results: &[BenchmarkResult],
) -> anyhow::Result<()> {
    let json = format_json(config, results).context("Failed to serialize results")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write results to '{}'", path.display()))
}
