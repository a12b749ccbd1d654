//! strata-bench: concurrent load generator for the Strata engine.
//!
//! Runs the configured benchmarks in order, one fresh engine handle per
//! benchmark, and prints a result table and summary to stdout. Logs go to
//! stderr, filtered by `RUST_LOG` (default `info`).

mod commands;
mod format;
mod parse;

use std::io::ErrorKind;
use std::path::Path;
use std::process;

use anyhow::Context;
use strata_engine::KvEngine;
use strata_workload::report::{render_histogram, render_results, render_summary};
use strata_workload::{run_benchmarks, BenchmarkResult, ResultSummary};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use commands::build_cli;
use format::{format_benchmark_list, format_config, write_json, BANNER};
use parse::matches_to_config;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("strata-bench: error: {:#}", e);
        process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let matches = build_cli().get_matches();

    if matches.get_flag("list") {
        println!("Available benchmarks:");
        print!("{}", format_benchmark_list());
        return Ok(());
    }

    let config = matches_to_config(&matches).context("Invalid configuration")?;

    println!("{}", BANNER);
    println!("Benchmark Tool\n");
    println!("{}", format_config(&config));

    let outcomes = run_benchmarks::<KvEngine, _>(&config, |outcome| {
        let result = &outcome.result;
        if let Some(stats) = &outcome.stats {
            println!("Database Stats:\n{}\n", stats);
        }
        if config.histogram {
            print!("{}", render_histogram(&result.test_name, &result.histogram));
        }
        println!(
            "Completed {}: {:.2} ops/sec\n",
            result.test_name, result.ops_per_sec
        );
    });

    if config.cleanup {
        cleanup(&config.db_path);
    }

    let results: Vec<BenchmarkResult> = outcomes
        .context("Benchmark run failed")?
        .into_iter()
        .map(|o| o.result)
        .collect();

    println!();
    println!("{}", render_results(&results));
    print!("{}", render_summary(&ResultSummary::from_results(&results)));

    if let Some(path) = &config.json_output {
        write_json(path, &config, &results)?;
        info!(target: "strata::bench", path = %path.display(), "Results written");
    }
    Ok(())
}

fn cleanup(db_path: &Path) {
    match std::fs::remove_dir_all(db_path) {
        Ok(()) => println!("Cleaned up database directory: {}", db_path.display()),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => warn!(
            target: "strata::bench",
            path = %db_path.display(),
            error = %e,
            "Failed to clean up database directory"
        ),
    }
}
