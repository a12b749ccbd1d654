//! Clap command definition.
//!
//! Flag names keep their underscores (`--key_size`, `--use_txn`) so existing
//! benchmark scripts keep working. No flag carries a clap default: an
//! absent flag leaves the config-file or built-in value in place.

use clap::{value_parser, Arg, ArgAction, Command};

/// A boolean flag that accepts `--flag`, `--flag=true` and `--flag=false`.
fn bool_flag(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .help(help)
        .value_parser(value_parser!(bool))
        .num_args(0..=1)
        .require_equals(true)
        .default_missing_value("true")
}

/// Build the complete CLI command.
pub fn build_cli() -> Command {
    Command::new("strata-bench")
        .about("Concurrent load generator and latency benchmark for Strata")
        .version(env!("CARGO_PKG_VERSION"))
        // Database
        .arg(
            Arg::new("db")
                .long("db")
                .value_name("PATH")
                .help("Database directory path (default: /tmp/strata_bench)"),
        )
        .arg(
            Arg::new("write_buffer_size")
                .long("write_buffer_size")
                .value_name("BYTES")
                .help("Write buffer size in bytes")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("sync")
                .long("sync")
                .value_name("MODE")
                .help("Sync option: none, partial, full"),
        )
        .arg(
            Arg::new("levels")
                .long("levels")
                .help("Number of LSM levels")
                .value_parser(value_parser!(usize)),
        )
        .arg(bool_flag("bloom_filter", "Enable bloom filters"))
        .arg(
            Arg::new("max_compaction_concurrency")
                .long("max_compaction_concurrency")
                .help("Max compaction concurrency")
                .value_parser(value_parser!(usize)),
        )
        // Workload
        .arg(
            Arg::new("num")
                .long("num")
                .help("Number of operations")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("key_size")
                .long("key_size")
                .help("Size of keys in bytes")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("value_size")
                .long("value_size")
                .help("Size of values in bytes")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("threads")
                .long("threads")
                .help("Number of concurrent threads (default: available parallelism)")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("batch_size")
                .long("batch_size")
                .help("Writes per transaction for batched benchmarks")
                .allow_negative_numbers(true)
                .value_parser(value_parser!(i64)),
        )
        .arg(
            Arg::new("benchmarks")
                .long("benchmarks")
                .value_name("LIST")
                .help("Comma-separated list of benchmarks"),
        )
        .arg(
            Arg::new("read_ratio")
                .long("read_ratio")
                .help("Read percentage for mixed workloads (0-100)")
                .value_parser(value_parser!(u32)),
        )
        .arg(
            Arg::new("key_dist")
                .long("key_dist")
                .help("Key distribution: sequential, random, zipfian"),
        )
        .arg(
            Arg::new("existing_keys")
                .long("existing_keys")
                .help("Number of existing keys (0 = use num)")
                .value_parser(value_parser!(u64)),
        )
        // Reporting
        .arg(
            Arg::new("report_interval")
                .long("report_interval")
                .value_name("DURATION")
                .help("Progress report interval, e.g. 10s, 500ms, 1m (0 disables)"),
        )
        .arg(bool_flag("histogram", "Show latency histogram"))
        .arg(bool_flag("stats", "Show database stats after each benchmark"))
        // Advanced
        .arg(bool_flag(
            "use_txn",
            "Use explicit transactions instead of update/view",
        ))
        .arg(bool_flag("iterator_tests", "Include iterator benchmarks"))
        .arg(bool_flag("compressible", "Use compressible test data"))
        .arg(
            Arg::new("seed")
                .long("seed")
                .help("Random seed (default: current time)")
                .value_parser(value_parser!(u64)),
        )
        .arg(bool_flag("cleanup", "Remove the database directory afterwards"))
        // Files
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("FILE")
                .help("Load settings from a TOML file; flags override it")
                .value_parser(value_parser!(std::path::PathBuf)),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .value_name("FILE")
                .help("Write results as JSON to this file")
                .value_parser(value_parser!(std::path::PathBuf)),
        )
        .arg(
            Arg::new("list")
                .long("list")
                .help("List available benchmarks and exit")
                .action(ArgAction::SetTrue),
        )
}
