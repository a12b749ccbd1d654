//! ArgMatches → BenchmarkConfig conversion.
//!
//! The config starts from the TOML file named by `--config` (or the
//! built-in defaults), then every flag that was given overrides its field.
//! The result is validated before it is returned.

use std::path::PathBuf;
use std::time::Duration;

use clap::ArgMatches;
use strata_core::{StrataError, StrataResult, SyncMode};
use strata_workload::{BenchmarkConfig, KeyDistribution};

/// Build the run configuration from parsed arguments.
pub fn matches_to_config(matches: &ArgMatches) -> StrataResult<BenchmarkConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => BenchmarkConfig::from_file(path)?,
        None => BenchmarkConfig::default(),
    };

    if let Some(db) = matches.get_one::<String>("db") {
        config.db_path = PathBuf::from(db);
    }
    if let Some(sync) = matches.get_one::<String>("sync") {
        config.sync = sync.parse::<SyncMode>()?;
    }
    if let Some(dist) = matches.get_one::<String>("key_dist") {
        config.key_distribution = KeyDistribution::parse_lossy(dist);
    }
    if let Some(list) = matches.get_one::<String>("benchmarks") {
        config.benchmarks = split_list(list);
    }
    if let Some(interval) = matches.get_one::<String>("report_interval") {
        config.report_interval_ms = parse_duration(interval)?.as_millis() as u64;
    }

    set(matches, "write_buffer_size", &mut config.write_buffer_size);
    set(matches, "levels", &mut config.levels);
    set(matches, "bloom_filter", &mut config.bloom_filter);
    set(
        matches,
        "max_compaction_concurrency",
        &mut config.max_compaction_concurrency,
    );
    set(matches, "num", &mut config.num_operations);
    set(matches, "key_size", &mut config.key_size);
    set(matches, "value_size", &mut config.value_size);
    set(matches, "threads", &mut config.threads);
    set(matches, "batch_size", &mut config.batch_size);
    set(matches, "read_ratio", &mut config.read_ratio);
    set(matches, "existing_keys", &mut config.existing_keys);
    set(matches, "histogram", &mut config.histogram);
    set(matches, "stats", &mut config.stats);
    set(matches, "use_txn", &mut config.use_transactions);
    set(matches, "iterator_tests", &mut config.iterator_tests);
    set(matches, "compressible", &mut config.compressible);
    set(matches, "seed", &mut config.seed);
    set(matches, "cleanup", &mut config.cleanup);
    if let Some(path) = matches.get_one::<PathBuf>("json") {
        config.json_output = Some(path.clone());
    }

    config.validate()?;
    Ok(config)
}

/// Overwrite `field` when the flag was given.
fn set<T: Clone + Send + Sync + 'static>(matches: &ArgMatches, id: &str, field: &mut T) {
    if let Some(value) = matches.get_one::<T>(id) {
        *field = value.clone();
    }
}

/// Split a comma-separated benchmark list, keeping order.
pub fn split_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Parse a duration such as `10s`, `500ms`, `1m30s` or `0`.
pub fn parse_duration(input: &str) -> StrataResult<Duration> {
    let s = input.trim();
    if s == "0" {
        return Ok(Duration::ZERO);
    }
    let invalid = || StrataError::config(format!("invalid duration '{}'", input));

    let mut total = Duration::ZERO;
    let mut rest = s;
    while !rest.is_empty() {
        let num_end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .ok_or_else(invalid)?;
        let (number, tail) = rest.split_at(num_end);
        let amount: f64 = number.parse().map_err(|_| invalid())?;
        let unit_end = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, next) = tail.split_at(unit_end);
        let nanos_per_unit = match unit {
            "ns" => 1.0,
            "us" | "µs" | "μs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60e9,
            "h" => 3600e9,
            _ => return Err(invalid()),
        };
        total += Duration::from_nanos((amount * nanos_per_unit) as u64);
        rest = next;
    }
    Ok(total)
}
