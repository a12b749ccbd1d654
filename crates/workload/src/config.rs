//! Benchmark run configuration
//!
//! A `BenchmarkConfig` is built once per process (defaults, then an optional
//! TOML file, then command-line overrides) and shared read-only by every
//! worker of every run.
//!
//! # Example
//!
//! ```toml
//! db_path = "/tmp/strata_bench"
//! sync = "partial"
//! num_operations = 100000
//! threads = 8
//! benchmarks = ["fillrandom", "readrandom", "mixedworkload"]
//! read_ratio = 80
//! key_distribution = "zipfian"
//!
//! [iterator_limits]
//! range_width = 100
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use strata_core::{EngineOptions, StrataError, StrataResult, SyncMode};

use crate::workload::Workload;

/// Benchmarks run when none are named
pub const DEFAULT_BENCHMARKS: &[&str] = &[
    "fillseq",
    "fillprefixed",
    "readseq",
    "readrandom",
    "iterseq",
    "iterrandom",
    "iterprefix",
    "concurrent_writers",
    "high_contention_writes",
    "batch_concurrent_writes",
];

/// Benchmarks appended by the iterator-tests toggle
pub const ITERATOR_BENCHMARKS: &[Workload] =
    &[Workload::IterSeq, Workload::IterRandom, Workload::IterPrefix];

/// How operation indices map onto key bytes
///
/// Parsing is lossy: unrecognized names fall back to `Sequential`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum KeyDistribution {
    /// Zero-padded decimal index
    #[default]
    Sequential,
    /// Little-endian bytes of the index
    Random,
    /// Skewed reuse of low indices
    Zipfian,
}

impl KeyDistribution {
    /// Canonical name
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyDistribution::Sequential => "sequential",
            KeyDistribution::Random => "random",
            KeyDistribution::Zipfian => "zipfian",
        }
    }

    /// Parse a distribution name, defaulting to `Sequential`
    pub fn parse_lossy(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "random" => KeyDistribution::Random,
            "zipfian" => KeyDistribution::Zipfian,
            _ => KeyDistribution::Sequential,
        }
    }
}

impl From<String> for KeyDistribution {
    fn from(name: String) -> Self {
        Self::parse_lossy(&name)
    }
}

impl From<KeyDistribution> for String {
    fn from(dist: KeyDistribution) -> Self {
        dist.as_str().to_string()
    }
}

impl fmt::Display for KeyDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape of the scan benchmarks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IteratorLimits {
    /// Keys covered by one `iterrandom` range
    pub range_width: u64,
    /// Entries consumed per `iterrandom` scan
    pub range_scan_cap: usize,
    /// Entries consumed per `iterprefix` scan
    pub prefix_scan_cap: usize,
    /// `iterprefix` runs `num_operations / divisor` scans
    pub prefix_iterations_divisor: u64,
    /// Scans `iterrandom` runs when the budget is below one range
    pub min_range_iterations: u64,
}

impl Default for IteratorLimits {
    fn default() -> Self {
        Self {
            range_width: 100,
            range_scan_cap: 100,
            prefix_scan_cap: 200,
            prefix_iterations_divisor: 50,
            min_range_iterations: 10,
        }
    }
}

/// Immutable configuration for one harness invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkConfig {
    /// Database directory
    pub db_path: PathBuf,
    /// Write buffer size in bytes
    pub write_buffer_size: u64,
    /// Commit durability
    pub sync: SyncMode,
    /// Number of LSM levels
    pub levels: usize,
    /// Bloom filters on table lookups
    pub bloom_filter: bool,
    /// Maximum concurrent compactions
    pub max_compaction_concurrency: usize,
    /// Operation budget per benchmark
    pub num_operations: u64,
    /// Key size in bytes
    pub key_size: usize,
    /// Value size in bytes
    pub value_size: usize,
    /// Worker threads per benchmark
    pub threads: usize,
    /// Writes per transaction for batched benchmarks (<= 0 uses the
    /// benchmark's own default)
    pub batch_size: i64,
    /// Benchmarks to run, in order
    pub benchmarks: Vec<String>,
    /// Percentage of reads in `mixedworkload`
    pub read_ratio: u32,
    /// Key distribution
    pub key_distribution: KeyDistribution,
    /// Keys assumed present for read benchmarks (0 = `num_operations`)
    pub existing_keys: u64,
    /// Progress report interval in milliseconds (0 disables reporting)
    pub report_interval_ms: u64,
    /// Include a latency histogram in results
    pub histogram: bool,
    /// Print engine stats after each benchmark
    pub stats: bool,
    /// Use explicit transactions for single-operation benchmarks
    pub use_transactions: bool,
    /// Append the iterator benchmarks to the list
    pub iterator_tests: bool,
    /// Generate compressible values
    pub compressible: bool,
    /// Seed for permutations
    pub seed: u64,
    /// Remove the database directory after the run
    pub cleanup: bool,
    /// Write results as JSON to this path
    pub json_output: Option<PathBuf>,
    /// Scan benchmark limits
    pub iterator_limits: IteratorLimits,
}

fn default_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Seed derived from the wall clock
pub fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("/tmp/strata_bench"),
            write_buffer_size: 64 * 1024 * 1024,
            sync: SyncMode::None,
            levels: 7,
            bloom_filter: true,
            max_compaction_concurrency: 4,
            num_operations: 10_000,
            key_size: 16,
            value_size: 100,
            threads: default_threads(),
            batch_size: 1,
            benchmarks: DEFAULT_BENCHMARKS.iter().map(|s| s.to_string()).collect(),
            read_ratio: 50,
            key_distribution: KeyDistribution::Sequential,
            existing_keys: 0,
            report_interval_ms: 10_000,
            histogram: true,
            stats: true,
            use_transactions: false,
            iterator_tests: false,
            compressible: false,
            seed: time_seed(),
            cleanup: true,
            json_output: None,
            iterator_limits: IteratorLimits::default(),
        }
    }
}

impl BenchmarkConfig {
    /// Read a configuration from a TOML file
    ///
    /// Fields missing from the file keep their defaults. The result is
    /// validated before it is returned.
    pub fn from_file(path: &Path) -> StrataResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            StrataError::config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config = Self::from_toml(&content).map_err(|e| {
            StrataError::config(format!("Invalid config file '{}': {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a configuration from TOML text without validating it
    pub fn from_toml(content: &str) -> StrataResult<Self> {
        toml::from_str(content).map_err(|e| StrataError::config(e.to_string()))
    }

    /// Reject configurations that cannot produce a meaningful run
    pub fn validate(&self) -> StrataResult<()> {
        if self.threads == 0 {
            return Err(StrataError::config("threads must be at least 1"));
        }
        if self.read_ratio > 100 {
            return Err(StrataError::config(format!(
                "read_ratio must be between 0 and 100, got {}",
                self.read_ratio
            )));
        }
        if self.iterator_limits.range_width == 0 || self.iterator_limits.prefix_iterations_divisor == 0
        {
            return Err(StrataError::config(
                "iterator range_width and prefix_iterations_divisor must be positive",
            ));
        }
        if self.workloads()?.is_empty() {
            return Err(StrataError::config("no benchmarks selected"));
        }
        Ok(())
    }

    /// Resolve the benchmark list
    ///
    /// Blank entries are skipped; with `iterator_tests` on, the iterator
    /// benchmarks are appended unless already listed.
    ///
    /// # Errors
    ///
    /// `UnknownBenchmark` for the first name not in the catalogue.
    pub fn workloads(&self) -> StrataResult<Vec<Workload>> {
        let mut workloads = self
            .benchmarks
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .map(str::parse::<Workload>)
            .collect::<StrataResult<Vec<_>>>()?;
        if self.iterator_tests {
            for w in ITERATOR_BENCHMARKS {
                if !workloads.contains(w) {
                    workloads.push(*w);
                }
            }
        }
        Ok(workloads)
    }

    /// Keys read benchmarks may assume are present
    pub fn existing_keys(&self) -> u64 {
        let keys = if self.existing_keys == 0 {
            self.num_operations
        } else {
            self.existing_keys
        };
        keys.max(1)
    }

    /// Progress reporting interval, if enabled
    pub fn report_interval(&self) -> Option<Duration> {
        (self.report_interval_ms > 0).then(|| Duration::from_millis(self.report_interval_ms))
    }

    /// Options for opening the engine under test
    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            directory: self.db_path.clone(),
            write_buffer_size: self.write_buffer_size,
            sync_mode: self.sync,
            level_count: self.levels,
            bloom_filter: self.bloom_filter,
            max_compaction_concurrency: self.max_compaction_concurrency,
        }
    }
}
