//! Shared test utilities for the root integration suites.
//!
//! Import via `mod common;` from a test's main.rs.

#![allow(dead_code)]

use std::path::PathBuf;

use strata_bench::{BenchmarkConfig, BenchmarkResult, Engine, KvEngine};
use tempfile::TempDir;

/// Key and value sizes used by every helper config
pub const KEY_SIZE: usize = 16;
pub const VALUE_SIZE: usize = 100;

/// Bytes one successful operation moves with the helper sizes
pub const ENTRY_BYTES: u64 = (KEY_SIZE + VALUE_SIZE) as u64;

/// A temp directory plus a quiet config pointing into it.
pub struct BenchDir {
    pub dir: TempDir,
    pub config: BenchmarkConfig,
}

impl BenchDir {
    /// Config for `num` operations on `threads` workers.
    pub fn new(num: u64, threads: usize) -> Self {
        let dir = TempDir::new().expect("tempdir");
        let config = BenchmarkConfig {
            db_path: dir.path().join("db"),
            num_operations: num,
            threads,
            key_size: KEY_SIZE,
            value_size: VALUE_SIZE,
            report_interval_ms: 0,
            stats: false,
            histogram: false,
            cleanup: false,
            seed: 7,
            ..Default::default()
        };
        Self { dir, config }
    }

    pub fn db_path(&self) -> PathBuf {
        self.config.db_path.clone()
    }

    /// Open the database directory directly.
    pub fn open(&self) -> KvEngine {
        KvEngine::open(&self.config.engine_options()).expect("open engine")
    }
}

/// Latency percentiles must be ordered.
pub fn assert_percentiles_ordered(result: &BenchmarkResult) {
    assert!(result.p50 <= result.p95, "{}: p50 > p95", result.test_name);
    assert!(result.p95 <= result.p99, "{}: p95 > p99", result.test_name);
    assert!(result.p99 <= result.max, "{}: p99 > max", result.test_name);
}
