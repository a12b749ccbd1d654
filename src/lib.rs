//! Strata benchmark harness
//!
//! Concurrent load generation and latency measurement for transactional
//! key-value engines.
//!
//! # Quick Start
//!
//! ```ignore
//! use strata_bench::{run_single_benchmark, BenchmarkConfig, KvEngine, Workload};
//!
//! let config = BenchmarkConfig {
//!     db_path: "/tmp/strata_bench".into(),
//!     num_operations: 100_000,
//!     ..Default::default()
//! };
//! let result = run_single_benchmark::<KvEngine>(&config, Workload::FillSeq)?;
//! println!("{:.0} ops/sec, p99 {:?}", result.ops_per_sec, result.p99);
//! ```
//!
//! # Architecture
//!
//! The workload layer (`strata-workload`) is generic over the [`Engine`]
//! trait from `strata-core`. `strata-engine` provides [`KvEngine`], a
//! reference backend built from `strata-storage` and `strata-concurrency`.

pub use strata_core::{Engine, EngineOptions, Entry, StrataError, StrataResult, SyncMode, Transaction};
pub use strata_engine::{KvEngine, KvTransaction, LOCK_FILE_NAME, LOG_FILE_NAME};
pub use strata_workload::*;
