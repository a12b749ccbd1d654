//! Data written by one run is visible to later runs

use strata_bench::{
    run_single_benchmark, Engine, KvEngine, SyncMode, Transaction, Workload, LOG_FILE_NAME,
};

use crate::common::{BenchDir, ENTRY_BYTES};

#[test]
fn reads_find_keys_from_an_earlier_run() {
    let bench = BenchDir::new(500, 4);
    run_single_benchmark::<KvEngine>(&bench.config, Workload::FillRandom).unwrap();

    let result = run_single_benchmark::<KvEngine>(&bench.config, Workload::ReadRandom).unwrap();

    assert_eq!(result.errors, 0);
    assert_eq!(result.bytes_read, 500 * ENTRY_BYTES);
}

#[test]
fn every_sync_mode_persists() {
    for sync in [SyncMode::None, SyncMode::Partial, SyncMode::Full] {
        let mut bench = BenchDir::new(100, 2);
        bench.config.sync = sync;

        let result = run_single_benchmark::<KvEngine>(&bench.config, Workload::ConcurrentWriters)
            .unwrap();
        assert_eq!(result.errors, 0, "{}", sync);

        let engine = bench.open();
        assert_eq!(engine.key_count(), 100, "{}", sync);
        assert!(engine.recovered().records >= 100, "{}", sync);
        assert!(bench.db_path().join(LOG_FILE_NAME).exists());
    }
}

#[test]
fn default_batch_larger_than_budget_writes_nothing() {
    let mut bench = BenchDir::new(50, 1);
    bench.config.batch_size = 0;
    let result =
        run_single_benchmark::<KvEngine>(&bench.config, Workload::BatchConcurrentWrites).unwrap();

    // 50 operations with the default batch of 100 issue no whole batch
    assert_eq!(result.operations, 0);
    assert_eq!(result.samples, 0);
    let engine = bench.open();
    assert_eq!(engine.key_count(), 0);
    assert_eq!(engine.recovered().records, 0);
    engine.close().unwrap();
}

#[test]
fn batch_remainder_is_not_persisted() {
    let mut bench = BenchDir::new(250, 2);
    bench.config.batch_size = 0;
    run_single_benchmark::<KvEngine>(&bench.config, Workload::BatchConcurrentWrites).unwrap();

    // Two whole batches of 100; the trailing 50 are never issued
    let engine = bench.open();
    assert_eq!(engine.key_count(), 200);
    assert_eq!(engine.recovered().records, 2);
}

#[test]
fn heavy_contention_values_survive_reopen() {
    let mut bench = BenchDir::new(12, 1);
    bench.config.value_size = 4;
    run_single_benchmark::<KvEngine>(&bench.config, Workload::HeavyContention).unwrap();

    let engine = bench.open();
    let key = strata_bench::generate_key(
        0,
        bench.config.key_size,
        bench.config.key_distribution,
        None,
    );
    let value = engine.view(|txn| txn.get(&key)).unwrap();
    assert_eq!(value.len(), 4 * 4);
}
