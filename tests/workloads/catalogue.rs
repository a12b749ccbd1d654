//! Every benchmark in the catalogue, run through the orchestrator

use strata_bench::{run_single_benchmark, BenchmarkConfig, KvEngine, Workload};

use crate::common::{assert_percentiles_ordered, BenchDir, ENTRY_BYTES};

const NUM: u64 = 400;
const THREADS: usize = 4;

fn expected_ops(config: &BenchmarkConfig, workload: Workload) -> Option<u64> {
    let num = config.num_operations;
    if workload.is_iterator() {
        return None;
    }
    if !workload.is_batched() {
        return Some(num);
    }
    let default = if workload == Workload::ConcurrentTransactions {
        10
    } else {
        100
    };
    let batch = if config.batch_size > 0 {
        config.batch_size as u64
    } else {
        default
    };
    Some(num / batch * batch)
}

#[test]
fn every_benchmark_completes_its_budget() {
    let bench = BenchDir::new(NUM, THREADS);
    run_single_benchmark::<KvEngine>(&bench.config, Workload::FillSeq).unwrap();

    for workload in Workload::ALL {
        let result = run_single_benchmark::<KvEngine>(&bench.config, workload).unwrap();
        assert_eq!(result.test_name, workload.name());
        if let Some(ops) = expected_ops(&bench.config, workload) {
            assert_eq!(result.operations, ops, "{}", workload);
        }
        assert!(result.samples > 0, "{} recorded no latency", workload);
        assert_percentiles_ordered(&result);
    }
}

#[test]
fn error_free_runs_move_bytes() {
    let bench = BenchDir::new(NUM, THREADS);
    run_single_benchmark::<KvEngine>(&bench.config, Workload::FillSeq).unwrap();

    let writers = [
        Workload::FillSeq,
        Workload::FillRandom,
        Workload::ConcurrentWriters,
        Workload::HighContentionWrites,
        Workload::BatchConcurrentWrites,
    ];
    for workload in writers {
        let result = run_single_benchmark::<KvEngine>(&bench.config, workload).unwrap();
        assert_eq!(result.errors, 0, "{}", workload);
        assert_eq!(result.bytes_written, result.operations * ENTRY_BYTES, "{}", workload);
    }

    let readers = [Workload::ReadSeq, Workload::ReadRandom, Workload::IterSeq];
    for workload in readers {
        let result = run_single_benchmark::<KvEngine>(&bench.config, workload).unwrap();
        assert_eq!(result.errors, 0, "{}", workload);
        assert!(result.bytes_read > 0, "{}", workload);
        assert_eq!(result.bytes_written, 0, "{}", workload);
    }
}

#[test]
fn fillseq_thousand_ops_four_threads() {
    let bench = BenchDir::new(1000, 4);

    let result = run_single_benchmark::<KvEngine>(&bench.config, Workload::FillSeq).unwrap();

    assert_eq!(result.operations, 1000);
    assert_eq!(result.errors, 0);
    assert_eq!(result.bytes_written, 1000 * ENTRY_BYTES);
    assert!(result.ops_per_sec > 0.0);
}

#[test]
fn readmissing_hundred_not_found() {
    let mut bench = BenchDir::new(100, 4);
    bench.config.existing_keys = 100;
    run_single_benchmark::<KvEngine>(&bench.config, Workload::FillSeq).unwrap();

    let result = run_single_benchmark::<KvEngine>(&bench.config, Workload::ReadMissing).unwrap();

    assert_eq!(result.operations, 100);
    assert_eq!(result.errors, 0);
    assert_eq!(result.bytes_read, 0);
}

#[test]
fn key_distributions_round_trip_through_reads() {
    for dist in ["sequential", "random", "zipfian"] {
        let mut bench = BenchDir::new(300, 3);
        bench.config.key_distribution = strata_bench::KeyDistribution::parse_lossy(dist);
        run_single_benchmark::<KvEngine>(&bench.config, Workload::FillSeq).unwrap();

        let result = run_single_benchmark::<KvEngine>(&bench.config, Workload::ReadSeq).unwrap();
        assert_eq!(result.errors, 0, "{}", dist);
        assert_eq!(result.bytes_read, 300 * ENTRY_BYTES, "{}", dist);
    }
}

#[test]
fn compressible_values_fill_cleanly() {
    let mut bench = BenchDir::new(200, 2);
    bench.config.compressible = true;

    let result = run_single_benchmark::<KvEngine>(&bench.config, Workload::FillSeq).unwrap();

    assert_eq!(result.errors, 0);
    let engine = bench.open();
    assert_eq!(engine.key_count(), 200);
}
