//! Multi-benchmark runs and configuration failures

use strata_bench::report::{render_results, render_summary};
use strata_bench::{run_benchmarks, BenchmarkConfig, KvEngine, ResultSummary, StrataError};

use crate::common::{BenchDir, ENTRY_BYTES};

#[test]
fn runs_in_listed_order() {
    let mut bench = BenchDir::new(200, 2);
    bench.config.benchmarks = vec![
        "fillseq".into(),
        " readrandom ".into(),
        "concurrent_writers".into(),
    ];

    let mut order = Vec::new();
    let outcomes =
        run_benchmarks::<KvEngine, _>(&bench.config, |o| order.push(o.result.test_name.clone()))
            .unwrap();

    assert_eq!(order, vec!["fillseq", "readrandom", "concurrent_writers"]);
    assert_eq!(outcomes.len(), 3);
    assert!(outcomes.iter().all(|o| o.stats.is_none()));
}

#[test]
fn iterator_tests_toggle_appends_scans() {
    let mut bench = BenchDir::new(500, 2);
    bench.config.benchmarks = vec!["fillprefixed".into(), "iterseq".into()];
    bench.config.iterator_tests = true;

    let outcomes = run_benchmarks::<KvEngine, _>(&bench.config, |_| {}).unwrap();
    let names: Vec<_> = outcomes.iter().map(|o| o.result.test_name.as_str()).collect();

    assert_eq!(names, vec!["fillprefixed", "iterseq", "iterrandom", "iterprefix"]);
}

#[test]
fn stats_snapshot_after_each_run() {
    let mut bench = BenchDir::new(150, 3);
    bench.config.benchmarks = vec!["fillseq".into(), "high_contention_writes".into()];
    bench.config.stats = true;

    let outcomes = run_benchmarks::<KvEngine, _>(&bench.config, |_| {}).unwrap();

    let first = outcomes[0].stats.as_deref().unwrap();
    assert!(first.contains("Keys: 150"));
    assert!(first.contains("Sync mode: none"));
    let second = outcomes[1].stats.as_deref().unwrap();
    assert!(second.contains("Keys: 150"));
}

#[test]
fn progress_and_histogram_enabled() {
    let mut bench = BenchDir::new(2000, 4);
    bench.config.benchmarks = vec!["fillseq".into(), "readseq".into()];
    bench.config.report_interval_ms = 1;
    bench.config.histogram = true;

    let outcomes = run_benchmarks::<KvEngine, _>(&bench.config, |_| {}).unwrap();

    for outcome in &outcomes {
        let result = &outcome.result;
        assert_eq!(result.operations, 2000);
        let bucketed: u64 = result.histogram.iter().map(|b| b.count).sum();
        assert_eq!(bucketed, result.samples);
    }
}

#[test]
fn unknown_benchmark_runs_nothing() {
    let mut bench = BenchDir::new(10, 1);
    bench.config.benchmarks = vec!["fillseq".into(), "fillsideways".into()];

    let mut completed = 0;
    let err = run_benchmarks::<KvEngine, _>(&bench.config, |_| completed += 1).unwrap_err();

    assert!(matches!(err, StrataError::UnknownBenchmark(ref name) if name == "fillsideways"));
    assert_eq!(completed, 0);
    assert!(!bench.db_path().exists());
}

#[test]
fn zero_threads_is_fatal() {
    let mut bench = BenchDir::new(10, 1);
    bench.config.threads = 0;

    let err = run_benchmarks::<KvEngine, _>(&bench.config, |_| {}).unwrap_err();

    assert!(err.is_fatal());
    assert!(!bench.db_path().exists());
}

#[test]
fn report_renders_every_result() {
    let mut bench = BenchDir::new(100, 2);
    bench.config.benchmarks = vec!["fillseq".into(), "readseq".into()];

    let results: Vec<_> = run_benchmarks::<KvEngine, _>(&bench.config, |_| {})
        .unwrap()
        .into_iter()
        .map(|o| o.result)
        .collect();
    let summary = ResultSummary::from_results(&results);

    assert_eq!(summary.total_operations, 200);
    assert_eq!(summary.total_bytes_written, 100 * ENTRY_BYTES);
    assert_eq!(summary.total_bytes_read, 100 * ENTRY_BYTES);

    let table = render_results(&results);
    assert!(table.lines().any(|l| l.starts_with("fillseq")));
    assert!(table.lines().any(|l| l.starts_with("readseq")));
    let text = render_summary(&summary);
    assert!(text.contains("Total Operations: 200"));
    assert!(text.contains("Read Throughput"));
}

#[test]
fn config_file_drives_a_run() {
    let bench = BenchDir::new(0, 1);
    let path = bench.dir.path().join("bench.toml");
    std::fs::write(
        &path,
        format!(
            "db_path = {:?}\nnum_operations = 120\nthreads = 3\nbenchmarks = [\"fillseq\"]\nreport_interval_ms = 0\nstats = false\n",
            bench.db_path().display().to_string()
        ),
    )
    .unwrap();

    let config = BenchmarkConfig::from_file(&path).unwrap();
    let outcomes = run_benchmarks::<KvEngine, _>(&config, |_| {}).unwrap();

    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].result.operations, 120);
}
