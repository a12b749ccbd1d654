//! Benchmark results
//!
//! A [`BenchmarkResult`] is assembled exactly once per run, after every
//! worker has joined, and is immutable afterwards.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

use crate::counters::CounterSnapshot;
use crate::latency::{HistogramBucket, LatencySummary};
use crate::progress::throughput;

/// Outcome of one workload run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkResult {
    /// Benchmark name
    pub test_name: String,
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// Operations completed (successful or not)
    pub operations: u64,
    /// Wall-clock time of the runner
    pub duration: Duration,
    /// `operations / duration`
    pub ops_per_sec: f64,
    /// Median latency
    pub p50: Duration,
    /// 95th percentile latency
    pub p95: Duration,
    /// 99th percentile latency
    pub p99: Duration,
    /// Slowest sample
    pub max: Duration,
    /// Mean latency
    pub mean: Duration,
    /// Latency samples taken
    pub samples: u64,
    /// Bytes returned by successful reads
    pub bytes_read: u64,
    /// Bytes accepted by successful writes
    pub bytes_written: u64,
    /// Failed operations
    pub errors: u64,
    /// Latency histogram, empty unless requested
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub histogram: Vec<HistogramBucket>,
}

impl BenchmarkResult {
    /// Combine the final counters and latency summary of a run
    pub fn new(
        test_name: impl Into<String>,
        started_at: DateTime<Utc>,
        duration: Duration,
        counters: CounterSnapshot,
        latency: LatencySummary,
    ) -> Self {
        let p = latency.percentiles;
        Self {
            test_name: test_name.into(),
            started_at,
            operations: counters.ops_completed,
            duration,
            ops_per_sec: throughput(counters.ops_completed, duration),
            p50: p.p50,
            p95: p.p95,
            p99: p.p99,
            max: p.max,
            mean: latency.mean,
            samples: latency.samples,
            bytes_read: counters.bytes_read,
            bytes_written: counters.bytes_written,
            errors: counters.errors,
            histogram: latency.histogram,
        }
    }

    /// Fraction of operations that failed
    pub fn error_rate(&self) -> f64 {
        if self.operations == 0 {
            0.0
        } else {
            self.errors as f64 / self.operations as f64
        }
    }
}

/// Totals across a set of results
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ResultSummary {
    /// Benchmarks included
    pub benchmarks: usize,
    /// Sum of operation counts
    pub total_operations: u64,
    /// Sum of run durations
    pub total_duration: Duration,
    /// Total operations over total duration
    pub average_ops_per_sec: f64,
    /// Sum of bytes read
    pub total_bytes_read: u64,
    /// Sum of bytes written
    pub total_bytes_written: u64,
    /// Sum of errors
    pub total_errors: u64,
}

impl ResultSummary {
    /// Aggregate `results`
    pub fn from_results(results: &[BenchmarkResult]) -> Self {
        let mut summary = results.iter().fold(Self::default(), |mut acc, r| {
            acc.benchmarks += 1;
            acc.total_operations += r.operations;
            acc.total_duration += r.duration;
            acc.total_bytes_read += r.bytes_read;
            acc.total_bytes_written += r.bytes_written;
            acc.total_errors += r.errors;
            acc
        });
        summary.average_ops_per_sec = throughput(summary.total_operations, summary.total_duration);
        summary
    }

    /// Bytes read per second of total run time
    pub fn read_throughput(&self) -> f64 {
        throughput(self.total_bytes_read, self.total_duration)
    }

    /// Bytes written per second of total run time
    pub fn write_throughput(&self) -> f64 {
        throughput(self.total_bytes_written, self.total_duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::latency::Percentiles;

    fn result(name: &str, ops: u64, millis: u64, written: u64, errors: u64) -> BenchmarkResult {
        BenchmarkResult::new(
            name,
            Utc::now(),
            Duration::from_millis(millis),
            CounterSnapshot {
                ops_completed: ops,
                bytes_read: 0,
                bytes_written: written,
                errors,
            },
            LatencySummary {
                samples: ops,
                mean: Duration::from_micros(3),
                percentiles: Percentiles {
                    p50: Duration::from_micros(2),
                    p95: Duration::from_micros(5),
                    p99: Duration::from_micros(9),
                    max: Duration::from_micros(40),
                },
                histogram: Vec::new(),
            },
        )
    }

    #[test]
    fn test_ops_per_sec() {
        let r = result("fillseq", 1000, 500, 116_000, 0);
        assert_eq!(r.ops_per_sec, 2000.0);
        assert_eq!(r.p99, Duration::from_micros(9));
        assert_eq!(r.error_rate(), 0.0);
    }

    #[test]
    fn test_zero_duration_has_zero_rate() {
        let r = result("iterseq", 10, 0, 0, 0);
        assert_eq!(r.ops_per_sec, 0.0);
    }

    #[test]
    fn test_summary_totals() {
        let results = vec![
            result("fillseq", 1000, 1000, 1000, 0),
            result("fillrandom", 3000, 1000, 3000, 30),
        ];
        let summary = ResultSummary::from_results(&results);
        assert_eq!(summary.benchmarks, 2);
        assert_eq!(summary.total_operations, 4000);
        assert_eq!(summary.total_duration, Duration::from_secs(2));
        assert_eq!(summary.average_ops_per_sec, 2000.0);
        assert_eq!(summary.total_bytes_written, 4000);
        assert_eq!(summary.write_throughput(), 2000.0);
        assert_eq!(summary.total_errors, 30);
    }

    #[test]
    fn test_empty_summary() {
        let summary = ResultSummary::from_results(&[]);
        assert_eq!(summary, ResultSummary::default());
        assert_eq!(summary.read_throughput(), 0.0);
    }

    #[test]
    fn test_histogram_omitted_from_json_when_empty() {
        let json = serde_json::to_value(result("readseq", 1, 1, 0, 0)).unwrap();
        assert!(json.get("histogram").is_none());
        assert_eq!(json["test_name"], "readseq");
    }
}
