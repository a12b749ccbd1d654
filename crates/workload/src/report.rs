//! Result rendering
//!
//! Everything here is a pure function from results to text; callers decide
//! where the text goes.

use std::fmt::Write;
use std::time::Duration;

use crate::latency::HistogramBucket;
use crate::result::{BenchmarkResult, ResultSummary};

/// Width of the longest histogram bar
const HISTOGRAM_BAR_WIDTH: u64 = 40;

/// Human-readable latency: `ns`, `μs`, `ms` or `s`
pub fn format_duration(d: Duration) -> String {
    let nanos = d.as_nanos();
    if nanos < 1_000 {
        format!("{}ns", nanos)
    } else if nanos < 1_000_000 {
        format!("{:.1}μs", nanos as f64 / 1_000.0)
    } else if nanos < 1_000_000_000 {
        format!("{:.1}ms", nanos as f64 / 1_000_000.0)
    } else {
        format!("{:.2}s", d.as_secs_f64())
    }
}

/// Human-readable byte count in powers of 1024
pub fn format_bytes(bytes: u64) -> String {
    const UNIT: u64 = 1024;
    const SUFFIXES: &[u8] = b"KMGTPE";
    if bytes < UNIT {
        return format!("{} B", bytes);
    }
    let mut div = UNIT;
    let mut exp = 0;
    let mut n = bytes / UNIT;
    while n >= UNIT {
        div *= UNIT;
        exp += 1;
        n /= UNIT;
    }
    format!("{:.1} {}B", bytes as f64 / div as f64, SUFFIXES[exp] as char)
}

/// Results table, one row per benchmark
pub fn render_results(results: &[BenchmarkResult]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Benchmark Results");
    let _ = writeln!(out, "=================");
    let _ = writeln!(
        out,
        "{:<25} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12} {:>8} {:>7}",
        "Test", "Ops", "Ops/sec", "P50", "P95", "P99", "Max", "Errors", "Err %"
    );
    let _ = writeln!(
        out,
        "{:<25} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12} {:>8} {:>7}",
        "----", "---", "-------", "---", "---", "---", "---", "------", "-----"
    );
    for r in results {
        let _ = writeln!(
            out,
            "{:<25} {:>12} {:>12.2} {:>12} {:>12} {:>12} {:>12} {:>8} {:>7.2}",
            r.test_name,
            r.operations,
            r.ops_per_sec,
            format_duration(r.p50),
            format_duration(r.p95),
            format_duration(r.p99),
            format_duration(r.max),
            r.errors,
            r.error_rate() * 100.0
        );
    }
    out
}

/// Aggregate block printed under the table
///
/// Throughput lines appear only for directions that moved bytes.
pub fn render_summary(summary: &ResultSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Summary");
    let _ = writeln!(out, "=========================");
    let _ = writeln!(out, "  Total Operations: {}", summary.total_operations);
    let _ = writeln!(
        out,
        "  Total Duration: {}",
        format_duration(summary.total_duration)
    );
    let _ = writeln!(out, "  Average Ops/sec: {:.2}", summary.average_ops_per_sec);
    let _ = writeln!(
        out,
        "  Total Bytes Read: {}",
        format_bytes(summary.total_bytes_read)
    );
    let _ = writeln!(
        out,
        "  Total Bytes Written: {}",
        format_bytes(summary.total_bytes_written)
    );
    if summary.total_errors > 0 {
        let _ = writeln!(out, "  Total Errors: {}", summary.total_errors);
    }
    if summary.total_bytes_read > 0 {
        let _ = writeln!(
            out,
            "  Read Throughput: {}/sec",
            format_bytes(summary.read_throughput() as u64)
        );
    }
    if summary.total_bytes_written > 0 {
        let _ = writeln!(
            out,
            "  Write Throughput: {}/sec",
            format_bytes(summary.write_throughput() as u64)
        );
    }
    out
}

/// Bar chart of a latency histogram, scaled to the fullest bucket
pub fn render_histogram(name: &str, buckets: &[HistogramBucket]) -> String {
    let mut out = String::new();
    let total: u64 = buckets.iter().map(|b| b.count).sum();
    let peak = buckets.iter().map(|b| b.count).max().unwrap_or(0);
    if total == 0 {
        return out;
    }
    let _ = writeln!(out, "Latency histogram: {} ({} samples)", name, total);
    for b in buckets {
        let bar = (b.count * HISTOGRAM_BAR_WIDTH + peak - 1) / peak;
        let _ = writeln!(
            out,
            "  [{:>9}, {:>9}) {:>10} {:>6.2}% {}",
            format_duration(b.lower),
            format_duration(b.upper),
            b.count,
            b.count as f64 * 100.0 / total as f64,
            "#".repeat(bar as usize)
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counters::CounterSnapshot;
    use crate::latency::LatencySummary;
    use chrono::Utc;

    #[test]
    fn test_format_duration_units() {
        assert_eq!(format_duration(Duration::from_nanos(999)), "999ns");
        assert_eq!(format_duration(Duration::from_nanos(1_500)), "1.5μs");
        assert_eq!(format_duration(Duration::from_micros(2_300)), "2.3ms");
        assert_eq!(format_duration(Duration::from_millis(3_456)), "3.46s");
        assert_eq!(format_duration(Duration::ZERO), "0ns");
    }

    #[test]
    fn test_format_bytes_units() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(1024), "1.0 KB");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MB");
        assert_eq!(format_bytes(3 * 1024 * 1024 * 1024), "3.0 GB");
    }

    #[test]
    fn test_results_table_has_row_per_result() {
        let result = BenchmarkResult::new(
            "fillseq",
            Utc::now(),
            Duration::from_secs(1),
            CounterSnapshot {
                ops_completed: 1000,
                bytes_read: 0,
                bytes_written: 116_000,
                errors: 2,
            },
            LatencySummary::default(),
        );
        let table = render_results(&[result]);
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[2].starts_with("Test"));
        assert!(lines[4].starts_with("fillseq"));
        assert!(lines[4].contains("1000.00"));
        assert!(lines[4].contains(" 2 "));
        assert!(lines[4].trim_end().ends_with("0.20"));
    }

    #[test]
    fn test_summary_omits_idle_throughput() {
        let summary = ResultSummary {
            benchmarks: 1,
            total_operations: 10,
            total_duration: Duration::from_secs(1),
            average_ops_per_sec: 10.0,
            total_bytes_read: 0,
            total_bytes_written: 2048,
            total_errors: 0,
        };
        let text = render_summary(&summary);
        assert!(text.contains("Total Bytes Written: 2.0 KB"));
        assert!(text.contains("Write Throughput: 2.0 KB/sec"));
        assert!(!text.contains("Read Throughput"));
        assert!(!text.contains("Total Errors"));
    }

    #[test]
    fn test_histogram_scales_to_peak() {
        let buckets = [
            HistogramBucket {
                lower: Duration::from_nanos(512),
                upper: Duration::from_nanos(1024),
                count: 10,
            },
            HistogramBucket {
                lower: Duration::from_nanos(1024),
                upper: Duration::from_nanos(2048),
                count: 5,
            },
        ];
        let text = render_histogram("readseq", &buckets);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("15 samples"));
        assert!(lines[1].ends_with(&"#".repeat(40)));
        assert!(lines[2].ends_with(&format!(" {}", "#".repeat(20))));
    }

    #[test]
    fn test_empty_histogram_renders_nothing() {
        assert!(render_histogram("x", &[]).is_empty());
    }
}
