//! Per-operation latency collection
//!
//! Workers append durations under a mutex; the orchestrator sorts once at
//! the end of the run. Appends are O(1) amortized, so the lock is held for
//! a few nanoseconds per operation.

use parking_lot::Mutex;
use serde::Serialize;
use std::time::Duration;

/// Tail latency percentiles of one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Percentiles {
    /// Median
    pub p50: Duration,
    /// 95th percentile
    pub p95: Duration,
    /// 99th percentile
    pub p99: Duration,
    /// Slowest sample
    pub max: Duration,
}

/// One histogram bucket: samples with latency in `[lower, upper)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HistogramBucket {
    /// Inclusive lower edge
    pub lower: Duration,
    /// Exclusive upper edge
    pub upper: Duration,
    /// Samples in the bucket
    pub count: u64,
}

/// Everything derived from one sort of the samples
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LatencySummary {
    /// Number of samples
    pub samples: u64,
    /// Arithmetic mean
    pub mean: Duration,
    /// Tail percentiles
    pub percentiles: Percentiles,
    /// Power-of-two buckets (empty unless requested)
    pub histogram: Vec<HistogramBucket>,
}

/// Thread-safe collector of operation durations
#[derive(Debug, Default)]
pub struct LatencyTracker {
    samples: Mutex<Vec<Duration>>,
}

impl LatencyTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tracker with room for `capacity` samples
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: Mutex::new(Vec::with_capacity(capacity)),
        }
    }

    /// Record one operation
    pub fn record(&self, latency: Duration) {
        self.samples.lock().push(latency);
    }

    /// Number of samples recorded so far
    pub fn len(&self) -> usize {
        self.samples.lock().len()
    }

    /// True if nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.samples.lock().is_empty()
    }

    /// P50/P95/P99/max, all zero when empty
    pub fn percentiles(&self) -> Percentiles {
        self.summarize(false).percentiles
    }

    /// Sort the samples and derive every statistic
    ///
    /// Percentiles index the sorted samples at `floor(n * p / 100)`.
    pub fn summarize(&self, histogram: bool) -> LatencySummary {
        let mut samples = self.samples.lock();
        if samples.is_empty() {
            return LatencySummary::default();
        }
        samples.sort_unstable();

        let n = samples.len();
        let at = |percent: usize| samples[(n * percent / 100).min(n - 1)];
        let total: u128 = samples.iter().map(|d| d.as_nanos()).sum();
        let mean = Duration::from_nanos((total / n as u128) as u64);

        LatencySummary {
            samples: n as u64,
            mean,
            percentiles: Percentiles {
                p50: at(50),
                p95: at(95),
                p99: at(99),
                max: samples[n - 1],
            },
            histogram: if histogram {
                power_of_two_buckets(&samples)
            } else {
                Vec::new()
            },
        }
    }
}

/// Bucket sorted samples by the power of two just above their nanoseconds
fn power_of_two_buckets(sorted: &[Duration]) -> Vec<HistogramBucket> {
    let mut buckets: Vec<HistogramBucket> = Vec::new();
    for sample in sorted {
        let nanos = sample.as_nanos().min(u64::MAX as u128) as u64;
        let exp = 64 - nanos.leading_zeros();
        let lower = if exp == 0 { 0 } else { 1u64 << (exp - 1) };
        let upper = if exp >= 64 { u64::MAX } else { 1u64 << exp };
        match buckets.last_mut() {
            Some(b) if b.lower == Duration::from_nanos(lower) => b.count += 1,
            _ => buckets.push(HistogramBucket {
                lower: Duration::from_nanos(lower),
                upper: Duration::from_nanos(upper),
                count: 1,
            }),
        }
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_tracker_is_zero() {
        let tracker = LatencyTracker::new();
        assert_eq!(tracker.percentiles(), Percentiles::default());
        assert_eq!(tracker.summarize(true), LatencySummary::default());
    }

    #[test]
    fn test_percentile_indexing() {
        let tracker = LatencyTracker::with_capacity(100);
        for i in (1..=100).rev() {
            tracker.record(Duration::from_micros(i));
        }
        let p = tracker.percentiles();
        // floor(100 * p / 100) into 1..=100
        assert_eq!(p.p50, Duration::from_micros(51));
        assert_eq!(p.p95, Duration::from_micros(96));
        assert_eq!(p.p99, Duration::from_micros(100));
        assert_eq!(p.max, Duration::from_micros(100));
    }

    #[test]
    fn test_single_sample() {
        let tracker = LatencyTracker::new();
        tracker.record(Duration::from_millis(3));
        let s = tracker.summarize(false);
        assert_eq!(s.samples, 1);
        assert_eq!(s.mean, Duration::from_millis(3));
        assert_eq!(s.percentiles.p50, Duration::from_millis(3));
        assert!(s.histogram.is_empty());
    }

    #[test]
    fn test_histogram_buckets() {
        let tracker = LatencyTracker::new();
        for nanos in [0, 1, 3, 3, 900, 1000] {
            tracker.record(Duration::from_nanos(nanos));
        }
        let hist = tracker.summarize(true).histogram;
        let counts: Vec<_> = hist
            .iter()
            .map(|b| (b.lower.as_nanos(), b.upper.as_nanos(), b.count))
            .collect();
        assert_eq!(counts, vec![(0, 1, 1), (1, 2, 1), (2, 4, 2), (512, 1024, 2)]);
    }

    #[test]
    fn test_concurrent_records() {
        let tracker = LatencyTracker::new();
        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    for i in 0..1000 {
                        tracker.record(Duration::from_nanos(i));
                    }
                });
            }
        });
        assert_eq!(tracker.len(), 8000);
    }

    proptest! {
        #[test]
        fn prop_percentiles_are_ordered(samples in prop::collection::vec(0u64..10_000_000, 1..500)) {
            let tracker = LatencyTracker::new();
            for s in &samples {
                tracker.record(Duration::from_nanos(*s));
            }
            let summary = tracker.summarize(true);
            let p = summary.percentiles;
            prop_assert!(p.p50 <= p.p95);
            prop_assert!(p.p95 <= p.p99);
            prop_assert!(p.p99 <= p.max);
            prop_assert_eq!(p.max, Duration::from_nanos(*samples.iter().max().unwrap()));
            let bucketed: u64 = summary.histogram.iter().map(|b| b.count).sum();
            prop_assert_eq!(bucketed, samples.len() as u64);
        }
    }
}
