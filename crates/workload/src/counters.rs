//! Shared run counters
//!
//! Four relaxed atomics updated by every worker. Mid-run reads are dirty
//! snapshots for progress output; the values read after all workers have
//! joined are authoritative.

use std::sync::atomic::{AtomicU64, Ordering};

/// Operation, byte and error totals for one benchmark run
#[derive(Debug, Default)]
pub struct RunCounters {
    ops_completed: AtomicU64,
    bytes_read: AtomicU64,
    bytes_written: AtomicU64,
    errors: AtomicU64,
}

/// Point-in-time copy of [`RunCounters`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterSnapshot {
    /// Operations completed (successful or not)
    pub ops_completed: u64,
    /// Key and value bytes returned by successful reads
    pub bytes_read: u64,
    /// Key and value bytes accepted by successful writes
    pub bytes_written: u64,
    /// Failed operations
    pub errors: u64,
}

impl RunCounters {
    /// Create zeroed counters
    pub fn new() -> Self {
        Self::default()
    }

    /// Count `n` completed operations
    pub fn add_ops(&self, n: u64) {
        self.ops_completed.fetch_add(n, Ordering::Relaxed);
    }

    /// Overwrite the operation count (scan benchmarks report what they visited)
    pub fn set_ops(&self, n: u64) {
        self.ops_completed.store(n, Ordering::Relaxed);
    }

    /// Count bytes returned by a read
    pub fn add_read(&self, bytes: u64) {
        self.bytes_read.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Count bytes accepted by a write
    pub fn add_written(&self, bytes: u64) {
        self.bytes_written.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Count `n` failed operations
    pub fn add_errors(&self, n: u64) {
        self.errors.fetch_add(n, Ordering::Relaxed);
    }

    /// Operations completed so far
    pub fn ops_completed(&self) -> u64 {
        self.ops_completed.load(Ordering::Relaxed)
    }

    /// Copy all four counters
    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            ops_completed: self.ops_completed.load(Ordering::Relaxed),
            bytes_read: self.bytes_read.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }
}
