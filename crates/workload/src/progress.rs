//! Periodic progress reporting
//!
//! A [`ProgressReporter`] owns one background thread that wakes every
//! interval, reads the run counters without synchronizing with the workers,
//! and logs the op count and an ops/sec estimate. The numbers are
//! approximate until the run has joined.

use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::info;

use crate::counters::RunCounters;

/// Operations per second over `elapsed`, or zero for an empty interval
pub fn throughput(ops: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        ops as f64 / secs
    } else {
        0.0
    }
}

/// Background progress logger for one benchmark run
///
/// Stopping is explicit via [`ProgressReporter::stop`]; dropping a running
/// reporter stops it as well.
pub struct ProgressReporter {
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl ProgressReporter {
    /// Spawn the reporter thread for `benchmark`
    pub fn start(benchmark: &str, counters: Arc<RunCounters>, interval: Duration) -> Self {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let benchmark = benchmark.to_string();
        let started = Instant::now();

        let handle = std::thread::Builder::new()
            .name("bench-progress".to_string())
            .spawn(move || loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        let ops = counters.ops_completed();
                        let ops_per_sec = throughput(ops, started.elapsed());
                        info!(
                            target: "strata::bench",
                            benchmark = %benchmark,
                            ops,
                            ops_per_sec = ops_per_sec as u64,
                            "Progress"
                        );
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            })
            .expect("Failed to spawn progress reporter");

        Self {
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        }
    }

    /// Signal the thread and wait for it to exit
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        self.shutdown();
    }
}
