//! Reference transactional key-value engine
//!
//! `KvEngine` is the backend the benchmark binary drives. Its state lives
//! in a [`VersionedStore`]; every committed write set is appended to
//! `strata.log` in the data directory and replayed on open, so a run that
//! reopens the directory sees what earlier runs wrote.
//!
//! Only one handle may hold a directory at a time: open takes an exclusive
//! advisory lock on `<dir>/.lock` and keeps it until the handle is dropped.
//!
//! Tuning knobs that only apply to LSM-style engines (level count, bloom
//! filters, compaction concurrency) are accepted and reported by `stats`.

use std::fs::{File, OpenOptions};
use std::path::Path;

use strata_concurrency::TransactionManager;
use strata_core::{Engine, EngineOptions, StrataError, StrataResult};
use strata_storage::{CommitLog, ReplayStats, VersionedStore};
use tracing::{debug, info};

use crate::transaction::KvTransaction;

/// Commit log file name inside the data directory
pub const LOG_FILE_NAME: &str = "strata.log";

/// Lock file name inside the data directory
pub const LOCK_FILE_NAME: &str = ".lock";

/// An open reference engine handle
pub struct KvEngine {
    options: EngineOptions,
    store: VersionedStore,
    manager: TransactionManager,
    recovered: ReplayStats,
    // Holds the directory lock for the handle's lifetime
    _lock_file: File,
}

impl KvEngine {
    pub(crate) fn store(&self) -> &VersionedStore {
        &self.store
    }

    pub(crate) fn manager(&self) -> &TransactionManager {
        &self.manager
    }

    /// Options the handle was opened with
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// What replay found when the handle was opened
    pub fn recovered(&self) -> ReplayStats {
        self.recovered
    }

    /// Number of live keys
    pub fn key_count(&self) -> usize {
        self.store.len()
    }

    /// Latest commit version
    pub fn current_version(&self) -> u64 {
        self.store.current_version()
    }
}

fn acquire_lock(dir: &Path) -> StrataResult<File> {
    let lock_file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .read(true)
        .write(true)
        .open(dir.join(LOCK_FILE_NAME))
        .map_err(|e| StrataError::storage(format!("failed to open lock file: {}", e)))?;
    fs2::FileExt::try_lock_exclusive(&lock_file).map_err(|_| {
        StrataError::storage(format!(
            "database at '{}' is already in use by another handle",
            dir.display()
        ))
    })?;
    Ok(lock_file)
}

impl Engine for KvEngine {
    type Txn<'a> = KvTransaction<'a>;

    fn open(options: &EngineOptions) -> StrataResult<Self> {
        let dir = &options.directory;
        std::fs::create_dir_all(dir)?;
        let lock_file = acquire_lock(dir)?;

        let store = VersionedStore::new();
        let buffer = usize::try_from(options.write_buffer_size).unwrap_or(usize::MAX);
        let (log, recovered) = CommitLog::open(
            &dir.join(LOG_FILE_NAME),
            options.sync_mode,
            buffer,
            |writes| store.apply_replayed(writes),
        )?;

        info!(
            target: "strata::engine",
            path = %dir.display(),
            records_replayed = recovered.records,
            writes_applied = recovered.writes,
            keys = store.len(),
            sync = %options.sync_mode,
            "Engine opened"
        );

        Ok(Self {
            options: options.clone(),
            store,
            manager: TransactionManager::new(log),
            recovered,
            _lock_file: lock_file,
        })
    }

    fn close(self) -> StrataResult<()> {
        self.manager.sync()?;
        debug!(
            target: "strata::engine",
            path = %self.options.directory.display(),
            committed = self.manager.committed(),
            aborted = self.manager.aborted(),
            "Engine closed"
        );
        Ok(())
    }

    fn begin(&self) -> StrataResult<KvTransaction<'_>> {
        Ok(KvTransaction::new(self, self.manager.begin(&self.store, false)))
    }

    fn begin_read_only(&self) -> StrataResult<KvTransaction<'_>> {
        Ok(KvTransaction::new(self, self.manager.begin(&self.store, true)))
    }

    fn stats(&self) -> String {
        let opts = &self.options;
        let mut out = String::new();
        out.push_str("Engine: strata reference (ordered map + commit log)\n");
        out.push_str(&format!("Directory: {}\n", opts.directory.display()));
        out.push_str(&format!("Keys: {}\n", self.store.len()));
        out.push_str(&format!(
            "Approximate data size: {} bytes\n",
            self.store.approximate_bytes()
        ));
        out.push_str(&format!("Commit version: {}\n", self.store.current_version()));
        out.push_str(&format!(
            "Transactions: {} committed, {} aborted\n",
            self.manager.committed(),
            self.manager.aborted()
        ));
        let (appends, syncs) = self.manager.log_activity();
        out.push_str(&format!(
            "Commit log: {} bytes ({} records replayed at open)\n",
            self.manager.log_size(),
            self.recovered.records
        ));
        out.push_str(&format!("Log activity: {} appends, {} fsyncs\n", appends, syncs));
        out.push_str(&format!("Sync mode: {}\n", opts.sync_mode));
        out.push_str(&format!("Write buffer size: {} bytes\n", opts.write_buffer_size));
        out.push_str(&format!("Levels: {}\n", opts.level_count));
        out.push_str(&format!(
            "Bloom filter: {}\n",
            if opts.bloom_filter { "enabled" } else { "disabled" }
        ));
        out.push_str(&format!(
            "Max compaction concurrency: {}",
            opts.max_compaction_concurrency
        ));
        out
    }
}
