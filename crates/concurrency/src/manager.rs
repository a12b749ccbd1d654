//! Transaction manager for coordinating commit operations
//!
//! Provides atomic commit by orchestrating:
//! 1. Validation (first-committer-wins)
//! 2. Log append (durability)
//! 3. Storage application (visibility)
//!
//! ## Commit Sequence
//!
//! ```text
//! 1. Take the commit lock (the commit log mutex)
//! 2. validate_transaction() - check the read set
//! 3. IF conflicts: mark aborted and return TransactionConflict
//! 4. Allocate commit_version
//! 5. Append the write set to the log
//! 6. Apply writes to the store under commit_version
//! 7. Mark committed
//! ```
//!
//! Validation and application happen under one lock, so no commit can slip
//! in between the check and the write.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

use strata_core::StrataResult;
use strata_storage::{CommitLog, VersionedStore};

use crate::transaction::{CommitError, TransactionContext};
use crate::validation::validate_transaction;

/// Manages transaction lifecycle and atomic commits
pub struct TransactionManager {
    /// Commit log; its mutex doubles as the commit lock
    log: Mutex<CommitLog>,
    /// Next transaction ID
    next_txn_id: AtomicU64,
    committed: AtomicU64,
    aborted: AtomicU64,
}

impl TransactionManager {
    /// Create a manager that appends to `log`
    pub fn new(log: CommitLog) -> Self {
        Self {
            log: Mutex::new(log),
            next_txn_id: AtomicU64::new(1),
            committed: AtomicU64::new(0),
            aborted: AtomicU64::new(0),
        }
    }

    /// Start a transaction at the store's current version
    pub fn begin(&self, store: &VersionedStore, read_only: bool) -> TransactionContext {
        let txn_id = self.next_txn_id.fetch_add(1, Ordering::Relaxed);
        let start_version = store.current_version();
        if read_only {
            TransactionContext::new_read_only(txn_id, start_version)
        } else {
            TransactionContext::new(txn_id, start_version)
        }
    }

    /// Commit a transaction atomically
    ///
    /// Returns the commit version, or the store's current version when the
    /// transaction had nothing to write.
    ///
    /// # Errors
    ///
    /// - `TransactionConflict` if a concurrent commit changed a key this
    ///   transaction read
    /// - `TransactionNotActive` if the transaction already finished
    /// - `Storage` if the log append failed (nothing is applied)
    pub fn commit(&self, txn: &mut TransactionContext, store: &VersionedStore) -> StrataResult<u64> {
        if !txn.is_active() {
            return Err(CommitError::InvalidState(format!("{:?}", txn.status)).into());
        }

        if !txn.has_writes() {
            txn.mark_committed()?;
            self.committed.fetch_add(1, Ordering::Relaxed);
            return Ok(store.current_version());
        }

        let mut log = self.log.lock();

        let validation = validate_transaction(txn, store);
        if !validation.is_valid() {
            trace!(
                target: "strata::txn",
                txn_id = txn.txn_id,
                conflicts = validation.conflict_count(),
                "Transaction aborted on validation"
            );
            txn.mark_aborted("read-set conflict")?;
            self.aborted.fetch_add(1, Ordering::Relaxed);
            return Err(CommitError::ValidationFailed(validation).into());
        }

        let writes = txn.take_writes();
        if let Err(e) = log.append(&writes) {
            txn.mark_aborted(format!("log append failed: {}", e))?;
            self.aborted.fetch_add(1, Ordering::Relaxed);
            return Err(CommitError::LogError(e.to_string()).into());
        }

        let commit_version = store.next_version();
        store.apply(writes, commit_version);
        drop(log);

        txn.mark_committed()?;
        self.committed.fetch_add(1, Ordering::Relaxed);
        Ok(commit_version)
    }

    /// Explicitly abort a transaction
    ///
    /// Only transactions that discard buffered writes count as aborted.
    pub fn abort(&self, txn: &mut TransactionContext, reason: &str) -> StrataResult<()> {
        let discarded = txn.has_writes();
        txn.mark_aborted(reason)?;
        if discarded {
            self.aborted.fetch_add(1, Ordering::Relaxed);
        }
        Ok(())
    }

    /// Flush and fsync the commit log
    pub fn sync(&self) -> StrataResult<()> {
        self.log.lock().sync()
    }

    /// Transactions committed since open
    pub fn committed(&self) -> u64 {
        self.committed.load(Ordering::Relaxed)
    }

    /// Transactions aborted since open (conflicts and explicit aborts)
    pub fn aborted(&self) -> u64 {
        self.aborted.load(Ordering::Relaxed)
    }

    /// Commit log size in bytes
    pub fn log_size(&self) -> u64 {
        self.log.lock().size()
    }

    /// Records appended and fsyncs issued since open
    pub fn log_activity(&self) -> (u64, u64) {
        let log = self.log.lock();
        (log.appends(), log.syncs())
    }

    /// Consume the manager, returning its log
    pub fn into_log(self) -> CommitLog {
        self.log.into_inner()
    }
}
