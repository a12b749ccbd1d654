//! Transaction context for OCC
//!
//! `TransactionContext` tracks the keys a transaction has read (with the
//! version it saw) and buffers its writes until commit. Reads see the
//! transaction's own buffered writes first.

use std::collections::{BTreeMap, HashMap};

use strata_core::{StrataError, StrataResult};
use strata_storage::VersionedStore;
use thiserror::Error;

use crate::validation::ValidationResult;

/// Error type for commit failures
#[derive(Debug, Error)]
pub enum CommitError {
    /// Validation found read-set conflicts
    #[error("commit failed: {} conflict(s)", .0.conflict_count())]
    ValidationFailed(ValidationResult),

    /// Transaction was not in a state that allows commit
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Appending to the commit log failed
    #[error("commit log error: {0}")]
    LogError(String),
}

impl From<CommitError> for StrataError {
    fn from(e: CommitError) -> Self {
        match e {
            CommitError::ValidationFailed(result) => StrataError::conflict(format!(
                "validation failed: {} conflict(s)",
                result.conflict_count()
            )),
            CommitError::InvalidState(state) => StrataError::not_active(state),
            CommitError::LogError(message) => StrataError::storage(message),
        }
    }
}

/// Status of a transaction in its lifecycle
///
/// `Active` moves to either terminal state; terminal states never change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionStatus {
    /// Transaction is executing, can read/write
    Active,
    /// Transaction committed successfully
    Committed,
    /// Transaction was aborted
    Aborted {
        /// Human-readable reason for abort
        reason: String,
    },
}

impl TransactionStatus {
    fn describe(&self) -> String {
        match self {
            TransactionStatus::Active => "active".to_string(),
            TransactionStatus::Committed => "committed".to_string(),
            TransactionStatus::Aborted { reason } => format!("aborted ({})", reason),
        }
    }
}

/// Read/write set tracking for one transaction
#[derive(Debug)]
pub struct TransactionContext {
    /// Transaction identifier
    pub txn_id: u64,
    /// Store version when the transaction began
    pub start_version: u64,
    /// Keys read with the version observed at first read (0 = absent)
    pub read_set: HashMap<Vec<u8>, u64>,
    /// Buffered writes, last write per key wins
    pub write_set: BTreeMap<Vec<u8>, Vec<u8>>,
    /// Lifecycle state
    pub status: TransactionStatus,
    read_only: bool,
}

impl TransactionContext {
    /// Create an active read-write transaction
    pub fn new(txn_id: u64, start_version: u64) -> Self {
        Self {
            txn_id,
            start_version,
            read_set: HashMap::new(),
            write_set: BTreeMap::new(),
            status: TransactionStatus::Active,
            read_only: false,
        }
    }

    /// Create an active read-only transaction
    pub fn new_read_only(txn_id: u64, start_version: u64) -> Self {
        Self {
            read_only: true,
            ..Self::new(txn_id, start_version)
        }
    }

    /// True if writes are rejected
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// True while reads and writes are allowed
    pub fn is_active(&self) -> bool {
        self.status == TransactionStatus::Active
    }

    /// Fail unless the transaction is active
    pub fn ensure_active(&self) -> StrataResult<()> {
        if self.is_active() {
            Ok(())
        } else {
            Err(StrataError::not_active(self.status.describe()))
        }
    }

    /// Read `key`, preferring this transaction's buffered write
    ///
    /// Store reads are recorded in the read set at their first observation.
    pub fn get(&mut self, key: &[u8], store: &VersionedStore) -> StrataResult<Option<Vec<u8>>> {
        self.ensure_active()?;
        if let Some(value) = self.write_set.get(key) {
            return Ok(Some(value.clone()));
        }

        let stored = store.get(key);
        if !self.is_read_only() {
            let version = stored.as_ref().map_or(0, |sv| sv.version);
            self.read_set.entry(key.to_vec()).or_insert(version);
        }
        Ok(stored.map(|sv| sv.value))
    }

    /// Buffer a write
    pub fn put(&mut self, key: &[u8], value: &[u8]) -> StrataResult<()> {
        self.ensure_active()?;
        if self.is_read_only() {
            return Err(StrataError::invalid_input(
                "cannot write in a read-only transaction",
            ));
        }
        self.write_set.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    /// True if commit has anything to apply
    pub fn has_writes(&self) -> bool {
        !self.write_set.is_empty()
    }

    /// Drain buffered writes in key order
    pub fn take_writes(&mut self) -> Vec<(Vec<u8>, Vec<u8>)> {
        std::mem::take(&mut self.write_set).into_iter().collect()
    }

    /// Transition to `Committed`
    pub fn mark_committed(&mut self) -> StrataResult<()> {
        self.ensure_active()?;
        self.status = TransactionStatus::Committed;
        Ok(())
    }

    /// Transition to `Aborted`, discarding buffered writes
    pub fn mark_aborted(&mut self, reason: impl Into<String>) -> StrataResult<()> {
        self.ensure_active()?;
        self.write_set.clear();
        self.status = TransactionStatus::Aborted {
            reason: reason.into(),
        };
        Ok(())
    }
}
