//! Transaction validation for OCC
//!
//! Key rules:
//! - First-committer-wins based on READ-SET, not write-set
//! - Blind writes (write without read) do NOT conflict
//! - Write skew is ALLOWED

use std::collections::HashMap;

use strata_storage::VersionedStore;

use crate::transaction::TransactionContext;

/// Types of conflicts that can occur during transaction validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictType {
    /// Key was read at one version but the store now holds another
    ReadWriteConflict {
        /// The key that has a conflict
        key: Vec<u8>,
        /// Version recorded in read_set when read
        read_version: u64,
        /// Current version in storage at validation time
        current_version: u64,
    },
}

/// Result of transaction validation
///
/// A transaction commits only if `is_valid()` returns true.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    /// All conflicts detected during validation
    pub conflicts: Vec<ConflictType>,
}

impl ValidationResult {
    /// Create a successful validation result (no conflicts)
    pub fn ok() -> Self {
        Self::default()
    }

    /// Check if validation passed (no conflicts)
    pub fn is_valid(&self) -> bool {
        self.conflicts.is_empty()
    }

    /// Get the number of conflicts
    pub fn conflict_count(&self) -> usize {
        self.conflicts.len()
    }
}

/// Validate the read-set against current storage state
///
/// Every key whose current version differs from the version recorded at
/// read time is reported as a `ReadWriteConflict`.
pub fn validate_read_set(read_set: &HashMap<Vec<u8>, u64>, store: &VersionedStore) -> ValidationResult {
    let conflicts = read_set
        .iter()
        .filter_map(|(key, &read_version)| {
            let current_version = store.version_of(key);
            (current_version != read_version).then(|| ConflictType::ReadWriteConflict {
                key: key.clone(),
                read_version,
                current_version,
            })
        })
        .collect();
    ValidationResult { conflicts }
}

/// Validate a transaction for commit
///
/// Read-only work has nothing to publish, so it always validates.
pub fn validate_transaction(txn: &TransactionContext, store: &VersionedStore) -> ValidationResult {
    if !txn.has_writes() {
        return ValidationResult::ok();
    }
    validate_read_set(&txn.read_set, store)
}
