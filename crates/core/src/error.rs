//! Error types for the benchmark harness and its storage collaborators
//!
//! One error enum is shared by every layer. We use `thiserror` for
//! automatic `Display` and `Error` trait implementations.
//!
//! Workload runners classify backend failures with the predicates on
//! [`StrataError`] rather than matching on message text: absence is
//! [`StrataError::KeyNotFound`], never a storage failure.

use std::io;
use thiserror::Error;

/// Result type alias for Strata operations
pub type StrataResult<T> = std::result::Result<T, StrataError>;

/// Error types for the benchmark harness and reference engine
#[derive(Debug, Error)]
pub enum StrataError {
    /// Key does not exist (an expected outcome for absence checks)
    #[error("key not found")]
    KeyNotFound,

    /// Transaction aborted at commit because a concurrent commit won
    #[error("transaction conflict: {reason}")]
    TransactionConflict {
        /// Human-readable conflict summary
        reason: String,
    },

    /// Operation attempted on a transaction that is no longer active
    #[error("transaction not active: {state}")]
    TransactionNotActive {
        /// State the transaction was found in
        state: String,
    },

    /// Storage layer failure
    #[error("storage error: {message}")]
    Storage {
        /// Failure description
        message: String,
    },

    /// I/O error (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Persisted data failed an integrity check
    #[error("data corruption: {0}")]
    Corruption(String),

    /// Invalid argument supplied to an operation
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Invalid harness configuration (fatal)
    #[error("configuration error: {0}")]
    Config(String),

    /// Benchmark name not present in the workload catalogue (fatal)
    #[error("unknown benchmark: {0}")]
    UnknownBenchmark(String),

    /// Invariant violation inside the harness
    #[error("internal error: {0}")]
    Internal(String),
}

impl StrataError {
    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        StrataError::Storage {
            message: message.into(),
        }
    }

    /// Create a transaction conflict error
    pub fn conflict(reason: impl Into<String>) -> Self {
        StrataError::TransactionConflict {
            reason: reason.into(),
        }
    }

    /// Create a transaction-not-active error
    pub fn not_active(state: impl Into<String>) -> Self {
        StrataError::TransactionNotActive {
            state: state.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        StrataError::InvalidInput(message.into())
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        StrataError::Config(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        StrataError::Internal(message.into())
    }

    /// True when the error reports an absent key
    pub fn is_not_found(&self) -> bool {
        matches!(self, StrataError::KeyNotFound)
    }

    /// True when the error is a commit-time conflict
    pub fn is_conflict(&self) -> bool {
        matches!(self, StrataError::TransactionConflict { .. })
    }

    /// True for errors that invalidate the whole benchmark run
    ///
    /// Configuration errors abort the process before any result is emitted.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            StrataError::Config(_) | StrataError::UnknownBenchmark(_)
        )
    }
}
