//! Core traits for the storage engine contract
//!
//! The benchmark harness drives any engine that implements [`Engine`]. The
//! contract is deliberately narrow: open/close, a commit-or-rollback closure
//! scope (`update`), a read-only closure scope (`view`), explicit
//! transactions (`begin`), and lazy forward-only iteration.
//!
//! Thread safety: an engine handle is shared by reference across every
//! worker of a run, so implementations must be `Send + Sync`. Transactions
//! are owned by a single worker and need not be.

use crate::error::StrataResult;
use crate::options::EngineOptions;

/// A key-value pair yielded by a transaction iterator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Stored key
    pub key: Vec<u8>,
    /// Stored value
    pub value: Vec<u8>,
    /// Commit version that produced this value
    pub version: u64,
}

/// A unit of work against an engine
///
/// Writes are invisible to other transactions until `commit` succeeds.
/// `rollback` discards every buffered write.
pub trait Transaction {
    /// Iterator type returned by the scan methods
    type Iter<'a>: Iterator<Item = Entry>
    where
        Self: 'a;

    /// Read a key
    ///
    /// # Errors
    ///
    /// Returns `StrataError::KeyNotFound` if the key does not exist.
    fn get(&mut self, key: &[u8]) -> StrataResult<Vec<u8>>;

    /// Buffer a write
    fn put(&mut self, key: &[u8], value: &[u8]) -> StrataResult<()>;

    /// Commit all buffered writes atomically
    ///
    /// # Errors
    ///
    /// Returns `StrataError::TransactionConflict` if a concurrent commit
    /// invalidated something this transaction read.
    fn commit(self) -> StrataResult<()>;

    /// Discard all buffered writes
    fn rollback(self) -> StrataResult<()>;

    /// Iterate the whole keyspace
    fn iter(&mut self, ascending: bool) -> StrataResult<Self::Iter<'_>>;

    /// Iterate keys in `[start, end)`
    fn range_iter(
        &mut self,
        start: &[u8],
        end: &[u8],
        ascending: bool,
    ) -> StrataResult<Self::Iter<'_>>;

    /// Iterate keys beginning with `prefix`
    fn prefix_iter(&mut self, prefix: &[u8], ascending: bool) -> StrataResult<Self::Iter<'_>>;
}

/// An open storage engine handle
pub trait Engine: Send + Sync + Sized {
    /// Transaction type borrowed from the handle
    type Txn<'a>: Transaction
    where
        Self: 'a;

    /// Open (or create) the engine described by `options`
    fn open(options: &EngineOptions) -> StrataResult<Self>;

    /// Flush and release the handle
    fn close(self) -> StrataResult<()>;

    /// Begin an explicit read-write transaction
    fn begin(&self) -> StrataResult<Self::Txn<'_>>;

    /// Begin a read-only transaction
    ///
    /// Defaults to `begin`; engines with cheaper snapshot reads override it.
    fn begin_read_only(&self) -> StrataResult<Self::Txn<'_>> {
        self.begin()
    }

    /// Human-readable configuration and runtime snapshot
    fn stats(&self) -> String;

    /// Run `f` in a transaction: commit if it succeeds, roll back if not
    ///
    /// # Example
    /// ```text
    /// engine.update(|txn| txn.put(b"k", b"v"))?;
    /// ```
    fn update<'e, T, F>(&'e self, f: F) -> StrataResult<T>
    where
        F: FnOnce(&mut Self::Txn<'e>) -> StrataResult<T>,
    {
        let mut txn = self.begin()?;
        match f(&mut txn) {
            Ok(value) => {
                txn.commit()?;
                Ok(value)
            }
            Err(e) => {
                // The closure error is the one worth reporting
                let _ = txn.rollback();
                Err(e)
            }
        }
    }

    /// Run `f` in a read-only transaction that is always rolled back
    fn view<'e, T, F>(&'e self, f: F) -> StrataResult<T>
    where
        F: FnOnce(&mut Self::Txn<'e>) -> StrataResult<T>,
    {
        let mut txn = self.begin_read_only()?;
        let result = f(&mut txn);
        let _ = txn.rollback();
        result
    }
}
