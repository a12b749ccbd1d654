//! Reference storage engine for the Strata benchmark harness
//!
//! Combines the storage and concurrency layers behind the
//! [`strata_core::Engine`] contract:
//! - `KvEngine`: directory-locked handle with commit log replay
//! - `KvTransaction`: OCC transaction with read-your-writes gets and lazy
//!   ordered iterators

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod engine;
pub mod transaction;

pub use engine::{KvEngine, LOCK_FILE_NAME, LOG_FILE_NAME};
pub use transaction::KvTransaction;
