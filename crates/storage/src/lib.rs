//! Storage layer for the Strata reference engine
//!
//! This crate provides:
//! - `VersionedStore`: ordered map with per-key commit versions
//! - `ScanCursor`: lazy, chunked, forward-only iteration over a key range
//! - `CommitLog`: append-only, CRC-checked log of committed write sets

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cursor;
pub mod store;
pub mod wal;

pub use cursor::{prefix_upper_bound, ScanCursor};
pub use store::{StoredValue, VersionedStore};
pub use wal::{CommitLog, ReplayStats, WriteSet};
