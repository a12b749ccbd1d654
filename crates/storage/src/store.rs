//! VersionedStore: ordered key storage with commit versions
//!
//! This module implements the engine's in-memory state using:
//! - `BTreeMap<Vec<u8>, StoredValue>` for ordered key storage
//! - `parking_lot::RwLock` for thread-safe access
//! - `AtomicU64` for the monotonically increasing commit version
//!
//! # Design Notes
//!
//! - **No version history**: each key stores only its latest value. Read-set
//!   validation only needs the latest version, so chains are not kept.
//! - **Version 0 means absent**: a key that was never written reports
//!   version 0, which lets validation treat "read a missing key" uniformly.
//! - **Batch apply under one write lock**: a committed write set becomes
//!   visible all at once.

use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::atomic::{AtomicU64, Ordering};

/// A stored value together with the commit version that wrote it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredValue {
    /// Value bytes
    pub value: Vec<u8>,
    /// Commit version (always > 0)
    pub version: u64,
}

/// Ordered, versioned key-value map
#[derive(Debug, Default)]
pub struct VersionedStore {
    data: RwLock<BTreeMap<Vec<u8>, StoredValue>>,
    version: AtomicU64,
}

impl VersionedStore {
    /// Create an empty store at version 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest committed version
    pub fn current_version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }

    /// Allocate the next commit version
    ///
    /// Callers serialize commits, so versions are applied in allocation order.
    pub fn next_version(&self) -> u64 {
        self.version.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Read the latest value for `key`
    pub fn get(&self, key: &[u8]) -> Option<StoredValue> {
        self.data.read().get(key).cloned()
    }

    /// Version of `key`, or 0 if it does not exist
    pub fn version_of(&self, key: &[u8]) -> u64 {
        self.data.read().get(key).map_or(0, |sv| sv.version)
    }

    /// Apply a write set at `version`
    ///
    /// All writes become visible atomically with respect to readers.
    pub fn apply<I>(&self, writes: I, version: u64)
    where
        I: IntoIterator<Item = (Vec<u8>, Vec<u8>)>,
    {
        let mut data = self.data.write();
        for (key, value) in writes {
            data.insert(key, StoredValue { value, version });
        }
    }

    /// Apply a replayed write set, advancing the version counter
    pub fn apply_replayed<I>(&self, writes: I)
    where
        I: IntoIterator<Item = (Vec<u8>, Vec<u8>)>,
    {
        let version = self.next_version();
        self.apply(writes, version);
    }

    /// Copy up to `limit` entries between `lower` and `upper`
    ///
    /// Entries come back in ascending key order, or descending when
    /// `ascending` is false (starting from the upper end).
    pub fn scan(
        &self,
        lower: Bound<&[u8]>,
        upper: Bound<&[u8]>,
        limit: usize,
        ascending: bool,
    ) -> Vec<(Vec<u8>, StoredValue)> {
        if let (Some(lo), Some(hi)) = (bound_key(lower), bound_key(upper)) {
            // BTreeMap::range panics on inverted or doubly-excluded equal bounds
            let empty_point = lo == hi
                && (matches!(lower, Bound::Excluded(_)) || matches!(upper, Bound::Excluded(_)));
            if lo > hi || empty_point {
                return Vec::new();
            }
        }

        let data = self.data.read();
        let range = data.range::<[u8], _>((lower, upper));
        let clone_entry = |(k, v): (&Vec<u8>, &StoredValue)| (k.clone(), v.clone());
        if ascending {
            range.take(limit).map(clone_entry).collect()
        } else {
            range.rev().take(limit).map(clone_entry).collect()
        }
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// True if no key has been written
    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    /// Total key and value bytes held
    pub fn approximate_bytes(&self) -> u64 {
        self.data
            .read()
            .iter()
            .map(|(k, v)| (k.len() + v.value.len()) as u64)
            .sum()
    }
}

fn bound_key(bound: Bound<&[u8]>) -> Option<&[u8]> {
    match bound {
        Bound::Included(k) | Bound::Excluded(k) => Some(k),
        Bound::Unbounded => None,
    }
}
