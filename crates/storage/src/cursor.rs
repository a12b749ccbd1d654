//! Lazy ordered cursor over a [`VersionedStore`]
//!
//! A cursor never holds the store lock between calls to `next`. It copies a
//! small chunk of entries, then moves its bound past the last key it saw, so
//! concurrent commits may become visible mid-scan. Benchmarks only need
//! ordered, bounded traversal, not snapshot isolation for scans.

use std::collections::VecDeque;
use std::ops::Bound;

use strata_core::Entry;

use crate::store::VersionedStore;

/// Entries copied per refill
const CHUNK_SIZE: usize = 64;

/// Smallest key strictly greater than every key starting with `prefix`
///
/// Returns `None` when no such key exists (empty prefix or all `0xFF`), in
/// which case the scan is unbounded above.
pub fn prefix_upper_bound(prefix: &[u8]) -> Option<Vec<u8>> {
    let mut bound = prefix.to_vec();
    while let Some(last) = bound.pop() {
        if last < u8::MAX {
            bound.push(last + 1);
            return Some(bound);
        }
    }
    None
}

/// Iterator yielding committed entries between two bounds
pub struct ScanCursor<'a> {
    store: &'a VersionedStore,
    lower: Bound<Vec<u8>>,
    upper: Bound<Vec<u8>>,
    ascending: bool,
    buffer: VecDeque<Entry>,
    exhausted: bool,
}

impl<'a> ScanCursor<'a> {
    /// Cursor over `[lower, upper]` with the given bound kinds
    pub fn new(
        store: &'a VersionedStore,
        lower: Bound<Vec<u8>>,
        upper: Bound<Vec<u8>>,
        ascending: bool,
    ) -> Self {
        Self {
            store,
            lower,
            upper,
            ascending,
            buffer: VecDeque::with_capacity(CHUNK_SIZE),
            exhausted: false,
        }
    }

    /// Cursor over the whole keyspace
    pub fn full(store: &'a VersionedStore, ascending: bool) -> Self {
        Self::new(store, Bound::Unbounded, Bound::Unbounded, ascending)
    }

    /// Cursor over `[start, end)`
    pub fn range(store: &'a VersionedStore, start: &[u8], end: &[u8], ascending: bool) -> Self {
        Self::new(
            store,
            Bound::Included(start.to_vec()),
            Bound::Excluded(end.to_vec()),
            ascending,
        )
    }

    /// Cursor over keys beginning with `prefix`
    pub fn prefix(store: &'a VersionedStore, prefix: &[u8], ascending: bool) -> Self {
        let upper = match prefix_upper_bound(prefix) {
            Some(end) => Bound::Excluded(end),
            None => Bound::Unbounded,
        };
        Self::new(store, Bound::Included(prefix.to_vec()), upper, ascending)
    }

    fn refill(&mut self) {
        let chunk = self.store.scan(
            as_slice_bound(&self.lower),
            as_slice_bound(&self.upper),
            CHUNK_SIZE,
            self.ascending,
        );
        if chunk.len() < CHUNK_SIZE {
            self.exhausted = true;
        }
        if let Some((last, _)) = chunk.last() {
            let resume = Bound::Excluded(last.clone());
            if self.ascending {
                self.lower = resume;
            } else {
                self.upper = resume;
            }
        }
        self.buffer
            .extend(chunk.into_iter().map(|(key, sv)| Entry {
                key,
                value: sv.value,
                version: sv.version,
            }));
    }
}

impl Iterator for ScanCursor<'_> {
    type Item = Entry;

    fn next(&mut self) -> Option<Entry> {
        if self.buffer.is_empty() && !self.exhausted {
            self.refill();
        }
        self.buffer.pop_front()
    }
}

fn as_slice_bound(bound: &Bound<Vec<u8>>) -> Bound<&[u8]> {
    match bound {
        Bound::Included(k) => Bound::Included(k.as_slice()),
        Bound::Excluded(k) => Bound::Excluded(k.as_slice()),
        Bound::Unbounded => Bound::Unbounded,
    }
}
