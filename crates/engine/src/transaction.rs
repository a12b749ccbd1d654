//! Transactions borrowed from a [`KvEngine`]

use strata_concurrency::TransactionContext;
use strata_core::{StrataError, StrataResult, Transaction};
use strata_storage::ScanCursor;

use crate::engine::KvEngine;

/// An OCC transaction against a [`KvEngine`]
///
/// `get` sees this transaction's own buffered writes. Iterators walk the
/// committed keyspace only.
pub struct KvTransaction<'a> {
    engine: &'a KvEngine,
    ctx: TransactionContext,
}

impl<'a> KvTransaction<'a> {
    pub(crate) fn new(engine: &'a KvEngine, ctx: TransactionContext) -> Self {
        Self { engine, ctx }
    }

    fn cursor_store(&self) -> StrataResult<&'a strata_storage::VersionedStore> {
        self.ctx.ensure_active()?;
        let engine: &'a KvEngine = self.engine;
        Ok(engine.store())
    }
}

impl<'a> Transaction for KvTransaction<'a> {
    type Iter<'b> = ScanCursor<'b> where Self: 'b;

    fn get(&mut self, key: &[u8]) -> StrataResult<Vec<u8>> {
        self.ctx
            .get(key, self.engine.store())?
            .ok_or(StrataError::KeyNotFound)
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> StrataResult<()> {
        self.ctx.put(key, value)
    }

    fn commit(mut self) -> StrataResult<()> {
        self.engine
            .manager()
            .commit(&mut self.ctx, self.engine.store())
            .map(|_| ())
    }

    fn rollback(mut self) -> StrataResult<()> {
        if !self.ctx.is_active() {
            return Ok(());
        }
        self.engine.manager().abort(&mut self.ctx, "rolled back")
    }

    fn iter(&mut self, ascending: bool) -> StrataResult<Self::Iter<'_>> {
        Ok(ScanCursor::full(self.cursor_store()?, ascending))
    }

    fn range_iter(
        &mut self,
        start: &[u8],
        end: &[u8],
        ascending: bool,
    ) -> StrataResult<Self::Iter<'_>> {
        Ok(ScanCursor::range(self.cursor_store()?, start, end, ascending))
    }

    fn prefix_iter(&mut self, prefix: &[u8], ascending: bool) -> StrataResult<Self::Iter<'_>> {
        Ok(ScanCursor::prefix(self.cursor_store()?, prefix, ascending))
    }
}
