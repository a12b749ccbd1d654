//! The benchmark catalogue
//!
//! Each [`Workload`] variant names one runner. Parsing a name that is not
//! in the catalogue is a fatal configuration error.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use strata_core::{Engine, StrataError};

use crate::runners::{contention, fill, read, scan, txn, RunContext};

/// One benchmark kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "&'static str")]
pub enum Workload {
    /// Sequential-key single writes
    FillSeq,
    /// Single writes with rotating key prefixes
    FillPrefixed,
    /// Single writes in a seeded shuffled order
    FillRandom,
    /// Sequential point reads over the existing keys
    ReadSeq,
    /// Scattered point reads over the existing keys
    ReadRandom,
    /// Point reads of keys that do not exist
    ReadMissing,
    /// Reader and writer pools running together
    ReadWhileWriting,
    /// Reads and writes mixed by `read_ratio`
    MixedWorkload,
    /// One full ordered scan
    IterSeq,
    /// Bounded range scans
    IterRandom,
    /// Prefix scans
    IterPrefix,
    /// One explicit transaction per write
    ConcurrentWriters,
    /// Small multi-write transactions
    ConcurrentTransactions,
    /// Writers crowded onto a quarter of the key space
    HighContentionWrites,
    /// Large multi-write transactions
    BatchConcurrentWrites,
    /// Read-then-write on ten shared keys
    TransactionConflicts,
    /// 70/30 read/write mix
    ConcurrentReadWrite,
    /// Read-modify-write on three keys
    HeavyContention,
}

impl Workload {
    /// Every workload, in catalogue order
    pub const ALL: [Workload; 18] = [
        Workload::FillSeq,
        Workload::FillPrefixed,
        Workload::FillRandom,
        Workload::ReadSeq,
        Workload::ReadRandom,
        Workload::ReadMissing,
        Workload::ReadWhileWriting,
        Workload::MixedWorkload,
        Workload::IterSeq,
        Workload::IterRandom,
        Workload::IterPrefix,
        Workload::ConcurrentWriters,
        Workload::ConcurrentTransactions,
        Workload::HighContentionWrites,
        Workload::BatchConcurrentWrites,
        Workload::TransactionConflicts,
        Workload::ConcurrentReadWrite,
        Workload::HeavyContention,
    ];

    /// Name used on the command line and in results
    pub fn name(&self) -> &'static str {
        match self {
            Workload::FillSeq => "fillseq",
            Workload::FillPrefixed => "fillprefixed",
            Workload::FillRandom => "fillrandom",
            Workload::ReadSeq => "readseq",
            Workload::ReadRandom => "readrandom",
            Workload::ReadMissing => "readmissing",
            Workload::ReadWhileWriting => "readwhilewriting",
            Workload::MixedWorkload => "mixedworkload",
            Workload::IterSeq => "iterseq",
            Workload::IterRandom => "iterrandom",
            Workload::IterPrefix => "iterprefix",
            Workload::ConcurrentWriters => "concurrent_writers",
            Workload::ConcurrentTransactions => "concurrent_transactions",
            Workload::HighContentionWrites => "high_contention_writes",
            Workload::BatchConcurrentWrites => "batch_concurrent_writes",
            Workload::TransactionConflicts => "transaction_conflicts",
            Workload::ConcurrentReadWrite => "concurrent_read_write",
            Workload::HeavyContention => "heavy_contention",
        }
    }

    /// One-line summary for listings
    pub fn description(&self) -> &'static str {
        match self {
            Workload::FillSeq => "write keys in index order",
            Workload::FillPrefixed => "write keys under rotating prefixes",
            Workload::FillRandom => "write every key once in a seeded random order",
            Workload::ReadSeq => "read existing keys in index order",
            Workload::ReadRandom => "read existing keys in scattered order",
            Workload::ReadMissing => "read keys that were never written",
            Workload::ReadWhileWriting => "separate reader and writer pools at once",
            Workload::MixedWorkload => "reads and writes split by --read_ratio",
            Workload::IterSeq => "one full ordered scan",
            Workload::IterRandom => "bounded range scans",
            Workload::IterPrefix => "prefix scans over the fill prefixes",
            Workload::ConcurrentWriters => "one explicit transaction per write",
            Workload::ConcurrentTransactions => "multi-write transactions (default batch 10)",
            Workload::HighContentionWrites => "writers share a quarter of the keys",
            Workload::BatchConcurrentWrites => "multi-write transactions (default batch 100)",
            Workload::TransactionConflicts => "read-then-write on ten shared keys",
            Workload::ConcurrentReadWrite => "70% reads, 30% explicit writes",
            Workload::HeavyContention => "read-modify-write on three keys",
        }
    }

    /// True for the scan benchmarks, whose op count is not the budget
    pub fn is_iterator(&self) -> bool {
        matches!(
            self,
            Workload::IterSeq | Workload::IterRandom | Workload::IterPrefix
        )
    }

    /// True for benchmarks that count operations in whole batches
    pub fn is_batched(&self) -> bool {
        matches!(
            self,
            Workload::ConcurrentTransactions | Workload::BatchConcurrentWrites
        )
    }

    /// Run this workload to completion against `engine`
    pub fn run<E: Engine>(&self, engine: &E, ctx: &RunContext<'_>) {
        match self {
            Workload::FillSeq => fill::fill_seq(engine, ctx),
            Workload::FillPrefixed => fill::fill_prefixed(engine, ctx),
            Workload::FillRandom => fill::fill_random(engine, ctx),
            Workload::ReadSeq => read::read_seq(engine, ctx),
            Workload::ReadRandom => read::read_random(engine, ctx),
            Workload::ReadMissing => read::read_missing(engine, ctx),
            Workload::ReadWhileWriting => read::read_while_writing(engine, ctx),
            Workload::MixedWorkload => read::mixed_workload(engine, ctx),
            Workload::IterSeq => scan::iter_seq(engine, ctx),
            Workload::IterRandom => scan::iter_random(engine, ctx),
            Workload::IterPrefix => scan::iter_prefix(engine, ctx),
            Workload::ConcurrentWriters => txn::concurrent_writers(engine, ctx),
            Workload::ConcurrentTransactions => txn::concurrent_transactions(engine, ctx),
            Workload::HighContentionWrites => contention::high_contention_writes(engine, ctx),
            Workload::BatchConcurrentWrites => txn::batch_concurrent_writes(engine, ctx),
            Workload::TransactionConflicts => contention::transaction_conflicts(engine, ctx),
            Workload::ConcurrentReadWrite => contention::concurrent_read_write(engine, ctx),
            Workload::HeavyContention => contention::heavy_contention(engine, ctx),
        }
    }
}

impl From<Workload> for &'static str {
    fn from(w: Workload) -> Self {
        w.name()
    }
}

impl fmt::Display for Workload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Workload {
    type Err = StrataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Workload::ALL
            .iter()
            .find(|w| w.name() == name)
            .copied()
            .ok_or_else(|| StrataError::UnknownBenchmark(name.to_string()))
    }
}
