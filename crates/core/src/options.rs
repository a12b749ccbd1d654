//! Engine open options
//!
//! `EngineOptions` is the connection half of a benchmark configuration: the
//! parameters handed to `Engine::open` for every run.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::StrataError;

/// Durability level for committed writes
///
/// | Mode | fsync | Data Loss Window |
/// |------|-------|-----------------|
/// | None | Never (flush on close) | Everything since open |
/// | Partial | Periodic | Up to the sync interval |
/// | Full | Every commit | Zero |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncMode {
    /// Never fsync during the run
    #[default]
    None,
    /// Flush every commit, fsync at most once per interval
    Partial,
    /// fsync after every commit
    Full,
}

impl SyncMode {
    /// Name accepted on the command line and in config files
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncMode::None => "none",
            SyncMode::Partial => "partial",
            SyncMode::Full => "full",
        }
    }
}

impl fmt::Display for SyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SyncMode {
    type Err = StrataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(SyncMode::None),
            "partial" => Ok(SyncMode::Partial),
            "full" => Ok(SyncMode::Full),
            other => Err(StrataError::config(format!(
                "invalid sync option '{}'. Expected \"none\", \"partial\" or \"full\".",
                other
            ))),
        }
    }
}

/// Parameters for opening an engine handle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineOptions {
    /// Data directory
    pub directory: PathBuf,
    /// Write buffer size in bytes
    pub write_buffer_size: u64,
    /// Commit durability
    pub sync_mode: SyncMode,
    /// Number of LSM levels
    pub level_count: usize,
    /// Bloom filters on table lookups
    pub bloom_filter: bool,
    /// Maximum concurrent compactions
    pub max_compaction_concurrency: usize,
}

impl EngineOptions {
    /// Options for `directory` with default tuning
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            write_buffer_size: 64 * 1024 * 1024,
            sync_mode: SyncMode::None,
            level_count: 7,
            bloom_filter: true,
            max_compaction_concurrency: 4,
        }
    }

    /// Override the durability level
    pub fn sync_mode(mut self, sync_mode: SyncMode) -> Self {
        self.sync_mode = sync_mode;
        self
    }

    /// Override the write buffer size
    pub fn write_buffer_size(mut self, bytes: u64) -> Self {
        self.write_buffer_size = bytes;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_mode_parse() {
        assert_eq!("none".parse::<SyncMode>().unwrap(), SyncMode::None);
        assert_eq!("Partial".parse::<SyncMode>().unwrap(), SyncMode::Partial);
        assert_eq!(" FULL ".parse::<SyncMode>().unwrap(), SyncMode::Full);
    }

    #[test]
    fn test_sync_mode_invalid_is_fatal() {
        let err = "sometimes".parse::<SyncMode>().unwrap_err();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("sometimes"));
    }

    #[test]
    fn test_sync_mode_round_trips_display() {
        for mode in [SyncMode::None, SyncMode::Partial, SyncMode::Full] {
            assert_eq!(mode.to_string().parse::<SyncMode>().unwrap(), mode);
        }
    }

    #[test]
    fn test_sync_mode_deserializes_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            sync: SyncMode,
        }
        let w: Wrapper = toml::from_str("sync = \"partial\"").unwrap();
        assert_eq!(w.sync, SyncMode::Partial);
    }

    #[test]
    fn test_engine_options_defaults() {
        let opts = EngineOptions::new("/tmp/x");
        assert_eq!(opts.write_buffer_size, 64 * 1024 * 1024);
        assert_eq!(opts.sync_mode, SyncMode::None);
        assert_eq!(opts.level_count, 7);
        assert!(opts.bloom_filter);
        assert_eq!(opts.max_compaction_concurrency, 4);
    }
}
