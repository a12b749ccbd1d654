//! Append-only commit log
//!
//! Every committed write set is appended as one record, so the engine can
//! rebuild its state when a directory is reopened between benchmarks.
//!
//! # File Layout
//!
//! ```text
//! ┌────────────────────────────────────┐
//! │ Header (16 bytes)                  │
//! ├────────────────────────────────────┤
//! │ Record 1                           │
//! ├────────────────────────────────────┤
//! │ ...                                │
//! └────────────────────────────────────┘
//! ```
//!
//! # Record Layout
//!
//! ```text
//! ┌─────────────────┬─────────────────────────┬──────────┐
//! │ Length (4 bytes)│ Payload (variable)      │ CRC32 (4)│
//! └─────────────────┴─────────────────────────┴──────────┘
//!
//! Payload:
//! ┌──────────────┬──────────────────────────────────────────────┐
//! │ Count (4)    │ (KeyLen (4) Key ValueLen (4) Value) * Count  │
//! └──────────────┴──────────────────────────────────────────────┘
//! ```
//!
//! All integers are little-endian. Replay stops at the first torn or corrupt
//! record and truncates the file there.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Cursor, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use strata_core::{StrataError, StrataResult, SyncMode};

/// Magic bytes identifying a commit log: "SBLG"
pub const LOG_MAGIC: [u8; 4] = *b"SBLG";

/// Current log format version
pub const LOG_FORMAT_VERSION: u32 = 1;

/// Size of the file header in bytes
pub const LOG_HEADER_SIZE: u64 = 16;

/// Longest gap between fsyncs in partial sync mode
pub const PARTIAL_SYNC_INTERVAL: Duration = Duration::from_millis(100);

/// Upper bound on the in-process write buffer
const MAX_BUFFER_CAPACITY: usize = 8 * 1024 * 1024;

/// A committed write set: keys and values in commit order
pub type WriteSet = Vec<(Vec<u8>, Vec<u8>)>;

/// Outcome of replaying an existing log
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    /// Records applied
    pub records: u64,
    /// Individual key writes applied
    pub writes: u64,
    /// Bytes discarded from a torn or corrupt tail
    pub truncated_bytes: u64,
}

/// Writer for the commit log file
pub struct CommitLog {
    path: PathBuf,
    writer: BufWriter<File>,
    sync_mode: SyncMode,
    last_sync: Instant,
    size: u64,
    appends: u64,
    syncs: u64,
}

impl CommitLog {
    /// Open (or create) the log at `path`, replaying every intact record
    ///
    /// `replay` receives each write set in commit order before any new
    /// record can be appended.
    ///
    /// # Errors
    ///
    /// Returns `StrataError::Corruption` if the file exists but carries a
    /// foreign header.
    pub fn open<F>(
        path: &Path,
        sync_mode: SyncMode,
        buffer_capacity: usize,
        mut replay: F,
    ) -> StrataResult<(Self, ReplayStats)>
    where
        F: FnMut(WriteSet),
    {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;
        let file_len = file.metadata()?.len();

        let mut stats = ReplayStats::default();
        let valid_end = if file_len == 0 {
            write_header(&mut file)?;
            file.sync_all()?;
            LOG_HEADER_SIZE
        } else {
            read_header(&mut file, path)?;
            let end = replay_records(&mut file, file_len, &mut stats, &mut replay)?;
            if end < file_len {
                stats.truncated_bytes = file_len - end;
                warn!(
                    target: "strata::storage",
                    path = %path.display(),
                    valid_bytes = end,
                    discarded_bytes = stats.truncated_bytes,
                    "Commit log has a damaged tail, truncating"
                );
                file.set_len(end)?;
                file.sync_all()?;
            }
            end
        };

        file.seek(SeekFrom::Start(valid_end))?;
        let capacity = buffer_capacity.clamp(4096, MAX_BUFFER_CAPACITY);
        debug!(
            target: "strata::storage",
            path = %path.display(),
            records = stats.records,
            buffer = capacity,
            "Commit log opened"
        );

        Ok((
            Self {
                path: path.to_path_buf(),
                writer: BufWriter::with_capacity(capacity, file),
                sync_mode,
                last_sync: Instant::now(),
                size: valid_end,
                appends: 0,
                syncs: 0,
            },
            stats,
        ))
    }

    /// Append one committed write set, applying the sync policy
    pub fn append(&mut self, writes: &[(Vec<u8>, Vec<u8>)]) -> StrataResult<()> {
        let payload = encode_payload(writes)?;
        let len = u32::try_from(payload.len())
            .map_err(|_| StrataError::invalid_input("write set too large for one log record"))?;

        let mut hasher = crc32fast::Hasher::new();
        hasher.update(&payload);
        let crc = hasher.finalize();

        self.writer.write_u32::<LittleEndian>(len)?;
        self.writer.write_all(&payload)?;
        self.writer.write_u32::<LittleEndian>(crc)?;
        self.size += 8 + payload.len() as u64;
        self.appends += 1;

        match self.sync_mode {
            SyncMode::None => {}
            SyncMode::Partial => {
                self.writer.flush()?;
                if self.last_sync.elapsed() >= PARTIAL_SYNC_INTERVAL {
                    self.sync()?;
                }
            }
            SyncMode::Full => self.sync()?,
        }
        Ok(())
    }

    /// Flush buffered records and fsync the file
    pub fn sync(&mut self) -> StrataResult<()> {
        self.writer.flush()?;
        self.writer.get_ref().sync_data()?;
        self.last_sync = Instant::now();
        self.syncs += 1;
        Ok(())
    }

    /// Flush buffered records without fsync
    pub fn flush(&mut self) -> StrataResult<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Logical file size including buffered bytes
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Records appended since open
    pub fn appends(&self) -> u64 {
        self.appends
    }

    /// fsync calls since open
    pub fn syncs(&self) -> u64 {
        self.syncs
    }
}

impl Drop for CommitLog {
    fn drop(&mut self) {
        if let Err(e) = self.writer.flush() {
            warn!(
                target: "strata::storage",
                path = %self.path.display(),
                error = %e,
                "Failed to flush commit log on drop"
            );
        }
    }
}

fn write_header(file: &mut File) -> io::Result<()> {
    file.write_all(&LOG_MAGIC)?;
    file.write_u32::<LittleEndian>(LOG_FORMAT_VERSION)?;
    file.write_all(&[0u8; 8])?;
    Ok(())
}

fn read_header(file: &mut File, path: &Path) -> StrataResult<()> {
    let mut header = [0u8; LOG_HEADER_SIZE as usize];
    file.seek(SeekFrom::Start(0))?;
    if file.read_exact(&mut header).is_err() {
        return Err(StrataError::Corruption(format!(
            "{}: truncated log header",
            path.display()
        )));
    }
    if header[0..4] != LOG_MAGIC {
        return Err(StrataError::Corruption(format!(
            "{}: not a commit log (bad magic)",
            path.display()
        )));
    }
    let version = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);
    if version != LOG_FORMAT_VERSION {
        return Err(StrataError::Corruption(format!(
            "{}: unsupported log format version {}",
            path.display(),
            version
        )));
    }
    Ok(())
}

/// Replay records after the header, returning the offset of the first
/// byte that is not part of an intact record
fn replay_records<F>(
    file: &mut File,
    file_len: u64,
    stats: &mut ReplayStats,
    replay: &mut F,
) -> StrataResult<u64>
where
    F: FnMut(WriteSet),
{
    let mut reader = BufReader::new(&mut *file);
    reader.seek(SeekFrom::Start(LOG_HEADER_SIZE))?;
    let mut offset = LOG_HEADER_SIZE;

    loop {
        let remaining = file_len - offset;
        if remaining < 8 {
            return Ok(offset);
        }
        let len = reader.read_u32::<LittleEndian>()? as u64;
        if len + 8 > remaining {
            return Ok(offset);
        }

        let mut payload = vec![0u8; len as usize];
        reader.read_exact(&mut payload)?;
        let stored_crc = reader.read_u32::<LittleEndian>()?;

        let mut hasher = crc32fast::Hasher::new();
        hasher.update(&payload);
        if hasher.finalize() != stored_crc {
            return Ok(offset);
        }

        let writes = match decode_payload(&payload) {
            Some(writes) => writes,
            None => return Ok(offset),
        };
        stats.records += 1;
        stats.writes += writes.len() as u64;
        replay(writes);
        offset += len + 8;
    }
}

fn encode_payload(writes: &[(Vec<u8>, Vec<u8>)]) -> StrataResult<Vec<u8>> {
    let body: usize = writes.iter().map(|(k, v)| 8 + k.len() + v.len()).sum();
    let mut buf = Vec::with_capacity(4 + body);
    buf.write_u32::<LittleEndian>(checked_len(writes.len())?)?;
    for (key, value) in writes {
        buf.write_u32::<LittleEndian>(checked_len(key.len())?)?;
        buf.extend_from_slice(key);
        buf.write_u32::<LittleEndian>(checked_len(value.len())?)?;
        buf.extend_from_slice(value);
    }
    Ok(buf)
}

fn decode_payload(payload: &[u8]) -> Option<WriteSet> {
    let mut cursor = Cursor::new(payload);
    let count = cursor.read_u32::<LittleEndian>().ok()? as usize;
    // Each write needs at least its two length fields
    if count > payload.len() / 8 {
        return None;
    }
    let mut writes = Vec::with_capacity(count);
    for _ in 0..count {
        let key = read_bytes(&mut cursor)?;
        let value = read_bytes(&mut cursor)?;
        writes.push((key, value));
    }
    if cursor.position() as usize != payload.len() {
        return None;
    }
    Some(writes)
}

fn read_bytes(cursor: &mut Cursor<&[u8]>) -> Option<Vec<u8>> {
    let len = cursor.read_u32::<LittleEndian>().ok()? as usize;
    let start = cursor.position() as usize;
    let end = start.checked_add(len)?;
    let bytes = cursor.get_ref().get(start..end)?.to_vec();
    cursor.set_position(end as u64);
    Some(bytes)
}

fn checked_len(len: usize) -> StrataResult<u32> {
    u32::try_from(len).map_err(|_| StrataError::invalid_input("length exceeds u32 in log record"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn kv(k: &str, v: &str) -> (Vec<u8>, Vec<u8>) {
        (k.as_bytes().to_vec(), v.as_bytes().to_vec())
    }

    fn replay_all(path: &Path) -> (Vec<WriteSet>, ReplayStats) {
        let mut seen = Vec::new();
        let (_log, stats) =
            CommitLog::open(path, SyncMode::None, 4096, |ws| seen.push(ws)).unwrap();
        (seen, stats)
    }

    #[test]
    fn test_new_log_has_header_only() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("strata.log");
        let (log, stats) = CommitLog::open(&path, SyncMode::None, 4096, |_| {}).unwrap();
        assert_eq!(stats, ReplayStats::default());
        assert_eq!(log.size(), LOG_HEADER_SIZE);
        drop(log);
        assert_eq!(std::fs::metadata(&path).unwrap().len(), LOG_HEADER_SIZE);
    }

    #[test]
    fn test_records_replay_in_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("strata.log");
        {
            let (mut log, _) = CommitLog::open(&path, SyncMode::Full, 4096, |_| {}).unwrap();
            log.append(&[kv("a", "1"), kv("b", "2")]).unwrap();
            log.append(&[kv("a", "3")]).unwrap();
            assert_eq!(log.appends(), 2);
            assert_eq!(log.syncs(), 2);
        }

        let (seen, stats) = replay_all(&path);
        assert_eq!(stats.records, 2);
        assert_eq!(stats.writes, 3);
        assert_eq!(seen[0], vec![kv("a", "1"), kv("b", "2")]);
        assert_eq!(seen[1], vec![kv("a", "3")]);
    }

    #[test]
    fn test_unsynced_records_survive_clean_close() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("strata.log");
        {
            let (mut log, _) = CommitLog::open(&path, SyncMode::None, 1 << 20, |_| {}).unwrap();
            for i in 0..100 {
                log.append(&[kv(&format!("k{}", i), "v")]).unwrap();
            }
            assert_eq!(log.syncs(), 0);
        }
        let (_, stats) = replay_all(&path);
        assert_eq!(stats.records, 100);
    }

    #[test]
    fn test_torn_tail_is_truncated() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("strata.log");
        let intact_len = {
            let (mut log, _) = CommitLog::open(&path, SyncMode::Full, 4096, |_| {}).unwrap();
            log.append(&[kv("a", "1")]).unwrap();
            log.size()
        };

        // Half-written second record
        {
            let mut file = OpenOptions::new().append(true).open(&path).unwrap();
            file.write_all(&[200, 0, 0, 0, 1, 2, 3]).unwrap();
        }

        let (seen, stats) = replay_all(&path);
        assert_eq!(seen.len(), 1);
        assert_eq!(stats.truncated_bytes, 7);
        assert_eq!(std::fs::metadata(&path).unwrap().len(), intact_len);
    }

    #[test]
    fn test_crc_mismatch_stops_replay() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("strata.log");
        {
            let (mut log, _) = CommitLog::open(&path, SyncMode::Full, 4096, |_| {}).unwrap();
            log.append(&[kv("a", "1")]).unwrap();
            log.append(&[kv("b", "2")]).unwrap();
        }

        // Flip the last payload byte of the second record
        let mut bytes = std::fs::read(&path).unwrap();
        let idx = bytes.len() - 5;
        bytes[idx] ^= 0xFF;
        std::fs::write(&path, &bytes).unwrap();

        let (seen, stats) = replay_all(&path);
        assert_eq!(seen, vec![vec![kv("a", "1")]]);
        assert!(stats.truncated_bytes > 0);
    }

    #[test]
    fn test_foreign_file_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("strata.log");
        std::fs::write(&path, b"definitely not a commit log").unwrap();
        let err = CommitLog::open(&path, SyncMode::None, 4096, |_| {}).err().unwrap();
        assert!(matches!(err, StrataError::Corruption(_)));
    }

    #[test]
    fn test_append_after_replay_continues_log() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("strata.log");
        {
            let (mut log, _) = CommitLog::open(&path, SyncMode::None, 4096, |_| {}).unwrap();
            log.append(&[kv("a", "1")]).unwrap();
        }
        {
            let (mut log, stats) = CommitLog::open(&path, SyncMode::None, 4096, |_| {}).unwrap();
            assert_eq!(stats.records, 1);
            log.append(&[kv("b", "2")]).unwrap();
        }
        let (seen, _) = replay_all(&path);
        assert_eq!(seen, vec![vec![kv("a", "1")], vec![kv("b", "2")]]);
    }

    #[test]
    fn test_decode_rejects_trailing_garbage() {
        let mut payload = encode_payload(&[kv("k", "v")]).unwrap();
        assert!(decode_payload(&payload).is_some());
        payload.push(0);
        assert!(decode_payload(&payload).is_none());
    }
}
