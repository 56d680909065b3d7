//! Journal Recovery
//!
//! Reads back a journal after a restart or crash.

use std::fs::{self, OpenOptions};
use std::path::Path;

use crate::error::{KeeperError, Result};

use super::JournalEntry;

/// Handles journal replay
pub struct JournalRecovery;

/// Result of a recovery operation
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecoveryResult {
    /// Number of entries successfully recovered
    pub entries_recovered: u64,

    /// Number of corrupted entries found (recovery stops at the first)
    pub entries_corrupted: u64,

    /// Last valid LSN (0 when the journal is empty)
    pub last_lsn: u64,

    /// Bytes past the last valid entry
    pub trailing_bytes: u64,

    /// Whether the journal was truncated (torn or corrupt tail removed)
    pub was_truncated: bool,
}

impl JournalRecovery {
    /// Recover entries from a journal file.
    ///
    /// This will:
    /// 1. Read all valid entries in order
    /// 2. Stop at the first torn or corrupted entry
    /// 3. Truncate the file to the end of the last valid entry
    ///
    /// A missing file recovers as empty.
    pub fn recover(path: &Path) -> Result<(Vec<JournalEntry>, RecoveryResult)> {
        if !path.exists() {
            return Ok((Vec::new(), RecoveryResult::default()));
        }

        let (entries, valid_len, mut result) = Self::scan(path)?;

        if result.trailing_bytes > 0 {
            tracing::warn!(
                path = %path.display(),
                trailing_bytes = result.trailing_bytes,
                corrupted = result.entries_corrupted,
                "Truncating journal tail"
            );
            let file = OpenOptions::new().write(true).open(path)?;
            file.set_len(valid_len as u64)?;
            file.sync_all()?;
            result.was_truncated = true;
        }

        Ok((entries, result))
    }

    /// Verify integrity of a journal file without modifying it
    pub fn verify(path: &Path) -> Result<RecoveryResult> {
        let (_, _, result) = Self::scan(path)?;
        Ok(result)
    }

    fn scan(path: &Path) -> Result<(Vec<JournalEntry>, usize, RecoveryResult)> {
        let bytes = fs::read(path)?;
        let mut entries = Vec::new();
        let mut result = RecoveryResult::default();
        let mut pos = 0;

        while pos < bytes.len() {
            match JournalEntry::decode(&bytes[pos..]) {
                Ok(Some((entry, consumed))) => {
                    if entry.lsn <= result.last_lsn && result.entries_recovered > 0 {
                        tracing::warn!(lsn = entry.lsn, "Out-of-order LSN in journal");
                        result.entries_corrupted += 1;
                        break;
                    }
                    result.last_lsn = entry.lsn;
                    result.entries_recovered += 1;
                    entries.push(entry);
                    pos += consumed;
                }
                // Torn write at the tail
                Ok(None) => break,
                Err(KeeperError::JournalCorruption(reason)) => {
                    tracing::warn!(offset = pos, %reason, "Corrupted journal entry");
                    result.entries_corrupted += 1;
                    break;
                }
                Err(e) => return Err(e),
            }
        }

        result.trailing_bytes = (bytes.len() - pos) as u64;
        Ok((entries, pos, result))
    }
}
