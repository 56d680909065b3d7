//! Journal Writer
//!
//! Handles appending entries to the journal file.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::JournalSyncStrategy;
use crate::error::{KeeperError, Result};

use super::{JournalEntry, Operation};

/// Appends entries to the journal file
///
/// Frames go straight to the file with no user-space buffer. A failed
/// append truncates the file back to its previous length, so a caller that
/// saw an error never finds the entry replayed later.
pub struct JournalWriter {
    path: PathBuf,
    file: File,
    /// File length after the last successful append
    len: u64,
    /// LSN the next append will use
    next_lsn: u64,
    sync_strategy: JournalSyncStrategy,
    /// Entries written since the last fsync
    unsynced: usize,
    /// Set when a rollback failed; the tail of the file is unknown
    poisoned: bool,
}

impl JournalWriter {
    /// Open or create a journal file for appending.
    ///
    /// `next_lsn` continues the sequence found during recovery.
    pub fn open(path: &Path, sync_strategy: JournalSyncStrategy, next_lsn: u64) -> Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let len = file.metadata()?.len();

        Ok(Self {
            path: path.to_path_buf(),
            file,
            len,
            next_lsn,
            sync_strategy,
            unsynced: 0,
            poisoned: false,
        })
    }

    /// Append an operation, returning its LSN.
    ///
    /// The entry is written to the OS before returning; fsync follows the
    /// configured strategy. On error nothing of the entry remains in the
    /// file and the LSN is not consumed.
    pub fn append(&mut self, operation: Operation) -> Result<u64> {
        if self.poisoned {
            return Err(KeeperError::Store(format!(
                "journal {} is unusable after a failed rollback; reopen the store",
                self.path.display()
            )));
        }

        let lsn = self.next_lsn;
        let frame = JournalEntry::new(lsn, operation).encode()?;
        let sync_due = match self.sync_strategy {
            JournalSyncStrategy::EveryWrite => true,
            JournalSyncStrategy::EveryNEntries { count } => self.unsynced + 1 >= count.max(1),
        };

        if let Err(e) = self.write_frame(&frame, sync_due) {
            self.rollback();
            return Err(e);
        }

        self.len += frame.len() as u64;
        self.next_lsn += 1;
        self.unsynced = if sync_due { 0 } else { self.unsynced + 1 };
        Ok(lsn)
    }

    fn write_frame(&mut self, frame: &[u8], sync: bool) -> Result<()> {
        self.file.write_all(frame)?;
        if sync {
            self.file.sync_data()?;
        }
        Ok(())
    }

    /// Cut the file back to the last successful append
    fn rollback(&mut self) {
        if let Err(e) = self.file.set_len(self.len) {
            tracing::error!(
                path = %self.path.display(),
                len = self.len,
                error = %e,
                "Journal rollback failed; refusing further appends"
            );
            self.poisoned = true;
        }
    }

    /// Force sync to disk
    pub fn sync(&mut self) -> Result<()> {
        self.file.sync_data()?;
        self.unsynced = 0;
        Ok(())
    }

    /// LSN the next append will receive
    pub fn next_lsn(&self) -> u64 {
        self.next_lsn
    }
}
