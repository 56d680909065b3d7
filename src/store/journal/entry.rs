//! Journal entry definitions
//!
//! Defines the structure of individual journal entries and their framing.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::{KeeperError, Result};
use crate::record::{Fields, Record, RecordId};

/// Frame header: LSN (8) + CRC (4) + payload length (4)
pub const HEADER_SIZE: usize = 16;

/// Largest payload accepted when decoding (64 MB)
pub const MAX_ENTRY_SIZE: u32 = 64 * 1024 * 1024;

/// A single entry in the journal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Log Sequence Number - monotonically increasing
    pub lsn: u64,

    /// The mutation to replay
    pub operation: Operation,

    /// Timestamp (unix millis) when entry was created
    pub timestamp: u64,
}

/// Mutations that can be journaled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operation {
    /// A new record, with its assigned id
    Insert { record: Record },

    /// Set the given fields on an existing record
    Update { id: RecordId, fields: Fields },

    /// Remove a record
    Remove { id: RecordId },
}

impl JournalEntry {
    pub fn new(lsn: u64, operation: Operation) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Self {
            lsn,
            operation,
            timestamp,
        }
    }

    /// Encode into a framed byte buffer
    pub fn encode(&self) -> Result<Vec<u8>> {
        let payload = bincode::serialize(self)?;
        if payload.len() > MAX_ENTRY_SIZE as usize {
            return Err(KeeperError::Store(format!(
                "Journal entry too large: {} bytes (max {})",
                payload.len(),
                MAX_ENTRY_SIZE
            )));
        }

        let mut frame = Vec::with_capacity(HEADER_SIZE + payload.len());
        frame.extend_from_slice(&self.lsn.to_le_bytes());
        frame.extend_from_slice(&crc32fast::hash(&payload).to_le_bytes());
        frame.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        frame.extend_from_slice(&payload);
        Ok(frame)
    }

    /// Decode one framed entry from the front of `bytes`.
    ///
    /// Returns `Ok(None)` when `bytes` holds only part of a frame (a torn
    /// write), `Err(JournalCorruption)` when a complete frame fails its checks,
    /// and otherwise the entry plus the number of bytes consumed.
    pub fn decode(bytes: &[u8]) -> Result<Option<(Self, usize)>> {
        if bytes.len() < HEADER_SIZE {
            return Ok(None);
        }

        let lsn = u64::from_le_bytes(read_array(&bytes[0..8]));
        let crc = u32::from_le_bytes(read_array(&bytes[8..12]));
        let len = u32::from_le_bytes(read_array(&bytes[12..16]));

        if len > MAX_ENTRY_SIZE {
            return Err(KeeperError::JournalCorruption(format!(
                "Entry at LSN {} claims {} bytes (max {})",
                lsn, len, MAX_ENTRY_SIZE
            )));
        }

        let total = HEADER_SIZE + len as usize;
        if bytes.len() < total {
            return Ok(None);
        }

        let payload = &bytes[HEADER_SIZE..total];
        if crc32fast::hash(payload) != crc {
            return Err(KeeperError::JournalCorruption(format!(
                "CRC mismatch at LSN {}",
                lsn
            )));
        }

        let entry: JournalEntry = bincode::deserialize(payload).map_err(|e| {
            KeeperError::JournalCorruption(format!("Undecodable entry at LSN {}: {}", lsn, e))
        })?;
        if entry.lsn != lsn {
            return Err(KeeperError::JournalCorruption(format!(
                "Header LSN {} does not match entry LSN {}",
                lsn, entry.lsn
            )));
        }

        Ok(Some((entry, total)))
    }
}

fn read_array<const N: usize>(slice: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(slice);
    out
}
