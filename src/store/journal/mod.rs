//! Record Journal Module
//!
//! Append-only log of store mutations, replayed on open so an in-process
//! store survives restarts.
//!
//! ## Responsibilities
//! - Append every mutation before it becomes visible in memory
//! - CRC32 checksums for corruption detection
//! - Log Sequence Numbers (LSN) for ordering
//! - Replay on startup, truncating a torn tail
//!
//! ## File Format
//! ```text
//! ┌─────────────────────────────────────────┐
//! │ Entry 1                                 │
//! │ ┌─────────┬─────────┬────────┬────────┐ │
//! │ │ LSN (8) │ CRC (4) │Len (4) │ Data   │ │
//! │ └─────────┴─────────┴────────┴────────┘ │
//! ├─────────────────────────────────────────┤
//! │ Entry 2 ...                             │
//! └─────────────────────────────────────────┘
//! ```
//! All integers little-endian. `Data` is the bincode-encoded entry; the CRC
//! covers `Data` only.

mod entry;
mod recovery;
mod writer;

pub use entry::{JournalEntry, Operation, HEADER_SIZE, MAX_ENTRY_SIZE};
pub use recovery::{JournalRecovery, RecoveryResult};
pub use writer::JournalWriter;
