//! Store Module
//!
//! The record store the query engine reads from and mutations write to.
//!
//! ## Responsibilities
//! - Assign immutable ids on insert
//! - Update-by-id and delete-by-id
//! - Full scan, optionally sorted
//! - Bound every round trip by a caller-supplied [`Deadline`]
//!
//! ## Consistency
//! A scan never observes a half-applied mutation, and a mutation that
//! returned `Ok` is visible to every scan that starts afterwards.

pub mod journal;
mod memory;

pub use memory::MemoryStore;

use std::time::{Duration, Instant};

use crate::error::{KeeperError, Result};
use crate::query::SortKey;
use crate::record::{Fields, Record, RecordId};

/// Interface the query engine and mutation paths use to reach records
pub trait RecordStore: Send + Sync {
    /// Store a new record; the store assigns its id
    fn insert(&self, fields: Fields, deadline: Deadline) -> Result<Record>;

    /// Set `fields` on the record with `id`, returning the updated record,
    /// or `None` when no such record exists
    fn find_and_modify(
        &self,
        id: RecordId,
        fields: &Fields,
        deadline: Deadline,
    ) -> Result<Option<Record>>;

    /// Delete by id; `false` when no such record exists
    fn remove(&self, id: RecordId, deadline: Deadline) -> Result<bool>;

    /// Every record, ordered by `sort` when given, by id otherwise
    fn find_all_sorted(&self, sort: Option<&SortKey>, deadline: Deadline) -> Result<Vec<Record>>;

    /// Number of stored records
    fn count_all(&self, deadline: Deadline) -> Result<usize> {
        Ok(self.find_all_sorted(None, deadline)?.len())
    }

    /// Flush anything buffered; called once at shutdown
    fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// Point in time by which a store round trip must complete
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    at: Instant,
    budget: Duration,
}

impl Deadline {
    /// A deadline `budget` from now
    pub fn after(budget: Duration) -> Self {
        Self {
            at: Instant::now() + budget,
            budget,
        }
    }

    pub fn after_ms(ms: u64) -> Self {
        Self::after(Duration::from_millis(ms))
    }

    /// Time left, zero once passed
    pub fn remaining(&self) -> Duration {
        self.at.saturating_duration_since(Instant::now())
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.at
    }

    /// The error surfaced when this deadline passes
    pub fn timeout_error(&self) -> KeeperError {
        KeeperError::StoreTimeout(self.budget.as_millis() as u64)
    }
}
