//! In-memory record store
//!
//! BTreeMap keyed by id behind a parking_lot RwLock, with an optional
//! journal for durability.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::config::{Config, JournalSyncStrategy};
use crate::error::Result;
use crate::query::{sort_records, SortKey};
use crate::record::{Fields, Record, RecordId};

use super::journal::{JournalRecovery, JournalWriter, Operation};
use super::{Deadline, RecordStore};

/// Everything guarded by the store lock
struct StoreState {
    records: BTreeMap<RecordId, Record>,

    /// Id the next insert receives; never reused, even after removal
    next_id: RecordId,

    /// Present when the store is durable
    journal: Option<JournalWriter>,
}

/// Record store held in memory
///
/// ## Concurrency
/// - Scans take the read lock and clone a snapshot, so they never observe a
///   half-applied mutation
/// - Mutations take the write lock, journal first, then apply in memory
/// - Lock acquisition waits at most until the caller's deadline
pub struct MemoryStore {
    state: RwLock<StoreState>,
    journal_path: Option<PathBuf>,
}

impl MemoryStore {
    const JOURNAL_FILENAME: &'static str = "records.journal";

    /// A volatile store with no journal
    pub fn new() -> Self {
        Self {
            state: RwLock::new(StoreState {
                records: BTreeMap::new(),
                next_id: RecordId::new(1),
                journal: None,
            }),
            journal_path: None,
        }
    }

    /// Open a store according to config.
    ///
    /// With `data_dir` set, replays `{data_dir}/records.journal` and keeps
    /// appending to it; otherwise the store is volatile.
    pub fn open(config: &Config) -> Result<Self> {
        match &config.data_dir {
            Some(dir) => Self::open_durable(dir, config.journal_sync_strategy),
            None => Ok(Self::new()),
        }
    }

    /// Open a journaled store in `dir`
    pub fn open_durable(dir: &Path, sync_strategy: JournalSyncStrategy) -> Result<Self> {
        fs::create_dir_all(dir)?;
        let path = dir.join(Self::JOURNAL_FILENAME);

        let (entries, recovery) = JournalRecovery::recover(&path)?;
        if recovery.entries_recovered > 0 || recovery.entries_corrupted > 0 {
            tracing::info!(
                recovered = recovery.entries_recovered,
                corrupted = recovery.entries_corrupted,
                last_lsn = recovery.last_lsn,
                truncated = recovery.was_truncated,
                "Journal replay"
            );
        }

        let mut records = BTreeMap::new();
        let mut next_id = RecordId::new(1);
        for entry in entries {
            match entry.operation {
                Operation::Insert { record } => {
                    if record.id() >= next_id {
                        next_id = record.id().next();
                    }
                    records.insert(record.id(), record);
                }
                Operation::Update { id, fields } => {
                    if let Some(record) = records.get_mut(&id) {
                        for (name, value) in fields {
                            record.set(name, value);
                        }
                    }
                }
                Operation::Remove { id } => {
                    records.remove(&id);
                }
            }
        }

        let journal = JournalWriter::open(&path, sync_strategy, recovery.last_lsn + 1)?;

        Ok(Self {
            state: RwLock::new(StoreState {
                records,
                next_id,
                journal: Some(journal),
            }),
            journal_path: Some(path),
        })
    }

    /// Path of the journal file, for durable stores
    pub fn journal_path(&self) -> Option<&Path> {
        self.journal_path.as_deref()
    }

    pub fn is_durable(&self) -> bool {
        self.journal_path.is_some()
    }

    fn read(&self, deadline: Deadline) -> Result<RwLockReadGuard<'_, StoreState>> {
        self.state
            .try_read_for(deadline.remaining())
            .ok_or_else(|| deadline.timeout_error())
    }

    fn write(&self, deadline: Deadline) -> Result<RwLockWriteGuard<'_, StoreState>> {
        self.state
            .try_write_for(deadline.remaining())
            .ok_or_else(|| deadline.timeout_error())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreState {
    fn log(&mut self, operation: Operation) -> Result<()> {
        if let Some(journal) = self.journal.as_mut() {
            journal.append(operation)?;
        }
        Ok(())
    }
}

impl RecordStore for MemoryStore {
    fn insert(&self, fields: Fields, deadline: Deadline) -> Result<Record> {
        let mut state = self.write(deadline)?;

        let record = Record::new(state.next_id, fields);
        state.log(Operation::Insert {
            record: record.clone(),
        })?;

        state.next_id = record.id().next();
        state.records.insert(record.id(), record.clone());
        Ok(record)
    }

    fn find_and_modify(
        &self,
        id: RecordId,
        fields: &Fields,
        deadline: Deadline,
    ) -> Result<Option<Record>> {
        let mut state = self.write(deadline)?;

        if !state.records.contains_key(&id) {
            return Ok(None);
        }
        if fields.is_empty() {
            return Ok(state.records.get(&id).cloned());
        }
        state.log(Operation::Update {
            id,
            fields: fields.clone(),
        })?;

        let Some(record) = state.records.get_mut(&id) else {
            return Ok(None);
        };
        for (name, value) in fields {
            record.set(name.clone(), value.clone());
        }
        Ok(Some(record.clone()))
    }

    fn remove(&self, id: RecordId, deadline: Deadline) -> Result<bool> {
        let mut state = self.write(deadline)?;

        if !state.records.contains_key(&id) {
            return Ok(false);
        }
        state.log(Operation::Remove { id })?;
        state.records.remove(&id);
        Ok(true)
    }

    fn find_all_sorted(&self, sort: Option<&SortKey>, deadline: Deadline) -> Result<Vec<Record>> {
        let mut records: Vec<Record> = {
            let state = self.read(deadline)?;
            state.records.values().cloned().collect()
        };

        // Sorting happens outside the lock; the snapshot is already private
        if let Some(key) = sort {
            sort_records(&mut records, key);
        }
        Ok(records)
    }

    fn count_all(&self, deadline: Deadline) -> Result<usize> {
        Ok(self.read(deadline)?.records.len())
    }

    fn close(&self) -> Result<()> {
        let mut state = self.state.write();
        if let Some(journal) = state.journal.as_mut() {
            journal.sync()?;
        }
        Ok(())
    }
}
