//! Query Engine
//!
//! Orchestrates sort → filter → paginate over the record store, and passes
//! mutations through to it.
//!
//! ## Responsibilities
//! - One store round trip per call, bounded by the configured timeout
//! - Filter through [`FilterMatcher`] when a pattern is given
//! - Slice the page window; out-of-range pages are empty, never errors
//! - Restrict updates to the mutable client fields
//!
//! The engine keeps no state between calls beyond the injected store handle
//! and its limits, so one instance serves any number of threads.

use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::error::{KeeperError, Result};
use crate::record::{ClientUpdate, Fields, Record, RecordId};
use crate::store::{Deadline, RecordStore};

use super::matcher::DEFAULT_REGEX_SIZE_LIMIT;
use super::page::paginate;
use super::{CancelToken, FilterMatcher, PageRequest};

/// Bounds applied to every call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryLimits {
    /// Compiled filter pattern size limit (bytes)
    pub regex_size_limit: usize,

    /// Upper bound on one store round trip
    pub store_timeout: Duration,
}

impl Default for QueryLimits {
    fn default() -> Self {
        Self {
            regex_size_limit: DEFAULT_REGEX_SIZE_LIMIT,
            store_timeout: Duration::from_millis(2000),
        }
    }
}

impl From<&Config> for QueryLimits {
    fn from(config: &Config) -> Self {
        Self {
            regex_size_limit: config.regex_size_limit,
            store_timeout: config.store_timeout(),
        }
    }
}

/// Outcome of a successful removal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Removed {
    pub id: RecordId,
}

/// The query engine
pub struct QueryEngine<S: ?Sized = dyn RecordStore> {
    store: Arc<S>,
    limits: QueryLimits,
}

impl<S: RecordStore + ?Sized> QueryEngine<S> {
    /// Build an engine over an already-open store
    pub fn new(store: Arc<S>, limits: QueryLimits) -> Self {
        Self { store, limits }
    }

    fn deadline(&self) -> Deadline {
        Deadline::after(self.limits.store_timeout)
    }

    fn compile(&self, filter: &str) -> Result<FilterMatcher> {
        FilterMatcher::with_size_limit(filter, self.limits.regex_size_limit)
    }

    /// Fetch one page of records.
    ///
    /// Steps:
    /// 1. Scan the store sorted by the request's key
    /// 2. Filter when the pattern is non-empty
    /// 3. Slice the page window
    pub fn query(&self, request: &PageRequest, cancel: &CancelToken) -> Result<Vec<Record>> {
        // Compile before touching the store so a bad pattern costs nothing
        let matcher = if request.filter.is_empty() {
            None
        } else {
            Some(self.compile(&request.filter)?)
        };

        let records = self
            .store
            .find_all_sorted(Some(&request.sort), self.deadline())?;
        cancel.check()?;
        let scanned = records.len();

        let records = match &matcher {
            Some(matcher) => matcher.filter(records, cancel)?,
            None => records,
        };
        let matched = records.len();

        let page = paginate(records, request.page_index, request.page_size);

        tracing::debug!(
            filter = %request.filter,
            sort_field = %request.sort.field,
            sort_order = request.sort.direction.as_token(),
            page_index = request.page_index,
            page_size = request.page_size,
            scanned,
            matched,
            returned = page.len(),
            "Query"
        );

        Ok(page)
    }

    /// Number of records matching `filter`, or the total when it is empty
    pub fn count(&self, filter: &str, cancel: &CancelToken) -> Result<usize> {
        if filter.is_empty() {
            let total = self.store.count_all(self.deadline())?;
            cancel.check()?;
            return Ok(total);
        }

        let matcher = self.compile(filter)?;
        let records = self.store.find_all_sorted(None, self.deadline())?;
        cancel.check()?;
        let count = matcher.filter(records, cancel)?.len();

        tracing::debug!(filter, count, "Count");
        Ok(count)
    }

    /// Store a new record; the store assigns its id
    pub fn insert(&self, fields: Fields) -> Result<Record> {
        let record = self.store.insert(fields, self.deadline())?;
        tracing::debug!(id = %record.id(), "Inserted record");
        Ok(record)
    }

    /// Apply the present mutable fields of `update` to the record with `id`.
    ///
    /// Errors with `NotFound` when the id is absent; the store is unchanged.
    pub fn update_fields(&self, id: RecordId, update: &ClientUpdate) -> Result<Record> {
        let fields = update.to_fields();
        match self.store.find_and_modify(id, &fields, self.deadline())? {
            Some(record) => {
                tracing::debug!(%id, changed = fields.len(), "Updated record");
                Ok(record)
            }
            None => Err(KeeperError::NotFound),
        }
    }

    /// Delete the record with `id`; `NotFound` when absent
    pub fn remove(&self, id: RecordId) -> Result<Removed> {
        if self.store.remove(id, self.deadline())? {
            tracing::debug!(%id, "Removed record");
            Ok(Removed { id })
        } else {
            Err(KeeperError::NotFound)
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }
}
