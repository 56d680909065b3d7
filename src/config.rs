//! Configuration for ClientKeeper
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;
use std::time::Duration;

/// Main configuration for a ClientKeeper instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Store Configuration
    // -------------------------------------------------------------------------
    /// Root directory for the record journal.
    /// `None` keeps the store purely in memory.
    /// Internal structure:
    ///   {data_dir}/
    ///     └── records.journal
    pub data_dir: Option<PathBuf>,

    /// Sync strategy: how often to fsync the journal
    pub journal_sync_strategy: JournalSyncStrategy,

    /// Upper bound on a single store round trip (milliseconds)
    pub store_timeout_ms: u64,

    // -------------------------------------------------------------------------
    // Query Configuration
    // -------------------------------------------------------------------------
    /// Compiled size limit for filter patterns (bytes)
    pub regex_size_limit: usize,

    /// Run form-layer validation on create/update requests
    pub validate_clients: bool,

    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// TCP listen address
    pub listen_addr: String,

    /// Requests handled at once; extra requests get a 503
    pub max_concurrent_requests: usize,

    /// Runtime worker threads
    pub worker_threads: usize,

    /// Largest accepted request body (bytes)
    pub max_request_size: usize,
}

/// Journal sync strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JournalSyncStrategy {
    /// fsync after every write (safest, slowest)
    EveryWrite,

    /// fsync after N unsynced entries (balanced durability/performance)
    EveryNEntries { count: usize },
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            journal_sync_strategy: JournalSyncStrategy::EveryNEntries { count: 100 },
            store_timeout_ms: 2000,
            regex_size_limit: 1024 * 1024, // 1 MB
            validate_clients: false,
            listen_addr: "127.0.0.1:3000".to_string(),
            max_concurrent_requests: 1024,
            worker_threads: 8,
            max_request_size: 1024 * 1024, // 1 MB
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Store round-trip bound as a Duration
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory (enables the journal)
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = Some(path.into());
        self
    }

    /// Set the journal sync strategy
    pub fn journal_sync_strategy(mut self, strategy: JournalSyncStrategy) -> Self {
        self.config.journal_sync_strategy = strategy;
        self
    }

    /// Set the store timeout (in milliseconds)
    pub fn store_timeout_ms(mut self, ms: u64) -> Self {
        self.config.store_timeout_ms = ms;
        self
    }

    /// Set the compiled filter pattern size limit (in bytes)
    pub fn regex_size_limit(mut self, size: usize) -> Self {
        self.config.regex_size_limit = size;
        self
    }

    /// Enable or disable client form validation
    pub fn validate_clients(mut self, enabled: bool) -> Self {
        self.config.validate_clients = enabled;
        self
    }

    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the maximum number of requests handled at once
    pub fn max_concurrent_requests(mut self, count: usize) -> Self {
        self.config.max_concurrent_requests = count;
        self
    }

    /// Set the number of worker threads
    pub fn worker_threads(mut self, count: usize) -> Self {
        self.config.worker_threads = count;
        self
    }

    /// Set the maximum request size (in bytes)
    pub fn max_request_size(mut self, size: usize) -> Self {
        self.config.max_request_size = size;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
