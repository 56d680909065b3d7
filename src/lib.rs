//! # ClientKeeper
//!
//! A contact record service with:
//! - A recursive, case-insensitive regex filter over nested records
//! - Total-order sorting with a deterministic id tie-break
//! - Page-window pagination that never errors on out-of-range pages
//! - An optional append-only journal for durability
//! - A small JSON-over-HTTP surface
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      HTTP Server                             │
//! │            (axum router on a tokio runtime)                  │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                      Service                                 │
//! │            (routing, validation, JSON shapes)                │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                   Query Engine                               │
//! │          (sort → filter → paginate, mutations)               │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │ MemoryStore │─────────▶│   Journal   │
//!   │  (RwLock)   │          │  (Append)   │
//!   └─────────────┘          └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;

pub mod network;
pub mod protocol;
pub mod query;
pub mod record;
pub mod service;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use config::Config;
pub use error::{KeeperError, Result};
pub use query::{CancelToken, PageRequest, QueryEngine, SortDirection, SortKey};
pub use record::{Record, RecordId, Value};
pub use service::Service;
pub use store::{MemoryStore, RecordStore};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of ClientKeeper
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
