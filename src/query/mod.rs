//! Query Module
//!
//! Filter, sort and paginate records held by a [`RecordStore`].
//!
//! ## Pipeline
//! ```text
//!   PageRequest
//!       │
//!       ▼
//!   RecordStore::find_all_sorted   (one round trip, bounded by a Deadline)
//!       │
//!       ▼
//!   FilterMatcher::filter          (skipped for an empty filter)
//!       │
//!       ▼
//!   paginate                       ([index * size, index * size + size))
//! ```
//!
//! [`RecordStore`]: crate::store::RecordStore

mod cancel;
mod engine;
mod matcher;
mod page;
mod sort;

pub use cancel::CancelToken;
pub use engine::{QueryEngine, QueryLimits, Removed};
pub use matcher::{FilterMatcher, DEFAULT_REGEX_SIZE_LIMIT};
pub use page::{page_window, paginate, PageRequest};
pub use sort::{
    compare_records, compare_values, resolve_field, sort_records, SortDirection, SortKey,
    ASCENDING_TOKEN, DEFAULT_SORT_FIELD,
};
