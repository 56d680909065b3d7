//! Page requests and window slicing

use std::ops::Range;

use crate::record::Record;

use super::SortKey;

/// Everything a list-page call needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Filter pattern; empty means no filtering
    pub filter: String,
    pub sort: SortKey,
    /// Zero-based page index
    pub page_index: usize,
    pub page_size: usize,
}

impl PageRequest {
    /// First page of `page_size` records, unfiltered, default sort
    pub fn new(page_size: usize) -> Self {
        Self {
            filter: String::new(),
            sort: SortKey::default(),
            page_index: 0,
            page_size,
        }
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_page(mut self, page_index: usize) -> Self {
        self.page_index = page_index;
        self
    }
}

/// Index range of a page
pub fn page_window(page_index: usize, page_size: usize) -> Range<usize> {
    let start = page_index.saturating_mul(page_size);
    start..start.saturating_add(page_size)
}

/// Keep only the records inside the page window.
///
/// A window past the end yields an empty vector.
pub fn paginate(records: Vec<Record>, page_index: usize, page_size: usize) -> Vec<Record> {
    let window = page_window(page_index, page_size);
    if window.start >= records.len() {
        return Vec::new();
    }
    let end = window.end.min(records.len());
    records
        .into_iter()
        .skip(window.start)
        .take(end - window.start)
        .collect()
}
