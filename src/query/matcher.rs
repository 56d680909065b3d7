//! Recursive filter matcher
//!
//! Decides whether a record matches a filter pattern by testing every field
//! value at every nesting depth.
//!
//! ## Matching rules
//! - The pattern is a regular expression, compiled once, case-insensitive.
//!   Metacharacters keep their regex meaning.
//! - Strings are tested as-is, numbers in canonical decimal form, booleans
//!   as `true` / `false`
//! - `Null` never matches
//! - Nested records and lists are searched element by element; they have no
//!   text form of their own
//! - The record id is not a field and is never tested
//!
//! The walk runs on an explicit stack, so arbitrarily deep nesting cannot
//! exhaust the call stack. Values are owned trees, so the walk always ends.

use std::collections::HashSet;

use regex::{Regex, RegexBuilder};

use crate::error::Result;
use crate::record::{Record, Value};

use super::CancelToken;

/// Default bound on compiled pattern size (1 MB)
pub const DEFAULT_REGEX_SIZE_LIMIT: usize = 1024 * 1024;

/// A compiled filter
#[derive(Debug, Clone)]
pub struct FilterMatcher {
    regex: Regex,
}

impl FilterMatcher {
    /// Compile `pattern` with the default size limit
    pub fn new(pattern: &str) -> Result<Self> {
        Self::with_size_limit(pattern, DEFAULT_REGEX_SIZE_LIMIT)
    }

    /// Compile `pattern`, rejecting programs larger than `size_limit` bytes.
    ///
    /// Errors with `InvalidPattern` when the pattern does not compile.
    pub fn with_size_limit(pattern: &str, size_limit: usize) -> Result<Self> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .size_limit(size_limit)
            .build()?;
        Ok(Self { regex })
    }

    /// Whether any field of `record`, at any depth, matches
    pub fn matches(&self, record: &Record) -> bool {
        let mut stack: Vec<&Value> = record.fields().values().rev().collect();
        self.walk(&mut stack)
    }

    /// Whether `value` or anything nested inside it matches
    pub fn matches_value(&self, value: &Value) -> bool {
        let mut stack = vec![value];
        self.walk(&mut stack)
    }

    fn walk<'a>(&self, stack: &mut Vec<&'a Value>) -> bool {
        while let Some(value) = stack.pop() {
            match value {
                Value::Record(fields) => stack.extend(fields.values().rev()),
                Value::List(items) => stack.extend(items.iter().rev()),
                Value::Null => {}
                scalar => {
                    if let Some(text) = scalar.match_text() {
                        if self.regex.is_match(&text) {
                            return true;
                        }
                    }
                }
            }
        }
        false
    }

    /// Keep the matching records, in order, each id at most once.
    ///
    /// The first occurrence of an id wins. Stops with `Cancelled` as soon as
    /// `cancel` fires.
    pub fn filter(&self, records: Vec<Record>, cancel: &CancelToken) -> Result<Vec<Record>> {
        let mut seen = HashSet::new();
        let mut matched = Vec::new();

        for record in records {
            cancel.check()?;
            if self.matches(&record) && seen.insert(record.id()) {
                matched.push(record);
            }
        }

        Ok(matched)
    }
}
