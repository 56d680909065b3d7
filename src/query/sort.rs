//! Sort keys and record ordering
//!
//! ## Ordering rules
//! - Values of different types order by type rank:
//!   `Null < Number < String < Record < List < Bool`
//! - Same-type values order naturally: numbers numerically, strings by
//!   bytes, booleans `false < true`, records field by field, lists element
//!   by element
//! - A record without the sort field sorts **last** in both directions
//! - Ties break on record id, ascending, in both directions
//!
//! Together these make the order total and deterministic.

use std::cmp::Ordering;

use crate::record::{Record, Value};

/// Field used when the caller does not name one
pub const DEFAULT_SORT_FIELD: &str = "first_name";

/// Token that selects ascending order; anything else is descending
pub const ASCENDING_TOKEN: &str = "asc";

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl SortDirection {
    /// Parse a caller-supplied order token.
    ///
    /// Only the exact token `asc` selects ascending order.
    pub fn from_token(token: Option<&str>) -> Self {
        match token {
            Some(ASCENDING_TOKEN) => SortDirection::Ascending,
            _ => SortDirection::Descending,
        }
    }

    pub fn as_token(self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }
}

/// Field name + direction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    pub fn ascending(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Ascending)
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Descending)
    }
}

impl Default for SortKey {
    fn default() -> Self {
        Self::new(DEFAULT_SORT_FIELD, SortDirection::default())
    }
}

/// Resolve a sort field on a record.
///
/// An exact top-level match wins; otherwise a dotted name walks nested
/// records (`address.city`).
pub fn resolve_field<'a>(record: &'a Record, field: &str) -> Option<&'a Value> {
    if let Some(value) = record.get(field) {
        return Some(value);
    }
    if !field.contains('.') {
        return None;
    }

    let mut segments = field.split('.');
    let mut current = record.get(segments.next()?)?;
    for segment in segments {
        match current {
            Value::Record(fields) => current = fields.get(segment)?,
            _ => return None,
        }
    }
    Some(current)
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Number(_) => 1,
        Value::String(_) => 2,
        Value::Record(_) => 3,
        Value::List(_) => 4,
        Value::Bool(_) => 5,
    }
}

/// Total order over values
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Number(x), Value::Number(y)) => x.partial_cmp(y).unwrap_or_else(|| x.total_cmp(y)),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Record(x), Value::Record(y)) => {
            for ((kx, vx), (ky, vy)) in x.iter().zip(y.iter()) {
                let ord = kx.cmp(ky).then_with(|| compare_values(vx, vy));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            x.len().cmp(&y.len())
        }
        (Value::List(x), Value::List(y)) => {
            for (vx, vy) in x.iter().zip(y.iter()) {
                let ord = compare_values(vx, vy);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            x.len().cmp(&y.len())
        }
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

/// Order two records under a sort key
pub fn compare_records(a: &Record, b: &Record, key: &SortKey) -> Ordering {
    let by_field = match (resolve_field(a, &key.field), resolve_field(b, &key.field)) {
        (Some(x), Some(y)) => {
            let ord = compare_values(x, y);
            match key.direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        }
        // Missing field sorts last whichever the direction
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_field.then_with(|| a.id().cmp(&b.id()))
}

/// Sort records in place
pub fn sort_records(records: &mut [Record], key: &SortKey) {
    records.sort_by(|a, b| compare_records(a, b, key));
}
