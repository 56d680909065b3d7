//! Request definitions
//!
//! Query parameter and body shapes, and the routed operations they map to.

use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::error::{KeeperError, Result};
use crate::query::{PageRequest, SortDirection, SortKey, DEFAULT_SORT_FIELD};
use crate::record::{fields_from_json, Fields, RecordId, Value, ID_FIELD};

/// Mount point the routes are also served under
pub const API_PREFIX: &str = "/api";

/// Query string of GET /clients
///
/// Every parameter arrives as text; [`ListParams::into_page_request`]
/// applies the defaults and rejects a bad `pageSize`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub filter: Option<String>,
    pub sort_field: Option<String>,
    pub sort_order: Option<String>,
    pub page_number: Option<String>,
    pub page_size: Option<String>,
}

impl ListParams {
    pub fn into_page_request(self) -> Result<PageRequest> {
        let sort_field = match self.sort_field {
            Some(field) if !field.is_empty() => field,
            _ => DEFAULT_SORT_FIELD.to_string(),
        };
        let direction = SortDirection::from_token(self.sort_order.as_deref());

        // An unparsable page number falls back to the first page
        let page_index = self
            .page_number
            .and_then(|n| n.trim().parse::<usize>().ok())
            .unwrap_or(0);

        let page_size = match self.page_size {
            Some(size) => size.trim().parse::<usize>().map_err(|_| {
                KeeperError::Protocol(format!(
                    "pageSize must be a non-negative integer, got {:?}",
                    size
                ))
            })?,
            None => return Err(KeeperError::Protocol("pageSize is required".to_string())),
        };

        Ok(PageRequest::new(page_size)
            .with_filter(self.filter.unwrap_or_default())
            .with_sort(SortKey::new(sort_field, direction))
            .with_page(page_index))
    }
}

/// Query string of GET /clients-all
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CountParams {
    pub filter: Option<String>,
}

/// A routed operation
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    /// GET /clients
    ListPage(PageRequest),

    /// GET /clients-all
    Count { filter: String },

    /// POST /clients
    Create { fields: Fields },

    /// PUT /clients/{id}
    Update { id: RecordId, fields: Fields },

    /// DELETE /clients/{id}
    Delete { id: RecordId },

    /// OPTIONS on any route (CORS preflight)
    Preflight,

    /// Anything else
    Unrouted { method: String, path: String },
}

/// Parse the `{id}` path segment
pub fn parse_id(segment: &str) -> Result<RecordId> {
    segment.parse()
}

/// Decode a JSON object body; a blank body is an empty record
pub fn json_fields(body: &[u8]) -> Result<Fields> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Fields::new());
    }
    let json: JsonValue = serde_json::from_slice(body)
        .map_err(|e| KeeperError::Protocol(format!("Invalid JSON body: {}", e)))?;
    fields_from_json(json)
}

/// Turn decoded form pairs into fields; a client-supplied `_id` is dropped
pub fn form_fields(pairs: Vec<(String, String)>) -> Fields {
    pairs
        .into_iter()
        .filter(|(name, _)| name != ID_FIELD)
        .map(|(name, value)| (name, Value::String(value)))
        .collect()
}
