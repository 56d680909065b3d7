//! Record Module
//!
//! Semi-structured records as held by the store and returned by queries.
//!
//! ## Shape
//! A record is an immutable store-assigned [`RecordId`] plus a field map.
//! The id is kept apart from the fields: it is the dedup key and the sort
//! tie-breaker, and it never takes part in filter matching.
//!
//! ## Wire form
//! ```text
//! { "_id": "<24 hex digits>", "<field>": <json value>, ... }
//! ```

mod client;
mod id;
mod value;

pub use client::{ClientForm, ClientUpdate, EMAIL_PATTERN, MUTABLE_FIELDS};
pub use id::{RecordId, ID_HEX_WIDTH};
pub use value::{fields_to_json, format_number, Fields, Value};

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::{KeeperError, Result};

/// JSON member carrying the record id
pub const ID_FIELD: &str = "_id";

/// A stored record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    id: RecordId,
    fields: Fields,
}

impl Record {
    pub fn new(id: RecordId, fields: Fields) -> Self {
        Self { id, fields }
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Look up a top-level field
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Set a top-level field, returning the previous value
    pub fn set(&mut self, field: impl Into<String>, value: Value) -> Option<Value> {
        self.fields.insert(field.into(), value)
    }

    pub fn into_fields(self) -> Fields {
        self.fields
    }

    /// Render as the JSON object sent to clients
    pub fn to_json(&self) -> JsonValue {
        let mut object = serde_json::Map::with_capacity(self.fields.len() + 1);
        object.insert(ID_FIELD.to_string(), JsonValue::String(self.id.to_string()));
        for (name, value) in &self.fields {
            object.insert(name.clone(), JsonValue::from(value));
        }
        JsonValue::Object(object)
    }
}

/// Convert a JSON request body into record fields.
///
/// The body must be an object. A client-supplied `_id` is dropped: ids are
/// assigned by the store.
pub fn fields_from_json(body: JsonValue) -> Result<Fields> {
    match body {
        JsonValue::Object(map) => Ok(map
            .into_iter()
            .filter(|(name, _)| name != ID_FIELD)
            .map(|(name, value)| (name, Value::from(value)))
            .collect()),
        other => Err(KeeperError::Protocol(format!(
            "Expected a JSON object body, got {}",
            json_type_name(&other)
        ))),
    }
}

fn json_type_name(json: &JsonValue) -> &'static str {
    match json {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
