//! Service Module
//!
//! Routes protocol requests to the query engine and shapes the JSON
//! replies.
//!
//! ## Responsibilities
//! - Open the store and build the engine from config
//! - Apply form-layer validation when enabled
//! - Map engine outcomes onto the response contract (a missing id is a
//!   `null` update and an `n: 0` delete, not an error)

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::{json, Value as JsonValue};

use crate::config::Config;
use crate::error::{KeeperError, Result};
use crate::protocol::{Request, Response};
use crate::query::{CancelToken, QueryEngine, QueryLimits};
use crate::record::{ClientForm, ClientUpdate, Record};
use crate::store::{MemoryStore, RecordStore};

/// The request handler shared by all connections
pub struct Service {
    engine: QueryEngine,
    validate_clients: bool,
}

impl Service {
    pub fn new(engine: QueryEngine, validate_clients: bool) -> Self {
        Self {
            engine,
            validate_clients,
        }
    }

    /// Open the configured store and build a service over it
    pub fn open(config: &Config) -> Result<Self> {
        let store = MemoryStore::open(config)?;
        tracing::info!(
            durable = store.is_durable(),
            journal = ?store.journal_path(),
            "Record store ready"
        );
        let store: Arc<dyn RecordStore> = Arc::new(store);
        let engine = QueryEngine::new(store, QueryLimits::from(config));
        Ok(Self::new(engine, config.validate_clients))
    }

    /// Handle a routed request end to end; never fails
    pub fn handle(&self, request: Request, cancel: &CancelToken) -> Response {
        tracing::trace!(?request, "Routed request");
        respond(self.execute(request, cancel))
    }

    /// Execute a routed request
    pub fn execute(&self, request: Request, cancel: &CancelToken) -> Result<Response> {
        match request {
            Request::ListPage(page) => {
                let records = self.engine.query(&page, cancel)?;
                Ok(Response::ok(records_to_json(&records)))
            }
            Request::Count { filter } => {
                let length = self.engine.count(&filter, cancel)?;
                Ok(Response::ok(json!({ "length": length })))
            }
            Request::Create { fields } => {
                if self.validate_clients {
                    ClientForm::from_fields(&fields).validate()?;
                }
                let record = self.engine.insert(fields)?;
                Ok(Response::ok(record.to_json()))
            }
            Request::Update { id, fields } => {
                let update = ClientUpdate::from_fields(fields);
                if self.validate_clients {
                    update.validate()?;
                }
                match self.engine.update_fields(id, &update) {
                    Ok(record) => Ok(Response::ok(record.to_json())),
                    Err(KeeperError::NotFound) => Ok(Response::ok(JsonValue::Null)),
                    Err(e) => Err(e),
                }
            }
            Request::Delete { id } => match self.engine.remove(id) {
                Ok(_) => Ok(Response::ok(json!({ "n": 1, "ok": 1 }))),
                Err(KeeperError::NotFound) => Ok(Response::ok(json!({ "n": 0, "ok": 1 }))),
                Err(e) => Err(e),
            },
            Request::Preflight => Ok(Response::no_content()),
            Request::Unrouted { method, path } => Ok(Response::error(
                StatusCode::NOT_FOUND,
                &format!("Cannot {} {}", method, path),
            )),
        }
    }

    pub fn engine(&self) -> &QueryEngine {
        &self.engine
    }

    /// Flush the store; call once at shutdown
    pub fn close(&self) -> Result<()> {
        self.engine.store().close()
    }
}

/// Turn an outcome into a response, logging failures
pub fn respond(outcome: Result<Response>) -> Response {
    match outcome {
        Ok(response) => response,
        Err(e) => {
            if e.is_client_error() {
                tracing::debug!(error = %e, "Rejected request");
            } else {
                tracing::warn!(error = %e, "Request failed");
            }
            Response::from_error(&e)
        }
    }
}

fn records_to_json(records: &[Record]) -> JsonValue {
    JsonValue::Array(records.iter().map(Record::to_json).collect())
}
