//! Blocking HTTP client for the ClientKeeper API

use std::time::Duration;

use reqwest::blocking::{Client as HttpClient, RequestBuilder};
use serde_json::Value as JsonValue;

use crate::error::{KeeperError, Result};
use crate::query::PageRequest;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Client for a running server
///
/// Must not be called from inside an async runtime.
pub struct Client {
    base_url: String,
    http: HttpClient,
}

impl Client {
    /// `addr` is `host:port` or a full `http://` base URL
    pub fn new(addr: impl Into<String>) -> Result<Self> {
        Self::with_timeout(addr, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(addr: impl Into<String>, timeout: Duration) -> Result<Self> {
        let addr = addr.into();
        let base_url = if addr.starts_with("http://") || addr.starts_with("https://") {
            addr.trim_end_matches('/').to_string()
        } else {
            format!("http://{}", addr)
        };
        let http = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self { base_url, http })
    }

    /// GET /clients
    pub fn list(&self, request: &PageRequest) -> Result<Vec<JsonValue>> {
        let query = [
            ("filter", request.filter.clone()),
            ("sortField", request.sort.field.clone()),
            ("sortOrder", request.sort.direction.as_token().to_string()),
            ("pageNumber", request.page_index.to_string()),
            ("pageSize", request.page_size.to_string()),
        ];
        match self.send(self.http.get(self.url("/clients")).query(&query))? {
            JsonValue::Array(records) => Ok(records),
            other => Err(unexpected("array", &other)),
        }
    }

    /// GET /clients-all
    pub fn count(&self, filter: &str) -> Result<usize> {
        let body = self.send(
            self.http
                .get(self.url("/clients-all"))
                .query(&[("filter", filter)]),
        )?;
        body.get("length")
            .and_then(JsonValue::as_u64)
            .map(|n| n as usize)
            .ok_or_else(|| unexpected("{\"length\": n}", &body))
    }

    /// POST /clients
    pub fn create(&self, record: &JsonValue) -> Result<JsonValue> {
        self.send(self.http.post(self.url("/clients")).json(record))
    }

    /// PUT /clients/{id}; `None` when the id does not exist
    pub fn update(&self, id: &str, fields: &JsonValue) -> Result<Option<JsonValue>> {
        let url = self.url(&format!("/clients/{}", id));
        match self.send(self.http.put(url).json(fields))? {
            JsonValue::Null => Ok(None),
            record => Ok(Some(record)),
        }
    }

    /// DELETE /clients/{id}; `true` when a record was removed
    pub fn delete(&self, id: &str) -> Result<bool> {
        let url = self.url(&format!("/clients/{}", id));
        let body = self.send(self.http.delete(url))?;
        body.get("n")
            .and_then(JsonValue::as_u64)
            .map(|n| n > 0)
            .ok_or_else(|| unexpected("{\"n\": n}", &body))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn send(&self, request: RequestBuilder) -> Result<JsonValue> {
        let response = request.send()?;
        let status = response.status();
        let bytes = response.bytes()?;

        if status.is_success() {
            if bytes.is_empty() {
                return Ok(JsonValue::Null);
            }
            return Ok(serde_json::from_slice(&bytes)?);
        }

        let message = match serde_json::from_slice::<JsonValue>(&bytes) {
            Ok(json) => json
                .get("error")
                .and_then(JsonValue::as_str)
                .unwrap_or("no error message")
                .to_string(),
            Err(_) => String::from_utf8_lossy(&bytes).into_owned(),
        };
        if status.is_server_error() {
            Err(KeeperError::Store(format!("Server returned {}: {}", status, message)))
        } else {
            Err(KeeperError::Protocol(format!("Server returned {}: {}", status, message)))
        }
    }
}

fn unexpected(expected: &str, got: &JsonValue) -> KeeperError {
    KeeperError::Protocol(format!("Expected {} in response, got {}", expected, got))
}
