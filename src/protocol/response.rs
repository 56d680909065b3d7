//! Response definitions
//!
//! Represents responses to clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use serde_json::{json, Value as JsonValue};

use crate::error::KeeperError;

/// A response to send to the client
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// Status code
    pub status: StatusCode,

    /// JSON body; `None` only for 204
    pub body: Option<JsonValue>,
}

impl Response {
    /// Create a 200 response with a JSON body
    pub fn ok(body: JsonValue) -> Self {
        Self {
            status: StatusCode::OK,
            body: Some(body),
        }
    }

    /// Create an empty 204 response
    pub fn no_content() -> Self {
        Self {
            status: StatusCode::NO_CONTENT,
            body: None,
        }
    }

    /// Create an error response with `{"error": message}`
    pub fn error(status: StatusCode, message: &str) -> Self {
        Self {
            status,
            body: Some(json!({ "error": message })),
        }
    }

    /// Map an error to its status
    pub fn from_error(err: &KeeperError) -> Self {
        let status = match err {
            e if e.is_client_error() => StatusCode::BAD_REQUEST,
            KeeperError::NotFound => StatusCode::NOT_FOUND,
            KeeperError::StoreTimeout(_) | KeeperError::Cancelled => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::error(status, &err.to_string())
    }
}

impl IntoResponse for Response {
    fn into_response(self) -> axum::response::Response {
        match self.body {
            Some(body) => (self.status, Json(body)).into_response(),
            None => self.status.into_response(),
        }
    }
}
