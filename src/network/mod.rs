//! Network Module
//!
//! HTTP server, routes and a blocking client.
//!
//! ## Architecture
//! - Axum router on a multi-threaded tokio runtime
//! - Engine calls run on the blocking pool, capped by a semaphore
//! - Requests routed through [`Service`](crate::service::Service)

mod client;
mod routes;
mod server;

pub use client::Client;
pub use routes::{CORS_ALLOW_HEADERS, CORS_ALLOW_METHODS, CORS_ALLOW_ORIGIN};
pub use server::Server;
