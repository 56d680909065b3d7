//! HTTP Server
//!
//! Serves the axum router on a tokio listener until shutdown is signalled.

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use crate::config::Config;
use crate::error::Result;
use crate::query::CancelToken;
use crate::service::Service;

use super::routes;

/// HTTP server for ClientKeeper
pub struct Server {
    config: Config,
    service: Arc<Service>,

    /// Doubles as the shutdown signal and the cancel signal for in-flight queries
    shutdown: CancelToken,
}

impl Server {
    /// Create a new server with the given config and service
    pub fn new(config: Config, service: Arc<Service>) -> Self {
        Self {
            config,
            service,
            shutdown: CancelToken::new(),
        }
    }

    /// The application router, sharing this server's shutdown token
    pub fn router(&self) -> Router {
        routes::router(Arc::clone(&self.service), self.shutdown.clone(), &self.config)
    }

    /// Bind the configured listen address
    pub async fn bind(&self) -> Result<TcpListener> {
        Ok(TcpListener::bind(&self.config.listen_addr).await?)
    }

    /// Serve on an already bound listener until shutdown
    pub async fn serve(&self, listener: TcpListener) -> Result<()> {
        let addr = listener.local_addr()?;
        tracing::info!(
            %addr,
            max_concurrent_requests = self.config.max_concurrent_requests,
            "Server listening"
        );

        let shutdown = self.shutdown.clone();
        axum::serve(listener, self.router())
            .with_graceful_shutdown(async move { shutdown.cancelled().await })
            .await?;

        tracing::info!("Server stopped accepting connections");
        Ok(())
    }

    /// Bind and serve (returns after shutdown)
    pub async fn run(&self) -> Result<()> {
        let listener = self.bind().await?;
        self.serve(listener).await
    }

    /// Signal the server to shutdown gracefully
    ///
    /// Stops accepting connections and cancels queries still running.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    /// A handle that can stop the server from another task or thread
    pub fn shutdown_handle(&self) -> CancelToken {
        self.shutdown.clone()
    }
}
