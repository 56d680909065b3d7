//! ClientKeeper Server Binary
//!
//! Starts the HTTP server for ClientKeeper.

use std::sync::Arc;

use clap::Parser;
use clientkeeper::config::JournalSyncStrategy;
use clientkeeper::network::Server;
use clientkeeper::{Config, Service};
use tracing_subscriber::{fmt, EnvFilter};

/// ClientKeeper Server
#[derive(Parser, Debug)]
#[command(name = "clientkeeper-server")]
#[command(about = "Contact record service with filtering, sorting and pagination")]
#[command(version)]
struct Args {
    /// Journal directory; omit for a purely in-memory store
    #[arg(short, long)]
    data_dir: Option<String>,

    /// Listen host
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Listen port
    #[arg(short, long, env = "PORT", default_value = "3000")]
    port: u16,

    /// Maximum requests handled at once
    #[arg(short, long, default_value = "1024")]
    max_concurrent_requests: usize,

    /// Runtime worker threads
    #[arg(short, long, default_value = "8")]
    workers: usize,

    /// Store round-trip timeout in milliseconds
    #[arg(long, default_value = "2000")]
    store_timeout_ms: u64,

    /// fsync the journal after every write
    #[arg(long)]
    sync_every_write: bool,

    /// Validate client fields on create and update
    #[arg(long)]
    validate: bool,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,clientkeeper=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();
    let listen = format!("{}:{}", args.host, args.port);

    tracing::info!("ClientKeeper Server v{}", clientkeeper::VERSION);
    tracing::info!("Data directory: {}", args.data_dir.as_deref().unwrap_or("(in-memory)"));
    tracing::info!("Listen address: {}", listen);

    // Build config from args
    let mut builder = Config::builder()
        .listen_addr(&listen)
        .max_concurrent_requests(args.max_concurrent_requests)
        .worker_threads(args.workers)
        .store_timeout_ms(args.store_timeout_ms)
        .validate_clients(args.validate);
    if let Some(dir) = &args.data_dir {
        builder = builder.data_dir(dir);
    }
    if args.sync_every_write {
        builder = builder.journal_sync_strategy(JournalSyncStrategy::EveryWrite);
    }
    let config = builder.build();

    // Open store and engine
    let service = match Service::open(&config) {
        Ok(s) => Arc::new(s),
        Err(e) => {
            tracing::error!("Failed to open store: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Store opened successfully");

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.worker_threads.max(1))
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to start runtime: {}", e);
            std::process::exit(1);
        }
    };

    let server = Server::new(config, Arc::clone(&service));
    let shutdown = server.shutdown_handle();

    let result = runtime.block_on(async {
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("Received Ctrl+C, initiating shutdown...");
                    shutdown.cancel();
                }
                Err(e) => tracing::error!("Failed to listen for Ctrl+C: {}", e),
            }
        });
        server.run().await
    });

    if let Err(e) = service.close() {
        tracing::error!("Failed to close store: {}", e);
    }

    if let Err(e) = result {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
