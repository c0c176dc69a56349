//! Startup orchestration.
//!
//! # Responsibilities
//! - Start the metrics exporter when enabled
//! - Build the store and the HTTP server
//! - Install signal handling
//! - Bind the listener and begin accepting traffic
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binds last (traffic only when ready)

use std::net::AddrParseError;
use thiserror::Error;

use crate::config::ServerConfig;
use crate::http::{HttpServer, ServerError};
use crate::lifecycle::{signals, Shutdown};
use crate::net::{self, ListenerError};
use crate::observability::metrics;
use crate::store::Store;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Invalid metrics address: {0}")]
    MetricsAddress(#[from] AddrParseError),

    #[error("Failed to start metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error(transparent)]
    Listener(#[from] ListenerError),

    #[error(transparent)]
    Server(#[from] ServerError),
}

/// Start every subsystem and serve until shutdown completes.
pub async fn run(config: ServerConfig) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        let addr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let store = Store::with_capacity(config.store.initial_capacity);
    tracing::debug!(initial_capacity = config.store.initial_capacity, "Store created");

    let listener_config = config.listener.clone();
    let server = HttpServer::new(config, store);

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    signals::spawn_signal_handler(shutdown);

    let listener = net::bind(&listener_config).await?;
    let outcome = server.run(listener, server_shutdown).await?;
    tracing::debug!(?outcome, "Server finished");

    Ok(())
}
