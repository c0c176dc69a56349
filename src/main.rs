//! kv-server
//!
//! An in-memory key/value store served over HTTP query-parameter endpoints.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────┐
//!                         │                  KV SERVER                   │
//!                         │                                              │
//!     GET /add?k=&v=      │  ┌─────────┐    ┌──────────┐    ┌─────────┐  │
//!     ────────────────────┼─▶│   net   │───▶│   http   │───▶│  store  │  │
//!                         │  │listener │    │ handlers │    │ RwLock  │  │
//!     response            │  └─────────┘    └──────────┘    │ HashMap │  │
//!     ◀───────────────────┼─────────────────────┘           └─────────┘  │
//!                         │                                              │
//!                         │  ┌────────────────────────────────────────┐  │
//!                         │  │         Cross-Cutting Concerns         │  │
//!                         │  │  config · observability · lifecycle    │  │
//!                         │  │  (SIGINT/SIGTERM → bounded drain)      │  │
//!                         │  └────────────────────────────────────────┘  │
//!                         └──────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;

use kv_server::config::{self, ServerConfig};
use kv_server::lifecycle::startup;
use kv_server::observability::logging;

#[derive(Parser)]
#[command(name = "kv-server")]
#[command(about = "In-memory key/value store over HTTP", long_about = None)]
struct Args {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listener address, overriding the configuration file.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => config::load_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
        config::validate_config(&config)
            .map_err(config::ConfigError::Validation)?;
    }

    logging::init_logging(&config.observability);

    tracing::info!("kv-server v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        initial_capacity = config.store.initial_capacity,
        grace_period_ms = config.shutdown.grace_period_ms,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if let Err(e) = startup::run(config).await {
        tracing::error!(error = %e, "Server failed");
        return Err(e.into());
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
