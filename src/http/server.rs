//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout, in-flight tracking)
//! - Inject the shared store into handlers
//! - Serve until shutdown, then drain within the grace period

use axum::{body::Body, http::Request, middleware, routing::get, Router};
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, oneshot, watch};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::http::handlers;
use crate::http::middleware::{track_in_flight, RequestTracker};
use crate::http::request::{request_id, UuidRequestId, X_REQUEST_ID};
use crate::lifecycle::{Lifecycle, LifecycleState};
use crate::store::Store;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
}

/// Error type for a running server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("server task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// How [`HttpServer::run`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownOutcome {
    /// Shutdown was requested and every in-flight request finished.
    Drained,
    /// Shutdown was requested but requests were still running when the
    /// grace period ran out.
    GracePeriodElapsed { abandoned: u64 },
    /// The accept loop ended without a shutdown request.
    Unrequested,
}

/// HTTP server for the key/value store.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
    store: Store,
    tracker: RequestTracker,
    lifecycle: Lifecycle,
}

impl HttpServer {
    /// Create a new HTTP server serving `store`.
    pub fn new(config: ServerConfig, store: Store) -> Self {
        let tracker = RequestTracker::new();
        let state = AppState {
            store: store.clone(),
        };

        let router = Self::build_router(&config, state, tracker.clone());
        Self {
            router,
            config,
            store,
            tracker,
            lifecycle: Lifecycle::new(),
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, state: AppState, tracker: RequestTracker) -> Router {
        Router::new()
            .route("/", get(handlers::hello))
            .route("/name", get(handlers::greet))
            .route("/add", get(handlers::add))
            .route("/get", get(handlers::get))
            .with_state(state)
            .layer(middleware::from_fn_with_state(tracker, track_in_flight))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    path = %request.uri().path(),
                    request_id = %request_id(request),
                )
            }))
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, UuidRequestId))
    }

    /// The fully layered router, for serving or driving in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// The store handlers read and write.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// In-flight request counter.
    pub fn in_flight(&self) -> RequestTracker {
        self.tracker.clone()
    }

    /// Observe lifecycle transitions.
    pub fn state(&self) -> watch::Receiver<LifecycleState> {
        self.lifecycle.subscribe()
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Returns once a shutdown signal arrives and in-flight requests have
    /// drained, or once the grace period elapses with requests still
    /// running. Those requests are abandoned, not awaited.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<ShutdownOutcome, ServerError> {
        let Self {
            router,
            config,
            tracker,
            lifecycle,
            ..
        } = self;

        let addr = listener.local_addr()?;
        let grace_period = config.shutdown.grace_period();
        lifecycle.advance(LifecycleState::Serving);
        tracing::info!(
            address = %addr,
            grace_period_ms = config.shutdown.grace_period_ms,
            "HTTP server starting"
        );

        let (draining_tx, draining_rx) = oneshot::channel();
        let signal_lifecycle = lifecycle.clone();
        let graceful = async move {
            // A closed channel means the coordinator is gone; stop as well.
            let _ = shutdown.recv().await;
            signal_lifecycle.advance(LifecycleState::ShuttingDown);
            let _ = draining_tx.send(());
        };

        let mut serve = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(graceful)
                .await
        });

        // The drain notice is sent before axum finishes, so an idle server
        // may already be done here; the notice must still win.
        tokio::select! {
            biased;
            Ok(()) = draining_rx => {}
            joined = &mut serve => {
                lifecycle.advance(LifecycleState::Stopped);
                tracing::warn!("HTTP server exited without a shutdown request");
                joined??;
                return Ok(ShutdownOutcome::Unrequested);
            }
        }

        tracing::info!(
            in_flight = tracker.active_count(),
            "Stopped accepting connections, draining in-flight requests"
        );

        let outcome = match tokio::time::timeout(grace_period, &mut serve).await {
            Ok(joined) => {
                lifecycle.advance(LifecycleState::Stopped);
                joined??;
                tracing::info!("HTTP server stopped");
                ShutdownOutcome::Drained
            }
            Err(_) => {
                let abandoned = tracker.active_count();
                tracing::warn!(
                    abandoned,
                    grace_period_ms = config.shutdown.grace_period_ms,
                    "Grace period elapsed with requests still in flight"
                );
                serve.abort();
                lifecycle.advance(LifecycleState::Stopped);
                ShutdownOutcome::GracePeriodElapsed { abandoned }
            }
        };

        Ok(outcome)
    }
}
