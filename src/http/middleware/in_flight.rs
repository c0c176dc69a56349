//! In-flight request tracking.
//!
//! # Responsibilities
//! - Count requests currently being served
//! - Record per-request metrics on completion
//! - Report how many requests a timed-out shutdown abandons

use axum::{
    body::Body,
    extract::{MatchedPath, State},
    http::Request,
    middleware::Next,
    response::IntoResponse,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::observability::metrics;

/// Route label for requests no route matched.
pub const UNMATCHED_ROUTE: &str = "unmatched";

/// Tracks requests that have started but not yet produced a response.
#[derive(Debug, Clone, Default)]
pub struct RequestTracker {
    active_count: Arc<AtomicU64>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new in-flight request. Returns a guard that decrements on drop.
    pub fn track(&self) -> RequestGuard {
        let count = self.active_count.fetch_add(1, Ordering::SeqCst) + 1;
        metrics::set_in_flight(count);
        RequestGuard {
            active_count: Arc::clone(&self.active_count),
        }
    }

    /// Get current in-flight request count.
    pub fn active_count(&self) -> u64 {
        self.active_count.load(Ordering::SeqCst)
    }
}

/// Guard that tracks a request's lifetime.
/// Decrements the in-flight count when dropped, including when the
/// request future is cancelled.
#[derive(Debug)]
pub struct RequestGuard {
    active_count: Arc<AtomicU64>,
}

impl Drop for RequestGuard {
    fn drop(&mut self) {
        let count = self.active_count.fetch_sub(1, Ordering::SeqCst) - 1;
        metrics::set_in_flight(count);
    }
}

/// Route template the request was dispatched to, or [`UNMATCHED_ROUTE`].
/// Raw paths are never used as labels.
pub fn route_label<B>(req: &Request<B>) -> String {
    req.extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_ROUTE.to_string())
}

pub async fn track_in_flight(
    State(tracker): State<RequestTracker>,
    req: Request<Body>,
    next: Next,
) -> impl IntoResponse {
    let _guard = tracker.track();
    let start = Instant::now();
    let method = req.method().to_string();
    let route = route_label(&req);

    let response = next.run(req).await;

    metrics::record_request(&method, &route, response.status().as_u16(), start);
    response
}
