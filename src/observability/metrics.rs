//! Metrics collection and exposition.
//!
//! # Metrics
//! - `kv_requests_total` (counter): requests by method, route, status
//! - `kv_request_duration_seconds` (histogram): latency distribution
//! - `kv_requests_in_flight` (gauge): requests currently being served
//! - `kv_store_operations_total` (counter): store calls by op, outcome
//!
//! Without an installed recorder every call here is a no-op.

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Instant;

/// Start the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_request(method: &str, route: &str, status: u16, start: Instant) {
    let status = status.to_string();
    counter!(
        "kv_requests_total",
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status.clone()
    )
    .increment(1);
    histogram!(
        "kv_request_duration_seconds",
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status
    )
    .record(start.elapsed().as_secs_f64());
}

pub fn set_in_flight(count: u64) {
    gauge!("kv_requests_in_flight").set(count as f64);
}

pub fn record_store_op(op: &'static str, outcome: &'static str) {
    counter!("kv_store_operations_total", "op" => op, "outcome" => outcome).increment(1);
}
