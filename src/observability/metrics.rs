//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): outbound calls by method, status
//! - `gateway_request_duration_seconds` (histogram): per-attempt latency
//! - `gateway_retries_total` (counter): retries by triggering status
//! - `gateway_rate_limited_total` (counter): backstop waits and hard rejections
//! - `gateway_writes_blocked_total` (counter): writes refused in read-only mode
//! - `gateway_module_health` (gauge): 1=healthy, 0=unhealthy, per module
//!
//! Without an installed recorder every call here is a no-op.

use std::net::SocketAddr;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use tokio::time::Instant;

/// Install the Prometheus exporter on `addr`. Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, status: u16, started: Instant) {
    counter!(
        "gateway_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("gateway_request_duration_seconds", "method" => method.to_string())
        .record(started.elapsed().as_secs_f64());
}

pub fn record_retry(status: u16) {
    counter!("gateway_retries_total", "status" => status.to_string()).increment(1);
}

pub fn record_rate_limited(stage: &'static str) {
    counter!("gateway_rate_limited_total", "stage" => stage).increment(1);
}

pub fn record_write_blocked(method: &str) {
    counter!("gateway_writes_blocked_total", "method" => method.to_string()).increment(1);
}

pub fn record_module_health(module: &str, healthy: bool) {
    gauge!("gateway_module_health", "module" => module.to_string())
        .set(if healthy { 1.0 } else { 0.0 });
}
