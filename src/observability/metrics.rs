//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define gateway metrics (requests, latency)
//! - Expose Prometheus-compatible metrics endpoint when enabled
//!
//! # Metrics
//! - `gateway_requests_total` (counter): by pipeline, method, status, outcome
//! - `gateway_request_duration_seconds` (histogram): by pipeline
//!
//! Without an installed recorder the macros are no-ops.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener. Must run inside
/// the Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one finished request.
pub fn record_request(pipeline: &str, method: &str, status: u16, outcome: &'static str, start: Instant) {
    metrics::counter!(
        "gateway_requests_total",
        "pipeline" => pipeline.to_string(),
        "method" => method.to_string(),
        "status" => status.to_string(),
        "outcome" => outcome
    )
    .increment(1);

    metrics::histogram!(
        "gateway_request_duration_seconds",
        "pipeline" => pipeline.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}
