//! Metrics collection and exposition.
//!
//! # Metrics
//! - `bridge_requests_total` (counter): replies sent, by status
//! - `bridge_upstream_duration_seconds` (histogram): repository call latency
//! - `bridge_internal_errors_total` (counter): recovered failures, by stage
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Labels are low-cardinality (status code, stage name)

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with an HTTP listener on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a reply sent by the bridge.
pub fn record_reply(status: u16) {
    metrics::counter!("bridge_requests_total", "status" => status.to_string()).increment(1);
}

/// Record a completed repository call.
pub fn record_upstream(status: u16, start: Instant) {
    metrics::histogram!("bridge_upstream_duration_seconds", "status" => status.to_string())
        .record(start.elapsed().as_secs_f64());
}

/// Record a failure that was mapped to the internal error response.
pub fn record_internal_error(stage: &'static str) {
    metrics::counter!("bridge_internal_errors_total", "stage" => stage).increment(1);
}
