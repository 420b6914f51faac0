//! Metrics collection and exposition.
//!
//! # Metrics
//! - `tunnel_requests_total` (counter): inbound requests by outcome
//! - `tunnel_request_duration_seconds` (histogram): end-to-end handler latency
//! - `tunnel_upstream_responses_total` (counter): upstream responses by status
//! - `tunnel_upstream_duration_seconds` (histogram): time to upstream response headers
//!
//! Recording is a no-op until a recorder is installed with [`init_metrics`].

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one handled tunnel request.
pub fn record_request(outcome: &'static str, start_time: Instant) {
    counter!("tunnel_requests_total", "outcome" => outcome).increment(1);
    histogram!("tunnel_request_duration_seconds", "outcome" => outcome)
        .record(start_time.elapsed().as_secs_f64());
}

/// Record an upstream response (headers received).
pub fn record_upstream(status: u16, start_time: Instant) {
    counter!("tunnel_upstream_responses_total", "status" => status.to_string()).increment(1);
    histogram!("tunnel_upstream_duration_seconds").record(start_time.elapsed().as_secs_f64());
}
