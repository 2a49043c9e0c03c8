//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_requests_total` (counter): requests by outcome
//!   (terminal, forwarded, denylisted)
//! - `relay_malformed_log_total` (counter): inbound hop logs read as empty
//! - `relay_hop_status_total` (counter): status recorded for the next hop
//! - `relay_outbound_duration_seconds` (histogram): outbound call latency
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Prometheus endpoint is opt-in

use std::net::SocketAddr;
use std::time::Duration;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_request(outcome: &'static str) {
    metrics::counter!("relay_requests_total", "outcome" => outcome).increment(1);
}

pub fn record_malformed_log() {
    metrics::counter!("relay_malformed_log_total").increment(1);
}

pub fn record_hop_status(status: u16) {
    metrics::counter!("relay_hop_status_total", "status" => status.to_string()).increment(1);
}

pub fn record_outbound(elapsed: Duration) {
    metrics::histogram!("relay_outbound_duration_seconds").record(elapsed.as_secs_f64());
}
