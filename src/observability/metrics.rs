//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_requests_total` (counter): requests by method, status
//! - `proxy_request_duration_seconds` (histogram): end-to-end latency
//! - `proxy_session_bootstraps_total` (counter): session-init calls by outcome
//! - `proxy_session_bootstrap_duration_seconds` (histogram): session-init latency

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one handled bill request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    let method = method.to_string();
    let status = status.to_string();
    ::metrics::counter!("proxy_requests_total", "method" => method.clone(), "status" => status.clone())
        .increment(1);
    ::metrics::histogram!("proxy_request_duration_seconds", "method" => method, "status" => status)
        .record(start.elapsed().as_secs_f64());
}

/// Record one session-init call; `outcome` is `ok`, `rejected` or `transport_error`.
pub fn record_bootstrap(outcome: &'static str, start: Instant) {
    ::metrics::counter!("proxy_session_bootstraps_total", "outcome" => outcome).increment(1);
    ::metrics::histogram!("proxy_session_bootstrap_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}
