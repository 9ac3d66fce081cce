//! Metrics collection and exposition.
//!
//! # Metrics
//! - `echo_requests_total` (counter): echoed requests by method, status
//! - `echo_request_duration_seconds` (histogram): handling latency by method
//! - `echo_body_kind_total` (counter): body outcomes (json, data, empty, dropped)
//!
//! Recording is always safe: without an installed recorder the macros are
//! no-ops, so the exporter is only started when `metrics_enabled` is set.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder};

const REQUEST_DURATION: &str = "echo_request_duration_seconds";

const LATENCY_BUCKETS: &[f64] = &[
    0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0,
];

/// Install the Prometheus recorder and serve it on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .set_buckets_for_metric(Matcher::Full(REQUEST_DURATION.to_string()), LATENCY_BUCKETS)?
        .install()?;

    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one echoed request.
pub fn record_request(method: &str, status: u16, started: Instant) {
    let method = method.to_string();
    ::metrics::counter!(
        "echo_requests_total",
        "method" => method.clone(),
        "status" => status.to_string()
    )
    .increment(1);
    ::metrics::histogram!(REQUEST_DURATION, "method" => method)
        .record(started.elapsed().as_secs_f64());
}

/// Record how a request body was represented.
pub fn record_body_kind(kind: &'static str) {
    ::metrics::counter!("echo_body_kind_total", "kind" => kind).increment(1);
}
