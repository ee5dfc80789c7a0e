//! Metrics collection and exposition.
//!
//! # Metrics
//! - `jester_requests_total` (counter): dispatches by method and outcome
//!   (`matched`, `fallback`, `unmatched`, `error`)
//! - `jester_request_duration_seconds` (histogram): dispatch latency
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed
//! - Method labels come from a fixed set; extension methods share `other`
//! - Prometheus exposition runs on its own listener

use std::net::SocketAddr;
use std::time::Instant;

use axum::http::Method;
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Bounded label for a request method.
pub fn method_label(method: &Method) -> &'static str {
    match method.as_str() {
        "GET" => "GET",
        "POST" => "POST",
        "PUT" => "PUT",
        "PATCH" => "PATCH",
        "DELETE" => "DELETE",
        "HEAD" => "HEAD",
        "OPTIONS" => "OPTIONS",
        _ => "other",
    }
}

/// Record one dispatch.
pub fn record_dispatch(method: &Method, outcome: &'static str, start_time: Instant) {
    let labels = [("method", method_label(method)), ("outcome", outcome)];
    metrics::counter!("jester_requests_total", &labels).increment(1);
    metrics::histogram!("jester_request_duration_seconds", &labels)
        .record(start_time.elapsed().as_secs_f64());
}
