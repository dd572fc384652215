//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_requests_total` (counter): finished requests by method, status,
//!   and lane (origin | prerender | fallback)
//! - `proxy_request_duration_seconds` (histogram): latency by lane
//! - `prerender_attempts_total` (counter): render attempts by outcome

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on its own listener.
///
/// Failure to install is logged and otherwise ignored; the proxy keeps
/// serving traffic without exposition.
pub fn init_metrics(address: SocketAddr) {
    match PrometheusBuilder::new()
        .with_http_listener(address)
        .install()
    {
        Ok(()) => tracing::info!(address = %address, "metrics exporter listening"),
        Err(e) => {
            tracing::error!(address = %address, error = %e, "failed to install metrics exporter")
        }
    }
}

/// Record one finished request.
pub fn record_request(method: &str, status: u16, lane: &'static str, start: Instant) {
    counter!(
        "proxy_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "lane" => lane
    )
    .increment(1);
    histogram!("proxy_request_duration_seconds", "lane" => lane)
        .record(start.elapsed().as_secs_f64());
}

/// Record one render attempt against the middleware.
pub fn record_render_attempt(succeeded: bool) {
    let outcome = if succeeded { "success" } else { "failure" };
    counter!("prerender_attempts_total", "outcome" => outcome).increment(1);
}
