//! Metrics collection and exposition.
//!
//! # Metrics
//! - `api_requests_total` (counter): requests by method, status
//! - `api_request_duration_seconds` (histogram): latency distribution
//! - `api_guard_rejections_total` (counter): pipeline short-circuits by interceptor
//! - `api_cache_lookups_total` (counter): cache hits and misses
//! - `api_cache_entries` (gauge): stored cache entries
//!
//! Without an installed recorder every call is a no-op, which keeps unit
//! tests free of exporter setup.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    let method = method.to_string();
    let status = status.to_string();
    counter!("api_requests_total", "method" => method.clone(), "status" => status.clone())
        .increment(1);
    histogram!("api_request_duration_seconds", "method" => method, "status" => status)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_guard_rejection(interceptor: &'static str) {
    counter!("api_guard_rejections_total", "interceptor" => interceptor).increment(1);
}

pub fn record_cache_lookup(hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    counter!("api_cache_lookups_total", "result" => result).increment(1);
}

pub fn record_cache_size(size: usize) {
    gauge!("api_cache_entries").set(size as f64);
}
