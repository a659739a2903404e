//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define service metrics (requests, failures, responses by status)
//! - Expose a Prometheus-compatible rendering for `/metrics`
//! - Count log records the remote dispatcher could not deliver
//!
//! # Metrics
//! - `hello_world_requests_total` (counter): total API requests
//! - `hello_world_requests_failed_total` (counter): API requests whose login failed
//! - `hello_world_http_requests_total` (counter): HTTP responses by `code`
//! - `hello_world_log_dispatch_dropped_total` (counter): records dropped on a full queue
//! - `hello_world_log_dispatch_failed_total` (counter): records the collector did not accept
//!
//! # Design Decisions
//! - Low-overhead metric updates through the `metrics` facade
//! - A single recorder installed at startup; the handle renders for scrapes

use metrics::{counter, describe_counter};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

pub const REQUESTS_TOTAL: &str = "hello_world_requests_total";
pub const REQUESTS_FAILED_TOTAL: &str = "hello_world_requests_failed_total";
pub const HTTP_REQUESTS_TOTAL: &str = "hello_world_http_requests_total";
pub const LOG_DISPATCH_DROPPED_TOTAL: &str = "hello_world_log_dispatch_dropped_total";
pub const LOG_DISPATCH_FAILED_TOTAL: &str = "hello_world_log_dispatch_failed_total";

/// Install the Prometheus recorder as the process-wide metrics recorder.
///
/// Can succeed only once per process.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    describe_metrics();
    tracing::info!("Metrics recorder installed");
    Ok(handle)
}

/// Register help text for every metric with the current recorder.
pub fn describe_metrics() {
    describe_counter!(REQUESTS_TOTAL, "Total number of API requests");
    describe_counter!(REQUESTS_FAILED_TOTAL, "Total number of API requests failures");
    describe_counter!(HTTP_REQUESTS_TOTAL, "Total number of HTTP responses by status codes");
    describe_counter!(LOG_DISPATCH_DROPPED_TOTAL, "Log records dropped because the dispatch queue was full");
    describe_counter!(LOG_DISPATCH_FAILED_TOTAL, "Log records the remote collector did not receive");
}

pub fn record_request() {
    counter!(REQUESTS_TOTAL).increment(1);
}

pub fn record_request_failure() {
    counter!(REQUESTS_FAILED_TOTAL).increment(1);
}

pub fn record_http_response(status: u16) {
    counter!(HTTP_REQUESTS_TOTAL, "code" => status.to_string()).increment(1);
}

pub fn record_dispatch_dropped() {
    counter!(LOG_DISPATCH_DROPPED_TOTAL).increment(1);
}

pub fn record_dispatch_failure() {
    counter!(LOG_DISPATCH_FAILED_TOTAL).increment(1);
}
