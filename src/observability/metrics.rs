//! Metrics recording functions for the scan workflow.
//!
//! Without an installed recorder every call is a no-op, so library users and
//! tests never need to set one up.

use std::time::Duration;

/// Register descriptions for the metrics emitted below
pub fn describe_metrics() {
    metrics::describe_counter!(
        "acquisitions_total",
        "Acquisition attempts by channel and outcome"
    );
    metrics::describe_counter!(
        "collaborator_requests_total",
        "Remote service round-trips by service and result"
    );
    metrics::describe_histogram!(
        "collaborator_duration_seconds",
        "Remote service round-trip latency"
    );
    metrics::describe_counter!("product_lookups_total", "Product lookups by result");
    metrics::describe_counter!(
        "circuit_breaker_rejections_total",
        "Requests rejected locally by an open circuit breaker"
    );
}

/// Record the outcome of one acquisition attempt (camera, upload, speech)
pub fn record_acquisition(channel: &'static str, outcome: &'static str) {
    metrics::counter!("acquisitions_total", "channel" => channel, "outcome" => outcome).increment(1);
}

/// Record one collaborator round-trip
pub fn record_collaborator_request(service: &'static str, success: bool, duration: Duration) {
    let result = if success { "success" } else { "failure" };
    metrics::counter!("collaborator_requests_total", "service" => service, "result" => result)
        .increment(1);
    metrics::histogram!("collaborator_duration_seconds", "service" => service)
        .record(duration.as_secs_f64());
}

/// Record the outcome of a product lookup as seen by the workflow
pub fn record_lookup(success: bool, duration: Duration) {
    metrics::counter!("product_lookups_total", "result" => if success { "success" } else { "failure" })
        .increment(1);
    metrics::histogram!("product_lookup_duration_seconds").record(duration.as_secs_f64());
}

/// Record a request that never left the process because the breaker was open
pub fn record_circuit_breaker_open(service: &'static str) {
    metrics::counter!("circuit_breaker_rejections_total", "service" => service).increment(1);
}
