//! Prometheus counters for the dashboard API.
//!
//! Recording is a no-op until a recorder is installed, so handlers and tests
//! can call these unconditionally.

use metrics::counter;

/// One request served by `endpoint`.
pub fn record_request(endpoint: &'static str) {
    counter!("api_requests_total", "endpoint" => endpoint).increment(1);
}

/// An upstream call to `source` failed and was degraded.
pub fn record_upstream_failure(source: &'static str) {
    counter!("upstream_failures_total", "source" => source).increment(1);
}

/// Outcome of a tile proxy request: "ok", "invalid" or "upstream_error".
pub fn record_tile(outcome: &'static str) {
    counter!("gibs_tiles_total", "outcome" => outcome).increment(1);
}
