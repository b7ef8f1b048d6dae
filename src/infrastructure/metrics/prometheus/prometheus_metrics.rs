//! Prometheus metrics implementation.
//!
//! Concrete implementation of the `Metrics` trait delegating to utility
//! functions in sibling modules (`counters.rs`, `recorder.rs`) which do
//! the actual collection via the global `metrics` crate registry.

use crate::domain::Metrics;
use std::time::Instant;

/// Prometheus-based metrics implementation.
///
/// Intentionally empty: metrics are registered on first use through the
/// `counter!()`/`histogram!()` macros, and the global PrometheusHandle in
/// `recorder.rs` owns collection and rendering.
pub struct PrometheusMetrics {
    // Empty - uses global metrics registry pattern
}

impl PrometheusMetrics {
    pub fn new() -> Self {
        tracing::info!("Creating Prometheus metrics");
        PrometheusMetrics {}
    }
}

impl Metrics for PrometheusMetrics {
    fn render(&self) -> String {
        super::render_metrics()
    }

    fn record_challenge_issued(&self) {
        super::increment_challenge_issued();
    }

    fn record_login(&self, outcome: &str) {
        super::increment_login(outcome);
    }

    fn record_http_request(&self, start: Instant, _path: &str, _method: &str, _status: u16) {
        super::track_http_request(start);
    }
}
