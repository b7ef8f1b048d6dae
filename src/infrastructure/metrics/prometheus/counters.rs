use metrics::{counter, histogram};
use std::time::Instant;

/// Increment the counter for issued wallet challenges.
pub fn increment_challenge_issued() {
    counter!("auth_challenges_issued_total").increment(1);
}

/// Increment the login counter for an attempt outcome.
pub fn increment_login(outcome: &str) {
    counter!("auth_logins_total", "outcome" => outcome.to_string()).increment(1);
}

/// Track HTTP request latency using a histogram.
pub fn track_http_request(start: Instant) {
    let elapsed = start.elapsed();
    histogram!("http_request_duration_seconds").record(elapsed);
}
