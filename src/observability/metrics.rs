//! Metrics collection.
//!
//! # Metrics
//! - `router_routes_registered` (gauge): routes held, by registry and kind
//! - `router_routes_rejected_total` (counter): registrations refused
//! - `router_harness_matches_total` (counter): matched requests per harness run
//! - `router_match_duration_seconds` (histogram): average lookup latency per run
//! - `router_registration_duration_seconds` (histogram): time to load a corpus

use std::time::Duration;

use ::metrics::{counter, gauge, histogram};

use crate::routing::RouteStats;

/// Record registry counters after a bulk registration.
pub fn record_registration(registry: &'static str, stats: &RouteStats, rejected: usize) {
    gauge!("router_routes_registered", "registry" => registry, "kind" => "static")
        .set(stats.static_routes as f64);
    gauge!("router_routes_registered", "registry" => registry, "kind" => "parameterized")
        .set(stats.parameterized_routes as f64);
    gauge!("router_routes_registered", "registry" => registry, "kind" => "wildcard")
        .set(stats.wildcard_routes as f64);

    if rejected > 0 {
        counter!("router_routes_rejected_total", "registry" => registry).increment(rejected as u64);
    }
}

/// Record the outcome of one registry's harness pass.
pub fn record_harness_run(
    registry: &'static str,
    matched: usize,
    registration: Duration,
    avg_match: Duration,
) {
    counter!("router_harness_matches_total", "registry" => registry).increment(matched as u64);
    histogram!("router_registration_duration_seconds", "registry" => registry)
        .record(registration.as_secs_f64());
    histogram!("router_match_duration_seconds", "registry" => registry)
        .record(avg_match.as_secs_f64());
}
