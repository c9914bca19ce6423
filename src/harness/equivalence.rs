//! Linear/trie equivalence runs.
//!
//! # Responsibilities
//! - Load one corpus into both registries and time registration
//! - Issue the same requests against both and time lookups
//! - Compare match counts and the winning route of every request
//!
//! # Design Decisions
//! - Lookups are timed in a tight loop with results kept, so comparison
//!   does not add a second pass to the measured section
//! - Only the first few mismatches are kept in the report; the count is exact

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::config::RouterConfig;
use crate::harness::corpus::{Corpus, CorpusGenerator};
use crate::harness::HarnessError;
use crate::observability::metrics;
use crate::routing::{HttpMethod, LinearRegistry, Route, RouteMatch, RouteMatcher, TrieRegistry};

/// Mismatches kept verbatim in a report.
const MAX_REPORTED_MISMATCHES: usize = 20;

/// Timing and outcome of one registry over a corpus.
#[derive(Debug, Clone, Serialize)]
pub struct RegistryRun {
    pub registry: &'static str,
    pub registered: usize,
    pub rejected: usize,
    pub registration_ms: f64,
    pub avg_match_ns: f64,
    pub matched: usize,
}

/// A request the two registries resolved differently.
#[derive(Debug, Clone, Serialize)]
pub struct Mismatch {
    pub method: HttpMethod,
    pub path: String,
    pub linear: Option<String>,
    pub trie: Option<String>,
}

/// Result of running one corpus through both registries.
#[derive(Debug, Clone, Serialize)]
pub struct EquivalenceReport {
    pub route_count: usize,
    pub request_count: usize,
    /// Requests built from a registered pattern.
    pub expected_matches: usize,
    pub linear: RegistryRun,
    pub trie: RegistryRun,
    pub mismatch_count: usize,
    pub mismatches: Vec<Mismatch>,
    /// Linear average lookup latency over trie average lookup latency.
    pub speedup: f64,
}

impl EquivalenceReport {
    /// Both registries matched the same requests with the same winners.
    pub fn is_equivalent(&self) -> bool {
        self.mismatch_count == 0 && self.linear.matched == self.trie.matched
    }
}

struct Timed {
    run: RegistryRun,
    outcomes: Vec<Option<RouteMatch<Route>>>,
}

fn drive<M>(mut registry: M, corpus: &Corpus) -> Timed
where
    M: RouteMatcher<Route>,
{
    let started = Instant::now();
    let summary = registry.register_many(corpus.routes.iter().map(Arc::clone));
    let registration = started.elapsed();

    let started = Instant::now();
    let outcomes: Vec<_> = corpus
        .requests
        .iter()
        .map(|request| registry.match_route(request.method, &request.path))
        .collect();
    let matching = started.elapsed();

    let avg_match_ns = average_ns(matching, outcomes.len());
    let avg_match = Duration::from_secs_f64(avg_match_ns / 1e9);
    let matched = outcomes.iter().filter(|m| m.is_some()).count();
    metrics::record_harness_run(registry.name(), matched, registration, avg_match);

    Timed {
        run: RegistryRun {
            registry: registry.name(),
            registered: summary.registered,
            rejected: summary.rejected.len(),
            registration_ms: registration.as_secs_f64() * 1_000.0,
            avg_match_ns,
            matched,
        },
        outcomes,
    }
}

/// Mean nanoseconds per item; zero when nothing ran.
fn average_ns(total: Duration, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    total.as_secs_f64() * 1e9 / count as f64
}

fn describe(m: &Option<RouteMatch<Route>>) -> Option<String> {
    m.as_ref().map(|m| {
        let (method, path) = m.identity();
        format!("{} {}", method, path)
    })
}

/// Run `corpus` through a fresh linear and trie registry and compare.
pub fn run_equivalence(corpus: &Corpus) -> EquivalenceReport {
    let linear = drive(LinearRegistry::<Route>::new(), corpus);
    let trie = drive(TrieRegistry::<Route>::new(), corpus);

    let mut mismatch_count = 0;
    let mut mismatches = Vec::new();
    for ((request, l), t) in corpus.requests.iter().zip(&linear.outcomes).zip(&trie.outcomes) {
        let same = match (l, t) {
            (Some(l), Some(t)) => l.identity() == t.identity(),
            (None, None) => true,
            _ => false,
        };
        if same {
            continue;
        }
        mismatch_count += 1;
        if mismatches.len() < MAX_REPORTED_MISMATCHES {
            mismatches.push(Mismatch {
                method: request.method,
                path: request.path.clone(),
                linear: describe(l),
                trie: describe(t),
            });
        }
    }

    let speedup = if trie.run.avg_match_ns > 0.0 {
        linear.run.avg_match_ns / trie.run.avg_match_ns
    } else {
        0.0
    };

    let report = EquivalenceReport {
        route_count: corpus.routes.len(),
        request_count: corpus.requests.len(),
        expected_matches: corpus.derived_requests(),
        linear: linear.run,
        trie: trie.run,
        mismatch_count,
        mismatches,
        speedup,
    };

    if report.is_equivalent() {
        tracing::info!(
            routes = report.route_count,
            requests = report.request_count,
            matched = report.trie.matched,
            speedup = report.speedup,
            "Registries agree"
        );
    } else {
        tracing::warn!(
            routes = report.route_count,
            mismatches = report.mismatch_count,
            linear_matched = report.linear.matched,
            trie_matched = report.trie.matched,
            "Registries disagree"
        );
    }
    report
}

/// One equivalence run per configured route count.
///
/// Each size gets its own generator seeded from the config, so a size's
/// corpus does not depend on which sizes ran before it.
pub fn run_scaling(config: &RouterConfig) -> Result<Vec<EquivalenceReport>, HarnessError> {
    let mut reports = Vec::with_capacity(config.harness.route_counts.len());
    for &route_count in &config.harness.route_counts {
        let corpus =
            CorpusGenerator::new(&config.corpus)?.generate(route_count, config.harness.request_count);
        reports.push(run_equivalence(&corpus));
    }
    Ok(reports)
}
