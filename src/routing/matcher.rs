//! Shared matching contract.
//!
//! # Responsibilities
//! - Define what the registries consume (`RouteDefinition`)
//! - Define what they produce (`RouteMatch`)
//! - Define the `RouteMatcher` trait both registries implement
//!
//! # Design Decisions
//! - Routes are stored behind `Arc` so a match hands out a cheap reference
//! - Lookups are total: an unknown method is "no match", never an error
//! - Only registration can fail

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::observability::metrics;
use crate::routing::error::{RouteError, RouteResult};
use crate::routing::method::HttpMethod;
use crate::routing::pattern::{PathCategory, STATIC_SCORE, WILDCARD_SCORE};

/// Anything the registries can route to.
///
/// Only the method and path are ever inspected; the rest of the definition is
/// opaque payload.
pub trait RouteDefinition: Send + Sync {
    fn method(&self) -> HttpMethod;
    fn path(&self) -> &str;
}

/// A plain route definition carrying an opaque payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route<T = ()> {
    pub method: HttpMethod,
    pub path: String,
    pub payload: T,
}

impl Route<()> {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            payload: (),
        }
    }
}

impl<T> Route<T> {
    pub fn with_payload(method: HttpMethod, path: impl Into<String>, payload: T) -> Self {
        Self {
            method,
            path: path.into(),
            payload,
        }
    }
}

impl<T: Send + Sync> RouteDefinition for Route<T> {
    fn method(&self) -> HttpMethod {
        self.method
    }

    fn path(&self) -> &str {
        &self.path
    }
}

/// How a route matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Exact,
    Parameterized,
    Wildcard,
}

impl From<PathCategory> for MatchType {
    fn from(category: PathCategory) -> Self {
        match category {
            PathCategory::Static => MatchType::Exact,
            PathCategory::Parameterized => MatchType::Parameterized,
            PathCategory::Wildcard => MatchType::Wildcard,
        }
    }
}

/// A resolved route with its extracted path parameters.
#[derive(Debug)]
pub struct RouteMatch<R> {
    pub route: Arc<R>,
    pub path_params: HashMap<String, String>,
    pub match_type: MatchType,
    pub match_score: i32,
}

impl<R> Clone for RouteMatch<R> {
    fn clone(&self) -> Self {
        Self {
            route: Arc::clone(&self.route),
            path_params: self.path_params.clone(),
            match_type: self.match_type,
            match_score: self.match_score,
        }
    }
}

impl<R: RouteDefinition> RouteMatch<R> {
    pub(crate) fn exact(route: Arc<R>) -> Self {
        Self {
            route,
            path_params: HashMap::new(),
            match_type: MatchType::Exact,
            match_score: STATIC_SCORE,
        }
    }

    pub(crate) fn wildcard(route: Arc<R>) -> Self {
        Self {
            route,
            path_params: HashMap::new(),
            match_type: MatchType::Wildcard,
            match_score: WILDCARD_SCORE,
        }
    }

    /// Identity of the winning route: method plus registered pattern.
    pub fn identity(&self) -> (HttpMethod, &str) {
        (self.route.method(), self.route.path())
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.path_params.get(name).map(String::as_str)
    }
}

/// Per-registry route counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RouteStats {
    pub total: usize,
    pub static_routes: usize,
    pub parameterized_routes: usize,
    pub wildcard_routes: usize,
}

impl RouteStats {
    pub(crate) fn record(&mut self, category: PathCategory) {
        self.total += 1;
        match category {
            PathCategory::Static => self.static_routes += 1,
            PathCategory::Parameterized => self.parameterized_routes += 1,
            PathCategory::Wildcard => self.wildcard_routes += 1,
        }
    }
}

/// Outcome of a bulk registration.
#[derive(Debug, Default)]
pub struct RegistrationSummary {
    /// Routes accepted by this call.
    pub registered: usize,
    /// Counters of the registry after the call.
    pub stats: RouteStats,
    /// Routes refused, with the reason.
    pub rejected: Vec<RouteError>,
}

impl RegistrationSummary {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Common contract of the linear and trie registries.
pub trait RouteMatcher<R: RouteDefinition>: Send + Sync {
    /// Short name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Add one route.
    fn register(&mut self, route: Arc<R>) -> RouteResult<()>;

    /// Best match for a request, if any.
    fn match_route(&self, method: HttpMethod, path: &str) -> Option<RouteMatch<R>>;

    /// Every match for a request, best first. Equal scores keep registration order.
    fn find_all_matches(&self, method: HttpMethod, path: &str) -> Vec<RouteMatch<R>>;

    /// Registered routes for one method, or all of them.
    fn get_routes(&self, method: Option<HttpMethod>) -> Vec<Arc<R>>;

    fn stats(&self) -> RouteStats;

    /// Drop every route and reset counters.
    fn clear(&mut self);

    /// Register a batch. Rejected routes are reported, the rest still land.
    fn register_many<I>(&mut self, routes: I) -> RegistrationSummary
    where
        I: IntoIterator<Item = Arc<R>>,
        Self: Sized,
    {
        let mut summary = RegistrationSummary::default();
        for route in routes {
            match self.register(route) {
                Ok(()) => summary.registered += 1,
                Err(e) => {
                    tracing::warn!(registry = self.name(), error = %e, "Route rejected");
                    summary.rejected.push(e);
                }
            }
        }
        summary.stats = self.stats();
        metrics::record_registration(self.name(), &summary.stats, summary.rejected.len());

        tracing::info!(
            registry = self.name(),
            registered = summary.registered,
            rejected = summary.rejected.len(),
            static_routes = summary.stats.static_routes,
            parameterized_routes = summary.stats.parameterized_routes,
            wildcard_routes = summary.stats.wildcard_routes,
            "Routes registered"
        );
        summary
    }

    /// Like [`RouteMatcher::match_route`], parsing the method first.
    /// Unsupported methods simply do not match.
    fn match_str(&self, method: &str, path: &str) -> Option<RouteMatch<R>> {
        let method = method.parse().ok()?;
        self.match_route(method, path)
    }

    /// Like [`RouteMatcher::find_all_matches`], parsing the method first.
    fn find_all_str(&self, method: &str, path: &str) -> Vec<RouteMatch<R>> {
        match method.parse() {
            Ok(method) => self.find_all_matches(method, path),
            Err(_) => Vec::new(),
        }
    }
}

/// Pick the best candidate: highest score, earliest on ties.
pub(crate) fn best_candidate<R, K: Ord>(candidates: Vec<(K, RouteMatch<R>)>) -> Option<RouteMatch<R>> {
    let mut best: Option<(K, RouteMatch<R>)> = None;
    for (order, candidate) in candidates {
        let better = match &best {
            None => true,
            Some((best_order, current)) => {
                candidate.match_score > current.match_score
                    || (candidate.match_score == current.match_score && order < *best_order)
            }
        };
        if better {
            best = Some((order, candidate));
        }
    }
    best.map(|(_, m)| m)
}

/// Sort candidates best first, earliest first on ties.
pub(crate) fn rank_candidates<R, K: Ord>(mut candidates: Vec<(K, RouteMatch<R>)>) -> Vec<RouteMatch<R>> {
    candidates.sort_by(|(oa, a), (ob, b)| b.match_score.cmp(&a.match_score).then_with(|| oa.cmp(ob)));
    candidates.into_iter().map(|(_, m)| m).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(path: &str, score: i32) -> RouteMatch<Route> {
        RouteMatch {
            route: Arc::new(Route::new(HttpMethod::Get, path)),
            path_params: HashMap::new(),
            match_type: MatchType::Parameterized,
            match_score: score,
        }
    }

    #[test]
    fn test_best_candidate_prefers_score_then_order() {
        let best = best_candidate(vec![
            (2usize, candidate("/b", 59)),
            (1usize, candidate("/a", 59)),
            (0usize, candidate("/c", 10)),
        ])
        .unwrap();
        assert_eq!(best.route.path, "/a");
        assert!(best_candidate::<Route, usize>(Vec::new()).is_none());
    }

    #[test]
    fn test_rank_candidates_stable() {
        let ranked = rank_candidates(vec![
            (0usize, candidate("/w", 10)),
            (1usize, candidate("/p1", 59)),
            (2usize, candidate("/s", 100)),
            (3usize, candidate("/p2", 59)),
        ]);
        let paths: Vec<_> = ranked.iter().map(|m| m.route.path.as_str()).collect();
        assert_eq!(paths, vec!["/s", "/p1", "/p2", "/w"]);
    }

    #[test]
    fn test_stats_record() {
        let mut stats = RouteStats::default();
        stats.record(PathCategory::Static);
        stats.record(PathCategory::Wildcard);
        stats.record(PathCategory::Parameterized);
        stats.record(PathCategory::Parameterized);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.parameterized_routes, 2);
    }
}
