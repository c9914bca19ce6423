//! Linear pattern-scan registry.
//!
//! # Responsibilities
//! - Keep routes per method in registration order
//! - Resolve a request by exact string check, then by scanning compiled patterns
//!
//! # Design Decisions
//! - Patterns are compiled once at registration and cached by raw string
//! - Matching cost grows with the number of routes for the method
//! - The exact pass runs first: a stored path equal to the request string wins
//!   outright, even if it contains template syntax

use std::collections::HashMap;
use std::sync::Arc;

use crate::routing::error::RouteResult;
use crate::routing::matcher::{
    best_candidate, rank_candidates, RouteDefinition, RouteMatch, RouteMatcher, RouteStats,
};
use crate::routing::method::HttpMethod;
use crate::routing::pattern::{normalize_path, CompiledPattern, PatternCache};

struct LinearEntry<R> {
    route: Arc<R>,
    pattern: Arc<CompiledPattern>,
}

impl<R: RouteDefinition> LinearEntry<R> {
    fn evaluate(&self, canonical_path: &str) -> Option<RouteMatch<R>> {
        let path_params = self.pattern.captures(canonical_path)?;
        Some(RouteMatch {
            route: Arc::clone(&self.route),
            path_params,
            match_type: self.pattern.category().into(),
            match_score: self.pattern.score(),
        })
    }
}

/// Registry that scans every route registered for the request method.
pub struct LinearRegistry<R> {
    routes: HashMap<HttpMethod, Vec<LinearEntry<R>>>,
    patterns: PatternCache,
    stats: RouteStats,
}

impl<R: RouteDefinition> LinearRegistry<R> {
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
            patterns: PatternCache::new(),
            stats: RouteStats::default(),
        }
    }

    /// The cached compilation of a registered pattern.
    pub fn compiled_pattern(&self, path: &str) -> Option<Arc<CompiledPattern>> {
        self.patterns.get(path).cloned()
    }

    /// Number of distinct compiled patterns.
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }
}

impl<R: RouteDefinition> Default for LinearRegistry<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RouteDefinition> RouteMatcher<R> for LinearRegistry<R> {
    fn name(&self) -> &'static str {
        "linear"
    }

    fn register(&mut self, route: Arc<R>) -> RouteResult<()> {
        let pattern = self.patterns.get_or_compile(route.path())?;
        self.stats.record(pattern.category());

        tracing::debug!(
            method = %route.method(),
            path = route.path(),
            category = ?pattern.category(),
            "Registered route"
        );

        self.routes
            .entry(route.method())
            .or_default()
            .push(LinearEntry { route, pattern });
        Ok(())
    }

    fn match_route(&self, method: HttpMethod, path: &str) -> Option<RouteMatch<R>> {
        let entries = self.routes.get(&method)?;

        if let Some(entry) = entries.iter().find(|e| e.route.path() == path) {
            return Some(RouteMatch::exact(Arc::clone(&entry.route)));
        }

        let canonical = normalize_path(path);
        let candidates = entries
            .iter()
            .enumerate()
            .filter_map(|(order, entry)| entry.evaluate(&canonical).map(|m| (order, m)))
            .collect();
        best_candidate(candidates)
    }

    fn find_all_matches(&self, method: HttpMethod, path: &str) -> Vec<RouteMatch<R>> {
        let Some(entries) = self.routes.get(&method) else {
            return Vec::new();
        };

        let canonical = normalize_path(path);
        let candidates = entries
            .iter()
            .enumerate()
            .filter_map(|(order, entry)| {
                if entry.route.path() == path {
                    Some((order, RouteMatch::exact(Arc::clone(&entry.route))))
                } else {
                    entry.evaluate(&canonical).map(|m| (order, m))
                }
            })
            .collect();
        rank_candidates(candidates)
    }

    fn get_routes(&self, method: Option<HttpMethod>) -> Vec<Arc<R>> {
        let methods: Vec<HttpMethod> = match method {
            Some(m) => vec![m],
            None => HttpMethod::ALL.to_vec(),
        };

        methods
            .iter()
            .filter_map(|m| self.routes.get(m))
            .flat_map(|entries| entries.iter().map(|e| Arc::clone(&e.route)))
            .collect()
    }

    fn stats(&self) -> RouteStats {
        self.stats
    }

    fn clear(&mut self) {
        self.routes.clear();
        self.patterns.clear();
        self.stats = RouteStats::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::matcher::{MatchType, Route};
    use crate::routing::error::RouteError;

    fn registry(paths: &[&str]) -> LinearRegistry<Route> {
        let mut reg = LinearRegistry::new();
        let summary = reg.register_many(
            paths
                .iter()
                .map(|p| Arc::new(Route::new(HttpMethod::Get, *p))),
        );
        assert!(summary.is_clean());
        reg
    }

    #[test]
    fn test_exact_match() {
        let reg = registry(&["/users", "/users/{id}"]);
        let m = reg.match_route(HttpMethod::Get, "/users").unwrap();
        assert_eq!(m.route.path, "/users");
        assert_eq!(m.match_type, MatchType::Exact);
        assert_eq!(m.match_score, 100);
        assert!(m.path_params.is_empty());
    }

    #[test]
    fn test_exact_pass_beats_template_syntax() {
        let reg = registry(&["/users/{id}"]);
        let m = reg.match_route(HttpMethod::Get, "/users/{id}").unwrap();
        assert_eq!(m.match_type, MatchType::Exact);
        assert_eq!(m.match_score, 100);
        assert!(m.path_params.is_empty());
    }

    #[test]
    fn test_static_over_param() {
        let reg = registry(&["/users/{id}", "/users/me"]);
        let m = reg.match_route(HttpMethod::Get, "/users/me").unwrap();
        assert_eq!(m.route.path, "/users/me");

        let m = reg.match_route(HttpMethod::Get, "/users/42").unwrap();
        assert_eq!(m.route.path, "/users/{id}");
        assert_eq!(m.param("id"), Some("42"));
        assert_eq!(m.match_score, 59);
    }

    #[test]
    fn test_trailing_slash_uses_pattern_pass() {
        let reg = registry(&["/users"]);
        let m = reg.match_route(HttpMethod::Get, "/users/").unwrap();
        assert_eq!(m.route.path, "/users");
        assert_eq!(m.match_type, MatchType::Exact);
    }

    #[test]
    fn test_request_equal_to_pattern_takes_that_route() {
        let reg = registry(&["/users/{userId}", "/users/{id}"]);
        let m = reg.match_route(HttpMethod::Get, "/users/{id}").unwrap();
        assert_eq!(m.route.path, "/users/{id}");
        assert_eq!(m.match_score, 100);

        let reg = registry(&["/users", "/users/"]);
        let m = reg.match_route(HttpMethod::Get, "/users/").unwrap();
        assert_eq!(m.route.path, "/users/");
    }

    #[test]
    fn test_wildcard_has_no_params() {
        let reg = registry(&["/files/{bucket}/*"]);
        let m = reg.match_route(HttpMethod::Get, "/files/b1/a/b.txt").unwrap();
        assert_eq!(m.match_type, MatchType::Wildcard);
        assert_eq!(m.match_score, 10);
        assert!(m.path_params.is_empty());
    }

    #[test]
    fn test_duplicate_first_registered_wins() {
        let mut reg = LinearRegistry::new();
        let first = Arc::new(Route::with_payload(HttpMethod::Get, "/items/{id}", 1));
        let second = Arc::new(Route::with_payload(HttpMethod::Get, "/items/{id}", 2));
        reg.register(first).unwrap();
        reg.register(second).unwrap();

        let m = reg.match_route(HttpMethod::Get, "/items/9").unwrap();
        assert_eq!(m.route.payload, 1);
        assert_eq!(reg.find_all_matches(HttpMethod::Get, "/items/9").len(), 2);
        assert_eq!(reg.pattern_count(), 1);
    }

    #[test]
    fn test_find_all_sorted_and_stable() {
        let reg = registry(&["/api/*", "/api/{a}", "/api/users", "/{x}/{y}", "/{p}/users"]);
        let all = reg.find_all_matches(HttpMethod::Get, "/api/users");
        let paths: Vec<_> = all.iter().map(|m| m.route.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["/api/users", "/api/{a}", "/{p}/users", "/{x}/{y}", "/api/*"]
        );
        let scores: Vec<_> = all.iter().map(|m| m.match_score).collect();
        assert_eq!(scores, vec![100, 59, 59, 48, 10]);
    }

    #[test]
    fn test_rejects_wildcard_in_middle() {
        let mut reg: LinearRegistry<Route> = LinearRegistry::new();
        let err = reg
            .register(Arc::new(Route::new(HttpMethod::Get, "/a/*/b")))
            .unwrap_err();
        assert!(matches!(err, RouteError::WildcardNotTerminal { .. }));
        assert_eq!(reg.stats().total, 0);
        assert!(reg.get_routes(None).is_empty());
    }

    #[test]
    fn test_unknown_method() {
        let reg = registry(&["/users"]);
        assert!(reg.match_route(HttpMethod::Post, "/users").is_none());
        assert!(reg.match_str("TRACE", "/users").is_none());
        assert!(reg.find_all_str("TRACE", "/users").is_empty());
        assert!(reg.match_str("get", "/users").is_some());
    }

    #[test]
    fn test_get_routes_order() {
        let mut reg = LinearRegistry::new();
        reg.register(Arc::new(Route::new(HttpMethod::Post, "/b"))).unwrap();
        reg.register(Arc::new(Route::new(HttpMethod::Get, "/a"))).unwrap();
        reg.register(Arc::new(Route::new(HttpMethod::Get, "/c"))).unwrap();

        let all: Vec<_> = reg.get_routes(None).iter().map(|r| r.path.clone()).collect();
        assert_eq!(all, vec!["/a", "/c", "/b"]);
        assert_eq!(reg.get_routes(Some(HttpMethod::Post)).len(), 1);
        assert!(reg.get_routes(Some(HttpMethod::Delete)).is_empty());
    }

    #[test]
    fn test_cached_pattern_is_shared() {
        let reg = registry(&["/users/{id}", "/users/{id}"]);
        let a = reg.compiled_pattern("/users/{id}").unwrap();
        let b = reg.compiled_pattern("/users/{id}").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_clear() {
        let mut reg = registry(&["/a", "/b/{id}", "/c/*"]);
        assert_eq!(reg.stats().total, 3);
        reg.clear();
        assert_eq!(reg.stats(), RouteStats::default());
        assert!(reg.get_routes(None).is_empty());
        assert_eq!(reg.pattern_count(), 0);
        assert!(reg.match_route(HttpMethod::Get, "/a").is_none());
    }
}
