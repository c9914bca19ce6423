//! Route resolution behaviour shared by both registries.

mod common;

use std::collections::HashMap;

use common::{get, registries, route, user_api};
use contract_router::routing::{HttpMethod, MatchType, RouteError, RouteMatcher};

fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_user_api_scenario() {
    for registry in registries(&user_api()) {
        let name = registry.name();

        let m = registry.match_route(HttpMethod::Get, "/users").unwrap();
        assert_eq!(m.identity(), (HttpMethod::Get, "/users"), "{name}");
        assert_eq!(m.match_type, MatchType::Exact);
        assert_eq!(m.match_score, 100);
        assert!(m.path_params.is_empty());

        let m = registry.match_route(HttpMethod::Get, "/users/123").unwrap();
        assert_eq!(m.route.path, "/users/{id}", "{name}");
        assert_eq!(m.match_type, MatchType::Parameterized);
        assert_eq!(m.match_score, 59);
        assert_eq!(m.path_params, params(&[("id", "123")]));

        let m = registry
            .match_route(HttpMethod::Get, "/users/123/posts/456")
            .unwrap();
        assert_eq!(m.route.path, "/users/{userId}/posts/{postId}", "{name}");
        assert_eq!(m.match_score, 68);
        assert_eq!(
            m.path_params,
            params(&[("userId", "123"), ("postId", "456")])
        );

        let m = registry
            .match_route(HttpMethod::Get, "/api/anything/here")
            .unwrap();
        assert_eq!(m.route.path, "/api/*", "{name}");
        assert_eq!(m.match_type, MatchType::Wildcard);
        assert_eq!(m.match_score, 10);
        assert!(m.path_params.is_empty());

        assert!(registry.match_route(HttpMethod::Get, "/unknown").is_none(), "{name}");

        let m = registry.match_route(HttpMethod::Post, "/users").unwrap();
        assert_eq!(m.identity(), (HttpMethod::Post, "/users"), "{name}");
        assert!(registry.match_route(HttpMethod::Delete, "/users").is_none());
    }
}

#[test]
fn test_static_beats_parameterized() {
    for registry in registries(&[get("/users/{id}"), get("/users/me")]) {
        let m = registry.match_route(HttpMethod::Get, "/users/me").unwrap();
        assert_eq!(m.route.path, "/users/me", "{}", registry.name());
        assert_eq!(m.match_type, MatchType::Exact);
    }
}

#[test]
fn test_wildcard_ranks_lowest() {
    for registry in registries(&[get("/api/*"), get("/api/{name}"), get("/api/users")]) {
        let m = registry.match_route(HttpMethod::Get, "/api/users").unwrap();
        assert_eq!(m.route.path, "/api/users", "{}", registry.name());

        let m = registry.match_route(HttpMethod::Get, "/api/orders").unwrap();
        assert_eq!(m.route.path, "/api/{name}", "{}", registry.name());

        let m = registry.match_route(HttpMethod::Get, "/api/orders/7").unwrap();
        assert_eq!(m.route.path, "/api/*", "{}", registry.name());
    }
}

#[test]
fn test_more_literals_win_among_parameterized() {
    let routes = [get("/{a}/{b}/{c}"), get("/{a}/items/{c}")];
    for registry in registries(&routes) {
        let m = registry.match_route(HttpMethod::Get, "/x/items/9").unwrap();
        assert_eq!(m.route.path, "/{a}/items/{c}", "{}", registry.name());
        assert_eq!(m.path_params, params(&[("a", "x"), ("c", "9")]));
    }
}

#[test]
fn test_find_all_matches_ranked() {
    let routes = [get("/api/*"), get("/api/{name}"), get("/api/users")];
    for registry in registries(&routes) {
        let all = registry.find_all_matches(HttpMethod::Get, "/api/users");
        let scores: Vec<_> = all.iter().map(|m| m.match_score).collect();
        let paths: Vec<_> = all.iter().map(|m| m.route.path.as_str()).collect();
        assert_eq!(scores, vec![100, 59, 10], "{}", registry.name());
        assert_eq!(paths, vec!["/api/users", "/api/{name}", "/api/*"]);
    }
}

#[test]
fn test_find_all_matches_equal_scores_keep_registration_order() {
    let routes = [get("/a/{x}"), get("/{y}/b"), get("/{z}/{w}")];
    for registry in registries(&routes) {
        let all = registry.find_all_matches(HttpMethod::Get, "/a/b");
        let paths: Vec<_> = all.iter().map(|m| m.route.path.as_str()).collect();
        assert_eq!(paths, vec!["/a/{x}", "/{y}/b", "/{z}/{w}"], "{}", registry.name());

        let first = registry.match_route(HttpMethod::Get, "/a/b").unwrap();
        assert_eq!(first.route.path, "/a/{x}");
    }
}

#[test]
fn test_unknown_method_matches_nothing() {
    for registry in registries(&user_api()) {
        assert!(registry.match_str("TRACE", "/users").is_none());
        assert!(registry.find_all_str("TRACE", "/users").is_empty());
        assert!(registry.match_str("get", "/users").is_some(), "{}", registry.name());
    }
}

#[test]
fn test_duplicate_registration_first_wins() {
    let first = get("/dup/{id}");
    let second = get("/dup/{id}");
    for registry in registries(&[first.clone(), second.clone()]) {
        let m = registry.match_route(HttpMethod::Get, "/dup/1").unwrap();
        assert!(std::sync::Arc::ptr_eq(&m.route, &first), "{}", registry.name());
        assert_eq!(registry.stats().total, 2);
        assert_eq!(registry.find_all_matches(HttpMethod::Get, "/dup/1").len(), 2);
    }
}

#[test]
fn test_trailing_and_double_slashes_normalized() {
    for registry in registries(&user_api()) {
        let m = registry.match_route(HttpMethod::Get, "/users/").unwrap();
        assert_eq!(m.route.path, "/users", "{}", registry.name());

        let m = registry.match_route(HttpMethod::Get, "//users//5/").unwrap();
        assert_eq!(m.route.path, "/users/{id}", "{}", registry.name());
        assert_eq!(m.param("id"), Some("5"));
    }
}

#[test]
fn test_invalid_patterns_rejected() {
    for mut registry in registries(&[]) {
        let err = registry.register(get("/files/*/raw")).unwrap_err();
        assert!(matches!(err, RouteError::WildcardNotTerminal { .. }));

        let err = registry.register(get("/a/{id}/b/{id}")).unwrap_err();
        assert!(matches!(err, RouteError::DuplicateParam { ref name, .. } if name == "id"));

        assert_eq!(registry.stats().total, 0, "{}", registry.name());
    }
}

#[test]
fn test_stats_and_clear() {
    for mut registry in registries(&user_api()) {
        let stats = registry.stats();
        assert_eq!(stats.total, 5);
        assert_eq!(stats.static_routes, 2);
        assert_eq!(stats.parameterized_routes, 2);
        assert_eq!(stats.wildcard_routes, 1);
        assert_eq!(registry.get_routes(Some(HttpMethod::Get)).len(), 4);
        assert_eq!(registry.get_routes(None).len(), 5);

        registry.clear();
        assert_eq!(registry.stats().total, 0, "{}", registry.name());
        assert!(registry.get_routes(None).is_empty());
        assert!(registry.match_route(HttpMethod::Get, "/users").is_none());

        registry.register(route(HttpMethod::Put, "/users/{id}")).unwrap();
        assert!(registry.match_route(HttpMethod::Put, "/users/1").is_some());
    }
}
