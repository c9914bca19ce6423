//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use contract_router::routing::{
    HttpMethod, LinearRegistry, Route, RouteMatcher, TrieRegistry,
};

/// Build a GET route.
pub fn get(path: &str) -> Arc<Route> {
    Arc::new(Route::new(HttpMethod::Get, path))
}

/// Build a route for any method.
pub fn route(method: HttpMethod, path: &str) -> Arc<Route> {
    Arc::new(Route::new(method, path))
}

/// Fresh linear and trie registries loaded with the same routes.
pub fn both(routes: &[Arc<Route>]) -> (LinearRegistry<Route>, TrieRegistry<Route>) {
    let mut linear = LinearRegistry::new();
    let mut trie = TrieRegistry::new();
    linear.register_many(routes.iter().cloned());
    trie.register_many(routes.iter().cloned());
    (linear, trie)
}

/// Both registries as trait objects, for assertions that must hold on each.
pub fn registries(routes: &[Arc<Route>]) -> Vec<Box<dyn RouteMatcher<Route>>> {
    let (linear, trie) = both(routes);
    vec![Box::new(linear), Box::new(trie)]
}

/// The end-to-end route table used across tests.
pub fn user_api() -> Vec<Arc<Route>> {
    vec![
        get("/users"),
        get("/users/{id}"),
        route(HttpMethod::Post, "/users"),
        get("/users/{userId}/posts/{postId}"),
        get("/api/*"),
    ]
}
