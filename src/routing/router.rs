//! Registry selection.
//!
//! # Responsibilities
//! - Pick the registry implementation at startup (trie by default)
//! - Expose one `RouteMatcher` regardless of the choice
//!
//! # Design Decisions
//! - Static dispatch through an enum, no boxing on the lookup path
//! - Both implementations resolve the same winner, so switching is safe

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::routing::error::RouteResult;
use crate::routing::linear::LinearRegistry;
use crate::routing::matcher::{RouteDefinition, RouteMatch, RouteMatcher, RouteStats};
use crate::routing::method::HttpMethod;
use crate::routing::trie::TrieRegistry;

/// Which registry implementation to build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistryKind {
    Linear,
    #[default]
    Trie,
}

impl FromStr for RegistryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "linear" => Ok(RegistryKind::Linear),
            "trie" => Ok(RegistryKind::Trie),
            other => Err(format!("unknown registry kind: {}", other)),
        }
    }
}

impl fmt::Display for RegistryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryKind::Linear => f.write_str("linear"),
            RegistryKind::Trie => f.write_str("trie"),
        }
    }
}

/// A route registry of either kind.
pub enum Router<R> {
    Linear(LinearRegistry<R>),
    Trie(TrieRegistry<R>),
}

impl<R: RouteDefinition> Router<R> {
    /// Create an empty router of the requested kind.
    pub fn new(kind: RegistryKind) -> Self {
        match kind {
            RegistryKind::Linear => Router::Linear(LinearRegistry::new()),
            RegistryKind::Trie => Router::Trie(TrieRegistry::new()),
        }
    }

    pub fn kind(&self) -> RegistryKind {
        match self {
            Router::Linear(_) => RegistryKind::Linear,
            Router::Trie(_) => RegistryKind::Trie,
        }
    }

    fn inner(&self) -> &dyn RouteMatcher<R> {
        match self {
            Router::Linear(r) => r,
            Router::Trie(r) => r,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn RouteMatcher<R> {
        match self {
            Router::Linear(r) => r,
            Router::Trie(r) => r,
        }
    }
}

impl<R: RouteDefinition> RouteMatcher<R> for Router<R> {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn register(&mut self, route: Arc<R>) -> RouteResult<()> {
        self.inner_mut().register(route)
    }

    fn match_route(&self, method: HttpMethod, path: &str) -> Option<RouteMatch<R>> {
        match self {
            Router::Linear(r) => r.match_route(method, path),
            Router::Trie(r) => r.match_route(method, path),
        }
    }

    fn find_all_matches(&self, method: HttpMethod, path: &str) -> Vec<RouteMatch<R>> {
        match self {
            Router::Linear(r) => r.find_all_matches(method, path),
            Router::Trie(r) => r.find_all_matches(method, path),
        }
    }

    fn get_routes(&self, method: Option<HttpMethod>) -> Vec<Arc<R>> {
        self.inner().get_routes(method)
    }

    fn stats(&self) -> RouteStats {
        self.inner().stats()
    }

    fn clear(&mut self) {
        self.inner_mut().clear()
    }
}
