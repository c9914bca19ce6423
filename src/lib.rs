//! Contract Router Library
//!
//! Route matching for a contract-driven mock API server: a categorizer, a
//! linear regex registry, a segment trie registry, and a harness that checks
//! the two agree.

pub mod config;
pub mod harness;
pub mod observability;
pub mod routing;

pub use config::schema::RouterConfig;
pub use routing::{
    HttpMethod, LinearRegistry, Route, RouteMatch, RouteMatcher, Router, TrieRegistry,
};
