//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Registration (at startup or reload):
//!     RouteDefinition[] (method, path, opaque payload)
//!     → pattern.rs (validate, categorize, score)
//!     → linear.rs (compile + cache regex) | trie.rs (insert into segment tree)
//!     → treated as immutable while serving
//!
//! Incoming Request (method, path)
//!     → router.rs (configured registry)
//!     → candidates from linear scan or trie walk
//!     → Return: best RouteMatch (route, params, type, score) or None
//! ```
//!
//! # Design Decisions
//! - Specificity: static (100) > parameterized (50 + 10*static - params) > wildcard (10)
//! - Deterministic: equal scores resolve to the first registered route
//! - Lookups never fail; unknown methods simply do not match
//! - Reload builds a new registry and swaps it in (shared.rs)

pub mod error;
pub mod linear;
pub mod matcher;
pub mod method;
pub mod pattern;
pub mod router;
pub mod shared;
pub mod trie;

pub use error::{RouteError, RouteResult};
pub use linear::LinearRegistry;
pub use matcher::{
    MatchType, RegistrationSummary, Route, RouteDefinition, RouteMatch, RouteMatcher, RouteStats,
};
pub use method::{HttpMethod, UnknownMethod};
pub use pattern::{categorize, Categorization, PathCategory};
pub use router::{RegistryKind, Router};
pub use shared::SharedRegistry;
pub use trie::TrieRegistry;
