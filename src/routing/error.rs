//! Registration errors.
//!
//! Lookups never fail; only `register` can reject a route.

use thiserror::Error;

/// Errors raised while registering a route definition.
#[derive(Debug, Error)]
pub enum RouteError {
    /// A `*` segment appeared before the end of the pattern.
    #[error("wildcard must be the final segment in '{path}'")]
    WildcardNotTerminal { path: String },

    /// The same parameter name is bound twice in one pattern.
    #[error("parameter '{{{name}}}' appears more than once in '{path}'")]
    DuplicateParam { path: String, name: String },

    /// The compiled matcher could not be built.
    #[error("failed to compile pattern '{path}': {source}")]
    Pattern {
        path: String,
        #[source]
        source: regex::Error,
    },
}

/// Result type for route registration.
pub type RouteResult<T> = Result<T, RouteError>;
