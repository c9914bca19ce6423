//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (ratios in [0, 1], non-zero sizes)
//! - Reject weight sets that leave nothing to generate
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>

use thiserror::Error;

use crate::config::schema::RouterConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("corpus category weights are all zero")]
    NoCategoryWeight,

    #[error("corpus method weights are all zero")]
    NoMethodWeight,

    #[error("matched_ratio must be within [0, 1], got {0}")]
    MatchedRatio(f64),

    #[error("max_depth must be at least 1")]
    MaxDepth,

    #[error("harness.route_counts must not be empty")]
    NoRouteCounts,

    #[error("harness.route_counts entries must be positive")]
    ZeroRouteCount,

    #[error("harness.request_count must be positive")]
    ZeroRequestCount,

    #[error("observability.log_level must not be empty")]
    EmptyLogLevel,
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let corpus = &config.corpus;

    if corpus.static_weight == 0 && corpus.parameterized_weight == 0 && corpus.wildcard_weight == 0 {
        errors.push(ValidationError::NoCategoryWeight);
    }
    if corpus.method_weights.pairs().iter().all(|(_, w)| *w == 0) {
        errors.push(ValidationError::NoMethodWeight);
    }
    if !(0.0..=1.0).contains(&corpus.matched_ratio) {
        errors.push(ValidationError::MatchedRatio(corpus.matched_ratio));
    }
    if corpus.max_depth == 0 {
        errors.push(ValidationError::MaxDepth);
    }

    if config.harness.route_counts.is_empty() {
        errors.push(ValidationError::NoRouteCounts);
    } else if config.harness.route_counts.contains(&0) {
        errors.push(ValidationError::ZeroRouteCount);
    }
    if config.harness.request_count == 0 {
        errors.push(ValidationError::ZeroRequestCount);
    }

    if config.observability.log_level.trim().is_empty() {
        errors.push(ValidationError::EmptyLogLevel);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
