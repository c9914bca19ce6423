//! Equivalence and benchmark harness.
//!
//! # Data Flow
//! ```text
//! RouterConfig.corpus
//!     → corpus.rs (seeded routes + requests)
//!     → equivalence.rs (register into linear and trie, issue identical requests)
//!     → EquivalenceReport (counts, winner mismatches, latency, speedup)
//! ```
//!
//! The linear registry serves as the oracle: any request where the two
//! registries pick a different winner is reported as a mismatch.

pub mod corpus;
pub mod equivalence;

use rand::distributions::WeightedError;
use thiserror::Error;

pub use corpus::{Corpus, CorpusGenerator, SyntheticRequest};
pub use equivalence::{run_equivalence, run_scaling, EquivalenceReport, Mismatch, RegistryRun};

/// Errors building a harness run.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("invalid corpus weights: {0}")]
    Weights(#[from] WeightedError),

    #[error("matched_ratio must be within [0, 1], got {0}")]
    MatchedRatio(f64),

    #[error("max_depth must be at least 1")]
    ZeroDepth,
}
