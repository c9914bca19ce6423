//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::routing::{HttpMethod, RegistryKind};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouterConfig {
    /// Registry implementation used when a single one is needed.
    pub registry: RegistryKind,

    /// Synthetic corpus shape.
    pub corpus: CorpusConfig,

    /// Equivalence/benchmark run sizes.
    pub harness: HarnessConfig,

    /// Logging settings.
    pub observability: ObservabilityConfig,
}

/// Shape of the generated route corpus and request mix.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorpusConfig {
    /// RNG seed; identical seeds produce identical corpora.
    pub seed: u64,

    /// Relative weight of static routes.
    pub static_weight: u32,

    /// Relative weight of parameterized routes.
    pub parameterized_weight: u32,

    /// Relative weight of wildcard routes.
    pub wildcard_weight: u32,

    /// Maximum number of segments in a generated pattern.
    pub max_depth: usize,

    /// Share of requests derived from a registered pattern (expected to match).
    pub matched_ratio: f64,

    /// Relative weight of each HTTP method.
    pub method_weights: MethodWeights,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            static_weight: 5,
            parameterized_weight: 4,
            wildcard_weight: 1,
            max_depth: 5,
            matched_ratio: 0.7,
            method_weights: MethodWeights::default(),
        }
    }
}

/// Per-method weights. GET dominates real contract sets.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MethodWeights {
    pub get: u32,
    pub post: u32,
    pub put: u32,
    pub patch: u32,
    pub delete: u32,
    pub head: u32,
    pub options: u32,
}

impl MethodWeights {
    /// Weights paired with their method, in canonical method order.
    pub fn pairs(&self) -> [(HttpMethod, u32); 7] {
        [
            (HttpMethod::Get, self.get),
            (HttpMethod::Post, self.post),
            (HttpMethod::Put, self.put),
            (HttpMethod::Patch, self.patch),
            (HttpMethod::Delete, self.delete),
            (HttpMethod::Head, self.head),
            (HttpMethod::Options, self.options),
        ]
    }
}

impl Default for MethodWeights {
    fn default() -> Self {
        Self {
            get: 60,
            post: 15,
            put: 8,
            patch: 5,
            delete: 7,
            head: 3,
            options: 2,
        }
    }
}

/// Harness run sizes.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Route counts to run, one equivalence pass each.
    pub route_counts: Vec<usize>,

    /// Requests issued per pass.
    pub request_count: usize,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            route_counts: vec![100, 1_000, 5_000],
            request_count: 10_000,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level or filter directive (e.g. "info", "contract_router=debug").
    pub log_level: String,

    /// Output format.
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}
