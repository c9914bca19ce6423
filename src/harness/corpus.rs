//! Synthetic route corpus and request generation.
//!
//! # Responsibilities
//! - Generate N unique (method, path) routes with a configurable category mix
//! - Generate M requests, most derived from registered patterns
//!
//! # Design Decisions
//! - Seeded `StdRng`: the same config always yields the same corpus
//! - Unmatched requests draw from a vocabulary no route uses, so they miss
//!   unless a leading parameter segment happens to accept them
//! - A few non-derived requests are raw patterns (`/users/{id0}`, `/api/*/`)
//!   so the exact-string path of both registries is exercised

use std::collections::HashSet;
use std::sync::Arc;

use rand::distributions::{Alphanumeric, Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::config::CorpusConfig;
use crate::harness::HarnessError;
use crate::routing::pattern::{parse_segment, split_segments, Segment};
use crate::routing::{HttpMethod, PathCategory, Route};

const VOCABULARY: &[&str] = &[
    "users", "orders", "products", "api", "v1", "v2", "accounts", "items", "posts", "comments",
    "search", "settings", "billing", "reports", "teams", "projects", "files", "events", "tags",
    "sessions", "health", "admin", "catalog", "invoices",
];

const PARAM_NAMES: &[&str] = &["id", "slug", "name", "key", "ref", "version"];

const MISS_VOCABULARY: &[&str] = &["zz-miss", "nowhere", "void", "absent", "ghost"];

/// Probability that a position in a parameterized pattern is a parameter.
const PARAM_PROBABILITY: f64 = 0.4;

/// Share of non-derived requests that echo a registered pattern verbatim or
/// with a trailing slash instead of a random miss.
const TEMPLATE_ECHO_PROBABILITY: f64 = 0.1;

/// Attempts at drawing a fresh path before forcing uniqueness.
const MAX_DRAWS: usize = 8;

/// A request issued by the harness.
#[derive(Debug, Clone, Serialize)]
pub struct SyntheticRequest {
    pub method: HttpMethod,
    pub path: String,
    /// Built from a registered pattern.
    pub derived: bool,
}

/// Routes plus the requests to issue against them.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    pub routes: Vec<Arc<Route>>,
    pub requests: Vec<SyntheticRequest>,
}

impl Corpus {
    /// Number of requests built from a registered pattern.
    pub fn derived_requests(&self) -> usize {
        self.requests.iter().filter(|r| r.derived).count()
    }
}

/// Generates corpora from a [`CorpusConfig`].
pub struct CorpusGenerator {
    config: CorpusConfig,
    rng: StdRng,
    categories: WeightedIndex<u32>,
    methods: WeightedIndex<u32>,
}

impl CorpusGenerator {
    pub fn new(config: &CorpusConfig) -> Result<Self, HarnessError> {
        if !(0.0..=1.0).contains(&config.matched_ratio) {
            return Err(HarnessError::MatchedRatio(config.matched_ratio));
        }
        if config.max_depth == 0 {
            return Err(HarnessError::ZeroDepth);
        }
        let categories = WeightedIndex::new([
            config.static_weight,
            config.parameterized_weight,
            config.wildcard_weight,
        ])?;
        let methods = WeightedIndex::new(config.method_weights.pairs().map(|(_, w)| w))?;

        Ok(Self {
            config: config.clone(),
            rng: StdRng::seed_from_u64(config.seed),
            categories,
            methods,
        })
    }

    /// Generate `route_count` unique routes and `request_count` requests.
    pub fn generate(&mut self, route_count: usize, request_count: usize) -> Corpus {
        let routes = self.generate_routes(route_count);
        let requests = self.generate_requests(&routes, request_count);

        tracing::debug!(
            routes = routes.len(),
            requests = requests.len(),
            seed = self.config.seed,
            "Corpus generated"
        );
        Corpus { routes, requests }
    }

    fn generate_routes(&mut self, count: usize) -> Vec<Arc<Route>> {
        let mut seen = HashSet::with_capacity(count);
        let mut routes = Vec::with_capacity(count);

        for index in 0..count {
            let method = self.method();
            let category = self.category();

            let mut path = self.pattern(category);
            let mut draws = 1;
            while seen.contains(&(method, path.clone())) && draws < MAX_DRAWS {
                path = self.pattern(category);
                draws += 1;
            }
            if seen.contains(&(method, path.clone())) {
                path = format!("/r{}{}", index, path);
            }

            seen.insert((method, path.clone()));
            routes.push(Arc::new(Route::new(method, path)));
        }
        routes
    }

    fn generate_requests(&mut self, routes: &[Arc<Route>], count: usize) -> Vec<SyntheticRequest> {
        (0..count)
            .map(|_| {
                if !routes.is_empty() && self.rng.gen_bool(self.config.matched_ratio) {
                    let route = &routes[self.rng.gen_range(0..routes.len())];
                    SyntheticRequest {
                        method: route.method,
                        path: self.concrete_path(&route.path),
                        derived: true,
                    }
                } else if !routes.is_empty() && self.rng.gen_bool(TEMPLATE_ECHO_PROBABILITY) {
                    let route = &routes[self.rng.gen_range(0..routes.len())];
                    let mut path = route.path.clone();
                    if self.rng.gen_bool(0.5) {
                        path.push('/');
                    }
                    SyntheticRequest {
                        method: route.method,
                        path,
                        derived: false,
                    }
                } else {
                    SyntheticRequest {
                        method: self.method(),
                        path: self.miss_path(),
                        derived: false,
                    }
                }
            })
            .collect()
    }

    fn method(&mut self) -> HttpMethod {
        HttpMethod::ALL[self.methods.sample(&mut self.rng)]
    }

    fn category(&mut self) -> PathCategory {
        match self.categories.sample(&mut self.rng) {
            0 => PathCategory::Static,
            1 => PathCategory::Parameterized,
            _ => PathCategory::Wildcard,
        }
    }

    fn word(&mut self) -> &'static str {
        VOCABULARY[self.rng.gen_range(0..VOCABULARY.len())]
    }

    fn pattern(&mut self, category: PathCategory) -> String {
        let depth = self.rng.gen_range(1..=self.config.max_depth);
        let mut segments: Vec<String> = Vec::with_capacity(depth + 1);

        match category {
            PathCategory::Static => {
                for _ in 0..depth {
                    segments.push(self.word().to_string());
                }
            }
            PathCategory::Parameterized => {
                let forced = self.rng.gen_range(0..depth);
                for position in 0..depth {
                    if position == forced || self.rng.gen_bool(PARAM_PROBABILITY) {
                        let name = PARAM_NAMES[self.rng.gen_range(0..PARAM_NAMES.len())];
                        segments.push(format!("{{{}{}}}", name, position));
                    } else {
                        segments.push(self.word().to_string());
                    }
                }
            }
            PathCategory::Wildcard => {
                let prefix = depth.saturating_sub(1).max(1);
                for _ in 0..prefix {
                    segments.push(self.word().to_string());
                }
                segments.push("*".to_string());
            }
        }

        format!("/{}", segments.join("/"))
    }

    /// Substitute concrete values into a registered pattern.
    fn concrete_path(&mut self, pattern: &str) -> String {
        let mut out = String::new();
        for segment in split_segments(pattern) {
            out.push('/');
            match parse_segment(segment) {
                Segment::Literal(lit) => out.push_str(lit),
                Segment::Param(_) => out.push_str(&self.value()),
                Segment::Wildcard => {
                    let extra = self.rng.gen_range(1..=3);
                    let tail: Vec<String> = (0..extra).map(|_| self.value()).collect();
                    out.push_str(&tail.join("/"));
                }
            }
        }
        if out.is_empty() {
            out.push('/');
        }
        out
    }

    fn miss_path(&mut self) -> String {
        let depth = self.rng.gen_range(1..=self.config.max_depth);
        let head = MISS_VOCABULARY[self.rng.gen_range(0..MISS_VOCABULARY.len())];
        let mut out = format!("/{}-{}", head, self.rng.gen_range(0..1_000_000));
        for _ in 1..depth {
            out.push('/');
            out.push_str(&self.value());
        }
        out
    }

    fn value(&mut self) -> String {
        if self.rng.gen_bool(0.5) {
            self.rng.gen_range(1..1_000_000u32).to_string()
        } else {
            (&mut self.rng)
                .sample_iter(&Alphanumeric)
                .take(8)
                .map(char::from)
                .collect()
        }
    }
}
