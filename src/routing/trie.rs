//! Segment-trie registry.
//!
//! # Responsibilities
//! - Store routes in a prefix tree keyed by path segment
//! - Resolve a request by walking the tree one segment at a time
//!
//! # Tree Shape
//! ```text
//! root
//!  ├── "users"            literal child
//!  │    ├── {param}       single parameter child
//!  │    │    └── "posts"
//!  │    │         └── {param}   endpoint: GET
//!  │    └── endpoint: GET
//!  └── "api"
//!       └── *             single wildcard child, endpoint: GET
//! ```
//!
//! # Design Decisions
//! - Lookup cost depends on path depth, not on route count
//! - Literal, parameter and wildcard branches are all explored; the best
//!   candidate is chosen afterwards
//! - Every stored route keeps its own parameter names and registration
//!   sequence, so differently named templates sharing a position never rebind
//!   each other and ties resolve exactly like the linear registry
//! - A request byte-equal to a registered pattern resolves to the first route
//!   registered under that exact string before the tree is walked

use std::collections::HashMap;
use std::sync::Arc;

use crate::routing::error::RouteResult;
use crate::routing::matcher::{
    best_candidate, rank_candidates, MatchType, RouteDefinition, RouteMatch, RouteMatcher,
    RouteStats,
};
use crate::routing::method::HttpMethod;
use crate::routing::pattern::{
    categorize, parameterized_score, parse_segment, split_segments, validate_pattern, Segment,
};

struct TrieEntry<R> {
    route: Arc<R>,
    param_names: Vec<String>,
    sequence: u64,
}

impl<R: RouteDefinition> TrieEntry<R> {
    /// Build the match for a descent that bound `values` along the way.
    fn resolve(&self, values: &[&str], total_segments: usize) -> RouteMatch<R> {
        if values.is_empty() {
            return RouteMatch::exact(Arc::clone(&self.route));
        }

        let path_params = self
            .param_names
            .iter()
            .zip(values)
            .map(|(name, value)| (name.clone(), (*value).to_string()))
            .collect();

        RouteMatch {
            route: Arc::clone(&self.route),
            path_params,
            match_type: MatchType::Parameterized,
            match_score: parameterized_score(total_segments, values.len()),
        }
    }
}

struct ParamChild<R> {
    /// Every name registered at this position, first seen first.
    names: Vec<String>,
    node: TrieNode<R>,
}

struct TrieNode<R> {
    literal_keys: HashMap<String, usize>,
    literals: Vec<TrieNode<R>>,
    param: Option<Box<ParamChild<R>>>,
    wildcard: Option<Box<TrieNode<R>>>,
    endpoints: HashMap<HttpMethod, Vec<TrieEntry<R>>>,
}

impl<R: RouteDefinition> TrieNode<R> {
    fn new() -> Self {
        Self {
            literal_keys: HashMap::new(),
            literals: Vec::new(),
            param: None,
            wildcard: None,
            endpoints: HashMap::new(),
        }
    }

    fn literal(&self, segment: &str) -> Option<&TrieNode<R>> {
        self.literal_keys.get(segment).map(|&i| &self.literals[i])
    }

    fn literal_child_mut(&mut self, segment: &str) -> &mut TrieNode<R> {
        let index = match self.literal_keys.get(segment) {
            Some(&i) => i,
            None => {
                let i = self.literals.len();
                self.literals.push(TrieNode::new());
                self.literal_keys.insert(segment.to_string(), i);
                i
            }
        };
        &mut self.literals[index]
    }

    fn param_child_mut(&mut self, name: &str) -> &mut TrieNode<R> {
        let param = self.param.get_or_insert_with(|| {
            Box::new(ParamChild {
                names: Vec::new(),
                node: TrieNode::new(),
            })
        });
        if !param.names.iter().any(|n| n == name) {
            if !param.names.is_empty() {
                tracing::debug!(
                    existing = ?param.names,
                    param = name,
                    "Parameter position shared by differently named templates"
                );
            }
            param.names.push(name.to_string());
        }
        &mut param.node
    }

    fn wildcard_child_mut(&mut self) -> &mut TrieNode<R> {
        &mut **self.wildcard.get_or_insert_with(|| Box::new(TrieNode::new()))
    }

    /// Walk the remaining segments, pushing every endpoint reached for `method`.
    fn collect<'p>(
        &self,
        method: HttpMethod,
        segments: &[&'p str],
        bound: &mut Vec<&'p str>,
        total_segments: usize,
        out: &mut Vec<(u64, RouteMatch<R>)>,
    ) {
        let Some((head, rest)) = segments.split_first() else {
            if let Some(entries) = self.endpoints.get(&method) {
                let values: &[&str] = bound;
                out.extend(
                    entries
                        .iter()
                        .map(|e| (e.sequence, e.resolve(values, total_segments))),
                );
            }
            return;
        };

        if let Some(child) = self.literal(head) {
            child.collect(method, rest, bound, total_segments, out);
        }

        if let Some(param) = &self.param {
            bound.push(*head);
            param.node.collect(method, rest, bound, total_segments, out);
            bound.pop();
        }

        // Consumes every remaining segment, however many.
        if let Some(wildcard) = &self.wildcard {
            if let Some(entries) = wildcard.endpoints.get(&method) {
                out.extend(
                    entries
                        .iter()
                        .map(|e| (e.sequence, RouteMatch::wildcard(Arc::clone(&e.route)))),
                );
            }
        }
    }

    /// Pre-order: this node, literal children, parameter child, wildcard child.
    fn walk_routes(&self, method: Option<HttpMethod>, out: &mut Vec<Arc<R>>) {
        match method {
            Some(m) => {
                if let Some(entries) = self.endpoints.get(&m) {
                    out.extend(entries.iter().map(|e| Arc::clone(&e.route)));
                }
            }
            None => {
                for m in HttpMethod::ALL {
                    if let Some(entries) = self.endpoints.get(&m) {
                        out.extend(entries.iter().map(|e| Arc::clone(&e.route)));
                    }
                }
            }
        }

        for child in &self.literals {
            child.walk_routes(method, out);
        }
        if let Some(param) = &self.param {
            param.node.walk_routes(method, out);
        }
        if let Some(wildcard) = &self.wildcard {
            wildcard.walk_routes(method, out);
        }
    }
}

/// Registry backed by a segment trie.
pub struct TrieRegistry<R> {
    root: TrieNode<R>,
    /// First route registered under each raw pattern string, per method.
    exact: HashMap<HttpMethod, HashMap<String, Arc<R>>>,
    stats: RouteStats,
    next_sequence: u64,
}

impl<R: RouteDefinition> TrieRegistry<R> {
    pub fn new() -> Self {
        Self {
            root: TrieNode::new(),
            exact: HashMap::new(),
            stats: RouteStats::default(),
            next_sequence: 0,
        }
    }

    /// Every endpoint reached by the walk. Routes whose raw pattern equals
    /// `path` are reported as exact matches.
    fn candidates(&self, method: HttpMethod, path: &str) -> Vec<(u64, RouteMatch<R>)> {
        let segments: Vec<&str> = split_segments(path).collect();
        let mut bound = Vec::with_capacity(segments.len());
        let mut out = Vec::new();
        self.root
            .collect(method, &segments, &mut bound, segments.len(), &mut out);

        for (_, candidate) in out.iter_mut() {
            if candidate.route.path() == path {
                *candidate = RouteMatch::exact(Arc::clone(&candidate.route));
            }
        }
        out
    }
}

impl<R: RouteDefinition> Default for TrieRegistry<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RouteDefinition> RouteMatcher<R> for TrieRegistry<R> {
    fn name(&self) -> &'static str {
        "trie"
    }

    fn register(&mut self, route: Arc<R>) -> RouteResult<()> {
        validate_pattern(route.path())?;
        let category = categorize(route.path()).category;

        self.exact
            .entry(route.method())
            .or_default()
            .entry(route.path().to_string())
            .or_insert_with(|| Arc::clone(&route));

        let mut param_names = Vec::new();
        let mut node = &mut self.root;
        for segment in split_segments(route.path()) {
            node = match parse_segment(segment) {
                Segment::Literal(lit) => node.literal_child_mut(lit),
                Segment::Param(name) => {
                    param_names.push(name.to_string());
                    node.param_child_mut(name)
                }
                Segment::Wildcard => node.wildcard_child_mut(),
            };
        }

        tracing::debug!(
            method = %route.method(),
            path = route.path(),
            category = ?category,
            "Registered route"
        );

        node.endpoints.entry(route.method()).or_default().push(TrieEntry {
            route,
            param_names,
            sequence: self.next_sequence,
        });
        self.next_sequence += 1;
        self.stats.record(category);
        Ok(())
    }

    fn match_route(&self, method: HttpMethod, path: &str) -> Option<RouteMatch<R>> {
        if let Some(route) = self.exact.get(&method).and_then(|routes| routes.get(path)) {
            return Some(RouteMatch::exact(Arc::clone(route)));
        }
        best_candidate(self.candidates(method, path))
    }

    fn find_all_matches(&self, method: HttpMethod, path: &str) -> Vec<RouteMatch<R>> {
        rank_candidates(self.candidates(method, path))
    }

    fn get_routes(&self, method: Option<HttpMethod>) -> Vec<Arc<R>> {
        let mut out = Vec::new();
        self.root.walk_routes(method, &mut out);
        out
    }

    fn stats(&self) -> RouteStats {
        self.stats
    }

    fn clear(&mut self) {
        self.root = TrieNode::new();
        self.exact.clear();
        self.stats = RouteStats::default();
        self.next_sequence = 0;
    }
}
