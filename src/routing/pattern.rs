//! Path pattern categorization and compilation.
//!
//! # Responsibilities
//! - Split patterns and request paths into segments
//! - Classify a pattern as static, parameterized or wildcard
//! - Compute the specificity score used to rank competing matches
//! - Compile patterns into anchored regexes for the linear registry
//!
//! # Scoring
//! ```text
//! static          100
//! parameterized   50 + 10 * static_segments - params
//! wildcard        10
//! ```
//!
//! A parameterized pattern can never reach 100, so a static route always beats
//! any template that also matches the same path.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use regex::Regex;
use serde::Serialize;

use crate::routing::error::{RouteError, RouteResult};

pub const STATIC_SCORE: i32 = 100;
pub const WILDCARD_SCORE: i32 = 10;
const PARAM_BASE_SCORE: i32 = 50;

/// Pattern category, decided by the most permissive segment present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PathCategory {
    Static,
    Parameterized,
    Wildcard,
}

/// A single segment of a path pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Literal(&'a str),
    Param(&'a str),
    Wildcard,
}

/// Result of categorizing a raw pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Categorization {
    pub category: PathCategory,
    pub score: i32,
    pub segment_count: usize,
    pub param_count: usize,
}

/// Splits a path on `/`, dropping empty segments.
pub fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Score for a match that bound `param_count` of `segment_count` segments.
pub fn parameterized_score(segment_count: usize, param_count: usize) -> i32 {
    let static_count = segment_count.saturating_sub(param_count) as i32;
    PARAM_BASE_SCORE + 10 * static_count - param_count as i32
}

/// Classifies one segment. Anything that is not exactly `*` or `{identifier}`
/// is a literal.
pub fn parse_segment(segment: &str) -> Segment<'_> {
    if segment == "*" {
        return Segment::Wildcard;
    }
    match param_name(segment) {
        Some(name) => Segment::Param(name),
        None => Segment::Literal(segment),
    }
}

fn param_name(segment: &str) -> Option<&str> {
    let name = segment.strip_prefix('{')?.strip_suffix('}')?;
    let mut chars = name.chars();
    let first = chars.next()?;
    if !(first.is_alphabetic() || first == '_') {
        return None;
    }
    if chars.all(|c| c.is_alphanumeric() || c == '_') {
        Some(name)
    } else {
        None
    }
}

/// Classifies a pattern and computes its specificity score.
pub fn categorize(path: &str) -> Categorization {
    let mut segment_count = 0;
    let mut param_count = 0;
    let mut wildcard = false;

    for segment in split_segments(path) {
        segment_count += 1;
        match parse_segment(segment) {
            Segment::Wildcard => wildcard = true,
            Segment::Param(_) => param_count += 1,
            Segment::Literal(_) => {}
        }
    }

    let (category, score) = if wildcard {
        (PathCategory::Wildcard, WILDCARD_SCORE)
    } else if param_count > 0 {
        (
            PathCategory::Parameterized,
            parameterized_score(segment_count, param_count),
        )
    } else {
        (PathCategory::Static, STATIC_SCORE)
    };

    Categorization {
        category,
        score,
        segment_count,
        param_count,
    }
}

/// Structural checks applied before a pattern is accepted by any registry.
///
/// Brace syntax is not re-validated here: malformed templates are literals.
pub fn validate_pattern(path: &str) -> RouteResult<()> {
    let segments: Vec<&str> = split_segments(path).collect();
    let mut seen = HashSet::new();

    for (i, segment) in segments.iter().enumerate() {
        match parse_segment(segment) {
            Segment::Wildcard if i + 1 != segments.len() => {
                return Err(RouteError::WildcardNotTerminal {
                    path: path.to_string(),
                });
            }
            Segment::Param(name) if !seen.insert(name) => {
                return Err(RouteError::DuplicateParam {
                    path: path.to_string(),
                    name: name.to_string(),
                });
            }
            _ => {}
        }
    }
    Ok(())
}

/// Rewrites a request path into `/seg/seg` form.
///
/// Borrows when the input is already canonical.
pub fn normalize_path(path: &str) -> Cow<'_, str> {
    let canonical = path.starts_with('/')
        && !path.contains("//")
        && (path == "/" || !path.ends_with('/'));
    if canonical {
        return Cow::Borrowed(path);
    }

    let joined = split_segments(path).collect::<Vec<_>>().join("/");
    Cow::Owned(format!("/{}", joined))
}

/// A pattern compiled into an anchored regex.
#[derive(Debug)]
pub struct CompiledPattern {
    raw: String,
    categorization: Categorization,
    regex: Regex,
    param_names: Vec<String>,
}

impl CompiledPattern {
    /// Compile a validated pattern.
    pub fn compile(path: &str) -> RouteResult<Self> {
        validate_pattern(path)?;

        let mut source = String::from("^");
        let mut param_names = Vec::new();
        for segment in split_segments(path) {
            source.push('/');
            match parse_segment(segment) {
                Segment::Literal(lit) => source.push_str(&regex::escape(lit)),
                Segment::Param(name) => {
                    source.push_str("([^/]+)");
                    param_names.push(name.to_string());
                }
                Segment::Wildcard => source.push_str(".+"),
            }
        }
        if source == "^" {
            source.push('/');
        }
        source.push('$');

        let regex = Regex::new(&source).map_err(|source| RouteError::Pattern {
            path: path.to_string(),
            source,
        })?;

        Ok(Self {
            raw: path.to_string(),
            categorization: categorize(path),
            regex,
            param_names,
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn category(&self) -> PathCategory {
        self.categorization.category
    }

    pub fn score(&self) -> i32 {
        self.categorization.score
    }

    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    /// Match a canonical request path, returning the captured parameters.
    ///
    /// Non-parameterized patterns always yield an empty map.
    pub fn captures(&self, path: &str) -> Option<HashMap<String, String>> {
        let caps = self.regex.captures(path)?;
        if self.categorization.category != PathCategory::Parameterized {
            return Some(HashMap::new());
        }

        let params = self
            .param_names
            .iter()
            .enumerate()
            .filter_map(|(i, name)| caps.get(i + 1).map(|m| (name.clone(), m.as_str().to_string())))
            .collect();
        Some(params)
    }
}

/// Memoized pattern compilation, keyed by raw pattern string.
#[derive(Debug, Default)]
pub struct PatternCache {
    entries: HashMap<String, Arc<CompiledPattern>>,
}

impl PatternCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached compilation, compiling on first use.
    pub fn get_or_compile(&mut self, path: &str) -> RouteResult<Arc<CompiledPattern>> {
        if let Some(compiled) = self.entries.get(path) {
            return Ok(Arc::clone(compiled));
        }
        let compiled = Arc::new(CompiledPattern::compile(path)?);
        self.entries.insert(path.to_string(), Arc::clone(&compiled));
        Ok(compiled)
    }

    pub fn get(&self, path: &str) -> Option<&Arc<CompiledPattern>> {
        self.entries.get(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
