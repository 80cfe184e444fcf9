//! Route path pattern compilation and matching.
//!
//! # Responsibilities
//! - Compile a node's raw path (`todos`, `:id`, `users/:id`, `post-:slug`, `*`)
//! - Match compiled patterns against URL segments, capturing named params
//! - Render a pattern back into a concrete segment from params
//!
//! # Design Decisions
//! - One pattern segment consumes exactly one URL segment
//! - Params never match an empty segment
//! - No regex: literal and param parts are matched left to right,
//!   backtracking only over the literal that follows a param

use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Captured path parameters, keyed by param name.
pub type Params = BTreeMap<String, String>;

/// Errors raised while compiling a route path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    /// A `:` was not followed by a parameter name.
    #[error("empty parameter name in `{0}`")]
    EmptyParam(String),

    /// Two params with nothing between them cannot be split.
    #[error("adjacent parameters without a separator in `{0}`")]
    AdjacentParams(String),

    /// The same param name appears twice in one path.
    #[error("duplicate parameter `{name}` in `{path}`")]
    DuplicateParam { path: String, name: String },

    /// Leading, trailing or doubled `/` in a non-empty path.
    #[error("empty segment in `{0}`")]
    EmptySegment(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Literal(String),
    Param(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SegmentPattern {
    Wildcard,
    Parts(Vec<Part>),
}

/// A compiled, non-empty route path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<SegmentPattern>,
}

impl PathPattern {
    /// Compile a raw route path.
    ///
    /// Returns `Ok(None)` for the empty path, which has no pattern and acts
    /// as an index or pass-through node.
    pub fn compile(path: &str) -> Result<Option<Self>, PatternError> {
        if path.is_empty() {
            return Ok(None);
        }

        let mut names: Vec<String> = Vec::new();
        let mut segments = Vec::new();
        for raw_segment in path.split('/') {
            if raw_segment.is_empty() {
                return Err(PatternError::EmptySegment(path.to_string()));
            }
            if raw_segment == "*" {
                segments.push(SegmentPattern::Wildcard);
                continue;
            }
            let parts = parse_parts(path, raw_segment)?;
            for part in &parts {
                if let Part::Param(name) = part {
                    if names.contains(name) {
                        return Err(PatternError::DuplicateParam {
                            path: path.to_string(),
                            name: name.clone(),
                        });
                    }
                    names.push(name.clone());
                }
            }
            segments.push(SegmentPattern::Parts(parts));
        }

        Ok(Some(Self {
            raw: path.to_string(),
            segments,
        }))
    }

    /// Number of URL segments this pattern consumes.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false; compiled patterns have at least one segment.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The raw path this pattern was compiled from.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Names of all params captured by this pattern, in order.
    pub fn param_names(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                SegmentPattern::Parts(parts) => Some(parts),
                SegmentPattern::Wildcard => None,
            })
            .flatten()
            .filter_map(|p| match p {
                Part::Param(name) => Some(name.as_str()),
                Part::Literal(_) => None,
            })
            .collect()
    }

    /// Match the leading URL segments, returning the captured params.
    pub fn match_segments(&self, segments: &[&str]) -> Option<Params> {
        if segments.len() < self.segments.len() {
            return None;
        }

        let mut params = Params::new();
        for (pattern, segment) in self.segments.iter().zip(segments) {
            if segment.is_empty() {
                return None;
            }
            match pattern {
                SegmentPattern::Wildcard => {}
                SegmentPattern::Parts(parts) => {
                    let captured = match_parts(parts, segment)?;
                    params.extend(captured);
                }
            }
        }
        Some(params)
    }

    /// Render the pattern with the given params substituted.
    ///
    /// Params missing from `params` are left in their `:name` form.
    pub fn render(&self, params: &Params) -> String {
        self.segments
            .iter()
            .map(|segment| match segment {
                SegmentPattern::Wildcard => "*".to_string(),
                SegmentPattern::Parts(parts) => parts
                    .iter()
                    .map(|part| match part {
                        Part::Literal(text) => text.clone(),
                        Part::Param(name) => params
                            .get(name)
                            .cloned()
                            .unwrap_or_else(|| format!(":{name}")),
                    })
                    .collect::<String>(),
            })
            .collect::<Vec<_>>()
            .join("/")
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn is_param_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn parse_parts(path: &str, segment: &str) -> Result<Vec<Part>, PatternError> {
    let mut parts = Vec::new();
    let mut rest = segment;

    while !rest.is_empty() {
        if let Some(after_colon) = rest.strip_prefix(':') {
            let name_len = after_colon
                .find(|c: char| !is_param_char(c))
                .unwrap_or(after_colon.len());
            if name_len == 0 {
                return Err(PatternError::EmptyParam(path.to_string()));
            }
            if matches!(parts.last(), Some(Part::Param(_))) {
                return Err(PatternError::AdjacentParams(path.to_string()));
            }
            parts.push(Part::Param(after_colon[..name_len].to_string()));
            rest = &after_colon[name_len..];
        } else {
            let literal_len = rest.find(':').unwrap_or(rest.len());
            parts.push(Part::Literal(rest[..literal_len].to_string()));
            rest = &rest[literal_len..];
        }
    }

    Ok(parts)
}

fn match_parts(parts: &[Part], segment: &str) -> Option<Vec<(String, String)>> {
    match parts.split_first() {
        None => segment.is_empty().then(Vec::new),
        Some((Part::Literal(text), rest)) => {
            let remainder = segment.strip_prefix(text.as_str())?;
            match_parts(rest, remainder)
        }
        Some((Part::Param(name), rest)) => {
            let Some(Part::Literal(next)) = rest.first() else {
                // Trailing param takes the remainder of the segment.
                return (!segment.is_empty())
                    .then(|| vec![(name.clone(), segment.to_string())]);
            };
            // Shortest capture first, then widen.
            segment
                .match_indices(next.as_str())
                .filter(|(idx, _)| *idx > 0)
                .find_map(|(idx, _)| {
                    let mut captured = match_parts(rest, &segment[idx..])?;
                    captured.insert(0, (name.clone(), segment[..idx].to_string()));
                    Some(captured)
                })
        }
    }
}
