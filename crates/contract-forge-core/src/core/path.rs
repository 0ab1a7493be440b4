// crates/contract-forge-core/src/core/path.rs
// ============================================================================
// Module: Body Paths
// Description: Segment-based body paths with wildcard-aware coverage.
// Purpose: Parse, render, and compare the paths used by assertions/matchers.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Paths are handled as segment lists, not strings. Coverage (whether a
//! matcher path equals or encloses an assertion path) and wildcard matching
//! are defined on segments; strings only appear at the rendering edge.
//!
//! JSON paths root at `$` and use `.field`, `['field']`, `[0]`, `[*]`, and
//! `..` descendant hops. XML paths use `/field` with 1-based `[n]` indices.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Write as _;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::body::BodyFormat;

// ============================================================================
// SECTION: Segments
// ============================================================================

/// One hop of a body path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathSegment {
    /// Named field of a map (JSON) or element (XML).
    Field(String),
    /// Zero-based list index. XML rendering is 1-based.
    Index(usize),
    /// Any list index (`[*]`).
    AnyIndex,
    /// Any run of intermediate segments (`..`).
    AnyDescendant,
}

/// Error raised when a matcher path string cannot be parsed.
#[derive(Debug, Error)]
#[error("invalid path expression `{text}`: {detail}")]
pub struct PathSyntaxError {
    /// Original path text.
    pub text: String,
    /// Human-readable description of the first offending token.
    pub detail: String,
}

// ============================================================================
// SECTION: Body Path
// ============================================================================

/// A parsed body path.
///
/// # Invariants
/// - Segments emitted by the flattener never contain wildcards; wildcard
///   segments only enter through explicit matcher paths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyPath {
    /// Ordered segments from the body root.
    pub segments: Vec<PathSegment>,
}

impl BodyPath {
    /// Returns the empty root path.
    #[must_use]
    pub const fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Returns a copy of this path with one more segment appended.
    #[must_use]
    pub fn child(&self, segment: PathSegment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self {
            segments,
        }
    }

    /// Returns whether the path contains a wildcard or descendant hop.
    ///
    /// Wildcard-related paths address collections; regex-family matchers on
    /// such paths fan out into all-elements assertions.
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.segments
            .iter()
            .any(|segment| matches!(segment, PathSegment::AnyIndex | PathSegment::AnyDescendant))
    }

    /// Returns whether this path equals or encloses `other`.
    ///
    /// Coverage is prefix matching with wildcard awareness: `[*]` matches any
    /// index and `..` matches any run of segments. A matcher path covers its
    /// own location and everything nested under it.
    #[must_use]
    pub fn covers(&self, other: &Self) -> bool {
        Self::prefix_matches(&self.segments, &other.segments)
    }

    /// Recursive prefix match between matcher segments and target segments.
    fn prefix_matches(matcher: &[PathSegment], target: &[PathSegment]) -> bool {
        let Some((head, rest)) = matcher.split_first() else {
            return true;
        };
        match head {
            PathSegment::AnyDescendant => {
                // `..` may swallow zero or more target segments.
                (0 ..= target.len()).any(|skip| {
                    target
                        .get(skip ..)
                        .is_some_and(|remainder| Self::prefix_matches(rest, remainder))
                })
            }
            _ => {
                let Some((candidate, remainder)) = target.split_first() else {
                    return false;
                };
                Self::segment_matches(head, candidate) && Self::prefix_matches(rest, remainder)
            }
        }
    }

    /// Matches one matcher segment against one target segment.
    fn segment_matches(matcher: &PathSegment, target: &PathSegment) -> bool {
        match (matcher, target) {
            (PathSegment::Field(left), PathSegment::Field(right)) => left == right,
            (PathSegment::Index(left), PathSegment::Index(right)) => left == right,
            (PathSegment::AnyIndex, PathSegment::Index(_) | PathSegment::AnyIndex) => true,
            _ => false,
        }
    }

    /// Parses a path expression in the given body format.
    ///
    /// # Errors
    /// Returns [`PathSyntaxError`] when the expression contains an
    /// unterminated bracket or an empty segment.
    pub fn parse(text: &str, format: BodyFormat) -> Result<Self, PathSyntaxError> {
        match format {
            BodyFormat::Json => Self::parse_json(text),
            BodyFormat::Xml => Self::parse_xml(text),
        }
    }

    /// Parses a JSON path expression (`$.a.b[0]`, `$.items[*]`, `$..id`).
    fn parse_json(text: &str) -> Result<Self, PathSyntaxError> {
        let mut segments = Vec::new();
        let trimmed = text.strip_prefix('$').unwrap_or(text);
        let mut rest = trimmed;
        while !rest.is_empty() {
            if let Some(after) = rest.strip_prefix("..") {
                segments.push(PathSegment::AnyDescendant);
                let (name, remainder) = take_field_name(after);
                if name.is_empty() {
                    return Err(syntax_error(text, "`..` must be followed by a field name"));
                }
                segments.push(PathSegment::Field(name.to_string()));
                rest = remainder;
            } else if let Some(after) = rest.strip_prefix('.') {
                let (name, remainder) = take_field_name(after);
                if name.is_empty() {
                    return Err(syntax_error(text, "`.` must be followed by a field name"));
                }
                segments.push(PathSegment::Field(name.to_string()));
                rest = remainder;
            } else if let Some(after) = rest.strip_prefix('[') {
                let Some(end) = after.find(']') else {
                    return Err(syntax_error(text, "unterminated `[`"));
                };
                let inner = after.get(.. end).unwrap_or_default().trim();
                segments.push(parse_bracket(text, inner)?);
                rest = after.get(end + 1 ..).unwrap_or_default();
            } else {
                return Err(syntax_error(text, "expected `.`, `..`, or `[`"));
            }
        }
        Ok(Self {
            segments,
        })
    }

    /// Parses an XML path expression (`/order/lines[2]/sku`).
    fn parse_xml(text: &str) -> Result<Self, PathSyntaxError> {
        let mut segments = Vec::new();
        for step in text.split('/').filter(|step| !step.is_empty()) {
            let (name, bracket) = step.find('[').map_or((step, None), |start| {
                (step.get(.. start).unwrap_or_default(), step.get(start ..))
            });
            if name.is_empty() {
                return Err(syntax_error(text, "empty element name"));
            }
            segments.push(PathSegment::Field(name.to_string()));
            if let Some(bracket) = bracket {
                let inner = bracket
                    .strip_prefix('[')
                    .and_then(|tail| tail.strip_suffix(']'))
                    .ok_or_else(|| syntax_error(text, "unterminated `[`"))?;
                if inner.trim() == "*" {
                    segments.push(PathSegment::AnyIndex);
                } else {
                    let position: usize = inner
                        .trim()
                        .parse()
                        .map_err(|_| syntax_error(text, "index must be a number or `*`"))?;
                    if position == 0 {
                        return Err(syntax_error(text, "XML indices are 1-based"));
                    }
                    segments.push(PathSegment::Index(position - 1));
                }
            }
        }
        Ok(Self {
            segments,
        })
    }

    /// Renders the path in the given body format.
    #[must_use]
    pub fn render(&self, format: BodyFormat) -> String {
        match format {
            BodyFormat::Json => self.render_json(),
            BodyFormat::Xml => self.render_xml(),
        }
    }

    /// Renders a JSON path rooted at `$`.
    fn render_json(&self) -> String {
        let mut out = String::from("$");
        let mut descendant_pending = false;
        for segment in &self.segments {
            match segment {
                PathSegment::Field(name) => {
                    if descendant_pending && is_simple_identifier(name) {
                        let _ = write!(out, "{name}");
                    } else if is_simple_identifier(name) {
                        let _ = write!(out, ".{name}");
                    } else {
                        let _ = write!(out, "['{name}']");
                    }
                    descendant_pending = false;
                }
                PathSegment::Index(index) => {
                    let _ = write!(out, "[{index}]");
                    descendant_pending = false;
                }
                PathSegment::AnyIndex => {
                    out.push_str("[*]");
                    descendant_pending = false;
                }
                PathSegment::AnyDescendant => {
                    out.push_str("..");
                    descendant_pending = true;
                }
            }
        }
        out
    }

    /// Renders an XML path with 1-based indices.
    fn render_xml(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                PathSegment::Field(name) => {
                    let _ = write!(out, "/{name}");
                }
                PathSegment::Index(index) => {
                    let _ = write!(out, "[{}]", index + 1);
                }
                PathSegment::AnyIndex => out.push_str("[*]"),
                PathSegment::AnyDescendant => out.push('/'),
            }
        }
        out
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Splits a leading field name off a JSON path remainder.
fn take_field_name(text: &str) -> (&str, &str) {
    let end = text
        .find(['.', '['])
        .unwrap_or(text.len());
    (text.get(.. end).unwrap_or_default(), text.get(end ..).unwrap_or_default())
}

/// Parses the inside of a JSON bracket selector.
fn parse_bracket(full: &str, inner: &str) -> Result<PathSegment, PathSyntaxError> {
    if inner == "*" {
        return Ok(PathSegment::AnyIndex);
    }
    if let Some(quoted) = strip_quotes(inner) {
        if quoted.is_empty() {
            return Err(syntax_error(full, "empty quoted field name"));
        }
        return Ok(PathSegment::Field(quoted.to_string()));
    }
    inner
        .parse::<usize>()
        .map(PathSegment::Index)
        .map_err(|_| syntax_error(full, "bracket must hold an index, `*`, or a quoted name"))
}

/// Strips a matched pair of single or double quotes.
fn strip_quotes(text: &str) -> Option<&str> {
    text.strip_prefix('\'')
        .and_then(|tail| tail.strip_suffix('\''))
        .or_else(|| text.strip_prefix('"').and_then(|tail| tail.strip_suffix('"')))
}

/// Returns whether a field name renders with dot syntax.
fn is_simple_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}

/// Builds a [`PathSyntaxError`] for the given expression.
fn syntax_error(text: &str, detail: &str) -> PathSyntaxError {
    PathSyntaxError {
        text: text.to_string(),
        detail: detail.to_string(),
    }
}
