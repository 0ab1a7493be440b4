// crates/contract-forge-core/src/runtime/dispatch.rs
// ============================================================================
// Module: Matcher Dispatcher
// Description: Suppress flattener output and dispatch explicit matchers.
// Purpose: Compile one body side into its final assertion set.
// Dependencies: crate::core, crate::runtime::{flatten, resolve}
// ============================================================================

//! ## Overview
//! The dispatcher owns the two matcher rules. Rule 1 (suppression): any
//! flattener candidate at or under an explicit matcher path is removed; the
//! matcher supersedes default equality. Rule 2 (dispatch): matchers fire
//! independently in caller order, each mapping to one or two assertions by
//! kind. Duplicate matchers on the same path all render.
//!
//! Path-existence validation is deliberately asymmetric: kinds that must
//! retrieve a value from the example body (command always; equality and type
//! checks without a declared value) fail fatally when the path is absent,
//! while declaration-driven kinds and null checks do not.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::body::BodyFormat;
use crate::core::body::BodyValue;
use crate::core::contract::ContractIdentity;
use crate::core::errors::GenerationError;
use crate::core::matcher::AssertionKind;
use crate::core::matcher::ExpectedValue;
use crate::core::matcher::Matcher;
use crate::core::matcher::MatcherKind;
use crate::core::matcher::PathAssertion;
use crate::core::path::BodyPath;
use crate::runtime::flatten::FlattenOptions;
use crate::runtime::flatten::flatten_body;
use crate::runtime::flatten::read_expression;
use crate::runtime::flatten::substitute_snippet;
use crate::runtime::resolve::resolve_first;

// ============================================================================
// SECTION: Input
// ============================================================================

/// One body side handed to the verification compiler.
#[derive(Debug, Clone, Copy)]
pub struct VerificationInput<'contract> {
    /// Example body tree.
    pub body: &'contract BodyValue,
    /// Body format controlling path syntax and type-check support.
    pub format: BodyFormat,
    /// Explicit matchers in caller order.
    pub matchers: &'contract [Matcher],
    /// Contract identity for error reporting.
    pub identity: &'contract ContractIdentity,
    /// Whether list flattening also emits collection-size assertions.
    pub assert_collection_size: bool,
}

/// Compiled output: default assertions first, matcher-driven ones after.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledAssertions {
    /// Assertions derived from flattening the example body.
    pub flattened: Vec<PathAssertion>,
    /// Assertions derived from explicit matchers, in caller order.
    pub matcher_driven: Vec<PathAssertion>,
}

impl CompiledAssertions {
    /// Returns all assertions in render order.
    #[must_use]
    pub fn all(&self) -> Vec<PathAssertion> {
        let mut out = self.flattened.clone();
        out.extend(self.matcher_driven.iter().cloned());
        out
    }
}

// ============================================================================
// SECTION: Compilation
// ============================================================================

/// Compiles one body side into its final assertion set.
///
/// # Errors
/// Returns [`GenerationError`] for unparseable or unresolvable matcher paths
/// that require retrieval, type matchers on XML bodies, and unreadable file
/// references.
pub fn compile_assertions(
    input: &VerificationInput<'_>,
) -> Result<CompiledAssertions, GenerationError> {
    let parsed = parse_matcher_paths(input)?;
    let covered: Vec<BodyPath> = parsed.iter().map(|(_, path)| path.clone()).collect();
    let flattened = flatten_body(
        input.body,
        input.format,
        &covered,
        input.identity,
        FlattenOptions {
            assert_collection_size: input.assert_collection_size,
        },
    )?;
    let mut matcher_driven = Vec::new();
    for (matcher, path) in &parsed {
        dispatch_matcher(input, matcher, path, &mut matcher_driven)?;
    }
    Ok(CompiledAssertions {
        flattened,
        matcher_driven,
    })
}

/// Parses every matcher path up front; syntax errors read as unresolvable.
fn parse_matcher_paths<'contract>(
    input: &VerificationInput<'contract>,
) -> Result<Vec<(&'contract Matcher, BodyPath)>, GenerationError> {
    input
        .matchers
        .iter()
        .map(|matcher| {
            BodyPath::parse(&matcher.path, input.format)
                .map(|path| (matcher, path))
                .map_err(|_| GenerationError::PathNotFound {
                    contract: input.identity.clone(),
                    path: matcher.path.clone(),
                })
        })
        .collect()
}

/// Dispatches one matcher into its assertion(s).
fn dispatch_matcher(
    input: &VerificationInput<'_>,
    matcher: &Matcher,
    path: &BodyPath,
    out: &mut Vec<PathAssertion>,
) -> Result<(), GenerationError> {
    let rendered = path.render(input.format);
    match matcher.kind {
        MatcherKind::Null => {
            // Null checks carry no existence requirement: asserting null on
            // an absent path is the point.
            out.push(PathAssertion::bare(rendered, AssertionKind::IsNull));
            Ok(())
        }
        MatcherKind::Equality | MatcherKind::Regex => {
            dispatch_value_matcher(input, matcher, path, rendered, out)
        }
        MatcherKind::Command => dispatch_command_matcher(input, matcher, path, rendered, out),
        MatcherKind::Type => dispatch_type_matcher(input, matcher, path, rendered, out),
    }
}

/// Dispatches equality and regex-family matchers.
fn dispatch_value_matcher(
    input: &VerificationInput<'_>,
    matcher: &Matcher,
    path: &BodyPath,
    rendered: String,
    out: &mut Vec<PathAssertion>,
) -> Result<(), GenerationError> {
    let value = effective_value(input, matcher, path)?;
    if matcher.kind.is_regex_related() && path.is_wildcard() {
        // Array fan-out: every element must satisfy the pattern.
        out.push(PathAssertion::new(
            rendered,
            AssertionKind::AllMatch,
            ExpectedValue::Pattern(pattern_text(&value)),
        ));
        return Ok(());
    }
    let assertion = if matcher.kind.is_regex_related() {
        PathAssertion::new(rendered, AssertionKind::Matches, ExpectedValue::Pattern(pattern_text(&value)))
    } else {
        PathAssertion::new(rendered, AssertionKind::Equals, ExpectedValue::Literal(value))
    };
    out.push(assertion);
    Ok(())
}

/// Dispatches command matchers; the path must resolve in the example body.
fn dispatch_command_matcher(
    input: &VerificationInput<'_>,
    matcher: &Matcher,
    path: &BodyPath,
    rendered: String,
    out: &mut Vec<PathAssertion>,
) -> Result<(), GenerationError> {
    if resolve_first(input.body, path).is_none() {
        return Err(GenerationError::PathNotFound {
            contract: input.identity.clone(),
            path: matcher.path.clone(),
        });
    }
    let argument = read_expression(&rendered, input.format);
    let snippet = match &matcher.value {
        Some(BodyValue::ExecRef(snippet) | BodyValue::String(snippet)) => {
            substitute_snippet(snippet, &argument)
        }
        // No declared snippet degrades to a bare existence read.
        _ => argument,
    };
    out.push(PathAssertion::new(rendered, AssertionKind::Command, ExpectedValue::Snippet(snippet)));
    Ok(())
}

/// Dispatches type matchers, including the optional size assertion.
fn dispatch_type_matcher(
    input: &VerificationInput<'_>,
    matcher: &Matcher,
    path: &BodyPath,
    rendered: String,
    out: &mut Vec<PathAssertion>,
) -> Result<(), GenerationError> {
    if input.format == BodyFormat::Xml {
        // XML leaves are always text; a runtime type check cannot succeed
        // and must raise rather than silently degrade.
        return Err(GenerationError::UnsupportedTypeCheck {
            contract: input.identity.clone(),
            path: matcher.path.clone(),
            format: input.format,
        });
    }
    let value = effective_value(input, matcher, path)?;
    out.push(PathAssertion::new(
        rendered.clone(),
        AssertionKind::InstanceOf,
        ExpectedValue::TypeName(value.type_name().to_string()),
    ));
    let kind = match (matcher.min_occurrence, matcher.max_occurrence) {
        (Some(_), Some(_)) => Some(AssertionKind::SizeBetween),
        (Some(_), None) => Some(AssertionKind::SizeAtLeast),
        (None, Some(_)) => Some(AssertionKind::SizeAtMost),
        (None, None) => None,
    };
    if let Some(kind) = kind {
        out.push(PathAssertion::new(
            rendered,
            kind,
            ExpectedValue::Bounds {
                min: matcher.min_occurrence,
                max: matcher.max_occurrence,
            },
        ));
    }
    Ok(())
}

// ============================================================================
// SECTION: Value Retrieval
// ============================================================================

/// Returns the declared matcher value, or retrieves it from the body.
///
/// Retrieval failure is fatal: a matcher that needs the example value cannot
/// fire against a path the body does not contain.
fn effective_value(
    input: &VerificationInput<'_>,
    matcher: &Matcher,
    path: &BodyPath,
) -> Result<BodyValue, GenerationError> {
    if let Some(value) = &matcher.value
        && matcher.kind != MatcherKind::Equality
    {
        return Ok(value.clone());
    }
    resolve_first(input.body, path).cloned().ok_or_else(|| GenerationError::PathNotFound {
        contract: input.identity.clone(),
        path: matcher.path.clone(),
    })
}

/// Extracts pattern text from a declared or retrieved value.
fn pattern_text(value: &BodyValue) -> String {
    match value {
        BodyValue::Pattern(pattern) => pattern.clone(),
        BodyValue::String(text) => text.clone(),
        other => other.to_wire_text(),
    }
}
