// crates/contract-forge-core/src/runtime/flatten.rs
// ============================================================================
// Module: Path Flattener
// Description: Flatten a body tree into per-leaf path assertions.
// Purpose: Produce the default equality checks a contract body implies.
// Dependencies: crate::core::{body, contract, errors, matcher, path}
// ============================================================================

//! ## Overview
//! The flattener walks a body tree and emits one candidate assertion per
//! leaf, skipping every subtree covered by an explicit matcher path. List
//! elements are flattened per-index by default; wildcards only enter through
//! matchers. Special leaves short-circuit: patterns become matches checks,
//! executable snippets become command checks, file references resolve to the
//! referenced file's bytes or text.
//!
//! Flattening is deterministic: maps iterate key-sorted, so the same body
//! yields the same paths in the same order on every run.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;

use crate::core::body::BodyFormat;
use crate::core::body::BodyValue;
use crate::core::contract::ContractIdentity;
use crate::core::errors::GenerationError;
use crate::core::matcher::AssertionKind;
use crate::core::matcher::ExpectedValue;
use crate::core::matcher::PathAssertion;
use crate::core::path::BodyPath;
use crate::core::path::PathSegment;

// ============================================================================
// SECTION: Options
// ============================================================================

/// Flattening options.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlattenOptions {
    /// Emit a size assertion for every list in addition to per-index checks.
    pub assert_collection_size: bool,
}

// ============================================================================
// SECTION: Flattening
// ============================================================================

/// Flattens a body tree into candidate path assertions.
///
/// `covered` holds the parsed paths of explicit matchers; subtrees at or
/// under a covered path are skipped entirely, because the matcher supersedes
/// default equality there.
///
/// # Errors
/// Returns [`GenerationError::FileReadFailure`] when a file reference cannot
/// be read.
pub fn flatten_body(
    body: &BodyValue,
    format: BodyFormat,
    covered: &[BodyPath],
    identity: &ContractIdentity,
    options: FlattenOptions,
) -> Result<Vec<PathAssertion>, GenerationError> {
    let mut assertions = Vec::new();
    let walker = Walker {
        format,
        covered,
        identity,
        options,
    };
    walker.walk(body, &BodyPath::root(), &mut assertions)?;
    Ok(assertions)
}

/// Shared walk state borrowed for one flattening run.
struct Walker<'run> {
    /// Body format controlling path rendering.
    format: BodyFormat,
    /// Matcher paths whose subtrees are suppressed.
    covered: &'run [BodyPath],
    /// Contract identity for error reporting.
    identity: &'run ContractIdentity,
    /// Flattening options.
    options: FlattenOptions,
}

impl Walker<'_> {
    /// Recursive descent over one node.
    fn walk(
        &self,
        node: &BodyValue,
        path: &BodyPath,
        out: &mut Vec<PathAssertion>,
    ) -> Result<(), GenerationError> {
        if self.covered.iter().any(|matcher_path| matcher_path.covers(path)) {
            return Ok(());
        }
        match node {
            BodyValue::List(items) => {
                if self.options.assert_collection_size {
                    out.push(PathAssertion::new(
                        path.render(self.format),
                        AssertionKind::SizeBetween,
                        ExpectedValue::Bounds {
                            min: Some(items.len()),
                            max: Some(items.len()),
                        },
                    ));
                }
                for (index, child) in items.iter().enumerate() {
                    self.walk(child, &path.child(PathSegment::Index(index)), out)?;
                }
                Ok(())
            }
            BodyValue::Map(entries) => {
                for (key, child) in entries {
                    self.walk(child, &path.child(PathSegment::Field(key.clone())), out)?;
                }
                Ok(())
            }
            leaf => {
                if let Some(assertion) = self.leaf_assertion(leaf, path)? {
                    out.push(assertion);
                }
                Ok(())
            }
        }
    }

    /// Converts one leaf into its candidate assertion.
    fn leaf_assertion(
        &self,
        leaf: &BodyValue,
        path: &BodyPath,
    ) -> Result<Option<PathAssertion>, GenerationError> {
        let rendered = path.render(self.format);
        let assertion = match leaf {
            BodyValue::Pattern(pattern) => PathAssertion::new(
                rendered,
                AssertionKind::Matches,
                ExpectedValue::Pattern(pattern.clone()),
            ),
            BodyValue::ExecRef(snippet) => {
                let substituted =
                    substitute_snippet(snippet, &read_expression(&rendered, self.format));
                PathAssertion::new(rendered, AssertionKind::Command, ExpectedValue::Snippet(substituted))
            }
            BodyValue::FileRef {
                path: file_path,
                is_binary,
            } => {
                let expected = if *is_binary {
                    ExpectedValue::FileBytes(self.read_file(file_path)?)
                } else {
                    let bytes = self.read_file(file_path)?;
                    ExpectedValue::Literal(BodyValue::String(
                        String::from_utf8_lossy(&bytes).into_owned(),
                    ))
                };
                PathAssertion::new(rendered, AssertionKind::Equals, expected)
            }
            BodyValue::TemplateRef(name) => {
                // Unresolved references flatten to their literal text; the
                // template resolver normally replaces them beforehand.
                PathAssertion::new(
                    rendered,
                    AssertionKind::Equals,
                    ExpectedValue::Literal(BodyValue::String(format!(
                        "{{{{{{request.{name}}}}}}}"
                    ))),
                )
            }
            scalar => PathAssertion::new(
                rendered,
                AssertionKind::Equals,
                ExpectedValue::Literal(scalar.clone()),
            ),
        };
        Ok(Some(assertion))
    }

    /// Reads a referenced file, failing fatally when unreadable.
    fn read_file(&self, file_path: &std::path::Path) -> Result<Vec<u8>, GenerationError> {
        fs::read(file_path).map_err(|err| GenerationError::FileReadFailure {
            contract: self.identity.clone(),
            path: file_path.to_path_buf(),
            detail: err.to_string(),
        })
    }
}

// ============================================================================
// SECTION: Snippet Helpers
// ============================================================================

/// Placeholder the DSL uses for the value under test inside snippets.
pub const SNIPPET_PLACEHOLDER: &str = "$it";

/// Returns the body-read expression for a rendered path.
#[must_use]
pub fn read_expression(rendered_path: &str, format: BodyFormat) -> String {
    let escaped = rendered_path.replace('"', "\\\"");
    match format {
        BodyFormat::Json => format!("parsedJson.read(\"{escaped}\")"),
        BodyFormat::Xml => format!("valueOf(parsedXml, \"{escaped}\")"),
    }
}

/// Substitutes the read expression into a verbatim snippet.
///
/// The snippet is inserted into generated code unexamined; it is an explicit
/// escape hatch and a trust boundary, not sanitized input.
#[must_use]
pub fn substitute_snippet(snippet: &str, argument: &str) -> String {
    if snippet.contains(SNIPPET_PLACEHOLDER) {
        snippet.replace(SNIPPET_PLACEHOLDER, argument)
    } else {
        format!("{snippet}({argument})")
    }
}
