// crates/contract-forge-core/src/runtime/template.rs
// ============================================================================
// Module: Template Resolver
// Description: Resolve response references to request fields, two-phase.
// Purpose: Let response values reference the test-side request model.
// Dependencies: tracing, crate::core::{body, contract}
// ============================================================================

//! ## Overview
//! Responses may reference request fields (`{{{request.path}}}`,
//! `{{{request.headers.Content-Type}}}`). Resolution is two-phase:
//!
//! - **Phase 1 (structural)**: template leaves and inline references inside
//!   string leaves resolve against a read-only test-side request model.
//!   Unresolvable references keep their literal text; this is recoverable
//!   and logged, never fatal.
//! - **Phase 2 (textual)**: the reserved `escapejsonbody` reference denotes
//!   the whole request body re-escaped for embedding. It is rewritten into a
//!   second-stage marker during phase 1 and only expanded over the fully
//!   rendered method text, because the escaping depends on the final rendered
//!   representation, not the structural value.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use tracing::warn;

use crate::core::body::BodyValue;
use crate::core::contract::HttpRequest;

// ============================================================================
// CONSTANTS: Reference Syntax
// ============================================================================

/// Opening delimiter of an inline request reference.
const OPENING: &str = "{{{request.";

/// Closing delimiter of an inline request reference.
const CLOSING: &str = "}}}";

/// Reserved reference name for the re-escaped request body.
pub const ESCAPED_BODY_REF: &str = "escapejsonbody";

/// Second-stage marker left in place of the escaped-body reference.
pub const ESCAPED_BODY_MARKER: &str = "{{{request.escapedBody}}}";

// ============================================================================
// SECTION: Test-Side Request Model
// ============================================================================

/// Read-only view of the request as the generated test sees it.
///
/// # Invariants
/// - Construction renders every field once; resolution never mutates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestSideRequest {
    /// HTTP method (uppercase).
    pub method: String,
    /// Full url including any query string.
    pub url: String,
    /// Path portion of the url, without the query string.
    pub path: String,
    /// Query parameters in declaration order.
    pub query: Vec<(String, String)>,
    /// Header name/value pairs, values rendered to text.
    pub headers: BTreeMap<String, String>,
    /// Cookie name/value pairs, values rendered to text.
    pub cookies: BTreeMap<String, String>,
    /// Raw request body text, empty when the request has no body.
    pub body_text: String,
}

impl TestSideRequest {
    /// Builds the model from a contract's HTTP request.
    #[must_use]
    pub fn from_request(request: &HttpRequest) -> Self {
        let (path, query_string) = request
            .url
            .split_once('?')
            .map_or((request.url.as_str(), ""), |(path, query)| (path, query));
        let query = query_string
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                pair.split_once('=')
                    .map_or_else(|| (pair.to_string(), String::new()), |(key, value)| {
                        (key.to_string(), value.to_string())
                    })
            })
            .collect();
        let headers = request
            .headers
            .iter()
            .map(|header| (header.name.clone(), value_text(&header.value)))
            .collect();
        let cookies = request
            .cookies
            .iter()
            .map(|cookie| (cookie.name.clone(), value_text(&cookie.value)))
            .collect();
        let body_text = request
            .body
            .as_ref()
            .map(|body| body_source_text(&body.value))
            .unwrap_or_default();
        Self {
            method: request.method.clone(),
            url: request.url.clone(),
            path: path.to_string(),
            query,
            headers,
            cookies,
            body_text,
        }
    }

    /// Resolves one reference name to its textual value.
    ///
    /// The reserved escaped-body name resolves to the second-stage marker.
    /// Unknown names return `None` and are left literal by the caller.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<String> {
        if name.eq_ignore_ascii_case(ESCAPED_BODY_REF) {
            return Some(ESCAPED_BODY_MARKER.to_string());
        }
        match name {
            "method" => Some(self.method.clone()),
            "url" => Some(self.url.clone()),
            "path" => Some(self.path.clone()),
            "body" => Some(self.body_text.clone()),
            _ => {
                if let Some(header) = name.strip_prefix("headers.") {
                    self.headers.get(header).cloned()
                } else if let Some(cookie) = name.strip_prefix("cookies.") {
                    self.cookies.get(cookie).cloned()
                } else if let Some(parameter) = name.strip_prefix("query.") {
                    self.query
                        .iter()
                        .find(|(key, _)| key == parameter)
                        .map(|(_, value)| value.clone())
                } else {
                    None
                }
            }
        }
    }
}

// ============================================================================
// SECTION: Phase 1 — Structural Resolution
// ============================================================================

/// Resolves template references inside a body tree.
///
/// Template leaves become string leaves; inline references inside string
/// leaves are substituted in place. With no request model every reference
/// stays literal.
#[must_use]
pub fn resolve_structural(body: &BodyValue, request: Option<&TestSideRequest>) -> BodyValue {
    match body {
        BodyValue::TemplateRef(name) => BodyValue::String(resolve_reference(name, request)),
        BodyValue::String(text) => BodyValue::String(resolve_inline(text, request)),
        BodyValue::List(items) => BodyValue::List(
            items.iter().map(|item| resolve_structural(item, request)).collect(),
        ),
        BodyValue::Map(entries) => BodyValue::Map(
            entries
                .iter()
                .map(|(key, entry)| (key.clone(), resolve_structural(entry, request)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Resolves one named reference, falling back to its literal text.
fn resolve_reference(name: &str, request: Option<&TestSideRequest>) -> String {
    let literal = format!("{OPENING}{name}{CLOSING}");
    match request.and_then(|model| model.resolve(name)) {
        Some(resolved) => resolved,
        None => {
            warn!(reference = name, "unresolvable template reference kept literal");
            literal
        }
    }
}

/// Substitutes inline `{{{request.*}}}` references inside a string leaf.
fn resolve_inline(text: &str, request: Option<&TestSideRequest>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find(OPENING) {
        let Some(head) = rest.get(.. start) else {
            break;
        };
        out.push_str(head);
        let after = rest.get(start + OPENING.len() ..).unwrap_or_default();
        let Some(end) = after.find(CLOSING) else {
            // Unterminated reference: keep the remainder literal.
            out.push_str(rest.get(start ..).unwrap_or_default());
            return out;
        };
        let name = after.get(.. end).unwrap_or_default();
        out.push_str(&resolve_reference(name, request));
        rest = after.get(end + CLOSING.len() ..).unwrap_or_default();
    }
    out.push_str(rest);
    out
}

// ============================================================================
// SECTION: Phase 2 — Textual Expansion
// ============================================================================

/// Expands second-stage markers over the fully rendered method text.
///
/// The escaped request body is only known once the surrounding code text
/// exists; this pass runs after the assembler has rendered the method.
#[must_use]
pub fn expand_rendered(text: &str, request: Option<&TestSideRequest>) -> String {
    if !text.contains(ESCAPED_BODY_MARKER) {
        return text.to_string();
    }
    match request {
        Some(model) => text.replace(ESCAPED_BODY_MARKER, &escape_embedded(&model.body_text)),
        None => {
            warn!("escaped-body marker left literal: contract has no request body");
            text.to_string()
        }
    }
}

/// Escapes body text for embedding inside a generated string literal.
fn escape_embedded(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

// ============================================================================
// SECTION: Value Rendering
// ============================================================================

/// Renders a header/cookie value to the text the test-side model exposes.
fn value_text(value: &BodyValue) -> String {
    match value {
        BodyValue::String(text) | BodyValue::Pattern(text) => text.clone(),
        other => other.to_wire_text(),
    }
}

/// Renders a request body to its source text.
fn body_source_text(value: &BodyValue) -> String {
    match value {
        BodyValue::String(text) => text.clone(),
        other => other.to_wire_text(),
    }
}
