// crates/contract-forge-core/src/runtime/resolve.rs
// ============================================================================
// Module: Body Path Resolution
// Description: Resolve parsed paths against an example body tree.
// Purpose: Back matcher value retrieval and command path validation.
// Dependencies: crate::core::{body, path}
// ============================================================================

//! ## Overview
//! Resolution walks a body tree along parsed path segments. Wildcard
//! segments fan out; `..` descends to any depth. Resolution is read-only and
//! returns borrows into the tree.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::body::BodyValue;
use crate::core::path::BodyPath;
use crate::core::path::PathSegment;

// ============================================================================
// SECTION: Resolution
// ============================================================================

/// Resolves every node addressed by the path.
///
/// Returns an empty vector when the path does not resolve.
#[must_use]
pub fn resolve_all<'body>(body: &'body BodyValue, path: &BodyPath) -> Vec<&'body BodyValue> {
    let mut matches = Vec::new();
    walk(body, &path.segments, &mut matches);
    matches
}

/// Resolves the first node addressed by the path, in document order.
#[must_use]
pub fn resolve_first<'body>(body: &'body BodyValue, path: &BodyPath) -> Option<&'body BodyValue> {
    resolve_all(body, path).into_iter().next()
}

/// Recursive resolution step.
fn walk<'body>(node: &'body BodyValue, segments: &[PathSegment], out: &mut Vec<&'body BodyValue>) {
    let Some((head, rest)) = segments.split_first() else {
        out.push(node);
        return;
    };
    match head {
        PathSegment::Field(name) => {
            if let BodyValue::Map(entries) = node
                && let Some(child) = entries.get(name)
            {
                walk(child, rest, out);
            }
        }
        PathSegment::Index(index) => {
            if let BodyValue::List(items) = node
                && let Some(child) = items.get(*index)
            {
                walk(child, rest, out);
            }
        }
        PathSegment::AnyIndex => {
            if let BodyValue::List(items) = node {
                for child in items {
                    walk(child, rest, out);
                }
            }
        }
        PathSegment::AnyDescendant => {
            // Zero-length hop first, then recurse into children keeping the
            // descendant segment active.
            walk(node, rest, out);
            match node {
                BodyValue::List(items) => {
                    for child in items {
                        walk(child, segments, out);
                    }
                }
                BodyValue::Map(entries) => {
                    for child in entries.values() {
                        walk(child, segments, out);
                    }
                }
                _ => {}
            }
        }
    }
}
