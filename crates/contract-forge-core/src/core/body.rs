// crates/contract-forge-core/src/core/body.rs
// ============================================================================
// Module: Body Value Model
// Description: Immutable body trees with special leaf markers.
// Purpose: Represent example bodies handed over by the contract DSL parser.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! `BodyValue` is the parsed body tree: scalars, ordered lists, keyed maps,
//! plus the special markers the DSL supports (regex pattern, executable
//! snippet, file reference, template reference). Values are immutable once
//! constructed; every pass borrows the tree and emits new data.
//!
//! Integers keep their signed/unsigned/float distinction so the renderer can
//! decide about type suffixes without re-parsing literals.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

// ============================================================================
// SECTION: Body Format
// ============================================================================

/// Body format tag controlling path syntax and type-check support.
///
/// # Invariants
/// - Variants are stable for serialization and contract matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyFormat {
    /// JSON-like bodies addressed with dotted/bracket paths rooted at `$`.
    Json,
    /// XML-like bodies addressed with slash paths. Leaves are always text.
    Xml,
}

impl std::fmt::Display for BodyFormat {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => formatter.write_str("json"),
            Self::Xml => formatter.write_str("xml"),
        }
    }
}

// ============================================================================
// SECTION: Body Values
// ============================================================================

/// One node of an example body tree.
///
/// # Invariants
/// - Trees are immutable once constructed and never cyclic.
/// - Map insertion order is irrelevant; iteration is key-sorted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyValue {
    /// Explicit null leaf.
    Null,
    /// Boolean leaf.
    Bool(bool),
    /// Signed integer leaf.
    Int(i64),
    /// Unsigned integer leaf outside the `i64` range.
    UInt(u64),
    /// Floating-point leaf.
    Float(f64),
    /// String leaf.
    String(String),
    /// Ordered list of child values.
    List(Vec<BodyValue>),
    /// Keyed map of child values.
    Map(BTreeMap<String, BodyValue>),
    /// Regex pattern marker; compiles to a matches-assertion, not equality.
    Pattern(String),
    /// File reference marker; resolved to file bytes or text at compile time.
    FileRef {
        /// Path of the referenced file.
        path: PathBuf,
        /// Whether the file content is embedded as a byte literal.
        is_binary: bool,
    },
    /// Executable snippet marker. The snippet is inserted into generated
    /// code verbatim; this is a trust boundary, not sanitized input.
    ExecRef(String),
    /// Template reference naming a request field (for example `path` or
    /// `headers.Content-Type`).
    TemplateRef(String),
}

impl BodyValue {
    /// Returns whether this node is a leaf (emits at most one assertion).
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        !matches!(self, Self::List(_) | Self::Map(_))
    }

    /// Returns the runtime type name used by instance-of assertions.
    ///
    /// Names follow the target-language convention the renderer expects;
    /// the numeric tag decides between `Integer` and `Long`.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "Object",
            Self::Bool(_) => "Boolean",
            Self::Int(value) => {
                if i64::from(i32::MIN) <= *value && *value <= i64::from(i32::MAX) {
                    "Integer"
                } else {
                    "Long"
                }
            }
            Self::UInt(value) => {
                if *value <= u64::try_from(i32::MAX).unwrap_or(u64::MAX) {
                    "Integer"
                } else {
                    "Long"
                }
            }
            Self::Float(_) => "Double",
            Self::String(_) | Self::Pattern(_) | Self::TemplateRef(_) => "String",
            Self::List(_) => "List",
            Self::Map(_) => "Map",
            Self::ExecRef(_) | Self::FileRef { .. } => "Object",
        }
    }

    /// Converts a parsed JSON document into a body tree.
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(flag) => Self::Bool(*flag),
            Value::Number(number) => Self::from_number(number),
            Value::String(text) => Self::String(text.clone()),
            Value::Array(items) => Self::List(items.iter().map(Self::from_json).collect()),
            Value::Object(entries) => Self::Map(
                entries
                    .iter()
                    .map(|(key, entry)| (key.clone(), Self::from_json(entry)))
                    .collect(),
            ),
        }
    }

    /// Converts a JSON number, preserving the original numeric type tag.
    fn from_number(number: &serde_json::Number) -> Self {
        if let Some(signed) = number.as_i64() {
            Self::Int(signed)
        } else if let Some(unsigned) = number.as_u64() {
            Self::UInt(unsigned)
        } else {
            Self::Float(number.as_f64().unwrap_or(0.0))
        }
    }

    /// Renders the tree back into a JSON value for request embedding.
    ///
    /// Special markers degrade to their literal text: a pattern becomes its
    /// pattern string and template/executable references keep their source
    /// text. File references are not resolved here; callers that need file
    /// content go through the flattener's file escape hatch.
    #[must_use]
    pub fn to_wire_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(flag) => Value::Bool(*flag),
            Self::Int(value) => Value::from(*value),
            Self::UInt(value) => Value::from(*value),
            Self::Float(value) => {
                serde_json::Number::from_f64(*value).map_or(Value::Null, Value::Number)
            }
            Self::String(text) | Self::Pattern(text) | Self::ExecRef(text) => {
                Value::String(text.clone())
            }
            Self::TemplateRef(name) => Value::String(format!("{{{{{{request.{name}}}}}}}")),
            Self::FileRef {
                path, ..
            } => Value::String(path.to_string_lossy().into_owned()),
            Self::List(items) => Value::Array(items.iter().map(Self::to_wire_json).collect()),
            Self::Map(entries) => {
                let mut object = serde_json::Map::new();
                for (key, entry) in entries {
                    object.insert(key.clone(), entry.to_wire_json());
                }
                Value::Object(object)
            }
        }
    }

    /// Renders the tree as compact JSON text.
    #[must_use]
    pub fn to_wire_text(&self) -> String {
        self.to_wire_json().to_string()
    }
}
