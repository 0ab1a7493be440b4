// crates/contract-forge-gen/src/render.rs
// ============================================================================
// Module: Assertion Renderer
// Description: Render compiled path assertions to statement lines.
// Purpose: One assertion in, one framework-neutral statement line out.
// Dependencies: contract-forge-core
// ============================================================================

//! ## Overview
//! The renderer turns compiled assertions into AssertJ statement text. It is
//! deliberately dumb: all semantic decisions (which kind fires, which value
//! is expected) were made by the verification compiler; this pass only picks
//! the textual shape per kind and format.
//!
//! Size assertions over wildcard paths use the flattened-size form, since a
//! wildcard read yields the flattened element stream rather than one list.

// ============================================================================
// SECTION: Imports
// ============================================================================

use contract_forge_core::AssertionKind;
use contract_forge_core::BodyFormat;
use contract_forge_core::BodyValue;
use contract_forge_core::ExpectedValue;
use contract_forge_core::PathAssertion;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// Renders one compiled assertion to a statement line.
///
/// The line carries no indentation and no terminator; the assembler owns
/// both.
#[must_use]
pub fn render_assertion(assertion: &PathAssertion, format: BodyFormat) -> String {
    match (assertion.kind, &assertion.expected) {
        (AssertionKind::Equals, Some(ExpectedValue::Literal(BodyValue::Null))) => {
            render_is_null(&assertion.path, format)
        }
        (AssertionKind::Equals, Some(ExpectedValue::Literal(value))) => {
            render_equals(&assertion.path, value, format)
        }
        (AssertionKind::Equals, Some(ExpectedValue::FileBytes(bytes))) => {
            format!(
                "assertThat(response.getBody().asByteArray()).isEqualTo({})",
                byte_array_literal(bytes)
            )
        }
        (AssertionKind::Matches, Some(ExpectedValue::Pattern(pattern))) => {
            format!(
                "assertThat({}).matches(\"{}\")",
                text_read(&assertion.path, format),
                escape_java(pattern)
            )
        }
        (AssertionKind::IsNull, _) => render_is_null(&assertion.path, format),
        (AssertionKind::AllMatch, Some(ExpectedValue::Pattern(pattern))) => {
            format!(
                "{}.allElementsMatch(\"{}\")",
                iterable_read(&assertion.path, format),
                escape_java(pattern)
            )
        }
        (AssertionKind::InstanceOf, Some(ExpectedValue::TypeName(type_name))) => {
            format!(
                "assertThat((Object) {}).isInstanceOf({}.class)",
                object_read(&assertion.path, format),
                java_class(type_name)
            )
        }
        (
            AssertionKind::SizeBetween | AssertionKind::SizeAtLeast | AssertionKind::SizeAtMost,
            Some(ExpectedValue::Bounds {
                min,
                max,
            }),
        ) => render_size(assertion, *min, *max, format),
        (AssertionKind::Command, Some(ExpectedValue::Snippet(snippet))) => snippet.clone(),
        // Missing or mismatched payloads degrade to an existence check.
        _ => {
            format!("assertThat((Object) {}).isNotNull()", object_read(&assertion.path, format))
        }
    }
}

// ============================================================================
// SECTION: Kind Shapes
// ============================================================================

/// Renders a typed-read equality assertion.
fn render_equals(path: &str, value: &BodyValue, format: BodyFormat) -> String {
    if format == BodyFormat::Xml {
        // XML reads are always text.
        return format!(
            "assertThat({}).isEqualTo(\"{}\")",
            text_read(path, format),
            escape_java(&value.to_wire_text())
        );
    }
    let (literal, class) = java_literal(value);
    format!("assertThat(parsedJson.read(\"{}\", {class}.class)).isEqualTo({literal})", escape_java(path))
}

/// Renders a null check over an object read.
fn render_is_null(path: &str, format: BodyFormat) -> String {
    format!("assertThat((Object) {}).isNull()", object_read(path, format))
}

/// Renders one of the three size assertion shapes.
fn render_size(
    assertion: &PathAssertion,
    min: Option<usize>,
    max: Option<usize>,
    format: BodyFormat,
) -> String {
    let read = iterable_read(&assertion.path, format);
    let flattened = if is_wildcard_path(&assertion.path) { "Flattened" } else { "" };
    let suffix = match (assertion.kind, min, max) {
        (AssertionKind::SizeBetween, Some(min), Some(max)) => {
            format!("has{flattened}SizeBetween({min}, {max})")
        }
        (AssertionKind::SizeAtLeast, Some(min), _) => {
            format!("has{flattened}SizeGreaterThanOrEqualTo({min})")
        }
        (AssertionKind::SizeAtMost, _, Some(max)) => {
            format!("has{flattened}SizeLessThanOrEqualTo({max})")
        }
        // A size kind without its bound cannot constrain anything.
        _ => "isNotNull()".to_string(),
    };
    format!("{read}.{suffix}")
}

// ============================================================================
// SECTION: Read Expressions
// ============================================================================

/// Untyped read of the value at a path.
fn object_read(path: &str, format: BodyFormat) -> String {
    match format {
        BodyFormat::Json => format!("parsedJson.read(\"{}\")", escape_java(path)),
        BodyFormat::Xml => format!("valueOf(parsedXml, \"{}\")", escape_java(path)),
    }
}

/// String-typed read used by pattern matching.
fn text_read(path: &str, format: BodyFormat) -> String {
    match format {
        BodyFormat::Json => format!("parsedJson.read(\"{}\", String.class)", escape_java(path)),
        BodyFormat::Xml => format!("valueOf(parsedXml, \"{}\")", escape_java(path)),
    }
}

/// Collection read with the path echoed through `as`, for failure output.
fn iterable_read(path: &str, format: BodyFormat) -> String {
    let read = match format {
        BodyFormat::Json => {
            format!("parsedJson.read(\"{}\", java.util.Collection.class)", escape_java(path))
        }
        BodyFormat::Xml => format!("valueOf(parsedXml, \"{}\")", escape_java(path)),
    };
    format!("assertThat((java.lang.Iterable) {read}).as(\"{}\")", escape_java(path))
}

/// Returns whether a rendered path addresses a flattened element stream.
fn is_wildcard_path(path: &str) -> bool {
    path.contains("[*]") || path.contains("..")
}

/// Maps a runtime type name to the Java class used in `isInstanceOf`.
fn java_class(type_name: &str) -> &'static str {
    match type_name {
        "Integer" => "Integer",
        "Long" => "Long",
        "Double" => "Double",
        "Boolean" => "Boolean",
        "String" => "String",
        "List" => "java.util.List",
        "Map" => "java.util.Map",
        _ => "Object",
    }
}

// ============================================================================
// SECTION: Literals
// ============================================================================

/// Renders a body value as a Java literal with its boxed class name.
fn java_literal(value: &BodyValue) -> (String, &'static str) {
    match value {
        BodyValue::Bool(flag) => (flag.to_string(), "Boolean"),
        BodyValue::Int(number) => {
            if i32::try_from(*number).is_ok() {
                (number.to_string(), "Integer")
            } else {
                (format!("{number}L"), "Long")
            }
        }
        BodyValue::UInt(number) => {
            if i32::try_from(*number).is_ok() {
                (number.to_string(), "Integer")
            } else {
                (format!("{number}L"), "Long")
            }
        }
        BodyValue::Float(number) => (double_literal(*number), "Double"),
        BodyValue::String(text) | BodyValue::Pattern(text) => {
            (format!("\"{}\"", escape_java(text)), "String")
        }
        other => (format!("\"{}\"", escape_java(&other.to_wire_text())), "String"),
    }
}

/// Formats a double so the literal always carries a decimal point.
fn double_literal(number: f64) -> String {
    let mut text = format!("{number}");
    if !text.contains('.') && !text.contains('e') && !text.contains("inf") && !text.contains("NaN")
    {
        text.push_str(".0");
    }
    text
}

/// Renders raw file bytes as a byte-array literal.
///
/// Values render signed, since the target initializer rejects anything
/// above 127.
fn byte_array_literal(bytes: &[u8]) -> String {
    let body: Vec<String> =
        bytes.iter().map(|byte| i8::from_ne_bytes([*byte]).to_string()).collect();
    format!("new byte[] {{{}}}", body.join(", "))
}

// ============================================================================
// SECTION: Escaping
// ============================================================================

/// Escapes text for embedding in a Java/Groovy string literal.
#[must_use]
pub fn escape_java(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}
