// crates/contract-forge-core/src/core/matcher.rs
// ============================================================================
// Module: Matchers and Path Assertions
// Description: Explicit matcher rules and the compiler's assertion output.
// Purpose: Model matcher overrides and the verification compiler result.
// Dependencies: serde, crate::core::body
// ============================================================================

//! ## Overview
//! A matcher is an explicit rule overriding the default equality assertion
//! for one body path. Matcher order is caller-supplied and preserved;
//! duplicate matchers on the same path all render. `PathAssertion` is the
//! sole output of the verification compiler.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::body::BodyValue;

// ============================================================================
// SECTION: Matchers
// ============================================================================

/// Matcher rule kinds supported by the contract DSL.
///
/// # Invariants
/// - Variants are stable for serialization and contract matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatcherKind {
    /// The value at the path must be null (or absent).
    Null,
    /// The value at the path must equal the declared or example value.
    Equality,
    /// The value at the path must match a regex pattern.
    Regex,
    /// A verbatim executable snippet verifies the value at the path.
    Command,
    /// The value at the path must have a given runtime type, optionally with
    /// collection-size bounds.
    Type,
}

impl MatcherKind {
    /// Returns whether this kind belongs to the regex family.
    #[must_use]
    pub const fn is_regex_related(self) -> bool {
        matches!(self, Self::Regex)
    }
}

/// One explicit matcher rule.
///
/// # Invariants
/// - `path` is interpreted in the body format of the side it is attached to.
/// - `min_occurrence`/`max_occurrence` are only meaningful for [`MatcherKind::Type`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matcher {
    /// Path expression the rule applies to.
    pub path: String,
    /// Rule kind.
    pub kind: MatcherKind,
    /// Declared value or pattern; retrieved from the example body when absent.
    pub value: Option<BodyValue>,
    /// Minimum collection size for type matchers.
    pub min_occurrence: Option<usize>,
    /// Maximum collection size for type matchers.
    pub max_occurrence: Option<usize>,
}

impl Matcher {
    /// Builds a matcher with no declared value and no bounds.
    #[must_use]
    pub fn new(path: impl Into<String>, kind: MatcherKind) -> Self {
        Self {
            path: path.into(),
            kind,
            value: None,
            min_occurrence: None,
            max_occurrence: None,
        }
    }

    /// Returns a copy with a declared value.
    #[must_use]
    pub fn with_value(mut self, value: BodyValue) -> Self {
        self.value = Some(value);
        self
    }

    /// Returns a copy with collection-size bounds.
    #[must_use]
    pub const fn with_bounds(mut self, min: Option<usize>, max: Option<usize>) -> Self {
        self.min_occurrence = min;
        self.max_occurrence = max;
        self
    }
}

// ============================================================================
// SECTION: Path Assertions
// ============================================================================

/// Assertion kinds produced by the verification compiler.
///
/// # Invariants
/// - Variants are stable for serialization and renderer dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssertionKind {
    /// Value equals the expected literal.
    Equals,
    /// Value matches the expected regex pattern.
    Matches,
    /// Value is null or absent.
    IsNull,
    /// Every element of the addressed collection matches the expectation.
    AllMatch,
    /// Value is an instance of the expected runtime type.
    InstanceOf,
    /// Flattened collection size lies within both bounds.
    SizeBetween,
    /// Flattened collection size is at least the lower bound.
    SizeAtLeast,
    /// Flattened collection size is at most the upper bound.
    SizeAtMost,
    /// A verbatim snippet verifies the value.
    Command,
}

/// Expected value carried by an assertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpectedValue {
    /// Literal body value, numeric type tag preserved.
    Literal(BodyValue),
    /// Regex pattern text.
    Pattern(String),
    /// Runtime type name for instance-of checks.
    TypeName(String),
    /// Collection-size bounds.
    Bounds {
        /// Lower bound, when declared.
        min: Option<usize>,
        /// Upper bound, when declared.
        max: Option<usize>,
    },
    /// Full executable snippet with the retrieved expression substituted.
    Snippet(String),
    /// Raw bytes loaded from a binary file reference.
    FileBytes(Vec<u8>),
}

/// One generated check tying a body location to an expectation.
///
/// # Invariants
/// - `path` strings are unique within one compiled set, except duplicates
///   produced by multiple matchers on the same path, which all render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathAssertion {
    /// Rendered path expression.
    pub path: String,
    /// Assertion kind.
    pub kind: AssertionKind,
    /// Expected value or predicate input, when the kind carries one.
    pub expected: Option<ExpectedValue>,
}

impl PathAssertion {
    /// Builds an assertion with an expectation.
    #[must_use]
    pub fn new(path: impl Into<String>, kind: AssertionKind, expected: ExpectedValue) -> Self {
        Self {
            path: path.into(),
            kind,
            expected: Some(expected),
        }
    }

    /// Builds an assertion without an expectation (null checks).
    #[must_use]
    pub fn bare(path: impl Into<String>, kind: AssertionKind) -> Self {
        Self {
            path: path.into(),
            kind,
            expected: None,
        }
    }
}
