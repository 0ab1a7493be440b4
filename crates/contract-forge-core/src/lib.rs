// crates/contract-forge-core/src/lib.rs
// ============================================================================
// Module: Contract Forge Core
// Description: Contract body verification compiler.
// Purpose: Turn example bodies plus explicit matchers into path assertions.
// Dependencies: serde, serde_json, thiserror, tracing
// ============================================================================

//! ## Overview
//! This crate compiles one side of a declarative contract (an example body
//! tree plus an optional list of explicit matchers) into an ordered set of
//! path-scoped assertions. The compiler is a pure, synchronous transform:
//! tree in, assertions out. Its only I/O is the file-reference escape hatch,
//! a blocking read that fails fatally when the file is unreadable.
//!
//! ### Design Notes
//! - Flattening is deterministic: map keys iterate in `BTreeMap` order, so
//!   the same body always yields the same paths in the same order.
//! - Explicit matchers supersede default equality: flattener candidates at
//!   or under a matcher path are suppressed before the matcher fires.
//! - Executable matcher snippets are inserted into generated code verbatim.
//!   They are a documented trust boundary, not sanitized input.
//!
//! ## Index
//! - Model: [`core::body`], [`core::contract`], [`core::matcher`], [`core::path`]
//! - Errors: [`core::errors`]
//! - Passes: [`runtime::flatten`], [`runtime::dispatch`], [`runtime::template`]

pub mod core;
pub mod runtime;

pub use core::body::BodyFormat;
pub use core::body::BodyValue;
pub use core::contract::Contract;
pub use core::contract::ContractBody;
pub use core::contract::ContractExchange;
pub use core::contract::ContractIdentity;
pub use core::contract::Cookie;
pub use core::contract::Header;
pub use core::contract::HttpRequest;
pub use core::contract::HttpResponse;
pub use core::contract::InputMessage;
pub use core::contract::Multipart;
pub use core::contract::MultipartPart;
pub use core::contract::OutputMessage;
pub use core::errors::ErrorKind;
pub use core::errors::GenerationError;
pub use core::matcher::AssertionKind;
pub use core::matcher::ExpectedValue;
pub use core::matcher::Matcher;
pub use core::matcher::MatcherKind;
pub use core::matcher::PathAssertion;
pub use core::path::BodyPath;
pub use core::path::PathSegment;
pub use core::path::PathSyntaxError;
pub use runtime::dispatch::CompiledAssertions;
pub use runtime::dispatch::VerificationInput;
pub use runtime::dispatch::compile_assertions;
pub use runtime::flatten::FlattenOptions;
pub use runtime::flatten::flatten_body;
pub use runtime::flatten::read_expression;
pub use runtime::resolve::resolve_all;
pub use runtime::resolve::resolve_first;
pub use runtime::template::TestSideRequest;
pub use runtime::template::expand_rendered;
pub use runtime::template::resolve_structural;
