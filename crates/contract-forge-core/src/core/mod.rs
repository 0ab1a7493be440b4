// crates/contract-forge-core/src/core/mod.rs
// ============================================================================
// Module: Core Model
// Description: Data model for contract bodies, matchers, and paths.
// Purpose: Provide the immutable inputs and outputs of the compiler.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! Core data model: body trees, contracts, matchers, paths, and errors.

pub mod body;
pub mod contract;
pub mod errors;
pub mod matcher;
pub mod path;
