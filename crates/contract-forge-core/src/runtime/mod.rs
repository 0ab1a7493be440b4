// crates/contract-forge-core/src/runtime/mod.rs
// ============================================================================
// Module: Runtime Passes
// Description: The transform passes of the verification compiler.
// Purpose: Flattening, matcher dispatch, path resolution, template resolution.
// Dependencies: crate::core
// ============================================================================

//! Transform passes: pure functions over the core model, in pipeline order
//! (template resolution, flattening, matcher dispatch).

pub mod dispatch;
pub mod flatten;
pub mod resolve;
pub mod template;
