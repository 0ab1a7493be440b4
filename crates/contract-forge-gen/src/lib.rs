// crates/contract-forge-gen/src/lib.rs
// ============================================================================
// Module: Contract Forge Generator
// Description: Test method generation from compiled contract assertions.
// Purpose: Assemble framework-flavored test methods, block by block.
// Dependencies: contract-forge-core, serde, thiserror
// ============================================================================

//! ## Overview
//! This crate turns one contract into one generated test method. The
//! verification compiler in `contract-forge-core` decides *what* to assert;
//! this crate decides *where the text goes*: producer families fill
//! given/when/then sections through a frame-checked block assembler, the
//! renderer shapes each assertion line, and the textual template phase runs
//! last over the rendered method.
//!
//! ## Index
//! - Assembler: [`blocks`]
//! - Context: [`context`]
//! - Producers: [`producers`]
//! - Renderer: [`render`]
//! - Orchestration: [`strategy`]

pub mod blocks;
pub mod context;
pub mod producers;
pub mod render;
pub mod strategy;

use contract_forge_core::Contract;
use contract_forge_core::GenerationError;

pub use crate::blocks::BlockBuilder;
pub use crate::blocks::BlockError;
pub use crate::blocks::BlockKind;
pub use crate::blocks::CodeBlock;
pub use crate::blocks::Line;
pub use crate::context::ClientFlavor;
pub use crate::context::GenerationConfig;
pub use crate::context::GenerationContext;
pub use crate::context::Protocol;
pub use crate::context::TestFramework;
pub use crate::producers::GivenProducer;
pub use crate::producers::ImportsProducer;
pub use crate::producers::ThenProducer;
pub use crate::producers::WhenProducer;
pub use crate::render::render_assertion;
pub use crate::strategy::build_method;

// ============================================================================
// SECTION: Output
// ============================================================================

/// One fully generated test method with its class-level contributions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedMethod {
    /// Generated method name.
    pub name: String,
    /// Annotation and signature lines, unindented.
    pub signature: Vec<String>,
    /// Class-level annotations this method requires.
    pub annotations: Vec<String>,
    /// Injected field declarations this method requires.
    pub fields: Vec<String>,
    /// Fully-qualified imports; `static ` prefix marks static imports.
    pub imports: Vec<String>,
    /// Assembled sections in render order.
    pub blocks: Vec<CodeBlock>,
    /// Final method text after the textual template phase.
    pub text: String,
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// Generates the test method for one contract.
///
/// # Errors
/// Returns [`GenerationError`] when the configuration cannot call the
/// contract, a matcher path cannot be satisfied, a type check targets an
/// XML body, or a referenced file cannot be read.
pub fn generate_method(
    contract: &Contract,
    config: &GenerationConfig,
) -> Result<GeneratedMethod, GenerationError> {
    let ctx = GenerationContext::new(contract, config);
    build_method(&ctx)
}
