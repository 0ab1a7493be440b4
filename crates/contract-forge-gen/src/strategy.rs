// crates/contract-forge-gen/src/strategy.rs
// ============================================================================
// Module: Strategy Selector
// Description: Orchestrate producer families into one generated method.
// Purpose: Section ordering, body verification wiring, text rendering.
// Dependencies: contract-forge-core, crate::{blocks, context, producers, render}
// ============================================================================

//! ## Overview
//! The strategy walks the producer families in section order: given (when
//! anything accepts), the single call producer, then the assertion family,
//! and finally the body verification output in dedicated `and` frames.
//! Flattened assertions and matcher-driven assertions render as separate
//! `and` sections, flush with the `then` frame they continue.
//!
//! Rendering is the last step before the textual template phase: the
//! assembled blocks become method text, then second-stage markers expand
//! over that text.

// ============================================================================
// SECTION: Imports
// ============================================================================

use contract_forge_core::BodyFormat;
use contract_forge_core::CompiledAssertions;
use contract_forge_core::GenerationError;
use contract_forge_core::TestSideRequest;
use contract_forge_core::VerificationInput;
use contract_forge_core::compile_assertions;
use contract_forge_core::expand_rendered;
use contract_forge_core::resolve_structural;

use crate::GeneratedMethod;
use crate::blocks::BlockBuilder;
use crate::blocks::BlockError;
use crate::blocks::BlockKind;
use crate::blocks::CodeBlock;
use crate::context::GenerationContext;
use crate::context::Protocol;
use crate::producers::GivenProducer;
use crate::producers::ImportsProducer;
use crate::producers::ThenProducer;
use crate::producers::WhenProducer;
use crate::producers::class_annotations;
use crate::producers::class_fields;
use crate::producers::method_signature;
use crate::render::render_assertion;

// ============================================================================
// CONSTANTS: Rendering
// ============================================================================

/// Indent unit of rendered method text.
const INDENT_UNIT: &str = "\t";

/// Indent level of the method signature and closing brace.
const METHOD_INDENT: usize = 1;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// Builds the complete generated method for one contract.
///
/// # Errors
/// Returns [`GenerationError`] when no call producer accepts the contract,
/// when the verification compiler rejects a matcher, or when section
/// assembly is structurally inconsistent.
pub fn build_method(ctx: &GenerationContext<'_>) -> Result<GeneratedMethod, GenerationError> {
    let name = ctx.method_name();
    let request_model = ctx.request().map(TestSideRequest::from_request);
    let compiled = compile_body(ctx, request_model.as_ref())?;

    let call = WhenProducer::select(ctx)?;
    let mut builder = BlockBuilder::new(ctx.config.framework.statement_ending(), METHOD_INDENT);
    assemble_given(ctx, &mut builder).map_err(|error| block_mismatch(ctx, &error))?;
    assemble_when(ctx, call, &mut builder).map_err(|error| block_mismatch(ctx, &error))?;
    assemble_then(ctx, &compiled, &mut builder).map_err(|error| block_mismatch(ctx, &error))?;
    let blocks = builder.finish().map_err(|error| block_mismatch(ctx, &error))?;

    let signature = method_signature(ctx, &name);
    let mut imports = Vec::new();
    for producer in ImportsProducer::ALL {
        producer.contribute(ctx, &mut imports);
    }
    let rendered = render_method(ctx, &signature, &blocks);
    let text = expand_rendered(&rendered, request_model.as_ref());

    Ok(GeneratedMethod {
        name,
        signature,
        annotations: class_annotations(ctx),
        fields: class_fields(ctx),
        imports,
        blocks,
        text,
    })
}

// ============================================================================
// SECTION: Body Compilation
// ============================================================================

/// Runs the verification compiler over the contract's verification side.
fn compile_body(
    ctx: &GenerationContext<'_>,
    request_model: Option<&TestSideRequest>,
) -> Result<CompiledAssertions, GenerationError> {
    let Some((body, matchers)) = ctx.verification_side() else {
        return Ok(CompiledAssertions::default());
    };
    let resolved = resolve_structural(&body.value, request_model);
    compile_assertions(&VerificationInput {
        body: &resolved,
        format: body.format,
        matchers,
        identity: &ctx.contract.identity,
        assert_collection_size: ctx.config.assert_collection_size,
    })
}

// ============================================================================
// SECTION: Section Assembly
// ============================================================================

/// Opens the given section when any preparation producer accepts.
fn assemble_given(
    ctx: &GenerationContext<'_>,
    builder: &mut BlockBuilder,
) -> Result<(), BlockError> {
    let accepted: Vec<GivenProducer> =
        GivenProducer::ALL.into_iter().filter(|producer| producer.accepts(ctx)).collect();
    if accepted.is_empty() {
        return Ok(());
    }
    builder.open(BlockKind::Given)?;
    for producer in accepted {
        // One chained declaration: no blank lines between contributors.
        producer.apply(ctx, builder)?;
    }
    builder.add_ending_if_not_present();
    builder.close(BlockKind::Given)
}

/// Emits the single selected call producer into the when section.
fn assemble_when(
    ctx: &GenerationContext<'_>,
    call: WhenProducer,
    builder: &mut BlockBuilder,
) -> Result<(), BlockError> {
    builder.open(BlockKind::When)?;
    call.apply(ctx, builder)?;
    builder.add_ending_if_not_present();
    builder.close(BlockKind::When)
}

/// Emits assertion producers, then the body verification `and` sections.
fn assemble_then(
    ctx: &GenerationContext<'_>,
    compiled: &CompiledAssertions,
    builder: &mut BlockBuilder,
) -> Result<(), BlockError> {
    builder.open(BlockKind::Then)?;
    let accepted: Vec<ThenProducer> =
        ThenProducer::ALL.into_iter().filter(|producer| producer.accepts(ctx)).collect();
    for (index, producer) in accepted.iter().enumerate() {
        if index > 0 {
            builder.add_empty_line();
        }
        producer.apply(ctx, builder)?;
        builder.add_ending_if_not_present();
    }
    if compiled.flattened.is_empty() && compiled.matcher_driven.is_empty() {
        return builder.close(BlockKind::Then);
    }

    let format = ctx.verification_side().map_or(BodyFormat::Json, |(body, _)| body.format);
    builder.open(BlockKind::And)?;
    builder.add_statement(&parse_statement(ctx, format))?;
    builder.add_ending_if_not_present();
    builder.add_empty_line();
    for assertion in &compiled.flattened {
        builder.add_statement(&render_assertion(assertion, format))?;
        builder.add_ending_if_not_present();
    }
    if !compiled.matcher_driven.is_empty() {
        if !compiled.flattened.is_empty() {
            // Matcher-driven assertions render as their own section.
            builder.open(BlockKind::And)?;
        }
        for assertion in &compiled.matcher_driven {
            builder.add_statement(&render_assertion(assertion, format))?;
            builder.add_ending_if_not_present();
        }
    }
    builder.close(BlockKind::And)
}

/// Returns the document-parsing statement opening the body section.
fn parse_statement(ctx: &GenerationContext<'_>, format: BodyFormat) -> String {
    let payload = match ctx.protocol() {
        Protocol::Http => "response.getBody().asString()".to_string(),
        Protocol::Messaging => {
            "contractVerifierObjectMapper.writeValueAsString(response.getPayload())".to_string()
        }
    };
    match format {
        BodyFormat::Json => format!("DocumentContext parsedJson = JsonPath.parse({payload})"),
        BodyFormat::Xml => format!("Object parsedXml = Xml.getDocument({payload})"),
    }
}

// ============================================================================
// SECTION: Text Rendering
// ============================================================================

/// Renders signature and blocks into method text.
fn render_method(
    ctx: &GenerationContext<'_>,
    signature: &[String],
    blocks: &[CodeBlock],
) -> String {
    let mut out = String::new();
    for line in signature {
        push_line(&mut out, METHOD_INDENT, line);
    }
    for (index, block) in blocks.iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        push_line(&mut out, block.indent, ctx.config.framework.block_label(block.kind));
        for line in &block.lines {
            if line.text.is_empty() {
                out.push('\n');
            } else {
                push_line(&mut out, block.indent + 1 + line.indent_delta, &line.text);
            }
        }
    }
    push_line(&mut out, METHOD_INDENT, "}");
    out
}

/// Appends one indented line plus newline.
fn push_line(out: &mut String, indent: usize, text: &str) {
    for _ in 0 .. indent {
        out.push_str(INDENT_UNIT);
    }
    out.push_str(text);
    out.push('\n');
}

// ============================================================================
// SECTION: Error Mapping
// ============================================================================

/// Maps an assembly failure onto the offending contract.
fn block_mismatch(ctx: &GenerationContext<'_>, error: &BlockError) -> GenerationError {
    GenerationError::BlockMismatch {
        contract: ctx.contract.identity.clone(),
        detail: error.to_string(),
    }
}
