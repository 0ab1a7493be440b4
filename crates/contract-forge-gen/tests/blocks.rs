// crates/contract-forge-gen/tests/blocks.rs
// ============================================================================
// Module: Block Assembler Tests
// Description: Validate frame discipline, indentation, and line policies.
// Purpose: Ensure the assembler fails loudly on structural misuse.
// Dependencies: contract-forge-gen
// ============================================================================

//! Block assembler behavior tests.

use contract_forge_gen::BlockBuilder;
use contract_forge_gen::BlockError;
use contract_forge_gen::BlockKind;

#[test]
fn and_frame_reopens_at_then_indent() -> Result<(), Box<dyn std::error::Error>> {
    let mut builder = BlockBuilder::new(";", 1);
    builder.open(BlockKind::Then)?;
    builder.add_statement("assertThat(response.statusCode()).isEqualTo(200)")?;
    builder.open(BlockKind::And)?;
    builder.add_statement("assertThat(parsedJson.read(\"$.id\", Integer.class)).isEqualTo(1)")?;
    builder.open(BlockKind::And)?;
    builder.add_statement("assertThat(parsedJson.read(\"$.name\", String.class)).isEqualTo(\"a\")")?;
    builder.close(BlockKind::And)?;
    let blocks = builder.finish()?;
    let indents: Vec<usize> = blocks.iter().map(|block| block.indent).collect();
    // Every continuation section sits flush with the then frame it replaced.
    assert_eq!(indents, vec![2, 2, 2]);
    let kinds: Vec<BlockKind> = blocks.iter().map(|block| block.kind).collect();
    assert_eq!(kinds, vec![BlockKind::Then, BlockKind::And, BlockKind::And]);
    Ok(())
}

#[test]
fn close_verifies_frame_kind() -> Result<(), Box<dyn std::error::Error>> {
    let mut builder = BlockBuilder::new(";", 1);
    builder.open(BlockKind::Given)?;
    let error = builder.close(BlockKind::When).err().ok_or("expected kind mismatch")?;
    assert!(matches!(error, BlockError::KindMismatch { .. }));
    Ok(())
}

#[test]
fn and_without_then_is_rejected() {
    let mut builder = BlockBuilder::new(";", 1);
    assert!(matches!(builder.open(BlockKind::And), Err(BlockError::AndWithoutThen)));
}

#[test]
fn and_after_given_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let mut builder = BlockBuilder::new(";", 1);
    builder.open(BlockKind::Given)?;
    assert!(matches!(builder.open(BlockKind::And), Err(BlockError::AndWithoutThen)));
    Ok(())
}

#[test]
fn statement_without_open_frame_is_rejected() {
    let mut builder = BlockBuilder::new(";", 1);
    assert!(matches!(
        builder.add_statement("orphan"),
        Err(BlockError::NoOpenBlock { .. })
    ));
}

#[test]
fn finish_rejects_unclosed_frames() -> Result<(), Box<dyn std::error::Error>> {
    let mut builder = BlockBuilder::new(";", 1);
    builder.open(BlockKind::Given)?;
    let error = builder.finish().err().ok_or("expected unclosed error")?;
    assert!(matches!(
        error,
        BlockError::UnclosedBlocks {
            count: 1,
        }
    ));
    Ok(())
}

#[test]
fn ending_is_appended_exactly_once() -> Result<(), Box<dyn std::error::Error>> {
    let mut builder = BlockBuilder::new(";", 1);
    builder.open(BlockKind::Then)?;
    builder.add_statement("assertThat(x).isEqualTo(1)")?;
    builder.add_ending_if_not_present();
    builder.add_ending_if_not_present();
    builder.close(BlockKind::Then)?;
    let blocks = builder.finish()?;
    assert_eq!(blocks[0].lines[0].text, "assertThat(x).isEqualTo(1);");
    Ok(())
}

#[test]
fn close_terminates_a_pending_statement() -> Result<(), Box<dyn std::error::Error>> {
    let mut builder = BlockBuilder::new(";", 1);
    builder.open(BlockKind::When)?;
    builder.add_statement("ResponseOptions response = given()")?;
    builder.add_continuation(".get(\"/api\")")?;
    builder.close(BlockKind::When)?;
    let blocks = builder.finish()?;
    // The terminator lands on the last line of the chain.
    assert_eq!(blocks[0].lines[0].text, "ResponseOptions response = given()");
    assert_eq!(blocks[0].lines[1].text, ".get(\"/api\");");
    assert_eq!(blocks[0].lines[1].indent_delta, 2);
    Ok(())
}

#[test]
fn empty_ending_never_appends_punctuation() -> Result<(), Box<dyn std::error::Error>> {
    let mut builder = BlockBuilder::new("", 1);
    builder.open(BlockKind::Then)?;
    builder.add_statement("response.statusCode() == 200")?;
    builder.add_ending_if_not_present();
    builder.close(BlockKind::Then)?;
    let blocks = builder.finish()?;
    assert_eq!(blocks[0].lines[0].text, "response.statusCode() == 200");
    Ok(())
}

#[test]
fn blank_lines_never_lead_follow_or_double() -> Result<(), Box<dyn std::error::Error>> {
    let mut builder = BlockBuilder::new(";", 1);
    builder.open(BlockKind::Then)?;
    builder.add_empty_line();
    builder.add_statement("first()")?;
    builder.add_empty_line();
    builder.add_empty_line();
    builder.add_statement("second()")?;
    builder.add_empty_line();
    builder.close(BlockKind::Then)?;
    let blocks = builder.finish()?;
    let texts: Vec<&str> = blocks[0].lines.iter().map(|line| line.text.as_str()).collect();
    assert_eq!(texts, vec!["first();", "", "second();"]);
    Ok(())
}

#[test]
fn nested_frames_indent_one_level_per_depth() -> Result<(), Box<dyn std::error::Error>> {
    let mut builder = BlockBuilder::new(";", 1);
    builder.open(BlockKind::Given)?;
    builder.add_statement("setup()")?;
    builder.close(BlockKind::Given)?;
    builder.open(BlockKind::When)?;
    builder.add_statement("call()")?;
    builder.close(BlockKind::When)?;
    let blocks = builder.finish()?;
    assert!(blocks.iter().all(|block| block.indent == 2));
    Ok(())
}
