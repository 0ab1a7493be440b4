// crates/contract-forge-core/tests/dispatch.rs
// ============================================================================
// Module: Dispatcher Tests
// Description: Validate matcher dispatch, suppression, and fatal paths.
// Purpose: Ensure explicit matchers supersede and extend default assertions.
// Dependencies: contract-forge-core
// ============================================================================

//! Matcher dispatch tests for the verification compiler.

use std::collections::BTreeMap;

use contract_forge_core::AssertionKind;
use contract_forge_core::BodyFormat;
use contract_forge_core::BodyValue;
use contract_forge_core::CompiledAssertions;
use contract_forge_core::ContractIdentity;
use contract_forge_core::ErrorKind;
use contract_forge_core::ExpectedValue;
use contract_forge_core::GenerationError;
use contract_forge_core::Matcher;
use contract_forge_core::MatcherKind;
use contract_forge_core::VerificationInput;
use contract_forge_core::compile_assertions;

fn map(entries: Vec<(&str, BodyValue)>) -> BodyValue {
    BodyValue::Map(
        entries.into_iter().map(|(key, value)| (key.to_string(), value)).collect::<BTreeMap<_, _>>(),
    )
}

fn compile(
    body: &BodyValue,
    format: BodyFormat,
    matchers: &[Matcher],
) -> Result<CompiledAssertions, GenerationError> {
    compile_assertions(&VerificationInput {
        body,
        format,
        matchers,
        identity: &ContractIdentity::named("dispatch-test"),
        assert_collection_size: false,
    })
}

#[test]
fn matcher_path_suppresses_flattened_candidate() -> Result<(), Box<dyn std::error::Error>> {
    let body = map(vec![
        ("id", BodyValue::Int(42)),
        ("name", BodyValue::String("alice".to_string())),
    ]);
    let matchers = vec![
        Matcher::new("$.id", MatcherKind::Regex).with_value(BodyValue::Pattern("[0-9]+".to_string())),
    ];
    let compiled = compile(&body, BodyFormat::Json, &matchers)?;
    let flattened_paths: Vec<&str> =
        compiled.flattened.iter().map(|assertion| assertion.path.as_str()).collect();
    assert_eq!(flattened_paths, vec!["$.name"]);
    assert_eq!(compiled.matcher_driven.len(), 1);
    assert_eq!(compiled.matcher_driven[0].kind, AssertionKind::Matches);
    Ok(())
}

#[test]
fn equality_matcher_uses_example_body_value() -> Result<(), Box<dyn std::error::Error>> {
    // The declared value on an equality matcher is ignored; the example body
    // is the oracle.
    let body = map(vec![("id", BodyValue::Int(42))]);
    let matchers = vec![
        Matcher::new("$.id", MatcherKind::Equality).with_value(BodyValue::Int(7)),
    ];
    let compiled = compile(&body, BodyFormat::Json, &matchers)?;
    assert_eq!(
        compiled.matcher_driven[0].expected,
        Some(ExpectedValue::Literal(BodyValue::Int(42)))
    );
    Ok(())
}

#[test]
fn regex_matcher_on_wildcard_path_fans_out() -> Result<(), Box<dyn std::error::Error>> {
    let body = map(vec![(
        "ids",
        BodyValue::List(vec![BodyValue::Int(1), BodyValue::Int(2)]),
    )]);
    let matchers = vec![
        Matcher::new("$.ids[*]", MatcherKind::Regex)
            .with_value(BodyValue::Pattern("[0-9]+".to_string())),
    ];
    let compiled = compile(&body, BodyFormat::Json, &matchers)?;
    assert_eq!(compiled.matcher_driven.len(), 1);
    assert_eq!(compiled.matcher_driven[0].kind, AssertionKind::AllMatch);
    assert!(compiled.flattened.is_empty());
    Ok(())
}

#[test]
fn null_matcher_on_absent_path_is_not_fatal() -> Result<(), Box<dyn std::error::Error>> {
    // Asserting null on a path the body never declares is the entire point
    // of a null matcher.
    let body = map(vec![("id", BodyValue::Int(1))]);
    let matchers = vec![Matcher::new("$.missing", MatcherKind::Null)];
    let compiled = compile(&body, BodyFormat::Json, &matchers)?;
    assert_eq!(compiled.matcher_driven.len(), 1);
    assert_eq!(compiled.matcher_driven[0].kind, AssertionKind::IsNull);
    assert_eq!(compiled.matcher_driven[0].expected, None);
    Ok(())
}

#[test]
fn command_matcher_validates_path_eagerly() -> Result<(), Box<dyn std::error::Error>> {
    let body = map(vec![("id", BodyValue::Int(1))]);
    let matchers = vec![
        Matcher::new("$.missing", MatcherKind::Command)
            .with_value(BodyValue::ExecRef("check($it)".to_string())),
    ];
    let error = compile(&body, BodyFormat::Json, &matchers)
        .err()
        .ok_or("expected path not found")?;
    assert_eq!(error.kind(), ErrorKind::PathNotFound);
    Ok(())
}

#[test]
fn command_matcher_substitutes_snippet() -> Result<(), Box<dyn std::error::Error>> {
    let body = map(vec![("id", BodyValue::Int(1))]);
    let matchers = vec![
        Matcher::new("$.id", MatcherKind::Command)
            .with_value(BodyValue::ExecRef("assertPositive($it)".to_string())),
    ];
    let compiled = compile(&body, BodyFormat::Json, &matchers)?;
    assert_eq!(
        compiled.matcher_driven[0].expected,
        Some(ExpectedValue::Snippet(
            "assertPositive(parsedJson.read(\"$.id\"))".to_string()
        ))
    );
    Ok(())
}

#[test]
fn type_matcher_emits_instance_of_and_single_size_check()
-> Result<(), Box<dyn std::error::Error>> {
    let body = map(vec![(
        "ids",
        BodyValue::List(vec![BodyValue::Int(1), BodyValue::Int(2)]),
    )]);
    let matchers = vec![
        Matcher::new("$.ids", MatcherKind::Type).with_bounds(Some(1), Some(5)),
    ];
    let compiled = compile(&body, BodyFormat::Json, &matchers)?;
    let kinds: Vec<AssertionKind> =
        compiled.matcher_driven.iter().map(|assertion| assertion.kind).collect();
    assert_eq!(kinds, vec![AssertionKind::InstanceOf, AssertionKind::SizeBetween]);
    Ok(())
}

#[test]
fn type_matcher_with_only_min_emits_at_least() -> Result<(), Box<dyn std::error::Error>> {
    let body = map(vec![("ids", BodyValue::List(vec![BodyValue::Int(1)]))]);
    let matchers = vec![Matcher::new("$.ids", MatcherKind::Type).with_bounds(Some(1), None)];
    let compiled = compile(&body, BodyFormat::Json, &matchers)?;
    let kinds: Vec<AssertionKind> =
        compiled.matcher_driven.iter().map(|assertion| assertion.kind).collect();
    assert_eq!(kinds, vec![AssertionKind::InstanceOf, AssertionKind::SizeAtLeast]);
    Ok(())
}

#[test]
fn type_matcher_with_only_max_emits_at_most() -> Result<(), Box<dyn std::error::Error>> {
    let body = map(vec![("ids", BodyValue::List(vec![BodyValue::Int(1)]))]);
    let matchers = vec![Matcher::new("$.ids", MatcherKind::Type).with_bounds(None, Some(9))];
    let compiled = compile(&body, BodyFormat::Json, &matchers)?;
    let kinds: Vec<AssertionKind> =
        compiled.matcher_driven.iter().map(|assertion| assertion.kind).collect();
    assert_eq!(kinds, vec![AssertionKind::InstanceOf, AssertionKind::SizeAtMost]);
    Ok(())
}

#[test]
fn type_matcher_without_bounds_emits_no_size_check() -> Result<(), Box<dyn std::error::Error>> {
    let body = map(vec![("ids", BodyValue::List(vec![BodyValue::Int(1)]))]);
    let matchers = vec![Matcher::new("$.ids", MatcherKind::Type)];
    let compiled = compile(&body, BodyFormat::Json, &matchers)?;
    let kinds: Vec<AssertionKind> =
        compiled.matcher_driven.iter().map(|assertion| assertion.kind).collect();
    assert_eq!(kinds, vec![AssertionKind::InstanceOf]);
    Ok(())
}

#[test]
fn type_matcher_on_xml_body_is_unsupported() -> Result<(), Box<dyn std::error::Error>> {
    let body = map(vec![("id", BodyValue::String("1".to_string()))]);
    let matchers = vec![Matcher::new("/root/id", MatcherKind::Type)];
    let error =
        compile(&body, BodyFormat::Xml, &matchers).err().ok_or("expected unsupported check")?;
    assert_eq!(error.kind(), ErrorKind::UnsupportedTypeCheck);
    Ok(())
}

#[test]
fn duplicate_matchers_on_one_path_all_render() -> Result<(), Box<dyn std::error::Error>> {
    let body = map(vec![("id", BodyValue::String("abc".to_string()))]);
    let matchers = vec![
        Matcher::new("$.id", MatcherKind::Regex).with_value(BodyValue::Pattern("[a-z]+".to_string())),
        Matcher::new("$.id", MatcherKind::Regex).with_value(BodyValue::Pattern(".{3}".to_string())),
    ];
    let compiled = compile(&body, BodyFormat::Json, &matchers)?;
    assert_eq!(compiled.matcher_driven.len(), 2);
    Ok(())
}

#[test]
fn unparseable_matcher_path_reads_as_unresolvable() -> Result<(), Box<dyn std::error::Error>> {
    let body = map(vec![("id", BodyValue::Int(1))]);
    let matchers = vec![Matcher::new("$.id[", MatcherKind::Regex)];
    let error = compile(&body, BodyFormat::Json, &matchers)
        .err()
        .ok_or("expected path not found")?;
    assert_eq!(error.kind(), ErrorKind::PathNotFound);
    Ok(())
}

#[test]
fn dispatched_patterns_match_their_example_values() -> Result<(), Box<dyn std::error::Error>> {
    // The pattern text that reaches the renderer must be a usable regex that
    // accepts the example value the body declares.
    let body = map(vec![("email", BodyValue::String("alice@example.com".to_string()))]);
    let matchers = vec![
        Matcher::new("$.email", MatcherKind::Regex)
            .with_value(BodyValue::Pattern("[a-z]+@[a-z]+\\.com".to_string())),
    ];
    let compiled = compile(&body, BodyFormat::Json, &matchers)?;
    let Some(ExpectedValue::Pattern(pattern)) = &compiled.matcher_driven[0].expected else {
        return Err("expected a pattern".into());
    };
    let compiled_pattern = regex::Regex::new(&format!("^{pattern}$"))?;
    assert!(compiled_pattern.is_match("alice@example.com"));
    Ok(())
}

#[test]
fn matcher_order_is_preserved() -> Result<(), Box<dyn std::error::Error>> {
    let body = map(vec![
        ("a", BodyValue::Int(1)),
        ("b", BodyValue::Int(2)),
    ]);
    let matchers = vec![
        Matcher::new("$.b", MatcherKind::Regex).with_value(BodyValue::Pattern("2".to_string())),
        Matcher::new("$.a", MatcherKind::Regex).with_value(BodyValue::Pattern("1".to_string())),
    ];
    let compiled = compile(&body, BodyFormat::Json, &matchers)?;
    let paths: Vec<&str> =
        compiled.matcher_driven.iter().map(|assertion| assertion.path.as_str()).collect();
    assert_eq!(paths, vec!["$.b", "$.a"]);
    Ok(())
}
