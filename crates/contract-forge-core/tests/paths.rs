// crates/contract-forge-core/tests/paths.rs
// ============================================================================
// Module: Path Tests
// Description: Validate path parsing, rendering, and coverage semantics.
// Purpose: Ensure wildcard-aware coverage matches on segments, not strings.
// Dependencies: contract-forge-core
// ============================================================================

//! Path parsing, rendering, and coverage tests.

use contract_forge_core::BodyFormat;
use contract_forge_core::BodyPath;
use contract_forge_core::PathSegment;

fn json(text: &str) -> Result<BodyPath, Box<dyn std::error::Error>> {
    Ok(BodyPath::parse(text, BodyFormat::Json)?)
}

#[test]
fn parses_dotted_json_path_with_index() -> Result<(), Box<dyn std::error::Error>> {
    let path = json("$.order.lines[2].sku")?;
    assert_eq!(
        path.segments,
        vec![
            PathSegment::Field("order".to_string()),
            PathSegment::Field("lines".to_string()),
            PathSegment::Index(2),
            PathSegment::Field("sku".to_string()),
        ]
    );
    assert_eq!(path.render(BodyFormat::Json), "$.order.lines[2].sku");
    Ok(())
}

#[test]
fn parses_bracketed_field_names() -> Result<(), Box<dyn std::error::Error>> {
    let path = json("$['content-type']")?;
    assert_eq!(path.segments, vec![PathSegment::Field("content-type".to_string())]);
    // Non-identifier names render back in bracket form.
    assert_eq!(path.render(BodyFormat::Json), "$['content-type']");
    Ok(())
}

#[test]
fn parses_wildcard_and_descendant_segments() -> Result<(), Box<dyn std::error::Error>> {
    let wildcard = json("$.items[*].id")?;
    assert!(wildcard.is_wildcard());
    assert_eq!(wildcard.render(BodyFormat::Json), "$.items[*].id");

    let descendant = json("$..id")?;
    assert!(descendant.is_wildcard());
    assert_eq!(
        descendant.segments,
        vec![PathSegment::AnyDescendant, PathSegment::Field("id".to_string())]
    );
    assert_eq!(descendant.render(BodyFormat::Json), "$..id");
    Ok(())
}

#[test]
fn concrete_paths_are_not_wildcards() -> Result<(), Box<dyn std::error::Error>> {
    assert!(!json("$.items[0].id")?.is_wildcard());
    Ok(())
}

#[test]
fn coverage_includes_own_location_and_subtree() -> Result<(), Box<dyn std::error::Error>> {
    let matcher = json("$.user")?;
    assert!(matcher.covers(&json("$.user")?));
    assert!(matcher.covers(&json("$.user.name")?));
    assert!(matcher.covers(&json("$.user.address.city")?));
    assert!(!matcher.covers(&json("$.username")?));
    assert!(!matcher.covers(&json("$")?));
    Ok(())
}

#[test]
fn any_index_covers_every_concrete_index() -> Result<(), Box<dyn std::error::Error>> {
    let matcher = json("$.items[*].sku")?;
    assert!(matcher.covers(&json("$.items[0].sku")?));
    assert!(matcher.covers(&json("$.items[17].sku")?));
    assert!(!matcher.covers(&json("$.items[0].name")?));
    Ok(())
}

#[test]
fn descendant_covers_any_nesting_depth() -> Result<(), Box<dyn std::error::Error>> {
    let matcher = json("$..id")?;
    assert!(matcher.covers(&json("$.id")?));
    assert!(matcher.covers(&json("$.user.id")?));
    assert!(matcher.covers(&json("$.orders[3].lines[0].id")?));
    assert!(!matcher.covers(&json("$.user.name")?));
    Ok(())
}

#[test]
fn xml_paths_use_one_based_indices() -> Result<(), Box<dyn std::error::Error>> {
    let path = BodyPath::parse("/order/lines[2]/sku", BodyFormat::Xml)?;
    assert_eq!(
        path.segments,
        vec![
            PathSegment::Field("order".to_string()),
            PathSegment::Field("lines".to_string()),
            PathSegment::Index(1),
            PathSegment::Field("sku".to_string()),
        ]
    );
    assert_eq!(path.render(BodyFormat::Xml), "/order/lines[2]/sku");
    Ok(())
}

#[test]
fn xml_rejects_zero_index() {
    assert!(BodyPath::parse("/order/lines[0]", BodyFormat::Xml).is_err());
}

#[test]
fn rejects_malformed_expressions() {
    assert!(BodyPath::parse("$.a[", BodyFormat::Json).is_err());
    assert!(BodyPath::parse("$..", BodyFormat::Json).is_err());
    assert!(BodyPath::parse("$.a..b[?]", BodyFormat::Json).is_err());
    assert!(BodyPath::parse("$.", BodyFormat::Json).is_err());
}

#[test]
fn child_appends_without_mutating_parent() -> Result<(), Box<dyn std::error::Error>> {
    let parent = json("$.a")?;
    let child = parent.child(PathSegment::Field("b".to_string()));
    assert_eq!(parent.render(BodyFormat::Json), "$.a");
    assert_eq!(child.render(BodyFormat::Json), "$.a.b");
    Ok(())
}
