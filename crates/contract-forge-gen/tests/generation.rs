// crates/contract-forge-gen/tests/generation.rs
// ============================================================================
// Module: Generation Tests
// Description: Validate full method assembly across protocols and frameworks.
// Purpose: Ensure producer selection, sections, and templates compose.
// Dependencies: contract-forge-core, contract-forge-gen
// ============================================================================

//! End-to-end method generation tests.

use std::collections::BTreeMap;

use contract_forge_core::BodyValue;
use contract_forge_core::Contract;
use contract_forge_core::ContractBody;
use contract_forge_core::ContractExchange;
use contract_forge_core::ContractIdentity;
use contract_forge_core::ErrorKind;
use contract_forge_core::Header;
use contract_forge_core::HttpRequest;
use contract_forge_core::HttpResponse;
use contract_forge_core::InputMessage;
use contract_forge_core::Matcher;
use contract_forge_core::MatcherKind;
use contract_forge_core::OutputMessage;
use contract_forge_gen::BlockKind;
use contract_forge_gen::GenerationConfig;
use contract_forge_gen::TestFramework;
use contract_forge_gen::generate_method;

fn map(entries: Vec<(&str, BodyValue)>) -> BodyValue {
    BodyValue::Map(
        entries.into_iter().map(|(key, value)| (key.to_string(), value)).collect::<BTreeMap<_, _>>(),
    )
}

fn json_header(name: &str) -> Header {
    Header {
        name: name.to_string(),
        value: BodyValue::String("application/json".to_string()),
    }
}

fn http_contract(matchers: Vec<Matcher>) -> Contract {
    Contract {
        identity: ContractIdentity::named("shouldReturnOrder"),
        exchange: ContractExchange::Http {
            request: HttpRequest {
                method: "POST".to_string(),
                url: "/api/orders".to_string(),
                headers: vec![json_header("Content-Type")],
                cookies: Vec::new(),
                body: Some(ContractBody::json(BodyValue::String(
                    "{\"a\":\"b\"}".to_string(),
                ))),
                multipart: None,
            },
            response: HttpResponse {
                status: 200,
                headers: vec![json_header("Content-Type")],
                cookies: Vec::new(),
                body: Some(ContractBody::json(map(vec![
                    ("id", BodyValue::Int(42)),
                    ("name", BodyValue::String("alice".to_string())),
                ]))),
                matchers,
            },
        },
    }
}

fn messaging_contract() -> Contract {
    Contract {
        identity: ContractIdentity::named("shouldEmitEvent"),
        exchange: ContractExchange::Messaging {
            input: InputMessage {
                sent_to: Some("orders.in".to_string()),
                triggered_by: None,
                headers: Vec::new(),
                body: Some(ContractBody::json(map(vec![(
                    "command",
                    BodyValue::String("create".to_string()),
                )]))),
            },
            output: OutputMessage {
                sent_to: "orders.out".to_string(),
                headers: Vec::new(),
                body: Some(ContractBody::json(map(vec![(
                    "status",
                    BodyValue::String("ok".to_string()),
                )]))),
                matchers: Vec::new(),
            },
        },
    }
}

#[test]
fn generates_full_junit_http_method() -> Result<(), Box<dyn std::error::Error>> {
    let contract = http_contract(Vec::new());
    let method = generate_method(&contract, &GenerationConfig::default())?;

    assert_eq!(method.name, "validate_shouldReturnOrder");
    assert_eq!(method.signature, vec![
        "@Test".to_string(),
        "public void validate_shouldReturnOrder() throws Exception {".to_string(),
    ]);
    assert!(method.text.contains("// given:"));
    assert!(method.text.contains("MockMvcRequestSpecification request = given()"));
    assert!(method.text.contains(".header(\"Content-Type\", \"application/json\")"));
    assert!(method.text.contains(".body(\"{\\\"a\\\":\\\"b\\\"}\");"));
    assert!(method.text.contains("// when:"));
    assert!(method.text.contains("ResponseOptions response = given().spec(request)"));
    assert!(method.text.contains(".post(\"/api/orders\");"));
    assert!(method.text.contains("// then:"));
    assert!(method.text.contains("assertThat(response.statusCode()).isEqualTo(200);"));
    assert!(method.text.contains("// and:"));
    assert!(
        method
            .text
            .contains("DocumentContext parsedJson = JsonPath.parse(response.getBody().asString());")
    );
    assert!(
        method.text.contains("assertThat(parsedJson.read(\"$.id\", Integer.class)).isEqualTo(42);")
    );
    assert!(method.text.trim_end().ends_with('}'));
    Ok(())
}

#[test]
fn matcher_assertions_render_in_their_own_section() -> Result<(), Box<dyn std::error::Error>> {
    let contract = http_contract(vec![
        Matcher::new("$.name", MatcherKind::Regex)
            .with_value(BodyValue::Pattern("[a-z]+".to_string())),
    ]);
    let method = generate_method(&contract, &GenerationConfig::default())?;

    let and_blocks: Vec<_> =
        method.blocks.iter().filter(|block| block.kind == BlockKind::And).collect();
    assert_eq!(and_blocks.len(), 2);
    assert!(
        method
            .text
            .contains("assertThat(parsedJson.read(\"$.name\", String.class)).matches(\"[a-z]+\");")
    );
    // The flattened equality for the matched path is suppressed.
    assert!(!method.text.contains("read(\"$.name\", String.class)).isEqualTo"));
    Ok(())
}

#[test]
fn and_sections_render_flush_with_then() -> Result<(), Box<dyn std::error::Error>> {
    let contract = http_contract(Vec::new());
    let method = generate_method(&contract, &GenerationConfig::default())?;
    let then_indent = method
        .blocks
        .iter()
        .find(|block| block.kind == BlockKind::Then)
        .map(|block| block.indent)
        .ok_or("missing then block")?;
    assert!(
        method
            .blocks
            .iter()
            .filter(|block| block.kind == BlockKind::And)
            .all(|block| block.indent == then_indent)
    );
    Ok(())
}

#[test]
fn body_only_request_yields_minimal_given_section() -> Result<(), Box<dyn std::error::Error>> {
    let mut contract = http_contract(Vec::new());
    if let ContractExchange::Http {
        request, ..
    } = &mut contract.exchange
    {
        request.headers.clear();
        request.cookies.clear();
    }
    let method = generate_method(&contract, &GenerationConfig::default())?;
    let given = method
        .blocks
        .iter()
        .find(|block| block.kind == BlockKind::Given)
        .ok_or("missing given block")?;
    let texts: Vec<&str> = given.lines.iter().map(|line| line.text.as_str()).collect();
    assert_eq!(texts, vec![
        "MockMvcRequestSpecification request = given()",
        ".body(\"{\\\"a\\\":\\\"b\\\"}\");",
    ]);
    Ok(())
}

#[test]
fn spock_methods_use_bare_labels_without_terminators() -> Result<(), Box<dyn std::error::Error>> {
    let contract = http_contract(Vec::new());
    let config = GenerationConfig {
        framework: TestFramework::Spock,
        ..GenerationConfig::default()
    };
    let method = generate_method(&contract, &config)?;

    assert_eq!(method.signature, vec!["def validate_shouldReturnOrder() {".to_string()]);
    assert!(method.text.contains("\tgiven:"));
    assert!(method.text.contains("\twhen:"));
    assert!(method.text.contains("\tthen:"));
    assert!(!method.text.contains("//"));
    assert!(!method.text.contains(';'));
    Ok(())
}

#[test]
fn messaging_contract_sends_and_receives() -> Result<(), Box<dyn std::error::Error>> {
    let method = generate_method(&messaging_contract(), &GenerationConfig::default())?;

    assert!(
        method
            .text
            .contains("ContractVerifierMessage inputMessage = contractVerifierMessaging.create(")
    );
    assert!(
        method.text.contains("contractVerifierMessaging.send(inputMessage, \"orders.in\");")
    );
    assert!(
        method
            .text
            .contains("ContractVerifierMessage response = contractVerifierMessaging.receive(\"orders.out\");")
    );
    assert!(method.text.contains("assertThat(response).isNotNull();"));
    assert!(method.text.contains("contractVerifierObjectMapper.writeValueAsString(response.getPayload())"));
    assert_eq!(method.annotations, vec!["@AutoConfigureMessageVerifier".to_string()]);
    assert!(!method.fields.is_empty());
    Ok(())
}

#[test]
fn untriggerable_messaging_contract_is_a_config_mismatch()
-> Result<(), Box<dyn std::error::Error>> {
    let mut contract = messaging_contract();
    if let ContractExchange::Messaging {
        input, ..
    } = &mut contract.exchange
    {
        input.sent_to = None;
        input.triggered_by = None;
    }
    let error = generate_method(&contract, &GenerationConfig::default())
        .err()
        .ok_or("expected config mismatch")?;
    assert_eq!(error.kind(), ErrorKind::ConfigNoMatch);
    Ok(())
}

#[test]
fn escaped_body_reference_expands_over_rendered_text()
-> Result<(), Box<dyn std::error::Error>> {
    let mut contract = http_contract(Vec::new());
    if let ContractExchange::Http {
        response, ..
    } = &mut contract.exchange
    {
        response.body = Some(ContractBody::json(map(vec![(
            "echo",
            BodyValue::TemplateRef("escapejsonbody".to_string()),
        )])));
    }
    let method = generate_method(&contract, &GenerationConfig::default())?;

    assert!(!method.text.contains("{{{request.escapedBody}}}"));
    assert!(method.text.contains(".isEqualTo(\"{\\\"a\\\":\\\"b\\\"}\");"));
    Ok(())
}

#[test]
fn method_suffix_and_sanitization_apply() -> Result<(), Box<dyn std::error::Error>> {
    let mut contract = http_contract(Vec::new());
    contract.identity = ContractIdentity::named("should return order!");
    let config = GenerationConfig {
        method_suffix: Some("_v2".to_string()),
        ..GenerationConfig::default()
    };
    let method = generate_method(&contract, &config)?;
    assert_eq!(method.name, "validate_should_return_order__v2");
    Ok(())
}

#[test]
fn imports_follow_protocol_and_framework() -> Result<(), Box<dyn std::error::Error>> {
    let method = generate_method(&http_contract(Vec::new()), &GenerationConfig::default())?;
    assert!(
        method
            .imports
            .contains(&"static org.assertj.core.api.Assertions.assertThat".to_string())
    );
    assert!(method.imports.contains(&"com.jayway.jsonpath.DocumentContext".to_string()));
    assert!(method.imports.contains(&"org.junit.jupiter.api.Test".to_string()));
    assert!(
        method
            .imports
            .contains(&"static io.restassured.module.mockmvc.RestAssuredMockMvc.given".to_string())
    );
    Ok(())
}
