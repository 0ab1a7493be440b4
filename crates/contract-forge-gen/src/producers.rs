// crates/contract-forge-gen/src/producers.rs
// ============================================================================
// Module: Section Producers
// Description: Closed producer sets for every method section.
// Purpose: Each producer declares acceptance and emits its lines.
// Dependencies: contract-forge-core, crate::{blocks, context, render}
// ============================================================================

//! ## Overview
//! Every section of a generated method is filled by a closed enum of
//! producers. A producer inspects the immutable context, reports whether it
//! accepts the contract, and emits lines into the block builder. Closed enums
//! replace open registration: the full producer set is visible in one match,
//! and an unhandled combination is a compile error rather than a silent gap.
//!
//! Families come in two shapes. All-accepting families apply every accepting
//! producer in declaration order. Exactly-one families must select a single
//! producer; zero acceptors is a fatal configuration mismatch.

// ============================================================================
// SECTION: Imports
// ============================================================================

use contract_forge_core::BodyFormat;
use contract_forge_core::BodyValue;
use contract_forge_core::GenerationError;
use contract_forge_core::Header;
use contract_forge_core::HttpRequest;
use contract_forge_core::MultipartPart;

use crate::blocks::BlockBuilder;
use crate::blocks::BlockError;
use crate::context::ClientFlavor;
use crate::context::GenerationContext;
use crate::context::Protocol;
use crate::context::TestFramework;
use crate::render::escape_java;

// ============================================================================
// SECTION: Given Producers
// ============================================================================

/// Producers for the request-preparation section.
///
/// All-accepting; contributions form one chained declaration, so no blank
/// lines or per-producer terminators apply inside the section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GivenProducer {
    /// Opens the request specification chain.
    RequestDeclaration,
    /// Chains declared request headers.
    RequestHeaders,
    /// Chains declared request cookies.
    RequestCookies,
    /// Chains the example request body.
    RequestBody,
    /// Chains multipart parameters and parts.
    RequestMultipart,
    /// Opens the input-message declaration.
    MessageDeclaration,
    /// Chains declared input-message headers.
    MessageHeaders,
}

impl GivenProducer {
    /// Full producer set in application order.
    pub const ALL: [Self; 7] = [
        Self::RequestDeclaration,
        Self::RequestHeaders,
        Self::RequestCookies,
        Self::RequestBody,
        Self::RequestMultipart,
        Self::MessageDeclaration,
        Self::MessageHeaders,
    ];

    /// Returns whether this producer fires for the contract.
    #[must_use]
    pub fn accepts(self, ctx: &GenerationContext<'_>) -> bool {
        let http = ctx.config.flavor != ClientFlavor::JaxRs;
        match self {
            Self::RequestDeclaration => {
                http && ctx.protocol() == Protocol::Http && ctx.has_given_section()
            }
            Self::RequestHeaders => {
                http && ctx.request().is_some_and(|request| !request.headers.is_empty())
            }
            Self::RequestCookies => {
                http && ctx.request().is_some_and(|request| !request.cookies.is_empty())
            }
            Self::RequestBody => http && ctx.request().is_some_and(|request| request.body.is_some()),
            Self::RequestMultipart => {
                http && ctx.request().is_some_and(|request| request.multipart.is_some())
            }
            Self::MessageDeclaration => {
                ctx.input_message().is_some_and(|input| input.body.is_some())
            }
            Self::MessageHeaders => {
                ctx.input_message()
                    .is_some_and(|input| input.body.is_some() && !input.headers.is_empty())
            }
        }
    }

    /// Emits this producer's lines.
    ///
    /// # Errors
    /// Returns [`BlockError`] when no frame is open.
    pub fn apply(
        self,
        ctx: &GenerationContext<'_>,
        builder: &mut BlockBuilder,
    ) -> Result<(), BlockError> {
        match self {
            Self::RequestDeclaration => {
                let declaration = match ctx.config.flavor {
                    ClientFlavor::MockMvc => "MockMvcRequestSpecification request = given()",
                    ClientFlavor::Explicit | ClientFlavor::JaxRs => {
                        "RequestSpecification request = given()"
                    }
                };
                builder.add_statement(declaration)
            }
            Self::RequestHeaders => {
                let Some(request) = ctx.request() else {
                    return Ok(());
                };
                chain_headers(builder, &request.headers, "header")
            }
            Self::RequestCookies => {
                let Some(request) = ctx.request() else {
                    return Ok(());
                };
                for cookie in &request.cookies {
                    builder.add_continuation(&format!(
                        ".cookie(\"{}\", \"{}\")",
                        escape_java(&cookie.name),
                        escape_java(&header_text(&cookie.value))
                    ))?;
                }
                Ok(())
            }
            Self::RequestBody => {
                let Some(body) = ctx.request().and_then(|request| request.body.as_ref()) else {
                    return Ok(());
                };
                builder.add_continuation(&format!(
                    ".body(\"{}\")",
                    escape_java(&body_text(&body.value))
                ))
            }
            Self::RequestMultipart => {
                let Some(multipart) =
                    ctx.request().and_then(|request| request.multipart.as_ref())
                else {
                    return Ok(());
                };
                for part in &multipart.parts {
                    builder.add_continuation(&multipart_call(part))?;
                }
                Ok(())
            }
            Self::MessageDeclaration => {
                let Some(body) = ctx.input_message().and_then(|input| input.body.as_ref()) else {
                    return Ok(());
                };
                builder.add_statement(&format!(
                    "ContractVerifierMessage inputMessage = contractVerifierMessaging.create(\"{}\")",
                    escape_java(&body_text(&body.value))
                ))
            }
            Self::MessageHeaders => {
                let Some(input) = ctx.input_message() else {
                    return Ok(());
                };
                chain_headers(builder, &input.headers, "header")
            }
        }
    }
}

// ============================================================================
// SECTION: When Producers
// ============================================================================

/// Producers for the call under test. Exactly-one family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhenProducer {
    /// MockMvc-backed RestAssured call.
    MockMvcCall,
    /// Explicit RestAssured call.
    ExplicitCall,
    /// JAX-RS client call, request built inline.
    JaxRsCall,
    /// Messaging trigger or send.
    MessagingTrigger,
}

impl WhenProducer {
    /// Full producer set in selection order.
    pub const ALL: [Self; 4] =
        [Self::MockMvcCall, Self::ExplicitCall, Self::JaxRsCall, Self::MessagingTrigger];

    /// Selects the single accepting producer.
    ///
    /// # Errors
    /// Returns [`GenerationError::ConfigNoMatch`] when no producer accepts;
    /// a contract the configuration cannot call is a fatal mismatch.
    pub fn select(ctx: &GenerationContext<'_>) -> Result<Self, GenerationError> {
        Self::ALL.into_iter().find(|producer| producer.accepts(ctx)).ok_or_else(|| {
            GenerationError::ConfigNoMatch {
                contract: ctx.contract.identity.clone(),
                family: "call".to_string(),
            }
        })
    }

    /// Returns whether this producer fires for the contract.
    #[must_use]
    pub fn accepts(self, ctx: &GenerationContext<'_>) -> bool {
        match self {
            Self::MockMvcCall => {
                ctx.protocol() == Protocol::Http && ctx.config.flavor == ClientFlavor::MockMvc
            }
            Self::ExplicitCall => {
                ctx.protocol() == Protocol::Http && ctx.config.flavor == ClientFlavor::Explicit
            }
            Self::JaxRsCall => {
                ctx.protocol() == Protocol::Http && ctx.config.flavor == ClientFlavor::JaxRs
            }
            Self::MessagingTrigger => {
                // A messaging contract must declare how the exchange starts.
                ctx.input_message()
                    .is_some_and(|input| input.triggered_by.is_some() || input.sent_to.is_some())
            }
        }
    }

    /// Emits the call statement.
    ///
    /// # Errors
    /// Returns [`BlockError`] when no frame is open.
    pub fn apply(
        self,
        ctx: &GenerationContext<'_>,
        builder: &mut BlockBuilder,
    ) -> Result<(), BlockError> {
        match self {
            Self::MockMvcCall | Self::ExplicitCall => {
                let response_type =
                    if self == Self::MockMvcCall { "ResponseOptions" } else { "Response" };
                let opening = if ctx.has_given_section() {
                    format!("{response_type} response = given().spec(request)")
                } else {
                    format!("{response_type} response = given()")
                };
                builder.add_statement(&opening)?;
                if let Some(request) = ctx.request() {
                    builder.add_continuation(&format!(
                        ".{}(\"{}\")",
                        request.method.to_ascii_lowercase(),
                        escape_java(&request.url)
                    ))?;
                }
                Ok(())
            }
            Self::JaxRsCall => {
                let Some(request) = ctx.request() else {
                    return Ok(());
                };
                apply_jax_rs(request, builder)
            }
            Self::MessagingTrigger => {
                let Some(input) = ctx.input_message() else {
                    return Ok(());
                };
                if let Some(trigger) = &input.triggered_by {
                    return builder.add_statement(trigger);
                }
                let destination = input.sent_to.as_deref().unwrap_or_default();
                builder.add_statement(&format!(
                    "contractVerifierMessaging.send(inputMessage, \"{}\")",
                    escape_java(destination)
                ))
            }
        }
    }
}

/// Emits the inline JAX-RS client call, headers and entity included.
fn apply_jax_rs(request: &HttpRequest, builder: &mut BlockBuilder) -> Result<(), BlockError> {
    let (path, _) =
        request.url.split_once('?').map_or((request.url.as_str(), ""), |parts| parts);
    builder.add_statement("Response response = webTarget")?;
    builder.add_continuation(&format!(".path(\"{}\")", escape_java(path)))?;
    builder.add_continuation(".request()")?;
    for header in &request.headers {
        builder.add_continuation(&format!(
            ".header(\"{}\", \"{}\")",
            escape_java(&header.name),
            escape_java(&header_text(&header.value))
        ))?;
    }
    let method = request.method.to_ascii_uppercase();
    match &request.body {
        Some(body) => {
            let content_type = request
                .headers
                .iter()
                .find(|header| header.name.eq_ignore_ascii_case("Content-Type"))
                .map_or_else(|| "application/json".to_string(), |header| {
                    header_text(&header.value)
                });
            builder.add_continuation(&format!(
                ".method(\"{method}\", entity(\"{}\", \"{}\"))",
                escape_java(&body_text(&body.value)),
                escape_java(&content_type)
            ))
        }
        None => builder.add_continuation(&format!(".method(\"{method}\")")),
    }
}

// ============================================================================
// SECTION: Then Producers
// ============================================================================

/// Producers for the primary assertion section. All-accepting.
///
/// Body assertions are not a member: the verification compiler emits them
/// into dedicated `and` frames after this family runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThenProducer {
    /// Asserts the response status code.
    Status,
    /// Asserts declared response headers.
    ResponseHeaders,
    /// Asserts declared response cookies.
    ResponseCookies,
    /// Receives the output message and asserts its presence.
    MessageReceive,
    /// Asserts declared output-message headers.
    MessageHeaders,
}

impl ThenProducer {
    /// Full producer set in application order.
    pub const ALL: [Self; 5] = [
        Self::Status,
        Self::ResponseHeaders,
        Self::ResponseCookies,
        Self::MessageReceive,
        Self::MessageHeaders,
    ];

    /// Returns whether this producer fires for the contract.
    #[must_use]
    pub fn accepts(self, ctx: &GenerationContext<'_>) -> bool {
        match self {
            Self::Status => ctx.response().is_some(),
            Self::ResponseHeaders => {
                ctx.response().is_some_and(|response| !response.headers.is_empty())
            }
            Self::ResponseCookies => {
                ctx.response().is_some_and(|response| !response.cookies.is_empty())
            }
            Self::MessageReceive => ctx.output_message().is_some(),
            Self::MessageHeaders => {
                ctx.output_message().is_some_and(|output| !output.headers.is_empty())
            }
        }
    }

    /// Emits this producer's assertion statements.
    ///
    /// # Errors
    /// Returns [`BlockError`] when no frame is open.
    pub fn apply(
        self,
        ctx: &GenerationContext<'_>,
        builder: &mut BlockBuilder,
    ) -> Result<(), BlockError> {
        match self {
            Self::Status => {
                let Some(response) = ctx.response() else {
                    return Ok(());
                };
                builder.add_statement(&format!(
                    "assertThat(response.statusCode()).isEqualTo({})",
                    response.status
                ))
            }
            Self::ResponseHeaders => {
                let Some(response) = ctx.response() else {
                    return Ok(());
                };
                for header in &response.headers {
                    let accessor = format!("response.header(\"{}\")", escape_java(&header.name));
                    builder.add_statement(&header_assertion(&accessor, &header.value))?;
                    builder.add_ending_if_not_present();
                }
                Ok(())
            }
            Self::ResponseCookies => {
                let Some(response) = ctx.response() else {
                    return Ok(());
                };
                for cookie in &response.cookies {
                    let accessor = format!("response.cookie(\"{}\")", escape_java(&cookie.name));
                    builder.add_statement(&header_assertion(&accessor, &cookie.value))?;
                    builder.add_ending_if_not_present();
                }
                Ok(())
            }
            Self::MessageReceive => {
                let Some(output) = ctx.output_message() else {
                    return Ok(());
                };
                builder.add_statement(&format!(
                    "ContractVerifierMessage response = contractVerifierMessaging.receive(\"{}\")",
                    escape_java(&output.sent_to)
                ))?;
                builder.add_ending_if_not_present();
                builder.add_statement("assertThat(response).isNotNull()")
            }
            Self::MessageHeaders => {
                let Some(output) = ctx.output_message() else {
                    return Ok(());
                };
                for header in &output.headers {
                    let accessor =
                        format!("response.getHeader(\"{}\").toString()", escape_java(&header.name));
                    builder.add_statement(&header_assertion(&accessor, &header.value))?;
                    builder.add_ending_if_not_present();
                }
                Ok(())
            }
        }
    }
}

/// Renders one header/cookie assertion; pattern values match, others equal.
fn header_assertion(accessor: &str, value: &BodyValue) -> String {
    match value {
        BodyValue::Pattern(pattern) => {
            format!("assertThat({accessor}).matches(\"{}\")", escape_java(pattern))
        }
        other => {
            format!("assertThat({accessor}).isEqualTo(\"{}\")", escape_java(&header_text(other)))
        }
    }
}

// ============================================================================
// SECTION: Metadata Producers
// ============================================================================

/// Produces the method annotation and signature lines. Exactly-one by
/// construction: the framework enum is total.
#[must_use]
pub fn method_signature(ctx: &GenerationContext<'_>, name: &str) -> Vec<String> {
    match ctx.config.framework {
        TestFramework::Junit4 | TestFramework::Junit5 | TestFramework::TestNg => vec![
            "@Test".to_string(),
            format!("public void {name}() throws Exception {{"),
        ],
        TestFramework::Spock => vec![format!("def {name}() {{")],
    }
}

/// Contributes fully-qualified imports for the generated class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportsProducer {
    /// AssertJ entry point, always present.
    Assertions,
    /// JsonPath document parsing.
    JsonPath,
    /// XML document helpers.
    XmlSupport,
    /// HTTP client types for the configured flavor.
    HttpClient,
    /// Messaging harness types.
    Messaging,
    /// Framework test annotation.
    Framework,
}

impl ImportsProducer {
    /// Full producer set in contribution order.
    pub const ALL: [Self; 6] = [
        Self::Assertions,
        Self::JsonPath,
        Self::XmlSupport,
        Self::HttpClient,
        Self::Messaging,
        Self::Framework,
    ];

    /// Appends this producer's imports when it accepts the contract.
    pub fn contribute(self, ctx: &GenerationContext<'_>, imports: &mut Vec<String>) {
        match self {
            Self::Assertions => {
                imports.push("static org.assertj.core.api.Assertions.assertThat".to_string());
            }
            Self::JsonPath => {
                if verification_format(ctx) == Some(BodyFormat::Json) {
                    imports.push("com.jayway.jsonpath.DocumentContext".to_string());
                    imports.push("com.jayway.jsonpath.JsonPath".to_string());
                }
            }
            Self::XmlSupport => {
                if verification_format(ctx) == Some(BodyFormat::Xml) {
                    imports.push(
                        "static org.springframework.cloud.contract.verifier.util.XmlToolsKt.valueOf"
                            .to_string(),
                    );
                }
            }
            Self::HttpClient => {
                if ctx.protocol() != Protocol::Http {
                    return;
                }
                match ctx.config.flavor {
                    ClientFlavor::MockMvc => {
                        imports.push(
                            "io.restassured.module.mockmvc.specification.MockMvcRequestSpecification"
                                .to_string(),
                        );
                        imports.push("io.restassured.response.ResponseOptions".to_string());
                        imports.push(
                            "static io.restassured.module.mockmvc.RestAssuredMockMvc.given"
                                .to_string(),
                        );
                    }
                    ClientFlavor::Explicit => {
                        imports.push("io.restassured.specification.RequestSpecification".to_string());
                        imports.push("io.restassured.response.Response".to_string());
                        imports.push("static io.restassured.RestAssured.given".to_string());
                    }
                    ClientFlavor::JaxRs => {
                        imports.push("javax.ws.rs.core.Response".to_string());
                        imports.push("static javax.ws.rs.client.Entity.entity".to_string());
                    }
                }
            }
            Self::Messaging => {
                if ctx.protocol() == Protocol::Messaging {
                    imports.push(
                        "org.springframework.cloud.contract.verifier.messaging.internal.ContractVerifierMessage"
                            .to_string(),
                    );
                }
            }
            Self::Framework => match ctx.config.framework {
                TestFramework::Junit4 => imports.push("org.junit.Test".to_string()),
                TestFramework::Junit5 => imports.push("org.junit.jupiter.api.Test".to_string()),
                TestFramework::TestNg => imports.push("org.testng.annotations.Test".to_string()),
                TestFramework::Spock => {}
            },
        }
    }
}

/// Contributes class-level annotations.
#[must_use]
pub fn class_annotations(ctx: &GenerationContext<'_>) -> Vec<String> {
    match ctx.protocol() {
        Protocol::Messaging => vec!["@AutoConfigureMessageVerifier".to_string()],
        Protocol::Http => Vec::new(),
    }
}

/// Contributes injected field declarations.
#[must_use]
pub fn class_fields(ctx: &GenerationContext<'_>) -> Vec<String> {
    match ctx.protocol() {
        Protocol::Messaging => vec![
            "@Inject ContractVerifierMessaging contractVerifierMessaging".to_string(),
            "@Inject ContractVerifierObjectMapper contractVerifierObjectMapper".to_string(),
        ],
        Protocol::Http => Vec::new(),
    }
}

/// Returns the verification-side body format, when a body exists.
fn verification_format(ctx: &GenerationContext<'_>) -> Option<BodyFormat> {
    ctx.verification_side().map(|(body, _)| body.format)
}

// ============================================================================
// SECTION: Value Text
// ============================================================================

/// Chains one builder call per header onto the open declaration.
fn chain_headers(
    builder: &mut BlockBuilder,
    headers: &[Header],
    call: &str,
) -> Result<(), BlockError> {
    for header in headers {
        builder.add_continuation(&format!(
            ".{call}(\"{}\", \"{}\")",
            escape_java(&header.name),
            escape_java(&header_text(&header.value))
        ))?;
    }
    Ok(())
}

/// Renders one multipart part as a param or file-part builder call.
fn multipart_call(part: &MultipartPart) -> String {
    match &part.filename {
        Some(filename) => format!(
            ".multiPart(\"{}\", \"{}\", \"{}\".getBytes())",
            escape_java(&part.name),
            escape_java(filename),
            escape_java(&body_text(&part.content))
        ),
        None => format!(
            ".param(\"{}\", \"{}\")",
            escape_java(&part.name),
            escape_java(&body_text(&part.content))
        ),
    }
}

/// Renders a header/cookie value to plain text.
fn header_text(value: &BodyValue) -> String {
    match value {
        BodyValue::String(text) | BodyValue::Pattern(text) => text.clone(),
        other => other.to_wire_text(),
    }
}

/// Renders an example body to its source text.
fn body_text(value: &BodyValue) -> String {
    match value {
        BodyValue::String(text) => text.clone(),
        other => other.to_wire_text(),
    }
}
