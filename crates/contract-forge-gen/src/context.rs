// crates/contract-forge-gen/src/context.rs
// ============================================================================
// Module: Generation Context
// Description: Immutable configuration and per-contract context.
// Purpose: Give producers one read-only view to accept or decline on.
// Dependencies: serde, contract-forge-core
// ============================================================================

//! ## Overview
//! Producers never reach back into a shared mutable owner. Everything they
//! may branch on lives in one immutable context: the contract, the caller's
//! configuration, and the derived protocol. Capability decisions are explicit
//! configuration fields, never probed from the environment.

// ============================================================================
// SECTION: Imports
// ============================================================================

use contract_forge_core::Contract;
use contract_forge_core::ContractBody;
use contract_forge_core::ContractExchange;
use contract_forge_core::HttpRequest;
use contract_forge_core::HttpResponse;
use contract_forge_core::InputMessage;
use contract_forge_core::Matcher;
use contract_forge_core::OutputMessage;
use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Target test framework flavor.
///
/// # Invariants
/// - Variants are stable for serialization and configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestFramework {
    /// JUnit 4 style methods with `@Test` from `org.junit`.
    Junit4,
    /// JUnit 5 style methods with `@Test` from `org.junit.jupiter.api`.
    Junit5,
    /// TestNG style methods.
    TestNg,
    /// Spock specifications: bare labels, no statement terminator.
    Spock,
}

impl TestFramework {
    /// Returns the statement terminator for this framework.
    #[must_use]
    pub const fn statement_ending(self) -> &'static str {
        match self {
            Self::Junit4 | Self::Junit5 | Self::TestNg => ";",
            Self::Spock => "",
        }
    }

    /// Returns the section label for a block kind.
    #[must_use]
    pub const fn block_label(self, kind: crate::blocks::BlockKind) -> &'static str {
        match (self, kind) {
            (Self::Spock, crate::blocks::BlockKind::Given) => "given:",
            (Self::Spock, crate::blocks::BlockKind::When) => "when:",
            (Self::Spock, crate::blocks::BlockKind::Then) => "then:",
            (Self::Spock, crate::blocks::BlockKind::And) => "and:",
            (_, crate::blocks::BlockKind::Given) => "// given:",
            (_, crate::blocks::BlockKind::When) => "// when:",
            (_, crate::blocks::BlockKind::Then) => "// then:",
            (_, crate::blocks::BlockKind::And) => "// and:",
        }
    }
}

/// HTTP client flavor used by the generated call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientFlavor {
    /// MockMvc-backed RestAssured client.
    MockMvc,
    /// Explicit RestAssured client against a running server.
    Explicit,
    /// JAX-RS client API.
    JaxRs,
}

/// Caller-supplied generation configuration.
///
/// # Invariants
/// - Opaque to the compiler core; only producers and the renderer branch on
///   these fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Target test framework.
    pub framework: TestFramework,
    /// HTTP client flavor.
    pub flavor: ClientFlavor,
    /// Whether list flattening also emits collection-size assertions.
    pub assert_collection_size: bool,
    /// Optional suffix appended to generated method names.
    pub method_suffix: Option<String>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            framework: TestFramework::Junit5,
            flavor: ClientFlavor::MockMvc,
            assert_collection_size: false,
            method_suffix: None,
        }
    }
}

// ============================================================================
// SECTION: Context
// ============================================================================

/// Contract protocol, derived from the exchange shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Protocol {
    /// HTTP request/response contract.
    Http,
    /// Messaging input/output contract.
    Messaging,
}

/// Immutable per-contract view handed to every producer.
#[derive(Debug, Clone, Copy)]
pub struct GenerationContext<'contract> {
    /// The contract being generated.
    pub contract: &'contract Contract,
    /// Caller configuration.
    pub config: &'contract GenerationConfig,
}

impl<'contract> GenerationContext<'contract> {
    /// Builds the context for one contract.
    #[must_use]
    pub const fn new(contract: &'contract Contract, config: &'contract GenerationConfig) -> Self {
        Self {
            contract,
            config,
        }
    }

    /// Returns the contract protocol.
    #[must_use]
    pub const fn protocol(&self) -> Protocol {
        match &self.contract.exchange {
            ContractExchange::Http { .. } => Protocol::Http,
            ContractExchange::Messaging { .. } => Protocol::Messaging,
        }
    }

    /// Returns the HTTP request side, when present.
    #[must_use]
    pub const fn request(&self) -> Option<&'contract HttpRequest> {
        match &self.contract.exchange {
            ContractExchange::Http {
                request, ..
            } => Some(request),
            ContractExchange::Messaging { .. } => None,
        }
    }

    /// Returns the HTTP response side, when present.
    #[must_use]
    pub const fn response(&self) -> Option<&'contract HttpResponse> {
        match &self.contract.exchange {
            ContractExchange::Http {
                response, ..
            } => Some(response),
            ContractExchange::Messaging { .. } => None,
        }
    }

    /// Returns the messaging input side, when present.
    #[must_use]
    pub const fn input_message(&self) -> Option<&'contract InputMessage> {
        match &self.contract.exchange {
            ContractExchange::Messaging {
                input, ..
            } => Some(input),
            ContractExchange::Http { .. } => None,
        }
    }

    /// Returns the messaging output side, when present.
    #[must_use]
    pub const fn output_message(&self) -> Option<&'contract OutputMessage> {
        match &self.contract.exchange {
            ContractExchange::Messaging {
                output, ..
            } => Some(output),
            ContractExchange::Http { .. } => None,
        }
    }

    /// Returns the verification-side body and matchers, when a body exists.
    #[must_use]
    pub fn verification_side(&self) -> Option<(&'contract ContractBody, &'contract [Matcher])> {
        self.contract.verification_side()
    }

    /// Returns whether the generated method has a given section.
    ///
    /// The given section is omitted for JAX-RS (the request is built inline
    /// in the when section) and for HTTP requests with nothing to declare.
    #[must_use]
    pub fn has_given_section(&self) -> bool {
        match self.protocol() {
            Protocol::Http => {
                self.config.flavor != ClientFlavor::JaxRs
                    && self.request().is_some_and(|request| {
                        !request.headers.is_empty()
                            || !request.cookies.is_empty()
                            || request.body.is_some()
                            || request.multipart.is_some()
                    })
            }
            Protocol::Messaging => {
                self.input_message().is_some_and(|input| input.body.is_some())
            }
        }
    }

    /// Derives the generated method name from the contract identity.
    #[must_use]
    pub fn method_name(&self) -> String {
        let base: String = self
            .contract
            .identity
            .name
            .chars()
            .map(|ch| if ch.is_ascii_alphanumeric() { ch } else { '_' })
            .collect();
        let suffix = self.config.method_suffix.as_deref().unwrap_or_default();
        format!("validate_{base}{suffix}")
    }
}
