// crates/contract-forge-core/src/core/contract.rs
// ============================================================================
// Module: Contract Model
// Description: One example request/response or message input/output pair.
// Purpose: Carry the parsed contract the generator consumes.
// Dependencies: serde, crate::core::{body, matcher}
// ============================================================================

//! ## Overview
//! A contract is one example exchange used as both documentation and test
//! oracle. It is supplied by an external DSL parser; this crate never parses
//! contract sources itself. Each contract carries a source identity so every
//! fatal error can be mapped back to a specific contract file.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::core::body::BodyFormat;
use crate::core::body::BodyValue;
use crate::core::matcher::Matcher;

// ============================================================================
// SECTION: Identity
// ============================================================================

/// Source identity of a contract, reported in every fatal error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractIdentity {
    /// Contract name as declared in the DSL.
    pub name: String,
    /// Source file the contract was parsed from, when known.
    pub source_file: Option<PathBuf>,
}

impl ContractIdentity {
    /// Builds an identity from a contract name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source_file: None,
        }
    }
}

impl std::fmt::Display for ContractIdentity {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.source_file {
            Some(path) => write!(formatter, "{} ({})", self.name, path.display()),
            None => formatter.write_str(&self.name),
        }
    }
}

// ============================================================================
// SECTION: Common Pieces
// ============================================================================

/// One header entry. Values may be patterns on the verification side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    /// Header name.
    pub name: String,
    /// Header value; a [`BodyValue::Pattern`] compiles to a matches check.
    pub value: BodyValue,
}

/// One cookie entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cookie {
    /// Cookie name.
    pub name: String,
    /// Cookie value; a [`BodyValue::Pattern`] compiles to a matches check.
    pub value: BodyValue,
}

/// An example body plus the format tag controlling its path syntax.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractBody {
    /// Body tree.
    pub value: BodyValue,
    /// Body format.
    pub format: BodyFormat,
}

impl ContractBody {
    /// Builds a JSON body.
    #[must_use]
    pub const fn json(value: BodyValue) -> Self {
        Self {
            value,
            format: BodyFormat::Json,
        }
    }

    /// Builds an XML body.
    #[must_use]
    pub const fn xml(value: BodyValue) -> Self {
        Self {
            value,
            format: BodyFormat::Xml,
        }
    }
}

/// One part of a multipart request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultipartPart {
    /// Part name.
    pub name: String,
    /// Part content.
    pub content: BodyValue,
    /// Original filename, when the part carries a file upload.
    pub filename: Option<String>,
}

/// Multipart request payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Multipart {
    /// Ordered parts.
    pub parts: Vec<MultipartPart>,
}

// ============================================================================
// SECTION: HTTP Sides
// ============================================================================

/// Stub-side HTTP request of a contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpRequest {
    /// HTTP method (uppercase).
    pub method: String,
    /// Request url, optionally with a query string.
    pub url: String,
    /// Request headers.
    pub headers: Vec<Header>,
    /// Request cookies.
    pub cookies: Vec<Cookie>,
    /// Request body, when declared.
    pub body: Option<ContractBody>,
    /// Multipart payload, when declared.
    pub multipart: Option<Multipart>,
}

/// Verification-side HTTP response of a contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpResponse {
    /// Expected status code.
    pub status: u16,
    /// Expected headers.
    pub headers: Vec<Header>,
    /// Expected cookies.
    pub cookies: Vec<Cookie>,
    /// Expected body, when declared.
    pub body: Option<ContractBody>,
    /// Explicit matchers overriding default equality on body paths.
    pub matchers: Vec<Matcher>,
}

// ============================================================================
// SECTION: Messaging Sides
// ============================================================================

/// Stub-side input message of a messaging contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputMessage {
    /// Destination the message is sent to, when message-triggered.
    pub sent_to: Option<String>,
    /// Executable trigger snippet, when method-triggered.
    pub triggered_by: Option<String>,
    /// Message headers.
    pub headers: Vec<Header>,
    /// Message body, when declared.
    pub body: Option<ContractBody>,
}

/// Verification-side output message of a messaging contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputMessage {
    /// Destination the message is expected on.
    pub sent_to: String,
    /// Expected headers.
    pub headers: Vec<Header>,
    /// Expected body, when declared.
    pub body: Option<ContractBody>,
    /// Explicit matchers overriding default equality on body paths.
    pub matchers: Vec<Matcher>,
}

// ============================================================================
// SECTION: Contract
// ============================================================================

/// The exchange shape of a contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractExchange {
    /// HTTP request/response pair.
    Http {
        /// Stub-side request.
        request: HttpRequest,
        /// Verification-side response.
        response: HttpResponse,
    },
    /// Message input/output pair.
    Messaging {
        /// Stub-side input message.
        input: InputMessage,
        /// Verification-side output message.
        output: OutputMessage,
    },
}

/// One contract: an example exchange plus its source identity.
///
/// # Invariants
/// - Contracts are independent; generation never shares mutable state
///   between them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    /// Source identity used in error reporting and method naming.
    pub identity: ContractIdentity,
    /// Exchange payload.
    pub exchange: ContractExchange,
}

impl Contract {
    /// Returns the verification-side body and matchers, when a body exists.
    #[must_use]
    pub fn verification_side(&self) -> Option<(&ContractBody, &[Matcher])> {
        match &self.exchange {
            ContractExchange::Http {
                response, ..
            } => response.body.as_ref().map(|body| (body, response.matchers.as_slice())),
            ContractExchange::Messaging {
                output, ..
            } => output.body.as_ref().map(|body| (body, output.matchers.as_slice())),
        }
    }

    /// Returns the stub-side HTTP request, when the contract is HTTP.
    #[must_use]
    pub const fn http_request(&self) -> Option<&HttpRequest> {
        match &self.exchange {
            ContractExchange::Http {
                request, ..
            } => Some(request),
            ContractExchange::Messaging { .. } => None,
        }
    }
}
