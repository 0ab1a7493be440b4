// crates/contract-forge-core/src/core/errors.rs
// ============================================================================
// Module: Error Taxonomy
// Description: Fatal generation errors tagged with kind and contract identity.
// Purpose: Let callers map every failure back to a specific contract file.
// Dependencies: thiserror, crate::core::{body, contract}
// ============================================================================

//! ## Overview
//! All fatal errors abort generation for one contract and carry an error
//! kind plus the contract's source identity. Recoverable conditions (absent
//! optional sections, duplicate matchers, unresolvable template references)
//! never surface here; they have documented fallbacks instead.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;

use thiserror::Error;

use crate::core::body::BodyFormat;
use crate::core::contract::ContractIdentity;

// ============================================================================
// SECTION: Error Kinds
// ============================================================================

/// Stable error kinds for automation and failure mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No producer in an exactly-one family accepts the configuration.
    ConfigNoMatch,
    /// A matcher path does not resolve in the example body.
    PathNotFound,
    /// A type matcher was requested against a body format without runtime
    /// types.
    UnsupportedTypeCheck,
    /// A referenced file is missing or unreadable.
    FileReadFailure,
    /// Internal consistency violation inside the assembler.
    Internal,
}

// ============================================================================
// SECTION: Generation Errors
// ============================================================================

/// Fatal errors raised while generating one contract's test method.
///
/// # Invariants
/// - Every variant carries the contract identity of the failing contract.
/// - Variant meanings are stable for automation and tests.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Zero acceptances in an exactly-one producer family.
    #[error("contract {contract}: no producer in family `{family}` accepts the configuration")]
    ConfigNoMatch {
        /// Failing contract.
        contract: ContractIdentity,
        /// Name of the producer family.
        family: String,
    },
    /// A matcher path that must resolve does not exist in the example body.
    #[error("contract {contract}: path `{path}` does not resolve in the example body")]
    PathNotFound {
        /// Failing contract.
        contract: ContractIdentity,
        /// Offending path expression.
        path: String,
    },
    /// A type matcher against a body format without distinguishable types.
    #[error(
        "contract {contract}: type matcher at `{path}` is not supported for {format} bodies"
    )]
    UnsupportedTypeCheck {
        /// Failing contract.
        contract: ContractIdentity,
        /// Offending path expression.
        path: String,
        /// Body format that cannot report runtime types.
        format: BodyFormat,
    },
    /// A file reference could not be read.
    #[error("contract {contract}: failed to read referenced file {path}: {detail}")]
    FileReadFailure {
        /// Failing contract.
        contract: ContractIdentity,
        /// Referenced file path.
        path: PathBuf,
        /// Underlying I/O error text.
        detail: String,
    },
    /// The assembler was driven out of its block discipline.
    #[error("contract {contract}: block structure violated: {detail}")]
    BlockMismatch {
        /// Failing contract.
        contract: ContractIdentity,
        /// Description of the expected/found block kinds.
        detail: String,
    },
}

impl GenerationError {
    /// Returns the stable kind tag of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::ConfigNoMatch { .. } => ErrorKind::ConfigNoMatch,
            Self::PathNotFound { .. } => ErrorKind::PathNotFound,
            Self::UnsupportedTypeCheck { .. } => ErrorKind::UnsupportedTypeCheck,
            Self::FileReadFailure { .. } => ErrorKind::FileReadFailure,
            Self::BlockMismatch { .. } => ErrorKind::Internal,
        }
    }

    /// Returns the identity of the contract this error belongs to.
    #[must_use]
    pub const fn contract(&self) -> &ContractIdentity {
        match self {
            Self::ConfigNoMatch {
                contract, ..
            }
            | Self::PathNotFound {
                contract, ..
            }
            | Self::UnsupportedTypeCheck {
                contract, ..
            }
            | Self::FileReadFailure {
                contract, ..
            }
            | Self::BlockMismatch {
                contract, ..
            } => contract,
        }
    }
}
