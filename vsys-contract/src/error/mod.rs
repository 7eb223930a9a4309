//! Error types for contract encoding and decoding

use thiserror::Error;

/// Main error type for codec operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContractError {
    #[error("Unknown type tag {tag:#04x} at offset {offset}")]
    UnknownTag { tag: u8, offset: usize },

    #[error("Truncated input at offset {offset}: need {needed} bytes, {available} available")]
    TruncatedInput {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Invalid contract {section}: {reason}")]
    InvalidContract { section: String, reason: String },

    #[error("Unknown opcode {family:#04x}{code:02x}")]
    UnknownOpcode { family: u8, code: u8 },
}

impl ContractError {
    pub(crate) fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ContractError::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_contract(section: impl Into<String>, reason: impl Into<String>) -> Self {
        ContractError::InvalidContract {
            section: section.into(),
            reason: reason.into(),
        }
    }

    /// Fold any lower-level failure into an `InvalidContract` for `section`.
    ///
    /// Already-contract errors keep their original section.
    pub(crate) fn in_section(self, section: &str) -> Self {
        match self {
            err @ ContractError::InvalidContract { .. } => err,
            other => ContractError::invalid_contract(section, other.to_string()),
        }
    }

    /// Stable name of the error kind, for callers that surface it
    pub fn kind(&self) -> &'static str {
        match self {
            ContractError::UnknownTag { .. } => "UnknownTag",
            ContractError::TruncatedInput { .. } => "TruncatedInput",
            ContractError::InvalidValue { .. } => "InvalidValue",
            ContractError::InvalidContract { .. } => "InvalidContract",
            ContractError::UnknownOpcode { .. } => "UnknownOpcode",
        }
    }
}

/// Convenient Result type
pub type Result<T> = std::result::Result<T, ContractError>;
