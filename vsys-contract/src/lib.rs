//! VSYS Contract Codec
//!
//! Binary codec for the VSYS smart-contract description format: typed data
//! entries passed to contract calls, the versioned contract envelope, and the
//! canonical token-contract templates assembled from opcode tables.

#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod core;
pub mod error;

// Re-export commonly used types
pub use crate::core::{
    contract::{Contract, ContractBuilder, ContractSummary, LanguageCode},
    data_entry::{DataEntry, DataValue, decode_list, encode_list},
    function::{CallType, FunctionDescriptor, FunctionKind, Instruction, Prototype},
    opcodes::{Opcode, OpcodeFamily},
    templates::{TemplateVariant, token_template},
    textual::TextualFunction,
    token_id::token_id,
    types::TypeTag,
};

pub use crate::error::{ContractError, Result};

/// Language code every VSYS contract in this catalog declares
pub const DEFAULT_LANGUAGE_CODE: &str = "vdds";

/// Byte length of the language code header field
pub const LANGUAGE_CODE_LENGTH: usize = 4;

/// Byte length of the language version header field
pub const LANGUAGE_VERSION_LENGTH: usize = 4;
