//! Data type tags for contract values and function prototypes

use crate::error::{ContractError, Result};
use std::fmt;

/// Maximum body length of a `ShortText` value
pub const MAX_SHORT_TEXT_SIZE: usize = 140;

pub const KEY_LENGTH: usize = 32;
pub const ADDRESS_LENGTH: usize = 26;
pub const TOKEN_ID_LENGTH: usize = 30;

/// Payload shape implied by a tag byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadLen {
    /// Exactly this many payload bytes follow the tag
    Fixed(usize),
    /// A 2-byte big-endian length followed by that many bytes
    Variable,
    /// Prototype-only marker; never carries a value
    Marker,
}

/// Value kinds understood by the contract runtime (8 bits)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TypeTag {
    PublicKey = 1,
    Address = 2,
    Amount = 3,
    Int32 = 4,
    ShortText = 5,
    ContractAccount = 6,
    Account = 7,
    TokenId = 8,
    Timestamp = 9,
    Boolean = 10,
    Balance = 11,
}

impl TypeTag {
    pub const ALL: [TypeTag; 11] = [
        TypeTag::PublicKey,
        TypeTag::Address,
        TypeTag::Amount,
        TypeTag::Int32,
        TypeTag::ShortText,
        TypeTag::ContractAccount,
        TypeTag::Account,
        TypeTag::TokenId,
        TypeTag::Timestamp,
        TypeTag::Boolean,
        TypeTag::Balance,
    ];

    /// Parse a tag from its byte
    pub fn from_byte(byte: u8) -> Result<Self> {
        Self::decode_at(&[byte], 0)
    }

    /// Read the tag byte at `offset`, reporting that offset on failure
    pub fn decode_at(bytes: &[u8], offset: usize) -> Result<Self> {
        let byte = *bytes.get(offset).ok_or(ContractError::TruncatedInput {
            offset,
            needed: 1,
            available: bytes.len().saturating_sub(offset),
        })?;

        match byte {
            1 => Ok(TypeTag::PublicKey),
            2 => Ok(TypeTag::Address),
            3 => Ok(TypeTag::Amount),
            4 => Ok(TypeTag::Int32),
            5 => Ok(TypeTag::ShortText),
            6 => Ok(TypeTag::ContractAccount),
            7 => Ok(TypeTag::Account),
            8 => Ok(TypeTag::TokenId),
            9 => Ok(TypeTag::Timestamp),
            10 => Ok(TypeTag::Boolean),
            11 => Ok(TypeTag::Balance),
            tag => Err(ContractError::UnknownTag { tag, offset }),
        }
    }

    /// Look up a tag by its protocol name, e.g. `"Amount"`
    pub fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|tag| tag.name() == name)
            .ok_or_else(|| ContractError::invalid_value("type name", format!("unknown type {name:?}")))
    }

    pub fn to_byte(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            TypeTag::PublicKey => "PublicKey",
            TypeTag::Address => "Address",
            TypeTag::Amount => "Amount",
            TypeTag::Int32 => "Int32",
            TypeTag::ShortText => "ShortText",
            TypeTag::ContractAccount => "ContractAccount",
            TypeTag::Account => "Account",
            TypeTag::TokenId => "TokenId",
            TypeTag::Timestamp => "Timestamp",
            TypeTag::Boolean => "Boolean",
            TypeTag::Balance => "Balance",
        }
    }

    pub fn payload_len(self) -> PayloadLen {
        match self {
            TypeTag::PublicKey => PayloadLen::Fixed(KEY_LENGTH),
            TypeTag::Address | TypeTag::ContractAccount => PayloadLen::Fixed(ADDRESS_LENGTH),
            TypeTag::Amount | TypeTag::Timestamp | TypeTag::Balance => PayloadLen::Fixed(8),
            TypeTag::Int32 => PayloadLen::Fixed(4),
            TypeTag::TokenId => PayloadLen::Fixed(TOKEN_ID_LENGTH),
            TypeTag::Boolean => PayloadLen::Fixed(1),
            TypeTag::ShortText => PayloadLen::Variable,
            TypeTag::Account => PayloadLen::Marker,
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
