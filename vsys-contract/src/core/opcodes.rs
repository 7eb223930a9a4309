//! Opcode definitions for VSYS contract functions
//!
//! Every opcode is two bytes on the wire: the family byte followed by the
//! operation within that family.

use crate::error::{ContractError, Result};
use std::fmt;

/// Opcode family (first byte)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OpcodeFamily {
    Assert = 1,
    Load = 2,
    /// Contract database variable writes
    Cdbv = 3,
    /// Contract database variable reads
    Cdbvr = 4,
    /// Token database writes
    Tdb = 5,
    /// Token database reads
    Tdbr = 6,
    /// Token account balance writes
    Tdba = 7,
    /// Token account balance reads
    Tdbar = 8,
    Return = 9,
}

impl OpcodeFamily {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            1 => Some(OpcodeFamily::Assert),
            2 => Some(OpcodeFamily::Load),
            3 => Some(OpcodeFamily::Cdbv),
            4 => Some(OpcodeFamily::Cdbvr),
            5 => Some(OpcodeFamily::Tdb),
            6 => Some(OpcodeFamily::Tdbr),
            7 => Some(OpcodeFamily::Tdba),
            8 => Some(OpcodeFamily::Tdbar),
            9 => Some(OpcodeFamily::Return),
            _ => None,
        }
    }
}

/// Contract opcodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    GteqZeroAssert,
    LteqAssert,
    LtInt64Assert,
    GtZeroAssert,
    EqAssert,
    IsCallerOriginAssert,
    IsSignerOriginAssert,
    SignerLoad,
    CallerLoad,
    SetCdbv,
    GetCdbvr,
    NewTokenTdb,
    SplitTdb,
    MaxTdbr,
    TotalTdbr,
    DepositTdba,
    WithdrawTdba,
    TransferTdba,
    BalanceTdbar,
    ReturnValue,
}

/// Encoded width of every opcode
pub const OPCODE_LEN: usize = 2;

impl Opcode {
    pub const ALL: [Opcode; 20] = [
        Opcode::GteqZeroAssert,
        Opcode::LteqAssert,
        Opcode::LtInt64Assert,
        Opcode::GtZeroAssert,
        Opcode::EqAssert,
        Opcode::IsCallerOriginAssert,
        Opcode::IsSignerOriginAssert,
        Opcode::SignerLoad,
        Opcode::CallerLoad,
        Opcode::SetCdbv,
        Opcode::GetCdbvr,
        Opcode::NewTokenTdb,
        Opcode::SplitTdb,
        Opcode::MaxTdbr,
        Opcode::TotalTdbr,
        Opcode::DepositTdba,
        Opcode::WithdrawTdba,
        Opcode::TransferTdba,
        Opcode::BalanceTdbar,
        Opcode::ReturnValue,
    ];

    pub fn family(self) -> OpcodeFamily {
        match self {
            Opcode::GteqZeroAssert
            | Opcode::LteqAssert
            | Opcode::LtInt64Assert
            | Opcode::GtZeroAssert
            | Opcode::EqAssert
            | Opcode::IsCallerOriginAssert
            | Opcode::IsSignerOriginAssert => OpcodeFamily::Assert,
            Opcode::SignerLoad | Opcode::CallerLoad => OpcodeFamily::Load,
            Opcode::SetCdbv => OpcodeFamily::Cdbv,
            Opcode::GetCdbvr => OpcodeFamily::Cdbvr,
            Opcode::NewTokenTdb | Opcode::SplitTdb => OpcodeFamily::Tdb,
            Opcode::MaxTdbr | Opcode::TotalTdbr => OpcodeFamily::Tdbr,
            Opcode::DepositTdba | Opcode::WithdrawTdba | Opcode::TransferTdba => OpcodeFamily::Tdba,
            Opcode::BalanceTdbar => OpcodeFamily::Tdbar,
            Opcode::ReturnValue => OpcodeFamily::Return,
        }
    }

    /// Operation byte within the family
    pub fn code(self) -> u8 {
        match self {
            Opcode::GteqZeroAssert => 1,
            Opcode::LteqAssert => 2,
            Opcode::LtInt64Assert => 3,
            Opcode::GtZeroAssert => 4,
            Opcode::EqAssert => 5,
            Opcode::IsCallerOriginAssert => 6,
            Opcode::IsSignerOriginAssert => 7,
            Opcode::SignerLoad => 1,
            Opcode::CallerLoad => 2,
            Opcode::SetCdbv => 1,
            Opcode::GetCdbvr => 1,
            Opcode::NewTokenTdb => 1,
            Opcode::SplitTdb => 2,
            Opcode::MaxTdbr => 1,
            Opcode::TotalTdbr => 2,
            Opcode::DepositTdba => 1,
            Opcode::WithdrawTdba => 2,
            Opcode::TransferTdba => 3,
            Opcode::BalanceTdbar => 1,
            Opcode::ReturnValue => 1,
        }
    }

    pub fn to_bytes(self) -> [u8; OPCODE_LEN] {
        [self.family() as u8, self.code()]
    }

    /// Parse an opcode from the first two bytes of `bytes`
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (family, code) = match bytes {
            [family, code, ..] => (*family, *code),
            _ => {
                return Err(ContractError::TruncatedInput {
                    offset: 0,
                    needed: OPCODE_LEN,
                    available: bytes.len(),
                });
            }
        };

        OpcodeFamily::from_byte(family)
            .and_then(|fam| {
                Self::ALL
                    .into_iter()
                    .find(|op| op.family() == fam && op.code() == code)
            })
            .ok_or(ContractError::UnknownOpcode { family, code })
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::GteqZeroAssert => "assert_gteq_zero",
            Opcode::LteqAssert => "assert_lteq",
            Opcode::LtInt64Assert => "assert_lt_int64",
            Opcode::GtZeroAssert => "assert_gt_zero",
            Opcode::EqAssert => "assert_eq",
            Opcode::IsCallerOriginAssert => "assert_is_caller_origin",
            Opcode::IsSignerOriginAssert => "assert_is_signer_origin",
            Opcode::SignerLoad => "load_signer",
            Opcode::CallerLoad => "load_caller",
            Opcode::SetCdbv => "cdbv_set",
            Opcode::GetCdbvr => "cdbvr_get",
            Opcode::NewTokenTdb => "tdb_new_token",
            Opcode::SplitTdb => "tdb_split",
            Opcode::MaxTdbr => "tdbr_max",
            Opcode::TotalTdbr => "tdbr_total",
            Opcode::DepositTdba => "tdba_deposit",
            Opcode::WithdrawTdba => "tdba_withdraw",
            Opcode::TransferTdba => "tdba_transfer",
            Opcode::BalanceTdbar => "tdbar_balance",
            Opcode::ReturnValue => "return_value",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
