//! Canonical token contract templates
//!
//! Both templates come from one declarative operation table. The split
//! capability inserts `split` after `destroy`; descriptor ids are table
//! positions, so every later id shifts by one.

use crate::core::contract::{Contract, LanguageCode, StateVar};
use crate::core::function::{CallType, FunctionDescriptor};
use crate::core::opcodes::Opcode;
use crate::core::textual::{self, TextualFunction};
use crate::core::types::TypeTag;
use crate::error::Result;
use once_cell::sync::Lazy;

/// State variable slot holding the token issuer
pub const STATE_VAR_ISSUER: u8 = 0;
/// State variable slot holding the contract maker
pub const STATE_VAR_MAKER: u8 = 1;
pub const STATE_VAR_NAMES: [&str; 2] = ["issuer", "maker"];

/// Id of the `init` trigger
pub const INIT_ID: u16 = 0;

/// Declarative description of one contract operation.
///
/// Operand bytes index the function's data stack: parameters first, then
/// values pushed by earlier instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationSpec {
    pub name: &'static str,
    pub call_type: CallType,
    pub return_types: &'static [TypeTag],
    pub param_types: &'static [TypeTag],
    pub return_names: &'static [&'static str],
    pub param_names: &'static [&'static str],
    pub instructions: &'static [(Opcode, &'static [u8])],
}

const fn public(
    name: &'static str,
    return_types: &'static [TypeTag],
    param_types: &'static [TypeTag],
    return_names: &'static [&'static str],
    param_names: &'static [&'static str],
    instructions: &'static [(Opcode, &'static [u8])],
) -> OperationSpec {
    OperationSpec {
        name,
        call_type: CallType::Public,
        return_types,
        param_types,
        return_names,
        param_names,
        instructions,
    }
}

// max, unity, tokenDescription, then the loaded signer at 3
pub static INIT: OperationSpec = OperationSpec {
    name: "init",
    call_type: CallType::OnInit,
    return_types: &[],
    param_types: &[TypeTag::Amount, TypeTag::Amount, TypeTag::ShortText],
    return_names: &[],
    param_names: &["max", "unity", "tokenDescription", "signer"],
    instructions: &[
        (Opcode::SignerLoad, &[3]),
        (Opcode::SetCdbv, &[STATE_VAR_ISSUER, 3]),
        (Opcode::SetCdbv, &[STATE_VAR_MAKER, 3]),
        (Opcode::NewTokenTdb, &[0, 1, 2]),
    ],
};

pub static SUPERSEDE: OperationSpec = public(
    "supersede",
    &[],
    &[TypeTag::Account],
    &[],
    &["newIssuer", "maker"],
    &[
        (Opcode::GetCdbvr, &[STATE_VAR_MAKER, 1]),
        (Opcode::IsSignerOriginAssert, &[1]),
        (Opcode::SetCdbv, &[STATE_VAR_ISSUER, 0]),
    ],
);

pub static ISSUE: OperationSpec = public(
    "issue",
    &[],
    &[TypeTag::Amount],
    &[],
    &["amount", "issuer"],
    &[
        (Opcode::GetCdbvr, &[STATE_VAR_ISSUER, 1]),
        (Opcode::IsCallerOriginAssert, &[1]),
        (Opcode::DepositTdba, &[1, 0]),
    ],
);

pub static DESTROY: OperationSpec = public(
    "destroy",
    &[],
    &[TypeTag::Amount],
    &[],
    &["amount", "issuer"],
    &[
        (Opcode::GetCdbvr, &[STATE_VAR_ISSUER, 1]),
        (Opcode::IsCallerOriginAssert, &[1]),
        (Opcode::WithdrawTdba, &[1, 0]),
    ],
);

pub static SPLIT: OperationSpec = public(
    "split",
    &[],
    &[TypeTag::Amount],
    &[],
    &["newUnity", "issuer"],
    &[
        (Opcode::GetCdbvr, &[STATE_VAR_ISSUER, 1]),
        (Opcode::IsCallerOriginAssert, &[1]),
        (Opcode::SplitTdb, &[0]),
    ],
);

pub static SEND: OperationSpec = public(
    "send",
    &[],
    &[TypeTag::Account, TypeTag::Amount],
    &[],
    &["recipient", "amount", "caller"],
    &[
        (Opcode::CallerLoad, &[2]),
        (Opcode::TransferTdba, &[2, 0, 1]),
    ],
);

pub static TRANSFER: OperationSpec = public(
    "transfer",
    &[],
    &[TypeTag::Account, TypeTag::Account, TypeTag::Amount],
    &[],
    &["sender", "recipient", "amount"],
    &[
        (Opcode::IsCallerOriginAssert, &[0]),
        (Opcode::TransferTdba, &[0, 1, 2]),
    ],
);

pub static DEPOSIT: OperationSpec = public(
    "deposit",
    &[],
    &[TypeTag::Account, TypeTag::ContractAccount, TypeTag::Amount],
    &[],
    &["sender", "smart", "amount"],
    &[
        (Opcode::IsCallerOriginAssert, &[0]),
        (Opcode::TransferTdba, &[0, 1, 2]),
    ],
);

pub static WITHDRAW: OperationSpec = public(
    "withdraw",
    &[],
    &[TypeTag::ContractAccount, TypeTag::Account, TypeTag::Amount],
    &[],
    &["smart", "recipient", "amount"],
    &[
        (Opcode::IsCallerOriginAssert, &[1]),
        (Opcode::TransferTdba, &[0, 1, 2]),
    ],
);

pub static TOTAL_SUPPLY: OperationSpec = public(
    "totalSupply",
    &[TypeTag::Amount],
    &[],
    &["total"],
    &["total"],
    &[(Opcode::TotalTdbr, &[0]), (Opcode::ReturnValue, &[0])],
);

pub static MAX_SUPPLY: OperationSpec = public(
    "maxSupply",
    &[TypeTag::Amount],
    &[],
    &["max"],
    &["max"],
    &[(Opcode::MaxTdbr, &[0]), (Opcode::ReturnValue, &[0])],
);

pub static BALANCE_OF: OperationSpec = public(
    "balanceOf",
    &[TypeTag::Amount],
    &[TypeTag::Account],
    &["balance"],
    &["address", "balance"],
    &[(Opcode::BalanceTdbar, &[0, 1]), (Opcode::ReturnValue, &[1])],
);

pub static GET_ISSUER: OperationSpec = public(
    "getIssuer",
    &[TypeTag::Account],
    &[],
    &["issuer"],
    &["issuer"],
    &[
        (Opcode::GetCdbvr, &[STATE_VAR_ISSUER, 0]),
        (Opcode::ReturnValue, &[0]),
    ],
);

/// Public operations in descriptor order
pub fn operation_table(supports_split: bool) -> Vec<&'static OperationSpec> {
    let mut table = vec![&SUPERSEDE, &ISSUE, &DESTROY];
    if supports_split {
        table.push(&SPLIT);
    }
    table.extend([
        &SEND,
        &TRANSFER,
        &DEPOSIT,
        &WITHDRAW,
        &TOTAL_SUPPLY,
        &MAX_SUPPLY,
        &BALANCE_OF,
        &GET_ISSUER,
    ]);
    table
}

/// The two catalog templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateVariant {
    /// Language version 1, no `split`, no state map
    WithoutSplit,
    /// Language version 2, `split` enabled, empty state map
    WithSplit,
}

impl TemplateVariant {
    pub fn supports_split(self) -> bool {
        matches!(self, TemplateVariant::WithSplit)
    }

    pub fn language_version(self) -> u32 {
        match self {
            TemplateVariant::WithoutSplit => 1,
            TemplateVariant::WithSplit => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TemplateVariant::WithoutSplit => "token",
            TemplateVariant::WithSplit => "token-with-split",
        }
    }

    /// Descriptor id of a public operation, if this variant has it
    pub fn function_id(self, name: &str) -> Option<u16> {
        (0u16..)
            .zip(operation_table(self.supports_split()))
            .find(|(_, operation)| operation.name == name)
            .map(|(id, _)| id)
    }
}

pub fn state_variables() -> [StateVar; 2] {
    [
        StateVar::new(STATE_VAR_ISSUER, TypeTag::Address),
        StateVar::new(STATE_VAR_MAKER, TypeTag::Address),
    ]
}

fn build_template(variant: TemplateVariant) -> Result<Contract> {
    let operations = operation_table(variant.supports_split());

    let trigger = vec![FunctionDescriptor::from_operation(INIT_ID, &INIT).to_bytes()?];
    let descriptor = (0u16..)
        .zip(&operations)
        .map(|(id, operation)| FunctionDescriptor::from_operation(id, operation).to_bytes())
        .collect::<Result<Vec<_>>>()?;
    let state_variable = state_variables()
        .iter()
        .map(|var| var.to_bytes().to_vec())
        .collect();

    let mut textual = vec![
        textual::encode_functions(&[TextualFunction::from_operation(&INIT)])?,
        textual::encode_functions(
            &operations
                .iter()
                .map(|operation| TextualFunction::from_operation(operation))
                .collect::<Vec<_>>(),
        )?,
        textual::encode_names(&STATE_VAR_NAMES)?,
    ];
    if variant.language_version() > 1 {
        textual.push(textual::encode_names::<&str>(&[])?);
    }

    let contract = Contract::builder()
        .language_code(LanguageCode::default())
        .language_version(variant.language_version())
        .trigger(trigger)
        .descriptor(descriptor)
        .state_variable(state_variable)
        .textual(textual)
        .build()?;

    tracing::debug!(
        template = variant.name(),
        descriptors = contract.descriptor().len(),
        "built contract template"
    );
    Ok(contract)
}

static WITHOUT_SPLIT: Lazy<Result<Contract>> =
    Lazy::new(|| build_template(TemplateVariant::WithoutSplit));

static WITH_SPLIT: Lazy<Result<Contract>> = Lazy::new(|| build_template(TemplateVariant::WithSplit));

/// The process-wide template for `variant`, built on first use
pub fn token_template(variant: TemplateVariant) -> Result<&'static Contract> {
    let template = match variant {
        TemplateVariant::WithoutSplit => &WITHOUT_SPLIT,
        TemplateVariant::WithSplit => &WITH_SPLIT,
    };
    Lazy::force(template).as_ref().map_err(Clone::clone)
}
