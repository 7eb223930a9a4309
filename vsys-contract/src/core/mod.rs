pub mod contract;
pub mod data_entry;
pub mod framing;
pub mod function;
pub mod opcodes;
pub mod templates;
pub mod textual;
pub mod token_id;
pub mod types;

// Re-export core types
pub use self::contract::{Contract, ContractBuilder, ContractSummary, LanguageCode, StateVar};
pub use self::data_entry::{DataEntry, DataValue};
pub use self::function::{CallType, FunctionDescriptor, FunctionKind, Instruction, Prototype};
pub use self::opcodes::{Opcode, OpcodeFamily};
pub use self::templates::{OperationSpec, TemplateVariant};
pub use self::textual::TextualFunction;
pub use self::token_id::token_id;
pub use self::types::{PayloadLen, TypeTag};
