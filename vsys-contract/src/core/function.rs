//! Function descriptors: id, call type, prototype and opcode list
//!
//! Layout: `id:2 ++ callType:1 ++ blob(returnTypes) ++ blob(paramTypes) ++
//! totalLen:2 ++ count:2 ++ concat(instrLen:2 ++ opcode:2 ++ operands)`.
//! `totalLen` covers the count field and every framed instruction.

use crate::core::framing::{self, PREFIX_LEN};
use crate::core::opcodes::{OPCODE_LEN, Opcode};
use crate::core::templates::OperationSpec;
use crate::core::types::TypeTag;
use crate::error::{ContractError, Result};
use std::fmt;

/// Trigger type byte of the `onInit` trigger
pub const ON_INIT_TRIGGER_TYPE: u8 = 0;

/// Function type byte of a public descriptor function
pub const PUBLIC_FUNC_TYPE: u8 = 0;

/// Contract section a function lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    Trigger,
    Descriptor,
}

/// Calling classification of a function.
///
/// The type byte is only meaningful within its section, so decoding needs
/// the [`FunctionKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallType {
    OnInit,
    Public,
}

impl CallType {
    pub fn to_byte(self) -> u8 {
        match self {
            CallType::OnInit => ON_INIT_TRIGGER_TYPE,
            CallType::Public => PUBLIC_FUNC_TYPE,
        }
    }

    pub fn kind(self) -> FunctionKind {
        match self {
            CallType::OnInit => FunctionKind::Trigger,
            CallType::Public => FunctionKind::Descriptor,
        }
    }

    pub fn from_byte(byte: u8, kind: FunctionKind) -> Result<Self> {
        match (kind, byte) {
            (FunctionKind::Trigger, ON_INIT_TRIGGER_TYPE) => Ok(CallType::OnInit),
            (FunctionKind::Descriptor, PUBLIC_FUNC_TYPE) => Ok(CallType::Public),
            (kind, byte) => Err(ContractError::invalid_contract(
                format!("{kind:?}"),
                format!("unknown call type {byte:#04x}"),
            )),
        }
    }
}

impl fmt::Display for CallType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallType::OnInit => write!(f, "onInit"),
            CallType::Public => write!(f, "public"),
        }
    }
}

/// Return and parameter types of a function
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prototype {
    pub return_types: Vec<TypeTag>,
    pub param_types: Vec<TypeTag>,
}

impl Prototype {
    pub fn new(return_types: Vec<TypeTag>, param_types: Vec<TypeTag>) -> Self {
        Self {
            return_types,
            param_types,
        }
    }

    fn write(&self, buf: &mut Vec<u8>) -> Result<()> {
        for types in [&self.return_types, &self.param_types] {
            let bytes: Vec<[u8; 1]> = types.iter().map(|tag| [tag.to_byte()]).collect();
            buf.extend_from_slice(&framing::frame_list(&bytes)?);
        }
        Ok(())
    }
}

/// One opcode with the operand-index bytes it reads from the data stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub opcode: Opcode,
    pub operands: Vec<u8>,
}

impl Instruction {
    pub fn new(opcode: Opcode, operands: impl Into<Vec<u8>>) -> Self {
        Self {
            opcode,
            operands: operands.into(),
        }
    }

    /// Length of `opcode ++ operands`, without the instruction's own prefix
    pub fn encoded_len(&self) -> usize {
        OPCODE_LEN + self.operands.len()
    }

    fn parse(bytes: &[u8]) -> Result<Self> {
        let opcode = Opcode::from_bytes(bytes)?;
        Ok(Self::new(opcode, &bytes[OPCODE_LEN..]))
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.opcode)?;
        for index in &self.operands {
            write!(f, " {index:#04x}")?;
        }
        Ok(())
    }
}

/// Binary description of one contract function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDescriptor {
    pub id: u16,
    pub call_type: CallType,
    pub prototype: Prototype,
    pub instructions: Vec<Instruction>,
}

impl FunctionDescriptor {
    pub fn new(
        id: u16,
        call_type: CallType,
        prototype: Prototype,
        instructions: Vec<Instruction>,
    ) -> Self {
        Self {
            id,
            call_type,
            prototype,
            instructions,
        }
    }

    /// Build the descriptor for a row of the declarative operation table
    pub fn from_operation(id: u16, operation: &OperationSpec) -> Self {
        let instructions = operation
            .instructions
            .iter()
            .map(|(opcode, operands)| Instruction::new(*opcode, *operands))
            .collect();
        Self::new(
            id,
            operation.call_type,
            Prototype::new(
                operation.return_types.to_vec(),
                operation.param_types.to_vec(),
            ),
            instructions,
        )
    }

    /// Value of the opcode list's leading length field: the count field plus
    /// every instruction's prefix and body
    pub fn opcode_list_len(&self) -> usize {
        PREFIX_LEN
            + self
                .instructions
                .iter()
                .map(|inst| PREFIX_LEN + inst.encoded_len())
                .sum::<usize>()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let list_len = self.opcode_list_len();
        let mut buf = Vec::with_capacity(3 + 2 * PREFIX_LEN + PREFIX_LEN + list_len);

        framing::put_u16(&mut buf, self.id);
        buf.push(self.call_type.to_byte());
        self.prototype.write(&mut buf)?;

        framing::put_u16(&mut buf, framing::prefix_for(list_len, "opcode list length")?);
        framing::put_u16(
            &mut buf,
            framing::prefix_for(self.instructions.len(), "opcode count")?,
        );
        for inst in &self.instructions {
            framing::put_u16(&mut buf, framing::prefix_for(inst.encoded_len(), "instruction length")?);
            buf.extend_from_slice(&inst.opcode.to_bytes());
            buf.extend_from_slice(&inst.operands);
        }
        Ok(buf)
    }

    /// Parse a descriptor, checking the opcode list's declared length
    pub fn from_bytes(bytes: &[u8], kind: FunctionKind) -> Result<Self> {
        let id = framing::read_u16(bytes, 0)?;
        let call_type = CallType::from_byte(framing::take(bytes, 2, 1)?[0], kind)?;

        let (return_types, pos) = parse_types(bytes, 3)?;
        let (param_types, pos) = parse_types(bytes, pos)?;

        let (list, end) = framing::parse_blob(bytes, pos)?;
        let (framed, list_end) = framing::parse_list(list, 0)?;
        if list_end != list.len() {
            return Err(ContractError::invalid_contract(
                format!("function {id}"),
                format!(
                    "opcode list declares {} bytes but its instructions span {list_end}",
                    list.len()
                ),
            ));
        }
        if end != bytes.len() {
            return Err(ContractError::invalid_contract(
                format!("function {id}"),
                format!("{} trailing bytes", bytes.len() - end),
            ));
        }

        let instructions = framed
            .into_iter()
            .map(Instruction::parse)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::new(
            id,
            call_type,
            Prototype::new(return_types, param_types),
            instructions,
        ))
    }
}

fn parse_types(bytes: &[u8], offset: usize) -> Result<(Vec<TypeTag>, usize)> {
    let (raw, end) = framing::parse_blob(bytes, offset)?;
    let start = offset + PREFIX_LEN;
    let types = (0..raw.len())
        .map(|i| TypeTag::decode_at(bytes, start + i))
        .collect::<Result<Vec<_>>>()?;
    Ok((types, end))
}

impl fmt::Display for FunctionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |types: &[TypeTag]| {
            types
                .iter()
                .map(|tag| tag.name())
                .collect::<Vec<_>>()
                .join(", ")
        };
        writeln!(
            f,
            "{} {}({}) -> ({})",
            self.call_type,
            self.id,
            join(&self.prototype.param_types),
            join(&self.prototype.return_types)
        )?;
        for inst in &self.instructions {
            writeln!(f, "    {inst}")?;
        }
        Ok(())
    }
}
