//! Human-readable names carried in a contract's textual section

use crate::core::framing;
use crate::core::templates::OperationSpec;
use crate::error::{ContractError, Result};

/// Names of one function, its return values and its parameters.
///
/// Layout: `blob(name) ++ blob(list(blob(return)...)) ++ list(blob(param)...)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextualFunction {
    pub name: String,
    pub return_names: Vec<String>,
    pub param_names: Vec<String>,
}

impl TextualFunction {
    pub fn new(name: &str, return_names: &[&str], param_names: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            return_names: return_names.iter().map(|s| s.to_string()).collect(),
            param_names: param_names.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn from_operation(operation: &OperationSpec) -> Self {
        Self::new(operation.name, operation.return_names, operation.param_names)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = framing::frame_blob(self.name.as_bytes())?;
        buf.extend(framing::frame_blob(&framing::frame_blobs(&self.return_names)?)?);
        buf.extend(framing::frame_blobs(&self.param_names)?);
        Ok(buf)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (name, pos) = framing::parse_blob(bytes, 0)?;
        let (returns, pos) = framing::parse_blob(bytes, pos)?;
        let (return_names, returns_end) = framing::parse_list(returns, 0)?;
        let (param_names, end) = framing::parse_list(bytes, pos)?;

        let name = utf8(name)?;
        if returns_end != returns.len() || end != bytes.len() {
            return Err(ContractError::invalid_contract(
                "textual",
                format!("trailing bytes in names of {name:?}"),
            ));
        }

        Ok(Self {
            name,
            return_names: return_names.into_iter().map(utf8).collect::<Result<_>>()?,
            param_names: param_names.into_iter().map(utf8).collect::<Result<_>>()?,
        })
    }
}

fn utf8(bytes: &[u8]) -> Result<String> {
    String::from_utf8(bytes.to_vec())
        .map_err(|e| ContractError::invalid_contract("textual", format!("invalid UTF-8: {e}")))
}

/// Encode the textual block for a function section
pub fn encode_functions(functions: &[TextualFunction]) -> Result<Vec<u8>> {
    let encoded = functions
        .iter()
        .map(TextualFunction::to_bytes)
        .collect::<Result<Vec<_>>>()?;
    framing::frame_blobs(&encoded)
}

pub fn decode_functions(bytes: &[u8]) -> Result<Vec<TextualFunction>> {
    let (items, end) = framing::parse_list(bytes, 0)?;
    expect_consumed(bytes, end)?;
    items.into_iter().map(TextualFunction::from_bytes).collect()
}

/// Encode a plain list of names (state variables, state maps)
pub fn encode_names<T: AsRef<str>>(names: &[T]) -> Result<Vec<u8>> {
    let raw: Vec<&[u8]> = names.iter().map(|name| name.as_ref().as_bytes()).collect();
    framing::frame_blobs(&raw)
}

pub fn decode_names(bytes: &[u8]) -> Result<Vec<String>> {
    let (items, end) = framing::parse_list(bytes, 0)?;
    expect_consumed(bytes, end)?;
    items.into_iter().map(utf8).collect()
}

fn expect_consumed(bytes: &[u8], end: usize) -> Result<()> {
    if end == bytes.len() {
        Ok(())
    } else {
        Err(ContractError::invalid_contract(
            "textual",
            format!("{} trailing bytes", bytes.len() - end),
        ))
    }
}
