//! Contract envelope: header, framed sections and textual metadata
//!
//! ```text
//! langCode:4 ++ langVersion:4
//!   ++ blob(list(trigger)) ++ blob(list(descriptor)) ++ blob(list(stateVariable))
//!   ++ [blob(list(stateMap)) if version != 1]
//!   ++ list(textual)
//! ```
//!
//! Every list element is itself a blob frame. The state-map section only
//! exists from language version 2 on.

use crate::core::framing;
use crate::core::function::{FunctionDescriptor, FunctionKind};
use crate::core::textual::{self, TextualFunction};
use crate::core::types::TypeTag;
use crate::error::{ContractError, Result};
use crate::{DEFAULT_LANGUAGE_CODE, LANGUAGE_CODE_LENGTH, LANGUAGE_VERSION_LENGTH};
use byteorder::{BigEndian, ByteOrder};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Last language version without a state-map section
pub const STATE_MAP_FREE_VERSION: u32 = 1;

const HEADER_LEN: usize = LANGUAGE_CODE_LENGTH + LANGUAGE_VERSION_LENGTH;

/// Four-byte language code, e.g. `vdds`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LanguageCode([u8; LANGUAGE_CODE_LENGTH]);

impl LanguageCode {
    pub fn new(code: &str) -> Result<Self> {
        code.as_bytes().try_into().map(Self).map_err(|_| {
            ContractError::invalid_value(
                "language code",
                format!("{code:?} is not {LANGUAGE_CODE_LENGTH} bytes"),
            )
        })
    }

    pub fn from_bytes(bytes: [u8; LANGUAGE_CODE_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; LANGUAGE_CODE_LENGTH] {
        &self.0
    }
}

impl Default for LanguageCode {
    fn default() -> Self {
        let mut code = [0u8; LANGUAGE_CODE_LENGTH];
        code.copy_from_slice(DEFAULT_LANGUAGE_CODE.as_bytes());
        Self(code)
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

/// Declaration of one contract state variable: slot index and value type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateVar {
    pub index: u8,
    pub tag: TypeTag,
}

impl StateVar {
    pub fn new(index: u8, tag: TypeTag) -> Self {
        Self { index, tag }
    }

    pub fn to_bytes(self) -> [u8; 2] {
        [self.index, self.tag.to_byte()]
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        match bytes {
            [index, _] => Ok(Self::new(*index, TypeTag::decode_at(bytes, 1)?)),
            _ => Err(ContractError::invalid_contract(
                "state variable",
                format!("expected 2 bytes, got {}", bytes.len()),
            )),
        }
    }
}

/// An immutable contract definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contract {
    language_code: LanguageCode,
    language_version: u32,
    trigger: Vec<Vec<u8>>,
    descriptor: Vec<Vec<u8>>,
    state_variable: Vec<Vec<u8>>,
    state_map: Vec<Vec<u8>>,
    textual: Vec<Vec<u8>>,
}

impl Contract {
    pub fn builder() -> ContractBuilder {
        ContractBuilder::new()
    }

    pub fn language_code(&self) -> LanguageCode {
        self.language_code
    }

    pub fn language_version(&self) -> u32 {
        self.language_version
    }

    pub fn trigger(&self) -> &[Vec<u8>] {
        &self.trigger
    }

    pub fn descriptor(&self) -> &[Vec<u8>] {
        &self.descriptor
    }

    pub fn state_variable(&self) -> &[Vec<u8>] {
        &self.state_variable
    }

    pub fn state_map(&self) -> &[Vec<u8>] {
        &self.state_map
    }

    pub fn textual(&self) -> &[Vec<u8>] {
        &self.textual
    }

    /// Whether the wire form carries a state-map section
    pub fn has_state_map(&self) -> bool {
        self.language_version != STATE_MAP_FREE_VERSION
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(HEADER_LEN + 256);
        buf.extend_from_slice(self.language_code.as_bytes());
        let mut version = [0u8; LANGUAGE_VERSION_LENGTH];
        BigEndian::write_u32(&mut version, self.language_version);
        buf.extend_from_slice(&version);

        let mut sections = vec![
            ("trigger", &self.trigger),
            ("descriptor", &self.descriptor),
            ("state variable", &self.state_variable),
        ];
        if self.has_state_map() {
            sections.push(("state map", &self.state_map));
        }
        for (section, items) in sections {
            let framed = framing::frame_blobs(items)
                .and_then(|list| framing::frame_blob(&list))
                .map_err(|e| e.in_section(section))?;
            buf.extend(framed);
        }

        buf.extend(framing::frame_blobs(&self.textual).map_err(|e| e.in_section("textual"))?);
        Ok(buf)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let header = framing::take(bytes, 0, HEADER_LEN).map_err(|e| e.in_section("header"))?;
        let mut code = [0u8; LANGUAGE_CODE_LENGTH];
        code.copy_from_slice(&header[..LANGUAGE_CODE_LENGTH]);
        let language_version = BigEndian::read_u32(&header[LANGUAGE_CODE_LENGTH..]);

        let (trigger, pos) = parse_section(bytes, HEADER_LEN, "trigger")?;
        let (descriptor, pos) = parse_section(bytes, pos, "descriptor")?;
        let (state_variable, pos) = parse_section(bytes, pos, "state variable")?;
        let (state_map, pos) = if language_version == STATE_MAP_FREE_VERSION {
            (Vec::new(), pos)
        } else {
            parse_section(bytes, pos, "state map")?
        };

        let (textual, end) = framing::parse_list(bytes, pos).map_err(|e| e.in_section("textual"))?;
        if end != bytes.len() {
            return Err(ContractError::invalid_contract(
                "textual",
                format!("{} trailing bytes after contract", bytes.len() - end),
            ));
        }

        let contract = ContractBuilder::new()
            .language_code(LanguageCode::from_bytes(code))
            .language_version(language_version)
            .trigger(trigger)
            .descriptor(descriptor)
            .state_variable(state_variable)
            .state_map(state_map)
            .textual(textual.into_iter().map(<[u8]>::to_vec).collect())
            .build()?;

        tracing::debug!(
            language_code = %contract.language_code,
            language_version,
            triggers = contract.trigger.len(),
            descriptors = contract.descriptor.len(),
            "parsed contract"
        );
        Ok(contract)
    }

    /// Decode the trigger section into function descriptors
    pub fn triggers(&self) -> Result<Vec<FunctionDescriptor>> {
        decode_functions(&self.trigger, FunctionKind::Trigger, "trigger")
    }

    /// Decode the descriptor section into function descriptors
    pub fn descriptors(&self) -> Result<Vec<FunctionDescriptor>> {
        decode_functions(&self.descriptor, FunctionKind::Descriptor, "descriptor")
    }

    pub fn state_variables(&self) -> Result<Vec<StateVar>> {
        self.state_variable
            .iter()
            .map(|bytes| StateVar::from_bytes(bytes))
            .collect::<Result<_>>()
            .map_err(|e| e.in_section("state variable"))
    }

    /// Decode the textual section into names
    pub fn textual_names(&self) -> Result<TextualNames> {
        let block = |index: usize, section: &str| {
            self.textual.get(index).ok_or_else(|| {
                ContractError::invalid_contract(section, "missing textual block")
            })
        };

        Ok(TextualNames {
            triggers: textual::decode_functions(block(0, "trigger textual")?)?,
            descriptors: textual::decode_functions(block(1, "descriptor textual")?)?,
            state_variables: textual::decode_names(block(2, "state variable textual")?)?,
            state_maps: self
                .textual
                .get(3)
                .map(|bytes| textual::decode_names(bytes))
                .transpose()?,
        })
    }

    /// Hex view of every section, for display and JSON output
    pub fn summary(&self) -> ContractSummary {
        let hexes = |items: &[Vec<u8>]| items.iter().map(hex::encode).collect::<Vec<_>>();
        let block = |index: usize| self.textual.get(index).map(hex::encode).unwrap_or_default();

        ContractSummary {
            language_code: self.language_code.to_string(),
            language_version: self.language_version,
            triggers: hexes(&self.trigger),
            descriptors: hexes(&self.descriptor),
            state_variables: hexes(&self.state_variable),
            state_map: hexes(&self.state_map),
            textual: TextualSummary {
                triggers: block(0),
                descriptors: block(1),
                state_variables: block(2),
                state_maps: block(3),
            },
        }
    }
}

fn parse_section(bytes: &[u8], offset: usize, section: &str) -> Result<(Vec<Vec<u8>>, usize)> {
    let (blob, end) = framing::parse_blob(bytes, offset).map_err(|e| e.in_section(section))?;
    let (items, list_end) = framing::parse_list(blob, 0).map_err(|e| e.in_section(section))?;
    if list_end != blob.len() {
        return Err(ContractError::invalid_contract(
            section,
            format!(
                "frame declares {} bytes but its elements span {}",
                blob.len(),
                list_end
            ),
        ));
    }
    tracing::trace!(section, items = items.len(), end, "parsed section");
    Ok((items.into_iter().map(<[u8]>::to_vec).collect(), end))
}

fn decode_functions(
    items: &[Vec<u8>],
    kind: FunctionKind,
    section: &str,
) -> Result<Vec<FunctionDescriptor>> {
    items
        .iter()
        .map(|bytes| FunctionDescriptor::from_bytes(bytes, kind))
        .collect::<Result<_>>()
        .map_err(|e| e.in_section(section))
}

/// Builder enforcing the contract invariants
#[derive(Debug, Clone)]
pub struct ContractBuilder {
    language_code: LanguageCode,
    language_version: u32,
    trigger: Vec<Vec<u8>>,
    descriptor: Vec<Vec<u8>>,
    state_variable: Vec<Vec<u8>>,
    state_map: Vec<Vec<u8>>,
    textual: Vec<Vec<u8>>,
}

impl Default for ContractBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ContractBuilder {
    pub fn new() -> Self {
        Self {
            language_code: LanguageCode::default(),
            language_version: STATE_MAP_FREE_VERSION,
            trigger: Vec::new(),
            descriptor: Vec::new(),
            state_variable: Vec::new(),
            state_map: Vec::new(),
            textual: Vec::new(),
        }
    }

    pub fn language_code(mut self, code: LanguageCode) -> Self {
        self.language_code = code;
        self
    }

    pub fn language_version(mut self, version: u32) -> Self {
        self.language_version = version;
        self
    }

    pub fn trigger(mut self, trigger: Vec<Vec<u8>>) -> Self {
        self.trigger = trigger;
        self
    }

    pub fn descriptor(mut self, descriptor: Vec<Vec<u8>>) -> Self {
        self.descriptor = descriptor;
        self
    }

    pub fn state_variable(mut self, state_variable: Vec<Vec<u8>>) -> Self {
        self.state_variable = state_variable;
        self
    }

    pub fn state_map(mut self, state_map: Vec<Vec<u8>>) -> Self {
        self.state_map = state_map;
        self
    }

    pub fn textual(mut self, textual: Vec<Vec<u8>>) -> Self {
        self.textual = textual;
        self
    }

    pub fn build(self) -> Result<Contract> {
        if self.language_version == 0 {
            return Err(ContractError::invalid_contract(
                "header",
                "language version must be at least 1",
            ));
        }
        if self.language_version == STATE_MAP_FREE_VERSION && !self.state_map.is_empty() {
            return Err(ContractError::invalid_contract(
                "state map",
                format!(
                    "language version {STATE_MAP_FREE_VERSION} carries no state map, got {} entries",
                    self.state_map.len()
                ),
            ));
        }
        if !(3..=4).contains(&self.textual.len()) {
            return Err(ContractError::invalid_contract(
                "textual",
                format!("expected 3 or 4 blocks, got {}", self.textual.len()),
            ));
        }

        Ok(Contract {
            language_code: self.language_code,
            language_version: self.language_version,
            trigger: self.trigger,
            descriptor: self.descriptor,
            state_variable: self.state_variable,
            state_map: self.state_map,
            textual: self.textual,
        })
    }
}

/// Decoded textual section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextualNames {
    pub triggers: Vec<TextualFunction>,
    pub descriptors: Vec<TextualFunction>,
    pub state_variables: Vec<String>,
    pub state_maps: Option<Vec<String>>,
}

/// Serializable hex view of a contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractSummary {
    pub language_code: String,
    pub language_version: u32,
    pub triggers: Vec<String>,
    pub descriptors: Vec<String>,
    pub state_variables: Vec<String>,
    pub state_map: Vec<String>,
    pub textual: TextualSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextualSummary {
    pub triggers: String,
    pub descriptors: String,
    pub state_variables: String,
    /// Empty when the contract has no fourth textual block
    pub state_maps: String,
}
