//! Tagged values passed as arguments to contract calls
//!
//! A data entry is a type tag byte followed by its payload. Lists of entries
//! ("data stacks") are count-prefixed and concatenated without per-entry
//! framing, so decoding relies on each tag's payload rule to find the next
//! entry.

use crate::core::framing::{self, PREFIX_LEN};
use crate::core::types::{ADDRESS_LENGTH, KEY_LENGTH, MAX_SHORT_TEXT_SIZE, PayloadLen, TOKEN_ID_LENGTH, TypeTag};
use crate::error::{ContractError, Result};
use byteorder::{BigEndian, ByteOrder};
use std::fmt;

/// Decoded form of a data entry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataValue {
    PublicKey([u8; KEY_LENGTH]),
    Address([u8; ADDRESS_LENGTH]),
    /// Strictly positive
    Amount(u64),
    /// Strictly positive
    Int32(u32),
    /// At most 140 bytes, not necessarily UTF-8
    ShortText(Vec<u8>),
    ContractAccount([u8; ADDRESS_LENGTH]),
    TokenId([u8; TOKEN_ID_LENGTH]),
    Timestamp(u64),
    Boolean(bool),
    Balance(u64),
}

impl DataValue {
    pub fn tag(&self) -> TypeTag {
        match self {
            DataValue::PublicKey(_) => TypeTag::PublicKey,
            DataValue::Address(_) => TypeTag::Address,
            DataValue::Amount(_) => TypeTag::Amount,
            DataValue::Int32(_) => TypeTag::Int32,
            DataValue::ShortText(_) => TypeTag::ShortText,
            DataValue::ContractAccount(_) => TypeTag::ContractAccount,
            DataValue::TokenId(_) => TypeTag::TokenId,
            DataValue::Timestamp(_) => TypeTag::Timestamp,
            DataValue::Boolean(_) => TypeTag::Boolean,
            DataValue::Balance(_) => TypeTag::Balance,
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            DataValue::Amount(0) => Err(ContractError::invalid_value("Amount", "must be positive")),
            DataValue::Int32(0) => Err(ContractError::invalid_value("Int32", "must be positive")),
            DataValue::ShortText(text) if text.len() > MAX_SHORT_TEXT_SIZE => {
                Err(ContractError::invalid_value(
                    "ShortText",
                    format!("{} bytes exceeds {MAX_SHORT_TEXT_SIZE}", text.len()),
                ))
            }
            _ => Ok(()),
        }
    }

    fn write_payload(&self, buf: &mut Vec<u8>) -> Result<()> {
        match self {
            DataValue::PublicKey(key) => buf.extend_from_slice(key),
            DataValue::Address(addr) | DataValue::ContractAccount(addr) => {
                buf.extend_from_slice(addr)
            }
            DataValue::TokenId(id) => buf.extend_from_slice(id),
            DataValue::Amount(v) | DataValue::Timestamp(v) | DataValue::Balance(v) => {
                let mut word = [0u8; 8];
                BigEndian::write_u64(&mut word, *v);
                buf.extend_from_slice(&word);
            }
            DataValue::Int32(v) => {
                let mut word = [0u8; 4];
                BigEndian::write_u32(&mut word, *v);
                buf.extend_from_slice(&word);
            }
            DataValue::Boolean(b) => buf.push(u8::from(*b)),
            DataValue::ShortText(text) => buf.extend_from_slice(&framing::frame_blob(text)?),
        }
        Ok(())
    }
}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataValue::PublicKey(bytes) => write!(f, "{}", hex::encode(bytes)),
            DataValue::Address(bytes) | DataValue::ContractAccount(bytes) => {
                write!(f, "{}", hex::encode(bytes))
            }
            DataValue::TokenId(bytes) => write!(f, "{}", hex::encode(bytes)),
            DataValue::Amount(v) | DataValue::Timestamp(v) | DataValue::Balance(v) => {
                write!(f, "{v}")
            }
            DataValue::Int32(v) => write!(f, "{v}"),
            DataValue::ShortText(text) => write!(f, "{:?}", String::from_utf8_lossy(text)),
            DataValue::Boolean(b) => write!(f, "{b}"),
        }
    }
}

/// A validated, encoded data entry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DataEntry {
    value: DataValue,
    /// `tag ++ payload`
    bytes: Vec<u8>,
}

impl DataEntry {
    /// Validate `value` against its tag's rule and encode it
    pub fn new(value: DataValue) -> Result<Self> {
        value.validate()?;
        let mut bytes = vec![value.tag().to_byte()];
        value.write_payload(&mut bytes)?;
        Ok(Self { value, bytes })
    }

    pub fn amount(value: u64) -> Result<Self> {
        Self::new(DataValue::Amount(value))
    }

    pub fn int32(value: u32) -> Result<Self> {
        Self::new(DataValue::Int32(value))
    }

    pub fn timestamp(value: u64) -> Result<Self> {
        Self::new(DataValue::Timestamp(value))
    }

    pub fn balance(value: u64) -> Result<Self> {
        Self::new(DataValue::Balance(value))
    }

    pub fn boolean(value: bool) -> Result<Self> {
        Self::new(DataValue::Boolean(value))
    }

    pub fn short_text(text: impl AsRef<[u8]>) -> Result<Self> {
        Self::new(DataValue::ShortText(text.as_ref().to_vec()))
    }

    pub fn public_key(key: &[u8]) -> Result<Self> {
        Self::new(DataValue::PublicKey(fixed(TypeTag::PublicKey, key)?))
    }

    pub fn address(address: &[u8]) -> Result<Self> {
        Self::new(DataValue::Address(fixed(TypeTag::Address, address)?))
    }

    pub fn contract_account(address: &[u8]) -> Result<Self> {
        Self::new(DataValue::ContractAccount(fixed(TypeTag::ContractAccount, address)?))
    }

    pub fn token_id(id: &[u8]) -> Result<Self> {
        Self::new(DataValue::TokenId(fixed(TypeTag::TokenId, id)?))
    }

    /// Build an entry from a tag and its wire payload.
    ///
    /// For `ShortText` the payload includes its own 2-byte length prefix.
    pub fn from_parts(tag: TypeTag, payload: &[u8]) -> Result<Self> {
        let value = match tag {
            TypeTag::PublicKey => DataValue::PublicKey(fixed(tag, payload)?),
            TypeTag::Address => DataValue::Address(fixed(tag, payload)?),
            TypeTag::ContractAccount => DataValue::ContractAccount(fixed(tag, payload)?),
            TypeTag::TokenId => DataValue::TokenId(fixed(tag, payload)?),
            TypeTag::Amount => DataValue::Amount(BigEndian::read_u64(&fixed::<8>(tag, payload)?)),
            TypeTag::Timestamp => {
                DataValue::Timestamp(BigEndian::read_u64(&fixed::<8>(tag, payload)?))
            }
            TypeTag::Balance => DataValue::Balance(BigEndian::read_u64(&fixed::<8>(tag, payload)?)),
            TypeTag::Int32 => DataValue::Int32(BigEndian::read_u32(&fixed::<4>(tag, payload)?)),
            TypeTag::Boolean => match fixed::<1>(tag, payload)? {
                [0] => DataValue::Boolean(false),
                [1] => DataValue::Boolean(true),
                [other] => {
                    return Err(ContractError::invalid_value(
                        tag.name(),
                        format!("{other:#04x} is not a boolean"),
                    ));
                }
            },
            TypeTag::ShortText => {
                let (text, end) = framing::parse_blob(payload, 0)?;
                if end != payload.len() {
                    return Err(ContractError::invalid_value(
                        tag.name(),
                        format!("length prefix {} disagrees with payload of {} bytes", text.len(), payload.len() - PREFIX_LEN),
                    ));
                }
                DataValue::ShortText(text.to_vec())
            }
            TypeTag::Account => return Err(account_has_no_value()),
        };
        Self::new(value)
    }

    /// Decode one entry at `offset`, returning it and the offset just past it
    pub fn decode(bytes: &[u8], offset: usize) -> Result<(Self, usize)> {
        let tag = TypeTag::decode_at(bytes, offset)?;
        let start = offset + 1;
        let payload_len = match tag.payload_len() {
            PayloadLen::Fixed(len) => len,
            PayloadLen::Variable => PREFIX_LEN + framing::read_u16(bytes, start)? as usize,
            PayloadLen::Marker => return Err(account_has_no_value()),
        };
        let payload = framing::take(bytes, start, payload_len)?;
        let entry = Self::from_parts(tag, payload)?;
        tracing::trace!(%tag, offset, value = %entry.value, "decoded data entry");
        Ok((entry, start + payload_len))
    }

    pub fn tag(&self) -> TypeTag {
        self.value.tag()
    }

    pub fn value(&self) -> &DataValue {
        &self.value
    }

    /// Payload without the tag byte
    pub fn raw(&self) -> &[u8] {
        &self.bytes[1..]
    }

    /// Full encoding, tag included
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl AsRef<[u8]> for DataEntry {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Display for DataEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.tag(), self.value)
    }
}

fn fixed<const N: usize>(tag: TypeTag, bytes: &[u8]) -> Result<[u8; N]> {
    bytes.try_into().map_err(|_| {
        ContractError::invalid_value(
            tag.name(),
            format!("expected {N} bytes, got {}", bytes.len()),
        )
    })
}

fn account_has_no_value() -> ContractError {
    ContractError::invalid_value("Account", "prototype-only type carries no value")
}

/// Encode a data stack: entry count followed by the concatenated entries
pub fn encode_list(entries: &[DataEntry]) -> Result<Vec<u8>> {
    framing::frame_list(entries)
}

/// Decode a data stack produced by [`encode_list`].
///
/// The first unknown tag or short read aborts the whole list.
pub fn decode_list(bytes: &[u8]) -> Result<Vec<DataEntry>> {
    let count = framing::read_u16(bytes, 0)? as usize;
    let mut entries = Vec::with_capacity(count.min(bytes.len()));
    let mut pos = PREFIX_LEN;
    for _ in 0..count {
        let (entry, next) = DataEntry::decode(bytes, pos)?;
        entries.push(entry);
        pos = next;
    }

    if pos != bytes.len() {
        return Err(ContractError::invalid_value(
            "data stack",
            format!("{} trailing bytes after {count} entries", bytes.len() - pos),
        ));
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_encoding() {
        let entry = DataEntry::amount(100).unwrap();
        assert_eq!(
            entry.as_bytes(),
            &[0x03, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x64]
        );
        assert_eq!(entry.raw().len(), 8);

        let (decoded, end) = DataEntry::decode(entry.as_bytes(), 0).unwrap();
        assert_eq!(decoded.value(), &DataValue::Amount(100));
        assert_eq!(end, 9);
    }

    #[test]
    fn test_short_text_encoding() {
        let entry = DataEntry::short_text("hi").unwrap();
        assert_eq!(entry.as_bytes(), &[0x05, 0x00, 0x02, b'h', b'i']);
        assert_eq!(
            encode_list(&[entry]).unwrap(),
            vec![0x00, 0x01, 0x05, 0x00, 0x02, 0x68, 0x69]
        );
    }

    #[test]
    fn test_positive_numbers() {
        assert!(matches!(
            DataEntry::amount(0),
            Err(ContractError::InvalidValue { .. })
        ));
        assert!(DataEntry::int32(0).is_err());
        assert!(DataEntry::amount(1).is_ok());
        assert!(DataEntry::amount(u64::MAX).is_ok());
        // Timestamps and balances may be zero
        assert!(DataEntry::timestamp(0).is_ok());
        assert!(DataEntry::balance(0).is_ok());
    }

    #[test]
    fn test_zero_amount_rejected_on_decode() {
        let bytes = [0x03, 0, 0, 0, 0, 0, 0, 0, 0];
        assert!(matches!(
            DataEntry::decode(&bytes, 0),
            Err(ContractError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_fixed_length_mismatch() {
        assert!(DataEntry::address(&[0u8; 25]).is_err());
        assert!(DataEntry::public_key(&[0u8; 33]).is_err());
        assert!(DataEntry::token_id(&[7u8; 30]).is_ok());
    }

    #[test]
    fn test_boolean_payload() {
        let entry = DataEntry::boolean(true).unwrap();
        assert_eq!(entry.as_bytes(), &[0x0a, 0x01]);
        assert!(DataEntry::decode(&[0x0a, 0x02], 0).is_err());
    }

    #[test]
    fn test_account_has_no_value() {
        assert!(DataEntry::from_parts(TypeTag::Account, &[]).is_err());
        assert!(DataEntry::decode(&[0x07], 0).is_err());
    }

    #[test]
    fn test_decode_list_unknown_tag_aborts() {
        let mut bytes = vec![0x00, 0x02];
        bytes.extend_from_slice(DataEntry::int32(5).unwrap().as_bytes());
        bytes.push(0x2a);
        assert_eq!(
            decode_list(&bytes),
            Err(ContractError::UnknownTag { tag: 0x2a, offset: 7 })
        );
    }

    #[test]
    fn test_decode_list_trailing_bytes() {
        let mut bytes = encode_list(&[DataEntry::int32(5).unwrap()]).unwrap();
        bytes.push(0x00);
        assert!(matches!(
            decode_list(&bytes),
            Err(ContractError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_short_text_inner_length_drives_offset() {
        let entries = vec![
            DataEntry::short_text("token").unwrap(),
            DataEntry::amount(7).unwrap(),
        ];
        let bytes = encode_list(&entries).unwrap();
        assert_eq!(decode_list(&bytes).unwrap(), entries);
    }
}
