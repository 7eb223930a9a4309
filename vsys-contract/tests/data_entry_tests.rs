//! Data stack encoding tests

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use test_case::test_case;
use vsys_contract::core::types::{ADDRESS_LENGTH, MAX_SHORT_TEXT_SIZE, TOKEN_ID_LENGTH};
use vsys_contract::{
    ContractError, DataEntry, DataValue, TypeTag, decode_list, encode_list, token_id,
};

fn byte_vec(len: impl Into<prop::collection::SizeRange>) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), len)
}

fn data_entry() -> impl Strategy<Value = DataEntry> {
    prop_oneof![
        prop::array::uniform32(any::<u8>()).prop_map(|key| DataEntry::public_key(&key).unwrap()),
        byte_vec(ADDRESS_LENGTH).prop_map(|addr| DataEntry::address(&addr).unwrap()),
        (1..=u64::MAX).prop_map(|v| DataEntry::amount(v).unwrap()),
        (1..=u32::MAX).prop_map(|v| DataEntry::int32(v).unwrap()),
        byte_vec(0..=MAX_SHORT_TEXT_SIZE).prop_map(|text| DataEntry::short_text(text).unwrap()),
        byte_vec(ADDRESS_LENGTH).prop_map(|addr| DataEntry::contract_account(&addr).unwrap()),
        byte_vec(TOKEN_ID_LENGTH).prop_map(|id| DataEntry::token_id(&id).unwrap()),
        any::<u64>().prop_map(|v| DataEntry::timestamp(v).unwrap()),
        any::<bool>().prop_map(|b| DataEntry::boolean(b).unwrap()),
        any::<u64>().prop_map(|v| DataEntry::balance(v).unwrap()),
    ]
}

proptest! {
    #[test]
    fn data_stack_survives_encoding(entries in prop::collection::vec(data_entry(), 0..16)) {
        let bytes = encode_list(&entries).unwrap();
        prop_assert_eq!(decode_list(&bytes).unwrap(), entries);
    }

    #[test]
    fn truncated_data_stack_is_rejected(entries in prop::collection::vec(data_entry(), 1..8), cut in 1usize..64) {
        let bytes = encode_list(&entries).unwrap();
        let len = bytes.len().saturating_sub(cut);
        prop_assert!(decode_list(&bytes[..len]).is_err());
    }
}

#[test_case(0, false ; "empty text")]
#[test_case(1, true ; "one byte")]
#[test_case(MAX_SHORT_TEXT_SIZE, true ; "at limit")]
#[test_case(MAX_SHORT_TEXT_SIZE + 1, false ; "over limit")]
fn short_text_length_limit(len: usize, non_empty: bool) {
    let text = vec![b'a'; len];
    let result = DataEntry::short_text(&text);
    if len > MAX_SHORT_TEXT_SIZE {
        assert!(matches!(result, Err(ContractError::InvalidValue { .. })));
    } else {
        let entry = result.unwrap();
        assert_eq!(entry.as_bytes().len(), 1 + 2 + len);
        assert_eq!(!entry.raw()[2..].is_empty(), non_empty);
    }
}

#[test]
fn oversized_short_text_rejected_on_decode() {
    let mut bytes = vec![0x05, 0x00, 0x8d];
    bytes.extend(vec![b'x'; MAX_SHORT_TEXT_SIZE + 1]);
    assert!(matches!(
        DataEntry::decode(&bytes, 0),
        Err(ContractError::InvalidValue { .. })
    ));
}

#[test_case(0, false ; "zero")]
#[test_case(1, true ; "one")]
#[test_case(u64::MAX, true ; "max")]
fn amount_must_be_positive(value: u64, ok: bool) {
    assert_eq!(DataEntry::amount(value).is_ok(), ok);
}

#[test_case(TypeTag::PublicKey, 32)]
#[test_case(TypeTag::Address, 26)]
#[test_case(TypeTag::Amount, 8)]
#[test_case(TypeTag::Int32, 4)]
#[test_case(TypeTag::ContractAccount, 26)]
#[test_case(TypeTag::TokenId, 30)]
#[test_case(TypeTag::Timestamp, 8)]
#[test_case(TypeTag::Boolean, 1)]
#[test_case(TypeTag::Balance, 8)]
fn fixed_payload_lengths(tag: TypeTag, len: usize) {
    let mut payload = vec![0u8; len];
    payload[len - 1] = 1;
    let entry = DataEntry::from_parts(tag, &payload).unwrap();
    assert_eq!(entry.tag(), tag);
    assert_eq!(entry.raw(), payload.as_slice());

    assert!(DataEntry::from_parts(tag, &payload[..len - 1]).is_err());
}

#[test]
fn decoded_values_expose_typed_view() {
    let entries = vec![
        DataEntry::amount(100).unwrap(),
        DataEntry::short_text("hi").unwrap(),
        DataEntry::boolean(false).unwrap(),
    ];
    let decoded = decode_list(&encode_list(&entries).unwrap()).unwrap();
    let values: Vec<_> = decoded.iter().map(|e| e.value().clone()).collect();
    assert_eq!(
        values,
        vec![
            DataValue::Amount(100),
            DataValue::ShortText(b"hi".to_vec()),
            DataValue::Boolean(false),
        ]
    );
}

#[test]
fn empty_data_stack() {
    assert_eq!(encode_list(&[]).unwrap(), vec![0x00, 0x00]);
    assert!(decode_list(&[0x00, 0x00]).unwrap().is_empty());
    assert!(matches!(
        decode_list(&[0x00]),
        Err(ContractError::TruncatedInput { .. })
    ));
}

#[test]
fn count_larger_than_entries() {
    let mut bytes = encode_list(&[DataEntry::int32(9).unwrap()]).unwrap();
    bytes[1] = 2;
    assert!(matches!(
        decode_list(&bytes),
        Err(ContractError::TruncatedInput { offset: 7, .. })
    ));
}

#[test]
fn display_shows_tag_and_value() {
    assert_eq!(DataEntry::amount(100).unwrap().to_string(), "Amount(100)");
    assert_eq!(
        DataEntry::short_text("hi").unwrap().to_string(),
        "ShortText(\"hi\")"
    );
}

#[test]
fn derived_token_id_is_a_data_entry() {
    let mut contract_id = vec![0x06];
    contract_id.extend(1u8..=21);
    contract_id.extend_from_slice(&[0xaa, 0xbb, 0xcc, 0xdd]);

    let id = token_id(&contract_id, 0).unwrap();
    let entry = DataEntry::token_id(&id).unwrap();
    assert_eq!(entry.tag(), TypeTag::TokenId);
    assert_eq!(entry.value(), &DataValue::TokenId(id));
    assert_eq!(
        hex::encode(entry.as_bytes()),
        "08840102030405060708090a0b0c0d0e0f101112131415000000009c764b47"
    );

    assert!(matches!(
        token_id(&contract_id[1..], 0),
        Err(ContractError::InvalidValue { .. })
    ));
}

#[test]
fn data_stack_count_overflow_is_invalid_value() {
    let entry = DataEntry::int32(1).unwrap();
    let entries = vec![entry; u16::MAX as usize + 1];
    let err = encode_list(&entries).unwrap_err();
    assert_eq!(err.kind(), "InvalidValue");

    assert!(encode_list(&entries[..u16::MAX as usize]).is_ok());
}
