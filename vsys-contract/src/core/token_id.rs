//! Checksummed token identifiers derived from contract ids
//!
//! A contract id is `version:1 ++ body:21 ++ checksum:4`. The token at
//! `index` replaces the version byte with the token address version, appends
//! the index as a big-endian `u32` and re-checksums the result.

use crate::core::types::{ADDRESS_LENGTH, TOKEN_ID_LENGTH};
use crate::error::{ContractError, Result};
use blake2::Blake2b;
use blake2::digest::consts::U32;
use byteorder::{BigEndian, ByteOrder};
use sha3::{Digest, Keccak256};

type Blake2b256 = Blake2b<U32>;

/// Version byte of contract account addresses
pub const CONTRACT_ADDRESS_VERSION: u8 = 6;

/// Version byte of token ids (`-124` as a signed byte)
pub const TOKEN_ADDRESS_VERSION: u8 = 0x84;

/// Trailing checksum bytes of addresses, contract ids and token ids
pub const CHECKSUM_LENGTH: usize = 4;

/// `keccak256(blake2b256(data))`
pub fn hash_chain(data: &[u8]) -> [u8; 32] {
    let blake = Blake2b256::digest(data);
    Keccak256::digest(blake).into()
}

/// First [`CHECKSUM_LENGTH`] bytes of the hash chain
pub fn checksum(data: &[u8]) -> [u8; CHECKSUM_LENGTH] {
    let mut sum = [0u8; CHECKSUM_LENGTH];
    sum.copy_from_slice(&hash_chain(data)[..CHECKSUM_LENGTH]);
    sum
}

/// Derive the id of token `index` issued by the contract `contract_id`.
///
/// The contract id's own checksum is dropped, not verified.
pub fn token_id(contract_id: &[u8], index: u32) -> Result<[u8; TOKEN_ID_LENGTH]> {
    if contract_id.len() != ADDRESS_LENGTH {
        return Err(ContractError::invalid_value(
            "contract id",
            format!(
                "expected {ADDRESS_LENGTH} bytes, got {}",
                contract_id.len()
            ),
        ));
    }
    let body = &contract_id[1..ADDRESS_LENGTH - CHECKSUM_LENGTH];

    let mut id = [0u8; TOKEN_ID_LENGTH];
    let unsigned_len = TOKEN_ID_LENGTH - CHECKSUM_LENGTH;
    id[0] = TOKEN_ADDRESS_VERSION;
    id[1..1 + body.len()].copy_from_slice(body);
    BigEndian::write_u32(&mut id[1 + body.len()..unsigned_len], index);

    let sum = checksum(&id[..unsigned_len]);
    id[unsigned_len..].copy_from_slice(&sum);

    tracing::trace!(index, token_id = %hex::encode(id), "derived token id");
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn contract_id() -> Vec<u8> {
        let mut id = vec![CONTRACT_ADDRESS_VERSION];
        id.extend(1u8..=21);
        id.extend_from_slice(&[0xaa, 0xbb, 0xcc, 0xdd]);
        id
    }

    #[test]
    fn test_hash_chain_empty_input() {
        assert_eq!(
            hex::encode(hash_chain(&[])),
            "b8ac8f9444c818d16a1b5a6f885322da4795ea2d18e0a757fd45f5723643ec33"
        );
    }

    #[test]
    fn test_token_id_known_answers() {
        assert_eq!(
            hex::encode(token_id(&contract_id(), 0).unwrap()),
            "840102030405060708090a0b0c0d0e0f101112131415000000009c764b47"
        );
        assert_eq!(
            hex::encode(token_id(&contract_id(), 1).unwrap()),
            "840102030405060708090a0b0c0d0e0f10111213141500000001ff4d2f14"
        );
    }

    #[test]
    fn test_token_id_ignores_contract_checksum() {
        let mut other = contract_id();
        other[25] ^= 0xff;
        assert_eq!(token_id(&other, 3).unwrap(), token_id(&contract_id(), 3).unwrap());
    }

    #[test]
    fn test_token_id_checksum_verifies() {
        let id = token_id(&contract_id(), 7).unwrap();
        let (unsigned, sum) = id.split_at(TOKEN_ID_LENGTH - CHECKSUM_LENGTH);
        assert_eq!(checksum(unsigned), sum);
    }

    #[test]
    fn test_token_id_rejects_wrong_length() {
        let id = contract_id();
        for bad in [&id[..25], &[][..], &[0u8; 27][..]] {
            assert!(matches!(
                token_id(bad, 0),
                Err(ContractError::InvalidValue { .. })
            ));
        }
    }
}
