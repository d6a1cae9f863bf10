//! P2PKH address derivation and validation

use crate::base58::{decode_base58, encode_base58_check, verify_checksum};
use crate::constants::{ADDRESS_DECODED_LEN, P2PKH_ADDRESS_VERSION};
use crate::error::{Result, SpendError};
use crate::hash::hash160;
use crate::types::Hash160;

/// Base58Check(0x00 || hash160(public_key))
pub fn public_key_to_address(public_key: &[u8]) -> String {
    hash160_to_address(&hash160(public_key))
}

pub fn hash160_to_address(hash: &Hash160) -> String {
    let mut payload = Vec::with_capacity(21);
    payload.push(P2PKH_ADDRESS_VERSION);
    payload.extend_from_slice(hash);
    encode_base58_check(&payload)
}

/// Decode a P2PKH address into the public key hash it pays to.
///
/// Surrounding whitespace is ignored.
pub fn decode_address(address: &str) -> Result<Hash160> {
    let address = address.trim();
    if address.is_empty() {
        return Err(SpendError::Address("Empty address".to_string()));
    }
    let decoded = decode_base58(address)
        .map_err(|e| SpendError::Address(format!("{}: {}", address, e)))?;
    if decoded.len() != ADDRESS_DECODED_LEN {
        return Err(SpendError::Address(format!(
            "{}: decodes to {} bytes",
            address,
            decoded.len()
        )));
    }
    if !verify_checksum(&decoded) {
        return Err(SpendError::Checksum(address.to_string()));
    }
    if decoded[0] != P2PKH_ADDRESS_VERSION {
        return Err(SpendError::Address(format!(
            "{}: unsupported version byte 0x{:02x}",
            address, decoded[0]
        )));
    }
    let mut hash = [0u8; 20];
    hash.copy_from_slice(&decoded[1..21]);
    Ok(hash)
}

/// Total predicate: any malformed or absent address is simply `false`
pub fn verify_bitcoin_address(address: Option<&str>) -> bool {
    match address {
        Some(address) => decode_address(address).is_ok(),
        None => false,
    }
}
