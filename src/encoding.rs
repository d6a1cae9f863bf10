//! Hex text codec

use crate::error::{Result, SpendError};

/// Decode hex text (either case) into bytes.
///
/// Fails on odd length or any non-hex character.
pub fn from_hex(text: &str) -> Result<Vec<u8>> {
    hex::decode(text).map_err(|e| SpendError::Format(format!("Invalid hex: {}", e)))
}

/// Encode bytes as lowercase hex
pub fn to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}
