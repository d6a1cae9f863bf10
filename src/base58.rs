//! Base58 and Base58Check codecs
//!
//! The byte string is read as one big-endian unsigned integer and converted to radix 58
//! with arbitrary-precision arithmetic. Each leading zero byte maps to one leading `'1'`
//! and back, so both magnitude and leading-zero count survive a round trip.

use crate::constants::{BASE58_ALPHABET, CHECKSUM_LEN};
use crate::error::{Result, SpendError};
use crate::hash::double_sha256;
use num_bigint::BigUint;

/// Encode bytes as Base58 text
pub fn encode_base58(bytes: &[u8]) -> String {
    let zeros = bytes.iter().take_while(|&&b| b == 0).count();
    let mut encoded = String::with_capacity(bytes.len() * 138 / 100 + 1);
    for _ in 0..zeros {
        encoded.push(BASE58_ALPHABET[0] as char);
    }

    let significant = &bytes[zeros..];
    if !significant.is_empty() {
        let number = BigUint::from_bytes_be(significant);
        for digit in number.to_radix_be(58) {
            encoded.push(BASE58_ALPHABET[digit as usize] as char);
        }
    }
    encoded
}

/// Decode Base58 text; fails on any character outside the alphabet
pub fn decode_base58(text: &str) -> Result<Vec<u8>> {
    let mut digits = Vec::with_capacity(text.len());
    for c in text.chars() {
        let digit = BASE58_ALPHABET
            .iter()
            .position(|&a| a as char == c)
            .ok_or_else(|| SpendError::Format(format!("Invalid Base58 character {:?}", c)))?;
        digits.push(digit as u8);
    }

    let zeros = digits.iter().take_while(|&&d| d == 0).count();
    let mut decoded = vec![0u8; zeros];
    let significant = &digits[zeros..];
    if !significant.is_empty() {
        let number = BigUint::from_radix_be(significant, 58)
            .ok_or_else(|| SpendError::Format("Invalid Base58 digits".to_string()))?;
        decoded.extend_from_slice(&number.to_bytes_be());
    }
    Ok(decoded)
}

/// First four bytes of double SHA-256
pub fn checksum(payload: &[u8]) -> [u8; CHECKSUM_LEN] {
    let hash = double_sha256(payload);
    let mut sum = [0u8; CHECKSUM_LEN];
    sum.copy_from_slice(&hash[..CHECKSUM_LEN]);
    sum
}

/// Check that the last four bytes are the checksum of the bytes before them.
///
/// Never fails: inputs shorter than a checksum are simply invalid.
pub fn verify_checksum(bytes: &[u8]) -> bool {
    if bytes.len() < CHECKSUM_LEN {
        return false;
    }
    let (payload, sum) = bytes.split_at(bytes.len() - CHECKSUM_LEN);
    checksum(payload) == sum
}

/// Base58(payload || checksum(payload))
pub fn encode_base58_check(payload: &[u8]) -> String {
    let mut data = Vec::with_capacity(payload.len() + CHECKSUM_LEN);
    data.extend_from_slice(payload);
    data.extend_from_slice(&checksum(payload));
    encode_base58(&data)
}

/// Decode Base58Check text and strip the verified checksum
pub fn decode_base58_check(text: &str) -> Result<Vec<u8>> {
    let mut data = decode_base58(text)?;
    if data.len() < CHECKSUM_LEN {
        return Err(SpendError::Format(format!(
            "Base58Check data too short: {} bytes",
            data.len()
        )));
    }
    if !verify_checksum(&data) {
        return Err(SpendError::Checksum(text.to_string()));
    }
    data.truncate(data.len() - CHECKSUM_LEN);
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_pair(hex_bytes: &str, base58: &str) {
        let bytes = hex::decode(hex_bytes).unwrap();
        assert_eq!(encode_base58(&bytes), base58);
        assert_eq!(decode_base58(base58).unwrap(), bytes);
    }

    #[test]
    fn test_base58_reference_vectors() {
        check_pair("", "");
        check_pair("61", "2g");
        check_pair("626262", "a3gV");
        check_pair("636363", "aPEr");
        check_pair(
            "73696d706c792061206c6f6e6720737472696e67",
            "2cFupjhnEsSn59qHXstmK2ffpLv2",
        );
        check_pair(
            "00eb15231dfceb60925886b67d065299925915aeb172c06647",
            "1NS17iag9jJgTHD1VXjvLCEnZuQ3rJDE9L",
        );
        check_pair("516b6fcd0f", "ABnLTmg");
        check_pair("bf4f89001e670274dd", "3SEo3LWLoPntC");
        check_pair("572e4794", "3EFU7m");
        check_pair("ecac89cad93923c02321", "EJDM8drfXA6uyA");
        check_pair("10c8511e", "Rt5zm");
        check_pair("00000000000000000000", "1111111111");
    }

    #[test]
    fn test_decode_base58_rejects_outside_alphabet() {
        for text in ["0", "O", "I", "l", "abc+", "ваполршг"] {
            assert!(matches!(decode_base58(text), Err(SpendError::Format(_))), "{}", text);
        }
    }

    #[test]
    fn test_verify_checksum() {
        let good = hex::decode("00010966776006953D5567439E5E39F86A0D273BEED61967F6").unwrap();
        assert!(verify_checksum(&good));

        let bad_checksum = hex::decode("00010966776006953D5567439E5E39F86A0D273BEED61967F5").unwrap();
        assert!(!verify_checksum(&bad_checksum));

        let bad_version = hex::decode("10010966776006953D5567439E5E39F86A0D273BEED61967F6").unwrap();
        assert!(!verify_checksum(&bad_version));
    }

    #[test]
    fn test_verify_checksum_short_input() {
        assert!(!verify_checksum(&[]));
        assert!(!verify_checksum(&[1, 2, 3]));
    }

    #[test]
    fn test_base58_check_round_trip() {
        let payload = [0x80, 0x11, 0x22, 0x33];
        let text = encode_base58_check(&payload);
        assert_eq!(decode_base58_check(&text).unwrap(), payload.to_vec());
    }

    #[test]
    fn test_decode_base58_check_checksum_error() {
        assert!(matches!(
            decode_base58_check("1111111111111111111214oLvT2"),
            Err(SpendError::Checksum(_))
        ));
    }
}
