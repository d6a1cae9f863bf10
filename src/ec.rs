//! secp256k1 key engine: public key derivation, ECDSA signing and verification, DER coding

use crate::constants::{COMPRESSED_PUBKEY_LEN, PRIVATE_KEY_LEN, UNCOMPRESSED_PUBKEY_LEN};
use crate::error::{Result, SpendError};
use crate::types::{ByteString, Hash};
use secp256k1::{ecdsa::Signature, Message, PublicKey, Secp256k1, SecretKey};

/// True if the big-endian scalar lies in [1, n-1]
pub fn is_valid_scalar(scalar: &[u8]) -> bool {
    scalar.len() == PRIVATE_KEY_LEN && SecretKey::from_slice(scalar).is_ok()
}

fn secret_key(scalar: &[u8; 32]) -> Result<SecretKey> {
    SecretKey::from_slice(scalar)
        .map_err(|_| SpendError::KeyDecode("Private key scalar out of range".to_string()))
}

/// scalar * G, encoded as `04 || X || Y` or `02/03 || X`
pub fn derive_public_key(scalar: &[u8; 32], compressed: bool) -> Result<ByteString> {
    let secp = Secp256k1::signing_only();
    let public_key = PublicKey::from_secret_key(&secp, &secret_key(scalar)?);
    Ok(if compressed {
        public_key.serialize().to_vec()
    } else {
        public_key.serialize_uncompressed().to_vec()
    })
}

/// Deterministic ECDSA signature over `message_hash`, normalized to low S
pub fn sign(message_hash: &Hash, scalar: &[u8; 32]) -> Result<Signature> {
    let secp = Secp256k1::signing_only();
    let message = Message::from_digest_slice(message_hash)
        .map_err(|e| SpendError::Format(format!("Invalid message hash: {}", e)))?;
    let mut signature = secp.sign_ecdsa(&message, &secret_key(scalar)?);
    signature.normalize_s();
    Ok(signature)
}

/// Verify a signature against a serialized public key.
///
/// High-S signatures are normalized first so historical transactions still verify.
pub fn verify(message_hash: &Hash, signature: &Signature, public_key: &[u8]) -> bool {
    if public_key.len() != COMPRESSED_PUBKEY_LEN && public_key.len() != UNCOMPRESSED_PUBKEY_LEN {
        return false;
    }
    let public_key = match PublicKey::from_slice(public_key) {
        Ok(pk) => pk,
        Err(_) => return false,
    };
    let message = match Message::from_digest_slice(message_hash) {
        Ok(m) => m,
        Err(_) => return false,
    };

    let mut normalized = *signature;
    normalized.normalize_s();

    let secp = Secp256k1::verification_only();
    secp.verify_ecdsa(&message, &normalized, &public_key).is_ok()
}

/// DER SEQUENCE { INTEGER r, INTEGER s }
pub fn encode_der(signature: &Signature) -> ByteString {
    signature.serialize_der().to_vec()
}

/// Parse a DER signature; lax BER encodings found in old transactions are accepted
pub fn decode_der(bytes: &[u8]) -> Result<Signature> {
    Signature::from_der(bytes)
        .or_else(|_| Signature::from_der_lax(bytes))
        .map_err(|e| SpendError::Format(format!("Invalid DER signature: {}", e)))
}

/// (r, s) as 32-byte big-endian integers
pub fn signature_components(signature: &Signature) -> ([u8; 32], [u8; 32]) {
    let compact = signature.serialize_compact();
    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&compact[..32]);
    s.copy_from_slice(&compact[32..]);
    (r, s)
}
