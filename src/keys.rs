//! Private key decoding and key pairs
//!
//! Text is classified by trying each known private key format in a fixed order and
//! stopping at the first one that accepts it:
//! 1. WIF (Base58Check, version 0x80, optional compression flag)
//! 2. Mini private key (`S...`, 22/26/30 characters, `sha256(text + "?")[0] == 0`)
//! 3. Brain wallet (`sha256(text)` used directly as the scalar)

use crate::address::public_key_to_address;
use crate::base58::{decode_base58, encode_base58_check, verify_checksum};
use crate::constants::*;
use crate::ec::{derive_public_key, is_valid_scalar};
use crate::error::{Result, SpendError};
use crate::hash::sha256;
use crate::types::{ByteString, PrivateKeyType};
use rand::Rng;

/// A decoded private key together with the text it was decoded from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivateKeyInfo {
    key_type: PrivateKeyType,
    encoded_text: String,
    scalar: [u8; 32],
    compressed: bool,
}

impl PrivateKeyInfo {
    /// Fails with `KeyDecode` unless the scalar lies in [1, n-1]
    pub fn new(
        key_type: PrivateKeyType,
        encoded_text: impl Into<String>,
        scalar: [u8; 32],
        compressed: bool,
    ) -> Result<Self> {
        if !is_valid_scalar(&scalar) {
            return Err(SpendError::KeyDecode(
                "Private key scalar out of range".to_string(),
            ));
        }
        Ok(Self {
            key_type,
            encoded_text: encoded_text.into(),
            scalar,
            compressed,
        })
    }

    pub fn key_type(&self) -> PrivateKeyType {
        self.key_type
    }

    pub fn encoded_text(&self) -> &str {
        &self.encoded_text
    }

    /// Big-endian private key scalar
    pub fn scalar(&self) -> &[u8; 32] {
        &self.scalar
    }

    pub fn is_public_key_compressed(&self) -> bool {
        self.compressed
    }

    /// Same key, other public key encoding
    pub fn with_compression(&self, compressed: bool) -> Self {
        Self {
            compressed,
            ..self.clone()
        }
    }

    /// Wallet Import Format text for this key
    pub fn to_wif(&self) -> String {
        let mut payload = Vec::with_capacity(PRIVATE_KEY_LEN + 2);
        payload.push(WIF_VERSION);
        payload.extend_from_slice(&self.scalar);
        if self.compressed {
            payload.push(WIF_COMPRESSION_FLAG);
        }
        encode_base58_check(&payload)
    }
}

/// A private key with its derived public key and address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPair {
    private_key: PrivateKeyInfo,
    public_key: ByteString,
    address: String,
}

impl KeyPair {
    pub fn new(private_key: PrivateKeyInfo) -> Result<Self> {
        let public_key = derive_public_key(private_key.scalar(), private_key.is_public_key_compressed())?;
        let address = public_key_to_address(&public_key);
        Ok(Self {
            private_key,
            public_key,
            address,
        })
    }

    pub fn private_key(&self) -> &PrivateKeyInfo {
        &self.private_key
    }

    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Re-derive the pair with the other public key encoding
    pub fn with_compression(&self, compressed: bool) -> Result<Self> {
        Self::new(self.private_key.with_compression(compressed))
    }
}

type Decoder = fn(&str) -> Result<PrivateKeyInfo>;

const DECODERS: [(PrivateKeyType, Decoder); 3] = [
    (PrivateKeyType::Wif, decode_wif),
    (PrivateKeyType::MiniKey, decode_mini_key),
    (PrivateKeyType::BrainWallet, decode_brain_wallet),
];

/// Classify and decode private key text.
///
/// Surrounding whitespace is ignored. Fails only when no format accepts the text.
pub fn decode_private_key(text: &str) -> Result<PrivateKeyInfo> {
    let text = text.trim();
    let mut last_error = SpendError::KeyDecode("Empty private key".to_string());
    for (key_type, decoder) in DECODERS.iter() {
        match decoder(text) {
            Ok(info) => return Ok(info),
            Err(e) => {
                log::debug!("Not a {} private key: {}", key_type.name(), e);
                last_error = e;
            }
        }
    }
    Err(match last_error {
        SpendError::KeyDecode(reason) => SpendError::KeyDecode(reason),
        other => SpendError::KeyDecode(other.to_string()),
    })
}

/// Decode text as a brain wallet passphrase even if it parses as another format
pub fn decode_private_key_as_sha256(text: &str) -> Result<PrivateKeyInfo> {
    decode_brain_wallet(text.trim())
}

/// WIF: Base58Check of `0x80 || scalar [|| 0x01]`
pub fn decode_wif(text: &str) -> Result<PrivateKeyInfo> {
    let decoded = decode_base58(text)?;
    let compressed = match decoded.len() {
        37 => false,
        38 if decoded[33] == WIF_COMPRESSION_FLAG => true,
        len => return Err(SpendError::Format(format!("Unexpected WIF length {}", len))),
    };
    if decoded[0] != WIF_VERSION {
        return Err(SpendError::Format(format!(
            "Unexpected WIF version byte 0x{:02x}",
            decoded[0]
        )));
    }
    if !verify_checksum(&decoded) {
        return Err(SpendError::Checksum(text.to_string()));
    }
    let mut scalar = [0u8; 32];
    scalar.copy_from_slice(&decoded[1..33]);
    PrivateKeyInfo::new(PrivateKeyType::Wif, text, scalar, compressed)
}

/// True if the text passes the mini private key shape and typo check
pub fn is_mini_key(text: &str) -> bool {
    text.starts_with(MINI_KEY_PREFIX)
        && MINI_KEY_LENGTHS.contains(&text.len())
        && text.bytes().all(|b| BASE58_ALPHABET.contains(&b))
        && sha256(format!("{}?", text).as_bytes())[0] == 0
}

/// Mini private key: the scalar is `sha256(text)`
pub fn decode_mini_key(text: &str) -> Result<PrivateKeyInfo> {
    if !is_mini_key(text) {
        return Err(SpendError::Format("Not a mini private key".to_string()));
    }
    PrivateKeyInfo::new(PrivateKeyType::MiniKey, text, sha256(text.as_bytes()), false)
}

/// Brain wallet: the scalar is `sha256(text)`, hashed once
pub fn decode_brain_wallet(text: &str) -> Result<PrivateKeyInfo> {
    if text.is_empty() {
        return Err(SpendError::KeyDecode("Empty passphrase".to_string()));
    }
    PrivateKeyInfo::new(
        PrivateKeyType::BrainWallet,
        text,
        sha256(text.as_bytes()),
        false,
    )
}

/// Generate a fresh random mini private key and its key pair
pub fn generate_mini_key() -> Result<KeyPair> {
    let mut rng = rand::thread_rng();
    loop {
        let mut candidate = String::with_capacity(MINI_KEY_GENERATED_LEN);
        candidate.push(MINI_KEY_PREFIX);
        while candidate.len() < MINI_KEY_GENERATED_LEN {
            candidate.push(BASE58_ALPHABET[rng.gen_range(0..BASE58_ALPHABET.len())] as char);
        }
        if let Ok(info) = decode_mini_key(&candidate) {
            return KeyPair::new(info);
        }
    }
}
