//! Core data types for keys and transactions

use serde::{Deserialize, Serialize};

/// Hash type: 256-bit hash
pub type Hash = [u8; 32];

/// Hash160 type: RIPEMD-160 of SHA-256
pub type Hash160 = [u8; 20];

/// Byte string type
pub type ByteString = Vec<u8>;

/// Reference to an output of an earlier transaction.
///
/// `hash` keeps the byte order of the wire format; it is reversed only for display.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutPoint {
    pub hash: Hash,
    pub index: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionInput {
    pub prevout: OutPoint,
    pub script_sig: ByteString,
    pub sequence: u32,
}

/// Transaction output; `value` is in satoshis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionOutput {
    pub value: i64,
    pub script_pubkey: ByteString,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub version: u32,
    pub inputs: Vec<TransactionInput>,
    pub outputs: Vec<TransactionOutput>,
    pub lock_time: u32,
}

/// Text encoding a private key was recognized as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrivateKeyType {
    Wif,
    BrainWallet,
    MiniKey,
}

impl PrivateKeyType {
    pub fn name(&self) -> &'static str {
        match self {
            PrivateKeyType::Wif => "WIF",
            PrivateKeyType::BrainWallet => "Brain wallet",
            PrivateKeyType::MiniKey => "Mini private key",
        }
    }
}
