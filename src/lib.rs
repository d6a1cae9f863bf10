//! # Offline-Spend
//!
//! Bitcoin key handling and single-input transaction construction without a network.
//!
//! This crate provides pure, side-effect-free functions to:
//! - classify and decode private key text (WIF, mini private key, brain wallet passphrase)
//! - derive secp256k1 public keys and P2PKH addresses
//! - parse and serialize raw transactions byte-for-byte
//! - build, sign and verify a spend of one P2PKH output to one address, minus a fee
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every call is deterministic apart from mini key generation
//! 2. **Exact Wire Format**: `serialize(parse(bytes)) == bytes` for every accepted transaction
//! 3. **Exact Version Pinning**: All signing-critical dependencies pinned to exact versions
//! 4. **Fail Fast**: Construction and verification abort with a typed `SpendError`
//!
//! ## Usage
//!
//! ```rust
//! use offline_spend::SpendEngine;
//!
//! let engine = SpendEngine::new();
//! let key_pair = engine
//!     .decode_private_key("KwntMbt59tTsj8xqpqYqRRWufyjGunvhSyeMo3NTYpFYzZbXJ5Hp")
//!     .unwrap();
//! assert_eq!(key_pair.address(), "1Q1pE5vPGEEMqRcVRMbtBK842Y6Pzo6nK9");
//! ```

pub mod types;
pub mod constants;
pub mod config;
pub mod error;
pub mod hash;
pub mod encoding;
pub mod base58;
pub mod ec;
pub mod keys;
pub mod address;
pub mod transaction;
pub mod script;
pub mod builder;
pub mod amount;

// Re-export commonly used types
pub use types::*;
pub use constants::*;
pub use config::Config;
pub use error::{Result, SpendError};
pub use keys::{KeyPair, PrivateKeyInfo};

use serde::Serialize;

/// A signed, self-verified spend ready to be handed to a broadcaster
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpendSummary {
    pub transaction: Transaction,
    /// Raw transaction hex
    pub hex: String,
    /// Satoshis received by the recipient
    pub amount: i64,
    pub fee: i64,
    pub source_address: String,
    pub recipient: String,
}

/// Entry point bundling every operation with the active `Config`
///
/// # Examples
///
/// ```
/// use offline_spend::{SpendEngine, PrivateKeyType};
///
/// let engine = SpendEngine::new();
/// let key_pair = engine.decode_private_key("correct horse battery staple").unwrap();
/// assert_eq!(key_pair.private_key().key_type(), PrivateKeyType::BrainWallet);
/// assert!(engine.verify_address(Some(key_pair.address())));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SpendEngine {
    config: Config,
}

impl SpendEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Decode private key text into a key pair.
    ///
    /// Brain wallet keys take the configured public key encoding.
    pub fn decode_private_key(&self, text: &str) -> Result<KeyPair> {
        let info = keys::decode_private_key(text)?;
        let info = if info.key_type() == PrivateKeyType::BrainWallet {
            info.with_compression(self.config.brain_wallet_compressed)
        } else {
            info
        };
        KeyPair::new(info)
    }

    /// Decode text as a brain wallet passphrase regardless of its shape
    pub fn decode_private_key_as_sha256(&self, text: &str) -> Result<KeyPair> {
        let info = keys::decode_private_key_as_sha256(text)?;
        KeyPair::new(info.with_compression(self.config.brain_wallet_compressed))
    }

    /// Fresh random mini private key
    pub fn generate_key_pair(&self) -> Result<KeyPair> {
        keys::generate_mini_key()
    }

    pub fn verify_address(&self, address: Option<&str>) -> bool {
        address::verify_bitcoin_address(address)
    }

    /// Hex-decode and parse a transaction, rejecting anything that does not
    /// re-serialize to the same bytes
    pub fn decode_transaction_hex(&self, text: &str) -> Result<Transaction> {
        let bytes = encoding::from_hex(text.trim())?;
        transaction::parse_checked(&bytes)
    }

    pub fn find_spendable_output(&self, tx: &Transaction, address: &str) -> Result<usize> {
        builder::find_spendable_output(tx, address, self.config.fee)
    }

    pub fn create_transaction(
        &self,
        base_tx: &Transaction,
        spent_output_index: usize,
        recipient_address: &str,
        key_pair: &KeyPair,
    ) -> Result<Transaction> {
        builder::create_transaction(
            base_tx,
            spent_output_index,
            recipient_address,
            self.config.fee,
            key_pair.public_key(),
            key_pair.private_key().scalar(),
        )
    }

    pub fn verify_spend(&self, prev_script: &[u8], spending_tx: &Transaction) -> Result<()> {
        script::verify(prev_script, spending_tx)
    }

    /// Full pipeline: decode the funding transaction, pick the output paying
    /// `key_pair`, spend it to `recipient` and verify the result
    pub fn build_spend(
        &self,
        base_tx_hex: &str,
        key_pair: &KeyPair,
        recipient: &str,
    ) -> Result<SpendSummary> {
        let base_tx = self.decode_transaction_hex(base_tx_hex)?;
        let index = self.find_spendable_output(&base_tx, key_pair.address())?;

        let recipient = recipient.trim();
        if !self.verify_address(Some(recipient)) {
            return Err(SpendError::Address(format!("Invalid recipient {}", recipient)));
        }

        let spend = self.create_transaction(&base_tx, index, recipient, key_pair)?;
        if let Err(e) = self.verify_spend(&base_tx.outputs[index].script_pubkey, &spend) {
            log::warn!("Built transaction failed verification: {}", e);
            return Err(e);
        }

        let sent = spend.outputs[0].value;
        log::info!(
            "Spending {} BTC from {} output {} to {}, fee {} BTC",
            amount::format_value(sent),
            base_tx.txid_hex(),
            index,
            recipient,
            amount::format_value(self.config.fee)
        );
        Ok(SpendSummary {
            hex: encoding::to_hex(&spend.serialize()),
            transaction: spend,
            amount: sent,
            fee: self.config.fee,
            source_address: key_pair.address().to_string(),
            recipient: recipient.to_string(),
        })
    }
}
