//! Error types for key decoding, transaction coding and spend construction

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpendError {
    #[error("Malformed input: {0}")]
    Format(String),

    #[error("Checksum mismatch: {0}")]
    Checksum(String),

    #[error("Invalid address: {0}")]
    Address(String),

    #[error("Unable to decode private key: {0}")]
    KeyDecode(String),

    #[error("Script invalid: {0}")]
    ScriptInvalid(String),

    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, SpendError>;
