//! Runtime settings for the spend pipeline

use crate::constants::{DEFAULT_FEE, MAX_MONEY};
use crate::error::{Result, SpendError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Fee deducted from the spent output, in satoshis
    pub fee: i64,
    /// Public key encoding used for freshly decoded brain wallet keys
    pub brain_wallet_compressed: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fee: DEFAULT_FEE,
            brain_wallet_compressed: false,
        }
    }
}

impl Config {
    /// Load settings from JSON; absent fields keep their defaults
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Config =
            serde_json::from_str(text).map_err(|e| SpendError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0..=MAX_MONEY).contains(&self.fee) {
            return Err(SpendError::Config(format!("Fee out of range: {}", self.fee)));
        }
        Ok(())
    }
}
