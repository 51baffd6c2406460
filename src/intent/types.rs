//! Types for intent-based mint/burn building.
//!
//! These mirror the intents sent by the dApp and are deserialized from
//! JavaScript objects or JSON.

use serde::{Deserialize, Serialize};

use crate::coin_type::CoinType;
use crate::config::NetworkConfig;
use crate::error::WasmSuiError;
use crate::quote::ExchangeQuote;
use crate::serde_helpers::deserialize_amount;
use crate::transaction::TransactionEnvelope;

/// Intent type discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum IntentType {
    Mint,
    Burn,
}

/// Build parameters that are not part of the intent.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildParams {
    /// Address that owns the input coins and signs the transaction
    pub sender: String,
    /// Defaults to testnet
    #[serde(default)]
    pub config: Option<NetworkConfig>,
}

impl BuildParams {
    /// Validated network config, falling back to testnet.
    pub fn network_config(&self) -> Result<NetworkConfig, WasmSuiError> {
        match &self.config {
            Some(config) => {
                config.validate()?;
                Ok(config.clone())
            }
            None => Ok(NetworkConfig::testnet()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmountWrapper {
    /// Amount in base units - accepts bigint from JS (deserialized as u64)
    #[serde(deserialize_with = "deserialize_amount")]
    pub value: u64,
    #[serde(default)]
    pub symbol: Option<String>,
}

/// Mint intent: deposit a stable coin, receive the derived coin.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintIntent {
    pub intent_type: IntentType,
    /// Deposited coin (symbol or type tag)
    pub deposit_coin: String,
    /// Derived coin to mint (symbol or type tag)
    pub target_coin: String,
    /// Amount in base units
    #[serde(default)]
    pub amount: Option<AmountWrapper>,
    /// Amount as a decimal string, scaled by the deposit coin's decimals
    #[serde(default)]
    pub display_amount: Option<String>,
    /// Defaults to the sender
    #[serde(default)]
    pub recipient: Option<String>,
}

/// Burn intent: destroy the derived coin, receive its underlying asset.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BurnIntent {
    pub intent_type: IntentType,
    /// Derived coin to burn (symbol or type tag)
    pub target_coin: String,
    #[serde(default)]
    pub amount: Option<AmountWrapper>,
    #[serde(default)]
    pub display_amount: Option<String>,
    #[serde(default)]
    pub recipient: Option<String>,
}

/// Result from building a transaction from an intent.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentBuildResult {
    /// The built envelope, ready for the signer
    pub transaction: TransactionEnvelope,
    /// 1:1 preview, when decimals for both coins are configured
    pub quote: Option<ExchangeQuote>,
    /// Balances to refresh once the transaction executes
    pub touched_coin_types: Vec<CoinType>,
}
