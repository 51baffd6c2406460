//! Network configuration: known coins, their decimals and registered vaults.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::coin_type::{CoinType, SUI_TYPE_ARG};
use crate::error::WasmSuiError;
use crate::vault::{Vault, VaultDescriptor};

const TESTNET_USDC: &str =
    "0xdba34672e30cb065b1f93e3ab55318768fd6fef66c15942c9f7cb846e2f900e7::usdc::USDC";
const TESTNET_JUSD: &str =
    "0xce3201eab9a726748eb46dd16fa20005dadcc287d066f845c2f3e163d3bc090c::jusd::JUSD";

/// A fungible asset known to the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinConfig {
    pub symbol: String,
    pub coin_type: String,
    pub decimals: u8,
}

/// Where the vault for a derived coin lives on chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultConfig {
    /// Derived coin (symbol or type tag)
    pub coin: String,
    #[serde(flatten)]
    pub vault: VaultDescriptor,
}

/// Configuration for one Sui network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    pub network: String,
    pub explorer_url: String,
    #[serde(default)]
    pub coins: Vec<CoinConfig>,
    #[serde(default)]
    pub vaults: Vec<VaultConfig>,
}

impl NetworkConfig {
    /// Testnet coins. Vaults must be added before mint/burn can resolve.
    pub fn testnet() -> Self {
        NetworkConfig {
            network: "testnet".to_string(),
            explorer_url: "https://suiscan.xyz/testnet".to_string(),
            coins: vec![
                CoinConfig {
                    symbol: "SUI".to_string(),
                    coin_type: SUI_TYPE_ARG.to_string(),
                    decimals: 9,
                },
                CoinConfig {
                    symbol: "USDC".to_string(),
                    coin_type: TESTNET_USDC.to_string(),
                    decimals: 6,
                },
                CoinConfig {
                    symbol: "JUSD".to_string(),
                    coin_type: TESTNET_JUSD.to_string(),
                    decimals: 9,
                },
            ],
            vaults: Vec::new(),
        }
    }

    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, WasmSuiError> {
        let config: NetworkConfig =
            serde_json::from_str(json).map_err(|e| WasmSuiError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check every type tag parses and no coin is declared twice.
    pub fn validate(&self) -> Result<(), WasmSuiError> {
        let mut symbols = HashSet::new();
        let mut types = HashSet::new();
        for coin in &self.coins {
            let coin_type = CoinType::parse(&coin.coin_type)
                .map_err(|e| WasmSuiError::Config(format!("coin {}: {}", coin.symbol, e)))?;
            if !symbols.insert(coin.symbol.as_str()) {
                return Err(WasmSuiError::Config(format!(
                    "duplicate coin symbol {}",
                    coin.symbol
                )));
            }
            if !types.insert(coin_type) {
                return Err(WasmSuiError::Config(format!(
                    "duplicate coin type {}",
                    coin.coin_type
                )));
            }
        }
        self.vaults().map(|_| ())
    }

    /// Resolve a symbol (`"USDC"`) or a type tag to a coin type.
    pub fn resolve_coin(&self, symbol_or_type: &str) -> Result<CoinType, WasmSuiError> {
        if let Some(coin) = self.coins.iter().find(|c| c.symbol == symbol_or_type) {
            return CoinType::parse(&coin.coin_type);
        }
        CoinType::parse(symbol_or_type)
    }

    pub fn coin(&self, coin_type: &CoinType) -> Option<&CoinConfig> {
        self.coins
            .iter()
            .find(|c| CoinType::parse(&c.coin_type).as_ref() == Ok(coin_type))
    }

    pub fn decimals(&self, coin_type: &CoinType) -> Option<u8> {
        self.coin(coin_type).map(|c| c.decimals)
    }

    /// Display symbol for a coin type, falling back to the struct name.
    pub fn symbol(&self, coin_type: &CoinType) -> String {
        self.coin(coin_type)
            .map(|c| c.symbol.clone())
            .unwrap_or_else(|| coin_type.name().to_string())
    }

    /// Build vault handles for every configured vault.
    pub fn vaults(&self) -> Result<Vec<Vault>, WasmSuiError> {
        self.vaults
            .iter()
            .map(|v| {
                let coin_type = self
                    .resolve_coin(&v.coin)
                    .map_err(|e| WasmSuiError::Config(format!("vault coin: {}", e)))?;
                v.vault.clone().into_vault(coin_type, self)
            })
            .collect()
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        NetworkConfig::testnet()
    }
}
