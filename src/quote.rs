//! 1:1 exchange preview shown before the user confirms.
//!
//! The vault calls exchange base units 1:1, so the output carries the same
//! base-unit amount as the input. Each side is displayed with its own
//! coin's decimals.

use serde::Serialize;

use crate::amount::format_units_fixed;
use crate::coin_type::CoinType;
use crate::config::NetworkConfig;
use crate::error::WasmSuiError;
use crate::serde_helpers::u64_string;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    Mint,
    Burn,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinAmount {
    pub symbol: String,
    pub coin_type: CoinType,
    #[serde(with = "u64_string")]
    pub amount: u64,
    pub decimals: u8,
    /// Two-decimal display form
    pub display: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeQuote {
    pub direction: Direction,
    pub input: CoinAmount,
    pub output: CoinAmount,
}

fn coin_amount(
    config: &NetworkConfig,
    coin_type: &CoinType,
    amount: u64,
) -> Result<CoinAmount, WasmSuiError> {
    let decimals = config.decimals(coin_type).ok_or_else(|| {
        WasmSuiError::Config(format!("no decimals configured for {}", coin_type))
    })?;
    Ok(CoinAmount {
        symbol: config.symbol(coin_type),
        coin_type: coin_type.clone(),
        amount,
        decimals,
        display: format_units_fixed(amount, decimals, 2)?,
    })
}

/// Preview exchanging `amount` base units of `input` for `output`.
pub fn quote(
    config: &NetworkConfig,
    direction: Direction,
    input: &CoinType,
    output: &CoinType,
    amount: u64,
) -> Result<ExchangeQuote, WasmSuiError> {
    Ok(ExchangeQuote {
        direction,
        input: coin_amount(config, input, amount)?,
        output: coin_amount(config, output, amount)?,
    })
}
