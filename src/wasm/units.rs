//! Amount conversion and display helpers exported via WASM.

use wasm_bindgen::prelude::*;

use crate::amount;
use crate::executor;

/// Parse a decimal string into base units (as a BigInt).
#[wasm_bindgen]
pub fn parse_units(value: &str, decimals: u8) -> Result<u64, JsValue> {
    Ok(amount::parse_units(value, decimals)?)
}

/// Format base units as a decimal string, trailing zeros trimmed.
#[wasm_bindgen]
pub fn format_units(value: u64, decimals: u8) -> Result<String, JsValue> {
    Ok(amount::format_units(value, decimals)?)
}

/// Format base units rounded to `places` fractional digits.
#[wasm_bindgen]
pub fn format_units_fixed(value: u64, decimals: u8, places: u8) -> Result<String, JsValue> {
    Ok(amount::format_units_fixed(value, decimals, places)?)
}

/// Throws unless `0 < amount <= balance`.
#[wasm_bindgen]
pub fn check_amount(amount: u64, balance: u64) -> Result<(), JsValue> {
    Ok(amount::check_amount(amount, balance)?)
}

#[wasm_bindgen]
pub fn transaction_url(explorer_url: &str, digest: &str) -> String {
    executor::transaction_url(explorer_url, digest)
}
