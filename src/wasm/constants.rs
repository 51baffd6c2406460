//! Well-known Sui identifiers exported via WASM.
//!
//! These let JavaScript code reference framework targets without importing
//! the Sui TypeScript SDK.

use wasm_bindgen::prelude::*;

use crate::coin_type::{self, SUI_FRAMEWORK_ADDRESS, SUI_TYPE_ARG};
use crate::config::NetworkConfig;
use crate::transaction::full_function_name;
use crate::vault::DEFAULT_VAULT_MODULE;

use super::to_js;

/// Native gas coin type (`0x2::sui::SUI`)
#[wasm_bindgen]
pub fn sui_type_arg() -> String {
    SUI_TYPE_ARG.to_string()
}

/// Move call target used to synthesize a zero-value coin
#[wasm_bindgen]
pub fn zero_coin_target() -> String {
    full_function_name(&SUI_FRAMEWORK_ADDRESS, "coin", "zero")
}

/// Module name used when a vault config omits one
#[wasm_bindgen]
pub fn default_vault_module() -> String {
    DEFAULT_VAULT_MODULE.to_string()
}

/// Normalize a struct tag to full-length addresses.
#[wasm_bindgen]
pub fn normalize_struct_tag(type_tag: &str) -> Result<String, JsValue> {
    Ok(coin_type::normalize_struct_tag(type_tag)?)
}

/// Default testnet config, as a plain object
#[wasm_bindgen]
pub fn testnet_config() -> Result<JsValue, JsValue> {
    Ok(to_js(&NetworkConfig::testnet())?)
}
