mod coin_source;
mod constants;
mod intent;
mod units;

pub use coin_source::{JsCoinSource, JsTransactionExecutor, JsVaultResolver};
pub use intent::IntentNamespace;

// Re-export exported functions
pub use constants::*;
pub use units::*;

use serde::Serialize;

use crate::error::WasmSuiError;

/// Serialize to a plain JS value (objects, not `Map`s; u64 as strings).
pub(crate) fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<wasm_bindgen::JsValue, WasmSuiError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| WasmSuiError::InvalidInput(format!("Failed to serialize: {}", e)))
}
