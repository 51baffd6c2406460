//! Error types for wasm-sui

use thiserror::Error;
use wasm_bindgen::prelude::*;

/// Main error type for wasm-sui operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WasmSuiError {
    /// Malformed Sui address or object id
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
    /// Malformed or unsupported Move type tag
    #[error("Invalid coin type: {0}")]
    InvalidCoinType(String),
    /// Malformed amount or amount outside the allowed range
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    /// Invalid caller input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// The owner does not hold enough of the coin
    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: u64, available: u64 },
    /// No vault is registered for the coin type
    #[error("Unregistered asset: {0}")]
    UnregisteredAsset(String),
    /// The coin-listing collaborator failed
    #[error("Transport failure: {0}")]
    Transport(String),
    /// Signing, broadcast or on-chain execution failed
    #[error("Execution failure: {0}")]
    Execution(String),
    /// Invalid network configuration
    #[error("Invalid config: {0}")]
    Config(String),
    /// Generic string error
    #[error("{0}")]
    StringError(String),
}

impl From<&str> for WasmSuiError {
    fn from(s: &str) -> Self {
        WasmSuiError::StringError(s.to_string())
    }
}

impl From<String> for WasmSuiError {
    fn from(s: String) -> Self {
        WasmSuiError::StringError(s)
    }
}

impl From<serde_json::Error> for WasmSuiError {
    fn from(err: serde_json::Error) -> Self {
        WasmSuiError::InvalidInput(err.to_string())
    }
}

// REQUIRED: Converts to JS Error with stack trace
impl From<WasmSuiError> for JsValue {
    fn from(err: WasmSuiError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}
