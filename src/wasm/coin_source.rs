//! JavaScript callbacks adapted to the collaborator traits.
//!
//! Callbacks may return a plain value or a Promise. A throw or a rejection
//! maps to `Transport` for reads and to `Execution` for submission.

use async_trait::async_trait;
use js_sys::{Function, Promise};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use tracing::debug;

use crate::address::{AddressExt, SuiAddress};
use crate::coin_type::CoinType;
use crate::coins::{CoinObject, CoinSource};
use crate::config::NetworkConfig;
use crate::error::WasmSuiError;
use crate::executor::{ExecutionResponse, TransactionExecutor};
use crate::transaction::TransactionEnvelope;
use crate::vault::{Vault, VaultDescriptor, VaultRegistry, VaultResolver};

use super::to_js;

/// Best-effort message from a thrown JS value.
fn js_message(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

/// Await a callback result that may or may not be a Promise.
async fn settle(returned: JsValue) -> Result<JsValue, JsValue> {
    JsFuture::from(Promise::resolve(&returned)).await
}

/// `listCoins(owner, coinType)` resolving to an array of coin objects.
///
/// The callback is expected to page through the RPC itself and return
/// every coin.
pub struct JsCoinSource {
    list_coins: Function,
}

impl JsCoinSource {
    pub fn new(list_coins: Function) -> Self {
        JsCoinSource { list_coins }
    }
}

#[async_trait(?Send)]
impl CoinSource for JsCoinSource {
    async fn list_coins(
        &self,
        owner: &SuiAddress,
        coin_type: &CoinType,
    ) -> Result<Vec<CoinObject>, WasmSuiError> {
        let returned = self
            .list_coins
            .call2(
                &JsValue::NULL,
                &JsValue::from_str(&owner.to_full_hex()),
                &JsValue::from_str(&coin_type.normalized()),
            )
            .map_err(|e| WasmSuiError::Transport(js_message(&e)))?;
        let listed = settle(returned)
            .await
            .map_err(|e| WasmSuiError::Transport(js_message(&e)))?;
        serde_wasm_bindgen::from_value(listed)
            .map_err(|e| WasmSuiError::Transport(format!("invalid coin listing: {}", e)))
    }
}

/// `signAndExecute(transaction)` resolving to `{ digest, effects }`.
pub struct JsTransactionExecutor {
    sign_and_execute: Function,
}

impl JsTransactionExecutor {
    pub fn new(sign_and_execute: Function) -> Self {
        JsTransactionExecutor { sign_and_execute }
    }
}

#[async_trait(?Send)]
impl TransactionExecutor for JsTransactionExecutor {
    async fn sign_and_execute(
        &self,
        envelope: TransactionEnvelope,
    ) -> Result<ExecutionResponse, WasmSuiError> {
        let tx = to_js(&envelope)?;
        let returned = self
            .sign_and_execute
            .call1(&JsValue::NULL, &tx)
            .map_err(|e| WasmSuiError::Execution(js_message(&e)))?;
        let response = settle(returned)
            .await
            .map_err(|e| WasmSuiError::Execution(js_message(&e)))?;
        serde_wasm_bindgen::from_value(response)
            .map_err(|e| WasmSuiError::Execution(format!("invalid execution response: {}", e)))
    }
}

/// `initializeVault(coinType)` resolving to a vault description, or to
/// `null`/`undefined` to defer to the configured vaults.
///
/// The description has the shape of a config vault entry without `coin`:
/// `{ packageId, module?, factoryId, factoryInitialSharedVersion, underlying }`.
pub struct JsVaultResolver {
    initialize_vault: Option<Function>,
    config: NetworkConfig,
    fallback: VaultRegistry,
}

impl JsVaultResolver {
    pub fn new(
        initialize_vault: Option<Function>,
        config: NetworkConfig,
    ) -> Result<Self, WasmSuiError> {
        let fallback = VaultRegistry::from_config(&config)?;
        Ok(JsVaultResolver {
            initialize_vault,
            config,
            fallback,
        })
    }

    async fn lookup(&self, coin_type: &CoinType) -> Result<Option<Vault>, WasmSuiError> {
        let Some(callback) = &self.initialize_vault else {
            return Ok(None);
        };
        let returned = callback
            .call1(&JsValue::NULL, &JsValue::from_str(&coin_type.normalized()))
            .map_err(|e| WasmSuiError::Transport(js_message(&e)))?;
        let described = settle(returned)
            .await
            .map_err(|e| WasmSuiError::Transport(js_message(&e)))?;
        if described.is_null() || described.is_undefined() {
            return Ok(None);
        }
        let descriptor: VaultDescriptor = serde_wasm_bindgen::from_value(described)
            .map_err(|e| WasmSuiError::Transport(format!("invalid vault description: {}", e)))?;
        descriptor.into_vault(coin_type.clone(), &self.config).map(Some)
    }
}

#[async_trait(?Send)]
impl VaultResolver for JsVaultResolver {
    async fn initialize(&self, coin_type: &CoinType) -> Result<Vault, WasmSuiError> {
        match self.lookup(coin_type).await? {
            Some(vault) => {
                debug!(%coin_type, package = %vault.package_id, "vault initialized by callback");
                Ok(vault)
            }
            None => self.fallback.initialize(coin_type).await,
        }
    }
}
