//! WASM bindings for mint/burn transaction building.

use js_sys::Function;
use wasm_bindgen::prelude::*;

use crate::address::{AddressExt, SuiAddress};
use crate::coin_type::CoinType;
use crate::config::NetworkConfig;
use crate::executor;
use crate::intent::{self, BuildContext, BuildParams};
use crate::transaction::TransactionEnvelope;

use super::coin_source::{JsCoinSource, JsTransactionExecutor, JsVaultResolver};
use super::to_js;

/// Namespace for intent-based building operations.
#[wasm_bindgen]
pub struct IntentNamespace;

struct Prepared {
    sender: SuiAddress,
    config: NetworkConfig,
    coins: JsCoinSource,
    vaults: JsVaultResolver,
}

fn prepare(
    params: JsValue,
    list_coins: Function,
    initialize_vault: Option<Function>,
) -> Result<Prepared, JsValue> {
    let build_params: BuildParams = serde_wasm_bindgen::from_value(params)
        .map_err(|e| JsValue::from_str(&format!("Failed to parse build params: {}", e)))?;
    let sender = SuiAddress::parse_padded(&build_params.sender)?;
    let config = build_params.network_config()?;
    let vaults = JsVaultResolver::new(initialize_vault, config.clone())?;
    Ok(Prepared {
        sender,
        config,
        coins: JsCoinSource::new(list_coins),
        vaults,
    })
}

fn recipient_or(sender: SuiAddress, recipient: Option<String>) -> Result<SuiAddress, JsValue> {
    match recipient {
        Some(address) => Ok(SuiAddress::parse_padded(&address)?),
        None => Ok(sender),
    }
}

#[wasm_bindgen]
impl IntentNamespace {
    /// Build a transaction directly from a mint or burn intent.
    ///
    /// # Arguments
    ///
    /// * `intent` - `{ intentType: 'mint' | 'burn', ... }`
    /// * `params` - `{ sender, config? }`
    /// * `list_coins` - `(owner, coinType) => Promise<CoinObject[]>`
    /// * `initialize_vault` - optional `(coinType) => Promise<VaultDescription | null>`;
    ///   `null` or an absent callback uses the vaults in `params.config`
    ///
    /// # Example
    ///
    /// ```javascript
    /// const result = await IntentNamespace.build_from_intent(
    ///   { intentType: 'mint', depositCoin: 'USDC', targetCoin: 'JUSD', displayAmount: '50' },
    ///   { sender: '0x...', config },
    ///   (owner, coinType) => client.getCoins({ owner, coinType }).then((r) => r.data),
    ///   (coinType) => vaultService.describe(coinType),
    /// );
    /// // result.transaction - envelope for the wallet
    /// // result.quote - 1:1 preview
    /// // result.touchedCoinTypes - balances to refresh
    /// ```
    #[wasm_bindgen]
    pub async fn build_from_intent(
        intent: JsValue,
        params: JsValue,
        list_coins: Function,
        initialize_vault: Option<Function>,
    ) -> Result<JsValue, JsValue> {
        let intent_json: serde_json::Value = serde_wasm_bindgen::from_value(intent)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse intent: {}", e)))?;
        let prepared = prepare(params, list_coins, initialize_vault)?;
        let ctx = BuildContext::new(prepared.sender, &prepared.coins, &prepared.vaults);

        let result = intent::build_from_intent(&intent_json, &ctx, &prepared.config).await?;
        Ok(to_js(&result)?)
    }

    /// Build a mint of `target_coin` against `deposit_amount` base units of `deposit_coin`.
    #[wasm_bindgen]
    pub async fn build_mint(
        params: JsValue,
        deposit_coin: String,
        target_coin: String,
        deposit_amount: u64,
        recipient: Option<String>,
        list_coins: Function,
        initialize_vault: Option<Function>,
    ) -> Result<JsValue, JsValue> {
        let prepared = prepare(params, list_coins, initialize_vault)?;
        let deposit = prepared.config.resolve_coin(&deposit_coin)?;
        let target = prepared.config.resolve_coin(&target_coin)?;
        let recipient = recipient_or(prepared.sender, recipient)?;
        let ctx = BuildContext::new(prepared.sender, &prepared.coins, &prepared.vaults);

        let tx = intent::build_mint(&ctx, &deposit, &target, deposit_amount, &recipient).await?;
        Ok(to_js(&tx)?)
    }

    /// Build a burn of `burn_amount` base units of `target_coin`.
    #[wasm_bindgen]
    pub async fn build_burn(
        params: JsValue,
        target_coin: String,
        burn_amount: u64,
        recipient: Option<String>,
        list_coins: Function,
        initialize_vault: Option<Function>,
    ) -> Result<JsValue, JsValue> {
        let prepared = prepare(params, list_coins, initialize_vault)?;
        let target = prepared.config.resolve_coin(&target_coin)?;
        let recipient = recipient_or(prepared.sender, recipient)?;
        let ctx = BuildContext::new(prepared.sender, &prepared.coins, &prepared.vaults);

        let tx = intent::build_burn(&ctx, &target, burn_amount, &recipient).await?;
        Ok(to_js(&tx)?)
    }

    /// Hand a built envelope to `sign_and_execute` and report what to refresh.
    ///
    /// Resolves to `{ digest, effects, touchedCoinTypes }`.
    #[wasm_bindgen]
    pub async fn submit(
        transaction: JsValue,
        touched_coin_types: Vec<String>,
        sign_and_execute: Function,
    ) -> Result<JsValue, JsValue> {
        let envelope: TransactionEnvelope = serde_wasm_bindgen::from_value(transaction)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse transaction: {}", e)))?;
        let touched = touched_coin_types
            .iter()
            .map(|t| CoinType::parse(t))
            .collect::<Result<Vec<_>, _>>()?;
        let executor = JsTransactionExecutor::new(sign_and_execute);

        let outcome = executor::submit(&executor, envelope, touched).await?;
        Ok(to_js(&outcome)?)
    }
}
