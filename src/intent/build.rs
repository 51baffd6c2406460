//! Mint/burn transaction building.
//!
//! `build_mint` and `build_burn` assemble a complete envelope for one user
//! action. `build_from_intent` dispatches a JSON intent to them, resolving
//! coin symbols and display amounts through the network config.

use tracing::info;

use crate::address::{AddressExt, SuiAddress};
use crate::amount::parse_units;
use crate::coin_type::CoinType;
use crate::coins::{select_inputs, CoinSource};
use crate::config::NetworkConfig;
use crate::error::WasmSuiError;
use crate::quote::{quote, Direction, ExchangeQuote};
use crate::transaction::TransactionEnvelope;
use crate::vault::{Vault, VaultResolver};

use super::types::*;

/// Collaborators and signer for one build.
pub struct BuildContext<'a, S: ?Sized, V: ?Sized> {
    /// Owner of the input coins; also the transaction sender
    pub sender: SuiAddress,
    pub coins: &'a S,
    pub vaults: &'a V,
}

impl<'a, S: ?Sized, V: ?Sized> BuildContext<'a, S, V> {
    pub fn new(sender: SuiAddress, coins: &'a S, vaults: &'a V) -> Self {
        BuildContext {
            sender,
            coins,
            vaults,
        }
    }
}

/// Deposit `deposit_amount` of `deposit_coin_type` and mint `target_coin_type`
/// to `recipient`.
pub async fn build_mint<S, V>(
    ctx: &BuildContext<'_, S, V>,
    deposit_coin_type: &CoinType,
    target_coin_type: &CoinType,
    deposit_amount: u64,
    recipient: &SuiAddress,
) -> Result<TransactionEnvelope, WasmSuiError>
where
    S: CoinSource + ?Sized,
    V: VaultResolver + ?Sized,
{
    let vault = ctx.vaults.initialize(target_coin_type).await?;
    mint_with_vault(ctx, &vault, deposit_coin_type, deposit_amount, recipient).await
}

/// Burn `burn_amount` of `target_coin_type` and send the redeemed underlying
/// asset to `recipient`.
pub async fn build_burn<S, V>(
    ctx: &BuildContext<'_, S, V>,
    target_coin_type: &CoinType,
    burn_amount: u64,
    recipient: &SuiAddress,
) -> Result<TransactionEnvelope, WasmSuiError>
where
    S: CoinSource + ?Sized,
    V: VaultResolver + ?Sized,
{
    let vault = ctx.vaults.initialize(target_coin_type).await?;
    burn_with_vault(ctx, &vault, burn_amount, recipient).await
}

async fn mint_with_vault<S, V>(
    ctx: &BuildContext<'_, S, V>,
    vault: &Vault,
    deposit_coin_type: &CoinType,
    deposit_amount: u64,
    recipient: &SuiAddress,
) -> Result<TransactionEnvelope, WasmSuiError>
where
    S: CoinSource + ?Sized,
    V: ?Sized,
{
    if *deposit_coin_type == vault.coin_type {
        return Err(WasmSuiError::InvalidInput(format!(
            "cannot mint {} by depositing itself",
            vault.coin_type
        )));
    }

    let mut tx = TransactionEnvelope::with_sender(ctx.sender);
    let funded = select_inputs(
        &mut tx,
        ctx.coins,
        &ctx.sender,
        deposit_coin_type,
        &[deposit_amount],
    )
    .await?;
    let minted = vault.mint_call(&mut tx, deposit_coin_type, funded.coin())?;
    tx.add_transfer(vec![minted], recipient)?;

    info!(
        deposit = %deposit_coin_type,
        target = %vault.coin_type,
        amount = deposit_amount,
        zero_coin = funded.is_zero(),
        commands = tx.commands().len(),
        "built mint transaction"
    );
    Ok(tx)
}

async fn burn_with_vault<S, V>(
    ctx: &BuildContext<'_, S, V>,
    vault: &Vault,
    burn_amount: u64,
    recipient: &SuiAddress,
) -> Result<TransactionEnvelope, WasmSuiError>
where
    S: CoinSource + ?Sized,
    V: ?Sized,
{
    let mut tx = TransactionEnvelope::with_sender(ctx.sender);
    let funded = select_inputs(
        &mut tx,
        ctx.coins,
        &ctx.sender,
        &vault.coin_type,
        &[burn_amount],
    )
    .await?;
    let redeemed = vault.burn_call(&mut tx, funded.coin(), &vault.underlying)?;
    tx.add_transfer(vec![redeemed], recipient)?;

    info!(
        target = %vault.coin_type,
        underlying = %vault.underlying,
        amount = burn_amount,
        zero_coin = funded.is_zero(),
        commands = tx.commands().len(),
        "built burn transaction"
    );
    Ok(tx)
}

/// Build a transaction from a mint or burn intent.
///
/// # Arguments
/// * `intent_json` - The full intent as JSON (serde_json::Value)
/// * `ctx` - Sender and collaborators
/// * `config` - Resolves coin symbols and decimals
pub async fn build_from_intent<S, V>(
    intent_json: &serde_json::Value,
    ctx: &BuildContext<'_, S, V>,
    config: &NetworkConfig,
) -> Result<IntentBuildResult, WasmSuiError>
where
    S: CoinSource + ?Sized,
    V: VaultResolver + ?Sized,
{
    let intent_type = intent_json
        .get("intentType")
        .and_then(|v| v.as_str())
        .ok_or_else(|| WasmSuiError::InvalidInput("Missing intentType in intent".to_string()))?;

    match intent_type {
        "mint" => build_mint_intent(intent_json, ctx, config).await,
        "burn" => build_burn_intent(intent_json, ctx, config).await,
        _ => Err(WasmSuiError::InvalidInput(format!(
            "Unsupported intent type: {}",
            intent_type
        ))),
    }
}

async fn build_mint_intent<S, V>(
    intent_json: &serde_json::Value,
    ctx: &BuildContext<'_, S, V>,
    config: &NetworkConfig,
) -> Result<IntentBuildResult, WasmSuiError>
where
    S: CoinSource + ?Sized,
    V: VaultResolver + ?Sized,
{
    let intent: MintIntent = serde_json::from_value(intent_json.clone())?;

    let deposit = config.resolve_coin(&intent.deposit_coin)?;
    let target = config.resolve_coin(&intent.target_coin)?;
    let amount = resolve_amount(config, &deposit, intent.amount, intent.display_amount)?;
    let recipient = resolve_recipient(ctx, intent.recipient.as_deref())?;

    let vault = ctx.vaults.initialize(&target).await?;
    let transaction = mint_with_vault(ctx, &vault, &deposit, amount, &recipient).await?;

    Ok(IntentBuildResult {
        transaction,
        quote: preview(config, Direction::Mint, &deposit, &target, amount)?,
        touched_coin_types: vec![deposit, target],
    })
}

async fn build_burn_intent<S, V>(
    intent_json: &serde_json::Value,
    ctx: &BuildContext<'_, S, V>,
    config: &NetworkConfig,
) -> Result<IntentBuildResult, WasmSuiError>
where
    S: CoinSource + ?Sized,
    V: VaultResolver + ?Sized,
{
    let intent: BurnIntent = serde_json::from_value(intent_json.clone())?;

    let target = config.resolve_coin(&intent.target_coin)?;
    let amount = resolve_amount(config, &target, intent.amount, intent.display_amount)?;
    let recipient = resolve_recipient(ctx, intent.recipient.as_deref())?;

    let vault = ctx.vaults.initialize(&target).await?;
    let transaction = burn_with_vault(ctx, &vault, amount, &recipient).await?;
    let underlying = vault.underlying;

    Ok(IntentBuildResult {
        transaction,
        quote: preview(config, Direction::Burn, &target, &underlying, amount)?,
        touched_coin_types: vec![target, underlying],
    })
}

/// Exactly one of `amount` (base units) or `displayAmount` must be given.
fn resolve_amount(
    config: &NetworkConfig,
    coin_type: &CoinType,
    amount: Option<AmountWrapper>,
    display_amount: Option<String>,
) -> Result<u64, WasmSuiError> {
    match (amount, display_amount) {
        (Some(amount), None) => Ok(amount.value),
        (None, Some(display)) => {
            let decimals = config.decimals(coin_type).ok_or_else(|| {
                WasmSuiError::Config(format!("no decimals configured for {}", coin_type))
            })?;
            parse_units(&display, decimals)
        }
        (Some(_), Some(_)) => Err(WasmSuiError::InvalidInput(
            "intent has both amount and displayAmount".to_string(),
        )),
        (None, None) => Err(WasmSuiError::InvalidInput(
            "intent has no amount".to_string(),
        )),
    }
}

fn resolve_recipient<S: ?Sized, V: ?Sized>(
    ctx: &BuildContext<'_, S, V>,
    recipient: Option<&str>,
) -> Result<SuiAddress, WasmSuiError> {
    match recipient {
        Some(address) => SuiAddress::parse_padded(address),
        None => Ok(ctx.sender),
    }
}

/// A quote when both coins have configured decimals.
fn preview(
    config: &NetworkConfig,
    direction: Direction,
    input: &CoinType,
    output: &CoinType,
    amount: u64,
) -> Result<Option<ExchangeQuote>, WasmSuiError> {
    if config.decimals(input).is_none() || config.decimals(output).is_none() {
        return Ok(None);
    }
    quote(config, direction, input, output, amount).map(Some)
}
