//! Coin selection: funding a transaction with exact coin amounts.
//!
//! `select_inputs` decides how to produce coins of the requested amounts
//! from what the owner holds, using an explicit decision table:
//!
//! | all amounts zero | native gas type | owned coins | funding                         |
//! |------------------|-----------------|-------------|---------------------------------|
//! | yes              | -               | not queried | `0x2::coin::zero<T>()`          |
//! | no               | yes             | not queried | split from the gas coin         |
//! | no               | no              | 0           | `0x2::coin::zero<T>()`          |
//! | no               | no              | 1           | split from that coin            |
//! | no               | no              | N > 1       | merge N-1 into the first, split |
//!
//! Balance sufficiency is never checked here; an underfunded split or a
//! zero coin fails at execution, which is where the ledger decides.

use std::collections::HashSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::address::{AddressExt, ObjectDigest, ObjectId, SuiAddress};
use crate::coin_type::CoinType;
use crate::error::WasmSuiError;
use crate::serde_helpers::{address_hex, digest_base58, u64_string};
use crate::transaction::{Argument, ObjectReference, TransactionEnvelope};

/// A coin object owned by an address, as returned by a coin listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinObject {
    #[serde(alias = "coinObjectId", with = "address_hex")]
    pub object_id: ObjectId,
    #[serde(with = "u64_string")]
    pub version: u64,
    #[serde(with = "digest_base58")]
    pub digest: ObjectDigest,
    #[serde(with = "u64_string")]
    pub balance: u64,
    /// Type of the coin, when the listing reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coin_type: Option<CoinType>,
}

impl CoinObject {
    pub fn object_ref(&self) -> ObjectReference {
        ObjectReference::new(
            self.object_id.to_object_id(),
            self.version,
            self.digest.clone(),
        )
    }
}

/// Source of an owner's coin objects (an RPC client in production).
#[async_trait(?Send)]
pub trait CoinSource {
    /// List every coin of `coin_type` owned by `owner`.
    async fn list_coins(
        &self,
        owner: &SuiAddress,
        coin_type: &CoinType,
    ) -> Result<Vec<CoinObject>, WasmSuiError>;

    /// Total balance of `coin_type` held by `owner`.
    async fn get_balance(
        &self,
        owner: &SuiAddress,
        coin_type: &CoinType,
    ) -> Result<u64, WasmSuiError> {
        let coins = self.list_coins(owner, coin_type).await?;
        coins.iter().try_fold(0u64, |total, coin| {
            total.checked_add(coin.balance).ok_or_else(|| {
                WasmSuiError::InvalidAmount(format!("balance of {} overflows u64", coin_type))
            })
        })
    }
}

/// Why a zero-value coin was synthesized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZeroCoinReason {
    /// Every requested amount was zero
    ZeroAmount,
    /// The owner holds no coins of the type; the build degrades rather than fails
    NoCoins,
}

/// First stage of the decision table: where funding comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FundingSource {
    ZeroCoin(ZeroCoinReason),
    GasCoin,
    OwnedCoins,
}

impl FundingSource {
    /// Decide without touching the network.
    pub fn decide(coin_type: &CoinType, amounts: &[u64]) -> FundingSource {
        if amounts.iter().all(|amount| *amount == 0) {
            FundingSource::ZeroCoin(ZeroCoinReason::ZeroAmount)
        } else if coin_type.is_sui() {
            FundingSource::GasCoin
        } else {
            FundingSource::OwnedCoins
        }
    }
}

/// Second stage: what to do with the listed coins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnedFunding {
    Empty,
    Single,
    /// Merge `sources` coins into the first one
    Merge { sources: usize },
}

impl OwnedFunding {
    pub fn from_count(count: usize) -> OwnedFunding {
        match count {
            0 => OwnedFunding::Empty,
            1 => OwnedFunding::Single,
            n => OwnedFunding::Merge { sources: n - 1 },
        }
    }
}

/// Coins produced for the transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FundedCoins {
    /// One coin per requested amount, or a single zero coin
    pub coins: Vec<Argument>,
    pub source: FundingSource,
}

impl FundedCoins {
    /// The first funded coin; the common case of a single amount.
    pub fn coin(&self) -> Argument {
        self.coins[0]
    }

    pub fn is_zero(&self) -> bool {
        matches!(self.source, FundingSource::ZeroCoin(_))
    }
}

/// Produce coins of exactly `amounts` of `coin_type` for `owner` inside `envelope`.
///
/// The coin listing (the only suspension point) runs before anything is
/// appended, so a transport failure leaves the envelope untouched.
pub async fn select_inputs<S>(
    envelope: &mut TransactionEnvelope,
    source: &S,
    owner: &SuiAddress,
    coin_type: &CoinType,
    amounts: &[u64],
) -> Result<FundedCoins, WasmSuiError>
where
    S: CoinSource + ?Sized,
{
    if amounts.is_empty() {
        return Err(WasmSuiError::InvalidInput(
            "at least one amount is required".to_string(),
        ));
    }

    let decision = FundingSource::decide(coin_type, amounts);
    debug!(%coin_type, ?amounts, ?decision, "selecting input coins");

    match decision {
        FundingSource::ZeroCoin(reason) => zero_coin(envelope, coin_type, reason),
        FundingSource::GasCoin => {
            let coins = envelope.add_split(Argument::Gas, amounts)?;
            Ok(FundedCoins {
                coins,
                source: FundingSource::GasCoin,
            })
        }
        FundingSource::OwnedCoins => {
            let owned = source.list_coins(owner, coin_type).await?;
            check_listing(&owned, coin_type)?;
            fund_from_owned(envelope, owner, coin_type, amounts, &owned)
        }
    }
}

fn zero_coin(
    envelope: &mut TransactionEnvelope,
    coin_type: &CoinType,
    reason: ZeroCoinReason,
) -> Result<FundedCoins, WasmSuiError> {
    let coin = envelope.add_zero_coin(coin_type.to_type_tag())?;
    Ok(FundedCoins {
        coins: vec![coin],
        source: FundingSource::ZeroCoin(reason),
    })
}

/// Reject listings that repeat an object or report a different coin type.
fn check_listing(coins: &[CoinObject], expected: &CoinType) -> Result<(), WasmSuiError> {
    let mut seen = HashSet::with_capacity(coins.len());
    for coin in coins {
        if !seen.insert(coin.object_id) {
            return Err(WasmSuiError::InvalidInput(format!(
                "coin {} listed more than once",
                coin.object_id
            )));
        }
        if let Some(actual) = &coin.coin_type {
            if actual != expected {
                return Err(WasmSuiError::InvalidInput(format!(
                    "coin {} has type {}, expected {}",
                    coin.object_id, actual, expected
                )));
            }
        }
    }
    Ok(())
}

fn fund_from_owned(
    envelope: &mut TransactionEnvelope,
    owner: &SuiAddress,
    coin_type: &CoinType,
    amounts: &[u64],
    owned: &[CoinObject],
) -> Result<FundedCoins, WasmSuiError> {
    let plan = OwnedFunding::from_count(owned.len());
    debug!(%owner, %coin_type, coins = owned.len(), ?plan, "funding from owned coins");

    let primary = match (plan, owned.first()) {
        (OwnedFunding::Empty, _) | (_, None) => {
            warn!(%owner, %coin_type, "no coins to fund the request, using a zero coin");
            return zero_coin(envelope, coin_type, ZeroCoinReason::NoCoins);
        }
        (_, Some(first)) => envelope.object(first.object_ref())?,
    };

    if let OwnedFunding::Merge { .. } = plan {
        let sources = owned[1..]
            .iter()
            .map(|coin| envelope.object(coin.object_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        envelope.add_merge(primary, sources)?;
    }

    let coins = envelope.add_split(primary, amounts)?;
    Ok(FundedCoins {
        coins,
        source: FundingSource::OwnedCoins,
    })
}
