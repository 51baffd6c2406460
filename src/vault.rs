//! Vault/factory handles for the derived stable coin.
//!
//! A vault is bound to one derived coin type. It mints that coin against a
//! deposited stable coin and burns it back into its underlying asset. Any
//! exchange-rate logic lives in the Move contract; the handle only builds
//! the calls.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::address::{AddressExt, ObjectId, SuiAddress};
use crate::coin_type::CoinType;
use crate::config::NetworkConfig;
use crate::error::WasmSuiError;
use crate::serde_helpers::u64_string;
use crate::transaction::{move_call, Argument, SharedObjectRef, TransactionEnvelope};

/// Default Move module exposing `mint` and `burn`
pub const DEFAULT_VAULT_MODULE: &str = "vault";

fn default_module() -> String {
    DEFAULT_VAULT_MODULE.to_string()
}

/// Where a vault lives on chain, as written in config or returned by a lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultDescriptor {
    pub package_id: String,
    #[serde(default = "default_module")]
    pub module: String,
    pub factory_id: String,
    #[serde(with = "u64_string")]
    pub factory_initial_shared_version: u64,
    /// Asset redeemed on burn (symbol or type tag)
    pub underlying: String,
}

impl VaultDescriptor {
    /// Bind the descriptor to `coin_type`, resolving symbols through `config`.
    pub fn into_vault(
        self,
        coin_type: CoinType,
        config: &NetworkConfig,
    ) -> Result<Vault, WasmSuiError> {
        let package_id = SuiAddress::parse_padded(&self.package_id)
            .map_err(|e| WasmSuiError::Config(format!("vault packageId: {}", e)))?;
        let factory_id = SuiAddress::parse_padded(&self.factory_id)
            .map_err(|e| WasmSuiError::Config(format!("vault factoryId: {}", e)))?;
        let underlying = config
            .resolve_coin(&self.underlying)
            .map_err(|e| WasmSuiError::Config(format!("vault underlying: {}", e)))?;
        if coin_type == underlying {
            return Err(WasmSuiError::Config(format!(
                "vault for {} redeems into itself",
                coin_type
            )));
        }
        Ok(Vault {
            package_id,
            module: self.module,
            factory: SharedObjectRef {
                object_id: factory_id,
                initial_shared_version: self.factory_initial_shared_version,
                mutable: true,
            },
            coin_type,
            underlying,
        })
    }
}

/// An initialized vault bound to a derived coin type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vault {
    /// Package publishing the vault module
    pub package_id: ObjectId,
    pub module: String,
    /// Shared factory object passed to every call
    pub factory: SharedObjectRef,
    /// The derived coin minted and burned by this vault
    pub coin_type: CoinType,
    /// The stable asset redeemed on burn
    pub underlying: CoinType,
}

impl Vault {
    fn factory_arg(&self, envelope: &mut TransactionEnvelope) -> Result<Argument, WasmSuiError> {
        envelope.shared_object(self.factory)
    }

    /// `vault::mint<Deposit, Derived>(factory, coin)`; returns the minted coin.
    pub fn mint_call(
        &self,
        envelope: &mut TransactionEnvelope,
        deposit_type: &CoinType,
        deposit_coin: Argument,
    ) -> Result<Argument, WasmSuiError> {
        let factory = self.factory_arg(envelope)?;
        let call = move_call(
            &self.package_id,
            &self.module,
            "mint",
            vec![deposit_type.to_type_tag(), self.coin_type.to_type_tag()],
            vec![factory, deposit_coin],
        )?;
        envelope.add_move_call(call)
    }

    /// `vault::burn<Derived, Underlying>(factory, coin)`; returns the redemption coin.
    pub fn burn_call(
        &self,
        envelope: &mut TransactionEnvelope,
        burned_coin: Argument,
        underlying_type: &CoinType,
    ) -> Result<Argument, WasmSuiError> {
        let factory = self.factory_arg(envelope)?;
        let call = move_call(
            &self.package_id,
            &self.module,
            "burn",
            vec![self.coin_type.to_type_tag(), underlying_type.to_type_tag()],
            vec![factory, burned_coin],
        )?;
        envelope.add_move_call(call)
    }
}

/// Resolves the vault bound to a derived coin type.
#[async_trait(?Send)]
pub trait VaultResolver {
    /// Fails with `UnregisteredAsset` when no vault exists for `coin_type`.
    async fn initialize(&self, coin_type: &CoinType) -> Result<Vault, WasmSuiError>;
}

/// In-memory vault registry, usually built from a `NetworkConfig`.
#[derive(Debug, Clone, Default)]
pub struct VaultRegistry {
    vaults: HashMap<CoinType, Vault>,
}

impl VaultRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &NetworkConfig) -> Result<Self, WasmSuiError> {
        let mut registry = VaultRegistry::new();
        for vault in config.vaults()? {
            registry.register(vault)?;
        }
        Ok(registry)
    }

    pub fn register(&mut self, vault: Vault) -> Result<(), WasmSuiError> {
        if self.vaults.contains_key(&vault.coin_type) {
            return Err(WasmSuiError::Config(format!(
                "vault for {} registered twice",
                vault.coin_type
            )));
        }
        self.vaults.insert(vault.coin_type.clone(), vault);
        Ok(())
    }

    pub fn get(&self, coin_type: &CoinType) -> Option<&Vault> {
        self.vaults.get(coin_type)
    }

    pub fn len(&self) -> usize {
        self.vaults.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vaults.is_empty()
    }
}

#[async_trait(?Send)]
impl VaultResolver for VaultRegistry {
    async fn initialize(&self, coin_type: &CoinType) -> Result<Vault, WasmSuiError> {
        let vault = self
            .get(coin_type)
            .cloned()
            .ok_or_else(|| WasmSuiError::UnregisteredAsset(coin_type.normalized()))?;
        debug!(%coin_type, package = %vault.package_id, "vault initialized");
        Ok(vault)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{jusd, jusd_vault, usdc};
    use crate::transaction::InputExt;

    #[test]
    fn test_mint_call_shape() {
        let vault = jusd_vault();
        let mut tx = TransactionEnvelope::new();
        let coin = tx.add_split(Argument::Gas, &[1]).unwrap()[0];

        let minted = vault.mint_call(&mut tx, &usdc(), coin).unwrap();

        assert_eq!(minted, Argument::Result(1));
        let call = tx.move_calls().next().unwrap();
        assert_eq!(call.function.as_str(), "mint");
        assert_eq!(call.module.as_str(), DEFAULT_VAULT_MODULE);
        assert_eq!(SuiAddress::from_object_id(&call.package), vault.package_id);
        assert_eq!(
            call.type_arguments,
            vec![usdc().to_type_tag(), jusd().to_type_tag()]
        );
        assert_eq!(call.arguments[1], coin);
        assert_eq!(
            tx.input(call.arguments[0]).and_then(|arg| arg.object_id()),
            Some(vault.factory.object_id)
        );
    }

    #[test]
    fn test_factory_input_is_shared_once() {
        let vault = jusd_vault();
        let mut tx = TransactionEnvelope::new();
        vault.mint_call(&mut tx, &usdc(), Argument::Gas).unwrap();
        vault.burn_call(&mut tx, Argument::Gas, &usdc()).unwrap();
        assert_eq!(tx.inputs().len(), 1);
    }

    #[tokio::test]
    async fn test_registry_resolution() {
        let mut registry = VaultRegistry::new();
        registry.register(jusd_vault()).unwrap();

        let vault = registry.initialize(&jusd()).await.unwrap();
        assert_eq!(vault.underlying, usdc());

        let err = registry.initialize(&usdc()).await.unwrap_err();
        assert!(matches!(err, WasmSuiError::UnregisteredAsset(_)));
        assert!(registry.register(jusd_vault()).is_err());
    }

    #[test]
    fn test_descriptor_into_vault() {
        let config = crate::config::NetworkConfig::testnet();
        let descriptor: VaultDescriptor = serde_json::from_value(serde_json::json!({
            "packageId": "0xce3201eab9a726748eb46dd16fa20005dadcc287d066f845c2f3e163d3bc090c",
            "factoryId": "0x77",
            "factoryInitialSharedVersion": 12,
            "underlying": "USDC"
        }))
        .unwrap();

        let vault = descriptor.clone().into_vault(jusd(), &config).unwrap();
        assert_eq!(vault.module, DEFAULT_VAULT_MODULE);
        assert_eq!(vault.underlying, usdc());
        assert_eq!(vault.factory.object_id.to_short_hex(), "0x77");
        assert!(vault.factory.mutable);

        let err = descriptor.into_vault(usdc(), &config).unwrap_err();
        assert!(matches!(err, WasmSuiError::Config(_)));
    }
}
