//! wasm-sui: transaction preparation for minting and burning a vault-backed
//! stable coin on Sui.
//!
//! Given an owner, a coin type and amounts, the crate selects the owner's
//! coins, merges and splits them into exact amounts and appends the vault's
//! `mint`/`burn` move call to a transaction envelope. The envelope is handed
//! whole to a wallet for signing; nothing here talks to the network itself.
//!
//! # Architecture
//!
//! The crate follows a two-layer architecture:
//!
//! 1. **Core** (`coins`, `vault`, `intent`, ...) - plain Rust, with the RPC
//!    client, vault lookup and wallet behind async traits
//! 2. **WASM bindings** (`wasm/`) - thin wrappers that adapt JavaScript
//!    callbacks to those traits
//!
//! # Usage from Rust
//!
//! ```rust,ignore
//! use wasm_sui::{build_mint, BuildContext, NetworkConfig, VaultRegistry};
//!
//! let config = NetworkConfig::from_json(json)?;
//! let vaults = VaultRegistry::from_config(&config)?;
//! let ctx = BuildContext::new(sender, &rpc, &vaults);
//! let usdc = config.resolve_coin("USDC")?;
//! let jusd = config.resolve_coin("JUSD")?;
//! let tx = build_mint(&ctx, &usdc, &jusd, 50_000_000, &sender).await?;
//! ```

pub mod address;
pub mod amount;
pub mod coin_type;
pub mod coins;
pub mod config;
mod error;
pub mod executor;
pub mod intent;
pub mod quote;
mod serde_helpers;
pub mod transaction;
pub mod vault;
pub mod wasm;

#[cfg(test)]
mod test_utils;

// Re-export core types at crate root
pub use address::{AddressExt, DigestExt, ObjectDigest, ObjectId, SuiAddress};
pub use amount::{check_amount, format_units, format_units_fixed, parse_units};
pub use coin_type::{CoinType, StructTag, TypeTag, SUI_TYPE_ARG};
pub use coins::{select_inputs, CoinObject, CoinSource, FundedCoins, FundingSource};
pub use config::NetworkConfig;
pub use error::WasmSuiError;
pub use executor::{submit, transaction_url, ExecutionOutcome, TransactionExecutor};
pub use intent::{build_burn, build_from_intent, build_mint, BuildContext, IntentBuildResult};
pub use quote::{quote, Direction, ExchangeQuote};
pub use transaction::{Argument, Command, Input, InputExt, MoveCall, TransactionEnvelope};
pub use vault::{Vault, VaultDescriptor, VaultRegistry, VaultResolver};

// Re-export WASM types
pub use wasm::{IntentNamespace, JsCoinSource, JsTransactionExecutor, JsVaultResolver};
