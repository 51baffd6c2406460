//! Intent-based mint/burn transaction building.
//!
//! # Usage from TypeScript
//!
//! ```typescript
//! const result = await IntentNamespace.build_from_intent(intent, { sender, config, listCoins });
//! // result.transaction - the envelope to hand to the wallet
//! // result.touchedCoinTypes - balances to refresh after execution
//! ```

mod build;
mod types;

pub use build::{build_burn, build_from_intent, build_mint, BuildContext};
pub use types::*;
