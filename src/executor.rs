//! Hand-off of a completed envelope to the signing/execution collaborator.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::coin_type::CoinType;
use crate::error::WasmSuiError;
use crate::transaction::TransactionEnvelope;

/// What the signer/executor reports back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResponse {
    pub digest: String,
    #[serde(default)]
    pub effects: serde_json::Value,
}

/// Signs, broadcasts and executes an envelope (a wallet in production).
#[async_trait(?Send)]
pub trait TransactionExecutor {
    async fn sign_and_execute(
        &self,
        envelope: TransactionEnvelope,
    ) -> Result<ExecutionResponse, WasmSuiError>;
}

/// Result of a submitted user action.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionOutcome {
    pub digest: String,
    pub effects: serde_json::Value,
    /// Balances the caller should re-query
    pub touched_coin_types: Vec<CoinType>,
}

/// Submit `envelope` whole. Every executor failure is reported as `Execution`.
pub async fn submit<E>(
    executor: &E,
    envelope: TransactionEnvelope,
    touched_coin_types: Vec<CoinType>,
) -> Result<ExecutionOutcome, WasmSuiError>
where
    E: TransactionExecutor + ?Sized,
{
    let commands = envelope.commands().len();
    let response = executor.sign_and_execute(envelope).await.map_err(|e| {
        error!(error = %e, "transaction execution failed");
        match e {
            err @ WasmSuiError::Execution(_) => err,
            other => WasmSuiError::Execution(other.to_string()),
        }
    })?;
    info!(digest = %response.digest, commands, "transaction executed");
    Ok(ExecutionOutcome {
        digest: response.digest,
        effects: response.effects,
        touched_coin_types,
    })
}

/// Explorer link for a transaction digest.
pub fn transaction_url(explorer_url: &str, digest: &str) -> String {
    format!("{}/tx/{}", explorer_url.trim_end_matches('/'), digest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{usdc, RecordingExecutor};

    #[tokio::test]
    async fn test_submit_passes_envelope_through() {
        let executor = RecordingExecutor::succeeding("9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin");
        let mut tx = TransactionEnvelope::new();
        tx.add_zero_coin(usdc().to_type_tag()).unwrap();

        let outcome = submit(&executor, tx.clone(), vec![usdc()]).await.unwrap();

        assert_eq!(outcome.digest, "9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin");
        assert_eq!(outcome.touched_coin_types, vec![usdc()]);
        assert_eq!(executor.submitted(), vec![tx]);
    }

    #[tokio::test]
    async fn test_submit_maps_failures_to_execution() {
        let executor = RecordingExecutor::failing(WasmSuiError::Transport("rejected".to_string()));
        let result = submit(&executor, TransactionEnvelope::new(), vec![]).await;
        assert_eq!(
            result,
            Err(WasmSuiError::Execution("Transport failure: rejected".to_string()))
        );
    }

    #[test]
    fn test_transaction_url() {
        assert_eq!(
            transaction_url("https://suiscan.xyz/testnet/", "abc"),
            "https://suiscan.xyz/testnet/tx/abc"
        );
    }
}
