//! JSON-RPC client for a Solana-compatible cluster.

use crate::config::NetworkConfig;
use crate::error::GatewayError;
use crate::gateway::{ConfirmationStatus, GatewayResult, RpcGateway};
use crate::keys::{Pubkey, Signature};
use crate::transaction::{Blockhash, Lamports, Transaction};
use crate::transaction_monitor::{Commitment, SignatureState, TransactionMonitor};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// HTTP status and JSON-RPC error code used by the faucet to signal throttling.
const RATE_LIMIT_CODE: i64 = 429;

#[derive(Debug, Deserialize)]
struct JsonRpcResponse<T> {
    result: Option<T>,
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct WithContext<T> {
    value: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LatestBlockhash {
    blockhash: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignatureStatus {
    err: Option<Value>,
    confirmation_status: Option<String>,
}

pub struct SolanaRpcClient {
    http: reqwest::Client,
    url: Url,
    commitment: String,
    monitor: TransactionMonitor,
    next_id: AtomicU64,
}

impl SolanaRpcClient {
    pub fn new(config: &NetworkConfig) -> anyhow::Result<Self> {
        let url = Url::parse(&config.network.rpc_url)
            .map_err(|e| anyhow::anyhow!("Invalid RPC URL {}: {}", config.network.rpc_url, e))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.monitoring.request_timeout_seconds))
            .build()?;

        info!("🔗 Connected to {}: {}", config.network.cluster, url);

        Ok(Self {
            http,
            url,
            commitment: config.network.commitment.clone(),
            monitor: TransactionMonitor::new(
                Duration::from_secs(config.monitoring.confirmation_timeout_seconds),
                Duration::from_millis(config.monitoring.poll_interval_ms),
                Commitment::from_name(&config.network.commitment),
            ),
            next_id: AtomicU64::new(1),
        })
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> GatewayResult<T> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        debug!("➡️  {} (id {})", method, id);

        let response = self
            .http
            .post(self.url.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        if status.as_u16() == RATE_LIMIT_CODE as u16 {
            let text = response.text().await.unwrap_or_default();
            return Err(GatewayError::RateLimited(format!("{}: {}", method, text.trim())));
        }
        if !status.is_success() {
            return Err(GatewayError::Transport(format!("{} returned HTTP {}", method, status)));
        }

        let parsed: JsonRpcResponse<T> = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(format!("{}: {}", method, e)))?;

        if let Some(error) = parsed.error {
            return Err(classify_rpc_error(error.code, error.message));
        }
        parsed
            .result
            .ok_or_else(|| GatewayError::InvalidResponse(format!("{}: missing result", method)))
    }

    pub async fn get_signature_state(
        &self,
        signature: &Signature,
    ) -> GatewayResult<Option<SignatureState>> {
        let statuses: WithContext<Vec<Option<SignatureStatus>>> = self
            .call(
                "getSignatureStatuses",
                json!([[signature.to_string()], { "searchTransactionHistory": false }]),
            )
            .await?;

        Ok(statuses
            .value
            .into_iter()
            .next()
            .flatten()
            .map(signature_state))
    }
}

#[async_trait]
impl RpcGateway for SolanaRpcClient {
    async fn get_balance(&self, address: &Pubkey) -> GatewayResult<Lamports> {
        let balance: WithContext<Lamports> = self
            .call(
                "getBalance",
                json!([address.to_string(), { "commitment": self.commitment }]),
            )
            .await?;
        Ok(balance.value)
    }

    async fn request_airdrop(
        &self,
        address: &Pubkey,
        lamports: Lamports,
    ) -> GatewayResult<Signature> {
        let signature: String = self
            .call(
                "requestAirdrop",
                json!([address.to_string(), lamports, { "commitment": self.commitment }]),
            )
            .await?;
        parse_signature(&signature)
    }

    async fn get_latest_blockhash(&self) -> GatewayResult<Blockhash> {
        let latest: WithContext<LatestBlockhash> = self
            .call(
                "getLatestBlockhash",
                json!([{ "commitment": self.commitment }]),
            )
            .await?;
        latest
            .value
            .blockhash
            .parse()
            .map_err(|e| GatewayError::InvalidResponse(format!("blockhash: {}", e)))
    }

    async fn send_transaction(&self, transaction: &Transaction) -> GatewayResult<Signature> {
        let encoded = transaction
            .to_base58()
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;
        let signature: String = self
            .call(
                "sendTransaction",
                json!([encoded, {
                    "encoding": "base58",
                    "preflightCommitment": self.commitment,
                }]),
            )
            .await?;
        parse_signature(&signature)
    }

    async fn confirm_transaction(
        &self,
        signature: &Signature,
    ) -> GatewayResult<ConfirmationStatus> {
        self.monitor
            .monitor_transaction(signature, || self.get_signature_state(signature))
            .await
    }
}

fn parse_signature(raw: &str) -> GatewayResult<Signature> {
    raw.parse()
        .map_err(|e| GatewayError::InvalidResponse(format!("signature {}: {}", raw, e)))
}

fn signature_state(status: SignatureStatus) -> SignatureState {
    if let Some(err) = status.err {
        return SignatureState::Failed(err.to_string());
    }
    match status.confirmation_status.as_deref() {
        Some("finalized") => SignatureState::Finalized,
        Some("confirmed") => SignatureState::Confirmed,
        _ => SignatureState::Processed,
    }
}

pub(crate) fn classify_rpc_error(code: i64, message: String) -> GatewayError {
    if code == RATE_LIMIT_CODE {
        GatewayError::RateLimited(message)
    } else {
        GatewayError::Rpc { code, message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_code_is_classified() {
        assert!(classify_rpc_error(429, "Too many requests".into()).is_rate_limited());
        assert_eq!(
            classify_rpc_error(-32603, "Internal error".into()),
            GatewayError::Rpc {
                code: -32603,
                message: "Internal error".into()
            }
        );
    }

    #[test]
    fn test_signature_status_mapping() {
        let parse = |raw: &str| -> SignatureState {
            signature_state(serde_json::from_str(raw).unwrap())
        };

        assert_eq!(
            parse(r#"{"slot":1,"confirmations":0,"err":null,"confirmationStatus":"processed"}"#),
            SignatureState::Processed
        );
        assert_eq!(
            parse(r#"{"slot":1,"confirmations":1,"err":null,"confirmationStatus":"confirmed"}"#),
            SignatureState::Confirmed
        );
        assert_eq!(
            parse(r#"{"slot":1,"confirmations":null,"err":null,"confirmationStatus":"finalized"}"#),
            SignatureState::Finalized
        );
        assert!(matches!(
            parse(r#"{"slot":1,"err":{"InstructionError":[0,"Custom"]},"confirmationStatus":"confirmed"}"#),
            SignatureState::Failed(_)
        ));
    }

    #[test]
    fn test_balance_response_shape() {
        let raw = r#"{"jsonrpc":"2.0","result":{"context":{"slot":1},"value":5000},"id":1}"#;
        let parsed: JsonRpcResponse<WithContext<u64>> = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.result.unwrap().value, 5000);
    }

    #[test]
    fn test_rejects_invalid_url() {
        let mut config = NetworkConfig::default();
        config.network.rpc_url = "not a url".to_string();
        assert!(SolanaRpcClient::new(&config).is_err());
    }
}
