use crate::error::GatewayError;
use crate::keys::{Pubkey, Signature};
use crate::transaction::{Blockhash, Lamports, Transaction};
use async_trait::async_trait;

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Final state of a submitted transaction as seen by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationStatus {
    Confirmed,
    Failed(String),
    Timeout,
}

/// Network access used by the transfer workflow.
///
/// Implementations own their connection; the workflow holds one for the
/// lifetime of a run and never reaches for a global.
#[async_trait]
pub trait RpcGateway: Send + Sync {
    async fn get_balance(&self, address: &Pubkey) -> GatewayResult<Lamports>;

    async fn request_airdrop(&self, address: &Pubkey, lamports: Lamports)
        -> GatewayResult<Signature>;

    async fn get_latest_blockhash(&self) -> GatewayResult<Blockhash>;

    async fn send_transaction(&self, transaction: &Transaction) -> GatewayResult<Signature>;

    /// Waits until the signature is confirmed, fails, or the gateway gives up.
    async fn confirm_transaction(&self, signature: &Signature)
        -> GatewayResult<ConfirmationStatus>;
}
