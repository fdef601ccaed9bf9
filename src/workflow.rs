//! Transfer workflow: account setup, balance checks, faucet funding, and the
//! build → sign → submit → confirm sequence of a single transfer.

use crate::config::NetworkConfig;
use crate::error::{GatewayError, WorkflowError, WorkflowResult};
use crate::gateway::{ConfirmationStatus, RpcGateway};
use crate::keys::{Keypair, Pubkey, Signature};
use crate::retry::{execute_with_retry, RetryConfig, RetryError};
use crate::transaction::{Blockhash, Lamports, Message, Transaction};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// A public address, optionally paired with the keypair that controls it.
#[derive(Debug, Clone)]
pub struct Account {
    pub pubkey: Pubkey,
    pub keypair: Option<Keypair>,
}

impl Account {
    pub fn from_keypair(keypair: Keypair) -> Self {
        Self {
            pubkey: keypair.pubkey(),
            keypair: Some(keypair),
        }
    }

    pub fn from_address(pubkey: Pubkey) -> Self {
        Self {
            pubkey,
            keypair: None,
        }
    }

    pub fn can_sign(&self) -> bool {
        self.keypair.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferRequest {
    pub sender: Pubkey,
    pub receiver: Pubkey,
    pub amount: Lamports,
}

/// Progress of one transfer. `Aborted` records the stage that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferState {
    Built,
    Signed,
    Submitted,
    Confirmed,
    Aborted(TransferStage),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferStage {
    Build,
    Sign,
    Submit,
    Confirm,
}

#[derive(Debug)]
pub struct PendingTransaction {
    pub request: TransferRequest,
    pub block_reference: Blockhash,
    transaction: Transaction,
    state: TransferState,
}

impl PendingTransaction {
    pub fn signed(&self) -> bool {
        self.transaction.is_signed()
    }

    pub fn state(&self) -> TransferState {
        self.state
    }

    pub fn transaction(&self) -> &Transaction {
        &self.transaction
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionResult {
    pub signature: Signature,
    pub confirmed: bool,
    pub explorer_url: String,
}

/// Outcome of [`TransferWorkflow::transfer`]: the final state plus the
/// submission artifact when the transfer got that far.
#[derive(Debug)]
pub struct TransferOutcome {
    pub state: TransferState,
    pub result: WorkflowResult<SubmissionResult>,
}

pub struct TransferWorkflow {
    gateway: Arc<dyn RpcGateway>,
    config: NetworkConfig,
    retry_config: RetryConfig,
}

impl TransferWorkflow {
    pub fn new(gateway: Arc<dyn RpcGateway>, config: NetworkConfig) -> Self {
        let retry_config = RetryConfig::new(
            config.retry.max_attempts,
            Duration::from_millis(config.retry.base_delay_ms),
            Duration::from_millis(config.retry.max_delay_ms),
            config.retry.backoff_multiplier,
        );
        Self {
            gateway,
            config,
            retry_config,
        }
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    pub fn create_account(&self) -> Account {
        info!("🔑 Generating new account...");
        let account = Account::from_keypair(Keypair::generate());
        info!("   Public key: {}", account.pubkey);
        account
    }

    /// Reads the current balance. A gateway failure is returned as an error so
    /// callers treat the balance as unknown rather than zero.
    pub async fn check_balance(&self, address: &Pubkey) -> WorkflowResult<Lamports> {
        match self.gateway.get_balance(address).await {
            Ok(lamports) => {
                info!("💰 Balance of {}: {} lamports", address, lamports);
                Ok(lamports)
            }
            Err(e) => {
                error!("❌ Error fetching balance for {}: {}", address, e);
                Err(e.into())
            }
        }
    }

    /// Requests a faucet airdrop, backing off on rate limits only.
    pub async fn request_funding(
        &self,
        address: &Pubkey,
        lamports: Lamports,
    ) -> WorkflowResult<Signature> {
        info!("🪂 Airdropping {} lamports to {}...", lamports, address);

        let result = execute_with_retry(
            || self.gateway.request_airdrop(address, lamports),
            &self.retry_config,
            "Airdrop",
            GatewayError::is_rate_limited,
        )
        .await;

        match result {
            Ok(signature) => {
                info!("✅ Airdropped successfully: {}", signature);
                Ok(signature)
            }
            Err(RetryError::Aborted(e)) => {
                error!("❌ Airdrop failed: {}", e);
                Err(WorkflowError::Gateway(e))
            }
            Err(RetryError::Exhausted {
                attempts,
                last_error,
            }) => {
                error!("❌ Airdrop still rate limited after {} attempts", attempts);
                Err(WorkflowError::RetriesExhausted {
                    operation: "airdrop".to_string(),
                    attempts,
                    last_error,
                })
            }
        }
    }

    pub async fn build_transaction(
        &self,
        sender: &Pubkey,
        receiver: &Pubkey,
        amount: Lamports,
    ) -> WorkflowResult<PendingTransaction> {
        info!("🛠️  Creating a transaction: {} -> {} ({} lamports)", sender, receiver, amount);

        let block_reference = self.gateway.get_latest_blockhash().await.map_err(|e| {
            error!("❌ Failed to fetch a recent blockhash: {}", e);
            WorkflowError::Build(e)
        })?;

        let message = Message::new_transfer(sender, receiver, amount, block_reference);
        Ok(PendingTransaction {
            request: TransferRequest {
                sender: *sender,
                receiver: *receiver,
                amount,
            },
            block_reference,
            transaction: Transaction::new_unsigned(message),
            state: TransferState::Built,
        })
    }

    /// Decodes the sender keypair from the configured secret key.
    pub fn resolve_signing_credential(&self) -> WorkflowResult<Account> {
        let encoded = self.config.secret_key.as_deref().ok_or_else(|| {
            WorkflowError::Configuration(format!(
                "{} is not set",
                crate::config::SECRET_KEY_ENV
            ))
        })?;

        let keypair = Keypair::from_base58_string(encoded).map_err(|e| {
            WorkflowError::Configuration(format!(
                "{} is malformed: {}",
                crate::config::SECRET_KEY_ENV,
                e
            ))
        })?;
        Ok(Account::from_keypair(keypair))
    }

    /// Signs, submits, and waits for confirmation. Any failure leaves the
    /// pending transaction in `Aborted` at the failing stage; nothing is retried.
    pub async fn sign_and_submit(
        &self,
        pending: &mut PendingTransaction,
        credential: &Account,
    ) -> WorkflowResult<SubmissionResult> {
        let keypair = match &credential.keypair {
            Some(keypair) => keypair,
            None => {
                pending.state = TransferState::Aborted(TransferStage::Sign);
                return Err(WorkflowError::Signing(format!(
                    "account {} has no signing key",
                    credential.pubkey
                )));
            }
        };

        if let Err(e) = pending.transaction.sign(keypair) {
            pending.state = TransferState::Aborted(TransferStage::Sign);
            error!("❌ Signing failed: {}", e);
            return Err(WorkflowError::Signing(e.to_string()));
        }
        pending.state = TransferState::Signed;

        let signature = match self.gateway.send_transaction(&pending.transaction).await {
            Ok(signature) => signature,
            Err(e) => {
                pending.state = TransferState::Aborted(TransferStage::Submit);
                error!("❌ Transaction failed: {}", e);
                return Err(WorkflowError::Submission(e));
            }
        };
        pending.state = TransferState::Submitted;
        info!("📨 Transaction signature: {}", signature);

        let reason = match self.gateway.confirm_transaction(&signature).await {
            Ok(ConfirmationStatus::Confirmed) => None,
            Ok(ConfirmationStatus::Failed(reason)) => Some(reason),
            Ok(ConfirmationStatus::Timeout) => Some("confirmation timed out".to_string()),
            Err(e) => Some(e.to_string()),
        };
        if let Some(reason) = reason {
            pending.state = TransferState::Aborted(TransferStage::Confirm);
            error!("❌ Transaction {} not confirmed: {}", signature, reason);
            return Err(WorkflowError::Confirmation {
                signature: signature.to_string(),
                reason,
            });
        }
        pending.state = TransferState::Confirmed;

        let explorer_url = self.config.explorer_tx_url(&signature.to_string());
        info!("🎉 Transaction confirmed");
        info!("🔍 View transaction on the explorer: {}", explorer_url);

        Ok(SubmissionResult {
            signature,
            confirmed: true,
            explorer_url,
        })
    }

    /// Full transfer signed by `credential`. The sender balance is read fresh
    /// for this transfer; a low balance only warns, and an unknown balance is
    /// never compared against the amount.
    pub async fn transfer(
        &self,
        sender: &Pubkey,
        receiver: &Pubkey,
        amount: Lamports,
        credential: &Account,
    ) -> TransferOutcome {
        match self.check_balance(sender).await {
            Ok(balance) if balance < amount => {
                warn!("⚠️  Your balance is too low ({} < {})", balance, amount);
                warn!("   Processing without sufficient balance...");
            }
            Ok(_) => {}
            Err(_) => warn!("⚠️  Sender balance unknown, continuing"),
        }

        let mut pending = match self.build_transaction(sender, receiver, amount).await {
            Ok(pending) => pending,
            Err(e) => {
                return TransferOutcome {
                    state: TransferState::Aborted(TransferStage::Build),
                    result: Err(e),
                }
            }
        };

        let result = self.sign_and_submit(&mut pending, credential).await;
        TransferOutcome {
            state: pending.state(),
            result,
        }
    }
}
