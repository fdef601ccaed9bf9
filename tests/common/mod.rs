#![allow(dead_code)]

use async_trait::async_trait;
use devnet_transfer::gateway::GatewayResult;
use devnet_transfer::transaction::{Blockhash, Transaction};
use devnet_transfer::{
    ConfirmationStatus, GatewayError, Keypair, Lamports, NetworkConfig, Pubkey, RpcGateway,
    Signature, TransferWorkflow,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Scripted in-memory gateway. Queued results are consumed in order; once a
/// queue is empty the default succeeds.
pub struct MockGateway {
    balance: Lamports,
    balance_error: Mutex<Option<GatewayError>>,
    airdrops: Mutex<VecDeque<GatewayResult<Signature>>>,
    blockhash_error: Option<GatewayError>,
    send_error: Option<GatewayError>,
    confirmation: GatewayResult<ConfirmationStatus>,
    calls: Mutex<Vec<String>>,
    sent: Mutex<Vec<Transaction>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            balance: 1_000_000,
            balance_error: Mutex::new(None),
            airdrops: Mutex::new(VecDeque::new()),
            blockhash_error: None,
            send_error: None,
            confirmation: Ok(ConfirmationStatus::Confirmed),
            calls: Mutex::new(Vec::new()),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn with_balance(mut self, lamports: Lamports) -> Self {
        self.balance = lamports;
        self
    }

    pub fn failing_balance(self, error: GatewayError) -> Self {
        *self.balance_error.lock().unwrap() = Some(error);
        self
    }

    pub fn with_airdrop_results(self, results: Vec<GatewayResult<Signature>>) -> Self {
        *self.airdrops.lock().unwrap() = results.into();
        self
    }

    /// Rate limits the first `times` airdrop calls.
    pub fn rate_limited(self, times: usize) -> Self {
        let results = (0..times)
            .map(|_| Err(GatewayError::RateLimited("429 Too Many Requests".to_string())))
            .collect();
        self.with_airdrop_results(results)
    }

    pub fn failing_blockhash(mut self, error: GatewayError) -> Self {
        self.blockhash_error = Some(error);
        self
    }

    pub fn failing_send(mut self, error: GatewayError) -> Self {
        self.send_error = Some(error);
        self
    }

    pub fn with_confirmation(mut self, confirmation: GatewayResult<ConfirmationStatus>) -> Self {
        self.confirmation = confirmation;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, method: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == method).count()
    }

    pub fn sent(&self) -> Vec<Transaction> {
        self.sent.lock().unwrap().clone()
    }

    fn record(&self, method: &str) {
        self.calls.lock().unwrap().push(method.to_string());
    }
}

#[async_trait]
impl RpcGateway for MockGateway {
    async fn get_balance(&self, _address: &Pubkey) -> GatewayResult<Lamports> {
        self.record("get_balance");
        match self.balance_error.lock().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(self.balance),
        }
    }

    async fn request_airdrop(
        &self,
        _address: &Pubkey,
        _lamports: Lamports,
    ) -> GatewayResult<Signature> {
        self.record("request_airdrop");
        self.airdrops
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(Signature::new([7u8; 64])))
    }

    async fn get_latest_blockhash(&self) -> GatewayResult<Blockhash> {
        self.record("get_latest_blockhash");
        match &self.blockhash_error {
            Some(error) => Err(error.clone()),
            None => Ok(Blockhash([3u8; 32])),
        }
    }

    async fn send_transaction(&self, transaction: &Transaction) -> GatewayResult<Signature> {
        self.record("send_transaction");
        if let Some(error) = &self.send_error {
            return Err(error.clone());
        }
        self.sent.lock().unwrap().push(transaction.clone());
        Ok(*transaction.signature().expect("mock received unsigned transaction"))
    }

    async fn confirm_transaction(
        &self,
        _signature: &Signature,
    ) -> GatewayResult<ConfirmationStatus> {
        self.record("confirm_transaction");
        self.confirmation.clone()
    }
}

/// Default devnet config whose secret key and well-known sender belong to `keypair`.
pub fn config_for(keypair: &Keypair) -> NetworkConfig {
    let mut config = NetworkConfig::default();
    config.secret_key = Some(keypair.to_base58_string());
    config.accounts.sender_address = keypair.pubkey().to_string();
    config
}

pub fn workflow_with(gateway: Arc<MockGateway>, config: NetworkConfig) -> TransferWorkflow {
    TransferWorkflow::new(gateway, config)
}
