use crate::gateway::{ConfirmationStatus, GatewayResult};
use crate::keys::Signature;
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

/// Status of a signature as last reported by the cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureState {
    Processed,
    Confirmed,
    Finalized,
    Failed(String),
}

/// Commitment level a transaction must reach before it counts as confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Commitment {
    Processed,
    Confirmed,
    Finalized,
}

impl Commitment {
    /// Unknown names fall back to `Confirmed`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "processed" => Commitment::Processed,
            "finalized" => Commitment::Finalized,
            _ => Commitment::Confirmed,
        }
    }
}

impl SignatureState {
    fn commitment(&self) -> Option<Commitment> {
        match self {
            SignatureState::Processed => Some(Commitment::Processed),
            SignatureState::Confirmed => Some(Commitment::Confirmed),
            SignatureState::Finalized => Some(Commitment::Finalized),
            SignatureState::Failed(_) => None,
        }
    }
}

pub struct TransactionMonitor {
    max_wait_time: Duration,
    poll_interval: Duration,
    target: Commitment,
}

impl TransactionMonitor {
    pub fn new(max_wait_time: Duration, poll_interval: Duration, target: Commitment) -> Self {
        Self {
            max_wait_time,
            poll_interval,
            target,
        }
    }

    /// Polls `fetch_status` until the signature reaches the target commitment,
    /// reports an error, or `max_wait_time` elapses. Polling errors are logged
    /// and retried on the next tick.
    pub async fn monitor_transaction<F, Fut>(
        &self,
        signature: &Signature,
        fetch_status: F,
    ) -> GatewayResult<ConfirmationStatus>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = GatewayResult<Option<SignatureState>>>,
    {
        debug!("🔍 Monitoring transaction: {}", signature);

        let start_time = Instant::now();

        loop {
            match fetch_status().await {
                Ok(Some(SignatureState::Failed(reason))) => {
                    warn!("❌ Transaction {} failed on chain: {}", signature, reason);
                    return Ok(ConfirmationStatus::Failed(reason));
                }
                Ok(Some(state)) if state.commitment() >= Some(self.target) => {
                    info!("✅ Transaction confirmed ({:?}): {}", self.target, signature);
                    return Ok(ConfirmationStatus::Confirmed);
                }
                Ok(Some(_)) | Ok(None) => {
                    debug!("⏳ Transaction pending, waiting...");
                }
                Err(e) => {
                    warn!("❌ Error checking transaction status: {}", e);
                }
            }

            if start_time.elapsed() >= self.max_wait_time {
                warn!(
                    "⏰ Transaction monitoring timeout after {:?}",
                    self.max_wait_time
                );
                return Ok(ConfirmationStatus::Timeout);
            }

            sleep(self.poll_interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GatewayError;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test(start_paused = true)]
    async fn test_confirms_after_pending_polls() {
        let monitor = TransactionMonitor::new(
            Duration::from_secs(10),
            Duration::from_millis(100),
            Commitment::Confirmed,
        );
        let polls = AtomicU32::new(0);

        let status = monitor
            .monitor_transaction(&Signature::default(), || {
                let n = polls.fetch_add(1, Ordering::SeqCst);
                async move {
                    match n {
                        0 => Ok(None),
                        1 => Err(GatewayError::Transport("connection reset".to_string())),
                        2 => Ok(Some(SignatureState::Processed)),
                        _ => Ok(Some(SignatureState::Confirmed)),
                    }
                }
            })
            .await
            .unwrap();

        assert_eq!(status, ConfirmationStatus::Confirmed);
        assert_eq!(polls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reports_on_chain_failure() {
        let monitor = TransactionMonitor::new(
            Duration::from_secs(10),
            Duration::from_millis(100),
            Commitment::Confirmed,
        );

        let status = monitor
            .monitor_transaction(&Signature::default(), || async {
                Ok(Some(SignatureState::Failed("InsufficientFundsForRent".to_string())))
            })
            .await
            .unwrap();

        assert_eq!(
            status,
            ConfirmationStatus::Failed("InsufficientFundsForRent".to_string())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_times_out() {
        let monitor = TransactionMonitor::new(
            Duration::from_secs(1),
            Duration::from_millis(300),
            Commitment::Confirmed,
        );

        let status = monitor
            .monitor_transaction(&Signature::default(), || async { Ok(None) })
            .await
            .unwrap();

        assert_eq!(status, ConfirmationStatus::Timeout);
    }

    #[tokio::test(start_paused = true)]
    async fn test_finalized_target_waits_past_confirmed() {
        let monitor = TransactionMonitor::new(
            Duration::from_secs(10),
            Duration::from_millis(100),
            Commitment::from_name("finalized"),
        );
        let polls = AtomicU32::new(0);

        let status = monitor
            .monitor_transaction(&Signature::default(), || {
                let n = polls.fetch_add(1, Ordering::SeqCst);
                async move {
                    match n {
                        0 | 1 => Ok(Some(SignatureState::Confirmed)),
                        _ => Ok(Some(SignatureState::Finalized)),
                    }
                }
            })
            .await
            .unwrap();

        assert_eq!(status, ConfirmationStatus::Confirmed);
        assert_eq!(polls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_finalized_target_times_out_on_confirmed_only() {
        let monitor = TransactionMonitor::new(
            Duration::from_secs(1),
            Duration::from_millis(300),
            Commitment::Finalized,
        );

        let status = monitor
            .monitor_transaction(&Signature::default(), || async {
                Ok(Some(SignatureState::Confirmed))
            })
            .await
            .unwrap();

        assert_eq!(status, ConfirmationStatus::Timeout);
    }

    #[test]
    fn test_commitment_names() {
        assert_eq!(Commitment::from_name("processed"), Commitment::Processed);
        assert_eq!(Commitment::from_name("confirmed"), Commitment::Confirmed);
        assert_eq!(Commitment::from_name("finalized"), Commitment::Finalized);
        assert_eq!(Commitment::from_name("bogus"), Commitment::Confirmed);
    }
}
