pub mod config;
pub mod error;
pub mod gateway;
pub mod jobs;
pub mod keys;
pub mod retry;
pub mod rpc_client;
pub mod runner;
pub mod transaction;
pub mod transaction_monitor;
pub mod workflow;

pub use config::NetworkConfig;
pub use error::{GatewayError, WorkflowError};
pub use gateway::{ConfirmationStatus, RpcGateway};
pub use keys::{Keypair, Pubkey, Signature};
pub use retry::{execute_with_retry, RetryConfig, RetryError};
pub use rpc_client::SolanaRpcClient;
pub use runner::{RunReport, TaskOutcome, WorkflowRunner, WorkflowTask};
pub use transaction::{Lamports, LAMPORTS_PER_SOL};
pub use transaction_monitor::{Commitment, SignatureState, TransactionMonitor};
pub use workflow::{
    Account, PendingTransaction, SubmissionResult, TransferRequest, TransferState,
    TransferWorkflow,
};
