use thiserror::Error;

/// Failures reported by an [`RpcGateway`](crate::gateway::RpcGateway).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    /// The endpoint throttled the request (HTTP 429 or JSON-RPC code 429).
    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("invalid RPC response: {0}")]
    InvalidResponse(String),
}

impl GatewayError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, GatewayError::RateLimited(_))
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("invalid base58: {0}")]
    InvalidBase58(String),

    #[error("expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("public half of the keypair does not match its secret")]
    MismatchedKeypair,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransactionError {
    #[error("signer {signer} is not the fee payer {fee_payer}")]
    WrongSigner { signer: String, fee_payer: String },

    #[error("transaction is not signed")]
    Unsigned,

    #[error("length {0} does not fit a compact-u16 prefix")]
    TooLong(usize),
}

/// Errors surfaced by the transfer workflow. Each variant names the step that
/// failed so the enclosing task can report where a transfer aborted.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("failed to build transaction: {0}")]
    Build(GatewayError),

    #[error("failed to sign transaction: {0}")]
    Signing(String),

    #[error("failed to submit transaction: {0}")]
    Submission(GatewayError),

    #[error("failed to confirm transaction {signature}: {reason}")]
    Confirmation { signature: String, reason: String },

    #[error("{operation} gave up after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        operation: String,
        attempts: u32,
        last_error: GatewayError,
    },
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;
