pub mod create_account;
pub mod funded_transfer;
pub mod multi_transfer;
pub mod plain_transfer;

pub use create_account::CreateAccountTask;
pub use funded_transfer::FundedTransferTask;
pub use multi_transfer::MultiTransferTask;
pub use plain_transfer::PlainTransferTask;

use crate::keys::Pubkey;
use crate::runner::WorkflowTask;
use anyhow::Result;

/// The demo sequence run by `devnet-transfer run`.
pub fn default_tasks() -> Vec<Box<dyn WorkflowTask>> {
    vec![
        Box::new(CreateAccountTask),
        Box::new(PlainTransferTask),
        Box::new(FundedTransferTask),
        Box::new(MultiTransferTask),
    ]
}

/// Parses a base58 address, naming its role in the error.
pub fn parse_address(label: &str, address: &str) -> Result<Pubkey> {
    address
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid {} address {}: {}", label, address, e))
}
