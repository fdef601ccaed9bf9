use super::parse_address;
use crate::runner::WorkflowTask;
use crate::workflow::TransferWorkflow;
use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::info;

/// Funded transfer to a new account, then a second transfer to the
/// well-known receiver with the same credential.
pub struct MultiTransferTask;

#[async_trait]
impl WorkflowTask for MultiTransferTask {
    fn name(&self) -> &str {
        "Multi transfer"
    }

    async fn run(&self, workflow: &TransferWorkflow) -> Result<()> {
        let config = workflow.config();
        let amount = config.transfer.amount_lamports;
        let sender = parse_address("sender", &config.accounts.sender_address)?;
        let second_receiver = parse_address("receiver", &config.accounts.receiver_address)?;
        let first_receiver = workflow.create_account();
        let credential = workflow.resolve_signing_credential()?;

        workflow
            .request_funding(&first_receiver.pubkey, config.funding_lamports())
            .await?;

        // Each transfer re-reads the sender balance inside `transfer`.
        let first = workflow
            .transfer(&sender, &first_receiver.pubkey, amount, &credential)
            .await;
        let first = first.result.context("first transfer")?;
        info!("✅ First transfer confirmed: {}", first.signature);

        let second = workflow
            .transfer(&sender, &second_receiver, amount, &credential)
            .await;
        let second = second.result.context("second transfer")?;
        info!("✅ Second transfer confirmed: {}", second.signature);
        Ok(())
    }
}
