use super::parse_address;
use crate::runner::WorkflowTask;
use crate::workflow::TransferWorkflow;
use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

/// Well-known sender to well-known receiver, no funding.
pub struct PlainTransferTask;

#[async_trait]
impl WorkflowTask for PlainTransferTask {
    fn name(&self) -> &str {
        "Plain transfer"
    }

    async fn run(&self, workflow: &TransferWorkflow) -> Result<()> {
        let config = workflow.config();
        let sender = parse_address("sender", &config.accounts.sender_address)?;
        let receiver = parse_address("receiver", &config.accounts.receiver_address)?;
        let credential = workflow.resolve_signing_credential()?;

        let outcome = workflow
            .transfer(&sender, &receiver, config.transfer.amount_lamports, &credential)
            .await;
        let submission = outcome.result?;
        info!("✅ Transfer {} reached {:?}", submission.signature, outcome.state);
        Ok(())
    }
}
