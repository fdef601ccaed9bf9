use super::parse_address;
use crate::runner::WorkflowTask;
use crate::workflow::TransferWorkflow;
use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

/// Transfer to a freshly generated account after funding it from the faucet.
pub struct FundedTransferTask;

#[async_trait]
impl WorkflowTask for FundedTransferTask {
    fn name(&self) -> &str {
        "Funded transfer"
    }

    async fn run(&self, workflow: &TransferWorkflow) -> Result<()> {
        let config = workflow.config();
        let sender = parse_address("sender", &config.accounts.sender_address)?;
        let receiver = workflow.create_account();
        let credential = workflow.resolve_signing_credential()?;

        workflow
            .request_funding(&receiver.pubkey, config.funding_lamports())
            .await?;

        let outcome = workflow
            .transfer(
                &sender,
                &receiver.pubkey,
                config.transfer.amount_lamports,
                &credential,
            )
            .await;
        let submission = outcome.result?;
        info!("✅ Funded transfer confirmed: {}", submission.explorer_url);
        Ok(())
    }
}
