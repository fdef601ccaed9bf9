use crate::runner::WorkflowTask;
use crate::workflow::TransferWorkflow;
use anyhow::Result;
use async_trait::async_trait;

pub struct CreateAccountTask;

#[async_trait]
impl WorkflowTask for CreateAccountTask {
    fn name(&self) -> &str {
        "Create account"
    }

    async fn run(&self, workflow: &TransferWorkflow) -> Result<()> {
        workflow.create_account();
        Ok(())
    }
}
