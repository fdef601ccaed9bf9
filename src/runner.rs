use crate::workflow::TransferWorkflow;
use async_trait::async_trait;
use tracing::{error, info};

/// A named unit of work that fails independently of its siblings.
#[async_trait]
pub trait WorkflowTask: Send + Sync {
    fn name(&self) -> &str;

    async fn run(&self, workflow: &TransferWorkflow) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskOutcome {
    pub name: String,
    pub error: Option<String>,
}

impl TaskOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Default)]
pub struct RunReport {
    pub outcomes: Vec<TaskOutcome>,
}

impl RunReport {
    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(TaskOutcome::succeeded)
    }

    pub fn failed(&self) -> impl Iterator<Item = &TaskOutcome> {
        self.outcomes.iter().filter(|o| !o.succeeded())
    }
}

/// Runs tasks strictly in order against one shared workflow.
pub struct WorkflowRunner {
    workflow: TransferWorkflow,
}

impl WorkflowRunner {
    pub fn new(workflow: TransferWorkflow) -> Self {
        Self { workflow }
    }

    pub async fn run(&self, tasks: &[Box<dyn WorkflowTask>]) -> RunReport {
        let mut report = RunReport::default();

        for task in tasks {
            info!("▶️  {}", task.name());
            let error = match task.run(&self.workflow).await {
                Ok(()) => {
                    info!("✅ {} complete", task.name());
                    None
                }
                Err(e) => {
                    error!("❌ {} incomplete: {:#}", task.name(), e);
                    Some(format!("{:#}", e))
                }
            };
            report.outcomes.push(TaskOutcome {
                name: task.name().to_string(),
                error,
            });
        }

        let failed = report.failed().count();
        info!(
            "📊 {} tasks run, {} complete, {} incomplete",
            report.outcomes.len(),
            report.outcomes.len() - failed,
            failed
        );
        report
    }
}
