use anyhow::Result;
use clap::{Parser, Subcommand};
use devnet_transfer::jobs::{default_tasks, parse_address};
use devnet_transfer::{NetworkConfig, SolanaRpcClient, TransferWorkflow, WorkflowRunner};
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "devnet-transfer", about = "Account, airdrop and transfer workflows on a Solana test cluster")]
struct Cli {
    /// Optional TOML file overriding the built-in devnet settings
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run every demo task in order
    Run,
    /// Generate a new account
    CreateAccount {
        /// Also print the base58 secret key
        #[arg(long)]
        show_secret: bool,
    },
    /// Show the balance of an address
    Balance { address: String },
    /// Request a faucet airdrop
    Airdrop {
        address: String,
        #[arg(long)]
        lamports: Option<u64>,
    },
    /// Transfer from the configured secret key's account
    Transfer {
        #[arg(long)]
        to: String,
        #[arg(long)]
        lamports: Option<u64>,
        /// Airdrop to the receiver before transferring
        #[arg(long)]
        fund: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    if let Err(e) = execute(cli).await {
        error!("❌ {:#}", e);
        return Err(e);
    }
    Ok(())
}

async fn execute(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => NetworkConfig::load(path)?,
        None => NetworkConfig::from_env(),
    };
    let client = SolanaRpcClient::new(&config)?;
    let workflow = TransferWorkflow::new(Arc::new(client), config);

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => {
            let runner = WorkflowRunner::new(workflow);
            let report = runner.run(&default_tasks()).await;
            for outcome in report.failed() {
                info!("   {} incomplete", outcome.name);
            }
        }
        Command::CreateAccount { show_secret } => {
            let account = workflow.create_account();
            println!("{}", account.pubkey);
            if show_secret {
                if let Some(keypair) = &account.keypair {
                    println!("{}", keypair.to_base58_string());
                }
            }
        }
        Command::Balance { address } => {
            let address = parse_address("target", &address)?;
            let lamports = workflow.check_balance(&address).await?;
            println!("{}", lamports);
        }
        Command::Airdrop { address, lamports } => {
            let address = parse_address("target", &address)?;
            let lamports = lamports.unwrap_or_else(|| workflow.config().funding_lamports());
            let signature = workflow.request_funding(&address, lamports).await?;
            println!("{}", signature);
        }
        Command::Transfer { to, lamports, fund } => {
            let receiver = parse_address("receiver", &to)?;
            let amount = lamports.unwrap_or(workflow.config().transfer.amount_lamports);
            let credential = workflow.resolve_signing_credential()?;
            if fund {
                workflow
                    .request_funding(&receiver, workflow.config().funding_lamports())
                    .await?;
            }
            let outcome = workflow
                .transfer(&credential.pubkey, &receiver, amount, &credential)
                .await;
            let submission = outcome.result?;
            println!("{}", submission.explorer_url);
        }
    }

    Ok(())
}
