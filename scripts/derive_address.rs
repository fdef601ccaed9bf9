use anyhow::Result;
use devnet_transfer::config::SECRET_KEY_ENV;
use devnet_transfer::Keypair;

fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let encoded = std::env::var(SECRET_KEY_ENV)
        .map_err(|_| anyhow::anyhow!("{} is not set", SECRET_KEY_ENV))?;
    let keypair = Keypair::from_base58_string(&encoded)
        .map_err(|e| anyhow::anyhow!("{} is malformed: {}", SECRET_KEY_ENV, e))?;

    println!("✅ Address: {}", keypair.pubkey());
    println!("💰 Fund it with: devnet-transfer airdrop {}", keypair.pubkey());
    println!(
        "🔍 Explorer: https://explorer.solana.com/address/{}?cluster=devnet",
        keypair.pubkey()
    );

    Ok(())
}
