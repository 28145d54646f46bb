//! Create and fund a new test network wallet

use anyhow::Context;
use xrpl_scripts::{FaucetClient, NetworkConfig, WebSocketClient};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run().await {
        log::error!("❌ {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = NetworkConfig::from_env().context("Failed to load network configuration")?;
    let faucet = FaucetClient::from_config(&config)?;
    let mut client = WebSocketClient::from_config(&config)
        .await
        .context("Failed to connect")?;

    let funded = faucet
        .fund_new_wallet(&mut client)
        .await
        .context("Faucet funding failed")?;
    client.close().await?;

    println!("Address {}", funded.wallet.classic_address);
    println!("Seed    {}", funded.wallet.seed());
    println!("Balance {} drops", funded.balance_drops);
    Ok(())
}
