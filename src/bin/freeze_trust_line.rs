//! Issue a token, freeze the distributor's trust line, then unfreeze it

use anyhow::Context;
use xrpl_scripts::workflow::{FreezeSettings, FreezeWorkflow};
use xrpl_scripts::NetworkConfig;

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
    let settings = FreezeSettings::from_env().context("Failed to load token settings")?;

    let workflow = FreezeWorkflow::connect(&config, settings)
        .await
        .context("Failed to connect")?;
    let report = workflow.run().await.context("Freeze walkthrough stopped")?;

    println!("Cold wallet     {}", report.cold_address);
    println!("Hot wallet      {}", report.hot_address);
    println!("Customer wallet {}", report.customer_address);
    for step in &report.steps {
        println!(
            "{:<28} {:<14} ledger {:<10} {}",
            step.step,
            step.engine_result,
            step.ledger_index.map(|i| i.to_string()).unwrap_or_default(),
            step.hash
        );
    }
    Ok(())
}
