//! Send a payment from the sample (or configured) account

use anyhow::Context;
use xrpl_scripts::workflow::{send_payment, PaymentRequest};
use xrpl_scripts::NetworkConfig;

#[tokio::main]
async fn main() {
    // Initialize logger (set RUST_LOG=debug for verbose output)
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run().await {
        log::error!("❌ {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = NetworkConfig::from_env().context("Failed to load network configuration")?;
    let request = PaymentRequest::from_env().context("Failed to load payment settings")?;

    let report = send_payment(&config, &request)
        .await
        .context("Payment failed")?;

    println!("Sender Account {}", report.sender);
    println!(
        "Tx Result {} ({}) hash {}",
        report.submit.engine_result, report.submit.engine_result_message, report.hash
    );
    if let Some(outcome) = report.outcome {
        println!(
            "Validated in ledger {:?}: {}",
            outcome.ledger_index, outcome.engine_result
        );
    }
    Ok(())
}
