/// rippled Mock Server
///
/// Serves the websocket commands the scripts use plus a faucet, backed by an
/// in-memory ledger that reports `tesSUCCESS` for every submission.

use anyhow::{Context, Result};
use std::env;

use rippled_mock::{run_server, MockLedger};

#[derive(Debug)]
struct Config {
    server_host: String,
    server_port: u16,
}

impl Config {
    fn from_env() -> Result<Self> {
        dotenv::dotenv().ok(); // Load .env file if present

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "6006".to_string())
            .parse()
            .context("Invalid SERVER_PORT")?;

        Ok(Self {
            server_host,
            server_port,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting rippled mock server...");

    let config = Config::from_env().context("Failed to load configuration")?;

    run_server(
        MockLedger::new().into_shared(),
        config.server_host,
        config.server_port,
    )
    .await
    .context("Server error")?;

    Ok(())
}
