//! Shared setup for the integration tests
//!
//! Every test starts its own in-process rippled mock on an ephemeral port,
//! so tests can run in parallel without sharing ledger state.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::MutexGuard;
use std::time::Duration;

use rippled_mock::{MockLedger, MockServer};
use xrpl_scripts::{NetworkConfig, SubmitOptions};

/// Account derived from `SAMPLE_ACCOUNT_SEED`
pub const SAMPLE_ADDRESS: &str = "r3Z8KLzomveD5mu7tYsuhXDPJTfH91ZzHJ";

/// Seeds the mock faucet hands out, with the addresses they derive
pub const FAUCET_WALLETS: [(&str, &str); 3] = [
    ("sEdSKaVGtEer9RrxMSMhFM2WVSW5LT3", "r3sNTMefq5gsRumMYsNznnX6yzzxVH6dTC"),
    ("sEdSKuYwxeL4JM1LBJcGmpLw9fbF8JN", "rpjfAeE3DeeHPFnN2PgGFW5YxnZFAjrEyN"),
    ("sEdSL5bnsspjTJ55rw1766no8kWvfV4", "rPPdduC9MRTrXZP1J7MQyEKKEYiFigWZ6Q"),
];

/// Load environment variables from .env file and initialize logging
pub fn load_env() {
    // Initialize logger (only once, subsequent calls are no-ops)
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Info)
        .try_init();

    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push(".env");

    dotenv::from_path(&path).ok();
}

/// Ledger with the sample sender funded and the faucet wallets queued
pub fn sample_ledger() -> MockLedger {
    FAUCET_WALLETS
        .iter()
        .fold(
            MockLedger::new().with_account(SAMPLE_ADDRESS, 100_000_000, 42),
            |ledger, (seed, address)| ledger.with_faucet_wallet(seed, address),
        )
}

pub async fn start_mock(ledger: MockLedger) -> anyhow::Result<MockServer> {
    load_env();
    MockServer::start(ledger).await
}

/// Local configuration pointing at the mock, polling fast
pub fn mock_config(server: &MockServer) -> NetworkConfig {
    NetworkConfig {
        request_timeout: Duration::from_secs(5),
        poll_interval: Duration::from_millis(10),
        max_poll_attempts: 10,
        ..NetworkConfig::local(server.ws_url.clone(), Some(server.faucet_url.clone()))
    }
}

pub fn mock_options(server: &MockServer) -> SubmitOptions {
    SubmitOptions::from_config(&mock_config(server))
}

pub fn ledger(server: &MockServer) -> MutexGuard<'_, MockLedger> {
    server
        .ledger
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}
