//! Faucet funding against the rippled mock
//!
//! Run with: cargo test --test faucet_test -- --nocapture

mod common;

use common::{ledger, mock_config, sample_ledger, start_mock, FAUCET_WALLETS};
use rippled_mock::MockLedger;
use std::time::Duration;
use tokio::net::TcpListener;
use xrpl_scripts::workflow::SAMPLE_ACCOUNT_SEED;
use xrpl_scripts::{FaucetClient, LedgerError, Wallet, WebSocketClient};

#[tokio::test]
async fn test_fund_new_wallet() -> anyhow::Result<()> {
    let server = start_mock(sample_ledger()).await?;
    let config = mock_config(&server);
    let faucet = FaucetClient::from_config(&config)?;
    let mut client = WebSocketClient::from_config(&config).await?;

    let funded = faucet.fund_new_wallet(&mut client).await?;
    assert_eq!(funded.wallet.classic_address, FAUCET_WALLETS[0].1);
    assert_eq!(funded.wallet.seed(), FAUCET_WALLETS[0].0);
    assert_eq!(funded.balance_drops, 1_000_000_000);

    let second = faucet.fund_new_wallet(&mut client).await?;
    assert_eq!(second.wallet.classic_address, FAUCET_WALLETS[1].1);
    Ok(())
}

#[tokio::test]
async fn test_fund_existing_wallet_adds_balance() -> anyhow::Result<()> {
    let server = start_mock(sample_ledger()).await?;
    let config = mock_config(&server);
    let faucet = FaucetClient::from_config(&config)?;
    let mut client = WebSocketClient::from_config(&config).await?;
    let wallet = Wallet::from_seed(SAMPLE_ACCOUNT_SEED)?;

    let funded = faucet.fund_wallet(&mut client, &wallet).await?;
    assert_eq!(funded.balance_drops, 100_000_000 + 1_000_000_000);
    Ok(())
}

#[tokio::test]
async fn test_fund_unknown_wallet_creates_account() -> anyhow::Result<()> {
    let server = start_mock(MockLedger::new()).await?;
    let config = mock_config(&server);
    let faucet = FaucetClient::from_config(&config)?;
    let mut client = WebSocketClient::from_config(&config).await?;
    let wallet = Wallet::from_seed(FAUCET_WALLETS[2].0)?;

    let funded = faucet.fund_wallet(&mut client, &wallet).await?;
    assert_eq!(funded.balance_drops, 1_000_000_000);
    assert!(ledger(&server).accounts.contains_key(FAUCET_WALLETS[2].1));
    Ok(())
}

#[tokio::test]
async fn test_faucet_rejects_mismatched_seed() -> anyhow::Result<()> {
    // the faucet claims an address the seed does not derive
    let server = start_mock(
        MockLedger::new().with_faucet_wallet(FAUCET_WALLETS[0].0, FAUCET_WALLETS[1].1),
    )
    .await?;
    let config = mock_config(&server);
    let faucet = FaucetClient::from_config(&config)?;
    let mut client = WebSocketClient::from_config(&config).await?;

    let err = faucet.fund_new_wallet(&mut client).await.unwrap_err();
    assert!(matches!(err, LedgerError::Faucet(_)), "unexpected error: {}", err);
    Ok(())
}

#[tokio::test]
async fn test_faucet_unavailable() -> anyhow::Result<()> {
    let server = start_mock(MockLedger::new()).await?;
    let config = mock_config(&server);
    let faucet = FaucetClient::from_config(&config)?;
    let mut client = WebSocketClient::from_config(&config).await?;

    let err = faucet.fund_new_wallet(&mut client).await.unwrap_err();
    assert!(matches!(err, LedgerError::Faucet(_)));
    assert!(err.to_string().contains("503"));

    // nothing reached the websocket side
    assert!(ledger(&server).requests.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_silent_faucet_times_out() -> anyhow::Result<()> {
    let server = start_mock(MockLedger::new()).await?;

    // accepts connections and never writes a byte
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let mut config = mock_config(&server);
    config.request_timeout = Duration::from_millis(500);
    config.faucet_url = Some(format!("http://{}/accounts", addr));

    let faucet = FaucetClient::from_config(&config)?;
    let mut client = WebSocketClient::from_config(&config).await?;

    let result =
        tokio::time::timeout(Duration::from_secs(5), faucet.fund_new_wallet(&mut client)).await;
    let err = result
        .expect("faucet request should give up on its own")
        .unwrap_err();
    assert!(matches!(err, LedgerError::Timeout(_)), "unexpected error: {}", err);
    Ok(())
}
