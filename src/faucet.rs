//! Test network faucet
//!
//! The faucet either creates and funds a brand new account (empty request)
//! or tops up an existing one (`{"destination": "r..."}`). Funding lands in
//! the next ledger, so both calls poll `account_info` until the XRP shows up.

use std::time::Duration;

use serde::Deserialize;
use serde_json::json;

use crate::client::WebSocketClient;
use crate::config::NetworkConfig;
use crate::error::LedgerError;
use crate::submit::SubmitOptions;
use crate::wallet::Wallet;

#[derive(Debug, Deserialize)]
struct FaucetResponse {
    account: FaucetAccount,
    #[serde(default)]
    seed: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FaucetAccount {
    #[serde(default, rename = "classicAddress")]
    classic_address: Option<String>,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    secret: Option<String>,
}

/// A wallet that exists on the ledger
#[derive(Debug, Clone)]
pub struct FundedWallet {
    pub wallet: Wallet,
    /// XRP balance in drops after funding
    pub balance_drops: u64,
}

pub struct FaucetClient {
    http_client: reqwest::Client,
    url: String,
    options: SubmitOptions,
}

impl FaucetClient {
    /// `timeout` bounds each faucet request, body included
    pub fn new(
        url: impl Into<String>,
        options: SubmitOptions,
        timeout: Duration,
    ) -> Result<Self, LedgerError> {
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            url: url.into(),
            options,
        })
    }

    pub fn from_config(config: &NetworkConfig) -> Result<Self, LedgerError> {
        let url = config.faucet_url.clone().ok_or_else(|| {
            LedgerError::Config(format!(
                "No faucet configured for {:?}; set XRPL_FAUCET_URL",
                config.network
            ))
        })?;
        Self::new(
            url,
            SubmitOptions::from_config(config),
            config.request_timeout,
        )
    }

    /// Create a new account through the faucet and wait until it is funded
    pub async fn fund_new_wallet(
        &self,
        client: &mut WebSocketClient,
    ) -> Result<FundedWallet, LedgerError> {
        let response = self.request_funding(json!({})).await?;

        let seed = response
            .seed
            .or(response.account.secret)
            .ok_or_else(|| LedgerError::Faucet("Faucet response has no seed".to_string()))?;
        let wallet = Wallet::from_seed(&seed)?;

        let reported = response
            .account
            .classic_address
            .or(response.account.address);
        if let Some(address) = reported {
            if address != wallet.classic_address {
                return Err(LedgerError::Faucet(format!(
                    "Faucet funded {} but the seed derives {}",
                    address, wallet.classic_address
                )));
            }
        }

        log::info!("🚰 Faucet created {}", wallet.classic_address);
        let balance_drops = self.wait_for_balance(client, &wallet.classic_address, 0).await?;
        Ok(FundedWallet {
            wallet,
            balance_drops,
        })
    }

    /// Top up an existing wallet and wait until its balance grows
    pub async fn fund_wallet(
        &self,
        client: &mut WebSocketClient,
        wallet: &Wallet,
    ) -> Result<FundedWallet, LedgerError> {
        let starting_balance = match client.account_info(&wallet.classic_address).await {
            Ok(info) => parse_drops(&info.account_data.balance)?,
            Err(e) if e.is_rpc_error("actNotFound") => 0,
            Err(e) => return Err(e),
        };

        self.request_funding(json!({ "destination": wallet.classic_address }))
            .await?;
        log::info!("🚰 Faucet funding {}", wallet.classic_address);

        let balance_drops = self
            .wait_for_balance(client, &wallet.classic_address, starting_balance)
            .await?;
        Ok(FundedWallet {
            wallet: wallet.clone(),
            balance_drops,
        })
    }

    async fn request_funding(
        &self,
        body: serde_json::Value,
    ) -> Result<FaucetResponse, LedgerError> {
        let response = self
            .http_client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.http_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(LedgerError::Faucet(format!(
                "{} returned {}: {}",
                self.url, status, text
            )));
        }

        response.json::<FaucetResponse>().await.map_err(|e| {
            if e.is_timeout() {
                self.http_error(e)
            } else {
                LedgerError::Faucet(format!("Unreadable faucet response: {}", e))
            }
        })
    }

    fn http_error(&self, err: reqwest::Error) -> LedgerError {
        if err.is_timeout() {
            LedgerError::Timeout(format!("Faucet {} did not answer: {}", self.url, err))
        } else {
            LedgerError::Http(err)
        }
    }

    async fn wait_for_balance(
        &self,
        client: &mut WebSocketClient,
        address: &str,
        above: u64,
    ) -> Result<u64, LedgerError> {
        for attempt in 1..=self.options.max_attempts {
            match client.account_info(address).await {
                Ok(info) => {
                    let balance = parse_drops(&info.account_data.balance)?;
                    if balance > above {
                        log::info!("💰 {} funded with {} drops", address, balance);
                        return Ok(balance);
                    }
                }
                Err(e) if e.is_rpc_error("actNotFound") => {}
                Err(e) => return Err(e),
            }
            log::debug!("Waiting for faucet funding of {} (attempt {})", address, attempt);
            tokio::time::sleep(self.options.poll_interval).await;
        }

        Err(LedgerError::Timeout(format!(
            "{} was not funded after {} attempts",
            address, self.options.max_attempts
        )))
    }
}

fn parse_drops(raw: &str) -> Result<u64, LedgerError> {
    raw.parse()
        .map_err(|_| LedgerError::InvalidResponse(format!("Balance is not drops: '{}'", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_faucet_response_variants() {
        let with_seed: FaucetResponse = serde_json::from_value(json!({
            "account": {
                "xAddress": "T7...",
                "classicAddress": "r3Z8KLzomveD5mu7tYsuhXDPJTfH91ZzHJ",
                "address": "r3Z8KLzomveD5mu7tYsuhXDPJTfH91ZzHJ"
            },
            "amount": 100,
            "seed": "sEdSmpmt3DbU42EgsxVrToBqcA6bn3P"
        }))
        .unwrap();
        assert_eq!(with_seed.seed.as_deref(), Some("sEdSmpmt3DbU42EgsxVrToBqcA6bn3P"));

        let with_secret: FaucetResponse = serde_json::from_value(json!({
            "account": {
                "address": "r3Z8KLzomveD5mu7tYsuhXDPJTfH91ZzHJ",
                "secret": "sEdSmpmt3DbU42EgsxVrToBqcA6bn3P"
            },
            "balance": 1000
        }))
        .unwrap();
        assert!(with_secret.seed.is_none());
        assert!(with_secret.account.secret.is_some());
    }

    #[test]
    fn test_local_config_without_faucet() {
        let config = NetworkConfig::local("ws://127.0.0.1:6006", None);
        assert!(matches!(
            FaucetClient::from_config(&config),
            Err(LedgerError::Config(_))
        ));
    }
}
