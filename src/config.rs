/// Network configuration from environment variables
///
/// Controls which XRP Ledger network the programs talk to, where the
/// faucet lives and how long requests and polling may take.
/// Defaults to Testnet.

use std::env;
use std::time::Duration;

use crate::error::LedgerError;

pub const TESTNET_SERVER_URL: &str = "wss://s.altnet.rippletest.net:51233/";
pub const TESTNET_FAUCET_URL: &str = "https://faucet.altnet.rippletest.net/accounts";
pub const DEVNET_SERVER_URL: &str = "wss://s.devnet.rippletest.net:51233/";
pub const DEVNET_FAUCET_URL: &str = "https://faucet.devnet.rippletest.net/accounts";
pub const LOCAL_SERVER_URL: &str = "ws://localhost:6006/";

/// Ledgers a transaction may wait before it expires
pub const LEDGER_OFFSET: u32 = 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Network {
    Testnet,
    Devnet,
    /// Stand-alone rippled (or the mock ledger); no public faucet
    Local,
}

impl Network {
    pub fn default_server_url(&self) -> &'static str {
        match self {
            Network::Testnet => TESTNET_SERVER_URL,
            Network::Devnet => DEVNET_SERVER_URL,
            Network::Local => LOCAL_SERVER_URL,
        }
    }

    pub fn default_faucet_url(&self) -> Option<&'static str> {
        match self {
            Network::Testnet => Some(TESTNET_FAUCET_URL),
            Network::Devnet => Some(DEVNET_FAUCET_URL),
            Network::Local => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct NetworkConfig {
    pub network: Network,
    /// rippled websocket endpoint
    pub server_url: String,
    /// Faucet endpoint used to fund new accounts
    pub faucet_url: Option<String>,
    /// Upper bound for a single request/response round trip
    pub request_timeout: Duration,
    /// Delay between `tx` lookups while waiting for validation
    pub poll_interval: Duration,
    pub max_poll_attempts: u32,
    /// Autofill never sets a fee above this many drops
    pub max_fee_drops: u64,
}

impl NetworkConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `XRPL_NETWORK`: "testnet" (default), "devnet" or "local"
    /// - `XRPL_SERVER_URL`: websocket endpoint (optional, has network defaults)
    /// - `XRPL_FAUCET_URL`: faucet endpoint (optional, has network defaults)
    /// - `XRPL_REQUEST_TIMEOUT_SECS`: default 20
    /// - `XRPL_POLL_INTERVAL_MS`: default 1000
    /// - `XRPL_MAX_POLL_ATTEMPTS`: default 30
    /// - `XRPL_MAX_FEE_DROPS`: default 2000000
    ///
    /// # Examples
    ///
    /// ```bash
    /// # Testnet (default)
    /// cargo run --bin send-payment
    ///
    /// # Local mock ledger
    /// XRPL_NETWORK=local XRPL_SERVER_URL=ws://127.0.0.1:6006 cargo run --bin send-payment
    /// ```
    pub fn from_env() -> Result<Self, LedgerError> {
        let network_str = env::var("XRPL_NETWORK")
            .unwrap_or_else(|_| "testnet".to_string())
            .to_lowercase();

        let network = match network_str.as_str() {
            "testnet" | "" => {
                log::info!("🌐 Using TESTNET");
                Network::Testnet
            }
            "devnet" => {
                log::info!("🧪 Using DEVNET");
                Network::Devnet
            }
            "local" => {
                log::info!("🔧 Using LOCAL ledger");
                Network::Local
            }
            other => {
                log::warn!("⚠️  Unknown network '{}', defaulting to Testnet", other);
                Network::Testnet
            }
        };

        let server_url = env::var("XRPL_SERVER_URL")
            .unwrap_or_else(|_| network.default_server_url().to_string());
        log::info!("📡 Server URL: {}", server_url);

        let faucet_url = env::var("XRPL_FAUCET_URL")
            .ok()
            .or_else(|| network.default_faucet_url().map(str::to_string));
        if let Some(ref url) = faucet_url {
            log::info!("🚰 Faucet URL: {}", url);
        }

        let defaults = Self::default();
        Ok(Self {
            network,
            server_url,
            faucet_url,
            request_timeout: Duration::from_secs(env_number(
                "XRPL_REQUEST_TIMEOUT_SECS",
                defaults.request_timeout.as_secs(),
            )?),
            poll_interval: Duration::from_millis(env_number(
                "XRPL_POLL_INTERVAL_MS",
                defaults.poll_interval.as_millis() as u64,
            )?),
            max_poll_attempts: env_number("XRPL_MAX_POLL_ATTEMPTS", defaults.max_poll_attempts)?,
            max_fee_drops: env_number("XRPL_MAX_FEE_DROPS", defaults.max_fee_drops)?,
        })
    }

    /// Configuration for a local ledger at `server_url`, with an optional faucet
    pub fn local(server_url: impl Into<String>, faucet_url: Option<String>) -> Self {
        Self {
            network: Network::Local,
            server_url: server_url.into(),
            faucet_url,
            ..Default::default()
        }
    }
}

impl Default for NetworkConfig {
    /// Default configuration (Testnet)
    fn default() -> Self {
        Self {
            network: Network::Testnet,
            server_url: TESTNET_SERVER_URL.to_string(),
            faucet_url: Some(TESTNET_FAUCET_URL.to_string()),
            request_timeout: Duration::from_secs(20),
            poll_interval: Duration::from_millis(1000),
            max_poll_attempts: 30,
            max_fee_drops: 2_000_000,
        }
    }
}

/// Read a numeric environment variable, falling back to `default` when unset
pub fn env_number<T>(key: &str, default: T) -> Result<T, LedgerError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    Ok(env_optional_number(key)?.unwrap_or(default))
}

/// Read a numeric environment variable that has no default
pub fn env_optional_number<T>(key: &str) -> Result<Option<T>, LedgerError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| LedgerError::Config(format!("Invalid {}='{}': {}", key, raw, e))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_testnet() {
        let config = NetworkConfig::default();
        assert_eq!(config.network, Network::Testnet);
        assert_eq!(config.server_url, "wss://s.altnet.rippletest.net:51233/");
        assert_eq!(config.faucet_url.as_deref(), Some(TESTNET_FAUCET_URL));
    }

    #[test]
    fn test_local_has_no_default_faucet() {
        assert_eq!(Network::Local.default_faucet_url(), None);

        let config = NetworkConfig::local("ws://127.0.0.1:6006", None);
        assert_eq!(config.network, Network::Local);
        assert!(config.faucet_url.is_none());
        assert_eq!(config.max_fee_drops, 2_000_000);
    }

    #[test]
    fn test_env_number_parsing() {
        std::env::set_var("XRPL_TEST_ENV_NUMBER_OK", " 42 ");
        std::env::set_var("XRPL_TEST_ENV_NUMBER_BAD", "forty-two");

        assert_eq!(env_number("XRPL_TEST_ENV_NUMBER_OK", 7u32).unwrap(), 42);
        assert_eq!(env_number("XRPL_TEST_ENV_NUMBER_UNSET", 7u32).unwrap(), 7);
        assert!(matches!(
            env_number("XRPL_TEST_ENV_NUMBER_BAD", 7u32),
            Err(LedgerError::Config(_))
        ));
        assert_eq!(env_optional_number::<u64>("XRPL_TEST_ENV_NUMBER_UNSET").unwrap(), None);
        assert_eq!(env_optional_number::<u64>("XRPL_TEST_ENV_NUMBER_OK").unwrap(), Some(42));
    }
}
