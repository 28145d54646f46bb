//! Error types for ledger operations
//!
//! One error enum covers SDK failures (codec, keypairs), transport problems,
//! rippled error responses and ledger-level outcomes that did not match
//! what a walkthrough step expected.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failure reported by the XRPL SDK (binary codec, keypairs, address codec)
    #[error("SDK error: {0}")]
    Sdk(String),

    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),

    #[error("Failed to connect to {url}: {reason}")]
    Connection { url: String, reason: String },

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// rippled answered with `status: error`
    #[error("RPC error {error}{}", rpc_detail(.message))]
    Rpc {
        error: String,
        message: Option<String>,
    },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Faucet error: {0}")]
    Faucet(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Transaction {hash} was not validated before ledger {last_ledger_sequence}")]
    NotValidated {
        hash: String,
        last_ledger_sequence: u32,
    },

    #[error("Step '{step}' expected {expected} but the ledger returned {actual}")]
    UnexpectedResult {
        step: String,
        expected: String,
        actual: String,
    },
}

fn rpc_detail(message: &Option<String>) -> String {
    message
        .as_ref()
        .map(|m| format!(": {}", m))
        .unwrap_or_default()
}

impl LedgerError {
    pub fn connection(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::Connection {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// Wrap an error coming out of the SDK
    pub fn sdk(context: &str, err: impl std::fmt::Display) -> Self {
        Self::Sdk(format!("{}: {}", context, err))
    }

    /// True when rippled reported the given error code (e.g. `actNotFound`)
    pub fn is_rpc_error(&self, code: &str) -> bool {
        matches!(self, Self::Rpc { error, .. } if error == code)
    }
}
