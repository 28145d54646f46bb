//! Websocket API requests
//!
//! Each request serializes to the fields rippled expects next to `id` and
//! `command`; `method()` supplies the command name.

use serde::Serialize;

use crate::error::LedgerError;
use crate::wallet::validate_address;

pub trait Request: Serialize {
    /// rippled command name
    fn method(&self) -> &'static str;

    fn validate(&self) -> Result<(), LedgerError> {
        Ok(())
    }
}

/// Submit a signed transaction blob
#[derive(Debug, Clone, Serialize)]
pub struct SubmitRequest {
    pub tx_blob: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub fail_hard: bool,
}

impl SubmitRequest {
    pub fn new(tx_blob: impl Into<String>) -> Self {
        Self {
            tx_blob: tx_blob.into(),
            fail_hard: false,
        }
    }
}

impl Request for SubmitRequest {
    fn method(&self) -> &'static str {
        "submit"
    }

    fn validate(&self) -> Result<(), LedgerError> {
        if self.tx_blob.is_empty() || hex::decode(&self.tx_blob).is_err() {
            return Err(LedgerError::InvalidTransaction(
                "tx_blob must be a non-empty hex string".to_string(),
            ));
        }
        Ok(())
    }
}

/// Ledger to read from: `current`, `validated`, `closed` or a sequence number
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum LedgerIndex {
    Shortcut(&'static str),
    Sequence(u32),
}

impl LedgerIndex {
    pub const CURRENT: LedgerIndex = LedgerIndex::Shortcut("current");
    pub const VALIDATED: LedgerIndex = LedgerIndex::Shortcut("validated");
}

#[derive(Debug, Clone, Serialize)]
pub struct AccountInfoRequest {
    pub account: String,
    pub ledger_index: LedgerIndex,
    pub strict: bool,
}

impl AccountInfoRequest {
    pub fn new(account: impl Into<String>, ledger_index: LedgerIndex) -> Self {
        Self {
            account: account.into(),
            ledger_index,
            strict: true,
        }
    }
}

impl Request for AccountInfoRequest {
    fn method(&self) -> &'static str {
        "account_info"
    }

    fn validate(&self) -> Result<(), LedgerError> {
        validate_address(&self.account)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AccountLinesRequest {
    pub account: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peer: Option<String>,
    pub ledger_index: LedgerIndex,
}

impl AccountLinesRequest {
    pub fn new(account: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            peer: None,
            ledger_index: LedgerIndex::VALIDATED,
        }
    }

    pub fn with_peer(mut self, peer: impl Into<String>) -> Self {
        self.peer = Some(peer.into());
        self
    }
}

impl Request for AccountLinesRequest {
    fn method(&self) -> &'static str {
        "account_lines"
    }

    fn validate(&self) -> Result<(), LedgerError> {
        validate_address(&self.account)?;
        if let Some(ref peer) = self.peer {
            validate_address(peer)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LedgerCurrentRequest {}

impl Request for LedgerCurrentRequest {
    fn method(&self) -> &'static str {
        "ledger_current"
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FeeRequest {}

impl Request for FeeRequest {
    fn method(&self) -> &'static str {
        "fee"
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ServerInfoRequest {}

impl Request for ServerInfoRequest {
    fn method(&self) -> &'static str {
        "server_info"
    }
}

/// Look up a transaction by hash
#[derive(Debug, Clone, Serialize)]
pub struct TxRequest {
    pub transaction: String,
    pub binary: bool,
}

impl TxRequest {
    pub fn new(hash: impl Into<String>) -> Self {
        Self {
            transaction: hash.into(),
            binary: false,
        }
    }
}

impl Request for TxRequest {
    fn method(&self) -> &'static str {
        "tx"
    }

    fn validate(&self) -> Result<(), LedgerError> {
        if self.transaction.len() != 64 || hex::decode(&self.transaction).is_err() {
            return Err(LedgerError::InvalidTransaction(format!(
                "Invalid transaction hash '{}'",
                self.transaction
            )));
        }
        Ok(())
    }
}
