//! Response payloads (the `result` object of a successful response)

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub engine_result: String,
    #[serde(default)]
    pub engine_result_code: i32,
    #[serde(default)]
    pub engine_result_message: String,
    #[serde(default)]
    pub tx_blob: String,
    #[serde(default)]
    pub tx_json: Value,
    #[serde(default)]
    pub accepted: Option<bool>,
    #[serde(default)]
    pub applied: Option<bool>,
}

impl SubmitResponse {
    /// Hash reported back in `tx_json`, if any
    pub fn hash(&self) -> Option<&str> {
        self.tx_json.get("hash").and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountInfoResponse {
    pub account_data: AccountRoot,
    #[serde(default)]
    pub ledger_current_index: Option<u32>,
    #[serde(default)]
    pub ledger_index: Option<u32>,
    #[serde(default)]
    pub validated: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccountRoot {
    pub account: String,
    /// XRP balance in drops
    pub balance: String,
    pub sequence: u32,
    #[serde(default)]
    pub flags: u32,
    #[serde(default)]
    pub owner_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountLinesResponse {
    pub account: String,
    pub lines: Vec<TrustLine>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrustLine {
    /// The counterparty of the line
    pub account: String,
    pub balance: String,
    pub currency: String,
    pub limit: String,
    pub limit_peer: String,
    /// This account froze the line
    #[serde(default)]
    pub freeze: Option<bool>,
    /// The counterparty froze the line
    #[serde(default)]
    pub freeze_peer: Option<bool>,
    #[serde(default)]
    pub no_ripple: Option<bool>,
    #[serde(default)]
    pub no_ripple_peer: Option<bool>,
}

impl TrustLine {
    pub fn is_frozen(&self) -> bool {
        self.freeze.unwrap_or(false) || self.freeze_peer.unwrap_or(false)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerCurrentResponse {
    pub ledger_current_index: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeResponse {
    pub drops: FeeDrops,
    #[serde(default)]
    pub ledger_current_index: Option<u32>,
}

/// Fee levels in drops, as strings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeDrops {
    pub base_fee: String,
    #[serde(default)]
    pub median_fee: String,
    #[serde(default)]
    pub minimum_fee: String,
    pub open_ledger_fee: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxResponse {
    pub hash: String,
    #[serde(default)]
    pub validated: bool,
    #[serde(default)]
    pub ledger_index: Option<u32>,
    /// Close time of the including ledger, seconds since the ripple epoch
    #[serde(default)]
    pub date: Option<u32>,
    #[serde(default)]
    pub meta: Option<TxMeta>,
}

impl TxResponse {
    pub fn transaction_result(&self) -> Option<&str> {
        self.meta.as_ref().map(|m| m.transaction_result.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxMeta {
    #[serde(rename = "TransactionResult")]
    pub transaction_result: String,
    #[serde(rename = "TransactionIndex", default)]
    pub transaction_index: Option<u32>,
    #[serde(default)]
    pub delivered_amount: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfoResponse {
    pub info: ServerInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfo {
    #[serde(default)]
    pub build_version: String,
    #[serde(default)]
    pub server_state: String,
    #[serde(default)]
    pub network_id: Option<u32>,
    #[serde(default)]
    pub complete_ledgers: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_submit_result() {
        let response: SubmitResponse = serde_json::from_value(json!({
            "accepted": true,
            "applied": true,
            "engine_result": "tesSUCCESS",
            "engine_result_code": 0,
            "engine_result_message":
                "The transaction was applied. Only final in a validated ledger.",
            "tx_blob": "1200002280000000",
            "tx_json": {"Account": "r3Z8KLzomveD5mu7tYsuhXDPJTfH91ZzHJ", "hash": "ABCD"}
        }))
        .unwrap();
        assert_eq!(response.engine_result, "tesSUCCESS");
        assert_eq!(response.hash(), Some("ABCD"));
    }

    #[test]
    fn test_parse_tx_result() {
        let response: TxResponse = serde_json::from_value(json!({
            "hash": "ABCD",
            "ledger_index": 56865245,
            "date": 733708800,
            "validated": true,
            "meta": {"TransactionIndex": 3, "TransactionResult": "tecPATH_DRY"}
        }))
        .unwrap();
        assert!(response.validated);
        assert_eq!(response.transaction_result(), Some("tecPATH_DRY"));

        let pending: TxResponse = serde_json::from_value(json!({"hash": "ABCD"})).unwrap();
        assert!(!pending.validated);
        assert_eq!(pending.transaction_result(), None);
    }

    #[test]
    fn test_trust_line_freeze_flags() {
        let line: TrustLine = serde_json::from_value(json!({
            "account": "rpNvHzENX8S2Bgx4dyCEcpqrb912QvRdoz",
            "balance": "-100",
            "currency": "FOO",
            "limit": "0",
            "limit_peer": "10000000000",
            "freeze": true
        }))
        .unwrap();
        assert!(line.is_frozen());
    }
}
