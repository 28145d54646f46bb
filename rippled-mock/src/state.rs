/// In-memory ledger state behind the mock server
///
/// The mock does not decode transactions. Tests script the engine results
/// that consecutive submissions receive and the trust lines `account_lines`
/// reports; everything else (sequences, fees, ledger indexes) is tracked
/// here so client-side autofill and polling see realistic answers.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use serde_json::Value;
use sha2::{Digest, Sha512};

pub type SharedLedger = Arc<Mutex<MockLedger>>;

/// XRP handed out per faucet request, in drops
pub const FAUCET_DROPS: u64 = 1_000 * 1_000_000;

#[derive(Debug, Clone)]
pub struct MockAccount {
    pub balance: u64,
    pub sequence: u32,
}

#[derive(Debug, Clone)]
pub struct MockTransaction {
    pub engine_result: String,
    /// Lookups left before the transaction shows as validated
    pub pending_lookups: u32,
    pub ledger_index: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct FaucetWallet {
    pub seed: String,
    pub address: String,
}

#[derive(Debug)]
pub struct MockLedger {
    pub ledger_index: u32,
    pub base_fee: u64,
    pub open_ledger_fee: u64,
    pub accounts: HashMap<String, MockAccount>,
    pub account_lines: HashMap<String, Vec<Value>>,
    /// Answers for the next `account_lines` requests, ahead of `account_lines`
    pub scripted_lines: VecDeque<Vec<Value>>,
    pub transactions: HashMap<String, MockTransaction>,
    /// Engine results for the next submissions, in order; `tesSUCCESS` when empty
    pub scripted_results: VecDeque<String>,
    pub faucet_wallets: VecDeque<FaucetWallet>,
    /// `tx` lookups a transaction stays pending for
    pub validation_delay: u32,
    /// Never validate submitted transactions
    pub stalled: bool,
    /// Every command received, in order
    pub requests: Vec<Value>,
    /// Every blob submitted, in order
    pub submitted: Vec<String>,
}

impl Default for MockLedger {
    fn default() -> Self {
        Self {
            ledger_index: 1000,
            base_fee: 10,
            open_ledger_fee: 10,
            accounts: HashMap::new(),
            account_lines: HashMap::new(),
            scripted_lines: VecDeque::new(),
            transactions: HashMap::new(),
            scripted_results: VecDeque::new(),
            faucet_wallets: VecDeque::new(),
            validation_delay: 1,
            stalled: false,
            requests: Vec::new(),
            submitted: Vec::new(),
        }
    }
}

impl MockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_shared(self) -> SharedLedger {
        Arc::new(Mutex::new(self))
    }

    pub fn with_account(mut self, address: &str, balance: u64, sequence: u32) -> Self {
        self.accounts
            .insert(address.to_string(), MockAccount { balance, sequence });
        self
    }

    pub fn with_faucet_wallet(mut self, seed: &str, address: &str) -> Self {
        self.faucet_wallets.push_back(FaucetWallet {
            seed: seed.to_string(),
            address: address.to_string(),
        });
        self
    }

    pub fn with_results(mut self, results: &[&str]) -> Self {
        self.scripted_results
            .extend(results.iter().map(|r| r.to_string()));
        self
    }

    /// Lines returned by `account_lines` for `account`
    pub fn set_account_lines(&mut self, account: &str, lines: Vec<Value>) {
        self.account_lines.insert(account.to_string(), lines);
    }

    pub fn push_account_lines(&mut self, lines: Vec<Value>) {
        self.scripted_lines.push_back(lines);
    }

    /// Lines for `account`, restricted to `peer` when given
    pub fn lines_for(&mut self, account: &str, peer: Option<&str>) -> Vec<Value> {
        let lines = match self.scripted_lines.pop_front() {
            Some(lines) => lines,
            None => self.account_lines.get(account).cloned().unwrap_or_default(),
        };
        match peer {
            Some(peer) => lines
                .into_iter()
                .filter(|line| line.get("account").and_then(Value::as_str) == Some(peer))
                .collect(),
            None => lines,
        }
    }

    /// Commands received so far with the given name
    pub fn commands(&self, command: &str) -> Vec<&Value> {
        self.requests
            .iter()
            .filter(|r| r.get("command").and_then(Value::as_str) == Some(command))
            .collect()
    }

    pub fn fund(&mut self, address: &str, drops: u64) {
        let sequence = self.ledger_index;
        self.accounts
            .entry(address.to_string())
            .and_modify(|account| account.balance += drops)
            .or_insert(MockAccount {
                balance: drops,
                sequence,
            });
    }

    /// Record a submission and return (hash, engine result)
    pub fn submit(&mut self, tx_blob: &str) -> Result<(String, String), String> {
        let hash = transaction_hash(tx_blob)?;
        let engine_result = self
            .scripted_results
            .pop_front()
            .unwrap_or_else(|| "tesSUCCESS".to_string());

        self.submitted.push(tx_blob.to_string());

        // tem/tef/tel results never make it into a ledger
        if !matches!(engine_result.get(..3), Some("tem") | Some("tef") | Some("tel")) {
            self.transactions.insert(
                hash.clone(),
                MockTransaction {
                    engine_result: engine_result.clone(),
                    pending_lookups: self.validation_delay,
                    ledger_index: None,
                },
            );
        }

        log::debug!("Mock submit {} -> {}", hash, engine_result);
        Ok((hash, engine_result))
    }

    /// Each lookup closes a ledger; returns None for unknown hashes
    pub fn lookup(&mut self, hash: &str) -> Option<MockTransaction> {
        self.ledger_index += 1;
        let ledger_index = self.ledger_index;
        let stalled = self.stalled;

        let tx = self.transactions.get_mut(&hash.to_uppercase())?;
        if stalled {
            return Some(tx.clone());
        }
        if tx.pending_lookups > 0 {
            tx.pending_lookups -= 1;
        } else if tx.ledger_index.is_none() {
            tx.ledger_index = Some(ledger_index);
        }
        Some(tx.clone())
    }
}

/// SHA-512Half of `TXN\0 || blob`
pub fn transaction_hash(tx_blob: &str) -> Result<String, String> {
    let blob = hex::decode(tx_blob).map_err(|e| format!("tx_blob is not hex: {}", e))?;
    let mut hasher = Sha512::new();
    hasher.update([0x54, 0x58, 0x4E, 0x00]);
    hasher.update(&blob);
    Ok(hex::encode_upper(&hasher.finalize()[..32]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scripted_results_in_order() {
        let mut ledger = MockLedger::new().with_results(&["tecPATH_DRY"]);
        let (_, first) = ledger.submit("1200").unwrap();
        let (_, second) = ledger.submit("120000").unwrap();
        assert_eq!(first, "tecPATH_DRY");
        assert_eq!(second, "tesSUCCESS");
        assert_eq!(ledger.submitted.len(), 2);
    }

    #[test]
    fn test_validation_after_delay() {
        let mut ledger = MockLedger::new();
        let (hash, _) = ledger.submit("1200").unwrap();

        let pending = ledger.lookup(&hash).unwrap();
        assert!(pending.ledger_index.is_none());

        let validated = ledger.lookup(&hash).unwrap();
        assert_eq!(validated.ledger_index, Some(1002));
    }

    #[test]
    fn test_malformed_never_stored() {
        let mut ledger = MockLedger::new().with_results(&["temBAD_FEE"]);
        let (hash, _) = ledger.submit("1200").unwrap();
        assert!(ledger.lookup(&hash).is_none());
    }

    #[test]
    fn test_scripted_lines_before_static() {
        let mut ledger = MockLedger::new();
        ledger.set_account_lines("rIssuer", vec![json!({"account": "rHolder", "freeze": false})]);
        ledger.push_account_lines(vec![
            json!({"account": "rHolder", "freeze": true}),
            json!({"account": "rOther", "freeze": false}),
        ]);

        let scripted = ledger.lines_for("rIssuer", Some("rHolder"));
        assert_eq!(scripted, vec![json!({"account": "rHolder", "freeze": true})]);

        let fallback = ledger.lines_for("rIssuer", None);
        assert_eq!(fallback[0]["freeze"], json!(false));
    }

    #[test]
    fn test_fund_creates_then_tops_up() {
        let mut ledger = MockLedger::new();
        ledger.fund("rAddress", 10);
        ledger.fund("rAddress", 5);
        assert_eq!(ledger.accounts["rAddress"].balance, 15);
        assert_eq!(ledger.accounts["rAddress"].sequence, 1000);
    }
}
