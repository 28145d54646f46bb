//! Submitting signed transactions and waiting for validation

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::autofill::{autofill, FeeLimits};
use crate::client::{SubmitRequest, SubmitResponse, TxResponse, WebSocketClient};
use crate::codec::{self, SignedTransaction};
use crate::config::NetworkConfig;
use crate::error::LedgerError;
use crate::transaction::Transaction;
use crate::wallet::Wallet;

/// Engine result that means the transaction was applied
pub const TES_SUCCESS: &str = "tesSUCCESS";

/// Seconds between the Unix epoch and the ripple epoch (2000-01-01)
const RIPPLE_EPOCH_OFFSET: i64 = 946_684_800;

/// Engine result classes, by code prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultClass {
    /// `tes`: applied
    Success,
    /// `tec`: included in a ledger, only the fee was claimed
    Claimed,
    /// `tef`: failed locally, cannot succeed as is
    Failure,
    /// `tel`: local error, not relayed
    Local,
    /// `tem`: malformed
    Malformed,
    /// `ter`: may succeed later
    Retry,
    Unknown,
}

impl ResultClass {
    pub fn of(engine_result: &str) -> Self {
        match engine_result.get(..3) {
            Some("tes") => ResultClass::Success,
            Some("tec") => ResultClass::Claimed,
            Some("tef") => ResultClass::Failure,
            Some("tel") => ResultClass::Local,
            Some("tem") => ResultClass::Malformed,
            Some("ter") => ResultClass::Retry,
            _ => ResultClass::Unknown,
        }
    }

    /// The transaction will never reach a validated ledger
    pub fn is_final_rejection(&self) -> bool {
        matches!(
            self,
            ResultClass::Failure | ResultClass::Local | ResultClass::Malformed
        )
    }
}

/// How long to wait for validation
#[derive(Debug, Clone, Copy)]
pub struct SubmitOptions {
    pub poll_interval: Duration,
    pub max_attempts: u32,
    pub fee_limits: FeeLimits,
}

impl SubmitOptions {
    pub fn from_config(config: &NetworkConfig) -> Self {
        Self {
            poll_interval: config.poll_interval,
            max_attempts: config.max_poll_attempts,
            fee_limits: FeeLimits {
                max_fee_drops: config.max_fee_drops,
            },
        }
    }
}

impl Default for SubmitOptions {
    fn default() -> Self {
        Self::from_config(&NetworkConfig::default())
    }
}

/// A transaction accepted for submission (not necessarily validated)
#[derive(Debug, Clone)]
pub struct Submission {
    pub hash: String,
    pub tx_blob: String,
    pub last_ledger_sequence: Option<u32>,
    pub response: SubmitResponse,
}

impl Submission {
    pub fn engine_result(&self) -> &str {
        &self.response.engine_result
    }
}

/// Final (or final-for-now) outcome of a transaction
#[derive(Debug, Clone)]
pub struct TxOutcome {
    pub hash: String,
    pub engine_result: String,
    pub validated: bool,
    pub ledger_index: Option<u32>,
    pub close_time: Option<DateTime<Utc>>,
}

impl TxOutcome {
    pub fn is_success(&self) -> bool {
        self.engine_result == TES_SUCCESS
    }

    fn from_tx(tx: TxResponse) -> Self {
        let engine_result = tx
            .transaction_result()
            .unwrap_or("unknown")
            .to_string();
        Self {
            hash: tx.hash,
            engine_result,
            validated: tx.validated,
            ledger_index: tx.ledger_index,
            close_time: tx.date.and_then(ripple_time_to_datetime),
        }
    }
}

/// Convert seconds since the ripple epoch to UTC
pub fn ripple_time_to_datetime(ripple_time: u32) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(ripple_time as i64 + RIPPLE_EPOCH_OFFSET, 0)
}

/// Submit an already signed transaction
pub async fn submit(
    client: &mut WebSocketClient,
    signed: &SignedTransaction,
) -> Result<SubmitResponse, LedgerError> {
    let response: SubmitResponse = client
        .request(&SubmitRequest::new(signed.tx_blob.clone()))
        .await?;

    log::info!(
        "📨 Submitted {}: {} ({})",
        signed.hash,
        response.engine_result,
        response.engine_result_message
    );
    Ok(response)
}

/// Autofill, sign and submit without waiting for validation
pub async fn sign_and_submit<T: Transaction>(
    client: &mut WebSocketClient,
    mut tx: T,
    wallet: &Wallet,
    options: &SubmitOptions,
) -> Result<Submission, LedgerError> {
    tx.validate()?;
    autofill(client, &mut tx, options.fee_limits).await?;

    let signed = codec::sign(tx.to_json()?, wallet)?;
    let response = submit(client, &signed).await?;

    Ok(Submission {
        hash: signed.hash,
        tx_blob: signed.tx_blob,
        last_ledger_sequence: tx.common().last_ledger_sequence,
        response,
    })
}

/// Autofill, sign, submit and poll until the transaction is validated
///
/// Transactions rejected outright (`tem`, `tef`, `tel`) are returned
/// immediately with `validated == false`.
pub async fn submit_and_wait<T: Transaction>(
    client: &mut WebSocketClient,
    tx: T,
    wallet: &Wallet,
    options: &SubmitOptions,
) -> Result<TxOutcome, LedgerError> {
    let submission = sign_and_submit(client, tx, wallet, options).await?;

    if ResultClass::of(submission.engine_result()).is_final_rejection() {
        log::warn!(
            "⚠️  {} rejected with {}, not waiting for validation",
            submission.hash,
            submission.engine_result()
        );
        return Ok(TxOutcome {
            hash: submission.hash,
            engine_result: submission.response.engine_result,
            validated: false,
            ledger_index: None,
            close_time: None,
        });
    }

    wait_for_validation(
        client,
        &submission.hash,
        submission.last_ledger_sequence,
        options,
    )
    .await
}

/// Poll `tx` until the transaction shows up in a validated ledger
pub async fn wait_for_validation(
    client: &mut WebSocketClient,
    hash: &str,
    last_ledger_sequence: Option<u32>,
    options: &SubmitOptions,
) -> Result<TxOutcome, LedgerError> {
    for attempt in 1..=options.max_attempts {
        tokio::time::sleep(options.poll_interval).await;

        if let Some(outcome) = lookup_validated(client, hash, attempt).await? {
            return Ok(outcome);
        }

        if let Some(last) = last_ledger_sequence {
            let current = client.ledger_current_index().await?;
            // the open ledger is two past the last one that could hold the tx
            if current > last + 1 {
                // it may have been validated in `last` since the lookup above
                if let Some(outcome) = lookup_validated(client, hash, attempt).await? {
                    return Ok(outcome);
                }
                return Err(LedgerError::NotValidated {
                    hash: hash.to_string(),
                    last_ledger_sequence: last,
                });
            }
        }
    }

    Err(LedgerError::NotValidated {
        hash: hash.to_string(),
        last_ledger_sequence: last_ledger_sequence.unwrap_or_default(),
    })
}

/// One `tx` lookup; `None` while the transaction is unknown or unvalidated
async fn lookup_validated(
    client: &mut WebSocketClient,
    hash: &str,
    attempt: u32,
) -> Result<Option<TxOutcome>, LedgerError> {
    match client.tx(hash).await {
        Ok(tx) if tx.validated => {
            let outcome = TxOutcome::from_tx(tx);
            log::info!(
                "✅ {} validated in ledger {:?}: {}",
                outcome.hash,
                outcome.ledger_index,
                outcome.engine_result
            );
            Ok(Some(outcome))
        }
        Ok(_) => {
            log::debug!("{} not validated yet (attempt {})", hash, attempt);
            Ok(None)
        }
        Err(e) if e.is_rpc_error("txnNotFound") => {
            log::debug!("{} not found yet (attempt {})", hash, attempt);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_classes() {
        assert_eq!(ResultClass::of("tesSUCCESS"), ResultClass::Success);
        assert_eq!(ResultClass::of("tecPATH_DRY"), ResultClass::Claimed);
        assert_eq!(ResultClass::of("tefPAST_SEQ"), ResultClass::Failure);
        assert_eq!(ResultClass::of("telINSUF_FEE_P"), ResultClass::Local);
        assert_eq!(ResultClass::of("temBAD_AMOUNT"), ResultClass::Malformed);
        assert_eq!(ResultClass::of("terQUEUED"), ResultClass::Retry);
        assert_eq!(ResultClass::of("ok"), ResultClass::Unknown);

        assert!(ResultClass::of("temBAD_FEE").is_final_rejection());
        assert!(!ResultClass::of("tecNO_LINE").is_final_rejection());
        assert!(!ResultClass::of("terPRE_SEQ").is_final_rejection());
    }

    #[test]
    fn test_ripple_epoch_conversion() {
        let start = ripple_time_to_datetime(0).unwrap();
        assert_eq!(start.to_rfc3339(), "2000-01-01T00:00:00+00:00");

        let later = ripple_time_to_datetime(86_400).unwrap();
        assert_eq!(later.to_rfc3339(), "2000-01-02T00:00:00+00:00");
    }
}
