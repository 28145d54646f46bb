//! Send an XRP payment from a seed-derived account
//!
//! The classic walkthrough: derive the sender, build the Payment, encode it
//! for signing, sign, encode the signed transaction and submit the blob.

use std::env;

use crate::autofill::autofill;
use crate::client::{SubmitResponse, WebSocketClient};
use crate::codec;
use crate::config::{env_number, env_optional_number, NetworkConfig};
use crate::error::LedgerError;
use crate::submit::{self, SubmitOptions, TxOutcome};
use crate::transaction::{Amount, Payment, Transaction};
use crate::wallet::Wallet;

/// Sample testnet account (r3Z8KLzomveD5mu7tYsuhXDPJTfH91ZzHJ)
pub const SAMPLE_ACCOUNT_SEED: &str = "sEdSmpmt3DbU42EgsxVrToBqcA6bn3P";
pub const SAMPLE_DESTINATION: &str = "rpNvHzENX8S2Bgx4dyCEcpqrb912QvRdoz";

#[derive(Debug, Clone)]
pub struct PaymentRequest {
    pub seed: String,
    pub destination: String,
    pub amount_drops: u64,
    /// Explicit fee in drops; autofilled when `None`
    pub fee: Option<u64>,
    /// Explicit sequence; read from the ledger when `None`
    pub sequence: Option<u32>,
    /// Poll until the payment is validated instead of stopping at `submit`
    pub wait_for_validation: bool,
}

impl Default for PaymentRequest {
    fn default() -> Self {
        Self {
            seed: SAMPLE_ACCOUNT_SEED.to_string(),
            destination: SAMPLE_DESTINATION.to_string(),
            amount_drops: 20,
            fee: None,
            sequence: None,
            wait_for_validation: false,
        }
    }
}

impl PaymentRequest {
    /// Environment variables (all optional):
    /// - `ACCOUNT_SEED`, `DESTINATION_ADDRESS`
    /// - `PAYMENT_DROPS` (default 20)
    /// - `PAYMENT_FEE`, `PAYMENT_SEQUENCE`
    /// - `PAYMENT_WAIT`: "true" to wait for validation
    pub fn from_env() -> Result<Self, LedgerError> {
        let defaults = Self::default();
        Ok(Self {
            seed: env::var("ACCOUNT_SEED").unwrap_or(defaults.seed),
            destination: env::var("DESTINATION_ADDRESS").unwrap_or(defaults.destination),
            amount_drops: env_number("PAYMENT_DROPS", defaults.amount_drops)?,
            fee: env_optional_number("PAYMENT_FEE")?,
            sequence: env_optional_number("PAYMENT_SEQUENCE")?,
            wait_for_validation: env::var("PAYMENT_WAIT")
                .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        })
    }
}

#[derive(Debug, Clone)]
pub struct PaymentReport {
    pub sender: String,
    pub hash: String,
    pub submit: SubmitResponse,
    /// Set when the request asked to wait for validation
    pub outcome: Option<TxOutcome>,
}

pub async fn send_payment(
    config: &NetworkConfig,
    request: &PaymentRequest,
) -> Result<PaymentReport, LedgerError> {
    let wallet = Wallet::from_seed(&request.seed)?;
    log::info!("👤 Sender Account {}", wallet.classic_address);

    let mut payment = Payment::new(
        wallet.classic_address.clone(),
        request.destination.clone(),
        Amount::drops(request.amount_drops),
    );
    if let Some(fee) = request.fee {
        payment = payment.with_fee(fee);
    }
    if let Some(sequence) = request.sequence {
        payment = payment.with_sequence(sequence);
    }
    payment.validate()?;

    let mut client = WebSocketClient::from_config(config).await?;
    let options = SubmitOptions::from_config(config);
    autofill(&mut client, &mut payment, options.fee_limits).await?;

    let signed = codec::sign(payment.to_json()?, &wallet)?;
    let response = submit::submit(&mut client, &signed).await?;
    log::info!(
        "🧾 Tx Result {} ({}) hash {}",
        response.engine_result, response.engine_result_message, signed.hash
    );

    let outcome = if request.wait_for_validation {
        let outcome = submit::wait_for_validation(
            &mut client,
            &signed.hash,
            payment.common.last_ledger_sequence,
            &options,
        )
        .await?;
        log::info!(
            "✅ Validated in ledger {:?}: {}",
            outcome.ledger_index, outcome.engine_result
        );
        Some(outcome)
    } else {
        None
    };

    client.close().await?;

    Ok(PaymentReport {
        sender: wallet.classic_address,
        hash: signed.hash,
        submit: response,
        outcome,
    })
}
