//! Fill in the fields a transaction needs before signing
//!
//! Every value comes from the ledger at the moment of the call; no
//! sequence numbers are tracked locally between transactions.

use crate::client::WebSocketClient;
use crate::config::LEDGER_OFFSET;
use crate::error::LedgerError;
use crate::transaction::Transaction;

/// Fee bounds applied to the server's open ledger fee
#[derive(Debug, Clone, Copy)]
pub struct FeeLimits {
    pub max_fee_drops: u64,
}

impl Default for FeeLimits {
    fn default() -> Self {
        Self {
            max_fee_drops: 2_000_000,
        }
    }
}

/// Set `Sequence`, `Fee` and `LastLedgerSequence` where they are missing
pub async fn autofill<T: Transaction>(
    client: &mut WebSocketClient,
    tx: &mut T,
    limits: FeeLimits,
) -> Result<(), LedgerError> {
    let account = tx.common().account.clone();

    if tx.common().sequence.is_none() {
        let info = client.account_info(&account).await?;
        log::debug!("{} next sequence {}", account, info.account_data.sequence);
        tx.common_mut().sequence = Some(info.account_data.sequence);
    }

    if tx.common().fee.is_none() {
        let fee = client.fee().await?;
        let drops = choose_fee(&fee.drops.base_fee, &fee.drops.open_ledger_fee, limits)?;
        tx.common_mut().fee = Some(drops.to_string());
    }

    if tx.common().last_ledger_sequence.is_none() {
        let current = client.ledger_current_index().await?;
        tx.common_mut().last_ledger_sequence = Some(current + LEDGER_OFFSET);
    }

    log::debug!(
        "Autofilled {}: sequence={:?} fee={:?} last_ledger_sequence={:?}",
        tx.transaction_type(),
        tx.common().sequence,
        tx.common().fee,
        tx.common().last_ledger_sequence
    );
    Ok(())
}

/// Open ledger fee, never below the base fee and never above the cap
pub fn choose_fee(
    base_fee: &str,
    open_ledger_fee: &str,
    limits: FeeLimits,
) -> Result<u64, LedgerError> {
    let parse = |name: &str, raw: &str| {
        raw.parse::<u64>().map_err(|_| {
            LedgerError::InvalidResponse(format!("Fee field {} is not drops: '{}'", name, raw))
        })
    };
    let base = parse("base_fee", base_fee)?;
    let open = parse("open_ledger_fee", open_ledger_fee)?;

    let fee = open.max(base);
    if fee > limits.max_fee_drops {
        log::warn!(
            "⚠️  Open ledger fee {} drops exceeds the cap, using {}",
            fee,
            limits.max_fee_drops
        );
    }
    Ok(fee.min(limits.max_fee_drops))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choose_fee() {
        let limits = FeeLimits::default();
        assert_eq!(choose_fee("10", "10", limits).unwrap(), 10);
        assert_eq!(choose_fee("10", "5000", limits).unwrap(), 5000);
        assert_eq!(choose_fee("10", "1", limits).unwrap(), 10);
        assert_eq!(
            choose_fee("10", "90000000", FeeLimits { max_fee_drops: 1000 }).unwrap(),
            1000
        );
        assert!(choose_fee("ten", "10", limits).is_err());
    }
}
