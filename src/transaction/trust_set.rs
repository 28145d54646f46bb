use serde::{Deserialize, Serialize};

use super::flags::{TF_CLEAR_FREEZE, TF_CLEAR_NO_RIPPLE, TF_SET_FREEZE, TF_SET_NO_RIPPLE};
use super::{CommonFields, IssuedCurrencyAmount, Transaction};
use crate::error::LedgerError;

/// Creates or modifies a trust line
///
/// Sent by a holder, `LimitAmount.issuer` is the token issuer. Sent by the
/// issuer with `tfSetFreeze`/`tfClearFreeze`, `LimitAmount.issuer` is the
/// holder whose line is (un)frozen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TrustSet {
    #[serde(flatten)]
    pub common: CommonFields,
    pub limit_amount: IssuedCurrencyAmount,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_in: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_out: Option<u32>,
}

impl TrustSet {
    pub fn new(account: impl Into<String>, limit_amount: IssuedCurrencyAmount) -> Self {
        Self {
            common: CommonFields::new(account),
            limit_amount,
            quality_in: None,
            quality_out: None,
        }
    }

    /// Issuer-side freeze of the line shared with `holder`
    pub fn freeze(
        issuer: impl Into<String>,
        holder: impl Into<String>,
        currency: &str,
    ) -> Result<Self, LedgerError> {
        let limit = IssuedCurrencyAmount::new(currency, holder, "0")?;
        Ok(Self::new(issuer, limit).with_flags(TF_SET_FREEZE))
    }

    /// Issuer-side unfreeze of the line shared with `holder`
    pub fn unfreeze(
        issuer: impl Into<String>,
        holder: impl Into<String>,
        currency: &str,
    ) -> Result<Self, LedgerError> {
        let limit = IssuedCurrencyAmount::new(currency, holder, "0")?;
        Ok(Self::new(issuer, limit).with_flags(TF_CLEAR_FREEZE))
    }
}

impl Transaction for TrustSet {
    fn transaction_type(&self) -> &'static str {
        "TrustSet"
    }

    fn common(&self) -> &CommonFields {
        &self.common
    }

    fn common_mut(&mut self) -> &mut CommonFields {
        &mut self.common
    }

    fn validate(&self) -> Result<(), LedgerError> {
        self.common.validate()?;
        self.limit_amount.validate()?;

        if self.limit_amount.issuer == self.common.account {
            return Err(LedgerError::InvalidTransaction(
                "A trust line cannot point at the sending account".to_string(),
            ));
        }

        let flags = self.common.flags;
        if flags & TF_SET_FREEZE != 0 && flags & TF_CLEAR_FREEZE != 0 {
            return Err(LedgerError::InvalidTransaction(
                "tfSetFreeze and tfClearFreeze cannot be combined".to_string(),
            ));
        }
        if flags & TF_SET_NO_RIPPLE != 0 && flags & TF_CLEAR_NO_RIPPLE != 0 {
            return Err(LedgerError::InvalidTransaction(
                "tfSetNoRipple and tfClearNoRipple cannot be combined".to_string(),
            ));
        }
        Ok(())
    }
}
