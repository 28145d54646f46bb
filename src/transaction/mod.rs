//! Transaction descriptions
//!
//! Each transaction type is a typed struct that flattens into the JSON map
//! the SDK's binary codec consumes. Fields that autofill or signing add
//! later (`Fee`, `Sequence`, `LastLedgerSequence`, `SigningPubKey`) are
//! optional until then.

pub mod account_set;
pub mod amount;
pub mod flags;
pub mod payment;
pub mod trust_set;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::LedgerError;
use crate::wallet::validate_address;

pub use account_set::AccountSet;
pub use amount::{currency_code, Amount, IssuedCurrencyAmount};
pub use flags::AccountSetFlag;
pub use payment::Payment;
pub use trust_set::TrustSet;

/// Fields shared by every transaction type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CommonFields {
    pub account: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_ledger_sequence: Option<u32>,
    pub flags: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signing_pub_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memos: Option<Vec<MemoWrapper>>,
}

impl CommonFields {
    pub fn new(account: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.account.is_empty() {
            return Err(LedgerError::InvalidTransaction(
                "Account is required".to_string(),
            ));
        }
        validate_address(&self.account)?;
        if let Some(ref fee) = self.fee {
            fee.parse::<u64>().map_err(|_| {
                LedgerError::InvalidTransaction(format!("Fee must be drops, got '{}'", fee))
            })?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoWrapper {
    #[serde(rename = "Memo")]
    pub memo: Memo,
}

/// Memo fields are hex encoded on the ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Memo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo_data: Option<String>,
}

impl MemoWrapper {
    /// Memo from plain text; both parts are hex encoded
    pub fn text(memo_type: &str, memo_data: &str) -> Self {
        Self {
            memo: Memo {
                memo_type: Some(hex::encode_upper(memo_type)),
                memo_data: Some(hex::encode_upper(memo_data)),
            },
        }
    }
}

/// A transaction type that can be autofilled, signed and submitted
pub trait Transaction: Serialize {
    /// Value of the `TransactionType` field
    fn transaction_type(&self) -> &'static str;

    fn common(&self) -> &CommonFields;

    fn common_mut(&mut self) -> &mut CommonFields;

    /// Type-specific checks; implementations call `common().validate()`
    fn validate(&self) -> Result<(), LedgerError> {
        self.common().validate()
    }

    /// Flatten into the JSON map the binary codec expects
    fn to_json(&self) -> Result<Value, LedgerError> {
        let mut value = serde_json::to_value(self)?;
        let fields = value.as_object_mut().ok_or_else(|| {
            LedgerError::InvalidTransaction(
                "Transaction did not serialize to an object".to_string(),
            )
        })?;
        fields.insert(
            "TransactionType".to_string(),
            Value::String(self.transaction_type().to_string()),
        );
        Ok(value)
    }

    fn with_fee(mut self, drops: u64) -> Self
    where
        Self: Sized,
    {
        self.common_mut().fee = Some(drops.to_string());
        self
    }

    fn with_sequence(mut self, sequence: u32) -> Self
    where
        Self: Sized,
    {
        self.common_mut().sequence = Some(sequence);
        self
    }

    fn with_flags(mut self, flags: u32) -> Self
    where
        Self: Sized,
    {
        self.common_mut().flags |= flags;
        self
    }

    fn with_memo(mut self, memo: MemoWrapper) -> Self
    where
        Self: Sized,
    {
        self.common_mut().memos.get_or_insert_with(Vec::new).push(memo);
        self
    }
}
