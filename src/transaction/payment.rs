use serde::{Deserialize, Serialize};

use super::{Amount, CommonFields, Transaction};
use crate::error::LedgerError;
use crate::wallet::validate_address;

/// Moves XRP or an issued token from `Account` to `Destination`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Payment {
    #[serde(flatten)]
    pub common: CommonFields,
    pub amount: Amount,
    pub destination: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_tag: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub send_max: Option<Amount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deliver_min: Option<Amount>,
}

impl Payment {
    pub fn new(account: impl Into<String>, destination: impl Into<String>, amount: Amount) -> Self {
        Self {
            common: CommonFields::new(account),
            amount,
            destination: destination.into(),
            destination_tag: None,
            send_max: None,
            deliver_min: None,
        }
    }

    pub fn with_destination_tag(mut self, tag: u32) -> Self {
        self.destination_tag = Some(tag);
        self
    }

    pub fn with_send_max(mut self, send_max: Amount) -> Self {
        self.send_max = Some(send_max);
        self
    }
}

impl Transaction for Payment {
    fn transaction_type(&self) -> &'static str {
        "Payment"
    }

    fn common(&self) -> &CommonFields {
        &self.common
    }

    fn common_mut(&mut self) -> &mut CommonFields {
        &mut self.common
    }

    fn validate(&self) -> Result<(), LedgerError> {
        self.common.validate()?;
        validate_address(&self.destination)?;
        self.amount.validate()?;

        if self.amount.is_xrp() && self.destination == self.common.account {
            return Err(LedgerError::InvalidTransaction(
                "An XRP payment cannot be sent to the sending account".to_string(),
            ));
        }
        if let Some(ref send_max) = self.send_max {
            send_max.validate()?;
        }
        if let Some(ref deliver_min) = self.deliver_min {
            deliver_min.validate()?;
        }
        Ok(())
    }
}
