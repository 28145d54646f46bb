use serde::{Deserialize, Serialize};

use super::flags::AccountSetFlag;
use super::{CommonFields, Transaction};
use crate::error::LedgerError;

const MIN_TRANSFER_RATE: u32 = 1_000_000_000;
const MAX_TRANSFER_RATE: u32 = 2_000_000_000;
const MAX_DOMAIN_BYTES: usize = 256;

/// Changes account settings (flags, domain, transfer rate, tick size)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccountSet {
    #[serde(flatten)]
    pub common: CommonFields,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set_flag: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clear_flag: Option<u32>,
    /// Hex-encoded domain name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer_rate: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tick_size: Option<u8>,
}

impl AccountSet {
    pub fn new(account: impl Into<String>) -> Self {
        Self {
            common: CommonFields::new(account),
            set_flag: None,
            clear_flag: None,
            domain: None,
            transfer_rate: None,
            tick_size: None,
        }
    }

    pub fn set_flag(mut self, flag: AccountSetFlag) -> Self {
        self.set_flag = Some(flag.value());
        self
    }

    pub fn clear_flag(mut self, flag: AccountSetFlag) -> Self {
        self.clear_flag = Some(flag.value());
        self
    }

    /// Domain as plain text; stored hex encoded
    pub fn domain(mut self, domain: &str) -> Self {
        self.domain = Some(hex::encode_upper(domain.to_lowercase()));
        self
    }

    /// Transfer fee in billionths (1_000_000_000 = no fee, 0 clears the setting)
    pub fn transfer_rate(mut self, rate: u32) -> Self {
        self.transfer_rate = Some(rate);
        self
    }

    /// Significant digits for order book exchange rates (0 clears the setting)
    pub fn tick_size(mut self, tick_size: u8) -> Self {
        self.tick_size = Some(tick_size);
        self
    }
}

impl Transaction for AccountSet {
    fn transaction_type(&self) -> &'static str {
        "AccountSet"
    }

    fn common(&self) -> &CommonFields {
        &self.common
    }

    fn common_mut(&mut self) -> &mut CommonFields {
        &mut self.common
    }

    fn validate(&self) -> Result<(), LedgerError> {
        self.common.validate()?;

        if self.set_flag.is_some() && self.set_flag == self.clear_flag {
            return Err(LedgerError::InvalidTransaction(
                "SetFlag and ClearFlag must differ".to_string(),
            ));
        }
        if let Some(rate) = self.transfer_rate {
            if rate != 0 && !(MIN_TRANSFER_RATE..=MAX_TRANSFER_RATE).contains(&rate) {
                return Err(LedgerError::InvalidTransaction(format!(
                    "TransferRate must be 0 or between {} and {}, got {}",
                    MIN_TRANSFER_RATE, MAX_TRANSFER_RATE, rate
                )));
            }
        }
        if let Some(tick) = self.tick_size {
            if tick != 0 && !(3..=15).contains(&tick) {
                return Err(LedgerError::InvalidTransaction(format!(
                    "TickSize must be 0 or between 3 and 15, got {}",
                    tick
                )));
            }
        }
        if let Some(ref domain) = self.domain {
            if domain.len() / 2 > MAX_DOMAIN_BYTES {
                return Err(LedgerError::InvalidTransaction(format!(
                    "Domain is longer than {} bytes",
                    MAX_DOMAIN_BYTES
                )));
            }
        }
        Ok(())
    }
}
