//! Amounts and currency codes

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::wallet::validate_address;

/// Drops per XRP
pub const DROPS_PER_XRP: u64 = 1_000_000;

/// Either XRP in drops or an issued-currency amount
///
/// XRP amounts serialize as a string of drops; issued amounts as
/// `{"currency", "issuer", "value"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Drops(String),
    Issued(IssuedCurrencyAmount),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssuedCurrencyAmount {
    pub currency: String,
    pub issuer: String,
    pub value: String,
}

impl Amount {
    pub fn drops(drops: u64) -> Self {
        Amount::Drops(drops.to_string())
    }

    /// Whole XRP; fails when the drops do not fit in a `u64`
    pub fn xrp(xrp: u64) -> Result<Self, LedgerError> {
        xrp.checked_mul(DROPS_PER_XRP)
            .map(Amount::drops)
            .ok_or_else(|| {
                LedgerError::InvalidTransaction(format!("{} XRP overflows the drops range", xrp))
            })
    }

    /// Issued amount; the currency code is normalized (see [`currency_code`])
    pub fn issued(
        currency: &str,
        issuer: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self, LedgerError> {
        Ok(Amount::Issued(IssuedCurrencyAmount::new(
            currency, issuer, value,
        )?))
    }

    pub fn is_xrp(&self) -> bool {
        matches!(self, Amount::Drops(_))
    }

    pub fn validate(&self) -> Result<(), LedgerError> {
        match self {
            Amount::Drops(drops) => {
                let parsed: u64 = drops.parse().map_err(|_| {
                    LedgerError::InvalidTransaction(format!("Invalid drops amount '{}'", drops))
                })?;
                if parsed == 0 {
                    return Err(LedgerError::InvalidTransaction(
                        "XRP amount must be greater than zero".to_string(),
                    ));
                }
                Ok(())
            }
            Amount::Issued(issued) => issued.validate(),
        }
    }
}

impl IssuedCurrencyAmount {
    pub fn new(
        currency: &str,
        issuer: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self, LedgerError> {
        Ok(Self {
            currency: currency_code(currency)?,
            issuer: issuer.into(),
            value: value.into(),
        })
    }

    pub fn validate(&self) -> Result<(), LedgerError> {
        currency_code(&self.currency)?;
        validate_address(&self.issuer)?;
        let value: f64 = self.value.parse().map_err(|_| {
            LedgerError::InvalidTransaction(format!("Invalid token value '{}'", self.value))
        })?;
        if !value.is_finite() || value < 0.0 {
            return Err(LedgerError::InvalidTransaction(format!(
                "Token value must be a non-negative number, got '{}'",
                self.value
            )));
        }
        Ok(())
    }
}

/// Normalize a currency code to what the ledger accepts
///
/// - three ASCII characters (other than `XRP`) are kept as they are
/// - 40 hex characters are upper-cased
/// - 4 to 20 ASCII characters become the 40 hex form, zero padded
pub fn currency_code(code: &str) -> Result<String, LedgerError> {
    let invalid = |reason: &str| {
        LedgerError::InvalidTransaction(format!("Invalid currency code '{}': {}", code, reason))
    };

    if code.len() == 40 && code.chars().all(|c| c.is_ascii_hexdigit()) {
        if code.starts_with("00") {
            return Err(invalid("hex codes must not start with a zero byte"));
        }
        return Ok(code.to_uppercase());
    }

    if !code.chars().all(|c| c.is_ascii_graphic()) {
        return Err(invalid("only printable ASCII is allowed"));
    }

    match code.len() {
        3 if code.eq_ignore_ascii_case("XRP") => Err(invalid("XRP is not an issued currency")),
        3 => Ok(code.to_string()),
        4..=20 => {
            let mut bytes = code.as_bytes().to_vec();
            bytes.resize(20, 0);
            Ok(hex::encode_upper(bytes))
        }
        _ => Err(invalid("expected 3 to 20 characters or 40 hex digits")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ISSUER: &str = "rpNvHzENX8S2Bgx4dyCEcpqrb912QvRdoz";

    #[test]
    fn test_amount_json_shapes() {
        assert_eq!(serde_json::to_value(Amount::drops(20)).unwrap(), json!("20"));
        assert_eq!(serde_json::to_value(Amount::xrp(2).unwrap()).unwrap(), json!("2000000"));
        assert!(matches!(
            Amount::xrp(u64::MAX / 1_000),
            Err(LedgerError::InvalidTransaction(_))
        ));

        let issued = Amount::issued("FOO", ISSUER, "100").unwrap();
        assert_eq!(
            serde_json::to_value(&issued).unwrap(),
            json!({"currency": "FOO", "issuer": ISSUER, "value": "100"})
        );

        let parsed: Amount =
            serde_json::from_value(json!({"currency": "FOO", "issuer": ISSUER, "value": "1.5"}))
                .unwrap();
        assert!(!parsed.is_xrp());
        assert!(serde_json::from_value::<Amount>(json!("12")).unwrap().is_xrp());
    }

    #[test]
    fn test_currency_codes() {
        assert_eq!(currency_code("FOO").unwrap(), "FOO");
        assert_eq!(
            currency_code("HOTTOKEN").unwrap(),
            "484F54544F4B454E000000000000000000000000"
        );
        assert_eq!(
            currency_code("015841551A748AD2C1F76FF6ECB0CCCD00000000").unwrap(),
            "015841551A748AD2C1F76FF6ECB0CCCD00000000"
        );
        assert!(currency_code("XRP").is_err());
        assert!(currency_code("xrp").is_err());
        assert!(currency_code("AB").is_err());
        assert!(currency_code("A B").is_err());
        assert!(currency_code("THIS-NAME-IS-FAR-TOO-LONG").is_err());
    }

    #[test]
    fn test_amount_validation() {
        assert!(Amount::drops(1).validate().is_ok());
        assert!(Amount::drops(0).validate().is_err());
        assert!(Amount::Drops("1.5".to_string()).validate().is_err());

        assert!(Amount::issued("FOO", ISSUER, "0").unwrap().validate().is_ok());
        assert!(Amount::issued("FOO", ISSUER, "-1").unwrap().validate().is_err());
        assert!(Amount::issued("FOO", "rNotAnAddress", "1").unwrap().validate().is_err());
    }
}
