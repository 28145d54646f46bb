//! Issue a token, freeze the distributor's trust line and unfreeze it again
//!
//! Roles:
//! - cold wallet: the issuer
//! - hot wallet: the distributor holding issued tokens
//! - customer: a second holder the hot wallet pays
//!
//! Every step is one transaction with one expected engine result. The first
//! mismatch stops the run; nothing is retried.

use std::env;

use crate::client::WebSocketClient;
use crate::config::NetworkConfig;
use crate::error::LedgerError;
use crate::faucet::FaucetClient;
use crate::submit::{submit_and_wait, SubmitOptions, TxOutcome, TES_SUCCESS};
use crate::transaction::{
    currency_code, AccountSet, AccountSetFlag, Amount, IssuedCurrencyAmount, Payment, Transaction,
    TrustSet,
};
use crate::wallet::Wallet;

/// A payment across a frozen line finds no path
pub const TEC_PATH_DRY: &str = "tecPATH_DRY";

#[derive(Debug, Clone)]
pub struct FreezeSettings {
    pub currency: String,
    /// Tokens the issuer sends to the hot wallet
    pub issue_amount: String,
    /// Tokens the hot wallet sends to the customer
    pub customer_amount: String,
    /// Trust line limit set by both holders
    pub trust_limit: String,
    pub domain: String,
}

impl Default for FreezeSettings {
    fn default() -> Self {
        Self {
            currency: "FOO".to_string(),
            issue_amount: "3800".to_string(),
            customer_amount: "100".to_string(),
            trust_limit: "10000000000".to_string(),
            domain: "example.com".to_string(),
        }
    }
}

impl FreezeSettings {
    /// `TOKEN_CURRENCY`, `TOKEN_ISSUE_AMOUNT`, `TOKEN_DOMAIN` override the defaults
    pub fn from_env() -> Result<Self, LedgerError> {
        let defaults = Self::default();
        let settings = Self {
            currency: env::var("TOKEN_CURRENCY").unwrap_or(defaults.currency),
            issue_amount: env::var("TOKEN_ISSUE_AMOUNT").unwrap_or(defaults.issue_amount),
            domain: env::var("TOKEN_DOMAIN").unwrap_or(defaults.domain),
            ..defaults
        };
        currency_code(&settings.currency)?;
        check_token_amount("TOKEN_ISSUE_AMOUNT", &settings.issue_amount)?;
        Ok(settings)
    }
}

/// Token amounts must be positive decimal numbers
fn check_token_amount(key: &str, raw: &str) -> Result<(), LedgerError> {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Ok(()),
        _ => Err(LedgerError::Config(format!(
            "Invalid {}='{}': expected a positive number",
            key, raw
        ))),
    }
}

/// One submitted step and what the ledger said about it
#[derive(Debug, Clone)]
pub struct StepReport {
    pub step: String,
    pub hash: String,
    pub engine_result: String,
    pub ledger_index: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct FreezeReport {
    pub cold_address: String,
    pub hot_address: String,
    pub customer_address: String,
    pub steps: Vec<StepReport>,
}

pub struct FreezeWorkflow {
    client: WebSocketClient,
    faucet: FaucetClient,
    options: SubmitOptions,
    settings: FreezeSettings,
    steps: Vec<StepReport>,
}

impl FreezeWorkflow {
    pub async fn connect(
        config: &NetworkConfig,
        settings: FreezeSettings,
    ) -> Result<Self, LedgerError> {
        let faucet = FaucetClient::from_config(config)?;
        let client = WebSocketClient::from_config(config).await?;
        Ok(Self {
            client,
            faucet,
            options: SubmitOptions::from_config(config),
            settings,
            steps: Vec::new(),
        })
    }

    /// Run every step in order, stopping at the first unexpected result
    pub async fn run(mut self) -> Result<FreezeReport, LedgerError> {
        log::info!("🚰 Funding cold, hot and customer wallets...");
        let cold = self.faucet.fund_new_wallet(&mut self.client).await?.wallet;
        let hot = self.faucet.fund_new_wallet(&mut self.client).await?.wallet;
        let customer = self.faucet.fund_new_wallet(&mut self.client).await?.wallet;
        log::info!("   cold:     {}", cold.classic_address);
        log::info!("   hot:      {}", hot.classic_address);
        log::info!("   customer: {}", customer.classic_address);

        let currency = currency_code(&self.settings.currency)?;

        log::info!("⚙️  Configuring issuer settings...");
        let cold_settings = AccountSet::new(cold.classic_address.clone())
            .set_flag(AccountSetFlag::DefaultRipple)
            .transfer_rate(0)
            .tick_size(5)
            .domain(&self.settings.domain);
        self.step("configure cold wallet", cold_settings, &cold, TES_SUCCESS)
            .await?;

        log::info!("⚙️  Configuring hot wallet settings...");
        let require_auth =
            AccountSet::new(hot.classic_address.clone()).set_flag(AccountSetFlag::RequireAuth);
        self.step("hot wallet require auth", require_auth, &hot, TES_SUCCESS)
            .await?;
        let disallow_xrp =
            AccountSet::new(hot.classic_address.clone()).set_flag(AccountSetFlag::DisallowXrp);
        self.step("hot wallet disallow XRP", disallow_xrp, &hot, TES_SUCCESS)
            .await?;

        log::info!("🤝 Creating trust lines...");
        for (name, holder) in [("hot", &hot), ("customer", &customer)] {
            let limit = IssuedCurrencyAmount::new(
                &currency,
                cold.classic_address.clone(),
                self.settings.trust_limit.clone(),
            )?;
            let trust_set = TrustSet::new(holder.classic_address.clone(), limit);
            self.step(&format!("{} trust line", name), trust_set, holder, TES_SUCCESS)
                .await?;
        }

        log::info!(
            "🪙 Issuing {} {} to the hot wallet...",
            self.settings.issue_amount,
            currency
        );
        let issued = Amount::issued(
            &currency,
            cold.classic_address.clone(),
            self.settings.issue_amount.clone(),
        )?;
        let issue = Payment::new(
            cold.classic_address.clone(),
            hot.classic_address.clone(),
            issued,
        );
        self.step("issue tokens", issue, &cold, TES_SUCCESS).await?;

        log::info!("🧊 Freezing the hot wallet trust line...");
        let freeze = TrustSet::freeze(
            cold.classic_address.clone(),
            hot.classic_address.clone(),
            &currency,
        )?;
        self.step("freeze trust line", freeze, &cold, TES_SUCCESS).await?;
        self.expect_frozen(&cold, &hot, &currency, true).await?;

        log::info!("🚫 Paying the customer while frozen...");
        let frozen_payment = self.customer_payment(&cold, &hot, &customer, &currency)?;
        self.step("payment while frozen", frozen_payment, &hot, TEC_PATH_DRY)
            .await?;

        log::info!("🔥 Unfreezing the hot wallet trust line...");
        let unfreeze = TrustSet::unfreeze(
            cold.classic_address.clone(),
            hot.classic_address.clone(),
            &currency,
        )?;
        self.step("unfreeze trust line", unfreeze, &cold, TES_SUCCESS)
            .await?;
        self.expect_frozen(&cold, &hot, &currency, false).await?;

        log::info!("🔁 Re-attempting the customer payment...");
        let retry = self.customer_payment(&cold, &hot, &customer, &currency)?;
        self.step("payment after unfreeze", retry, &hot, TES_SUCCESS)
            .await?;

        self.client.close().await?;

        Ok(FreezeReport {
            cold_address: cold.classic_address,
            hot_address: hot.classic_address,
            customer_address: customer.classic_address,
            steps: self.steps,
        })
    }

    fn customer_payment(
        &self,
        cold: &Wallet,
        hot: &Wallet,
        customer: &Wallet,
        currency: &str,
    ) -> Result<Payment, LedgerError> {
        let amount = Amount::issued(
            currency,
            cold.classic_address.clone(),
            self.settings.customer_amount.clone(),
        )?;
        Ok(Payment::new(
            hot.classic_address.clone(),
            customer.classic_address.clone(),
            amount.clone(),
        )
        .with_send_max(amount))
    }

    /// Submit one transaction and compare its engine result with `expected`
    async fn step<T: Transaction>(
        &mut self,
        name: &str,
        tx: T,
        wallet: &Wallet,
        expected: &str,
    ) -> Result<TxOutcome, LedgerError> {
        let outcome = submit_and_wait(&mut self.client, tx, wallet, &self.options).await?;

        self.steps.push(StepReport {
            step: name.to_string(),
            hash: outcome.hash.clone(),
            engine_result: outcome.engine_result.clone(),
            ledger_index: outcome.ledger_index,
        });

        if outcome.engine_result != expected {
            log::error!(
                "❌ {}: expected {}, got {} ({})",
                name,
                expected,
                outcome.engine_result,
                outcome.hash
            );
            return Err(LedgerError::UnexpectedResult {
                step: name.to_string(),
                expected: expected.to_string(),
                actual: outcome.engine_result,
            });
        }

        log::info!("   ✓ {}: {} ({})", name, outcome.engine_result, outcome.hash);
        Ok(outcome)
    }

    /// Check the issuer's view of the line shared with `holder`
    async fn expect_frozen(
        &mut self,
        issuer: &Wallet,
        holder: &Wallet,
        currency: &str,
        frozen: bool,
    ) -> Result<(), LedgerError> {
        let lines = self
            .client
            .account_lines(&issuer.classic_address, Some(&holder.classic_address))
            .await?;

        let line = lines
            .lines
            .iter()
            .find(|line| line.currency == currency)
            .ok_or_else(|| {
                LedgerError::InvalidResponse(format!(
                    "No {} trust line between {} and {}",
                    currency, issuer.classic_address, holder.classic_address
                ))
            })?;

        let is_frozen = line.freeze.unwrap_or(false);
        if is_frozen != frozen {
            return Err(LedgerError::UnexpectedResult {
                step: "check trust line freeze".to_string(),
                expected: format!("freeze={}", frozen),
                actual: format!("freeze={}", is_frozen),
            });
        }

        log::info!("   ✓ trust line freeze={}", is_frozen);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_amount_check() {
        assert!(check_token_amount("TOKEN_ISSUE_AMOUNT", "3800").is_ok());
        assert!(check_token_amount("TOKEN_ISSUE_AMOUNT", " 0.5 ").is_ok());
        for bad in ["", "0", "-1", "lots", "NaN", "inf"] {
            assert!(
                matches!(
                    check_token_amount("TOKEN_ISSUE_AMOUNT", bad),
                    Err(LedgerError::Config(_))
                ),
                "accepted '{}'",
                bad
            );
        }
    }

    #[test]
    fn test_from_env_rejects_bad_issue_amount() {
        std::env::set_var("TOKEN_ISSUE_AMOUNT", "three thousand");
        let result = FreezeSettings::from_env();
        std::env::remove_var("TOKEN_ISSUE_AMOUNT");
        assert!(matches!(result, Err(LedgerError::Config(_))));
    }
}
