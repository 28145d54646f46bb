//! xrpl-scripts: XRP Ledger walkthroughs
//!
//! Small programs showing how to drive the XRP Ledger from Rust: derive a
//! wallet from a seed, build and sign transactions with the `xrpl` SDK,
//! submit them over a websocket connection and poll until they are
//! validated.
//!
//! # Architecture
//!
//! - **Wallet / Codec**: keypairs, addresses and binary encoding come from the SDK
//! - **WebSocket Client**: request/response framing for the rippled API
//! - **Autofill / Submit**: sequence, fee and expiry from the ledger; submission and polling
//! - **Faucet**: funding test accounts
//! - **Workflows**: the payment and trust line freeze walkthroughs
//!
//! # Example
//!
//! ```ignore
//! use xrpl_scripts::{
//!     submit_and_wait, Amount, NetworkConfig, Payment, SubmitOptions, Wallet, WebSocketClient,
//! };
//!
//! let config = NetworkConfig::from_env()?;
//! let wallet = Wallet::from_seed("sEdSmpmt3DbU42EgsxVrToBqcA6bn3P")?;
//! let mut client = WebSocketClient::from_config(&config).await?;
//!
//! let payment = Payment::new(
//!     wallet.classic_address.clone(),
//!     "rpNvHzENX8S2Bgx4dyCEcpqrb912QvRdoz",
//!     Amount::drops(20),
//! );
//! let options = SubmitOptions::from_config(&config);
//! let outcome = submit_and_wait(&mut client, payment, &wallet, &options).await?;
//! println!("{} {}", outcome.hash, outcome.engine_result);
//! ```

// Public modules
pub mod autofill;
pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod faucet;
pub mod submit;
pub mod transaction;
pub mod wallet;
pub mod workflow;

// Re-exports for convenience
pub use autofill::{autofill, FeeLimits};
pub use client::{Request, WebSocketClient};
pub use codec::SignedTransaction;
pub use config::{Network, NetworkConfig};
pub use error::LedgerError;
pub use faucet::{FaucetClient, FundedWallet};
pub use submit::{
    sign_and_submit, submit, submit_and_wait, wait_for_validation, ResultClass, Submission,
    SubmitOptions, TxOutcome, TES_SUCCESS,
};
pub use transaction::{
    AccountSet, AccountSetFlag, Amount, IssuedCurrencyAmount, Payment, Transaction, TrustSet,
};
pub use wallet::Wallet;

// Common result type
pub type Result<T> = std::result::Result<T, LedgerError>;
