//! Ledger wallets derived from family seeds

use std::fmt;

use xrpl::core::addresscodec::is_valid_classic_address;
use xrpl::core::keypairs::{derive_classic_address, derive_keypair};

use crate::error::LedgerError;

/// Address plus key material for one account
///
/// Keys are the SDK's hex encodings; ed25519 public keys carry the `ED`
/// prefix. The seed and private key are kept out of `Debug` output.
#[derive(Clone)]
pub struct Wallet {
    seed: String,
    private_key: String,
    /// Hex public key, used as `SigningPubKey`
    pub public_key: String,
    /// Classic `r...` address, used as `Account`
    pub classic_address: String,
}

impl Wallet {
    /// Derive a wallet from a family seed (`s...`)
    pub fn from_seed(seed: &str) -> Result<Self, LedgerError> {
        let seed = seed.trim();
        if seed.is_empty() {
            return Err(LedgerError::Config("Seed is empty".to_string()));
        }

        let (public_key, private_key) =
            derive_keypair(seed, false).map_err(|e| LedgerError::sdk("derive keypair", e))?;
        let classic_address = derive_classic_address(&public_key)
            .map_err(|e| LedgerError::sdk("derive classic address", e))?;

        log::debug!("Derived wallet {}", classic_address);

        Ok(Self {
            seed: seed.to_string(),
            private_key: private_key.to_string(),
            public_key: public_key.to_string(),
            classic_address: classic_address.to_string(),
        })
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    pub fn private_key(&self) -> &str {
        &self.private_key
    }
}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wallet")
            .field("classic_address", &self.classic_address)
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

/// Check an `r...` address, including its checksum
pub fn validate_address(address: &str) -> Result<(), LedgerError> {
    if is_valid_classic_address(address) {
        Ok(())
    } else {
        Err(LedgerError::InvalidTransaction(format!(
            "Invalid classic address: {}",
            address
        )))
    }
}
