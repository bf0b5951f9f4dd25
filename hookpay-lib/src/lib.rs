//! Hookpay library.
//!
//! Building blocks for issued-token and allowance payments on an
//! XRPL-compatible ledger (Xahau). The crate stays stateless: ledger access
//! and signing are injected through the [`LedgerClient`] and
//! [`MessageSigner`] traits.
//!
//! # Features
//!
//! - **Seed derivation**: deterministic seed strings from eight numbers
//! - **Amounts**: exact decimal arithmetic for token values
//! - **Ledger model**: TrustSet, Payment and Invoke transactions with memos
//! - **Token operations**: trust lines, transfers, burns, balances
//!
//! # Example
//!
//! ```
//! use hookpay_lib::seed::{derive_seed, NumericSeedInput};
//!
//! let input = NumericSeedInput::parse("222974 1813 324410 332788 457550 273507 360682 564856")?;
//! let seed = derive_seed(&input)?;
//! assert!(seed.expose().starts_with('s'));
//! # Ok::<(), hookpay_lib::HookpayError>(())
//! ```

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub mod amount;
pub mod errors;
pub mod ledger;
pub mod seed;
pub mod signer;
pub mod token;

/// Test utilities (mock ledger client).
///
/// This module is only available with the `test-utils` feature or in test builds.
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use amount::Amount;
pub use errors::{HookpayError, HookpayErrorCode};
pub use ledger::{
    IssuedAmount, LedgerClient, LedgerWallet, Memo, NetworkConfig, SubmissionResult,
    Transaction, TransactionType, TrustLine, WalletSecret,
};
pub use signer::{verify_ed25519_message, Ed25519MessageSigner, MessageSigner};
pub use token::TokenOperations;

#[cfg(feature = "http-executor")]
pub use ledger::JsonRpcLedgerClient;

/// Common result alias for hookpay operations.
pub type Result<T> = std::result::Result<T, HookpayError>;

/// Classic ledger account address (`r...`).
///
/// [`AccountAddress::new`] wraps any string unchecked, which the allowance
/// message format needs for opaque identifiers; [`AccountAddress::parse`]
/// enforces the base58 checksum.
///
/// # Example
///
/// ```
/// use hookpay_lib::AccountAddress;
///
/// let issuer = AccountAddress::parse("rhyYNdxAyFQ7s2KYXhaTMJKF7NrkkZj1X9").unwrap();
/// assert!(issuer.as_str().starts_with('r'));
/// assert!(AccountAddress::parse("rhyYNdxAyFQ7s2KYXhaTMJKF7NrkkZj1X8").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountAddress(pub String);

/// Version byte of a classic account address.
const ACCOUNT_ID_VERSION: u8 = 0x00;

/// Decoded length: version byte, 20-byte account id, 4-byte checksum.
const ACCOUNT_ADDRESS_DECODED_LEN: usize = 25;

impl AccountAddress {
    /// Black hole account; tokens sent here are unrecoverable.
    pub const ACCOUNT_ZERO: &'static str = "rrrrrrrrrrrrrrrrrrrrrhoLvTp";

    /// Wrap an address without validation.
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// Parse and checksum-validate a classic address.
    pub fn parse(address: &str) -> Result<Self> {
        let address = address.trim();
        if !Self::is_valid(address) {
            return Err(HookpayError::invalid_input(
                "address",
                format!("'{}' is not a valid account address", address),
            ));
        }
        Ok(Self(address.to_string()))
    }

    /// True if `address` decodes to a checksummed account id.
    pub fn is_valid(address: &str) -> bool {
        if !address.starts_with('r') {
            return false;
        }
        let decoded = match bs58::decode(address)
            .with_alphabet(bs58::Alphabet::RIPPLE)
            .into_vec()
        {
            Ok(bytes) => bytes,
            Err(_) => return false,
        };
        if decoded.len() != ACCOUNT_ADDRESS_DECODED_LEN || decoded[0] != ACCOUNT_ID_VERSION {
            return false;
        }
        let (payload, checksum) = decoded.split_at(ACCOUNT_ADDRESS_DECODED_LEN - 4);
        let digest = Sha256::digest(Sha256::digest(payload));
        &digest[..4] == checksum
    }

    /// The black hole account.
    pub fn account_zero() -> Self {
        Self::new(Self::ACCOUNT_ZERO)
    }

    /// Get the address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AccountAddress {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for AccountAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
