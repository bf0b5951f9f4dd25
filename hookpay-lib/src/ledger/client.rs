use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::Transaction;
use crate::{AccountAddress, Result};

/// Secret used by the ledger node to sign on the wallet's behalf.
///
/// Never logged; `Debug` is redacted and the buffer is wiped on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct WalletSecret(String);

impl WalletSecret {
    /// Wrap a family seed (`s...`) or hex secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// The secret value.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for WalletSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WalletSecret([REDACTED])")
    }
}

/// An account together with the secret that authorizes it.
#[derive(Clone, Debug)]
pub struct LedgerWallet {
    /// Account address.
    pub address: AccountAddress,
    /// Signing secret.
    pub secret: WalletSecret,
}

impl LedgerWallet {
    /// Create a wallet.
    pub fn new(address: AccountAddress, secret: WalletSecret) -> Self {
        Self { address, secret }
    }
}

/// Outcome of a validated transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionResult {
    /// Transaction hash.
    pub hash: String,
    /// Preliminary engine result from submission.
    pub engine_result: String,
    /// Final `TransactionResult` from the validated ledger.
    pub transaction_result: String,
    /// Ledger the transaction was validated in.
    pub ledger_index: Option<u64>,
    /// Whether the result is from a validated ledger.
    pub validated: bool,
}

impl SubmissionResult {
    /// True for `tesSUCCESS` in a validated ledger.
    pub fn is_success(&self) -> bool {
        self.validated && self.transaction_result == "tesSUCCESS"
    }
}

/// One trust line as reported by `account_lines`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustLine {
    /// Counterparty (issuer) of the line.
    pub account: AccountAddress,
    /// Balance from the queried account's perspective.
    pub balance: String,
    /// Currency code.
    pub currency: String,
    /// Limit set by the queried account.
    pub limit: String,
    /// Limit set by the counterparty.
    #[serde(default)]
    pub limit_peer: String,
}

/// Ledger access: submission and trust line queries.
///
/// Implementations own their connection lifecycle; nothing here keeps a
/// connection open across calls.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait LedgerClient: Send + Sync {
    /// Autofill, sign with `wallet`, submit, and wait until validated.
    async fn submit_and_wait(
        &self,
        tx: &Transaction,
        wallet: &LedgerWallet,
    ) -> Result<SubmissionResult>;

    /// Trust lines of `account` in the current ledger.
    async fn account_lines(&self, account: &AccountAddress) -> Result<Vec<TrustLine>>;
}
