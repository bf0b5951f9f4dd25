//! Test utilities for hookpay.
//!
//! [`MockLedgerClient`] records every submitted transaction and answers
//! `account_lines` from an in-memory table, so token and allowance flows can
//! be exercised without a ledger node.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use hookpay_lib::test_utils::{test_wallet, MockLedgerClient};
//!
//! let ledger = MockLedgerClient::new();
//! let ops = TokenOperations::new(ledger.clone(), NetworkConfig::default());
//! ops.send_token(&test_wallet(), &dest, "100").await?;
//! assert_eq!(ledger.submitted().len(), 1);
//! ```

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::ledger::{LedgerClient, LedgerWallet, SubmissionResult, Transaction, TrustLine, WalletSecret};
use crate::{AccountAddress, HookpayError, Result};

/// Address used by [`test_wallet`].
pub const TEST_ACCOUNT: &str = "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh";

/// Address used as a hook account in tests.
pub const TEST_HOOK_ACCOUNT: &str = "rhyYNdxAyFQ7s2KYXhaTMJKF7NrkkZj1X9";

/// Wallet with a fixed address and placeholder secret.
pub fn test_wallet() -> LedgerWallet {
    LedgerWallet::new(
        AccountAddress::new(TEST_ACCOUNT),
        WalletSecret::new("snoPBrXtMeMyMHUVTgbuqAfg1SUTb"),
    )
}

#[derive(Default)]
struct MockState {
    submitted: Vec<Transaction>,
    lines: HashMap<String, Vec<TrustLine>>,
    failure: Option<HookpayError>,
    transaction_result: Option<String>,
}

/// In-memory [`LedgerClient`].
///
/// Cloning shares state, so a test can keep a handle after moving a clone
/// into the code under test.
#[derive(Clone, Default)]
pub struct MockLedgerClient {
    state: Arc<RwLock<MockState>>,
}

impl MockLedgerClient {
    /// Create a mock that accepts every transaction with `tesSUCCESS`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every subsequent submission with `error`.
    pub fn fail_with(&self, error: HookpayError) {
        self.write().failure = Some(error);
    }

    /// Report `result` (e.g. `tecPATH_DRY`) for subsequent submissions.
    pub fn with_transaction_result(&self, result: impl Into<String>) {
        self.write().transaction_result = Some(result.into());
    }

    /// Set the trust lines returned for `account`.
    pub fn set_lines(&self, account: &AccountAddress, lines: Vec<TrustLine>) {
        self.write().lines.insert(account.to_string(), lines);
    }

    /// Transactions submitted so far, in order.
    pub fn submitted(&self) -> Vec<Transaction> {
        self.read().submitted.clone()
    }

    /// Most recent submitted transaction.
    pub fn last_submitted(&self) -> Option<Transaction> {
        self.read().submitted.last().cloned()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, MockState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, MockState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl LedgerClient for MockLedgerClient {
    async fn submit_and_wait(
        &self,
        tx: &Transaction,
        _wallet: &LedgerWallet,
    ) -> Result<SubmissionResult> {
        let mut state = self.write();
        if let Some(err) = state.failure.clone() {
            return Err(err);
        }

        state.submitted.push(tx.clone());
        let index = state.submitted.len() as u64;
        let transaction_result = state
            .transaction_result
            .clone()
            .unwrap_or_else(|| "tesSUCCESS".to_string());

        if transaction_result != "tesSUCCESS" {
            return Err(HookpayError::TransactionFailed {
                hash: format!("{:064X}", index),
                result: transaction_result,
            });
        }

        Ok(SubmissionResult {
            hash: format!("{:064X}", index),
            engine_result: "tesSUCCESS".to_string(),
            transaction_result,
            ledger_index: Some(1000 + index),
            validated: true,
        })
    }

    async fn account_lines(&self, account: &AccountAddress) -> Result<Vec<TrustLine>> {
        let state = self.read();
        if let Some(err) = state.failure.clone() {
            return Err(err);
        }
        Ok(state.lines.get(account.as_str()).cloned().unwrap_or_default())
    }
}
