//! Issued-token operations.
//!
//! Trust line setup, balance queries, transfers and burns for the single
//! token configured in [`NetworkConfig`]. Burning is a payment to the black
//! hole account, whose keys nobody holds.

use crate::ledger::{
    IssuedAmount, LedgerClient, LedgerWallet, NetworkConfig, SubmissionResult, Transaction,
    TrustLine,
};
use crate::{AccountAddress, Amount, Result};

/// Token operations over a [`LedgerClient`].
pub struct TokenOperations<C> {
    ledger: C,
    config: NetworkConfig,
}

impl<C: LedgerClient> TokenOperations<C> {
    pub fn new(ledger: C, config: NetworkConfig) -> Self {
        Self { ledger, config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Get the ledger client.
    pub fn ledger(&self) -> &C {
        &self.ledger
    }

    fn issued(&self, amount: &Amount) -> IssuedAmount {
        IssuedAmount::new(self.config.currency.clone(), self.config.issuer.clone(), amount)
    }

    /// Open (or raise) the wallet's trust line to the issuer.
    ///
    /// Holding the token requires this once per account.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, wallet), fields(account = %wallet.address)))]
    pub async fn set_trust_line(
        &self,
        wallet: &LedgerWallet,
        limit: &str,
    ) -> Result<SubmissionResult> {
        let limit = Amount::parse_token_amount(limit)?;
        let tx = Transaction::trust_set(wallet.address.clone(), self.issued(&limit))
            .with_network_id(self.config.network_id);
        self.ledger.submit_and_wait(&tx, wallet).await
    }

    /// All trust lines of `address`.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self)))]
    pub async fn check_balance(&self, address: &AccountAddress) -> Result<Vec<TrustLine>> {
        self.ledger.account_lines(address).await
    }

    /// Balance of the configured token held by `address`.
    ///
    /// Zero when the account has no trust line for it.
    pub async fn token_balance(&self, address: &AccountAddress) -> Result<Amount> {
        let lines = self.check_balance(address).await?;
        match lines
            .iter()
            .find(|l| l.currency == self.config.currency && l.account == self.config.issuer)
        {
            Some(line) => Amount::from_ledger_value(&line.balance),
            None => Ok(Amount::zero()),
        }
    }

    /// Transfer `amount` whole tokens to `destination`.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, wallet), fields(account = %wallet.address)))]
    pub async fn send_token(
        &self,
        wallet: &LedgerWallet,
        destination: &AccountAddress,
        amount: &str,
    ) -> Result<SubmissionResult> {
        let amount = Amount::parse_token_amount(amount)?;
        let tx = Transaction::payment(wallet.address.clone(), destination.clone(), self.issued(&amount))
            .with_network_id(self.config.network_id);
        self.ledger.submit_and_wait(&tx, wallet).await
    }

    /// Destroy `amount` whole tokens by sending them to the black hole account.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, wallet), fields(account = %wallet.address)))]
    pub async fn burn_token(&self, wallet: &LedgerWallet, amount: &str) -> Result<SubmissionResult> {
        let amount = Amount::parse_token_amount(amount)?;
        let tx = Transaction::payment(
            wallet.address.clone(),
            AccountAddress::account_zero(),
            self.issued(&amount),
        )
        .with_network_id(self.config.network_id);
        self.ledger.submit_and_wait(&tx, wallet).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{test_wallet, MockLedgerClient};
    use crate::{HookpayError, TransactionType};

    fn ops() -> (MockLedgerClient, TokenOperations<MockLedgerClient>) {
        let ledger = MockLedgerClient::new();
        (ledger.clone(), TokenOperations::new(ledger, NetworkConfig::default()))
    }

    #[tokio::test]
    async fn test_send_token_builds_payment() {
        let (ledger, ops) = ops();
        let dest = AccountAddress::new("rDest");

        let result = ops.send_token(&test_wallet(), &dest, "250").await.unwrap();
        assert!(result.is_success());

        let tx = ledger.last_submitted().unwrap();
        assert_eq!(tx.transaction_type, TransactionType::Payment);
        assert_eq!(tx.destination, Some(dest));
        let amount = tx.amount.unwrap();
        assert_eq!(amount.value, "250");
        assert_eq!(amount.currency, "JPY");
        assert_eq!(tx.network_id, Some(21338));
    }

    #[tokio::test]
    async fn test_fractional_amounts_rejected_before_submission() {
        let (ledger, ops) = ops();
        let err = ops
            .send_token(&test_wallet(), &AccountAddress::new("rDest"), "100.5")
            .await
            .unwrap_err();
        assert!(matches!(err, HookpayError::InvalidInput { .. }));

        let err = ops.burn_token(&test_wallet(), "0.1").await.unwrap_err();
        assert!(matches!(err, HookpayError::InvalidInput { .. }));
        assert!(ledger.submitted().is_empty());
    }

    #[tokio::test]
    async fn test_burn_targets_black_hole() {
        let (ledger, ops) = ops();
        ops.burn_token(&test_wallet(), "10").await.unwrap();
        let tx = ledger.last_submitted().unwrap();
        assert_eq!(tx.destination.unwrap().as_str(), AccountAddress::ACCOUNT_ZERO);
    }

    #[tokio::test]
    async fn test_trust_line_uses_holder_account() {
        let (ledger, ops) = ops();
        ops.set_trust_line(&test_wallet(), "1000000").await.unwrap();
        let tx = ledger.last_submitted().unwrap();
        assert_eq!(tx.transaction_type, TransactionType::TrustSet);
        assert_eq!(tx.account, test_wallet().address);
        let limit = tx.limit_amount.unwrap();
        assert_eq!(limit.issuer, ops.config().issuer);
        assert_eq!(limit.value, "1000000");
    }

    #[tokio::test]
    async fn test_token_balance_picks_configured_line() {
        let (ledger, ops) = ops();
        let holder = AccountAddress::new("rHolder");
        ledger.set_lines(
            &holder,
            vec![
                TrustLine {
                    account: AccountAddress::new("rOtherIssuer"),
                    balance: "5".into(),
                    currency: "JPY".into(),
                    limit: "100".into(),
                    limit_peer: "0".into(),
                },
                TrustLine {
                    account: ops.config().issuer.clone(),
                    balance: "1200".into(),
                    currency: "JPY".into(),
                    limit: "1000000".into(),
                    limit_peer: "0".into(),
                },
            ],
        );

        assert_eq!(ops.token_balance(&holder).await.unwrap(), Amount::from_units(1200));
        assert_eq!(ops.check_balance(&holder).await.unwrap().len(), 2);
        assert!(ops
            .token_balance(&AccountAddress::new("rNobody"))
            .await
            .unwrap()
            .is_zero());
    }

    #[tokio::test]
    async fn test_ledger_failure_propagates() {
        let (ledger, ops) = ops();
        ledger.with_transaction_result("tecPATH_DRY");
        let err = ops.burn_token(&test_wallet(), "1").await.unwrap_err();
        assert!(matches!(err, HookpayError::TransactionFailed { ref result, .. } if result == "tecPATH_DRY"));
    }
}
