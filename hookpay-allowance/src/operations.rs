//! Allowance flows against the ledger.
//!
//! All three flows are `Invoke` transactions addressed to the hook account,
//! each carrying one JSON memo. Charging also moves tokens into the hook via
//! the invoke's `Amount`.

use crate::payload::{
    encode_allowance_update_payload, encode_payment_payload, encode_withdraw_payload,
    PaymentRequest,
};
use crate::record::{next_allowance_cap, sign_allowance, AllowanceAuthorization, AllowanceRecord};
use crate::{AllowanceError, Result};
use hookpay_lib::{
    AccountAddress, Amount, IssuedAmount, LedgerClient, LedgerWallet, MessageSigner,
    NetworkConfig, SubmissionResult, Transaction,
};

/// Result of a charge: the ledger outcome plus the newly signed cap, which
/// the payer hands to the payee for future redemptions.
#[derive(Debug, Clone)]
pub struct ChargeOutcome {
    pub submission: SubmissionResult,
    pub authorization: AllowanceAuthorization,
}

/// Allowance operations over a [`LedgerClient`].
pub struct AllowanceOperations<C> {
    ledger: C,
    config: NetworkConfig,
}

impl<C: LedgerClient> AllowanceOperations<C> {
    pub fn new(ledger: C, config: NetworkConfig) -> Self {
        Self { ledger, config }
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    fn hook_address(&self) -> Result<AccountAddress> {
        Ok(self.config.require_hook_address()?.clone())
    }

    /// Deposit `charge_amount` tokens into the hook and raise the cap granted
    /// to `payee` from `remaining_allowance` to their exact sum.
    ///
    /// The new cap is signed with `signer` before anything is submitted, so a
    /// missing signer fails without touching the ledger.
    pub async fn charge_and_update_allowance(
        &self,
        wallet: &LedgerWallet,
        signer: Option<&dyn MessageSigner>,
        payee: &AccountAddress,
        charge_amount: &str,
        remaining_allowance: &str,
    ) -> Result<ChargeOutcome> {
        let hook = self.hook_address()?;
        let charge = Amount::parse_token_amount(charge_amount)?;
        let remaining = Amount::parse(remaining_allowance)?;
        let new_cap = next_allowance_cap(&remaining, &charge)?;

        let record = AllowanceRecord::new(wallet.address.clone(), payee.clone(), new_cap)?;
        let authorization = sign_allowance(&record, signer)?;
        let payload = encode_allowance_update_payload(&record, &authorization.signature)?;

        let tx = Transaction::invoke(wallet.address.clone(), hook)
            .with_amount(IssuedAmount::new(
                self.config.currency.clone(),
                self.config.issuer.clone(),
                &charge,
            ))
            .with_memo(payload.to_memo())
            .with_network_id(self.config.network_id);

        tracing::info!(
            payer = %wallet.address,
            payee = %payee,
            charge = %charge,
            new_cap = %new_cap,
            "submitting charge with allowance update"
        );

        let submission = self.ledger.submit_and_wait(&tx, wallet).await?;
        Ok(ChargeOutcome {
            submission,
            authorization,
        })
    }

    /// Redeem `payment_amount` from the payer under `authorization`.
    ///
    /// The hook rebuilds the signed message with the submitting account as
    /// payee, so `operator` must be the authorization's payee.
    pub async fn send_payment_with_allowance(
        &self,
        operator: &LedgerWallet,
        authorization: &AllowanceAuthorization,
        payment_amount: &str,
    ) -> Result<SubmissionResult> {
        let hook = self.hook_address()?;
        if operator.address != authorization.record.payee_address {
            return Err(AllowanceError::InvalidInput(format!(
                "allowance was granted to {}, not {}",
                authorization.record.payee_address, operator.address
            )));
        }

        let amount = Amount::parse_token_amount(payment_amount)?;
        let request = PaymentRequest::new(authorization.clone(), amount);
        if !request.is_within_cap() {
            tracing::warn!(
                amount = %amount,
                cap = %authorization.cap(),
                "payment exceeds the signed cap; the hook will reject it"
            );
        }
        let payload = encode_payment_payload(&request)?;

        let tx = Transaction::invoke(operator.address.clone(), hook)
            .with_memo(payload.to_memo())
            .with_network_id(self.config.network_id);

        tracing::info!(
            payer = %authorization.record.payer_address,
            operator = %operator.address,
            amount = %amount,
            "submitting allowance payment"
        );

        Ok(self.ledger.submit_and_wait(&tx, operator).await?)
    }

    /// Withdraw `amount` tokens of the wallet's hook balance.
    pub async fn withdraw_balance(
        &self,
        wallet: &LedgerWallet,
        amount: &str,
    ) -> Result<SubmissionResult> {
        let hook = self.hook_address()?;
        let amount = Amount::parse_token_amount(amount)?;
        let payload = encode_withdraw_payload(&amount)?;

        let tx = Transaction::invoke(wallet.address.clone(), hook)
            .with_memo(payload.to_memo())
            .with_network_id(self.config.network_id);

        tracing::info!(account = %wallet.address, amount = %amount, "submitting withdrawal");

        Ok(self.ledger.submit_and_wait(&tx, wallet).await?)
    }
}
