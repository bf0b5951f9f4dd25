//! # Hookpay Allowance Protocol
//!
//! A payer signs a spending cap for a payee once; the payee (an operator)
//! later redeems payments against it by invoking the payment hook with the
//! signed cap attached. The hook verifies the signature and tracks what has
//! been spent, so nothing here keeps remaining-balance state.
//!
//! ## Security Model
//!
//! - The signed message is the UTF-8 string `payer:payee:cap`; any party
//!   holding the signature can present it, so an [`AllowanceAuthorization`]
//!   is a bearer credential.
//! - Raising a cap means signing a new record; the old signature stays valid
//!   for its own cap.
//! - Cap arithmetic is exact decimal arithmetic.
//!
//! ## Modules
//! - [`record`]: allowance message and signing
//! - [`payload`]: memo payloads for the three hook intents
//! - [`operations`]: ledger flows (charge, pay, withdraw)

pub mod operations;
pub mod payload;
pub mod record;

pub use operations::{AllowanceOperations, ChargeOutcome};
pub use payload::{
    encode_allowance_update_payload, encode_payment_payload, encode_withdraw_payload,
    AllowanceProof, HookMemo, PaymentRequest, TransportPayload,
};
pub use record::{
    build_allowance_message, next_allowance_cap, sign_allowance, AllowanceAuthorization,
    AllowanceRecord,
};

use hookpay_lib::HookpayError;

pub type Result<T> = std::result::Result<T, AllowanceError>;

#[derive(thiserror::Error, Debug)]
pub enum AllowanceError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("signing unavailable: {0}")]
    SigningUnavailable(String),
    #[error("encoding failure: {0}")]
    EncodingFailure(String),
    #[error("ledger error: {0}")]
    Ledger(HookpayError),
}

impl AllowanceError {
    /// True if resubmitting the same ledger request might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Ledger(e) if e.is_retryable())
    }
}

impl From<HookpayError> for AllowanceError {
    fn from(err: HookpayError) -> Self {
        match err {
            HookpayError::InvalidInput { field, reason } => {
                Self::InvalidInput(format!("{}: {}", field, reason))
            }
            HookpayError::SigningUnavailable(msg) => Self::SigningUnavailable(msg),
            HookpayError::EncodingFailure(msg) => Self::EncodingFailure(msg),
            other => Self::Ledger(other),
        }
    }
}

impl From<serde_json::Error> for AllowanceError {
    fn from(err: serde_json::Error) -> Self {
        Self::EncodingFailure(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codec_kinds_keep_their_variant() {
        let err: AllowanceError = HookpayError::invalid_input("amount", "'100.5' is fractional").into();
        assert!(matches!(err, AllowanceError::InvalidInput(ref m) if m.contains("100.5")));

        let err: AllowanceError = HookpayError::SigningUnavailable("no key".into()).into();
        assert!(matches!(err, AllowanceError::SigningUnavailable(_)));
    }

    #[test]
    fn test_ledger_errors_wrapped() {
        let err: AllowanceError = HookpayError::ConnectionTimeout {
            operation: "submit".into(),
            timeout_ms: 1000,
        }
        .into();
        assert!(matches!(err, AllowanceError::Ledger(_)));
        assert!(err.is_retryable());
        assert!(!AllowanceError::InvalidInput("x".into()).is_retryable());
    }
}
