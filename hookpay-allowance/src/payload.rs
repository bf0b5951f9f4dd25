//! Memo payloads understood by the payment hook.
//!
//! Each intent is a small JSON object whose `type` field selects the hook's
//! handler. The JSON travels in a transaction memo as uppercase hex, with
//! `MemoFormat` set to hex of `application/json`. Field names are fixed by
//! the hook.

use crate::record::{AllowanceAuthorization, AllowanceRecord};
use crate::{AllowanceError, Result};
use hookpay_lib::ledger::{hex_to_string, string_to_hex, JSON_MEMO_FORMAT};
use hookpay_lib::{AccountAddress, Amount, Memo};
use serde::{Deserialize, Serialize};

/// Cap and signature as carried in an `allowance_payment` memo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowanceProof {
    pub amount: Amount,
    pub signature: String,
}

/// Decoded memo, one variant per hook intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HookMemo {
    /// Operator redeems `payment_amount` from `user_address` under a signed cap.
    AllowancePayment {
        user_address: AccountAddress,
        payment_amount: Amount,
        allowance: AllowanceProof,
    },
    /// Payer replaces its cap with a newly signed one.
    UpdateAllowance { allowance: Amount, signature: String },
    /// Payer takes `amount` back out of the hook.
    Withdraw { amount: Amount },
}

impl HookMemo {
    /// The `type` discriminator as it appears on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AllowancePayment { .. } => "allowance_payment",
            Self::UpdateAllowance { .. } => "update_allowance",
            Self::Withdraw { .. } => "withdraw",
        }
    }
}

/// An operator's request to redeem part of an allowance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    pub authorization: AllowanceAuthorization,
    pub requested_amount: Amount,
}

impl PaymentRequest {
    pub fn new(authorization: AllowanceAuthorization, requested_amount: Amount) -> Self {
        Self {
            authorization,
            requested_amount,
        }
    }

    /// Whether the request fits within the signed cap on its own.
    ///
    /// Advisory only: the hook tracks cumulative spend and is the one that
    /// rejects overdrafts. Encoding never consults this.
    pub fn is_within_cap(&self) -> bool {
        self.requested_amount
            .is_within_limit(self.authorization.cap())
    }
}

/// Hex-encoded memo contents ready to attach to a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportPayload {
    pub memo_data: String,
    pub memo_format: String,
}

impl TransportPayload {
    fn from_memo_json(memo: &HookMemo) -> Result<Self> {
        let json = serde_json::to_string(memo)?;
        Ok(Self {
            memo_data: string_to_hex(&json),
            memo_format: string_to_hex(JSON_MEMO_FORMAT),
        })
    }

    /// Build from a ledger memo.
    pub fn from_memo(memo: &Memo) -> Result<Self> {
        let memo_format = memo.memo_format.clone().ok_or_else(|| {
            AllowanceError::EncodingFailure("memo has no MemoFormat".to_string())
        })?;
        Ok(Self {
            memo_data: memo.memo_data.clone(),
            memo_format,
        })
    }

    /// As a ledger memo.
    pub fn to_memo(&self) -> Memo {
        Memo {
            memo_data: self.memo_data.clone(),
            memo_format: Some(self.memo_format.clone()),
        }
    }

    /// The JSON text carried in `memo_data`.
    pub fn json(&self) -> Result<String> {
        Ok(hex_to_string(&self.memo_data)?)
    }

    /// Parse the payload back into a [`HookMemo`].
    ///
    /// # Errors
    ///
    /// `EncodingFailure` if the format is not JSON, the data is not hex
    /// UTF-8, or the JSON is not a known intent.
    pub fn decode(&self) -> Result<HookMemo> {
        let format = hex_to_string(&self.memo_format)?;
        if format != JSON_MEMO_FORMAT {
            return Err(AllowanceError::EncodingFailure(format!(
                "unsupported memo format '{}'",
                format
            )));
        }
        Ok(serde_json::from_str(&self.json()?)?)
    }
}

fn require_positive(field: &str, amount: &Amount) -> Result<()> {
    if amount.is_negative() || amount.is_zero() {
        return Err(AllowanceError::InvalidInput(format!(
            "{} must be positive, got {}",
            field, amount
        )));
    }
    Ok(())
}

/// Payload for an operator's `allowance_payment` invoke.
///
/// `requested_amount` is not checked against the cap. It is written without
/// trailing fractional zeros; the cap is written exactly as signed.
pub fn encode_payment_payload(request: &PaymentRequest) -> Result<TransportPayload> {
    require_positive("payment amount", &request.requested_amount)?;
    let auth = &request.authorization;

    TransportPayload::from_memo_json(&HookMemo::AllowancePayment {
        user_address: auth.record.payer_address.clone(),
        payment_amount: request.requested_amount.normalized(),
        allowance: AllowanceProof {
            amount: auth.record.cap_amount,
            signature: auth.signature.to_ascii_uppercase(),
        },
    })
}

/// Payload announcing a re-signed cap.
pub fn encode_allowance_update_payload(
    record: &AllowanceRecord,
    signature: &str,
) -> Result<TransportPayload> {
    if signature.is_empty() {
        return Err(AllowanceError::InvalidInput(
            "signature must not be empty".to_string(),
        ));
    }
    TransportPayload::from_memo_json(&HookMemo::UpdateAllowance {
        allowance: record.cap_amount,
        signature: signature.to_ascii_uppercase(),
    })
}

/// Payload for withdrawing `amount` from the hook.
pub fn encode_withdraw_payload(amount: &Amount) -> Result<TransportPayload> {
    require_positive("withdraw amount", amount)?;
    TransportPayload::from_memo_json(&HookMemo::Withdraw {
        amount: amount.normalized(),
    })
}
