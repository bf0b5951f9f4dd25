//! Allowance records and their signatures.
//!
//! The message layout is a wire contract with the payment hook, which
//! rebuilds `payer:payee:cap` from the redeeming memo and verifies it against
//! the payer's public key. Changing it invalidates every issued signature.

use crate::{AllowanceError, Result};
use hookpay_lib::{verify_ed25519_message, AccountAddress, Amount, MessageSigner};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between the fields of the signed message.
pub const ALLOWANCE_FIELD_SEPARATOR: char = ':';

/// A payer's permission for a payee to redeem up to `cap_amount`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowanceRecord {
    pub payer_address: AccountAddress,
    pub payee_address: AccountAddress,
    pub cap_amount: Amount,
}

impl AllowanceRecord {
    /// Create a record.
    ///
    /// Addresses are not checksum-validated, but must be non-empty and free
    /// of the field separator so the message stays unambiguous. The cap may
    /// be zero but not negative.
    pub fn new(payer: AccountAddress, payee: AccountAddress, cap_amount: Amount) -> Result<Self> {
        for (name, addr) in [("payer", &payer), ("payee", &payee)] {
            if addr.as_str().is_empty() {
                return Err(AllowanceError::InvalidInput(format!(
                    "{} address must not be empty",
                    name
                )));
            }
            if addr.as_str().contains(ALLOWANCE_FIELD_SEPARATOR) {
                return Err(AllowanceError::InvalidInput(format!(
                    "{} address '{}' contains '{}'",
                    name, addr, ALLOWANCE_FIELD_SEPARATOR
                )));
            }
        }
        if cap_amount.is_negative() {
            return Err(AllowanceError::InvalidInput(format!(
                "cap {} must not be negative",
                cap_amount
            )));
        }

        Ok(Self {
            payer_address: payer,
            payee_address: payee,
            cap_amount,
        })
    }

    /// Create a record from string fields.
    pub fn parse(payer: &str, payee: &str, cap: &str) -> Result<Self> {
        Self::new(
            AccountAddress::new(payer.trim()),
            AccountAddress::new(payee.trim()),
            Amount::parse(cap)?,
        )
    }

    /// Same parties, different cap.
    pub fn with_cap(&self, cap_amount: Amount) -> Result<Self> {
        Self::new(
            self.payer_address.clone(),
            self.payee_address.clone(),
            cap_amount,
        )
    }
}

/// UTF-8 bytes of `payer:payee:cap`, the exact bytes that get signed.
///
/// ```rust
/// use hookpay_allowance::{build_allowance_message, AllowanceRecord};
///
/// let record = AllowanceRecord::parse("rA", "rB", "10000").unwrap();
/// assert_eq!(build_allowance_message(&record), b"rA:rB:10000");
/// ```
pub fn build_allowance_message(record: &AllowanceRecord) -> Vec<u8> {
    format!(
        "{}{sep}{}{sep}{}",
        record.payer_address,
        record.payee_address,
        record.cap_amount,
        sep = ALLOWANCE_FIELD_SEPARATOR
    )
    .into_bytes()
}

/// A signed allowance record.
///
/// # Security
///
/// This is a bearer credential: whoever holds it can redeem payments up to
/// the cap against the payer's hook balance. Store and transmit it like a
/// secret. `Debug` output omits the signature.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowanceAuthorization {
    pub record: AllowanceRecord,
    /// Uppercase hex.
    pub signature: String,
}

impl AllowanceAuthorization {
    /// Wrap a record and a signature received from elsewhere.
    ///
    /// The signature must be hex; it is normalized to uppercase.
    pub fn new(record: AllowanceRecord, signature_hex: &str) -> Result<Self> {
        let signature = signature_hex.trim();
        if signature.is_empty() || hex::decode(signature).is_err() {
            return Err(AllowanceError::InvalidInput(
                "signature must be non-empty hex".to_string(),
            ));
        }
        Ok(Self {
            record,
            signature: signature.to_ascii_uppercase(),
        })
    }

    /// The signed cap.
    pub fn cap(&self) -> &Amount {
        &self.record.cap_amount
    }

    /// Check the signature against an Ed25519 public key (hex, optional `ED`
    /// prefix).
    pub fn verify_ed25519(&self, public_key_hex: &str) -> Result<bool> {
        let message = build_allowance_message(&self.record);
        Ok(verify_ed25519_message(
            public_key_hex,
            &message,
            &self.signature,
        )?)
    }
}

impl fmt::Debug for AllowanceAuthorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AllowanceAuthorization")
            .field("record", &self.record)
            .field("signature", &"[REDACTED]")
            .finish()
    }
}

/// Sign `record` with the payer's signer.
///
/// # Errors
///
/// `SigningUnavailable` if `signer` is `None`, fails, or returns nothing.
pub fn sign_allowance(
    record: &AllowanceRecord,
    signer: Option<&dyn MessageSigner>,
) -> Result<AllowanceAuthorization> {
    let signer = signer.ok_or_else(|| {
        AllowanceError::SigningUnavailable("no signer configured for the payer".to_string())
    })?;

    let message = build_allowance_message(record);
    let raw = signer
        .sign_message(&message)
        .map_err(|e| AllowanceError::SigningUnavailable(e.to_string()))?;
    if raw.is_empty() {
        return Err(AllowanceError::SigningUnavailable(
            "signer returned an empty signature".to_string(),
        ));
    }

    tracing::debug!(
        payer = %record.payer_address,
        payee = %record.payee_address,
        cap = %record.cap_amount,
        "allowance signed"
    );

    Ok(AllowanceAuthorization {
        record: record.clone(),
        signature: hex::encode_upper(raw),
    })
}

/// Cap after topping up: `remaining + top_up`, exactly.
///
/// ```rust
/// use hookpay_allowance::next_allowance_cap;
/// use hookpay_lib::Amount;
///
/// let cap = next_allowance_cap(&Amount::from_units(5000), &Amount::from_units(2000)).unwrap();
/// assert_eq!(cap.to_string(), "7000");
/// ```
pub fn next_allowance_cap(remaining: &Amount, top_up: &Amount) -> Result<Amount> {
    if remaining.is_negative() || top_up.is_negative() {
        return Err(AllowanceError::InvalidInput(format!(
            "cap amounts must not be negative ({} + {})",
            remaining, top_up
        )));
    }
    remaining
        .checked_add(top_up)
        .ok_or_else(|| AllowanceError::InvalidInput("cap overflow".to_string()))
}
