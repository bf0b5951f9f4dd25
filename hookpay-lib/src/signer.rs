//! Message signing capability.
//!
//! Allowance authorizations are signed over raw message bytes by whatever
//! holds the payer's key. [`MessageSigner`] is that seam; the crate ships an
//! Ed25519 implementation because ledger accounts may use Ed25519 keys and
//! hooks verify them with the `ED`-prefixed public key.

use crate::{HookpayError, Result};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use std::fmt;
use zeroize::Zeroizing;

/// Prefix byte marking an Ed25519 public key on the ledger.
pub const ED25519_KEY_PREFIX: u8 = 0xED;

/// Signs raw message bytes with a private key the implementation holds.
pub trait MessageSigner: Send + Sync {
    /// Sign `message`, returning the raw signature bytes.
    fn sign_message(&self, message: &[u8]) -> Result<Vec<u8>>;

    /// Public key in the ledger's hex form, used by verifiers.
    fn public_key_hex(&self) -> String;
}

/// Ed25519 signer.
pub struct Ed25519MessageSigner {
    signing_key: SigningKey,
}

impl Ed25519MessageSigner {
    /// Build from a 32-byte secret key.
    pub fn from_bytes(secret: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(secret),
        }
    }

    /// Build from a 64-character hex secret key.
    ///
    /// A leading `ED` marker (66 characters total) is accepted and stripped.
    pub fn from_secret_hex(secret_hex: &str) -> Result<Self> {
        let trimmed = secret_hex.trim();
        let body = if trimmed.len() == 66
            && trimmed.get(..2).is_some_and(|p| p.eq_ignore_ascii_case("ed"))
        {
            &trimmed[2..]
        } else {
            trimmed
        };
        let bytes = Zeroizing::new(hex::decode(body).map_err(|e| {
            HookpayError::SigningUnavailable(format!("secret key is not valid hex: {}", e))
        })?);
        let secret: Zeroizing<[u8; 32]> = Zeroizing::new(
            bytes
                .as_slice()
                .try_into()
                .map_err(|_| HookpayError::SigningUnavailable(format!(
                    "secret key must be 32 bytes, got {}",
                    bytes.len()
                )))?,
        );
        Ok(Self::from_bytes(&secret))
    }

    /// Raw 32-byte verifying key.
    pub fn verifying_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }
}

impl MessageSigner for Ed25519MessageSigner {
    fn sign_message(&self, message: &[u8]) -> Result<Vec<u8>> {
        Ok(self.signing_key.sign(message).to_bytes().to_vec())
    }

    fn public_key_hex(&self) -> String {
        let mut key = Vec::with_capacity(33);
        key.push(ED25519_KEY_PREFIX);
        key.extend_from_slice(self.verifying_key().as_bytes());
        hex::encode_upper(key)
    }
}

impl fmt::Debug for Ed25519MessageSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ed25519MessageSigner")
            .field("public_key", &self.public_key_hex())
            .finish()
    }
}

/// Verify an Ed25519 signature given hex public key and hex signature.
///
/// The public key may carry the `ED` prefix. Returns `Ok(false)` for a
/// well-formed signature that does not verify.
pub fn verify_ed25519_message(
    public_key_hex: &str,
    message: &[u8],
    signature_hex: &str,
) -> Result<bool> {
    let key_bytes = hex::decode(public_key_hex)
        .map_err(|e| HookpayError::invalid_input("public key", e.to_string()))?;
    let key_body = match key_bytes.as_slice() {
        [ED25519_KEY_PREFIX, rest @ ..] if rest.len() == 32 => rest,
        other => other,
    };
    let key_arr: [u8; 32] = key_body
        .try_into()
        .map_err(|_| HookpayError::invalid_input("public key", "expected 32 bytes"))?;
    let verifying_key = VerifyingKey::from_bytes(&key_arr)
        .map_err(|e| HookpayError::invalid_input("public key", e.to_string()))?;

    let sig_bytes = hex::decode(signature_hex)
        .map_err(|e| HookpayError::invalid_input("signature", e.to_string()))?;
    let sig_arr: [u8; 64] = sig_bytes
        .as_slice()
        .try_into()
        .map_err(|_| HookpayError::invalid_input("signature", "expected 64 bytes"))?;
    let signature = Signature::from_bytes(&sig_arr);

    Ok(verifying_key.verify(message, &signature).is_ok())
}
