//! Deterministic wallet seed derivation.
//!
//! A seed is derived from eight numbers of at most six digits each:
//!
//! 1. the decimal digits are concatenated in order, without separators or
//!    zero padding;
//! 2. SHA-512 is taken over the UTF-8 bytes and the first 32 bytes are kept;
//! 3. those bytes are read as one big-endian integer and written in base 58
//!    with [`SEED_ALPHABET`];
//! 4. the result is prefixed with `"s"`.
//!
//! Leading zero bytes of the digest produce no output characters: a digest
//! beginning with `0x00` yields a shorter seed instead of one padded with
//! `SEED_ALPHABET[0]`. Downstream comparisons are by exact string equality, so
//! this must not be "fixed".

use crate::{HookpayError, Result};
use sha2::{Digest, Sha512};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Base 58 alphabet used for seed strings.
///
/// This is the ledger's own ordering, not Bitcoin's. Substituting the Bitcoin
/// alphabet silently yields different seeds.
pub const SEED_ALPHABET: &[u8; 58] = b"rpshnaf39wBUDNEGHJKLM4PQRST7VWXYZ2bcdeCg65jkm8oFqi1tuvAxyz";

/// Prefix of every derived seed.
pub const SEED_PREFIX: char = 's';

/// Number of values in a [`NumericSeedInput`].
pub const SEED_INPUT_LEN: usize = 8;

/// Largest value accepted per input (six decimal digits).
pub const SEED_INPUT_MAX: u32 = 999_999;

/// Bytes of the SHA-512 digest that are encoded.
const DIGEST_PREFIX_LEN: usize = 32;

/// Eight positive integers of at most six digits. Order matters.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct NumericSeedInput {
    values: [u32; SEED_INPUT_LEN],
}

impl NumericSeedInput {
    /// Validate and wrap a list of values.
    ///
    /// # Errors
    ///
    /// `InvalidInput` unless there are exactly eight values, each in
    /// `1..=999_999`.
    pub fn new(values: &[u32]) -> Result<Self> {
        if values.len() != SEED_INPUT_LEN {
            return Err(HookpayError::invalid_input(
                "seed input",
                format!("expected {} values, got {}", SEED_INPUT_LEN, values.len()),
            ));
        }
        if let Some((idx, v)) = values
            .iter()
            .enumerate()
            .find(|(_, v)| **v == 0 || **v > SEED_INPUT_MAX)
        {
            return Err(HookpayError::invalid_input(
                "seed input",
                format!("value #{} ({}) must be between 1 and {}", idx + 1, v, SEED_INPUT_MAX),
            ));
        }

        let mut arr = [0u32; SEED_INPUT_LEN];
        arr.copy_from_slice(values);
        Ok(Self { values: arr })
    }

    /// Parse whitespace- or comma-separated decimal numbers.
    pub fn parse(text: &str) -> Result<Self> {
        let values = text
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<u32>().map_err(|_| {
                    HookpayError::invalid_input("seed input", format!("'{}' is not a number", s))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(&values)
    }

    /// Values in input order.
    pub fn values(&self) -> &[u32] {
        &self.values
    }

    fn concatenated(&self) -> String {
        self.values.iter().map(|v| v.to_string()).collect()
    }
}

impl fmt::Debug for NumericSeedInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NumericSeedInput([REDACTED])")
    }
}

/// A derived seed string. Treat like a private key.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct DerivedSeed(String);

impl DerivedSeed {
    /// The seed string, including its `s` prefix.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for DerivedSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DerivedSeed([REDACTED])")
    }
}

/// Derive a seed string from eight numbers.
///
/// Pure and deterministic.
///
/// ```rust
/// use hookpay_lib::seed::{derive_seed, NumericSeedInput};
///
/// let input = NumericSeedInput::new(&[
///     222974, 1813, 324410, 332788, 457550, 273507, 360682, 564856,
/// ])
/// .unwrap();
/// let seed = derive_seed(&input).unwrap();
/// assert!(seed.expose().starts_with('s'));
/// ```
pub fn derive_seed(input: &NumericSeedInput) -> Result<DerivedSeed> {
    let mut joined = input.concatenated();
    let digest = Sha512::digest(joined.as_bytes());
    joined.zeroize();

    let mut encoded = encode_unpadded(&digest[..DIGEST_PREFIX_LEN])?;
    let mut seed = String::with_capacity(encoded.len() + 1);
    seed.push(SEED_PREFIX);
    seed.push_str(&encoded);
    encoded.zeroize();

    Ok(DerivedSeed(seed))
}

/// Base 58 of `bytes` read as one big integer; leading zero bytes vanish.
fn encode_unpadded(bytes: &[u8]) -> Result<String> {
    let alphabet = bs58::Alphabet::new(SEED_ALPHABET)
        .map_err(|e| HookpayError::Internal(format!("seed alphabet: {}", e)))?;
    let significant = bytes
        .iter()
        .position(|b| *b != 0)
        .map_or(&bytes[bytes.len()..], |first| &bytes[first..]);
    Ok(bs58::encode(significant)
        .with_alphabet(&alphabet)
        .into_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HookpayErrorCode;

    const FIXED: [u32; 8] = [222974, 1813, 324410, 332788, 457550, 273507, 360682, 564856];

    #[test]
    fn test_fixed_input_vector() {
        let input = NumericSeedInput::new(&FIXED).unwrap();
        let seed = derive_seed(&input).unwrap();
        assert_eq!(seed.expose(), "s9ayLXsteoBUqNN8xRKYaR28QLY1YAFrxXczaAqyuTZak");
    }

    #[test]
    fn test_deterministic() {
        let input = NumericSeedInput::new(&FIXED).unwrap();
        let a = derive_seed(&input).unwrap();
        let b = derive_seed(&input).unwrap();
        assert_eq!(a, b);
        assert!(a.expose().starts_with('s'));
    }

    #[test]
    fn test_single_digit_change_changes_seed() {
        let mut changed = FIXED;
        changed[3] = 332789;
        let a = derive_seed(&NumericSeedInput::new(&FIXED).unwrap()).unwrap();
        let b = derive_seed(&NumericSeedInput::new(&changed).unwrap()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_order_matters() {
        let mut swapped = FIXED;
        swapped.swap(0, 1);
        let a = derive_seed(&NumericSeedInput::new(&FIXED).unwrap()).unwrap();
        let b = derive_seed(&NumericSeedInput::new(&swapped).unwrap()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_leading_zero_byte_is_dropped() {
        // SHA-512("1951111111") begins with 0x00
        let input = NumericSeedInput::new(&[195, 1, 1, 1, 1, 1, 1, 1]).unwrap();
        let seed = derive_seed(&input).unwrap();
        assert_eq!(seed.expose(), "sscUqZcq48kqk5EbXmQfDUpsHHxhA5yHTPa6UW3oY9TV");
        assert!(!seed.expose()[1..].starts_with('r'));
    }

    #[test]
    fn test_unpadded_encoding() {
        assert_eq!(encode_unpadded(&[0, 0, 0]).unwrap(), "");
        assert_eq!(encode_unpadded(&[0, 0, 57]).unwrap(), "z");
        assert_eq!(encode_unpadded(&[58]).unwrap(), "pr");
    }

    #[test]
    fn test_wrong_length_rejected() {
        let err = NumericSeedInput::new(&FIXED[..7]).unwrap_err();
        assert_eq!(err.code(), HookpayErrorCode::InvalidInput);
    }

    #[test]
    fn test_out_of_range_rejected() {
        let mut too_big = FIXED;
        too_big[0] = 1_000_000;
        assert!(NumericSeedInput::new(&too_big).is_err());

        let mut zero = FIXED;
        zero[7] = 0;
        assert!(NumericSeedInput::new(&zero).is_err());
    }

    #[test]
    fn test_parse() {
        let input =
            NumericSeedInput::parse("222974, 1813 324410,332788 457550 273507 360682 564856")
                .unwrap();
        assert_eq!(input.values(), &FIXED);
        assert!(NumericSeedInput::parse("1 2 three 4 5 6 7 8").is_err());
    }

    #[test]
    fn test_debug_is_redacted() {
        let seed = derive_seed(&NumericSeedInput::new(&FIXED).unwrap()).unwrap();
        assert!(!format!("{:?}", seed).contains(seed.expose()));
    }
}
