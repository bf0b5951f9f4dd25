//! Safe monetary arithmetic using fixed-point decimal
//!
//! Amounts are parsed from and rendered to decimal strings and never pass
//! through `f64`. Cap top-ups are plain [`Amount::checked_add`] calls, so
//! `5000 + 2000` is exactly `7000`.

use crate::{HookpayError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Monetary amount with fixed-point precision
///
/// Serializes as a JSON string, preserving the scale it was parsed with
/// (`"100.50"` stays `"100.50"`). Deserialization goes through
/// [`Amount::parse`], so only plain decimal strings are accepted.
///
/// # Examples
///
/// ```rust
/// use hookpay_lib::Amount;
///
/// let cap = Amount::parse("5000").unwrap();
/// let top_up = Amount::parse("2000").unwrap();
/// assert_eq!(cap.checked_add(&top_up).unwrap().to_string(), "7000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Amount {
    value: Decimal,
}

impl Amount {
    /// Create from a whole number of units.
    pub fn from_units(units: i64) -> Self {
        Self {
            value: Decimal::from(units),
        }
    }

    /// Parse a decimal string (e.g. `"123.45"`).
    ///
    /// Only `-?digits(.digits)?` is accepted. Exponents, digit separators,
    /// a leading `+` and a bare trailing `.` are rejected rather than
    /// rewritten, since the text ends up in signed messages.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if the string is not a plain decimal number.
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if !is_plain_decimal(trimmed) {
            return Err(HookpayError::invalid_input(
                "amount",
                format!("'{}' is not a plain decimal number", s),
            ));
        }
        Decimal::from_str(trimmed)
            .map(|value| Self { value })
            .map_err(|e| HookpayError::invalid_input("amount", format!("'{}': {}", s, e)))
    }

    /// Parse a `value` reported by the ledger, which may use exponent
    /// notation (`"1e-20"`). Not for user input.
    pub fn from_ledger_value(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let parsed = if trimmed.contains(['e', 'E']) {
            Decimal::from_scientific(trimmed)
        } else {
            Decimal::from_str(trimmed)
        };
        parsed
            .map(|value| Self { value })
            .map_err(|e| HookpayError::invalid_input("ledger value", format!("'{}': {}", s, e)))
    }

    /// Parse an amount that must be a positive whole number of token units.
    ///
    /// `"100.0"` is accepted (its value is integral) and normalized to
    /// `"100"`; `"100.5"` is rejected instead of being truncated.
    ///
    /// ```rust
    /// use hookpay_lib::Amount;
    ///
    /// assert_eq!(Amount::parse_token_amount("500.0").unwrap().to_string(), "500");
    /// assert!(Amount::parse_token_amount("100.5").is_err());
    /// assert!(Amount::parse_token_amount("0").is_err());
    /// ```
    pub fn parse_token_amount(s: &str) -> Result<Self> {
        let amount = Self::parse(s)?;
        if !amount.is_integer() {
            return Err(HookpayError::invalid_input(
                "amount",
                format!("'{}' must be a whole number of tokens", s),
            ));
        }
        if amount.value <= Decimal::ZERO {
            return Err(HookpayError::invalid_input(
                "amount",
                format!("'{}' must be positive", s),
            ));
        }
        Ok(amount.normalized())
    }

    /// True if the value has no fractional part.
    pub fn is_integer(&self) -> bool {
        self.value.fract().is_zero()
    }

    /// True if the value is below zero.
    pub fn is_negative(&self) -> bool {
        self.value.is_sign_negative() && !self.value.is_zero()
    }

    /// Checked addition (returns None on overflow)
    pub fn checked_add(&self, other: &Self) -> Option<Self> {
        self.value
            .checked_add(other.value)
            .map(|value| Self { value })
    }

    /// Checked subtraction (returns None on overflow)
    pub fn checked_sub(&self, other: &Self) -> Option<Self> {
        self.value
            .checked_sub(other.value)
            .map(|value| Self { value })
    }

    /// Check if this amount is less than or equal to `limit`
    pub fn is_within_limit(&self, limit: &Self) -> bool {
        self.value <= limit.value
    }

    /// Get zero amount
    pub fn zero() -> Self {
        Self {
            value: Decimal::ZERO,
        }
    }

    /// Check if amount is zero
    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    /// Get the internal Decimal value.
    pub fn as_decimal(&self) -> Decimal {
        self.value
    }

    /// Same value with trailing fractional zeros removed.
    pub fn normalized(&self) -> Self {
        Self {
            value: self.value.normalize(),
        }
    }

    /// Canonical string without trailing fractional zeros (`"100.0"` -> `"100"`).
    ///
    /// Used for ledger `value` fields.
    pub fn to_ledger_value(&self) -> String {
        self.value.normalize().to_string()
    }
}

fn is_plain_decimal(s: &str) -> bool {
    let unsigned = s.strip_prefix('-').unwrap_or(s);
    let (whole, fraction) = match unsigned.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (unsigned, None),
    };
    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    all_digits(whole) && fraction.map_or(true, all_digits)
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl FromStr for Amount {
    type Err = HookpayError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HookpayErrorCode;

    #[test]
    fn test_amount_parsing() {
        let amt = Amount::parse("1000").unwrap();
        assert_eq!(amt, Amount::from_units(1000));
        assert_eq!(amt.to_string(), "1000");

        let amt = Amount::parse("123.45").unwrap();
        assert_eq!(amt.to_string(), "123.45");

        assert!(Amount::parse("abc").is_err());
        assert!(Amount::parse("").is_err());
    }

    #[test]
    fn test_top_up_is_exact() {
        let cap = Amount::parse("5000").unwrap();
        let top_up = Amount::parse("2000").unwrap();
        let next = cap.checked_add(&top_up).unwrap();

        assert_eq!(next.to_string(), "7000");
        assert_ne!(next.to_string(), "7000.000000000001");
    }

    #[test]
    fn test_fractional_sums_are_exact() {
        // 0.1 + 0.2 is the classic binary floating point trap
        let a = Amount::parse("0.1").unwrap();
        let b = Amount::parse("0.2").unwrap();
        assert_eq!(a.checked_add(&b).unwrap().to_string(), "0.3");
    }

    #[test]
    fn test_token_amount_rejects_fraction() {
        let err = Amount::parse_token_amount("100.5").unwrap_err();
        assert_eq!(err.code(), HookpayErrorCode::InvalidInput);

        let err = Amount::parse_token_amount("-5").unwrap_err();
        assert_eq!(err.code(), HookpayErrorCode::InvalidInput);

        let ok = Amount::parse_token_amount("100.0").unwrap();
        assert_eq!(ok.to_ledger_value(), "100");
        assert_eq!(ok.to_string(), "100");
    }

    #[test]
    fn test_rejects_non_plain_decimal_syntax() {
        for input in ["1e3", "1E3", "1_000", "1_0_0", "+5", "100.", ".5", "-", "1.2.3", " 1 2 "] {
            let err = Amount::parse(input).unwrap_err();
            assert_eq!(err.code(), HookpayErrorCode::InvalidInput, "input {:?}", input);
            assert!(Amount::parse_token_amount(input).is_err(), "input {:?}", input);
        }
        assert_eq!(Amount::parse(" 42 ").unwrap().to_string(), "42");
        assert_eq!(Amount::parse("-0.5").unwrap().to_string(), "-0.5");
    }

    #[test]
    fn test_ledger_values_allow_exponents() {
        assert_eq!(Amount::from_ledger_value("1e3").unwrap(), Amount::from_units(1000));
        assert_eq!(Amount::from_ledger_value("-25.5").unwrap().to_string(), "-25.5");
        assert!(Amount::from_ledger_value("1e-20").unwrap().as_decimal() > Decimal::ZERO);
        assert!(Amount::from_ledger_value("garbage").is_err());
    }

    #[test]
    fn test_deserialize_rejects_non_plain_decimal() {
        assert!(serde_json::from_str::<Amount>("\"1e3\"").is_err());
        assert!(serde_json::from_str::<Amount>("\"1_000\"").is_err());
        assert!(serde_json::from_str::<Amount>("1000").is_err());
    }

    #[test]
    fn test_is_within_limit() {
        let amt = Amount::from_units(100);
        let limit = Amount::from_units(150);
        assert!(amt.is_within_limit(&limit));
        assert!(!Amount::from_units(200).is_within_limit(&limit));
    }

    #[test]
    fn test_serializes_as_string() {
        let amt = Amount::parse("100.50").unwrap();
        let json = serde_json::to_string(&amt).unwrap();
        assert_eq!(json, "\"100.50\"");
        let parsed: Amount = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.to_string(), "100.50");
    }

    #[test]
    fn test_negative() {
        assert!(Amount::parse("-1").unwrap().is_negative());
        assert!(!Amount::zero().is_negative());
    }
}
