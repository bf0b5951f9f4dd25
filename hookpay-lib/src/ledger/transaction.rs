//! Ledger transaction model.
//!
//! Transactions are built as JSON objects in the ledger's `tx_json` shape and
//! left for the server to autofill (`Sequence`, `Fee`, `LastLedgerSequence`).
//! Only the three transaction types the tooling submits are modelled.

use crate::{AccountAddress, Amount, HookpayError, Result};
use serde::{Deserialize, Serialize};

/// MIME type stored in `MemoFormat` for JSON payloads.
pub const JSON_MEMO_FORMAT: &str = "application/json";

/// Supported transaction types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionType {
    /// Create or modify a trust line.
    TrustSet,
    /// Move XAH or issued tokens.
    Payment,
    /// Trigger a hook on the destination account.
    Invoke,
}

/// Issued-currency amount (`{currency, issuer, value}`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedAmount {
    /// Currency code, e.g. `JPY`.
    pub currency: String,
    /// Issuing account.
    pub issuer: AccountAddress,
    /// Decimal value as a string.
    pub value: String,
}

impl IssuedAmount {
    /// Create an issued amount.
    pub fn new(currency: impl Into<String>, issuer: AccountAddress, value: &Amount) -> Self {
        Self {
            currency: currency.into(),
            issuer,
            value: value.to_ledger_value(),
        }
    }
}

/// A single memo. Fields hold uppercase hex.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Memo {
    /// Hex-encoded memo payload.
    pub memo_data: String,
    /// Hex-encoded MIME type of the payload.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub memo_format: Option<String>,
}

impl Memo {
    /// Memo carrying a JSON document.
    pub fn json(json: &str) -> Self {
        Self {
            memo_data: string_to_hex(json),
            memo_format: Some(string_to_hex(JSON_MEMO_FORMAT)),
        }
    }

    /// Decode `MemoData` back to UTF-8.
    pub fn data_as_string(&self) -> Result<String> {
        hex_to_string(&self.memo_data)
    }

    /// Decode `MemoFormat`, if present.
    pub fn format_as_string(&self) -> Result<Option<String>> {
        self.memo_format.as_deref().map(hex_to_string).transpose()
    }
}

/// `{ "Memo": { ... } }` wrapper used inside the `Memos` array.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoWrapper {
    #[serde(rename = "Memo")]
    pub memo: Memo,
}

/// An unsigned transaction in `tx_json` form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Transaction {
    pub transaction_type: TransactionType,
    pub account: AccountAddress,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub destination: Option<AccountAddress>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub amount: Option<IssuedAmount>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub limit_amount: Option<IssuedAmount>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub memos: Vec<MemoWrapper>,
    #[serde(rename = "NetworkID", skip_serializing_if = "Option::is_none", default)]
    pub network_id: Option<u32>,
}

impl Transaction {
    fn base(transaction_type: TransactionType, account: AccountAddress) -> Self {
        Self {
            transaction_type,
            account,
            destination: None,
            amount: None,
            limit_amount: None,
            memos: Vec::new(),
            network_id: None,
        }
    }

    /// TrustSet opening a trust line from `account` to the limit's issuer.
    pub fn trust_set(account: AccountAddress, limit: IssuedAmount) -> Self {
        Self {
            limit_amount: Some(limit),
            ..Self::base(TransactionType::TrustSet, account)
        }
    }

    /// Issued-currency payment.
    pub fn payment(account: AccountAddress, destination: AccountAddress, amount: IssuedAmount) -> Self {
        Self {
            destination: Some(destination),
            amount: Some(amount),
            ..Self::base(TransactionType::Payment, account)
        }
    }

    /// Invoke targeting the hook installed on `destination`.
    pub fn invoke(account: AccountAddress, destination: AccountAddress) -> Self {
        Self {
            destination: Some(destination),
            ..Self::base(TransactionType::Invoke, account)
        }
    }

    /// Attach an issued amount (used by charge invokes).
    pub fn with_amount(mut self, amount: IssuedAmount) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Append a memo.
    pub fn with_memo(mut self, memo: Memo) -> Self {
        self.memos.push(MemoWrapper { memo });
        self
    }

    /// Set the network id (required on networks with id above 1024).
    pub fn with_network_id(mut self, network_id: Option<u32>) -> Self {
        self.network_id = network_id;
        self
    }

    /// First memo, if any.
    pub fn first_memo(&self) -> Option<&Memo> {
        self.memos.first().map(|w| &w.memo)
    }

    /// Serialize to a `tx_json` value.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Uppercase hex of a UTF-8 string.
pub fn string_to_hex(s: &str) -> String {
    hex::encode_upper(s.as_bytes())
}

/// Decode hex (either case) into a UTF-8 string.
pub fn hex_to_string(hex_str: &str) -> Result<String> {
    let bytes = hex::decode(hex_str)
        .map_err(|e| HookpayError::EncodingFailure(format!("invalid hex: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|e| HookpayError::EncodingFailure(format!("memo is not UTF-8: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> AccountAddress {
        AccountAddress::new("rhyYNdxAyFQ7s2KYXhaTMJKF7NrkkZj1X9")
    }

    #[test]
    fn test_payment_json_shape() {
        let tx = Transaction::payment(
            AccountAddress::new("rUser"),
            AccountAddress::account_zero(),
            IssuedAmount::new("JPY", issuer(), &Amount::from_units(100)),
        )
        .with_network_id(Some(21338));

        let json = tx.to_json().unwrap();
        assert_eq!(json["TransactionType"], "Payment");
        assert_eq!(json["Account"], "rUser");
        assert_eq!(json["Destination"], "rrrrrrrrrrrrrrrrrrrrrhoLvTp");
        assert_eq!(json["Amount"]["currency"], "JPY");
        assert_eq!(json["Amount"]["value"], "100");
        assert_eq!(json["NetworkID"], 21338);
        assert!(json.get("Memos").is_none());
        assert!(json.get("LimitAmount").is_none());
    }

    #[test]
    fn test_trust_set_json_shape() {
        let tx = Transaction::trust_set(
            AccountAddress::new("rUser"),
            IssuedAmount::new("JPY", issuer(), &Amount::from_units(1_000_000)),
        );
        let json = tx.to_json().unwrap();
        assert_eq!(json["TransactionType"], "TrustSet");
        assert_eq!(json["LimitAmount"]["issuer"], issuer().as_str());
        assert!(json.get("Destination").is_none());
    }

    #[test]
    fn test_memo_hex_round_trip() {
        let memo = Memo::json(r#"{"type":"withdraw","amount":"5"}"#);
        assert_eq!(memo.memo_format.as_deref(), Some("6170706C69636174696F6E2F6A736F6E"));
        assert_eq!(memo.data_as_string().unwrap(), r#"{"type":"withdraw","amount":"5"}"#);

        let tx = Transaction::invoke(AccountAddress::new("rOp"), AccountAddress::new("rHook"))
            .with_memo(memo);
        let json = tx.to_json().unwrap();
        assert!(json["Memos"][0]["Memo"]["MemoData"].is_string());
        assert!(json["Memos"][0]["Memo"]["MemoFormat"].is_string());
    }

    #[test]
    fn test_hex_to_string_rejects_bad_input() {
        assert!(hex_to_string("zz").is_err());
        assert!(hex_to_string("FF").is_err()); // not UTF-8
        assert_eq!(hex_to_string("6869").unwrap(), "hi");
    }
}
