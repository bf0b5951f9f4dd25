//! Ledger access layer.
//!
//! Transaction model, network configuration and the [`LedgerClient`] seam.
//! The HTTP implementation lives behind the `http-executor` feature.

mod client;
mod config;
mod transaction;

#[cfg(feature = "http-executor")]
mod jsonrpc;

pub use client::{LedgerClient, LedgerWallet, SubmissionResult, TrustLine, WalletSecret};
pub use config::{
    NetworkConfig, DEFAULT_CURRENCY, DEFAULT_ISSUER, XAHAU_TESTNET_NETWORK_ID, XAHAU_TESTNET_URL,
};
pub use transaction::{
    hex_to_string, string_to_hex, IssuedAmount, Memo, MemoWrapper, Transaction, TransactionType,
    JSON_MEMO_FORMAT,
};

#[cfg(feature = "http-executor")]
pub use jsonrpc::JsonRpcLedgerClient;
