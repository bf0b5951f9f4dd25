//! JSON-RPC ledger client.
//!
//! Talks to a `xahaud`/`rippled` JSON-RPC endpoint. Submission uses the
//! server's sign-and-submit mode, which also autofills `Sequence`, `Fee` and
//! `Flags`; the endpoint therefore sees the wallet secret and must be one you
//! trust (a local node or a testnet node). After submission the client polls
//! `tx` until the transaction is in a validated ledger.
//!
//! # Feature Flags
//!
//! Requires the `http-executor` feature:
//!
//! ```toml
//! [dependencies]
//! hookpay-lib = { version = "0.1", features = ["http-executor"] }
//! ```

use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

use super::{LedgerClient, LedgerWallet, NetworkConfig, SubmissionResult, Transaction, TrustLine};
use crate::{AccountAddress, HookpayError, Result};

/// Upper bound on the fee multiplier the server may apply when autofilling.
const FEE_MULT_MAX: u32 = 1000;

/// Engine result prefixes that mean the transaction was not applied and
/// never will be.
const REJECTED_PREFIXES: [&str; 3] = ["tem", "tef", "tel"];

/// Ledger client over HTTP JSON-RPC.
pub struct JsonRpcLedgerClient {
    config: NetworkConfig,
    client: reqwest::Client,
}

impl JsonRpcLedgerClient {
    /// Create a client for the configured endpoint.
    pub fn new(config: NetworkConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| HookpayError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Get the configuration.
    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Call `method` and return its `result` object.
    async fn call(&self, method: &str, params: Value) -> Result<Value> {
        let body = json!({ "method": method, "params": [params] });

        let response = self
            .client
            .post(&self.config.rpc_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(method, e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(HookpayError::Transport(format!(
                "{} returned HTTP {}: {}",
                method,
                status.as_u16(),
                text
            )));
        }

        let mut envelope: Value = response.json().await.map_err(|e| {
            HookpayError::EncodingFailure(format!("Failed to parse {} response: {}", method, e))
        })?;
        let result = envelope
            .get_mut("result")
            .map(Value::take)
            .ok_or_else(|| {
                HookpayError::EncodingFailure(format!("{} response has no result", method))
            })?;

        if result.get("status").and_then(Value::as_str) == Some("error") {
            return Err(HookpayError::Rpc {
                method: method.to_string(),
                error: result
                    .get("error")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown")
                    .to_string(),
                message: result
                    .get("error_message")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            });
        }

        Ok(result)
    }

    fn map_reqwest_error(&self, method: &str, err: reqwest::Error) -> HookpayError {
        if err.is_timeout() {
            HookpayError::ConnectionTimeout {
                operation: method.to_string(),
                timeout_ms: self.config.request_timeout_ms(),
            }
        } else if err.is_connect() {
            HookpayError::ConnectionFailed {
                target: self.config.rpc_url.clone(),
                reason: err.to_string(),
            }
        } else {
            HookpayError::transport(err)
        }
    }

    /// Poll `tx` until `hash` is validated or attempts run out.
    async fn wait_for_validation(&self, hash: &str, engine_result: &str) -> Result<SubmissionResult> {
        let interval = Duration::from_millis(self.config.poll_interval_ms);

        for attempt in 0..self.config.max_poll_attempts {
            match self.call("tx", json!({ "transaction": hash })).await {
                Ok(result) if result.get("validated").and_then(Value::as_bool) == Some(true) => {
                    let transaction_result = result
                        .pointer("/meta/TransactionResult")
                        .and_then(Value::as_str)
                        .unwrap_or("unknown")
                        .to_string();
                    let outcome = SubmissionResult {
                        hash: hash.to_string(),
                        engine_result: engine_result.to_string(),
                        transaction_result,
                        ledger_index: result.get("ledger_index").and_then(Value::as_u64),
                        validated: true,
                    };
                    if !outcome.is_success() {
                        return Err(HookpayError::TransactionFailed {
                            hash: outcome.hash,
                            result: outcome.transaction_result,
                        });
                    }
                    return Ok(outcome);
                }
                Ok(_) => {}
                Err(HookpayError::Rpc { ref error, .. }) if error == "txnNotFound" => {}
                Err(e) => return Err(e),
            }

            #[cfg(feature = "tracing")]
            tracing::debug!(hash, attempt, "transaction not validated yet");
            #[cfg(not(feature = "tracing"))]
            let _ = attempt;

            tokio::time::sleep(interval).await;
        }

        Err(HookpayError::ConnectionTimeout {
            operation: format!("validation of {}", hash),
            timeout_ms: self.config.validation_budget_ms(),
        })
    }
}

#[async_trait]
impl LedgerClient for JsonRpcLedgerClient {
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, tx, wallet), fields(tx_type = ?tx.transaction_type, account = %wallet.address)))]
    async fn submit_and_wait(
        &self,
        tx: &Transaction,
        wallet: &LedgerWallet,
    ) -> Result<SubmissionResult> {
        let params = json!({
            "tx_json": tx.to_json()?,
            "secret": wallet.secret.expose(),
            "fee_mult_max": FEE_MULT_MAX,
        });
        let result = self.call("submit", params).await?;

        let engine_result = result
            .get("engine_result")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string();
        let message = result
            .get("engine_result_message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        if REJECTED_PREFIXES.iter().any(|p| engine_result.starts_with(p)) {
            return Err(HookpayError::LedgerRejected {
                engine_result,
                message,
            });
        }

        let hash = result
            .pointer("/tx_json/hash")
            .and_then(Value::as_str)
            .ok_or_else(|| HookpayError::EncodingFailure("submit response has no hash".into()))?
            .to_string();

        #[cfg(feature = "tracing")]
        tracing::info!(%hash, %engine_result, "transaction submitted");

        self.wait_for_validation(&hash, &engine_result).await
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self)))]
    async fn account_lines(&self, account: &AccountAddress) -> Result<Vec<TrustLine>> {
        let mut lines = Vec::new();
        let mut marker: Option<Value> = None;

        loop {
            let mut params = json!({ "account": account, "ledger_index": "current" });
            if let Some(m) = marker.take() {
                params["marker"] = m;
            }

            let mut result = match self.call("account_lines", params).await {
                Err(HookpayError::Rpc { ref error, .. }) if error == "actNotFound" => {
                    return Err(HookpayError::not_found("account", account.as_str()));
                }
                other => other?,
            };
            let page: Vec<TrustLine> = serde_json::from_value(
                result.get_mut("lines").map(Value::take).unwrap_or(Value::Array(Vec::new())),
            )?;
            lines.extend(page);

            match result.get_mut("marker").map(Value::take) {
                Some(m) if !m.is_null() => marker = Some(m),
                _ => break,
            }
        }

        Ok(lines)
    }
}
