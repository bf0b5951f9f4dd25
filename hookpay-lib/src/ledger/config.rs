//! Network configuration.
//!
//! # Environment Variables
//!
//! [`NetworkConfig::from_env`] overlays these on the Xahau testnet defaults:
//!
//! - `HOOKPAY_RPC_URL` - JSON-RPC endpoint
//! - `HOOKPAY_NETWORK_ID` - numeric network id (`none` to omit)
//! - `HOOKPAY_ISSUER` - token issuer address
//! - `HOOKPAY_CURRENCY` - token currency code
//! - `HOOKPAY_HOOK_ADDRESS` - account the payment hook is installed on

use crate::{AccountAddress, HookpayError, Result};
use serde::{Deserialize, Serialize};

/// Xahau testnet JSON-RPC endpoint.
pub const XAHAU_TESTNET_URL: &str = "https://xahau-test.net";

/// Xahau testnet network id.
pub const XAHAU_TESTNET_NETWORK_ID: u32 = 21338;

/// Default token issuer.
pub const DEFAULT_ISSUER: &str = "rhyYNdxAyFQ7s2KYXhaTMJKF7NrkkZj1X9";

/// Default token currency code.
pub const DEFAULT_CURRENCY: &str = "JPY";

/// Ledger network and token settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// JSON-RPC endpoint URL.
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,

    /// `NetworkID` stamped on transactions, if the network requires it.
    #[serde(default = "default_network_id")]
    pub network_id: Option<u32>,

    /// Issuer of the token.
    #[serde(default = "default_issuer")]
    pub issuer: AccountAddress,

    /// Currency code of the token.
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Account holding the payment hook.
    #[serde(default)]
    pub hook_address: Option<AccountAddress>,

    /// HTTP request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Delay between validation polls in milliseconds.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// Validation polls before giving up.
    #[serde(default = "default_max_poll_attempts")]
    pub max_poll_attempts: u32,
}

fn default_rpc_url() -> String {
    XAHAU_TESTNET_URL.to_string()
}

fn default_network_id() -> Option<u32> {
    Some(XAHAU_TESTNET_NETWORK_ID)
}

fn default_issuer() -> AccountAddress {
    AccountAddress::new(DEFAULT_ISSUER)
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_poll_interval() -> u64 {
    1000
}

fn default_max_poll_attempts() -> u32 {
    20
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self::xahau_testnet()
    }
}

impl NetworkConfig {
    /// Xahau testnet with the default token.
    pub fn xahau_testnet() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            network_id: default_network_id(),
            issuer: default_issuer(),
            currency: default_currency(),
            hook_address: None,
            timeout_secs: default_timeout(),
            poll_interval_ms: default_poll_interval(),
            max_poll_attempts: default_max_poll_attempts(),
        }
    }

    /// Defaults overlaid with `HOOKPAY_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::xahau_testnet();

        if let Some(url) = lookup("HOOKPAY_RPC_URL") {
            config.rpc_url = url;
        }
        if let Some(raw) = lookup("HOOKPAY_NETWORK_ID") {
            config.network_id = if raw.eq_ignore_ascii_case("none") {
                None
            } else {
                Some(raw.parse().map_err(|_| {
                    HookpayError::invalid_input("HOOKPAY_NETWORK_ID", format!("'{}' is not a number", raw))
                })?)
            };
        }
        if let Some(issuer) = lookup("HOOKPAY_ISSUER") {
            config.issuer = AccountAddress::parse(&issuer)?;
        }
        if let Some(currency) = lookup("HOOKPAY_CURRENCY") {
            config.currency = currency;
        }
        if let Some(hook) = lookup("HOOKPAY_HOOK_ADDRESS") {
            config.hook_address = Some(AccountAddress::parse(&hook)?);
        }

        config.validate()?;
        Ok(config)
    }

    /// Set the RPC URL.
    pub fn with_rpc_url(mut self, url: impl Into<String>) -> Self {
        self.rpc_url = url.into();
        self
    }

    /// Set the hook account.
    pub fn with_hook_address(mut self, hook: AccountAddress) -> Self {
        self.hook_address = Some(hook);
        self
    }

    /// Set the token.
    pub fn with_token(mut self, currency: impl Into<String>, issuer: AccountAddress) -> Self {
        self.currency = currency.into();
        self.issuer = issuer;
        self
    }

    /// Set polling behaviour.
    pub fn with_polling(mut self, interval_ms: u64, max_attempts: u32) -> Self {
        self.poll_interval_ms = interval_ms;
        self.max_poll_attempts = max_attempts;
        self
    }

    /// Per-request HTTP timeout in milliseconds.
    pub fn request_timeout_ms(&self) -> u64 {
        self.timeout_secs.saturating_mul(1000)
    }

    /// Upper bound on time spent polling for validation, in milliseconds.
    pub fn validation_budget_ms(&self) -> u64 {
        self.poll_interval_ms
            .saturating_mul(u64::from(self.max_poll_attempts))
    }

    /// Hook account, or `InvalidInput` if none is configured.
    pub fn require_hook_address(&self) -> Result<&AccountAddress> {
        self.hook_address.as_ref().ok_or_else(|| {
            HookpayError::invalid_input(
                "hook address",
                "not configured (set HOOKPAY_HOOK_ADDRESS)",
            )
        })
    }

    /// Check the currency code shape.
    ///
    /// Three-character ISO-style codes (not `XAH`) or 40 hex characters.
    pub fn validate(&self) -> Result<()> {
        let c = &self.currency;
        let iso = c.len() == 3 && c.chars().all(|ch| ch.is_ascii_alphanumeric()) && c != "XAH";
        let hex160 = c.len() == 40 && c.chars().all(|ch| ch.is_ascii_hexdigit());
        if !(iso || hex160) {
            return Err(HookpayError::invalid_input(
                "currency",
                format!("'{}' is not a valid currency code", c),
            ));
        }
        if self.rpc_url.is_empty() {
            return Err(HookpayError::invalid_input("rpc url", "must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_timeouts_saturate() {
        let mut config = NetworkConfig::default().with_polling(u64::MAX, u32::MAX);
        config.timeout_secs = u64::MAX;
        assert_eq!(config.request_timeout_ms(), u64::MAX);
        assert_eq!(config.validation_budget_ms(), u64::MAX);

        let config = NetworkConfig::default().with_polling(250, 4);
        assert_eq!(config.validation_budget_ms(), 1000);
    }

    #[test]
    fn test_defaults() {
        let config = NetworkConfig::default();
        assert_eq!(config.rpc_url, XAHAU_TESTNET_URL);
        assert_eq!(config.network_id, Some(21338));
        assert_eq!(config.currency, "JPY");
        assert!(config.hook_address.is_none());
        assert!(config.require_hook_address().is_err());
    }

    #[test]
    fn test_env_overlay() {
        let config = NetworkConfig::from_lookup(lookup_from(&[
            ("HOOKPAY_RPC_URL", "http://localhost:5005"),
            ("HOOKPAY_NETWORK_ID", "none"),
            ("HOOKPAY_HOOK_ADDRESS", "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh"),
        ]))
        .unwrap();

        assert_eq!(config.rpc_url, "http://localhost:5005");
        assert_eq!(config.network_id, None);
        assert_eq!(
            config.require_hook_address().unwrap().as_str(),
            "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh"
        );
    }

    #[test]
    fn test_env_rejects_bad_values() {
        assert!(NetworkConfig::from_lookup(lookup_from(&[("HOOKPAY_NETWORK_ID", "abc")])).is_err());
        assert!(NetworkConfig::from_lookup(lookup_from(&[("HOOKPAY_ISSUER", "rBad")])).is_err());
        assert!(NetworkConfig::from_lookup(lookup_from(&[("HOOKPAY_CURRENCY", "XAH")])).is_err());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: NetworkConfig =
            serde_json::from_str(r#"{"rpc_url":"http://127.0.0.1:5005","currency":"USD"}"#).unwrap();
        assert_eq!(config.currency, "USD");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.issuer.as_str(), DEFAULT_ISSUER);
    }
}
