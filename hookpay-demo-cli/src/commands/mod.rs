//! CLI command implementations

pub mod allowance;
pub mod seed;
pub mod token;

use anyhow::{anyhow, Context as _, Result};
use std::env::VarError;
use hookpay_lib::{
    AccountAddress, Ed25519MessageSigner, JsonRpcLedgerClient, LedgerWallet, NetworkConfig,
    WalletSecret,
};

/// Global options shared by ledger commands.
pub struct Context {
    pub account: Option<String>,
    pub seed_env: String,
    pub key_env: String,
    pub rpc_url: Option<String>,
    pub hook_address: Option<String>,
    pub verbose: bool,
}

impl Context {
    /// Environment configuration with command-line overrides applied.
    pub fn network_config(&self) -> Result<NetworkConfig> {
        let mut config = NetworkConfig::from_env().context("Invalid HOOKPAY_* configuration")?;
        if let Some(url) = &self.rpc_url {
            config = config.with_rpc_url(url.clone());
        }
        if let Some(hook) = &self.hook_address {
            config = config.with_hook_address(AccountAddress::parse(hook)?);
        }
        tracing::debug!(rpc_url = %config.rpc_url, network_id = ?config.network_id, "network config");
        Ok(config)
    }

    /// The acting account's address.
    pub fn account(&self) -> Result<AccountAddress> {
        let raw = self
            .account
            .as_deref()
            .ok_or_else(|| anyhow!("No account given. Pass --account or set HOOKPAY_ACCOUNT."))?;
        Ok(AccountAddress::parse(raw)?)
    }

    /// Acting account plus its secret from the environment.
    pub fn wallet(&self) -> Result<LedgerWallet> {
        let address = self.account()?;
        let secret = match std::env::var(&self.seed_env) {
            Ok(secret) => secret,
            Err(VarError::NotPresent) => {
                return Err(anyhow!(
                    "Secret not found. Set the {} environment variable.",
                    self.seed_env
                ))
            }
            Err(VarError::NotUnicode(_)) => {
                return Err(anyhow!("{} is set but is not valid UTF-8", self.seed_env))
            }
        };
        Ok(LedgerWallet::new(address, WalletSecret::new(secret)))
    }

    /// Allowance signer, if a key is configured.
    pub fn signer(&self) -> Result<Option<Ed25519MessageSigner>> {
        match std::env::var(&self.key_env) {
            Ok(key) => Ok(Some(Ed25519MessageSigner::from_secret_hex(&key)?)),
            Err(VarError::NotPresent) => Ok(None),
            Err(VarError::NotUnicode(_)) => {
                Err(anyhow!("{} is set but is not valid UTF-8", self.key_env))
            }
        }
    }

    /// JSON-RPC client for `config`.
    pub fn ledger(&self, config: &NetworkConfig) -> Result<JsonRpcLedgerClient> {
        Ok(JsonRpcLedgerClient::new(config.clone())?)
    }
}
