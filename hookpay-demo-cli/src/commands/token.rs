//! Token commands - trust lines, balances, transfers and burns

use anyhow::Result;
use hookpay_lib::{AccountAddress, TokenOperations};

use super::Context;
use crate::ui;

fn operations(ctx: &Context) -> Result<TokenOperations<hookpay_lib::JsonRpcLedgerClient>> {
    let config = ctx.network_config()?;
    let ledger = ctx.ledger(&config)?;
    Ok(TokenOperations::new(ledger, config))
}

#[tracing::instrument(skip(ctx))]
pub async fn trust(ctx: &Context, limit: &str) -> Result<()> {
    ui::header("Set Trust Line");
    let ops = operations(ctx)?;
    let wallet = ctx.wallet()?;

    ui::key_value("Account", wallet.address.as_str());
    ui::key_value("Issuer", ops.config().issuer.as_str());
    ui::key_value("Limit", &format!("{} {}", limit, ops.config().currency));

    let spinner = ui::spinner("Submitting TrustSet...");
    let result = ops.set_trust_line(&wallet, limit).await;
    spinner.finish_and_clear();

    let result = result?;
    ui::success("Trust line set");
    ui::submission(&result);
    Ok(())
}

#[tracing::instrument(skip(ctx))]
pub async fn balance(ctx: &Context, address: Option<&str>) -> Result<()> {
    ui::header("Token Balance");
    let ops = operations(ctx)?;
    let address = match address {
        Some(a) => AccountAddress::parse(a)?,
        None => ctx.account()?,
    };

    let spinner = ui::spinner("Querying trust lines...");
    let lines = ops.check_balance(&address).await;
    spinner.finish_and_clear();
    let lines = lines?;

    ui::key_value("Account", address.as_str());
    if lines.is_empty() {
        ui::info("No trust lines");
        return Ok(());
    }

    ui::separator();
    for line in &lines {
        let marker = if line.currency == ops.config().currency && line.account == ops.config().issuer {
            " *"
        } else {
            ""
        };
        ui::key_value(
            &format!("{} ({}){}", line.currency, line.account, marker),
            &format!("{} / limit {}", line.balance, line.limit),
        );
    }
    if ctx.verbose {
        ui::json(&serde_json::to_value(&lines)?);
    }
    Ok(())
}

#[tracing::instrument(skip(ctx))]
pub async fn send(ctx: &Context, destination: &str, amount: &str) -> Result<()> {
    ui::header("Send Tokens");
    let ops = operations(ctx)?;
    let wallet = ctx.wallet()?;
    let destination = AccountAddress::parse(destination)?;

    ui::key_value("From", wallet.address.as_str());
    ui::key_value("To", destination.as_str());
    ui::key_value("Amount", &format!("{} {}", amount, ops.config().currency));

    let spinner = ui::spinner("Submitting Payment...");
    let result = ops.send_token(&wallet, &destination, amount).await;
    spinner.finish_and_clear();

    let result = result?;
    ui::success("Tokens sent");
    ui::submission(&result);
    Ok(())
}

#[tracing::instrument(skip(ctx))]
pub async fn burn(ctx: &Context, amount: &str, yes: bool) -> Result<()> {
    ui::header("Burn Tokens");
    let ops = operations(ctx)?;
    let wallet = ctx.wallet()?;

    ui::warning(&format!(
        "{} {} will be sent to {} and cannot be recovered.",
        amount,
        ops.config().currency,
        AccountAddress::ACCOUNT_ZERO
    ));
    if !yes && !ui::confirm("Continue?", false)? {
        ui::info("Burn cancelled");
        return Ok(());
    }

    let spinner = ui::spinner("Submitting Payment to black hole...");
    let result = ops.burn_token(&wallet, amount).await;
    spinner.finish_and_clear();

    let result = result?;
    ui::success("Tokens burned");
    ui::submission(&result);
    Ok(())
}
