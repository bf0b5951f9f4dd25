//! Allowance commands - sign, redeem, charge, withdraw and inspect memos

use anyhow::{Context as _, Result};
use hookpay_allowance::{
    encode_allowance_update_payload, encode_payment_payload, encode_withdraw_payload,
    sign_allowance, AllowanceAuthorization, AllowanceOperations, AllowanceRecord, PaymentRequest,
    TransportPayload,
};
use hookpay_lib::ledger::{string_to_hex, JSON_MEMO_FORMAT};
use hookpay_lib::{AccountAddress, Amount, JsonRpcLedgerClient, MessageSigner};
use std::path::Path;

use super::Context;
use crate::ui;

fn operations(ctx: &Context) -> Result<AllowanceOperations<JsonRpcLedgerClient>> {
    let config = ctx.network_config()?;
    config.require_hook_address()?;
    let ledger = ctx.ledger(&config)?;
    Ok(AllowanceOperations::new(ledger, config))
}

fn read_authorization(path: &Path) -> Result<AllowanceAuthorization> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read authorization {}", path.display()))?;
    let auth: AllowanceAuthorization =
        serde_json::from_str(&contents).context("Failed to parse authorization")?;
    // Re-validate fields that came from disk
    let record = AllowanceRecord::new(
        auth.record.payer_address,
        auth.record.payee_address,
        auth.record.cap_amount,
    )?;
    Ok(AllowanceAuthorization::new(record, &auth.signature)?)
}

fn emit_authorization(auth: &AllowanceAuthorization, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(auth)?;
    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write authorization {}", path.display()))?;
            ui::success(&format!("Authorization written to {}", path.display()));
        }
        None => println!("{}", json),
    }
    ui::warning("The authorization is a bearer credential: anyone holding it can redeem up to the cap.");
    Ok(())
}

fn print_payload(payload: &TransportPayload) -> Result<()> {
    ui::key_value("MemoData", &payload.memo_data);
    ui::key_value("MemoFormat", &payload.memo_format);
    ui::separator();
    ui::json(&serde_json::from_str(&payload.json()?)?);
    Ok(())
}

pub fn sign(ctx: &Context, payee: &str, cap: &str, output: Option<&Path>) -> Result<()> {
    ui::header("Sign Allowance");
    let payer = ctx.account()?;
    let record = AllowanceRecord::new(payer, AccountAddress::parse(payee)?, Amount::parse(cap)?)?;
    let signer = ctx.signer()?;

    let auth = sign_allowance(&record, signer.as_ref().map(|s| s as &dyn MessageSigner))
        .with_context(|| format!("Set {} to a hex Ed25519 key", ctx.key_env))?;

    if let Some(signer) = &signer {
        ui::key_value("Public key", &signer.public_key_hex());
    }
    ui::key_value("Message", &String::from_utf8_lossy(&hookpay_allowance::build_allowance_message(&record)));
    emit_authorization(&auth, output)
}

#[tracing::instrument(skip(ctx))]
pub async fn pay(ctx: &Context, authorization: &Path, amount: &str) -> Result<()> {
    ui::header("Allowance Payment");
    let ops = operations(ctx)?;
    let operator = ctx.wallet()?;
    let auth = read_authorization(authorization)?;

    ui::key_value("Payer", auth.record.payer_address.as_str());
    ui::key_value("Operator", operator.address.as_str());
    ui::key_value("Amount", amount);
    ui::key_value("Cap", &auth.cap().to_string());

    let spinner = ui::spinner("Submitting Invoke...");
    let result = ops.send_payment_with_allowance(&operator, &auth, amount).await;
    spinner.finish_and_clear();

    let result = result?;
    ui::success("Payment accepted by the hook");
    ui::submission(&result);
    Ok(())
}

#[tracing::instrument(skip(ctx))]
pub async fn charge(
    ctx: &Context,
    payee: &str,
    amount: &str,
    remaining: &str,
    output: Option<&Path>,
) -> Result<()> {
    ui::header("Charge and Update Allowance");
    let ops = operations(ctx)?;
    let wallet = ctx.wallet()?;
    let payee = AccountAddress::parse(payee)?;
    let signer = ctx.signer()?;

    ui::key_value("Payer", wallet.address.as_str());
    ui::key_value("Payee", payee.as_str());
    ui::key_value("Charge", amount);
    ui::key_value("Remaining", remaining);

    let spinner = ui::spinner("Submitting Invoke...");
    let outcome = ops
        .charge_and_update_allowance(
            &wallet,
            signer.as_ref().map(|s| s as &dyn MessageSigner),
            &payee,
            amount,
            remaining,
        )
        .await;
    spinner.finish_and_clear();

    let outcome = outcome?;
    ui::success(&format!("Allowance raised to {}", outcome.authorization.cap()));
    ui::submission(&outcome.submission);
    emit_authorization(&outcome.authorization, output)
}

#[tracing::instrument(skip(ctx))]
pub async fn withdraw(ctx: &Context, amount: &str) -> Result<()> {
    ui::header("Withdraw");
    let ops = operations(ctx)?;
    let wallet = ctx.wallet()?;

    let spinner = ui::spinner("Submitting Invoke...");
    let result = ops.withdraw_balance(&wallet, amount).await;
    spinner.finish_and_clear();

    let result = result?;
    ui::success(&format!("Withdrew {}", amount));
    ui::submission(&result);
    Ok(())
}

pub fn payment_payload(authorization: &Path, amount: &str) -> Result<()> {
    ui::header("allowance_payment payload");
    let auth = read_authorization(authorization)?;
    let request = PaymentRequest::new(auth, Amount::parse_token_amount(amount)?);
    if !request.is_within_cap() {
        ui::warning("Amount exceeds the signed cap; the hook will reject it.");
    }
    print_payload(&encode_payment_payload(&request)?)
}

pub fn update_payload(authorization: &Path) -> Result<()> {
    ui::header("update_allowance payload");
    let auth = read_authorization(authorization)?;
    print_payload(&encode_allowance_update_payload(&auth.record, &auth.signature)?)
}

pub fn withdraw_payload(amount: &str) -> Result<()> {
    ui::header("withdraw payload");
    print_payload(&encode_withdraw_payload(&Amount::parse_token_amount(amount)?)?)
}

pub fn inspect(memo_data: &str, memo_format: Option<&str>) -> Result<()> {
    ui::header("Inspect Memo");
    let payload = TransportPayload {
        memo_data: memo_data.trim().to_string(),
        memo_format: memo_format
            .map(|f| f.trim().to_string())
            .unwrap_or_else(|| string_to_hex(JSON_MEMO_FORMAT)),
    };
    let memo = payload.decode()?;
    ui::key_value("Type", memo.kind());
    ui::separator();
    ui::json(&serde_json::to_value(&memo)?);
    Ok(())
}
