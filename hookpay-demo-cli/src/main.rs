//! Hookpay Demo CLI
//!
//! Command-line interface for seed derivation, token operations and
//! allowance payments on Xahau.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod ui;

#[derive(Parser)]
#[command(name = "hookpay-demo")]
#[command(about = "Hookpay Demo CLI - Tokens and pre-signed allowances on Xahau", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Account address acting in ledger commands
    #[arg(long, global = true, env = "HOOKPAY_ACCOUNT")]
    account: Option<String>,

    /// Environment variable holding the account's secret
    #[arg(long, global = true, default_value = "HOOKPAY_SEED")]
    seed_env: String,

    /// Environment variable holding the hex Ed25519 key that signs allowances
    #[arg(long, global = true, default_value = "HOOKPAY_SIGNING_KEY")]
    key_env: String,

    /// JSON-RPC endpoint (overrides HOOKPAY_RPC_URL)
    #[arg(long, global = true)]
    rpc_url: Option<String>,

    /// Payment hook account (overrides HOOKPAY_HOOK_ADDRESS)
    #[arg(long, global = true)]
    hook_address: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive a wallet seed from eight numbers
    Seed {
        /// Eight numbers between 1 and 999999 (prompted if omitted)
        numbers: Vec<String>,
    },

    /// Issued token operations
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Pre-signed allowance payments
    Allowance {
        #[command(subcommand)]
        action: AllowanceAction,
    },
}

#[derive(Subcommand)]
enum TokenAction {
    /// Open a trust line to the token issuer
    Trust {
        /// Trust line limit
        #[arg(short, long, default_value = "1000000")]
        limit: String,
    },

    /// Show token balances
    Balance {
        /// Address to query (defaults to --account)
        address: Option<String>,
    },

    /// Send tokens
    Send {
        /// Destination address
        destination: String,

        /// Whole number of tokens
        amount: String,
    },

    /// Burn tokens by sending them to the black hole account
    Burn {
        /// Whole number of tokens
        amount: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum AllowanceAction {
    /// Sign a spending cap for a payee
    Sign {
        /// Payee (operator) address
        #[arg(long)]
        payee: String,

        /// Spending cap
        #[arg(long)]
        cap: String,

        /// Write the authorization to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Redeem a payment under a signed allowance (operator)
    Pay {
        /// Authorization file produced by `allowance sign` or `allowance charge`
        #[arg(long)]
        authorization: PathBuf,

        /// Whole number of tokens to redeem
        #[arg(long)]
        amount: String,
    },

    /// Deposit tokens into the hook and raise the allowance
    Charge {
        /// Payee (operator) address
        #[arg(long)]
        payee: String,

        /// Whole number of tokens to deposit
        #[arg(long)]
        amount: String,

        /// Remaining allowance before this charge
        #[arg(long, default_value = "0")]
        remaining: String,

        /// Write the new authorization to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Withdraw tokens held by the hook
    Withdraw {
        /// Whole number of tokens
        amount: String,
    },

    /// Print a memo payload without submitting anything
    Payload {
        #[command(subcommand)]
        kind: PayloadKind,
    },

    /// Decode a hex memo payload
    Inspect {
        /// MemoData hex
        memo_data: String,

        /// MemoFormat hex (defaults to application/json)
        #[arg(long)]
        memo_format: Option<String>,
    },
}

#[derive(Subcommand)]
enum PayloadKind {
    /// allowance_payment memo
    Payment {
        #[arg(long)]
        authorization: PathBuf,

        #[arg(long)]
        amount: String,
    },

    /// update_allowance memo
    Update {
        #[arg(long)]
        authorization: PathBuf,
    },

    /// withdraw memo
    Withdraw {
        #[arg(long)]
        amount: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so JSON output on stdout stays parseable
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("hookpay_demo_cli=debug,hookpay_lib=debug,hookpay_allowance=debug")
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter("hookpay_demo_cli=info,hookpay_lib=warn,hookpay_allowance=warn")
            .with_writer(std::io::stderr)
            .init();
    }

    let ctx = commands::Context {
        account: cli.account,
        seed_env: cli.seed_env,
        key_env: cli.key_env,
        rpc_url: cli.rpc_url,
        hook_address: cli.hook_address,
        verbose: cli.verbose,
    };

    match cli.command {
        Commands::Seed { numbers } => {
            commands::seed::run(&numbers, ctx.verbose)?;
        }
        Commands::Token { action } => match action {
            TokenAction::Trust { limit } => {
                commands::token::trust(&ctx, &limit).await?;
            }
            TokenAction::Balance { address } => {
                commands::token::balance(&ctx, address.as_deref()).await?;
            }
            TokenAction::Send {
                destination,
                amount,
            } => {
                commands::token::send(&ctx, &destination, &amount).await?;
            }
            TokenAction::Burn { amount, yes } => {
                commands::token::burn(&ctx, &amount, yes).await?;
            }
        },
        Commands::Allowance { action } => match action {
            AllowanceAction::Sign { payee, cap, output } => {
                commands::allowance::sign(&ctx, &payee, &cap, output.as_deref())?;
            }
            AllowanceAction::Pay {
                authorization,
                amount,
            } => {
                commands::allowance::pay(&ctx, &authorization, &amount).await?;
            }
            AllowanceAction::Charge {
                payee,
                amount,
                remaining,
                output,
            } => {
                commands::allowance::charge(&ctx, &payee, &amount, &remaining, output.as_deref())
                    .await?;
            }
            AllowanceAction::Withdraw { amount } => {
                commands::allowance::withdraw(&ctx, &amount).await?;
            }
            AllowanceAction::Payload { kind } => match kind {
                PayloadKind::Payment {
                    authorization,
                    amount,
                } => {
                    commands::allowance::payment_payload(&authorization, &amount)?;
                }
                PayloadKind::Update { authorization } => {
                    commands::allowance::update_payload(&authorization)?;
                }
                PayloadKind::Withdraw { amount } => {
                    commands::allowance::withdraw_payload(&amount)?;
                }
            },
            AllowanceAction::Inspect {
                memo_data,
                memo_format,
            } => {
                commands::allowance::inspect(&memo_data, memo_format.as_deref())?;
            }
        },
    }

    Ok(())
}
