//! airdrop — disburse one whole token of the configured mint to a wallet.

use airdrop::config::AirdropConfig;
use airdrop::credential::load_credential;
use airdrop::ledger::RpcLedger;
use airdrop::utils::format_token_amount;
use airdrop::{DisbursementService, ServiceSettings};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "airdrop", version, about = "Custodial SPL token disburser")]
struct Cli {
    /// TOML config file; AIRDROP_* environment variables take precedence.
    #[arg(long, global = true, env = "AIRDROP_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Send one whole token to WALLET.
    Disburse {
        /// Base58 destination wallet address.
        wallet: String,
    },
    /// Show the custodial account and how many disbursements it can still cover.
    Inspect,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    // Startup failures (config, credential) end the process before any request is served.
    let config = AirdropConfig::load(cli.config.as_deref()).context("load configuration")?;
    let credential = load_credential(&config.credential).context("load signing credential")?;
    let ledger = RpcLedger::new(&config.rpc_url, config.commitment, config.request_timeout)
        .context("build RPC client")?;
    info!(
        rpc = ledger.url(),
        cluster = %config.cluster,
        mint = %config.mint,
        "airdrop service ready"
    );

    let service = DisbursementService::new(
        Arc::new(ledger),
        credential,
        ServiceSettings {
            mint: config.mint,
            cluster: config.cluster,
            rpc_url: config.rpc_url.clone(),
            fees: config.fees,
        },
    );

    match cli.command {
        Command::Disburse { wallet } => {
            let receipt = service
                .disburse(&wallet)
                .await
                .with_context(|| format!("disburse to {wallet}"))?;
            println!("signature: {}", receipt.signature);
            println!("explorer:  {}", receipt.explorer_url);
        }
        Command::Inspect => {
            let status = service.inspect().await.context("inspect custody")?;
            println!("custodial:      {}", status.custodial);
            println!("mint:           {}", status.mint);
            println!("source account: {}", status.source_account);
            println!(
                "balance:        {} ({} raw, {} decimals)",
                format_token_amount(status.balance, status.decimals),
                status.balance,
                status.decimals
            );
            println!("remaining:      {}", status.disbursements_remaining);
        }
    }

    Ok(())
}
