//! Shows the balances and recent transactions of a wallet.

use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;
use structopt::StructOpt;
use tracing::error;
use wallet_cli::commands::balance;
use wallet_cli::{logging, InquirePrompter, Narrator, WalletConfig, WalletError};
use wallet_network::RpcLedgerClient;

/// Command line arguments for the balance tool.
#[derive(Debug, StructOpt)]
#[structopt(name = "balance", about = "Check the balance of a Ripple wallet")]
struct Opt {
    /// Wallet address; prompted for when missing or malformed
    address: Option<String>,

    /// Number of recent transactions to show
    #[structopt(long)]
    limit: Option<u32>,

    /// Ledger server endpoint
    #[structopt(long)]
    api: Option<String>,

    /// Path to the configuration file
    #[structopt(short, long, parse(from_os_str))]
    config: Option<PathBuf>,
}

async fn check(opt: Opt) -> Result<(), WalletError> {
    let mut config = WalletConfig::load(opt.config.as_deref())
        .map_err(|e| WalletError::Config(e.to_string()))?;
    if let Some(api) = opt.api {
        config.endpoint = api;
    }
    let limit = opt.limit.unwrap_or(config.history_limit);

    let address = balance::resolve_address(opt.address.as_deref(), &mut InquirePrompter)?;
    let client = RpcLedgerClient::new(&config.endpoint);
    let report = balance::run(&client, &address, limit).await?;
    balance::print_report(&report);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    logging::init()?;

    let opt = Opt::from_args();
    Narrator::new(false).banner("Balance Check");

    if let Err(e) = check(opt).await {
        let code = e.exit_code();
        if code != 0 {
            error!("Balance check failed: {}", e);
            eprintln!("{}\n", e.to_string().red());
        }
        std::process::exit(code);
    }

    Ok(())
}
