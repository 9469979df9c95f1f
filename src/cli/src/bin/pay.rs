//! Sends a payment from a wallet.

use anyhow::Result;
use colored::Colorize;
use rust_decimal::Decimal;
use std::path::PathBuf;
use structopt::StructOpt;
use tracing::{debug, error};
use wallet_cli::commands::pay;
use wallet_cli::{
    logging, ExecutionMode, InquirePrompter, Narrator, PaymentArgs, PaymentOutcome, WalletConfig,
};
use wallet_network::RpcLedgerClient;

/// Exit status when waiting for confirmation is interrupted.
const EXIT_INTERRUPTED: i32 = 130;

/// Command line arguments for the payment tool.
#[derive(Debug, StructOpt)]
#[structopt(name = "pay", about = "Send a payment from a Ripple wallet")]
struct Opt {
    /// Path to the configuration file
    #[structopt(short, long, parse(from_os_str))]
    config: Option<PathBuf>,

    /// Run without prompts: `unattended`, or `quiet` to print only the signed transaction
    #[structopt(long)]
    mode: Option<ExecutionMode>,

    /// Amount to send
    #[structopt(long)]
    amount: Option<String>,

    /// Destination address
    #[structopt(long)]
    to: Option<String>,

    /// Destination tag
    #[structopt(long)]
    tag: Option<String>,

    /// Sender secret
    #[structopt(long)]
    secret: Option<String>,

    /// Settlement currency
    #[structopt(long)]
    currency: Option<String>,

    /// Highest fee to pay
    #[structopt(long)]
    max_fee: Option<Decimal>,

    /// Ledger server endpoint
    #[structopt(long)]
    api: Option<String>,

    /// Stop waiting for confirmation after this many seconds
    #[structopt(long)]
    poll_timeout: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    logging::init()?;

    let opt = Opt::from_args();
    let mode = opt.mode.unwrap_or_default();

    if !mode.is_unattended() {
        Narrator::new(false).banner("Make Payment");
    }

    let mut config = WalletConfig::load(opt.config.as_deref())?;
    if let Some(currency) = opt.currency {
        config.currency = currency;
    }
    if let Some(max_fee) = opt.max_fee {
        config.max_fee = max_fee;
    }
    if let Some(api) = opt.api {
        config.endpoint = api;
    }
    if let Some(timeout) = opt.poll_timeout {
        config.poll_timeout_secs = Some(timeout);
    }
    debug!("Using endpoint {}", config.endpoint);

    let supplied = PaymentArgs {
        amount: opt.amount,
        to: opt.to,
        tag: opt.tag,
        secret: opt.secret,
    };

    let client = RpcLedgerClient::new(&config.endpoint);
    let mut prompter = InquirePrompter;
    let outcome = pay::run(&client, &config, mode, &supplied, &mut prompter, pay::ctrl_c()).await;

    let code = match outcome {
        Ok(PaymentOutcome::Confirmed { hash, .. }) => {
            debug!("Payment {} confirmed", hash);
            0
        }
        Ok(PaymentOutcome::Cancelled) => 0,
        Ok(PaymentOutcome::TimedOut { hash }) => {
            eprintln!(
                "{}\n",
                format!("Payment {} was submitted but no balance change was seen", hash).red()
            );
            1
        }
        Ok(PaymentOutcome::Interrupted { hash }) => {
            eprintln!("Stopped waiting for payment {}", hash);
            EXIT_INTERRUPTED
        }
        Err(e) => {
            error!("Payment failed: {}", e);
            let code = e.exit_code();
            if code == 0 {
                println!("exiting...");
            } else {
                eprintln!("{}\n", e.to_string().red());
            }
            code
        }
    };

    std::process::exit(code);
}
