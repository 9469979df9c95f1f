//! Balance and history report for an address.

use crate::errors::WalletError;
use crate::input::{validate_address, Prompter, Question};
use colored::Colorize;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};
use wallet_core::amount::display_amount;
use wallet_core::{is_valid_address, Balance, TransactionRecord};
use wallet_network::LedgerClient;

/// What the balance tool shows for an address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceReport {
    /// The queried address
    pub address: String,
    /// Balances strictly above zero
    pub balances: Vec<Balance>,
    /// The most recent transactions, newest first
    pub transactions: Vec<TransactionRecord>,
    /// The requested history depth
    pub limit: u32,
}

/// Runs the balance command.
pub async fn run<C: LedgerClient + ?Sized>(
    client: &C,
    address: &str,
    limit: u32,
) -> Result<BalanceReport, WalletError> {
    info!("Getting balances for address: {}", address);
    client.connect().await?;

    let balances = positive_balances(client.get_balances(address, None).await?);
    debug!("{} non-empty balances", balances.len());

    let mut transactions = client.get_transactions(address, limit).await?;
    transactions.truncate(limit as usize);

    Ok(BalanceReport {
        address: address.to_string(),
        balances,
        transactions,
        limit,
    })
}

/// Drops empty and negative holdings.
pub fn positive_balances(balances: Vec<Balance>) -> Vec<Balance> {
    balances
        .into_iter()
        .filter(|balance| balance.value > Decimal::ZERO)
        .collect()
}

/// Renders a history entry as seen from `address`.
pub fn render_record(record: &TransactionRecord, address: &str) -> String {
    match &record.payment {
        Some(payment) if record.kind == "payment" => {
            if payment.source == address {
                format!(
                    "{}\t-{} {} → {}",
                    record.kind,
                    display_amount(payment.source_amount.value),
                    payment.source_amount.currency,
                    payment.destination
                )
            } else {
                format!(
                    "{}\t+{} {} ← {}",
                    record.kind,
                    display_amount(payment.delivered_amount.value),
                    payment.delivered_amount.currency,
                    payment.source
                )
            }
        }
        _ => record.kind.clone(),
    }
}

/// Prints a report to stdout.
pub fn print_report(report: &BalanceReport) {
    println!("{}", "Current Balance".yellow());
    for balance in &report.balances {
        println!("{} {}", balance.value.normalize(), balance.currency);
    }
    println!();

    if !report.transactions.is_empty() {
        println!("{}", format!("Last {} transactions", report.limit).yellow());
        for record in &report.transactions {
            println!("{}", render_record(record, &report.address));
        }
        println!();
    }
}

/// Uses the address argument when it is valid, otherwise asks for one.
pub fn resolve_address<P: Prompter + ?Sized>(
    argument: Option<&str>,
    prompter: &mut P,
) -> Result<String, WalletError> {
    match argument {
        Some(address) if is_valid_address(address) => Ok(address.to_string()),
        other => {
            if let Some(invalid) = other {
                warn!("Ignoring invalid address argument {}", invalid);
            }
            let question = Question {
                message: "Enter wallet address:".to_string(),
                validator: validate_address,
                hidden: false,
                optional: false,
            };
            let address = prompter.ask(&question)?;
            println!();
            Ok(address)
        }
    }
}
