//! Tests for the balance and history report.

use crate::input_tests::{ScriptedPrompter, DESTINATION, SOURCE};
use rust_decimal_macros::dec;
use wallet_cli::commands::balance::{render_record, resolve_address, run};
use wallet_core::{Amount, PaymentDetails, TransactionRecord};
use wallet_network::{MockLedgerClient, NetworkError};
use wallet_cli::WalletError;

fn payment(source: &str, destination: &str, value: rust_decimal::Decimal, n: u8) -> TransactionRecord {
    TransactionRecord {
        kind: "payment".to_string(),
        hash: format!("{:064X}", n),
        payment: Some(PaymentDetails {
            source: source.to_string(),
            destination: destination.to_string(),
            source_amount: Amount::native(value),
            delivered_amount: Amount::native(value),
        }),
    }
}

fn history() -> Vec<TransactionRecord> {
    vec![
        payment(SOURCE, DESTINATION, dec!(10), 1),
        payment(DESTINATION, SOURCE, dec!(5), 2),
        TransactionRecord {
            kind: "trustline".to_string(),
            hash: format!("{:064X}", 3),
            payment: None,
        },
        payment(SOURCE, DESTINATION, dec!(1), 4),
        payment(SOURCE, DESTINATION, dec!(2), 5),
    ]
}

/// Tests that the history is capped and rendered from the queried side.
#[tokio::test]
async fn test_history_limit_and_direction() {
    let client = MockLedgerClient::new()
        .with_balance(SOURCE, dec!(75))
        .with_transactions(SOURCE, history());

    let report = run(&client, SOURCE, 3).await.unwrap();
    assert_eq!(report.transactions.len(), 3);

    let lines: Vec<String> = report
        .transactions
        .iter()
        .map(|record| render_record(record, SOURCE))
        .collect();
    assert_eq!(
        lines,
        vec![
            format!("payment\t-10 XRP → {}", DESTINATION),
            format!("payment\t+5 XRP ← {}", DESTINATION),
            "trustline".to_string(),
        ]
    );
}

/// Tests that only holdings above zero are reported.
#[tokio::test]
async fn test_only_positive_balances() {
    let client = MockLedgerClient::new()
        .with_balance(SOURCE, dec!(75))
        .with_issued_balance(SOURCE, Amount::issued(dec!(0), "USD", DESTINATION))
        .with_issued_balance(SOURCE, Amount::issued(dec!(12.5), "EUR", DESTINATION));

    let report = run(&client, SOURCE, 10).await.unwrap();
    assert_eq!(
        report.balances,
        vec![
            Amount::native(dec!(75)),
            Amount::issued(dec!(12.5), "EUR", DESTINATION),
        ]
    );
    assert!(report.transactions.is_empty());
    assert_eq!(client.connects(), 1);
}

/// Tests that an unfunded address is an error for the report.
#[tokio::test]
async fn test_unfunded_address_fails() {
    let client = MockLedgerClient::new();
    let result = run(&client, DESTINATION, 10).await;
    assert!(matches!(
        result,
        Err(WalletError::Network(NetworkError::AccountNotFound(_)))
    ));
}

/// Tests that a valid address argument is used as is.
#[test]
fn test_resolve_address_argument() {
    let mut prompter = ScriptedPrompter::new(&[]);
    let address = resolve_address(Some(SOURCE), &mut prompter).unwrap();
    assert_eq!(address, SOURCE);
    assert!(prompter.asked.is_empty());
}

/// Tests that a missing or malformed argument leads to a prompt.
#[test]
fn test_resolve_address_prompts() {
    let mut prompter = ScriptedPrompter::new(&["nope", DESTINATION]);
    let address = resolve_address(Some("rNotValid"), &mut prompter).unwrap();
    assert_eq!(address, DESTINATION);
    assert_eq!(prompter.asked, vec!["Enter wallet address:"]);
    assert_eq!(prompter.rejected, vec!["nope"]);
}
