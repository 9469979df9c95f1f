//! Tests for the network crate against a scripted JSON-RPC server.

use mockito::{Matcher, Server};
use rust_decimal_macros::dec;
use serde_json::json;
use wallet_core::{Instructions, PaymentRequest, TransactionRecord};
use wallet_network::{LedgerClient, NetworkError, RpcLedgerClient};

const SECRET: &str = "snoPBrXtMeMyMHUVTgbuqAfg1SUTb";
const SOURCE: &str = "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh";
const DESTINATION: &str = "rrrrrrrrrrrrrrrrrrrrrhoLvTp";

fn method(name: &str) -> Matcher {
    Matcher::PartialJson(json!({ "method": name }))
}

fn account_info(ledger_index: &str) -> Matcher {
    Matcher::AllOf(vec![
        method("account_info"),
        Matcher::Regex(format!("\"ledger_index\":\"{}\"", ledger_index)),
    ])
}

fn body(result: serde_json::Value) -> String {
    json!({ "result": result }).to_string()
}

/// Tests that balances combine the native balance and trust lines.
#[tokio::test]
async fn test_get_balances() {
    let mut server = Server::new_async().await;
    let info = server
        .mock("POST", "/")
        .match_body(account_info("validated"))
        .with_header("content-type", "application/json")
        .with_body(body(json!({
            "account_data": { "Account": SOURCE, "Balance": "25000000", "Sequence": 7 },
            "status": "success"
        })))
        .expect(2)
        .create_async()
        .await;
    let lines = server
        .mock("POST", "/")
        .match_body(method("account_lines"))
        .with_header("content-type", "application/json")
        .with_body(body(json!({
            "lines": [
                { "account": "rIssuer", "balance": "5", "currency": "USD" },
                { "account": "rIssuer", "balance": "0", "currency": "EUR" }
            ],
            "status": "success"
        })))
        .expect(1)
        .create_async()
        .await;

    let client = RpcLedgerClient::new(&server.url());

    let all = client.get_balances(SOURCE, None).await.unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].value, dec!(25));
    assert_eq!(all[0].currency, "XRP");
    assert_eq!(all[1].counterparty.as_deref(), Some("rIssuer"));

    // Only the native balance is requested, so trust lines are not fetched
    let native = client.get_balances(SOURCE, Some("XRP")).await.unwrap();
    assert_eq!(native.len(), 1);

    info.assert_async().await;
    lines.assert_async().await;
}

/// Tests that an unfunded account is reported as such.
#[tokio::test]
async fn test_account_not_found() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/")
        .match_body(method("account_info"))
        .with_header("content-type", "application/json")
        .with_body(body(json!({
            "account": DESTINATION,
            "error": "actNotFound",
            "error_message": "Account not found.",
            "status": "error"
        })))
        .create_async()
        .await;

    let client = RpcLedgerClient::new(&server.url());
    let error = client.get_balances(DESTINATION, Some("XRP")).await.unwrap_err();
    assert!(error.is_account_not_found());
    assert!(error.to_string().contains(DESTINATION));
}

/// Tests the mapping of account history entries.
#[tokio::test]
async fn test_get_transactions() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/")
        .match_body(Matcher::AllOf(vec![
            method("account_tx"),
            Matcher::Regex("\"limit\":2".to_string()),
        ]))
        .with_header("content-type", "application/json")
        .with_body(body(json!({
            "account": SOURCE,
            "transactions": [
                {
                    "tx": {
                        "TransactionType": "Payment",
                        "Account": SOURCE,
                        "Destination": DESTINATION,
                        "Amount": "10000000",
                        "hash": "A".repeat(64)
                    },
                    "meta": { "delivered_amount": "9000000" }
                },
                {
                    "tx": {
                        "TransactionType": "OfferCreate",
                        "Account": SOURCE,
                        "hash": "B".repeat(64)
                    },
                    "meta": {}
                }
            ],
            "status": "success"
        })))
        .create_async()
        .await;

    let client = RpcLedgerClient::new(&server.url());
    let records: Vec<TransactionRecord> = client.get_transactions(SOURCE, 2).await.unwrap();

    assert_eq!(records.len(), 2);
    let payment = records[0].payment.as_ref().unwrap();
    assert_eq!(records[0].kind, "payment");
    assert_eq!(payment.source, SOURCE);
    assert_eq!(payment.source_amount.value, dec!(10));
    assert_eq!(payment.delivered_amount.value, dec!(9));
    assert_eq!(records[1].kind, "order");
    assert!(records[1].payment.is_none());
}

/// Tests preparing, signing, and submitting a payment.
#[tokio::test]
async fn test_prepare_sign_submit() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/")
        .match_body(account_info("current"))
        .with_header("content-type", "application/json")
        .with_body(body(json!({
            "account_data": { "Account": SOURCE, "Balance": "100000000", "Sequence": 7 },
            "status": "success"
        })))
        .create_async()
        .await;
    server
        .mock("POST", "/")
        .match_body(method("fee"))
        .with_header("content-type", "application/json")
        .with_body(body(json!({
            "drops": { "open_ledger_fee": "10", "base_fee": "10" },
            "ledger_current_index": 100,
            "status": "success"
        })))
        .create_async()
        .await;
    let submit = server
        .mock("POST", "/")
        .match_body(method("submit"))
        .with_header("content-type", "application/json")
        .with_body(body(json!({
            "engine_result": "tesSUCCESS",
            "engine_result_message": "The transaction was applied.",
            "tx_json": { "hash": "C".repeat(64) },
            "status": "success"
        })))
        .expect(1)
        .create_async()
        .await;

    let client = RpcLedgerClient::new(&server.url());
    let request = PaymentRequest {
        source_address: SOURCE.to_string(),
        destination_address: DESTINATION.to_string(),
        destination_tag: Some(42),
        amount: dec!(10),
        currency: "XRP".to_string(),
        max_fee: dec!(0.0001),
    };

    let prepared = client
        .prepare_payment(SOURCE, &request, &Instructions::with_max_fee(request.max_fee))
        .await
        .unwrap();
    assert_eq!(prepared.tx.sequence, 7);
    assert_eq!(prepared.tx.fee_drops, 12);
    assert_eq!(prepared.tx.amount_drops, 10_000_000);
    assert_eq!(prepared.max_ledger_version, 105);
    assert_eq!(prepared.fee, dec!(0.000012));

    let signed = client.sign(&prepared, SECRET).unwrap();
    let result = client.submit(&signed).await.unwrap();
    assert!(result.is_accepted());
    assert_eq!(result.hash, Some("C".repeat(64)));
    submit.assert_async().await;
}

/// Tests that a rejected submission is an error.
#[tokio::test]
async fn test_submit_rejected() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/")
        .match_body(method("submit"))
        .with_header("content-type", "application/json")
        .with_body(body(json!({
            "engine_result": "temBAD_FEE",
            "engine_result_message": "Invalid fee, negative or not XRP.",
            "status": "success"
        })))
        .create_async()
        .await;

    let client = RpcLedgerClient::new(&server.url());
    let signed = wallet_core::SignedTransaction {
        blob: "1200".to_string(),
        hash: "D".repeat(64),
    };
    match client.submit(&signed).await {
        Err(NetworkError::Rejected { engine_result, .. }) => assert_eq!(engine_result, "temBAD_FEE"),
        other => panic!("unexpected result: {:?}", other),
    }
}

/// Tests that an unreachable server fails to connect.
#[tokio::test]
async fn test_connect_unreachable() {
    let client = RpcLedgerClient::new("http://127.0.0.1:1/");
    assert!(matches!(
        client.connect().await,
        Err(NetworkError::ConnectionFailed(_))
    ));
}
