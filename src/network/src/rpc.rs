//! JSON-RPC client for a ledger server.

use crate::client::{capped_fee, prepare_transaction, LedgerClient};
use crate::errors::NetworkError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};
use wallet_core::amount::{drops_to_xrp, parse_amount};
use wallet_core::types::NATIVE_CURRENCY;
use wallet_core::{
    Amount, Balance, Instructions, PaymentDetails, PaymentRequest, PreparedTransaction,
    SignedTransaction, SubmitResult, TransactionRecord,
};

/// Error code the server uses for an address with no account.
const ACCOUNT_NOT_FOUND: &str = "actNotFound";

/// A ledger client speaking JSON-RPC over HTTP.
#[derive(Debug, Clone)]
pub struct RpcLedgerClient {
    /// The server's JSON-RPC endpoint
    endpoint: String,
    /// Shared HTTP client
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct ServerInfoResult {
    info: ServerInfo,
}

#[derive(Debug, Deserialize)]
struct ServerInfo {
    #[serde(default)]
    build_version: String,
    #[serde(default)]
    server_state: String,
}

#[derive(Debug, Deserialize)]
struct AccountInfoResult {
    account_data: AccountRoot,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AccountRoot {
    balance: String,
    sequence: u32,
}

#[derive(Debug, Deserialize)]
struct AccountLinesResult {
    lines: Vec<TrustLine>,
}

#[derive(Debug, Deserialize)]
struct TrustLine {
    account: String,
    balance: String,
    currency: String,
}

#[derive(Debug, Deserialize)]
struct AccountTxResult {
    transactions: Vec<AccountTxEntry>,
}

#[derive(Debug, Deserialize)]
struct AccountTxEntry {
    tx: RawTransaction,
    #[serde(default)]
    meta: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawTransaction {
    transaction_type: String,
    account: String,
    destination: Option<String>,
    amount: Option<RawAmount>,
    send_max: Option<RawAmount>,
    #[serde(rename = "hash", default)]
    hash: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Drops(String),
    Issued {
        currency: String,
        issuer: String,
        value: String,
    },
}

#[derive(Debug, Deserialize)]
struct FeeResult {
    drops: FeeDrops,
    ledger_current_index: u32,
}

#[derive(Debug, Deserialize)]
struct FeeDrops {
    open_ledger_fee: String,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    engine_result: String,
    #[serde(default)]
    engine_result_message: String,
    tx_json: Option<SubmittedTx>,
}

#[derive(Debug, Deserialize)]
struct SubmittedTx {
    hash: Option<String>,
}

impl RawAmount {
    fn to_amount(&self) -> Result<Amount, NetworkError> {
        match self {
            RawAmount::Drops(drops) => Ok(Amount::native(drops_to_xrp(drops)?)),
            RawAmount::Issued {
                currency,
                issuer,
                value,
            } => Ok(Amount::issued(parse_amount(value)?, currency, issuer)),
        }
    }
}

/// Extracts the `result` object of a response, turning server errors into [`NetworkError`]s.
fn unwrap_result(response: Value, params: &Value) -> Result<Value, NetworkError> {
    let result = response
        .get("result")
        .cloned()
        .ok_or_else(|| NetworkError::InvalidResponse(format!("No result in response: {}", response)))?;

    if let Some(code) = result.get("error").and_then(Value::as_str) {
        if code == ACCOUNT_NOT_FOUND {
            let account = params
                .get("account")
                .and_then(Value::as_str)
                .unwrap_or_default();
            return Err(NetworkError::AccountNotFound(account.to_string()));
        }

        let message = result
            .get("error_message")
            .and_then(Value::as_str)
            .unwrap_or(code);
        return Err(NetworkError::Rpc {
            code: code.to_string(),
            message: message.to_string(),
        });
    }

    Ok(result)
}

/// Turns an `account_tx` entry into a history record.
fn into_record(entry: AccountTxEntry) -> Result<TransactionRecord, NetworkError> {
    let tx = entry.tx;
    let kind = TransactionRecord::kind_name(&tx.transaction_type);

    let payment = if tx.transaction_type == "Payment" {
        let amount = tx
            .amount
            .as_ref()
            .ok_or_else(|| NetworkError::InvalidResponse(format!("payment {} has no amount", tx.hash)))?
            .to_amount()?;
        let source_amount = match &tx.send_max {
            Some(send_max) => send_max.to_amount()?,
            None => amount.clone(),
        };
        // delivered_amount is "unavailable" for payments older than its introduction
        let delivered_amount = entry
            .meta
            .as_ref()
            .and_then(|meta| meta.get("delivered_amount"))
            .and_then(|value| serde_json::from_value::<RawAmount>(value.clone()).ok())
            .and_then(|raw| raw.to_amount().ok())
            .unwrap_or(amount);

        Some(PaymentDetails {
            source: tx.account.clone(),
            destination: tx.destination.clone().unwrap_or_default(),
            source_amount,
            delivered_amount,
        })
    } else {
        None
    };

    Ok(TransactionRecord {
        kind,
        hash: tx.hash,
        payment,
    })
}

impl RpcLedgerClient {
    /// Creates a client for the given JSON-RPC endpoint.
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// The endpoint this client talks to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Calls a JSON-RPC method and decodes its result.
    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, NetworkError> {
        let request = json!({
            "method": method,
            "params": [params.clone()],
        });
        debug!("Calling {} on {}", method, self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await?;

        let response_text = response.text().await?;
        if response_text.is_empty() {
            return Err(NetworkError::InvalidResponse(
                "Empty response from server".to_string(),
            ));
        }

        let response: Value = serde_json::from_str(&response_text)?;
        let result = unwrap_result(response, &params)?;
        serde_json::from_value(result)
            .map_err(|e| NetworkError::InvalidResponse(format!("{}: {}", method, e)))
    }
}

#[async_trait]
impl LedgerClient for RpcLedgerClient {
    async fn connect(&self) -> Result<(), NetworkError> {
        let result: ServerInfoResult = self
            .call("server_info", json!({}))
            .await
            .map_err(|e| match e {
                NetworkError::RequestFailed(msg) => NetworkError::ConnectionFailed(msg),
                other => other,
            })?;
        info!(
            "Connected to {} (rippled {}, {})",
            self.endpoint, result.info.build_version, result.info.server_state
        );
        Ok(())
    }

    async fn get_balances(
        &self,
        address: &str,
        currency: Option<&str>,
    ) -> Result<Vec<Balance>, NetworkError> {
        let info: AccountInfoResult = self
            .call(
                "account_info",
                json!({ "account": address, "ledger_index": "validated", "strict": true }),
            )
            .await?;

        let mut balances = vec![Amount::native(drops_to_xrp(&info.account_data.balance)?)];

        if currency != Some(NATIVE_CURRENCY) {
            let lines: AccountLinesResult = self
                .call(
                    "account_lines",
                    json!({ "account": address, "ledger_index": "validated" }),
                )
                .await?;
            for line in lines.lines {
                balances.push(Amount::issued(
                    parse_amount(&line.balance)?,
                    &line.currency,
                    &line.account,
                ));
            }
        }

        if let Some(currency) = currency {
            balances.retain(|balance| balance.currency == currency);
        }
        debug!("{} holds {} balance(s)", address, balances.len());
        Ok(balances)
    }

    async fn get_transactions(
        &self,
        address: &str,
        limit: u32,
    ) -> Result<Vec<TransactionRecord>, NetworkError> {
        let result: AccountTxResult = self
            .call(
                "account_tx",
                json!({
                    "account": address,
                    "limit": limit,
                    "ledger_index_min": -1,
                    "ledger_index_max": -1,
                }),
            )
            .await?;

        result
            .transactions
            .into_iter()
            .take(limit as usize)
            .map(into_record)
            .collect()
    }

    async fn prepare_payment(
        &self,
        address: &str,
        request: &PaymentRequest,
        instructions: &Instructions,
    ) -> Result<PreparedTransaction, NetworkError> {
        let info: AccountInfoResult = self
            .call(
                "account_info",
                json!({ "account": address, "ledger_index": "current", "strict": true }),
            )
            .await?;
        let fee: FeeResult = self.call("fee", json!({})).await?;

        let open_ledger_fee = fee.drops.open_ledger_fee.parse::<u64>().map_err(|e| {
            NetworkError::InvalidResponse(format!("Invalid open ledger fee: {}", e))
        })?;
        let fee_drops = capped_fee(open_ledger_fee, instructions.max_fee)?;
        let max_ledger_version = fee.ledger_current_index + instructions.max_ledger_version_offset;
        debug!(
            "Preparing payment: sequence {}, fee {} drops, last ledger {}",
            info.account_data.sequence, fee_drops, max_ledger_version
        );

        prepare_transaction(
            address,
            request,
            info.account_data.sequence,
            fee_drops,
            max_ledger_version,
        )
    }

    async fn submit(&self, signed: &SignedTransaction) -> Result<SubmitResult, NetworkError> {
        let response: SubmitResponse = self
            .call("submit", json!({ "tx_blob": signed.blob }))
            .await?;

        let result = SubmitResult {
            engine_result: response.engine_result,
            engine_result_message: response.engine_result_message,
            hash: response.tx_json.and_then(|tx| tx.hash),
        };

        if !result.is_accepted() {
            warn!("Submission of {} rejected: {}", signed.hash, result.engine_result);
            return Err(NetworkError::Rejected {
                engine_result: result.engine_result,
                message: result.engine_result_message,
            });
        }

        info!("Submitted {}: {}", signed.hash, result.engine_result);
        Ok(result)
    }
}
