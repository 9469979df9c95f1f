//! In-memory ledger client for tests and dry runs.

use crate::client::{capped_fee, prepare_transaction, LedgerClient};
use crate::errors::NetworkError;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Mutex;
use wallet_core::{
    Amount, Balance, Instructions, PaymentRequest, PreparedTransaction, SignedTransaction,
    SubmitResult, TransactionRecord,
};

/// Ledger index the mock pretends is current.
pub const MOCK_LEDGER_INDEX: u32 = 100;

/// Open-ledger fee the mock reports, in drops.
pub const MOCK_OPEN_LEDGER_FEE: u64 = 10;

#[derive(Debug, Default)]
struct MockState {
    /// Native balances per address; each fetch consumes one entry, the last one repeats
    balances: HashMap<String, Vec<Decimal>>,
    /// Issued balances per address
    issued: HashMap<String, Vec<Balance>>,
    transactions: HashMap<String, Vec<TransactionRecord>>,
    balance_fetches: HashMap<String, usize>,
    /// Balance fetches that fail once this many fetches of the address succeeded
    failing_balances: HashMap<String, (usize, String)>,
    submitted: Vec<SignedTransaction>,
    submit_error: Option<String>,
    unreachable: bool,
    connects: usize,
}

/// A ledger client backed by in-memory state.
///
/// Addresses without configured balances behave like unfunded accounts.
#[derive(Debug, Default)]
pub struct MockLedgerClient {
    state: Mutex<MockState>,
}

impl MockLedgerClient {
    /// Creates an empty mock ledger.
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, MockState> {
        // A panic in another test thread must not hide this test's state
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Funds an address with a fixed native balance.
    pub fn with_balance(self, address: &str, value: Decimal) -> Self {
        self.with_balance_sequence(address, vec![value])
    }

    /// Gives an address a native balance that changes on each fetch.
    pub fn with_balance_sequence(self, address: &str, values: Vec<Decimal>) -> Self {
        self.state().balances.insert(address.to_string(), values);
        self
    }

    /// Adds an issued-currency balance to an address.
    pub fn with_issued_balance(self, address: &str, balance: Balance) -> Self {
        self.state()
            .issued
            .entry(address.to_string())
            .or_default()
            .push(balance);
        self
    }

    /// Sets the transaction history of an address, newest first.
    pub fn with_transactions(self, address: &str, records: Vec<TransactionRecord>) -> Self {
        self.state()
            .transactions
            .insert(address.to_string(), records);
        self
    }

    /// Makes balance fetches for an address fail with a server error.
    pub fn failing_balance(self, address: &str, message: &str) -> Self {
        self.failing_balance_after(address, 0, message)
    }

    /// Lets the first `successes` balance fetches for an address succeed, then fails the rest.
    pub fn failing_balance_after(self, address: &str, successes: usize, message: &str) -> Self {
        self.state()
            .failing_balances
            .insert(address.to_string(), (successes, message.to_string()));
        self
    }

    /// Makes every submission fail with the given engine result.
    pub fn failing_submit(self, engine_result: &str) -> Self {
        self.state().submit_error = Some(engine_result.to_string());
        self
    }

    /// Makes the server unreachable.
    pub fn unreachable(self) -> Self {
        self.state().unreachable = true;
        self
    }

    /// Number of balance fetches made for an address.
    pub fn balance_fetches(&self, address: &str) -> usize {
        self.state()
            .balance_fetches
            .get(address)
            .copied()
            .unwrap_or(0)
    }

    /// Transactions submitted so far.
    pub fn submitted(&self) -> Vec<SignedTransaction> {
        self.state().submitted.clone()
    }

    /// Number of connection attempts.
    pub fn connects(&self) -> usize {
        self.state().connects
    }

    fn check_reachable(&self) -> Result<(), NetworkError> {
        if self.state().unreachable {
            return Err(NetworkError::ConnectionFailed(
                "mock ledger is unreachable".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerClient for MockLedgerClient {
    async fn connect(&self) -> Result<(), NetworkError> {
        self.state().connects += 1;
        self.check_reachable()
    }

    async fn get_balances(
        &self,
        address: &str,
        currency: Option<&str>,
    ) -> Result<Vec<Balance>, NetworkError> {
        self.check_reachable()?;
        let mut state = self.state();

        let fetch = {
            let count = state.balance_fetches.entry(address.to_string()).or_insert(0);
            *count += 1;
            *count - 1
        };

        if let Some((successes, message)) = state.failing_balances.get(address) {
            if fetch >= *successes {
                return Err(NetworkError::Rpc {
                    code: "internal".to_string(),
                    message: message.clone(),
                });
            }
        }

        let native = match state.balances.get(address) {
            Some(values) if !values.is_empty() => values[fetch.min(values.len() - 1)],
            _ => return Err(NetworkError::AccountNotFound(address.to_string())),
        };

        let mut balances = vec![Amount::native(native)];
        if let Some(issued) = state.issued.get(address) {
            balances.extend(issued.iter().cloned());
        }
        if let Some(currency) = currency {
            balances.retain(|balance| balance.currency == currency);
        }
        Ok(balances)
    }

    async fn get_transactions(
        &self,
        address: &str,
        limit: u32,
    ) -> Result<Vec<TransactionRecord>, NetworkError> {
        self.check_reachable()?;
        let state = self.state();
        if !state.balances.contains_key(address) {
            return Err(NetworkError::AccountNotFound(address.to_string()));
        }
        Ok(state
            .transactions
            .get(address)
            .map(|records| records.iter().take(limit as usize).cloned().collect())
            .unwrap_or_default())
    }

    async fn prepare_payment(
        &self,
        address: &str,
        request: &PaymentRequest,
        instructions: &Instructions,
    ) -> Result<PreparedTransaction, NetworkError> {
        self.check_reachable()?;
        if !self.state().balances.contains_key(address) {
            return Err(NetworkError::AccountNotFound(address.to_string()));
        }

        let sequence = self.state().submitted.len() as u32 + 1;
        let fee_drops = capped_fee(MOCK_OPEN_LEDGER_FEE, instructions.max_fee)?;
        prepare_transaction(
            address,
            request,
            sequence,
            fee_drops,
            MOCK_LEDGER_INDEX + instructions.max_ledger_version_offset,
        )
    }

    async fn submit(&self, signed: &SignedTransaction) -> Result<SubmitResult, NetworkError> {
        self.check_reachable()?;
        let mut state = self.state();

        if let Some(engine_result) = &state.submit_error {
            return Err(NetworkError::Rejected {
                engine_result: engine_result.clone(),
                message: "rejected by mock ledger".to_string(),
            });
        }

        state.submitted.push(signed.clone());
        Ok(SubmitResult {
            engine_result: "tesSUCCESS".to_string(),
            engine_result_message: "The transaction was applied.".to_string(),
            hash: Some(signed.hash.clone()),
        })
    }
}
