//! Core types for the XRP Ledger wallet tools.

use crate::codec::PaymentTransaction;
use crate::errors::CoreError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The ledger's native currency code.
pub const NATIVE_CURRENCY: &str = "XRP";

/// Number of ledger versions a prepared transaction stays valid for.
pub const MAX_LEDGER_VERSION_OFFSET: u32 = 5;

/// A 20-byte account identifier, the payload of a classic address.
pub type AccountId = [u8; 20];

/// An amount of some currency, optionally issued by a counterparty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount {
    /// The amount as a decimal value
    pub value: Decimal,
    /// The currency code
    pub currency: String,
    /// The issuer, absent for the native currency
    pub counterparty: Option<String>,
}

/// A balance held by an account is shaped like any other amount.
pub type Balance = Amount;

impl Amount {
    /// Creates an amount of the native currency.
    pub fn native(value: Decimal) -> Self {
        Self {
            value,
            currency: NATIVE_CURRENCY.to_string(),
            counterparty: None,
        }
    }

    /// Creates an amount of an issued currency.
    pub fn issued(value: Decimal, currency: &str, counterparty: &str) -> Self {
        Self {
            value,
            currency: currency.to_string(),
            counterparty: Some(counterparty.to_string()),
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value.normalize(), self.currency)
    }
}

/// The balance of one address in one currency at the time it was queried.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    /// The queried address
    pub address: String,
    /// The currency the balance is expressed in
    pub currency: String,
    /// The balance; zero for an account that does not exist yet
    pub value: Decimal,
}

impl BalanceSnapshot {
    /// Builds a snapshot from the balances returned for an address.
    ///
    /// The first balance in `currency` wins. An address without any balance in
    /// that currency holds zero.
    pub fn from_balances(address: &str, currency: &str, balances: &[Balance]) -> Self {
        let value = balances
            .iter()
            .find(|b| b.currency == currency)
            .map(|b| b.value)
            .unwrap_or(Decimal::ZERO);

        Self {
            address: address.to_string(),
            currency: currency.to_string(),
            value,
        }
    }

    /// A zero balance, used for accounts the ledger does not know about.
    pub fn unfunded(address: &str, currency: &str) -> Self {
        Self {
            address: address.to_string(),
            currency: currency.to_string(),
            value: Decimal::ZERO,
        }
    }
}

/// A single payment to be sent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequest {
    /// The sender's address, derived from the sender's secret
    pub source_address: String,
    /// The recipient's address
    pub destination_address: String,
    /// Optional sub-account identifier at the recipient
    pub destination_tag: Option<u32>,
    /// The amount to deliver
    pub amount: Decimal,
    /// The currency of the amount
    pub currency: String,
    /// The highest fee the sender is willing to pay
    pub max_fee: Decimal,
}

impl PaymentRequest {
    /// Checks the invariants every request must satisfy before it is prepared.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.source_address == self.destination_address {
            return Err(CoreError::SameAddress(self.source_address.clone()));
        }
        if self.amount <= Decimal::ZERO {
            return Err(CoreError::InvalidAmount(format!(
                "amount must be greater than zero, got {}",
                self.amount
            )));
        }
        if self.max_fee < Decimal::ZERO {
            return Err(CoreError::InvalidRequest(format!(
                "max fee must not be negative, got {}",
                self.max_fee
            )));
        }
        Ok(())
    }
}

/// Instructions that bound how a payment is prepared.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instructions {
    /// Ledger versions after the current one in which the transaction may be included
    pub max_ledger_version_offset: u32,
    /// Upper bound for the transaction fee
    pub max_fee: Decimal,
}

impl Instructions {
    /// The fixed instructions used for every payment.
    pub fn with_max_fee(max_fee: Decimal) -> Self {
        Self {
            max_ledger_version_offset: MAX_LEDGER_VERSION_OFFSET,
            max_fee,
        }
    }
}

/// A payment filled in with the account sequence, fee, and expiry ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreparedTransaction {
    /// The transaction ready to be signed
    pub tx: PaymentTransaction,
    /// The fee that will be paid, in XRP
    pub fee: Decimal,
    /// The last ledger version the transaction may appear in
    pub max_ledger_version: u32,
}

/// A signed transaction blob and its identifying hash.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    /// The signed transaction, hex encoded
    pub blob: String,
    /// The transaction hash, hex encoded
    pub hash: String,
}

/// The server's preliminary verdict on a submitted transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResult {
    /// The engine result code, e.g. `tesSUCCESS`
    pub engine_result: String,
    /// Human-readable explanation of the engine result
    pub engine_result_message: String,
    /// Hash of the submitted transaction, when reported
    pub hash: Option<String>,
}

impl SubmitResult {
    /// Whether the transaction was accepted for processing.
    ///
    /// `tes`, `ter` and `tec` results can still reach a validated ledger;
    /// `tem`, `tef` and `tel` results never will.
    pub fn is_accepted(&self) -> bool {
        ["tes", "ter", "tec"]
            .iter()
            .any(|prefix| self.engine_result.starts_with(prefix))
    }
}

/// Direction-independent details of a payment in an account's history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentDetails {
    /// The paying account
    pub source: String,
    /// The receiving account
    pub destination: String,
    /// The most the source was willing to spend
    pub source_amount: Amount,
    /// What the destination actually received
    pub delivered_amount: Amount,
}

/// An entry of an account's transaction history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// The transaction type, e.g. `payment` or `trustline`
    pub kind: String,
    /// The transaction hash
    pub hash: String,
    /// Present when the transaction is a payment
    pub payment: Option<PaymentDetails>,
}

impl TransactionRecord {
    /// Maps a ledger `TransactionType` onto the name used in history listings.
    pub fn kind_name(transaction_type: &str) -> String {
        let name = match transaction_type {
            "Payment" => "payment",
            "OfferCreate" => "order",
            "OfferCancel" => "orderCancellation",
            "TrustSet" => "trustline",
            "AccountSet" | "SetRegularKey" | "SignerListSet" => "settings",
            "EscrowCreate" => "escrowCreation",
            "EscrowFinish" => "escrowExecution",
            "EscrowCancel" => "escrowCancellation",
            "PaymentChannelCreate" => "paymentChannelCreate",
            "PaymentChannelFund" => "paymentChannelFund",
            "PaymentChannelClaim" => "paymentChannelClaim",
            "CheckCreate" => "checkCreate",
            "CheckCash" => "checkCash",
            "CheckCancel" => "checkCancel",
            "DepositPreauth" => "depositPreauth",
            "AccountDelete" => "accountDelete",
            other => {
                let mut chars = other.chars();
                return match chars.next() {
                    Some(first) => first.to_lowercase().chain(chars).collect(),
                    None => String::new(),
                };
            }
        };
        name.to_string()
    }
}
