//! The narrow interface the wallet tools use to reach the ledger.

use crate::errors::NetworkError;
use async_trait::async_trait;
use rust_decimal::Decimal;
use wallet_core::amount::{xrp_to_drops, DROPS_PER_XRP};
use wallet_core::codec::TF_FULLY_CANONICAL_SIG;
use wallet_core::types::NATIVE_CURRENCY;
use wallet_core::{
    derive_keypair, sign_payment, Balance, CoreError, Instructions, PaymentRequest,
    PaymentTransaction, PreparedTransaction, SignedTransaction, SubmitResult, TransactionRecord,
};

/// Operations the wallet tools need from a ledger client.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Establishes (or verifies) connectivity with the ledger server.
    async fn connect(&self) -> Result<(), NetworkError>;

    /// Fetches the balances held by an address, optionally only in one currency.
    ///
    /// An address that has never been funded yields
    /// [`NetworkError::AccountNotFound`].
    async fn get_balances(
        &self,
        address: &str,
        currency: Option<&str>,
    ) -> Result<Vec<Balance>, NetworkError>;

    /// Fetches up to `limit` of the most recent transactions of an address, newest first.
    async fn get_transactions(
        &self,
        address: &str,
        limit: u32,
    ) -> Result<Vec<TransactionRecord>, NetworkError>;

    /// Fills in sequence, fee, and expiry for a payment from `address`.
    async fn prepare_payment(
        &self,
        address: &str,
        request: &PaymentRequest,
        instructions: &Instructions,
    ) -> Result<PreparedTransaction, NetworkError>;

    /// Signs a prepared transaction locally with the sender's secret.
    fn sign(
        &self,
        prepared: &PreparedTransaction,
        secret: &str,
    ) -> Result<SignedTransaction, NetworkError> {
        let keypair = derive_keypair(secret)?;
        Ok(sign_payment(&prepared.tx, &keypair)?)
    }

    /// Submits a signed transaction to the network.
    async fn submit(&self, signed: &SignedTransaction) -> Result<SubmitResult, NetworkError>;
}

/// Applies the fee cushion to the server's open-ledger fee and caps it at `max_fee`.
pub fn capped_fee(open_ledger_fee_drops: u64, max_fee: Decimal) -> Result<u64, NetworkError> {
    // 20% cushion, rounded up
    let cushioned = open_ledger_fee_drops.saturating_mul(6).saturating_add(4) / 5;
    let max_fee_drops = xrp_to_drops(max_fee)?;
    Ok(cushioned.min(max_fee_drops))
}

/// Builds the payment transaction for a request once the account state is known.
pub fn prepare_transaction(
    address: &str,
    request: &PaymentRequest,
    sequence: u32,
    fee_drops: u64,
    max_ledger_version: u32,
) -> Result<PreparedTransaction, NetworkError> {
    if request.currency != NATIVE_CURRENCY {
        return Err(CoreError::UnsupportedCurrency(request.currency.clone()).into());
    }
    if request.source_address != address {
        return Err(CoreError::InvalidRequest(format!(
            "payment source {} does not match preparing account {}",
            request.source_address, address
        ))
        .into());
    }
    request.validate()?;

    let tx = PaymentTransaction {
        account: address.to_string(),
        destination: request.destination_address.clone(),
        destination_tag: request.destination_tag,
        amount_drops: xrp_to_drops(request.amount)?,
        fee_drops,
        sequence,
        last_ledger_sequence: max_ledger_version,
        flags: TF_FULLY_CANONICAL_SIG,
    };

    Ok(PreparedTransaction {
        tx,
        fee: Decimal::from(fee_drops) / Decimal::from(DROPS_PER_XRP),
        max_ledger_version,
    })
}
