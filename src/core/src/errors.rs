//! Error types for the core crate.

use thiserror::Error;

/// Errors that can occur in the core crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Error when a string is not a well-formed ledger address.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Error when a secret cannot be decoded into a seed.
    #[error("Invalid secret: {0}")]
    InvalidSecret(String),

    /// Error when a key cannot be derived from a valid seed.
    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    /// Error when signing a message fails.
    #[error("Signing failed: {0}")]
    Signing(String),

    /// Error when an amount cannot be parsed or represented.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Error when a payment names a currency the encoder cannot express.
    #[error("Unsupported currency: {0} (only XRP payments can be signed)")]
    UnsupportedCurrency(String),

    /// Error when the sender and the recipient are the same account.
    #[error("Source and destination address are the same: {0}")]
    SameAddress(String),

    /// Error when a payment request breaks one of its invariants.
    #[error("Invalid payment request: {0}")]
    InvalidRequest(String),
}
