//! Ledger primitives for the XRP Ledger wallet tools.
//!
//! This crate provides the domain types shared by the balance and payment tools,
//! decimal/drop amount handling, secret and address codecs, key derivation, and
//! the binary encoding used to sign native-currency payments.

pub mod amount;
pub mod codec;
pub mod errors;
pub mod keys;
pub mod types;

// Re-export commonly used types
pub use codec::{sign_payment, PaymentTransaction};
pub use errors::CoreError;
pub use keys::{derive_address, derive_keypair, is_valid_address, KeyAlgorithm, Keypair};
pub use types::{
    Amount, Balance, BalanceSnapshot, Instructions, PaymentDetails, PaymentRequest,
    PreparedTransaction, SignedTransaction, SubmitResult, TransactionRecord,
};
