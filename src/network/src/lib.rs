//! Ledger access for the XRP Ledger wallet tools.
//!
//! The wallet tools only ever talk to the ledger through [`LedgerClient`]. This
//! crate ships a JSON-RPC implementation for real servers and an in-memory one
//! for tests.

pub mod client;
pub mod errors;
pub mod mock;
pub mod rpc;

pub use client::LedgerClient;
pub use errors::NetworkError;
pub use mock::MockLedgerClient;
pub use rpc::RpcLedgerClient;
