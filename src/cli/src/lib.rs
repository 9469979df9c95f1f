//! Interactive tools for checking a ledger wallet and sending payments.

pub mod commands;
pub mod config;
pub mod errors;
pub mod input;
pub mod logging;
pub mod mode;
pub mod narrator;
pub mod prompt;
pub mod workflow;

// Re-export commonly used types and functions
pub use commands::{balance, pay};
pub use config::{ReserveConfig, WalletConfig};
pub use errors::{PreconditionError, WalletError};
pub use input::{CollectedPayment, PaymentArgs, Prompter, Question};
pub use mode::ExecutionMode;
pub use narrator::Narrator;
pub use prompt::InquirePrompter;
pub use workflow::{PaymentOutcome, PaymentWorkflow, PollOutcome, PollPolicy, SubmittedPayment};
