//! Error types for the wallet tools.

use rust_decimal::Decimal;
use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;
use wallet_core::CoreError;
use wallet_network::NetworkError;

/// Reasons a payment may not be sent even though its input is well-formed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PreconditionError {
    /// The sender would pay itself.
    #[error("Sender address must not be the same as the destination address ({0})")]
    SameAddress(String),

    /// The request names a source account the secret does not control.
    #[error("Secret controls {derived}, not the requested source address {requested}")]
    SourceMismatch {
        /// Address derived from the secret
        derived: String,
        /// Address named by the request
        requested: String,
    },

    /// The destination would still be below the reserve after receiving the payment.
    #[error(
        "Destination would hold {resulting} {currency} < {reserve} {currency}; \
         send at least {shortfall} {currency} more to create the destination address"
    )]
    DestinationBelowReserve {
        /// Destination balance after the payment
        resulting: Decimal,
        /// Minimum balance an account must hold
        reserve: Decimal,
        /// How much is missing to reach the reserve
        shortfall: Decimal,
        /// Settlement currency
        currency: String,
    },

    /// The sender would drop below the reserve after sending the payment.
    #[error(
        "Sender would keep {resulting} {currency} < {reserve} {currency}; \
         there should be at least {reserve} {currency} remaining at the sender address \
         (short by {shortfall} {currency})"
    )]
    SourceBelowReserve {
        /// Sender balance after the payment
        resulting: Decimal,
        /// Minimum balance an account must hold
        reserve: Decimal,
        /// How much is missing to stay at the reserve
        shortfall: Decimal,
        /// Settlement currency
        currency: String,
    },
}

/// Errors that can occur in the wallet tools.
#[derive(Debug)]
pub enum WalletError {
    /// Error when a supplied or entered value is malformed or missing.
    InputValidation {
        /// Name of the offending field
        field: &'static str,
        /// What is wrong with it
        message: String,
    },

    /// Error when a payment fails its balance or address checks.
    Precondition(PreconditionError),

    /// Error when talking to the ledger fails.
    Network(NetworkError),

    /// Error when a core operation fails.
    Core(CoreError),

    /// Error when the configuration cannot be loaded.
    Config(String),

    /// Error when the terminal prompt fails.
    Prompt(String),

    /// The user backed out of a prompt.
    UserCancelled,

    /// Error after a payment was submitted, while waiting for it to show up.
    Unconfirmed {
        /// Hash of the submitted transaction
        hash: String,
        /// What went wrong while waiting
        error: Box<WalletError>,
    },

    /// Error when a file operation fails.
    Io(std::io::Error),
}

impl WalletError {
    /// Creates an input validation error for a field.
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        WalletError::InputValidation {
            field,
            message: message.into(),
        }
    }

    /// The process exit status this error maps to.
    pub fn exit_code(&self) -> i32 {
        match self {
            WalletError::UserCancelled => 0,
            _ => 1,
        }
    }
}

impl fmt::Display for WalletError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WalletError::InputValidation { field, message } => {
                write!(f, "Invalid {}: {}", field, message)
            }
            WalletError::Precondition(e) => write!(f, "{}", e),
            WalletError::Network(e) => write!(f, "Network error: {}", e),
            WalletError::Core(e) => write!(f, "{}", e),
            WalletError::Config(msg) => write!(f, "Configuration error: {}", msg),
            WalletError::Prompt(msg) => write!(f, "Prompt failed: {}", msg),
            WalletError::UserCancelled => write!(f, "Cancelled by user"),
            WalletError::Unconfirmed { hash, error } => write!(
                f,
                "Payment {} was submitted but could not be confirmed: {}",
                hash, error
            ),
            WalletError::Io(e) => write!(f, "File error: {}", e),
        }
    }
}

impl StdError for WalletError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            WalletError::Unconfirmed { error, .. } => Some(error.as_ref()),
            _ => None,
        }
    }
}

impl From<PreconditionError> for WalletError {
    fn from(error: PreconditionError) -> Self {
        WalletError::Precondition(error)
    }
}

impl From<NetworkError> for WalletError {
    fn from(error: NetworkError) -> Self {
        WalletError::Network(error)
    }
}

impl From<CoreError> for WalletError {
    fn from(error: CoreError) -> Self {
        WalletError::Core(error)
    }
}

impl From<std::io::Error> for WalletError {
    fn from(error: std::io::Error) -> Self {
        WalletError::Io(error)
    }
}

impl From<inquire::InquireError> for WalletError {
    fn from(error: inquire::InquireError) -> Self {
        match error {
            inquire::InquireError::OperationCanceled
            | inquire::InquireError::OperationInterrupted => WalletError::UserCancelled,
            other => WalletError::Prompt(other.to_string()),
        }
    }
}
