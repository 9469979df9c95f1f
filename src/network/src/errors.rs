/// Error types for the network crate.
use std::fmt;
use std::error::Error as StdError;
use wallet_core::CoreError;

/// Errors that can occur while talking to the ledger.
#[derive(Debug)]
pub enum NetworkError {
    /// Error when the server cannot be reached.
    ConnectionFailed(String),

    /// Error when a request fails in transit.
    RequestFailed(String),

    /// Error when the server answers with something that cannot be understood.
    InvalidResponse(String),

    /// Error reported by the server for a request.
    Rpc {
        /// The server's error code, e.g. `invalidParams`
        code: String,
        /// The server's explanation
        message: String,
    },

    /// Error when the account does not exist on the ledger (`actNotFound`).
    AccountNotFound(String),

    /// Error when a submitted transaction is refused outright.
    Rejected {
        /// The engine result code, e.g. `temBAD_FEE`
        engine_result: String,
        /// The engine's explanation
        message: String,
    },

    /// Error when a core operation (key derivation, signing, amounts) fails.
    Core(CoreError),
}

impl NetworkError {
    /// Whether the error means the account has never been funded.
    pub fn is_account_not_found(&self) -> bool {
        matches!(self, NetworkError::AccountNotFound(_))
    }
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkError::ConnectionFailed(msg) => write!(f, "Connection failed: {}", msg),
            NetworkError::RequestFailed(msg) => write!(f, "Request failed: {}", msg),
            NetworkError::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
            NetworkError::Rpc { code, message } => write!(f, "Server error {}: {}", code, message),
            NetworkError::AccountNotFound(addr) => write!(f, "Account not found: {}", addr),
            NetworkError::Rejected { engine_result, message } => {
                write!(f, "Transaction rejected ({}): {}", engine_result, message)
            }
            NetworkError::Core(e) => write!(f, "{}", e),
        }
    }
}

impl StdError for NetworkError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            NetworkError::Core(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CoreError> for NetworkError {
    fn from(error: CoreError) -> Self {
        NetworkError::Core(error)
    }
}

impl From<reqwest::Error> for NetworkError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_connect() || error.is_timeout() {
            NetworkError::ConnectionFailed(error.to_string())
        } else {
            NetworkError::RequestFailed(error.to_string())
        }
    }
}

impl From<serde_json::Error> for NetworkError {
    fn from(error: serde_json::Error) -> Self {
        NetworkError::InvalidResponse(error.to_string())
    }
}
