//! Configuration for the wallet tools.

use anyhow::Result;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Environment variable that overrides the ledger endpoint.
pub const API_ENV_VAR: &str = "RIPPLE_API";

/// Endpoint used when nothing else is configured.
pub const DEFAULT_ENDPOINT: &str = "https://s1.ripple.com:51234/";

/// Settlement currency and reserve rules handed to the payment workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReserveConfig {
    /// The settlement currency balances are checked in
    pub currency: String,
    /// Minimum balance every account must keep
    pub base_reserve: Decimal,
    /// Highest fee a payment may pay
    pub max_fee: Decimal,
}

/// Configuration for the wallet tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletConfig {
    /// The settlement currency
    pub currency: String,
    /// The default max fee for payments
    pub max_fee: Decimal,
    /// The minimum reserve of an account
    pub base_reserve: Decimal,
    /// The ledger server to connect to
    pub endpoint: String,
    /// Seconds between balance polls after a payment is submitted
    pub poll_interval_secs: u64,
    /// Give up polling after this many seconds; poll forever when unset
    pub poll_timeout_secs: Option<u64>,
    /// Number of transactions shown by the balance tool
    pub history_limit: u32,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            currency: "XRP".to_string(),
            max_fee: Decimal::new(1, 4),
            base_reserve: Decimal::from(20),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            poll_interval_secs: 1,
            poll_timeout_secs: None,
            history_limit: 10,
        }
    }
}

impl WalletConfig {
    /// Loads configuration from a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Saves configuration to a file.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// The per-user configuration file location.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut dir| {
            dir.push("ripple-wallet");
            dir.push("config.json");
            dir
        })
    }

    /// Loads the configuration in precedence order.
    ///
    /// An explicit path must exist. Without one, the per-user file is read when
    /// present, otherwise the defaults apply. The environment is layered on top.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => {
                    debug!("Reading configuration from {}", path.display());
                    Self::from_file(path)?
                }
                None => Self::default(),
            },
        };
        config.apply_env();
        Ok(config)
    }

    /// Applies overrides from the process environment.
    pub fn apply_env(&mut self) {
        if let Ok(endpoint) = std::env::var(API_ENV_VAR) {
            if !endpoint.trim().is_empty() {
                debug!("Using endpoint from {}", API_ENV_VAR);
                self.endpoint = endpoint;
            }
        }
    }

    /// The reserve rules for payments.
    pub fn reserve(&self) -> ReserveConfig {
        ReserveConfig {
            currency: self.currency.clone(),
            base_reserve: self.base_reserve,
            max_fee: self.max_fee,
        }
    }

    /// The polling cadence after submission.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    /// The polling deadline, if any.
    pub fn poll_timeout(&self) -> Option<Duration> {
        self.poll_timeout_secs.map(Duration::from_secs)
    }
}
