//! How much the payment tool talks to its operator.

use std::fmt;
use std::str::FromStr;

/// Execution mode, fixed for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    /// Prompt for missing values and ask before sending.
    #[default]
    Interactive,
    /// Take every value from the arguments and confirm automatically.
    Unattended,
    /// Like `Unattended`, and print nothing but the signed transaction.
    UnattendedQuiet,
}

impl ExecutionMode {
    /// Whether prompts are suppressed.
    pub fn is_unattended(self) -> bool {
        !matches!(self, ExecutionMode::Interactive)
    }

    /// Whether narration is suppressed.
    pub fn is_quiet(self) -> bool {
        matches!(self, ExecutionMode::UnattendedQuiet)
    }
}

impl FromStr for ExecutionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "interactive" => Ok(ExecutionMode::Interactive),
            "unattended" => Ok(ExecutionMode::Unattended),
            "quiet" => Ok(ExecutionMode::UnattendedQuiet),
            other => Err(format!(
                "unknown mode '{}', expected 'unattended' or 'quiet'",
                other
            )),
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExecutionMode::Interactive => "interactive",
            ExecutionMode::Unattended => "unattended",
            ExecutionMode::UnattendedQuiet => "quiet",
        };
        write!(f, "{}", name)
    }
}
