//! Human-readable progress output.

use colored::Colorize;
use wallet_core::BalanceSnapshot;

/// Prints progress for the operator unless running quietly.
#[derive(Debug, Clone, Copy, Default)]
pub struct Narrator {
    quiet: bool,
}

impl Narrator {
    /// Creates a narrator; a quiet one prints nothing but signed blobs.
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    /// Whether narration is suppressed.
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// Prints a line of narration.
    pub fn say(&self, message: &str) {
        if !self.quiet {
            println!("{}", message);
        }
    }

    /// Prints the tool banner.
    pub fn banner(&self, title: &str) {
        if self.quiet {
            return;
        }
        let rule = "-----------------------------------------------".green();
        println!("{}", rule);
        println!("{} {}", "Ripple Wallet".green(), title.yellow());
        println!("{}\n", rule);
    }

    /// Prints a labelled balance.
    pub fn balance(&self, label: &str, snapshot: &BalanceSnapshot) {
        if !self.quiet {
            let value = format!("{} {}", snapshot.value.normalize(), snapshot.currency);
            println!("{} {}", label, value.green());
        }
    }

    /// Prints the signed transaction blob, which is the only output in quiet mode.
    pub fn signed_transaction(&self, blob: &str) {
        if self.quiet {
            println!("{}", blob);
        }
    }
}
