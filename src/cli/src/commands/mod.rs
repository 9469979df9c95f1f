//! Commands for the wallet tools.

pub mod balance;
pub mod pay;
