//! Decimal amounts and their conversion to and from drops.

use crate::errors::CoreError;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Drops per XRP; the ledger stores native amounts as whole drops.
pub const DROPS_PER_XRP: u64 = 1_000_000;

/// Largest native amount the ledger can represent, in drops.
pub const MAX_DROPS: u64 = 100_000_000_000_000_000;

/// Largest native amount the ledger can represent, in XRP.
pub fn max_xrp() -> Decimal {
    Decimal::from(MAX_DROPS / DROPS_PER_XRP)
}

/// Parses a user-supplied decimal amount.
pub fn parse_amount(text: &str) -> Result<Decimal, CoreError> {
    Decimal::from_str(text.trim())
        .map_err(|_| CoreError::InvalidAmount(format!("'{}' is not a number", text)))
}

/// Converts an XRP amount to drops.
pub fn xrp_to_drops(value: Decimal) -> Result<u64, CoreError> {
    if value < Decimal::ZERO {
        return Err(CoreError::InvalidAmount(format!("{} is negative", value)));
    }

    let drops = value
        .checked_mul(Decimal::from(DROPS_PER_XRP))
        .ok_or_else(|| CoreError::InvalidAmount(format!("{} XRP is out of range", value)))?;
    if drops.fract() != Decimal::ZERO {
        return Err(CoreError::InvalidAmount(format!(
            "{} XRP has more than 6 decimal places",
            value
        )));
    }

    match drops.to_u64() {
        Some(drops) if drops <= MAX_DROPS => Ok(drops),
        _ => Err(CoreError::InvalidAmount(format!("{} XRP is out of range", value))),
    }
}

/// Converts a string of drops, as reported by the ledger, to XRP.
pub fn drops_to_xrp(drops: &str) -> Result<Decimal, CoreError> {
    let drops = drops
        .parse::<u64>()
        .map_err(|e| CoreError::InvalidAmount(format!("invalid drops '{}': {}", drops, e)))?;
    Ok(Decimal::from(drops) / Decimal::from(DROPS_PER_XRP))
}

/// Formats an amount for listings: at most five decimal places, no trailing zeros.
pub fn display_amount(value: Decimal) -> String {
    value.round_dp(5).normalize().to_string()
}
