// Helpers for monetary values

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("amount is missing")]
    Missing,
    #[error("amount {0:?} is not a decimal number")]
    NotANumber(String),
    #[error("amount {0:?} is negative")]
    Negative(String),
    #[error("amount {0:?} does not fit in minor units")]
    OutOfRange(String),
}

/// Converts a decimal string ("12.3", "12", "12.345") into minor units.
///
/// The value is fixed at two fractional digits, rounding half away from zero,
/// and the separator dropped: "12.3" -> "12.30" -> 1230, "12.345" -> 1235.
pub fn to_minor_units(raw: Option<&str>) -> Result<i64, AmountError> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty()).ok_or(AmountError::Missing)?;

    let value = Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|_| AmountError::NotANumber(raw.to_string()))?;

    if value.is_sign_negative() && !value.is_zero() {
        return Err(AmountError::Negative(raw.to_string()));
    }

    value
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|cents| cents.to_i64())
        .ok_or_else(|| AmountError::OutOfRange(raw.to_string()))
}

pub fn format_currency(amount: i64) -> String {
    format!("R$ {}.{:02}", amount / 100, amount % 100)
}
