//! Monetary rounding and input validation shared by every ledger operation.

use crate::domain::errors::LedgerError;
use rust_decimal::{Decimal, RoundingStrategy};

/// Fraction digits kept on every cash amount.
pub const MONEY_SCALE: u32 = 2;

/// Round to cents, ties away from zero.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a cash amount to cents and rejects anything that is not strictly positive afterwards.
pub fn validate_amount(amount: Decimal) -> Result<Decimal, LedgerError> {
    let rounded = round_money(amount);
    if rounded <= Decimal::ZERO {
        return Err(LedgerError::invalid_amount(
            amount,
            "amount must be positive",
        ));
    }
    Ok(rounded)
}

/// Share quantities keep their full precision (fractional shares are allowed).
pub fn validate_quantity(quantity: Decimal) -> Result<Decimal, LedgerError> {
    if quantity <= Decimal::ZERO {
        return Err(LedgerError::invalid_amount(
            quantity,
            "quantity must be positive",
        ));
    }
    Ok(quantity.normalize())
}

pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}
