//! Money helpers.
//!
//! Every amount in the ledger is a `Decimal` with at most two fractional
//! digits. Never use floating-point for money calculations.

use rust_decimal::Decimal;

/// Number of fractional digits stored for every amount.
pub const MONEY_SCALE: u32 = 2;

/// Largest amount a `NUMERIC(19, 2)` column holds: `99999999999999999.99`.
pub const MAX_MONEY: Decimal = Decimal::from_parts(2_313_682_943, 2_328_306_436, 0, false, MONEY_SCALE);

/// Returns true if `amount` can be stored without losing precision.
///
/// Trailing zeros are ignored, so `10.500` is accepted while `10.005` is not.
#[must_use]
pub fn is_money_precision(amount: Decimal) -> bool {
    amount.normalize().scale() <= MONEY_SCALE
}

/// Returns true if `amount` fits the stored money column.
#[must_use]
pub fn is_money_range(amount: Decimal) -> bool {
    amount.abs() <= MAX_MONEY
}

/// Rescales an amount to exactly two fractional digits.
///
/// Callers must check [`is_money_precision`] first; rounding here is
/// banker's rounding and only removes trailing zeros for valid input.
#[must_use]
pub fn to_money(amount: Decimal) -> Decimal {
    amount.round_dp(MONEY_SCALE)
}

/// Formats an amount as a fixed two-decimal string, e.g. `1234.50`.
#[must_use]
pub fn format_money(amount: Decimal) -> String {
    format!("{:.2}", to_money(amount))
}
