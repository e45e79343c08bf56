//! Pricing function and amount coercion
//!
//! All amounts are euros. Prices are always rounded to the cent.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::values::{Percent, Price};

/// Balance every new wallet starts with
pub const STARTING_BALANCE: Price = dec!(300.00);

/// Largest base price an asset may carry
///
/// Leaves room for offsets far beyond anything a delta strategy produces
/// before the price saturates.
pub const MAX_BASE_PRICE: Price = dec!(1_000_000_000_000_000);

/// Round to 2 decimal places, half away from zero
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Compute the current price given a base price and a percentage delta
///
/// `round2(base * (1 + percent / 100))`, saturating at `Decimal::MAX` and
/// `Decimal::MIN` instead of overflowing.
pub fn compute_price(base_price: Price, percent: Percent) -> Price {
    let factor = Decimal::ONE.saturating_add(percent / dec!(100));
    round2(base_price.saturating_mul(factor))
}

/// Pricing entry point for loosely-typed callers
///
/// Missing or non-finite inputs are treated as zero.
pub fn compute_price_lossy(base_price: Option<f64>, percent: Option<f64>) -> Price {
    let base = base_price.map(coerce_f64).unwrap_or_default();
    let pct = percent.map(coerce_f64).unwrap_or_default();
    compute_price(base, pct)
}

/// Parse a numeric amount, yielding zero for anything non-numeric
///
/// Accepts plain (`"120.50"`) and scientific (`"1.2e2"`) notation.
pub fn coerce_amount(raw: &str) -> Decimal {
    let trimmed = raw.trim();
    trimmed
        .parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(trimmed))
        .unwrap_or(Decimal::ZERO)
}

/// Convert a float to Decimal; NaN and infinities become zero
pub fn coerce_f64(value: f64) -> Decimal {
    if !value.is_finite() {
        return Decimal::ZERO;
    }
    Decimal::from_f64(value).unwrap_or(Decimal::ZERO)
}
