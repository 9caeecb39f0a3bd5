//! Volume precision helpers.
//!
//! Every derived in/out volume is truncated (never rounded) to
//! [`VOLUME_PRECISION`] fractional digits.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of fractional digits kept on derived volumes.
pub const VOLUME_PRECISION: u32 = 8;

/// Truncate `value` toward zero at the 8th fractional digit.
#[must_use]
pub fn trunc8(value: Decimal) -> Decimal {
    truncate(value, VOLUME_PRECISION)
}

/// Truncate `value` toward zero, keeping at most `digits` fractional digits.
#[must_use]
pub fn truncate(value: Decimal, digits: u32) -> Decimal {
    value.round_dp_with_strategy(digits, RoundingStrategy::ToZero)
}
