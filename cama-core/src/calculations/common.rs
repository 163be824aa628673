//! Common rounding and clamping helpers for land valuation.
//!
//! Assessment practice uses three distinct rounding points, and they must
//! not be merged:
//!
//! | Helper               | Used for                                        |
//! |----------------------|-------------------------------------------------|
//! | [`round_to_hundred`] | each land line's market value                   |
//! | [`round_to_dollar`]  | current-use values, discounts, property totals  |
//! | [`round_half_up`]    | percentages and display rates (two places)      |
//!
//! All of them round half away from zero.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded up to 0.01 (away from zero).
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use cama_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(12.344)), dec!(12.34));
/// assert_eq!(round_half_up(dec!(12.345)), dec!(12.35));
/// assert_eq!(round_half_up(dec!(-12.345)), dec!(-12.35)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a decimal value to the nearest whole dollar.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use cama_core::calculations::common::round_to_dollar;
///
/// assert_eq!(round_to_dollar(dec!(509.5)), dec!(510));
/// assert_eq!(round_to_dollar(dec!(509.49)), dec!(509));
/// ```
pub fn round_to_dollar(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a decimal value to the nearest hundred dollars.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use cama_core::calculations::common::round_to_hundred;
///
/// assert_eq!(round_to_hundred(dec!(103750)), dec!(103800));
/// assert_eq!(round_to_hundred(dec!(103749.99)), dec!(103700));
/// ```
pub fn round_to_hundred(value: Decimal) -> Decimal {
    (value / Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        * Decimal::ONE_HUNDRED
}

/// Restricts `value` to the closed range `[min, max]`.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use cama_core::calculations::common::clamp;
///
/// assert_eq!(clamp(dec!(1.4), dec!(0), dec!(1)), dec!(1));
/// assert_eq!(clamp(dec!(-0.2), dec!(0), dec!(1)), dec!(0));
/// ```
pub fn clamp(
    value: Decimal,
    min: Decimal,
    max: Decimal,
) -> Decimal {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}
