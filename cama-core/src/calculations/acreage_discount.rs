//! Economy-of-scale discount for large parcels.
//!
//! The discount percentage ramps linearly from 0% at the minimum qualifying
//! acreage to the configured maximum at the maximum qualifying acreage:
//!
//! ```text
//! pct = (acreage - min) / (max - min) * max_pct     min <= acreage < max
//! ```
//!
//! Only excess-acreage base values are actually reduced. Other lines carry
//! the percentage for display. Both operations are checked and return `None`
//! when a value leaves the `Decimal` range.

use rust_decimal::Decimal;

use crate::AcreageDiscountSettings;
use crate::calculations::common::{round_half_up, round_to_dollar};

/// The outcome of applying the discount to a base value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedDiscount {
    pub percentage: Decimal,
    /// Whole-dollar reduction.
    pub amount: Decimal,
    pub discounted_value: Decimal,
}

impl AppliedDiscount {
    pub fn none(value: Decimal) -> Self {
        Self {
            percentage: Decimal::ZERO,
            amount: Decimal::ZERO,
            discounted_value: value,
        }
    }
}

/// The discount ramp for one municipality. Without settings every
/// percentage is zero.
#[derive(Debug, Clone, Copy)]
pub struct AcreageDiscountCurve<'a> {
    settings: Option<&'a AcreageDiscountSettings>,
}

impl<'a> AcreageDiscountCurve<'a> {
    pub fn new(settings: Option<&'a AcreageDiscountSettings>) -> Self {
        Self { settings }
    }

    /// Discount percentage for `acreage`, rounded to two decimal places.
    ///
    /// A degenerate ramp (maximum at or below minimum) gives the full
    /// percentage from the minimum upward.
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use cama_core::AcreageDiscountSettings;
    /// use cama_core::calculations::AcreageDiscountCurve;
    ///
    /// let settings = AcreageDiscountSettings {
    ///     minimum_qualifying_acreage: dec!(10),
    ///     maximum_qualifying_acreage: dec!(50),
    ///     maximum_discount_percentage: dec!(20),
    /// };
    /// let curve = AcreageDiscountCurve::new(Some(&settings));
    ///
    /// assert_eq!(curve.percentage(dec!(30)), Some(dec!(10)));
    /// ```
    pub fn percentage(
        &self,
        acreage: Decimal,
    ) -> Option<Decimal> {
        let Some(settings) = self.settings else {
            return Some(Decimal::ZERO);
        };
        let min = settings.minimum_qualifying_acreage;
        let max = settings.maximum_qualifying_acreage;
        let max_pct = settings.maximum_discount_percentage;

        if acreage < min {
            return Some(Decimal::ZERO);
        }
        if acreage >= max || max <= min {
            return Some(max_pct);
        }

        let ratio = acreage.checked_sub(min)?.checked_div(max.checked_sub(min)?)?;
        ratio.checked_mul(max_pct).map(round_half_up)
    }

    /// Reduces `value` by the discount for `acreage`, rounding the reduction
    /// to whole dollars.
    pub fn apply(
        &self,
        value: Decimal,
        acreage: Decimal,
    ) -> Option<AppliedDiscount> {
        let percentage = self.percentage(acreage)?;
        if percentage.is_zero() {
            return Some(AppliedDiscount::none(value));
        }

        let amount = round_to_dollar(
            value
                .checked_mul(percentage)?
                .checked_div(Decimal::ONE_HUNDRED)?,
        );

        Some(AppliedDiscount {
            percentage,
            amount,
            discounted_value: value.checked_sub(amount)?,
        })
    }
}
