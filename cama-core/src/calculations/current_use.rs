//! Current-use valuation for agricultural and forestry land.
//!
//! A current-use category defines a per-acre rate range. The line's soil
//! productivity index (SPI) places it within that range:
//!
//! | Step | Formula                                           |
//! |------|---------------------------------------------------|
//! | 1    | `spi_ratio = clamp(spi / 100, 0, 1)`, spi = 50 if absent |
//! | 2    | `rate = min_rate + (max_rate - min_rate) * spi_ratio` |
//! | 3    | `value = round(rate * acreage)` to the whole dollar |
//! | 4    | `credit = market_value - value`                    |
//!
//! The current-use value is rounded to the dollar, not to the hundred like
//! market values. The credit is taken against the already-rounded market
//! value.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::CurrentUseCategory;
use crate::calculations::common::{clamp, round_to_dollar};

/// SPI assumed for lines that do not record one.
pub const DEFAULT_SPI: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

/// Result of valuing one line under current use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUseValuation {
    pub category: String,
    pub spi_ratio: Decimal,
    pub rate: Decimal,
    pub value: Decimal,
    pub credit: Decimal,
}

/// Values `acreage` under `category`, taking the credit against
/// `market_value`. Returns `None` when a product leaves the `Decimal` range.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use cama_core::CurrentUseCategory;
/// use cama_core::calculations::value_current_use;
///
/// let category = CurrentUseCategory {
///     code: "FARM".to_string(),
///     description: None,
///     min_rate: dec!(50),
///     max_rate: dec!(200),
/// };
///
/// let valuation = value_current_use(&category, Some(dec!(80)), dec!(3), dec!(103800))
///     .expect("within range");
///
/// assert_eq!(valuation.rate, dec!(170));
/// assert_eq!(valuation.value, dec!(510));
/// assert_eq!(valuation.credit, dec!(103290));
/// ```
pub fn value_current_use(
    category: &CurrentUseCategory,
    spi: Option<Decimal>,
    acreage: Decimal,
    market_value: Decimal,
) -> Option<CurrentUseValuation> {
    let spi_ratio = spi_ratio(spi);
    let band = category.max_rate.checked_sub(category.min_rate)?;
    let rate = category.min_rate.checked_add(band.checked_mul(spi_ratio)?)?;
    let value = round_to_dollar(rate.checked_mul(acreage)?);

    Some(CurrentUseValuation {
        category: category.code.clone(),
        spi_ratio,
        rate,
        value,
        credit: market_value.checked_sub(value)?,
    })
}

/// Normalizes an SPI to a 0-1 ratio.
pub fn spi_ratio(spi: Option<Decimal>) -> Decimal {
    let spi = spi.unwrap_or(DEFAULT_SPI);
    clamp(spi / Decimal::ONE_HUNDRED, Decimal::ZERO, Decimal::ONE)
}
