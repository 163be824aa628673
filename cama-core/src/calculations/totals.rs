//! Property-level roll-up of land, view and waterfront values.
//!
//! | Subtotal   | Market                  | Assessed                                       |
//! |------------|-------------------------|------------------------------------------------|
//! | land       | sum of line market      | land market - land current-use credit          |
//! | view       | sum of calculated value | entries not in current use                     |
//! | waterfront | sum of calculated value | explicit assessed value, else current-use rule |
//!
//! Land assessed value is recomputed from the subtotals rather than summed
//! from per-line assessed values. Grand totals are rounded to the whole
//! dollar here and nowhere earlier.

use rust_decimal::Decimal;
use tracing::warn;

use crate::calculations::common::round_to_dollar;
use crate::models::{CalculatedLandLine, CalculatedTotals, ViewEntry, WaterfrontEntry};

/// Totals calculated land lines together with view and waterfront entries.
///
/// Lines carrying a `calculation_error` are counted but contribute no value.
/// A line or entry whose value would push a subtotal past the `Decimal`
/// range is left out with a warning; such a land line counts as failed.
pub fn aggregate_totals(
    land_lines: &[CalculatedLandLine],
    views: &[ViewEntry],
    waterfronts: &[WaterfrontEntry],
) -> CalculatedTotals {
    let mut totals = CalculatedTotals {
        land_line_count: land_lines.len(),
        ..CalculatedTotals::default()
    };

    for line in land_lines {
        if line.is_error() {
            totals.lines_with_errors += 1;
            continue;
        }
        if add_land_line(&mut totals, line).is_none() {
            warn!(size = %line.line.size, "land line exceeds the totals range; left out");
            totals.lines_with_errors += 1;
        }
    }
    totals.land_assessed_value = totals
        .land_market_value
        .saturating_sub(totals.land_current_use_credit);

    for view in views {
        let sums = totals
            .view_market_value
            .checked_add(view.calculated_value)
            .zip(totals.view_assessed_value.checked_add(view.assessed_contribution()));
        match sums {
            Some((market, assessed)) => {
                totals.view_market_value = market;
                totals.view_assessed_value = assessed;
            }
            None => warn!(view = ?view.id, "view value exceeds the totals range; left out"),
        }
    }

    for waterfront in waterfronts {
        let sums = totals
            .waterfront_market_value
            .checked_add(waterfront.calculated_value)
            .zip(
                totals
                    .waterfront_assessed_value
                    .checked_add(waterfront.assessed_contribution()),
            );
        match sums {
            Some((market, assessed)) => {
                totals.waterfront_market_value = market;
                totals.waterfront_assessed_value = assessed;
            }
            None => warn!(
                waterfront = ?waterfront.id,
                "waterfront value exceeds the totals range; left out"
            ),
        }
    }

    totals.total_market_value = round_to_dollar(grand_total([
        totals.land_market_value,
        totals.view_market_value,
        totals.waterfront_market_value,
    ]));
    totals.total_assessed_value = round_to_dollar(grand_total([
        totals.land_assessed_value,
        totals.view_assessed_value,
        totals.waterfront_assessed_value,
    ]));
    totals.total_current_use_value = round_to_dollar(totals.land_current_use_value);
    totals.total_current_use_credit = totals
        .total_market_value
        .saturating_sub(totals.total_assessed_value);

    totals
}

/// Adds one valued land line to the running land subtotals. Nothing is
/// changed when any subtotal would overflow.
fn add_land_line(
    totals: &mut CalculatedTotals,
    line: &CalculatedLandLine,
) -> Option<()> {
    let market = totals.land_market_value.checked_add(line.market_value)?;
    let current_use = totals
        .land_current_use_value
        .checked_add(line.current_use_value)?;
    let credit = totals
        .land_current_use_credit
        .checked_add(line.current_use_credit)?;
    let (acreage, frontage) = if line.line.is_frontage() {
        (totals.total_acreage, totals.total_frontage.checked_add(line.line.size)?)
    } else {
        (totals.total_acreage.checked_add(line.line.size)?, totals.total_frontage)
    };

    totals.land_market_value = market;
    totals.land_current_use_value = current_use;
    totals.land_current_use_credit = credit;
    totals.total_acreage = acreage;
    totals.total_frontage = frontage;
    totals.has_current_use |= line.is_current_use;
    Some(())
}

/// Sums the land, view and waterfront subtotals, saturating at the
/// `Decimal` bounds.
fn grand_total(subtotals: [Decimal; 3]) -> Decimal {
    subtotals.into_iter().fold(Decimal::ZERO, |sum, value| {
        sum.checked_add(value).unwrap_or_else(|| {
            warn!("property total exceeds the decimal range; saturating");
            sum.saturating_add(value)
        })
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::{LandLine, SizeUnit};

    fn valued_line(
        size: Decimal,
        market: Decimal,
    ) -> CalculatedLandLine {
        CalculatedLandLine {
            market_value: market,
            assessed_value: market,
            ..CalculatedLandLine::zeroed(LandLine {
                size,
                ..LandLine::default()
            })
        }
    }

    fn current_use_line(
        size: Decimal,
        market: Decimal,
        current_use_value: Decimal,
    ) -> CalculatedLandLine {
        CalculatedLandLine {
            is_current_use: true,
            current_use_value,
            current_use_credit: market - current_use_value,
            assessed_value: current_use_value,
            ..valued_line(size, market)
        }
    }

    #[test]
    fn combines_land_view_and_waterfront() {
        let lines = [valued_line(dec!(30), dec!(27000))];
        let views = [ViewEntry {
            calculated_value: dec!(5000),
            current_use: false,
            ..ViewEntry::default()
        }];
        let waterfronts = [WaterfrontEntry {
            calculated_value: dec!(8000),
            current_use: true,
            ..WaterfrontEntry::default()
        }];

        let totals = aggregate_totals(&lines, &views, &waterfronts);

        assert_eq!(totals.total_market_value, dec!(40000));
        assert_eq!(totals.total_assessed_value, dec!(32000));
        assert_eq!(totals.view_assessed_value, dec!(5000));
        assert_eq!(totals.waterfront_assessed_value, Decimal::ZERO);
        assert_eq!(totals.total_current_use_credit, dec!(8000));
    }

    #[test]
    fn land_assessed_is_market_less_credit() {
        let lines = [
            valued_line(dec!(2), dec!(90000)),
            current_use_line(dec!(3), dec!(103800), dec!(510)),
        ];

        let totals = aggregate_totals(&lines, &[], &[]);

        assert_eq!(totals.land_market_value, dec!(193800));
        assert_eq!(totals.land_current_use_value, dec!(510));
        assert_eq!(totals.land_current_use_credit, dec!(103290));
        assert_eq!(totals.land_assessed_value, dec!(90510));
        assert!(totals.has_current_use);
    }

    #[test]
    fn measurements_split_acreage_and_frontage() {
        let mut frontage = valued_line(dec!(120), dec!(40000));
        frontage.line.size_unit = SizeUnit::FrontFoot;
        let lines = [valued_line(dec!(1.5), dec!(60000)), frontage];

        let totals = aggregate_totals(&lines, &[], &[]);

        assert_eq!(totals.total_acreage, dec!(1.5));
        assert_eq!(totals.total_frontage, dec!(120));
    }

    #[test]
    fn failed_lines_are_counted_not_summed() {
        let mut failed = CalculatedLandLine::failed(
            LandLine {
                size: dec!(4),
                ..LandLine::default()
            },
            "zone 'X' not found",
        );
        failed.market_value = dec!(999);
        let lines = [valued_line(dec!(1), dec!(50000)), failed];

        let totals = aggregate_totals(&lines, &[], &[]);

        assert_eq!(totals.land_line_count, 2);
        assert_eq!(totals.lines_with_errors, 1);
        assert_eq!(totals.land_market_value, dec!(50000));
        assert_eq!(totals.total_acreage, dec!(1));
    }

    #[test]
    fn grand_totals_round_once_to_dollar() {
        let views = [
            ViewEntry {
                calculated_value: dec!(1000.3),
                ..ViewEntry::default()
            },
            ViewEntry {
                calculated_value: dec!(1000.3),
                ..ViewEntry::default()
            },
        ];

        let totals = aggregate_totals(&[], &views, &[]);

        assert_eq!(totals.view_market_value, dec!(2000.6));
        assert_eq!(totals.total_market_value, dec!(2001));
    }

    #[test]
    fn waterfront_assessed_override_is_used() {
        let waterfronts = [WaterfrontEntry {
            calculated_value: dec!(8000),
            assessed_value: Some(dec!(6500)),
            current_use: false,
            ..WaterfrontEntry::default()
        }];

        let totals = aggregate_totals(&[], &[], &waterfronts);

        assert_eq!(totals.waterfront_market_value, dec!(8000));
        assert_eq!(totals.total_assessed_value, dec!(6500));
    }

    #[test]
    fn line_overflowing_land_subtotal_counts_as_failed() {
        let big = Decimal::MAX / dec!(2) + dec!(1);
        let lines = [valued_line(dec!(1), big), valued_line(dec!(2), big)];

        let totals = aggregate_totals(&lines, &[], &[]);

        assert_eq!(totals.lines_with_errors, 1);
        assert_eq!(totals.land_market_value, big);
        assert_eq!(totals.total_acreage, dec!(1));
    }

    #[test]
    fn grand_total_saturates_instead_of_overflowing() {
        let lines = [valued_line(dec!(1), Decimal::MAX)];
        let views = [ViewEntry {
            calculated_value: Decimal::MAX,
            ..ViewEntry::default()
        }];

        let totals = aggregate_totals(&lines, &views, &[]);

        assert_eq!(totals.total_market_value, Decimal::MAX);
        assert_eq!(totals.lines_with_errors, 0);
    }

    #[test]
    fn empty_property_has_zero_totals() {
        let totals = aggregate_totals(&[], &[], &[]);

        assert_eq!(totals, CalculatedTotals::default());
    }
}
