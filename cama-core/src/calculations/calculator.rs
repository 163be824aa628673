//! Land line and property valuation.
//!
//! [`LandValuationCalculator`] holds one municipality's reference data and
//! values land lines against it. Each line goes through:
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Resolve the zone (a line without a resolvable zone fails) |
//! | 2    | Price the base value: frontage rate, excess-acreage rate less discount, or the zone ladder |
//! | 3    | Multiply through the adjustment factors to get the raw market value |
//! | 4    | Round the market value to the nearest $100 |
//! | 5    | Value current-use lines and take the credit |
//!
//! Lines on a property are valued in order. Non-excess acreage accumulates
//! from line to line so that only acreage up to the zone's minimum lot size
//! is priced on the ladder.
//!
//! Failures never escape: a line that cannot be valued comes back with
//! `calculation_error` set and zero values, and the rest of the property is
//! still calculated.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use cama_core::calculations::LandValuationCalculator;
//! use cama_core::{LadderTier, LandAssessment, LandLine, PropertyContext, ReferenceData, Zone};
//!
//! let tier = |acreage, value| LadderTier {
//!     zone_id: "R1".to_string(),
//!     acreage,
//!     value,
//!     frontage_rate: None,
//! };
//! let data = ReferenceData {
//!     zones: vec![Zone {
//!         id: "R1".to_string(),
//!         code: "R1".to_string(),
//!         name: None,
//!         minimum_acreage: dec!(10),
//!         minimum_frontage: dec!(0),
//!         excess_land_cost_per_acre: dec!(1000),
//!     }],
//!     ladder_tiers: vec![
//!         tier(dec!(1), dec!(50000)),
//!         tier(dec!(5), dec!(150000)),
//!         tier(dec!(10), dec!(200000)),
//!     ],
//!     ..ReferenceData::default()
//! };
//!
//! let calculator = LandValuationCalculator::new(&data);
//! let assessment = LandAssessment {
//!     context: PropertyContext {
//!         zone_id: Some("R1".to_string()),
//!         ..PropertyContext::default()
//!     },
//!     land_lines: vec![LandLine {
//!         size: dec!(3),
//!         ..LandLine::default()
//!     }],
//! };
//!
//! let result = calculator.calculate_property(&assessment, &[], &[]);
//!
//! assert_eq!(result.land_lines[0].base_value, dec!(103750));
//! assert_eq!(result.land_lines[0].market_value, dec!(103800));
//! assert_eq!(result.calculated_totals.total_assessed_value, dec!(103800));
//! ```

use std::cell::RefCell;
use std::collections::HashMap;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, warn};

use crate::calculations::acreage_discount::{AcreageDiscountCurve, AppliedDiscount};
use crate::calculations::common::{round_half_up, round_to_hundred};
use crate::calculations::current_use::value_current_use;
use crate::calculations::factors::FactorResolver;
use crate::calculations::ladder::LadderCurve;
use crate::calculations::totals::aggregate_totals;
use crate::models::{
    CalculatedLandAssessment, CalculatedLandLine, LandAssessment, LandLine, PropertyContext,
    ReferenceData, SizeUnit, ViewEntry, WaterfrontEntry, Zone,
};
use crate::reference::ReferenceIndex;

/// Reasons a single land line could not be valued.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LandLineError {
    /// The property has no zone identifier.
    #[error("no zone assigned to property")]
    MissingZone,

    /// The zone identifier matched no zone in the reference data.
    #[error("zone '{0}' not found")]
    UnknownZone(String),

    /// Land lines cannot have a negative size.
    #[error("negative land size {0}")]
    NegativeSize(Decimal),

    /// An intermediate value exceeded the decimal range.
    #[error("arithmetic overflow while valuing land line")]
    Overflow,
}

/// How a line's base value was priced, before adjustments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BasePricing {
    effective_acreage: Decimal,
    base_rate: Decimal,
    discount: AppliedDiscount,
}

impl BasePricing {
    fn base_value(&self) -> Decimal {
        self.discount.discounted_value
    }
}

/// Acreage priced on the ladder for a non-excess line.
///
/// Capped at whatever remains of the zone minimum after `accumulated`
/// acreage on earlier lines. A zone minimum of zero disables the cap.
///
/// ```
/// use rust_decimal_macros::dec;
/// use cama_core::calculations::effective_acreage;
///
/// assert_eq!(effective_acreage(dec!(5), dec!(8), dec!(0)), dec!(5));
/// assert_eq!(effective_acreage(dec!(5), dec!(8), dec!(5)), dec!(3));
/// assert_eq!(effective_acreage(dec!(5), dec!(8), dec!(10)), dec!(0));
/// ```
pub fn effective_acreage(
    size: Decimal,
    minimum_acreage: Decimal,
    accumulated: Decimal,
) -> Decimal {
    if minimum_acreage <= Decimal::ZERO {
        return size;
    }
    let remaining = (minimum_acreage - accumulated).max(Decimal::ZERO);
    size.min(remaining)
}

/// Accumulated acreage after `line`. Only non-excess acreage lines count.
pub fn accumulated_after(
    line: &LandLine,
    accumulated: Decimal,
) -> Decimal {
    if line.is_acreage() && !line.is_excess_acreage && line.size > Decimal::ZERO {
        accumulated.saturating_add(line.size)
    } else {
        accumulated
    }
}

/// Values land lines and properties for one municipality.
///
/// Ladder curves and adjustment factors are memoized per instance. The
/// calculator is `Send` but not `Sync`: batch jobs give each worker its own
/// instance.
#[derive(Debug)]
pub struct LandValuationCalculator<'a> {
    index: ReferenceIndex<'a>,
    discount: AcreageDiscountCurve<'a>,
    factors: FactorResolver,
    ladders: RefCell<HashMap<&'a str, Option<LadderCurve>>>,
}

impl<'a> LandValuationCalculator<'a> {
    /// Creates a calculator over `reference`.
    pub fn new(reference: &'a ReferenceData) -> Self {
        let index = ReferenceIndex::new(reference);
        let discount = AcreageDiscountCurve::new(index.acreage_discount());
        Self {
            index,
            discount,
            factors: FactorResolver::new(),
            ladders: RefCell::new(HashMap::new()),
        }
    }

    /// Lookups over the reference data this calculator values against.
    pub fn index(&self) -> &ReferenceIndex<'a> {
        &self.index
    }

    /// Values one land line.
    ///
    /// `accumulated` is the non-excess acreage on earlier lines of the same
    /// property. Failures are returned as data in `calculation_error`.
    pub fn calculate_land_line(
        &self,
        line: &LandLine,
        context: &PropertyContext,
        accumulated: Decimal,
    ) -> CalculatedLandLine {
        match self.try_calculate_land_line(line, context, accumulated) {
            Ok(calculated) => calculated,
            Err(error) => {
                warn!(%error, size = %line.size, "land line could not be valued");
                CalculatedLandLine::failed(line.clone(), error)
            }
        }
    }

    /// Values one land line, returning failures as [`LandLineError`].
    pub fn try_calculate_land_line(
        &self,
        line: &LandLine,
        context: &PropertyContext,
        accumulated: Decimal,
    ) -> Result<CalculatedLandLine, LandLineError> {
        if line.size < Decimal::ZERO {
            return Err(LandLineError::NegativeSize(line.size));
        }
        let zone_key = context.zone().ok_or(LandLineError::MissingZone)?;
        let zone = self
            .index
            .zone(zone_key)
            .ok_or_else(|| LandLineError::UnknownZone(zone_key.to_string()))?;

        let pricing = self.price_base(line, zone, accumulated)?;
        let mut calculated = CalculatedLandLine {
            effective_acreage: pricing.effective_acreage,
            base_rate: pricing.base_rate,
            base_value: pricing.base_value(),
            acreage_discount_percentage: pricing.discount.percentage,
            acreage_discount_amount: pricing.discount.amount,
            ..CalculatedLandLine::zeroed(line.clone())
        };

        if calculated.base_value.is_zero() {
            debug!(zone_id = %zone.id, "zero base value; skipping adjustments");
            return Ok(calculated);
        }

        let factors = self.factors.resolve_line(&self.index, line, context);
        let raw_market_value = factors
            .apply(calculated.base_value)
            .ok_or(LandLineError::Overflow)?;
        let market_value = round_to_hundred(raw_market_value);

        calculated.factors = factors;
        calculated.raw_market_value = raw_market_value;
        calculated.market_value = market_value;
        calculated.assessed_value = market_value;

        let category = line
            .land_use_code()
            .filter(|_| line.is_acreage())
            .and_then(|code| self.index.current_use_category(code));
        if let Some(category) = category {
            let valuation = value_current_use(category, line.spi, line.size, market_value)
                .ok_or(LandLineError::Overflow)?;
            debug!(
                category = %valuation.category,
                rate = %valuation.rate,
                value = %valuation.value,
                "current use applied"
            );
            calculated.is_current_use = true;
            calculated.current_use_category = Some(valuation.category);
            calculated.current_use_rate = Some(valuation.rate);
            calculated.current_use_value = valuation.value;
            calculated.current_use_credit = valuation.credit;
            calculated.assessed_value = valuation.value;
        }

        Ok(calculated)
    }

    /// Values every land line of a property in order and totals the result
    /// together with the view and waterfront entries.
    pub fn calculate_property(
        &self,
        assessment: &LandAssessment,
        views: &[ViewEntry],
        waterfronts: &[WaterfrontEntry],
    ) -> CalculatedLandAssessment {
        let (land_lines, accumulated) = assessment.land_lines.iter().fold(
            (
                Vec::with_capacity(assessment.land_lines.len()),
                Decimal::ZERO,
            ),
            |(mut calculated, accumulated), line| {
                calculated.push(self.calculate_land_line(line, &assessment.context, accumulated));
                (calculated, accumulated_after(line, accumulated))
            },
        );
        debug!(
            lines = land_lines.len(),
            accumulated_acreage = %accumulated,
            "land lines valued"
        );

        let calculated_totals = aggregate_totals(&land_lines, views, waterfronts);

        CalculatedLandAssessment {
            context: assessment.context.clone(),
            land_lines,
            calculated_totals,
        }
    }

    fn price_base(
        &self,
        line: &LandLine,
        zone: &'a Zone,
        accumulated: Decimal,
    ) -> Result<BasePricing, LandLineError> {
        match line.size_unit {
            SizeUnit::FrontFoot => {
                let (rate, value) = self
                    .with_ladder(zone, |ladder| {
                        (ladder.frontage_rate(), ladder.value_for_frontage(line.size))
                    })
                    .unwrap_or((Decimal::ZERO, Some(Decimal::ZERO)));
                Ok(BasePricing {
                    effective_acreage: Decimal::ZERO,
                    base_rate: rate,
                    discount: AppliedDiscount::none(value.ok_or(LandLineError::Overflow)?),
                })
            }
            SizeUnit::Acres if line.is_excess_acreage => {
                let rate = zone.excess_land_cost_per_acre;
                let value = rate
                    .checked_mul(line.size)
                    .ok_or(LandLineError::Overflow)?;
                Ok(BasePricing {
                    effective_acreage: line.size,
                    base_rate: rate,
                    discount: self
                        .discount
                        .apply(value, line.size)
                        .ok_or(LandLineError::Overflow)?,
                })
            }
            SizeUnit::Acres => {
                let acreage = effective_acreage(line.size, zone.minimum_acreage, accumulated);
                let (value, base_rate) = if acreage > Decimal::ZERO {
                    let value = self
                        .with_ladder(zone, |ladder| ladder.value_for_acreage(acreage))
                        .unwrap_or(Some(Decimal::ZERO))
                        .ok_or(LandLineError::Overflow)?;
                    let rate = value.checked_div(acreage).ok_or(LandLineError::Overflow)?;
                    (value, round_half_up(rate))
                } else {
                    (Decimal::ZERO, Decimal::ZERO)
                };
                let percentage = self
                    .discount
                    .percentage(line.size)
                    .ok_or(LandLineError::Overflow)?;
                Ok(BasePricing {
                    effective_acreage: acreage,
                    base_rate,
                    discount: AppliedDiscount {
                        percentage,
                        ..AppliedDiscount::none(value)
                    },
                })
            }
        }
    }

    /// Runs `f` against the zone's memoized ladder curve. Returns `None`
    /// when the zone has no ladder.
    fn with_ladder<T>(
        &self,
        zone: &'a Zone,
        f: impl FnOnce(&LadderCurve) -> T,
    ) -> Option<T> {
        let mut ladders = self.ladders.borrow_mut();
        let ladder = ladders.entry(zone.id.as_str()).or_insert_with(|| {
            let curve = LadderCurve::from_tiers(&zone.id, self.index.ladder_tiers(zone));
            match &curve {
                Some(curve) => {
                    debug!(zone_id = %zone.id, tiers = curve.tier_count(), "ladder built");
                }
                None => {
                    warn!(zone_id = %zone.id, "no ladder configured for zone; land valued at zero");
                }
            }
            curve
        });
        ladder.as_ref().map(f)
    }
}
