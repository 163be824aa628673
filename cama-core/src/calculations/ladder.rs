//! Acreage ladder interpolation.
//!
//! A zone's ladder is a short table of (acreage, total value) tiers. Values
//! between tiers follow a monotone cubic Hermite curve: smooth through every
//! tier, never overshooting the neighbouring tier values, and flat at local
//! extrema. Outside the tier range the boundary tier's value is returned
//! unchanged; the curve never extrapolates.
//!
//! # Tangent construction
//!
//! | Point     | Tangent                                                     |
//! |-----------|-------------------------------------------------------------|
//! | first     | secant slope of the first interval                          |
//! | interior  | mean of adjacent secants, or 0 when they differ in sign     |
//! | last      | secant slope of the last interval                           |
//!
//! Every tangent is then limited to three times the smaller adjacent secant
//! magnitude, which is sufficient for the curve to stay monotone on each
//! interval. A secant too steep for `Decimal` gets a flat tangent.
//!
//! Evaluation is checked: a value that leaves the `Decimal` range comes back
//! as `None` rather than panicking.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use cama_core::calculations::MonotoneCurve;
//!
//! let curve = MonotoneCurve::new(vec![
//!     (dec!(1), dec!(50000)),
//!     (dec!(5), dec!(150000)),
//!     (dec!(10), dec!(200000)),
//! ]);
//!
//! assert_eq!(curve.value_at(dec!(5)), Some(dec!(150000)));
//! assert_eq!(curve.value_at(dec!(3)), Some(dec!(103750)));
//! assert_eq!(curve.value_at(dec!(40)), Some(dec!(200000)));
//! ```

use rust_decimal::Decimal;
use tracing::warn;

use crate::models::LadderTier;

/// Upper bound on a tangent, as a multiple of the adjacent secant slope.
const TANGENT_LIMIT: Decimal = Decimal::from_parts(3, 0, 0, false, 0);

/// A shape-preserving cubic curve through points with strictly increasing x.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonotoneCurve {
    points: Vec<(Decimal, Decimal)>,
    tangents: Vec<Decimal>,
}

impl MonotoneCurve {
    /// Builds a curve through `points`.
    ///
    /// Points must be sorted by x with no repeated x values;
    /// [`LadderCurve::from_tiers`] takes care of that for ladder data.
    pub fn new(points: Vec<(Decimal, Decimal)>) -> Self {
        let tangents = Self::tangents(&points);
        Self { points, tangents }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Evaluates the curve at `x`, clamping to the boundary values.
    ///
    /// Returns `None` when the interpolation overflows.
    pub fn value_at(
        &self,
        x: Decimal,
    ) -> Option<Decimal> {
        let (first, last) = match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return Some(Decimal::ZERO),
        };

        if self.points.len() == 1 || x <= first.0 {
            return Some(first.1);
        }
        if x >= last.0 {
            return Some(last.1);
        }

        // first.0 < x < last.0, so 1 <= upper < len.
        let upper = self.points.partition_point(|(px, _)| *px <= x);
        let k = upper - 1;

        self.hermite(k, x)
    }

    /// Cubic Hermite evaluation on interval `k`.
    fn hermite(
        &self,
        k: usize,
        x: Decimal,
    ) -> Option<Decimal> {
        let (x0, y0) = self.points[k];
        let (x1, y1) = self.points[k + 1];
        let h = x1.checked_sub(x0)?;
        let t = x.checked_sub(x0)?.checked_div(h)?;
        let t2 = t * t;
        let t3 = t2 * t;

        let two = Decimal::TWO;
        let three = Decimal::from(3);

        // 0 <= t < 1, so the basis polynomials stay small.
        let h00 = two * t3 - three * t2 + Decimal::ONE;
        let h10 = t3 - two * t2 + t;
        let h01 = three * t2 - two * t3;
        let h11 = t3 - t2;

        let terms = [
            h00.checked_mul(y0)?,
            h10.checked_mul(h)?.checked_mul(self.tangents[k])?,
            h01.checked_mul(y1)?,
            h11.checked_mul(h)?.checked_mul(self.tangents[k + 1])?,
        ];
        terms
            .into_iter()
            .try_fold(Decimal::ZERO, |sum, term| sum.checked_add(term))
    }

    fn tangents(points: &[(Decimal, Decimal)]) -> Vec<Decimal> {
        let n = points.len();
        if n < 2 {
            return vec![Decimal::ZERO; n];
        }

        let secants: Vec<Option<Decimal>> = points
            .windows(2)
            .map(|w| w[1].1.checked_sub(w[0].1)?.checked_div(w[1].0.checked_sub(w[0].0)?))
            .collect();

        let mut tangents = Vec::with_capacity(n);
        tangents.push(secants[0].unwrap_or(Decimal::ZERO));
        for pair in secants.windows(2) {
            let tangent = match (pair[0], pair[1]) {
                (Some(left), Some(right)) => Self::interior_tangent(left, right),
                _ => Decimal::ZERO,
            };
            tangents.push(tangent);
        }
        tangents.push(secants[n - 2].unwrap_or(Decimal::ZERO));

        tangents
    }

    fn interior_tangent(
        left: Decimal,
        right: Decimal,
    ) -> Decimal {
        if left.is_zero()
            || right.is_zero()
            || left.is_sign_negative() != right.is_sign_negative()
        {
            return Decimal::ZERO;
        }

        let mean = left / Decimal::TWO + right / Decimal::TWO;
        let limit = TANGENT_LIMIT
            .checked_mul(left.abs().min(right.abs()))
            .unwrap_or(Decimal::MAX);
        if mean.abs() > limit {
            if mean.is_sign_negative() { -limit } else { limit }
        } else {
            mean
        }
    }
}

/// A zone's ladder, ready for repeated evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LadderCurve {
    curve: MonotoneCurve,
    frontage_rate: Decimal,
}

impl LadderCurve {
    /// Builds a zone's curve from its tiers in any order.
    ///
    /// Tiers are sorted by acreage. A tier repeating an acreage already seen
    /// is dropped with a warning. Returns `None` when there are no tiers.
    pub fn from_tiers(
        zone_id: &str,
        tiers: &[&LadderTier],
    ) -> Option<Self> {
        let mut sorted: Vec<&LadderTier> = tiers.to_vec();
        sorted.sort_by_key(|tier| tier.acreage);

        let first = *sorted.first()?;
        let frontage_rate = first.frontage_rate.unwrap_or(first.value);

        let before = sorted.len();
        sorted.dedup_by_key(|tier| tier.acreage);
        if sorted.len() < before {
            warn!(
                zone_id,
                dropped = before - sorted.len(),
                "ladder has tiers with repeated acreage; keeping the first of each"
            );
        }

        let points = sorted.iter().map(|tier| (tier.acreage, tier.value)).collect();

        Some(Self {
            curve: MonotoneCurve::new(points),
            frontage_rate,
        })
    }

    /// Total land value for `acreage`, or `None` on overflow.
    pub fn value_for_acreage(
        &self,
        acreage: Decimal,
    ) -> Option<Decimal> {
        self.curve.value_at(acreage)
    }

    /// Flat per-front-foot rate: the first tier's frontage rate, or its
    /// value when no frontage rate is configured.
    pub fn frontage_rate(&self) -> Decimal {
        self.frontage_rate
    }

    /// Base value of `frontage` feet, or `None` on overflow.
    pub fn value_for_frontage(
        &self,
        frontage: Decimal,
    ) -> Option<Decimal> {
        self.frontage_rate.checked_mul(frontage)
    }

    /// Distinct acreages on the ladder.
    pub fn tier_count(&self) -> usize {
        self.curve.len()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn tier(
        acreage: Decimal,
        value: Decimal,
    ) -> LadderTier {
        LadderTier {
            zone_id: "R1".to_string(),
            acreage,
            value,
            frontage_rate: None,
        }
    }

    fn standard_tiers() -> Vec<LadderTier> {
        vec![
            tier(dec!(1), dec!(50000)),
            tier(dec!(5), dec!(150000)),
            tier(dec!(10), dec!(200000)),
        ]
    }

    fn ladder(tiers: &[LadderTier]) -> LadderCurve {
        let refs: Vec<&LadderTier> = tiers.iter().collect();
        LadderCurve::from_tiers("R1", &refs).unwrap()
    }

    fn sample_range(
        from: Decimal,
        to: Decimal,
        step: Decimal,
    ) -> Vec<Decimal> {
        let mut xs = Vec::new();
        let mut x = from;
        while x <= to {
            xs.push(x);
            x += step;
        }
        xs
    }

    // =========================================================================
    // tangent tests
    // =========================================================================

    #[test]
    fn tangents_average_same_sign_secants() {
        let curve = MonotoneCurve::new(vec![
            (dec!(1), dec!(50000)),
            (dec!(5), dec!(150000)),
            (dec!(10), dec!(200000)),
        ]);

        // Secants are 25000 and 10000.
        assert_eq!(curve.tangents, vec![dec!(25000), dec!(17500), dec!(10000)]);
    }

    #[test]
    fn tangents_are_flat_at_local_extrema() {
        let curve = MonotoneCurve::new(vec![
            (dec!(0), dec!(0)),
            (dec!(1), dec!(10)),
            (dec!(2), dec!(0)),
        ]);

        assert_eq!(curve.tangents[1], Decimal::ZERO);
    }

    #[test]
    fn tangents_are_limited_to_three_times_secant() {
        let curve = MonotoneCurve::new(vec![
            (dec!(0), dec!(0)),
            (dec!(1), dec!(100)),
            (dec!(2), dec!(101)),
        ]);

        // Mean of 100 and 1 is 50.5, limited to 3 * 1.
        assert_eq!(curve.tangents[1], dec!(3));
    }

    #[test]
    fn limited_tangent_keeps_sign_of_falling_secants() {
        let curve = MonotoneCurve::new(vec![
            (dec!(0), dec!(101)),
            (dec!(1), dec!(100)),
            (dec!(2), dec!(0)),
        ]);

        // Mean of -1 and -100 is -50.5, limited to -3.
        assert_eq!(curve.tangents[1], dec!(-3));
    }

    #[test]
    fn secant_beyond_decimal_range_gets_flat_tangent() {
        let curve = MonotoneCurve::new(vec![(dec!(0), -Decimal::MAX), (dec!(1), Decimal::MAX)]);

        assert_eq!(curve.tangents, vec![Decimal::ZERO, Decimal::ZERO]);
        assert!(curve.value_at(dec!(0.5)).is_some());
    }

    // =========================================================================
    // interpolation tests
    // =========================================================================

    #[test]
    fn value_at_tier_acreage_is_exact() {
        let ladder = ladder(&standard_tiers());

        for tier in standard_tiers() {
            assert_eq!(ladder.value_for_acreage(tier.acreage).unwrap(), tier.value);
        }
    }

    #[test]
    fn value_between_tiers_follows_cubic() {
        let ladder = ladder(&standard_tiers());

        // t = 0.5 on [1, 5]:
        // 0.5 * 50000 + 0.125 * 4 * 25000 + 0.5 * 150000 - 0.125 * 4 * 17500
        assert_eq!(ladder.value_for_acreage(dec!(3)).unwrap(), dec!(103750));
    }

    #[test]
    fn value_between_tiers_is_strictly_inside_bracket() {
        let ladder = ladder(&standard_tiers());

        let value = ladder.value_for_acreage(dec!(7.3)).unwrap();

        assert!(value > dec!(150000) && value < dec!(200000), "got {value}");
    }

    #[test]
    fn value_below_first_tier_clamps() {
        let ladder = ladder(&standard_tiers());

        assert_eq!(ladder.value_for_acreage(dec!(0.25)).unwrap(), dec!(50000));
        assert_eq!(ladder.value_for_acreage(Decimal::ZERO).unwrap(), dec!(50000));
    }

    #[test]
    fn value_above_last_tier_clamps() {
        let ladder = ladder(&standard_tiers());

        assert_eq!(ladder.value_for_acreage(dec!(10.01)).unwrap(), dec!(200000));
        assert_eq!(ladder.value_for_acreage(dec!(500)).unwrap(), dec!(200000));
    }

    #[test]
    fn single_tier_ignores_acreage() {
        let ladder = ladder(&[tier(dec!(2), dec!(80000))]);

        assert_eq!(ladder.value_for_acreage(dec!(0.5)).unwrap(), dec!(80000));
        assert_eq!(ladder.value_for_acreage(dec!(2)).unwrap(), dec!(80000));
        assert_eq!(ladder.value_for_acreage(dec!(9)).unwrap(), dec!(80000));
    }

    #[test]
    fn increasing_ladder_is_monotone() {
        let ladder = ladder(&[
            tier(dec!(0.5), dec!(30000)),
            tier(dec!(1), dec!(90000)),
            tier(dec!(2), dec!(95000)),
            tier(dec!(5), dec!(160000)),
            tier(dec!(10), dec!(165000)),
            tier(dec!(25), dec!(400000)),
        ]);

        let values: Vec<Decimal> = sample_range(dec!(0), dec!(26), dec!(0.05))
            .into_iter()
            .map(|x| ladder.value_for_acreage(x).unwrap())
            .collect();

        for pair in values.windows(2) {
            assert!(pair[0] <= pair[1], "{} > {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn interpolation_does_not_overshoot_tiers() {
        let tiers = [
            tier(dec!(1), dec!(10000)),
            tier(dec!(2), dec!(100000)),
            tier(dec!(3), dec!(101000)),
        ];
        let ladder = ladder(&tiers);

        for x in sample_range(dec!(2), dec!(3), dec!(0.01)) {
            let value = ladder.value_for_acreage(x).unwrap();
            assert!(value <= dec!(101000), "overshoot at {x}: {value}");
        }
    }

    #[test]
    fn unsorted_tiers_are_sorted() {
        let mut tiers = standard_tiers();
        tiers.reverse();
        let ladder = ladder(&tiers);

        assert_eq!(ladder.value_for_acreage(dec!(3)).unwrap(), dec!(103750));
    }

    #[test]
    fn repeated_acreage_keeps_first_tier() {
        let tiers = [
            tier(dec!(1), dec!(50000)),
            tier(dec!(1), dec!(99999)),
            tier(dec!(5), dec!(150000)),
        ];
        let ladder = ladder(&tiers);

        assert_eq!(ladder.tier_count(), 2);
        assert_eq!(ladder.value_for_acreage(dec!(1)).unwrap(), dec!(50000));
    }

    #[test]
    fn empty_ladder_is_none() {
        assert!(LadderCurve::from_tiers("R1", &[]).is_none());
    }

    // =========================================================================
    // frontage tests
    // =========================================================================

    #[test]
    fn frontage_uses_first_tier_frontage_rate() {
        let mut tiers = standard_tiers();
        tiers[0].frontage_rate = Some(dec!(400));
        let ladder = ladder(&tiers);

        assert_eq!(ladder.value_for_frontage(dec!(150)).unwrap(), dec!(60000));
    }

    #[test]
    fn frontage_falls_back_to_first_tier_value() {
        let tiers = [tier(dec!(1), dec!(250)), tier(dec!(5), dec!(150000))];
        let ladder = ladder(&tiers);

        assert_eq!(ladder.frontage_rate(), dec!(250));
        assert_eq!(ladder.value_for_frontage(dec!(100)).unwrap(), dec!(25000));
    }

    #[test]
    fn frontage_beyond_decimal_range_is_none() {
        let ladder = ladder(&standard_tiers());

        assert_eq!(ladder.value_for_frontage(Decimal::MAX / dec!(10)), None);
    }
}
