//! Adjustment factor resolution.
//!
//! Every adjustment entity stores an integer percentage rate; the factor
//! applied to a land line is `rate / 100`. A missing or unknown identifier
//! resolves to the neutral factor 1.0 rather than failing the line.

use std::cell::RefCell;
use std::collections::HashMap;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::calculations::common::clamp;
use crate::models::{FactorKind, LandLine, LineFactors, PropertyContext};
use crate::reference::ReferenceIndex;

/// Highest condition percentage accepted; larger values are clamped.
pub const MAX_CONDITION: Decimal = Decimal::from_parts(1000, 0, 0, false, 0);

/// Memoizing factor lookup.
///
/// The cache lives as long as the resolver and is never shared: one
/// resolver serves one municipality's reference data.
#[derive(Debug, Default)]
pub struct FactorResolver {
    cache: RefCell<HashMap<(FactorKind, String), Decimal>>,
}

impl FactorResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves one factor, defaulting to 1.0.
    ///
    /// An identifier that matches nothing is logged once and then cached
    /// as neutral.
    pub fn resolve(
        &self,
        index: &ReferenceIndex<'_>,
        kind: FactorKind,
        key: Option<&str>,
    ) -> Decimal {
        let Some(key) = key else {
            return Decimal::ONE;
        };

        if let Some(factor) = self.cache.borrow().get(&(kind, key.to_string())) {
            return *factor;
        }

        let factor = match index.factor(kind, key) {
            Some(entry) => entry.factor(),
            None => {
                warn!(kind = kind.as_str(), key, "unknown adjustment; using neutral factor");
                Decimal::ONE
            }
        };
        debug!(kind = kind.as_str(), key, %factor, "resolved adjustment factor");

        self.cache
            .borrow_mut()
            .insert((kind, key.to_string()), factor);
        factor
    }

    /// Resolves every factor for `line` on the property described by `context`.
    pub fn resolve_line(
        &self,
        index: &ReferenceIndex<'_>,
        line: &LandLine,
        context: &PropertyContext,
    ) -> LineFactors {
        LineFactors {
            neighborhood: self.resolve(index, FactorKind::Neighborhood, context.neighborhood()),
            site: self.resolve(index, FactorKind::Site, context.site()),
            driveway: self.resolve(index, FactorKind::Driveway, context.driveway()),
            road: self.resolve(index, FactorKind::Road, context.road()),
            topography: self.resolve(index, FactorKind::Topography, line.topography_code()),
            condition: condition_factor(line.condition),
        }
    }

    /// Number of memoized lookups.
    pub fn cached(&self) -> usize {
        self.cache.borrow().len()
    }
}

/// Converts a condition percentage to a factor; absent means 100%.
pub fn condition_factor(condition: Option<Decimal>) -> Decimal {
    match condition {
        Some(condition) => clamp(condition, Decimal::ZERO, MAX_CONDITION) / Decimal::ONE_HUNDRED,
        None => Decimal::ONE,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::{AdjustmentFactor, ReferenceData};

    fn factor(
        id: &str,
        code: &str,
        rate: Decimal,
    ) -> AdjustmentFactor {
        AdjustmentFactor {
            id: id.to_string(),
            code: code.to_string(),
            description: None,
            rate,
        }
    }

    fn reference_data() -> ReferenceData {
        ReferenceData {
            neighborhoods: vec![factor("n-1", "B", dec!(120))],
            sites: vec![factor("s-1", "WET", dec!(90))],
            driveways: vec![factor("d-1", "DIRT", dec!(95))],
            roads: vec![factor("r-1", "GRAVEL", dec!(97))],
            topography: vec![factor("t-1", "ROLLING", dec!(80))],
            ..ReferenceData::default()
        }
    }

    #[test]
    fn resolve_converts_rate_to_factor() {
        let data = reference_data();
        let index = ReferenceIndex::new(&data);
        let resolver = FactorResolver::new();

        let result = resolver.resolve(&index, FactorKind::Neighborhood, Some("n-1"));

        assert_eq!(result, dec!(1.2));
    }

    #[test]
    fn resolve_missing_key_is_neutral() {
        let data = reference_data();
        let index = ReferenceIndex::new(&data);
        let resolver = FactorResolver::new();

        assert_eq!(resolver.resolve(&index, FactorKind::Site, None), Decimal::ONE);
        assert_eq!(resolver.cached(), 0);
    }

    #[test]
    fn resolve_unknown_key_is_neutral_and_cached() {
        let data = reference_data();
        let index = ReferenceIndex::new(&data);
        let resolver = FactorResolver::new();

        assert_eq!(resolver.resolve(&index, FactorKind::Road, Some("PAVED")), Decimal::ONE);
        assert_eq!(resolver.resolve(&index, FactorKind::Road, Some("PAVED")), Decimal::ONE);
        assert_eq!(resolver.cached(), 1);
    }

    #[test]
    fn resolve_memoizes_per_kind_and_key() {
        let data = reference_data();
        let index = ReferenceIndex::new(&data);
        let resolver = FactorResolver::new();

        for _ in 0..3 {
            resolver.resolve(&index, FactorKind::Site, Some("s-1"));
            resolver.resolve(&index, FactorKind::Driveway, Some("d-1"));
        }

        assert_eq!(resolver.cached(), 2);
    }

    #[test]
    fn resolve_line_collects_every_factor() {
        let data = reference_data();
        let index = ReferenceIndex::new(&data);
        let resolver = FactorResolver::new();
        let context = PropertyContext {
            zone_id: Some("R1".to_string()),
            neighborhood_id: Some("B".to_string()),
            site_id: Some("s-1".to_string()),
            driveway_id: Some("DIRT".to_string()),
            road_id: Some("r-1".to_string()),
        };
        let line = LandLine {
            topography: Some("ROLLING".to_string()),
            condition: Some(dec!(75)),
            ..LandLine::default()
        };

        let factors = resolver.resolve_line(&index, &line, &context);

        assert_eq!(
            factors,
            LineFactors {
                neighborhood: dec!(1.2),
                site: dec!(0.9),
                driveway: dec!(0.95),
                road: dec!(0.97),
                topography: dec!(0.8),
                condition: dec!(0.75),
            }
        );
    }

    #[test]
    fn condition_defaults_to_full_value() {
        assert_eq!(condition_factor(None), Decimal::ONE);
        assert_eq!(condition_factor(Some(dec!(100))), Decimal::ONE);
    }

    #[test]
    fn condition_is_clamped() {
        assert_eq!(condition_factor(Some(dec!(1500))), dec!(10));
        assert_eq!(condition_factor(Some(dec!(-20))), Decimal::ZERO);
    }
}
