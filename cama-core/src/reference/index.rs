use std::collections::HashMap;

use tracing::warn;

use crate::models::{
    AcreageDiscountSettings, AdjustmentFactor, CurrentUseCategory, FactorKind, LadderTier,
    LandTaxationCategory, ReferenceData, Zone,
};

/// Identifier and code lookups over one factor table.
#[derive(Debug, Default)]
struct FactorTable<'a> {
    by_id: HashMap<&'a str, &'a AdjustmentFactor>,
    by_code: HashMap<&'a str, &'a AdjustmentFactor>,
}

impl<'a> FactorTable<'a> {
    fn build(
        kind: FactorKind,
        entries: &'a [AdjustmentFactor],
    ) -> Self {
        let mut table = Self::default();
        for entry in entries {
            if table.by_id.insert(entry.id.as_str(), entry).is_some() {
                warn!(kind = kind.as_str(), id = %entry.id, "duplicate factor id; last entry wins");
            }
            if !entry.code.is_empty() {
                table.by_code.entry(entry.code.as_str()).or_insert(entry);
            }
        }
        table
    }

    fn get(
        &self,
        key: &str,
    ) -> Option<&'a AdjustmentFactor> {
        self.by_id
            .get(key)
            .or_else(|| self.by_code.get(key))
            .copied()
    }
}

/// Hash-map lookups over a [`ReferenceData`] bundle.
///
/// Built once per calculator; every lookup accepts either an entity's id or
/// its code, trying the id first.
#[derive(Debug)]
pub struct ReferenceIndex<'a> {
    zones_by_id: HashMap<&'a str, &'a Zone>,
    zones_by_code: HashMap<&'a str, &'a Zone>,
    ladder_tiers: HashMap<&'a str, Vec<&'a LadderTier>>,
    factors: HashMap<FactorKind, FactorTable<'a>>,
    current_use: HashMap<&'a str, &'a CurrentUseCategory>,
    taxation_by_id: HashMap<&'a str, &'a LandTaxationCategory>,
    taxation_by_code: HashMap<&'a str, &'a LandTaxationCategory>,
    acreage_discount: Option<&'a AcreageDiscountSettings>,
}

impl<'a> ReferenceIndex<'a> {
    pub fn new(data: &'a ReferenceData) -> Self {
        let mut zones_by_id = HashMap::with_capacity(data.zones.len());
        let mut zones_by_code = HashMap::with_capacity(data.zones.len());
        for zone in &data.zones {
            if zones_by_id.insert(zone.id.as_str(), zone).is_some() {
                warn!(zone_id = %zone.id, "duplicate zone id; last entry wins");
            }
            if !zone.code.is_empty() {
                zones_by_code.entry(zone.code.as_str()).or_insert(zone);
            }
        }

        let mut ladder_tiers: HashMap<&str, Vec<&LadderTier>> = HashMap::new();
        for tier in &data.ladder_tiers {
            ladder_tiers
                .entry(tier.zone_id.as_str())
                .or_default()
                .push(tier);
        }

        let factors = [
            (FactorKind::Neighborhood, &data.neighborhoods),
            (FactorKind::Site, &data.sites),
            (FactorKind::Driveway, &data.driveways),
            (FactorKind::Road, &data.roads),
            (FactorKind::Topography, &data.topography),
        ]
        .into_iter()
        .map(|(kind, entries)| (kind, FactorTable::build(kind, entries)))
        .collect();

        let current_use = data
            .current_use_categories
            .iter()
            .map(|category| (category.code.as_str(), category))
            .collect();

        let mut taxation_by_id = HashMap::new();
        let mut taxation_by_code = HashMap::new();
        for category in &data.land_taxation_categories {
            taxation_by_id.insert(category.id.as_str(), category);
            if !category.code.is_empty() {
                taxation_by_code
                    .entry(category.code.as_str())
                    .or_insert(category);
            }
        }

        Self {
            zones_by_id,
            zones_by_code,
            ladder_tiers,
            factors,
            current_use,
            taxation_by_id,
            taxation_by_code,
            acreage_discount: data.acreage_discount.as_ref(),
        }
    }

    pub fn zone(
        &self,
        key: &str,
    ) -> Option<&'a Zone> {
        self.zones_by_id
            .get(key)
            .or_else(|| self.zones_by_code.get(key))
            .copied()
    }

    /// Tiers for `zone`, matched on the zone's id and then its code.
    /// Unsorted; see [`crate::calculations::LadderCurve::from_tiers`].
    pub fn ladder_tiers(
        &self,
        zone: &Zone,
    ) -> &[&'a LadderTier] {
        self.ladder_tiers
            .get(zone.id.as_str())
            .or_else(|| self.ladder_tiers.get(zone.code.as_str()))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn factor(
        &self,
        kind: FactorKind,
        key: &str,
    ) -> Option<&'a AdjustmentFactor> {
        self.factors.get(&kind).and_then(|table| table.get(key))
    }

    pub fn taxation_category(
        &self,
        key: &str,
    ) -> Option<&'a LandTaxationCategory> {
        self.taxation_by_id
            .get(key)
            .or_else(|| self.taxation_by_code.get(key))
            .copied()
    }

    /// Resolves a land-use code to its current-use category, either
    /// directly or through a taxation category that links to one.
    pub fn current_use_category(
        &self,
        land_use: &str,
    ) -> Option<&'a CurrentUseCategory> {
        if let Some(category) = self.current_use.get(land_use).copied() {
            return Some(category);
        }
        let linked = self
            .taxation_category(land_use)?
            .current_use_category
            .as_deref()?;
        self.current_use.get(linked.trim()).copied()
    }

    pub fn acreage_discount(&self) -> Option<&'a AcreageDiscountSettings> {
        self.acreage_discount
    }
}
