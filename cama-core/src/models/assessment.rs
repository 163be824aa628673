use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::land_line::non_blank;
use super::{CalculatedLandLine, LandLine};

/// Property-level identifiers shared by every land line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyContext {
    #[serde(default, alias = "zoneId", alias = "zone")]
    pub zone_id: Option<String>,
    #[serde(default, alias = "neighborhoodId", alias = "neighborhood")]
    pub neighborhood_id: Option<String>,
    #[serde(default, alias = "siteId", alias = "site")]
    pub site_id: Option<String>,
    #[serde(default, alias = "drivewayId", alias = "driveway")]
    pub driveway_id: Option<String>,
    #[serde(default, alias = "roadId", alias = "road")]
    pub road_id: Option<String>,
}

impl PropertyContext {
    pub fn zone(&self) -> Option<&str> {
        non_blank(self.zone_id.as_deref())
    }

    pub fn neighborhood(&self) -> Option<&str> {
        non_blank(self.neighborhood_id.as_deref())
    }

    pub fn site(&self) -> Option<&str> {
        non_blank(self.site_id.as_deref())
    }

    pub fn driveway(&self) -> Option<&str> {
        non_blank(self.driveway_id.as_deref())
    }

    pub fn road(&self) -> Option<&str> {
        non_blank(self.road_id.as_deref())
    }
}

/// A property's land description: ordered land lines plus identifiers.
///
/// Identifiers sit beside `land_lines` at the top level on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "LandAssessmentRecord")]
pub struct LandAssessment {
    #[serde(flatten)]
    pub context: PropertyContext,
    #[serde(default, alias = "landLines")]
    pub land_lines: Vec<LandLine>,
}

// Flattened fields are buffered, and buffered numbers cannot be read back
// through the string-first decimal fields of `LandLine`.
#[derive(Deserialize)]
struct LandAssessmentRecord {
    #[serde(default, alias = "zoneId", alias = "zone")]
    zone_id: Option<String>,
    #[serde(default, alias = "neighborhoodId", alias = "neighborhood")]
    neighborhood_id: Option<String>,
    #[serde(default, alias = "siteId", alias = "site")]
    site_id: Option<String>,
    #[serde(default, alias = "drivewayId", alias = "driveway")]
    driveway_id: Option<String>,
    #[serde(default, alias = "roadId", alias = "road")]
    road_id: Option<String>,
    #[serde(default, alias = "landLines")]
    land_lines: Vec<LandLine>,
}

impl From<LandAssessmentRecord> for LandAssessment {
    fn from(record: LandAssessmentRecord) -> Self {
        Self {
            context: PropertyContext {
                zone_id: record.zone_id,
                neighborhood_id: record.neighborhood_id,
                site_id: record.site_id,
                driveway_id: record.driveway_id,
                road_id: record.road_id,
            },
            land_lines: record.land_lines,
        }
    }
}

/// Property-level roll-up of land, view and waterfront values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculatedTotals {
    pub land_market_value: Decimal,
    pub land_current_use_value: Decimal,
    pub land_current_use_credit: Decimal,
    pub land_assessed_value: Decimal,

    pub view_market_value: Decimal,
    pub view_assessed_value: Decimal,

    pub waterfront_market_value: Decimal,
    pub waterfront_assessed_value: Decimal,

    pub total_market_value: Decimal,
    pub total_current_use_value: Decimal,
    /// Grand market value minus grand assessed value.
    pub total_current_use_credit: Decimal,
    pub total_assessed_value: Decimal,

    pub total_acreage: Decimal,
    pub total_frontage: Decimal,

    pub has_current_use: bool,
    pub land_line_count: usize,
    pub lines_with_errors: usize,
}

/// The calculated counterpart of [`LandAssessment`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalculatedLandAssessment {
    #[serde(flatten)]
    pub context: PropertyContext,
    pub land_lines: Vec<CalculatedLandLine>,
    pub calculated_totals: CalculatedTotals,
}

impl CalculatedLandAssessment {
    /// Lines that could not be valued.
    pub fn failed_lines(&self) -> impl Iterator<Item = (usize, &CalculatedLandLine)> {
        self.land_lines
            .iter()
            .enumerate()
            .filter(|(_, line)| line.is_error())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::SizeUnit;

    #[test]
    fn assessment_reads_identifiers_beside_land_lines() {
        let assessment: LandAssessment = toml::from_str(
            r#"
            zoneId = "R1"
            neighborhood = "N1"

            [[landLines]]
            size = 3
            spi = 80

            [[landLines]]
            size = "1,200.5"
            sizeUnit = "FF"
            "#,
        )
        .unwrap();

        assert_eq!(assessment.context.zone(), Some("R1"));
        assert_eq!(assessment.context.neighborhood(), Some("N1"));
        assert_eq!(assessment.land_lines.len(), 2);
        assert_eq!(assessment.land_lines[0].size, dec!(3));
        assert_eq!(assessment.land_lines[0].spi, Some(dec!(80)));
        assert_eq!(assessment.land_lines[1].size, dec!(1200.5));
        assert_eq!(assessment.land_lines[1].size_unit, SizeUnit::FrontFoot);
    }
}
