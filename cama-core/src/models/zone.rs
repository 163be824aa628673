use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::lenient;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub id: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Lot size priced by the ladder. Zero means the zone has no minimum.
    #[serde(default, alias = "minimumAcreage", deserialize_with = "lenient::decimal")]
    pub minimum_acreage: Decimal,
    #[serde(default, alias = "minimumFrontage", deserialize_with = "lenient::decimal")]
    pub minimum_frontage: Decimal,
    #[serde(
        default,
        alias = "excessLandCostPerAcre",
        deserialize_with = "lenient::decimal"
    )]
    pub excess_land_cost_per_acre: Decimal,
}

/// One anchor point on a zone's acreage-to-value curve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LadderTier {
    #[serde(alias = "zoneId")]
    pub zone_id: String,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub acreage: Decimal,
    /// Total land value at `acreage`, not a per-acre rate.
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub value: Decimal,
    #[serde(
        default,
        alias = "frontageRate",
        deserialize_with = "lenient::optional_decimal"
    )]
    pub frontage_rate: Option<Decimal>,
}
