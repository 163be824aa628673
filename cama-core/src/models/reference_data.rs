use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::lenient;
use super::{AdjustmentFactor, CurrentUseCategory, LadderTier, LandTaxationCategory, Zone};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcreageDiscountSettings {
    #[serde(alias = "minimumQualifyingAcreage", deserialize_with = "lenient::decimal")]
    pub minimum_qualifying_acreage: Decimal,
    #[serde(alias = "maximumQualifyingAcreage", deserialize_with = "lenient::decimal")]
    pub maximum_qualifying_acreage: Decimal,
    #[serde(alias = "maximumDiscountPercentage", deserialize_with = "lenient::decimal")]
    pub maximum_discount_percentage: Decimal,
}

/// Every reference table a municipality's land valuation needs, for one
/// effective year.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceData {
    #[serde(default)]
    pub zones: Vec<Zone>,
    #[serde(default, alias = "ladderTiers")]
    pub ladder_tiers: Vec<LadderTier>,
    #[serde(default)]
    pub neighborhoods: Vec<AdjustmentFactor>,
    #[serde(default)]
    pub sites: Vec<AdjustmentFactor>,
    #[serde(default)]
    pub driveways: Vec<AdjustmentFactor>,
    #[serde(default)]
    pub roads: Vec<AdjustmentFactor>,
    #[serde(default)]
    pub topography: Vec<AdjustmentFactor>,
    #[serde(default, alias = "currentUseCategories")]
    pub current_use_categories: Vec<CurrentUseCategory>,
    #[serde(default, alias = "landTaxationCategories")]
    pub land_taxation_categories: Vec<LandTaxationCategory>,
    #[serde(default, alias = "acreageDiscount")]
    pub acreage_discount: Option<AcreageDiscountSettings>,
}
