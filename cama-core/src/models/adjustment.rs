use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::lenient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorKind {
    Neighborhood,
    Site,
    Driveway,
    Road,
    Topography,
}

impl FactorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Neighborhood => "neighborhood",
            Self::Site => "site",
            Self::Driveway => "driveway",
            Self::Road => "road",
            Self::Topography => "topography",
        }
    }
}

/// A neighborhood, site, driveway, road or topography attribute.
///
/// `rate` is an integer percentage where 100 is neutral.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustmentFactor {
    pub id: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub rate: Decimal,
}

impl AdjustmentFactor {
    pub fn factor(&self) -> Decimal {
        self.rate / Decimal::ONE_HUNDRED
    }
}
