use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::lenient;

/// A current-use classification with its per-acre rate range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUseCategory {
    pub code: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "minRate", deserialize_with = "lenient::decimal")]
    pub min_rate: Decimal,
    #[serde(default, alias = "maxRate", deserialize_with = "lenient::decimal")]
    pub max_rate: Decimal,
}

/// A land-use taxation category. Categories that are taxed under current
/// use point at the matching [`CurrentUseCategory`] by code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandTaxationCategory {
    pub id: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "currentUseCategory")]
    pub current_use_category: Option<String>,
}
