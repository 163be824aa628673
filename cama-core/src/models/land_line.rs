use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::lenient;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SizeUnit {
    #[default]
    #[serde(rename = "acres", alias = "AC", alias = "ac", alias = "acre", alias = "Acres")]
    Acres,
    #[serde(
        rename = "front-foot",
        alias = "FF",
        alias = "ff",
        alias = "frontage",
        alias = "front_foot",
        alias = "front-feet"
    )]
    FrontFoot,
}

impl SizeUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Acres => "acres",
            Self::FrontFoot => "front-foot",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "acres" | "AC" | "ac" | "acre" | "Acres" => Some(Self::Acres),
            "front-foot" | "FF" | "ff" | "frontage" | "front_foot" | "front-feet" => {
                Some(Self::FrontFoot)
            }
            _ => None,
        }
    }
}

/// One line item of a property's land description, as entered by the
/// assessor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandLine {
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub size: Decimal,

    #[serde(default, alias = "sizeUnit", alias = "unit")]
    pub size_unit: SizeUnit,

    #[serde(default, alias = "isExcessAcreage", alias = "excess_acreage")]
    pub is_excess_acreage: bool,

    #[serde(default, alias = "landUseType", alias = "land_use")]
    pub land_use_type: Option<String>,

    #[serde(default)]
    pub topography: Option<String>,

    /// Percentage of full value, 100 meaning no adjustment.
    #[serde(default, deserialize_with = "lenient::optional_decimal")]
    pub condition: Option<Decimal>,

    /// Soil productivity index, 0-100. Only read for current-use lines.
    #[serde(default, alias = "SPI", deserialize_with = "lenient::optional_decimal")]
    pub spi: Option<Decimal>,
}

impl LandLine {
    pub fn is_acreage(&self) -> bool {
        self.size_unit == SizeUnit::Acres
    }

    pub fn is_frontage(&self) -> bool {
        self.size_unit == SizeUnit::FrontFoot
    }

    /// `land_use_type` with blank values treated as absent.
    pub fn land_use_code(&self) -> Option<&str> {
        non_blank(self.land_use_type.as_deref())
    }

    /// `topography` with blank values treated as absent.
    pub fn topography_code(&self) -> Option<&str> {
        non_blank(self.topography.as_deref())
    }
}

pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// The multiplicative adjustments applied to a line's base value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineFactors {
    pub neighborhood: Decimal,
    pub site: Decimal,
    pub driveway: Decimal,
    pub road: Decimal,
    pub topography: Decimal,
    pub condition: Decimal,
}

impl Default for LineFactors {
    fn default() -> Self {
        Self {
            neighborhood: Decimal::ONE,
            site: Decimal::ONE,
            driveway: Decimal::ONE,
            road: Decimal::ONE,
            topography: Decimal::ONE,
            condition: Decimal::ONE,
        }
    }
}

impl LineFactors {
    /// Multiplies `value` through every factor in a fixed order.
    ///
    /// Returns `None` if any intermediate product overflows.
    pub fn apply(
        &self,
        value: Decimal,
    ) -> Option<Decimal> {
        [
            self.neighborhood,
            self.site,
            self.driveway,
            self.road,
            self.topography,
            self.condition,
        ]
        .into_iter()
        .try_fold(value, |acc, factor| acc.checked_mul(factor))
    }
}

/// A land line enriched with every computed valuation field.
///
/// When the line could not be valued, `calculation_error` carries the
/// reason and all monetary fields are zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalculatedLandLine {
    #[serde(flatten)]
    pub line: LandLine,

    /// Acreage actually priced: the ladder-capped amount for non-excess
    /// lines, the full size for excess lines, zero for frontage.
    pub effective_acreage: Decimal,
    pub base_rate: Decimal,
    pub base_value: Decimal,
    pub acreage_discount_percentage: Decimal,
    pub acreage_discount_amount: Decimal,
    pub factors: LineFactors,
    pub raw_market_value: Decimal,
    pub market_value: Decimal,
    pub is_current_use: bool,
    pub current_use_category: Option<String>,
    pub current_use_rate: Option<Decimal>,
    pub current_use_value: Decimal,
    pub current_use_credit: Decimal,
    pub assessed_value: Decimal,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub calculation_error: Option<String>,
}

impl CalculatedLandLine {
    /// A zero-valued line with neutral factors.
    pub fn zeroed(line: LandLine) -> Self {
        Self {
            line,
            effective_acreage: Decimal::ZERO,
            base_rate: Decimal::ZERO,
            base_value: Decimal::ZERO,
            acreage_discount_percentage: Decimal::ZERO,
            acreage_discount_amount: Decimal::ZERO,
            factors: LineFactors::default(),
            raw_market_value: Decimal::ZERO,
            market_value: Decimal::ZERO,
            is_current_use: false,
            current_use_category: None,
            current_use_rate: None,
            current_use_value: Decimal::ZERO,
            current_use_credit: Decimal::ZERO,
            assessed_value: Decimal::ZERO,
            calculation_error: None,
        }
    }

    /// A zero-valued line annotated with the reason it could not be valued.
    pub fn failed(
        line: LandLine,
        error: impl ToString,
    ) -> Self {
        Self {
            calculation_error: Some(error.to_string()),
            ..Self::zeroed(line)
        }
    }

    pub fn is_error(&self) -> bool {
        self.calculation_error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn size_unit_parses_legacy_spellings() {
        assert_eq!(SizeUnit::parse("AC"), Some(SizeUnit::Acres));
        assert_eq!(SizeUnit::parse("FF"), Some(SizeUnit::FrontFoot));
        assert_eq!(SizeUnit::parse("front_foot"), Some(SizeUnit::FrontFoot));
        assert_eq!(SizeUnit::parse("hectares"), None);
    }

    #[test]
    fn land_line_accepts_camel_case_aliases() {
        let line: LandLine = toml::from_str(
            r#"
            size = "3.5"
            sizeUnit = "FF"
            isExcessAcreage = true
            landUseType = "FARM"
            "#,
        )
        .unwrap();

        assert_eq!(line.size, dec!(3.5));
        assert_eq!(line.size_unit, SizeUnit::FrontFoot);
        assert!(line.is_excess_acreage);
        assert_eq!(line.land_use_code(), Some("FARM"));
        assert_eq!(line.condition, None);
    }

    #[test]
    fn blank_codes_are_treated_as_absent() {
        let line = LandLine {
            land_use_type: Some("  ".to_string()),
            topography: Some(String::new()),
            ..LandLine::default()
        };

        assert_eq!(line.land_use_code(), None);
        assert_eq!(line.topography_code(), None);
    }

    #[test]
    fn factors_apply_in_sequence() {
        let factors = LineFactors {
            neighborhood: dec!(1.10),
            condition: dec!(0.50),
            ..LineFactors::default()
        };

        assert_eq!(factors.apply(dec!(100000)), Some(dec!(55000)));
    }

    #[test]
    fn factors_report_overflow() {
        let factors = LineFactors {
            neighborhood: Decimal::MAX,
            site: Decimal::MAX,
            ..LineFactors::default()
        };

        assert_eq!(factors.apply(dec!(10)), None);
    }

    #[test]
    fn failed_line_carries_error_and_zero_values() {
        let line = CalculatedLandLine::failed(LandLine::default(), "zone not found");

        assert!(line.is_error());
        assert_eq!(line.market_value, Decimal::ZERO);
        assert_eq!(line.calculation_error.as_deref(), Some("zone not found"));
    }
}
