use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::lenient;

/// A view contribution, valued elsewhere and only totalled here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewEntry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(
        default,
        alias = "calculatedValue",
        alias = "value",
        deserialize_with = "lenient::decimal"
    )]
    pub calculated_value: Decimal,
    #[serde(default, alias = "currentUse")]
    pub current_use: bool,
}

impl ViewEntry {
    /// Current-use views count toward market value but not assessment.
    pub fn assessed_contribution(&self) -> Decimal {
        if self.current_use {
            Decimal::ZERO
        } else {
            self.calculated_value
        }
    }
}

/// A waterfront contribution. An explicit `assessed_value` takes precedence
/// over the current-use rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaterfrontEntry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(
        default,
        alias = "calculatedValue",
        alias = "value",
        deserialize_with = "lenient::decimal"
    )]
    pub calculated_value: Decimal,
    #[serde(
        default,
        alias = "assessedValue",
        deserialize_with = "lenient::optional_decimal"
    )]
    pub assessed_value: Option<Decimal>,
    #[serde(default, alias = "currentUse")]
    pub current_use: bool,
}

impl WaterfrontEntry {
    pub fn assessed_contribution(&self) -> Decimal {
        match self.assessed_value {
            Some(assessed) => assessed,
            None if self.current_use => Decimal::ZERO,
            None => self.calculated_value,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn current_use_view_is_not_assessed() {
        let view = ViewEntry {
            calculated_value: dec!(5000),
            current_use: true,
            ..ViewEntry::default()
        };

        assert_eq!(view.assessed_contribution(), Decimal::ZERO);
    }

    #[test]
    fn waterfront_override_beats_current_use() {
        let waterfront = WaterfrontEntry {
            calculated_value: dec!(8000),
            assessed_value: Some(dec!(1200)),
            current_use: true,
            ..WaterfrontEntry::default()
        };

        assert_eq!(waterfront.assessed_contribution(), dec!(1200));
    }

    #[test]
    fn waterfront_without_override_follows_current_use() {
        let mut waterfront = WaterfrontEntry {
            calculated_value: dec!(8000),
            ..WaterfrontEntry::default()
        };
        assert_eq!(waterfront.assessed_contribution(), dec!(8000));

        waterfront.current_use = true;
        assert_eq!(waterfront.assessed_contribution(), Decimal::ZERO);
    }

    #[test]
    fn legacy_value_field_names_are_accepted() {
        let view: ViewEntry = toml::from_str("calculatedValue = 5000\ncurrentUse = true").unwrap();
        let waterfront: WaterfrontEntry =
            toml::from_str("calculatedValue = \"8,000\"\nassessedValue = 0").unwrap();

        assert_eq!(view.calculated_value, dec!(5000));
        assert!(view.current_use);
        assert_eq!(waterfront.calculated_value, dec!(8000));
        assert_eq!(waterfront.assessed_value, Some(Decimal::ZERO));
    }
}
