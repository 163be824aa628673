//! Permissive numeric deserializers for assessment inputs.
//!
//! Land records arrive from spreadsheets and legacy imports where numeric
//! cells are sometimes blank, formatted (`"1,250"`), or plain garbage. These
//! helpers accept numbers or numeric strings and coerce anything
//! unparseable to zero, logging a warning for every coercion so the data
//! problem stays visible.
//!
//! The deserializers ask for a string. CSV hands over the cell text, which
//! is parsed exactly instead of passing through `f64`. Self-describing
//! formats such as TOML ignore the hint and send their native numbers.

use std::fmt;

use rust_decimal::Decimal;
use serde::Deserializer;
use serde::de::{self, Visitor};
use tracing::warn;

/// Parses a numeric cell, returning `None` for blank input.
///
/// Commas are accepted as thousands separators and scientific notation is
/// accepted as a fallback. Non-numeric input yields `Some(0)` and a warning.
///
/// ```
/// use rust_decimal_macros::dec;
/// use cama_core::models::lenient::parse_lenient;
///
/// assert_eq!(parse_lenient(" 1,250.5 "), Some(dec!(1250.5)));
/// assert_eq!(parse_lenient(""), None);
/// assert_eq!(parse_lenient("n/a"), Some(dec!(0)));
/// ```
pub fn parse_lenient(input: &str) -> Option<Decimal> {
    let normalized = input.trim().replace(',', "");
    if normalized.is_empty() {
        return None;
    }
    let parsed = normalized
        .parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(&normalized));
    match parsed {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(input = %input, "non-numeric value coerced to zero: {}", e);
            Some(Decimal::ZERO)
        }
    }
}

struct LenientDecimalVisitor;

impl<'de> Visitor<'de> for LenientDecimalVisitor {
    type Value = Option<Decimal>;

    fn expecting(
        &self,
        formatter: &mut fmt::Formatter,
    ) -> fmt::Result {
        formatter.write_str("a number or a numeric string")
    }

    fn visit_i64<E: de::Error>(
        self,
        v: i64,
    ) -> Result<Self::Value, E> {
        Ok(Some(Decimal::from(v)))
    }

    fn visit_u64<E: de::Error>(
        self,
        v: u64,
    ) -> Result<Self::Value, E> {
        Ok(Some(Decimal::from(v)))
    }

    fn visit_f64<E: de::Error>(
        self,
        v: f64,
    ) -> Result<Self::Value, E> {
        match Decimal::try_from(v) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(input = v, "non-finite value coerced to zero: {}", e);
                Ok(Some(Decimal::ZERO))
            }
        }
    }

    fn visit_str<E: de::Error>(
        self,
        v: &str,
    ) -> Result<Self::Value, E> {
        Ok(parse_lenient(v))
    }

    fn visit_bool<E: de::Error>(
        self,
        v: bool,
    ) -> Result<Self::Value, E> {
        warn!(input = v, "boolean in numeric field coerced to zero");
        Ok(Some(Decimal::ZERO))
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(
        self,
        deserializer: D,
    ) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_str(self)
    }
}

/// Deserializes a required numeric field; blank and non-numeric become zero.
pub fn decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserializer
        .deserialize_str(LenientDecimalVisitor)?
        .unwrap_or(Decimal::ZERO))
}

/// Deserializes an optional numeric field; blank becomes `None`,
/// non-numeric becomes `Some(0)`.
pub fn optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_str(LenientDecimalVisitor)
}
