use std::collections::BTreeMap;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::ReferenceData;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("No reference data for municipality '{municipality}' in {year}")]
    NotFound { municipality: String, year: i32 },

    #[error("Reference source error: {0}")]
    Source(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Supplies the reference tables a valuation runs against.
///
/// Effective-year selection belongs to the caller: the provider returns
/// exactly the year it is asked for.
#[async_trait]
pub trait ReferenceDataProvider: Send + Sync {
    async fn load_reference_data(
        &self,
        municipality: &str,
        effective_year: i32,
    ) -> Result<ReferenceData, ProviderError>;

    async fn list_effective_years(&self, municipality: &str) -> Result<Vec<i32>, ProviderError>;
}

/// Reference data held in memory, keyed by municipality and year.
#[derive(Debug, Clone, Default)]
pub struct StaticReferenceProvider {
    data: BTreeMap<(String, i32), ReferenceData>,
}

impl StaticReferenceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        municipality: impl Into<String>,
        effective_year: i32,
        data: ReferenceData,
    ) {
        self.data.insert((municipality.into(), effective_year), data);
    }
}

#[async_trait]
impl ReferenceDataProvider for StaticReferenceProvider {
    async fn load_reference_data(
        &self,
        municipality: &str,
        effective_year: i32,
    ) -> Result<ReferenceData, ProviderError> {
        self.data
            .get(&(municipality.to_string(), effective_year))
            .cloned()
            .ok_or_else(|| ProviderError::NotFound {
                municipality: municipality.to_string(),
                year: effective_year,
            })
    }

    async fn list_effective_years(&self, municipality: &str) -> Result<Vec<i32>, ProviderError> {
        Ok(self
            .data
            .keys()
            .filter(|(name, _)| name == municipality)
            .map(|(_, year)| *year)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::Zone;

    fn data_with_zone(id: &str) -> ReferenceData {
        ReferenceData {
            zones: vec![Zone {
                id: id.to_string(),
                code: id.to_string(),
                name: None,
                minimum_acreage: Default::default(),
                minimum_frontage: Default::default(),
                excess_land_cost_per_acre: Default::default(),
            }],
            ..ReferenceData::default()
        }
    }

    #[tokio::test]
    async fn static_provider_returns_requested_year() {
        let mut provider = StaticReferenceProvider::new();
        provider.insert("canterbury", 2024, data_with_zone("R1"));
        provider.insert("canterbury", 2025, data_with_zone("R2"));

        let data = provider.load_reference_data("canterbury", 2025).await.unwrap();

        assert_eq!(data.zones[0].id, "R2");
    }

    #[tokio::test]
    async fn static_provider_reports_missing_year() {
        let provider = StaticReferenceProvider::new();

        let result = provider.load_reference_data("canterbury", 2025).await;

        assert_eq!(
            result,
            Err(ProviderError::NotFound {
                municipality: "canterbury".to_string(),
                year: 2025,
            })
        );
    }

    #[tokio::test]
    async fn static_provider_lists_years_per_municipality() {
        let mut provider = StaticReferenceProvider::new();
        provider.insert("canterbury", 2025, ReferenceData::default());
        provider.insert("canterbury", 2023, ReferenceData::default());
        provider.insert("boscawen", 2024, ReferenceData::default());

        let years = provider.list_effective_years("canterbury").await.unwrap();

        assert_eq!(years, vec![2023, 2025]);
    }
}
