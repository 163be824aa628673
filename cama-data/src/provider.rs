use std::path::{Path, PathBuf};

use async_trait::async_trait;
use cama_core::ReferenceData;
use cama_core::provider::{ProviderError, ProviderFactory, ReferenceDataProvider};
use tracing::debug;

use crate::loader::{ReferenceLoader, ReferenceLoaderError};

/// Reference data read from a directory tree of CSV tables.
///
/// Layout: `<root>/<municipality>/<effective year>/zones.csv`, ... See
/// [`crate::loader`] for the table formats.
#[derive(Debug, Clone)]
pub struct CsvReferenceProvider {
    root: PathBuf,
}

impl CsvReferenceProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn year_dir(
        &self,
        municipality: &str,
        effective_year: i32,
    ) -> PathBuf {
        self.root
            .join(municipality)
            .join(effective_year.to_string())
    }
}

#[async_trait]
impl ReferenceDataProvider for CsvReferenceProvider {
    async fn load_reference_data(
        &self,
        municipality: &str,
        effective_year: i32,
    ) -> Result<ReferenceData, ProviderError> {
        let dir = self.year_dir(municipality, effective_year);
        debug!(dir = %dir.display(), "loading reference data");

        let result = tokio::task::spawn_blocking(move || ReferenceLoader::load_dir(&dir))
            .await
            .map_err(|e| ProviderError::Source(format!("reference load task failed: {e}")))?;

        result.map_err(|e| match e {
            ReferenceLoaderError::MissingDirectory(_) => ProviderError::NotFound {
                municipality: municipality.to_string(),
                year: effective_year,
            },
            other => ProviderError::Source(other.to_string()),
        })
    }

    async fn list_effective_years(&self, municipality: &str) -> Result<Vec<i32>, ProviderError> {
        let dir = self.root.join(municipality);
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(ProviderError::Source(format!(
                    "cannot list '{}': {e}",
                    dir.display()
                )));
            }
        };

        let mut years = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| ProviderError::Source(e.to_string()))?
        {
            let is_dir = entry
                .file_type()
                .await
                .map(|t| t.is_dir())
                .unwrap_or(false);
            if let Some(year) = entry
                .file_name()
                .to_str()
                .and_then(|name| name.parse::<i32>().ok())
                .filter(|_| is_dir)
            {
                years.push(year);
            }
        }
        years.sort_unstable();
        Ok(years)
    }
}

/// Opens CSV reference trees, selected as the `csv` backend. The location
/// is the root directory holding one subdirectory per municipality.
pub struct CsvProviderFactory;

#[async_trait]
impl ProviderFactory for CsvProviderFactory {
    fn backend_name(&self) -> &'static str {
        "csv"
    }

    async fn open(
        &self,
        location: &str,
    ) -> Result<Box<dyn ReferenceDataProvider>, ProviderError> {
        let root = PathBuf::from(location);
        if !root.is_dir() {
            return Err(ProviderError::Configuration(format!(
                "reference root '{}' is not a directory",
                root.display()
            )));
        }
        Ok(Box::new(CsvReferenceProvider::new(root)))
    }
}
