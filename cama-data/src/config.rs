//! Configuration for the `land-valuation` command.
//!
//! ```toml
//! backend = "csv"
//! reference_root = "reference"
//! municipality = "springfield"
//! effective_year = 2024
//! log_level = "info"
//! log_file = "valuation.log"
//! ```
//!
//! Every key is optional. Command-line flags override the file.

use std::path::{Path, PathBuf};

use cama_core::provider::ProviderConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ValuationConfig {
    /// Reference-data backend, matched against registered provider factories.
    pub backend: String,
    /// Root directory of the reference data.
    pub reference_root: PathBuf,
    pub municipality: Option<String>,
    pub effective_year: Option<i32>,
    /// Bare level (`"debug"`) or a full `EnvFilter` directive.
    pub log_level: String,
    /// Log file, appended to alongside stderr output.
    pub log_file: Option<PathBuf>,
}

impl Default for ValuationConfig {
    fn default() -> Self {
        Self {
            backend: "csv".to_string(),
            reference_root: PathBuf::from("reference"),
            municipality: None,
            effective_year: None,
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

impl ValuationConfig {
    /// Loads configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Loads `path` when it exists, otherwise returns the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.is_file() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Municipality and effective year, both of which a valuation run needs.
    pub fn target(&self) -> Result<(&str, i32), ConfigError> {
        let municipality = self
            .municipality
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .ok_or_else(|| ConfigError::Invalid("municipality is not set".to_string()))?;
        let year = self
            .effective_year
            .ok_or_else(|| ConfigError::Invalid("effective_year is not set".to_string()))?;
        Ok((municipality, year))
    }

    pub fn provider_config(&self) -> ProviderConfig {
        ProviderConfig::new(&self.backend, self.reference_root.display().to_string())
    }
}
