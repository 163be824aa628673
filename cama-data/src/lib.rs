//! File-backed inputs for land valuation: reference tables and property
//! records read from CSV and TOML, plus the configuration and logging used
//! by the `land-valuation` command.

pub mod config;
pub mod loader;
pub mod logging;
pub mod property;
pub mod provider;

pub use config::{ConfigError, ValuationConfig};
pub use loader::{ReferenceLoader, ReferenceLoaderError, ReferenceTable};
pub use property::{PropertyInput, PropertyLoadError, PropertyLoader};
pub use provider::{CsvProviderFactory, CsvReferenceProvider};
