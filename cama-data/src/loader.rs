//! CSV loader for municipal reference tables.
//!
//! A municipality's reference data for one effective year lives in a single
//! directory, one CSV file per table. Headers are matched by name, so column
//! order does not matter. Legacy camelCase headers (`zoneId`, `minRate`,
//! ...) are accepted alongside the snake_case names below.
//!
//! | File                           | Required | Row type                 |
//! |--------------------------------|----------|--------------------------|
//! | `zones.csv`                    | yes      | [`Zone`]                 |
//! | `ladder_tiers.csv`             | no       | `LadderTier`             |
//! | `neighborhoods.csv`            | no       | `AdjustmentFactor`       |
//! | `sites.csv`                    | no       | `AdjustmentFactor`       |
//! | `driveways.csv`                | no       | `AdjustmentFactor`       |
//! | `roads.csv`                    | no       | `AdjustmentFactor`       |
//! | `topography.csv`               | no       | `AdjustmentFactor`       |
//! | `current_use_categories.csv`   | no       | `CurrentUseCategory`     |
//! | `land_taxation_categories.csv` | no       | `LandTaxationCategory`   |
//! | `acreage_discount.toml`        | no       | [`AcreageDiscountSettings`] |
//!
//! A missing optional table loads as empty. Without `acreage_discount.toml`
//! no acreage discount is applied.
//!
//! ### Minimal example
//!
//! ```csv
//! id,code,minimum_acreage,minimum_frontage,excess_land_cost_per_acre
//! R1,R1,10,100,1000
//! ```
//!
//! ```toml
//! minimum_qualifying_acreage = 10
//! maximum_qualifying_acreage = 50
//! maximum_discount_percentage = 20
//! ```

use std::io::Read;
use std::path::{Path, PathBuf};

use cama_core::{AcreageDiscountSettings, ReferenceData, Zone};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info};

/// Name of the optional acreage discount settings file.
pub const ACREAGE_DISCOUNT_FILE: &str = "acreage_discount.toml";

/// Errors that can occur when loading reference tables.
#[derive(Debug, Error)]
pub enum ReferenceLoaderError {
    #[error("CSV parse error in {table}: {source}")]
    CsvParse {
        table: &'static str,
        #[source]
        source: csv::Error,
    },

    #[error("invalid acreage discount settings: {0}")]
    DiscountSettings(#[from] toml::de::Error),

    #[error("cannot read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("reference directory '{}' does not exist", .0.display())]
    MissingDirectory(PathBuf),

    #[error("required table '{0}' is missing")]
    MissingTable(&'static str),
}

/// The CSV tables making up one reference data set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceTable {
    Zones,
    LadderTiers,
    Neighborhoods,
    Sites,
    Driveways,
    Roads,
    Topography,
    CurrentUseCategories,
    LandTaxationCategories,
}

impl ReferenceTable {
    pub const ALL: [ReferenceTable; 9] = [
        ReferenceTable::Zones,
        ReferenceTable::LadderTiers,
        ReferenceTable::Neighborhoods,
        ReferenceTable::Sites,
        ReferenceTable::Driveways,
        ReferenceTable::Roads,
        ReferenceTable::Topography,
        ReferenceTable::CurrentUseCategories,
        ReferenceTable::LandTaxationCategories,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Zones => "zones.csv",
            Self::LadderTiers => "ladder_tiers.csv",
            Self::Neighborhoods => "neighborhoods.csv",
            Self::Sites => "sites.csv",
            Self::Driveways => "driveways.csv",
            Self::Roads => "roads.csv",
            Self::Topography => "topography.csv",
            Self::CurrentUseCategories => "current_use_categories.csv",
            Self::LandTaxationCategories => "land_taxation_categories.csv",
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(self, Self::Zones)
    }
}

/// Loader for reference tables stored as CSV files.
pub struct ReferenceLoader;

impl ReferenceLoader {
    /// Parse the rows of one table from a CSV reader.
    ///
    /// Whitespace around values is trimmed and every row must have the
    /// header's column count.
    pub fn parse<T, R>(
        table: ReferenceTable,
        reader: R,
    ) -> Result<Vec<T>, ReferenceLoaderError>
    where
        T: DeserializeOwned,
        R: Read,
    {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .flexible(false)
            .from_reader(reader);

        csv_reader
            .deserialize()
            .collect::<Result<Vec<T>, _>>()
            .map_err(|source| ReferenceLoaderError::CsvParse {
                table: table.file_name(),
                source,
            })
    }

    /// Parse acreage discount settings from TOML text.
    pub fn parse_acreage_discount(
        input: &str
    ) -> Result<AcreageDiscountSettings, ReferenceLoaderError> {
        Ok(toml::from_str(input)?)
    }

    /// Load a complete reference data set from `dir`.
    ///
    /// # Errors
    /// * [`ReferenceLoaderError::MissingDirectory`] when `dir` is not a directory.
    /// * [`ReferenceLoaderError::MissingTable`] when `zones.csv` is absent.
    /// * Any parse or I/O error from an individual table.
    pub fn load_dir(dir: &Path) -> Result<ReferenceData, ReferenceLoaderError> {
        if !dir.is_dir() {
            return Err(ReferenceLoaderError::MissingDirectory(dir.to_path_buf()));
        }

        let data = ReferenceData {
            zones: Self::load_table(dir, ReferenceTable::Zones)?,
            ladder_tiers: Self::load_table(dir, ReferenceTable::LadderTiers)?,
            neighborhoods: Self::load_table(dir, ReferenceTable::Neighborhoods)?,
            sites: Self::load_table(dir, ReferenceTable::Sites)?,
            driveways: Self::load_table(dir, ReferenceTable::Driveways)?,
            roads: Self::load_table(dir, ReferenceTable::Roads)?,
            topography: Self::load_table(dir, ReferenceTable::Topography)?,
            current_use_categories: Self::load_table(dir, ReferenceTable::CurrentUseCategories)?,
            land_taxation_categories: Self::load_table(
                dir,
                ReferenceTable::LandTaxationCategories,
            )?,
            acreage_discount: Self::load_acreage_discount(dir)?,
        };

        info!(
            dir = %dir.display(),
            zones = data.zones.len(),
            ladder_tiers = data.ladder_tiers.len(),
            current_use_categories = data.current_use_categories.len(),
            acreage_discount = data.acreage_discount.is_some(),
            "reference data loaded"
        );
        Ok(data)
    }

    fn load_table<T: DeserializeOwned>(
        dir: &Path,
        table: ReferenceTable,
    ) -> Result<Vec<T>, ReferenceLoaderError> {
        let path = dir.join(table.file_name());
        if !path.is_file() {
            if table.is_required() {
                return Err(ReferenceLoaderError::MissingTable(table.file_name()));
            }
            debug!(table = table.file_name(), "optional table absent; using empty table");
            return Ok(Vec::new());
        }

        let file = std::fs::File::open(&path)
            .map_err(|source| ReferenceLoaderError::Io { path, source })?;
        let rows = Self::parse(table, file)?;
        debug!(table = table.file_name(), rows = rows.len(), "table parsed");
        Ok(rows)
    }

    fn load_acreage_discount(
        dir: &Path
    ) -> Result<Option<AcreageDiscountSettings>, ReferenceLoaderError> {
        let path = dir.join(ACREAGE_DISCOUNT_FILE);
        if !path.is_file() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path)
            .map_err(|source| ReferenceLoaderError::Io { path, source })?;
        Self::parse_acreage_discount(&contents).map(Some)
    }
}

/// Zones parsed from CSV text. Convenience for callers holding the file
/// contents already.
pub fn parse_zones(input: &str) -> Result<Vec<Zone>, ReferenceLoaderError> {
    ReferenceLoader::parse(ReferenceTable::Zones, input.as_bytes())
}
