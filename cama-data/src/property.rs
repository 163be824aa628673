//! Loader for one property's valuation inputs.
//!
//! A property directory holds:
//!
//! | File              | Required | Contents                                   |
//! |-------------------|----------|--------------------------------------------|
//! | `property.toml`   | yes      | zone, neighborhood, site, driveway, road   |
//! | `land_lines.csv`  | yes      | one row per land line, in valuation order  |
//! | `views.csv`       | no       | view entries                               |
//! | `waterfronts.csv` | no       | waterfront entries                         |
//!
//! ### `land_lines.csv`
//!
//! | Column              | Required | Notes                                     |
//! |---------------------|----------|-------------------------------------------|
//! | `size`              | yes      | acres or front feet                       |
//! | `size_unit`         | no       | `acres` (default) or `front-foot`; `AC`/`FF` accepted |
//! | `is_excess_acreage` | no       | `true` / `false`                          |
//! | `land_use_type`     | no       | current-use or land taxation category     |
//! | `topography`        | no       | topography id or code                     |
//! | `condition`         | no       | percentage, 100 = no adjustment           |
//! | `spi`               | no       | soil productivity index, 0-100            |
//!
//! ```csv
//! size,size_unit,is_excess_acreage,land_use_type,topography,condition,spi
//! 3,acres,false,FARM,,,80
//! 120,FF,false,,LEVEL,90,
//! ```
//!
//! Row order matters: acreage counted toward the zone minimum accumulates
//! from the first row down.

use std::io::Read;
use std::path::{Path, PathBuf};

use cama_core::{LandAssessment, LandLine, PropertyContext, ViewEntry, WaterfrontEntry};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

pub const PROPERTY_FILE: &str = "property.toml";
pub const LAND_LINES_FILE: &str = "land_lines.csv";
pub const VIEWS_FILE: &str = "views.csv";
pub const WATERFRONTS_FILE: &str = "waterfronts.csv";

/// Errors that can occur while loading property inputs.
#[derive(Debug, Error)]
pub enum PropertyLoadError {
    /// The underlying CSV deserialisation failed. `row` is 1-based, with
    /// the header excluded.
    #[error("CSV parse error in {file} row {row}: {source}")]
    Parse {
        file: &'static str,
        row: usize,
        #[source]
        source: csv::Error,
    },

    #[error("invalid property.toml: {0}")]
    Context(#[from] toml::de::Error),

    #[error("cannot read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Everything needed to value one property.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyInput {
    pub assessment: LandAssessment,
    pub views: Vec<ViewEntry>,
    pub waterfronts: Vec<WaterfrontEntry>,
}

/// Loader for property inputs stored as TOML and CSV.
pub struct PropertyLoader;

impl PropertyLoader {
    /// Parse the property identifiers from TOML text.
    pub fn parse_context(input: &str) -> Result<PropertyContext, PropertyLoadError> {
        let context: PropertyContext = toml::from_str(input)?;
        if context.zone().is_none() {
            warn!("property has no zone; every land line will fail");
        }
        Ok(context)
    }

    /// Parse land lines from CSV. Rows are returned in file order.
    pub fn parse_land_lines<R: Read>(reader: R) -> Result<Vec<LandLine>, PropertyLoadError> {
        parse_rows(LAND_LINES_FILE, reader)
    }

    pub fn parse_views<R: Read>(reader: R) -> Result<Vec<ViewEntry>, PropertyLoadError> {
        parse_rows(VIEWS_FILE, reader)
    }

    pub fn parse_waterfronts<R: Read>(reader: R) -> Result<Vec<WaterfrontEntry>, PropertyLoadError> {
        parse_rows(WATERFRONTS_FILE, reader)
    }

    /// Load a property directory.
    ///
    /// # Errors
    ///
    /// * [`PropertyLoadError::Io`] when `property.toml` or `land_lines.csv`
    ///   cannot be read.
    /// * [`PropertyLoadError::Context`] or [`PropertyLoadError::Parse`] when
    ///   any present file is malformed.
    pub fn load_dir(dir: &Path) -> Result<PropertyInput, PropertyLoadError> {
        let context = Self::parse_context(&read_file(&dir.join(PROPERTY_FILE))?)?;
        let land_lines = Self::parse_land_lines(open_file(&dir.join(LAND_LINES_FILE))?)?;

        let views_path = dir.join(VIEWS_FILE);
        let views = if views_path.is_file() {
            Self::parse_views(open_file(&views_path)?)?
        } else {
            Vec::new()
        };

        let waterfronts_path = dir.join(WATERFRONTS_FILE);
        let waterfronts = if waterfronts_path.is_file() {
            Self::parse_waterfronts(open_file(&waterfronts_path)?)?
        } else {
            Vec::new()
        };

        debug!(
            dir = %dir.display(),
            land_lines = land_lines.len(),
            views = views.len(),
            waterfronts = waterfronts.len(),
            "property loaded"
        );

        Ok(PropertyInput {
            assessment: LandAssessment {
                context,
                land_lines,
            },
            views,
            waterfronts,
        })
    }
}

fn parse_rows<T, R>(
    file: &'static str,
    reader: R,
) -> Result<Vec<T>, PropertyLoadError>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(reader);

    reader
        .deserialize::<T>()
        .enumerate()
        .map(|(idx, result)| {
            result.map_err(|source| PropertyLoadError::Parse {
                file,
                row: idx + 1,
                source,
            })
        })
        .collect()
}

fn open_file(path: &Path) -> Result<std::fs::File, PropertyLoadError> {
    std::fs::File::open(path).map_err(|source| PropertyLoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn read_file(path: &Path) -> Result<String, PropertyLoadError> {
    std::fs::read_to_string(path).map_err(|source| PropertyLoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}
