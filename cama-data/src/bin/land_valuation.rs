use std::path::PathBuf;

use anyhow::{Context, Result};
use cama_core::provider::ProviderRegistry;
use cama_core::{CalculatedLandAssessment, LandValuationCalculator};
use cama_data::logging::init_logging;
use cama_data::{CsvProviderFactory, PropertyLoader, ValuationConfig};
use clap::Parser;
use tracing::{info, warn};

/// Value the land on one property.
///
/// Reads the property directory (`property.toml`, `land_lines.csv`, and
/// optionally `views.csv` and `waterfronts.csv`), loads the municipality's
/// reference data for the effective year, and prints per-line values and
/// property totals.
#[derive(Parser, Debug)]
#[command(name = "land-valuation")]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory holding the property's input files
    property: PathBuf,

    /// TOML configuration file; defaults are used when it does not exist
    #[arg(short, long, default_value = "valuation.toml")]
    config: PathBuf,

    /// Root directory of the reference data (overrides the config file)
    #[arg(short, long)]
    reference_root: Option<PathBuf>,

    /// Municipality whose reference data applies (overrides the config file)
    #[arg(short, long)]
    municipality: Option<String>,

    /// Effective year of the reference data (overrides the config file)
    #[arg(short = 'y', long)]
    year: Option<i32>,

    /// Log level or EnvFilter directive (overrides the config file)
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    fn apply(
        self,
        mut config: ValuationConfig,
    ) -> (PathBuf, ValuationConfig) {
        if let Some(root) = self.reference_root {
            config.reference_root = root;
        }
        if let Some(municipality) = self.municipality {
            config.municipality = Some(municipality);
        }
        if let Some(year) = self.year {
            config.effective_year = Some(year);
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        (self.property, config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = ValuationConfig::load_or_default(&args.config)
        .with_context(|| format!("Failed to load config: {}", args.config.display()))?;
    let (property_dir, config) = args.apply(config);

    init_logging(&config.log_level, config.log_file.as_deref())?;

    let (municipality, year) = config.target()?;

    let mut registry = ProviderRegistry::new();
    registry.register(CsvProviderFactory);
    let provider = registry
        .open(&config.provider_config())
        .await
        .context("Failed to open reference data")?;

    let reference = match provider.load_reference_data(municipality, year).await {
        Ok(reference) => reference,
        Err(error) => {
            let years = provider
                .list_effective_years(municipality)
                .await
                .unwrap_or_default();
            warn!(municipality, ?years, "effective years available");
            return Err(error).context("Failed to load reference data");
        }
    };

    let input = PropertyLoader::load_dir(&property_dir)
        .with_context(|| format!("Failed to load property: {}", property_dir.display()))?;

    info!(
        municipality,
        year,
        land_lines = input.assessment.land_lines.len(),
        "valuing property"
    );

    let calculator = LandValuationCalculator::new(&reference);
    let result =
        calculator.calculate_property(&input.assessment, &input.views, &input.waterfronts);

    print_report(&result);

    if result.calculated_totals.lines_with_errors > 0 {
        warn!(
            failed = result.calculated_totals.lines_with_errors,
            "some land lines could not be valued"
        );
    }

    Ok(())
}

fn print_report(result: &CalculatedLandAssessment) {
    println!(
        "{:>3}  {:>10}  {:<10}  {:>10}  {:>12}  {:>12}  {:>12}  {:>12}",
        "#", "size", "unit", "eff.acres", "base", "market", "current use", "assessed"
    );
    for (idx, line) in result.land_lines.iter().enumerate() {
        let current_use = if line.is_current_use {
            line.current_use_value.to_string()
        } else {
            "-".to_string()
        };
        println!(
            "{:>3}  {:>10}  {:<10}  {:>10}  {:>12}  {:>12}  {:>12}  {:>12}",
            idx + 1,
            line.line.size,
            line.line.size_unit.as_str(),
            line.effective_acreage,
            line.base_value,
            line.market_value,
            current_use,
            line.assessed_value,
        );
        if let Some(error) = &line.calculation_error {
            println!("     error: {error}");
        }
    }

    let totals = &result.calculated_totals;
    println!();
    for (label, value) in [
        ("land market value", totals.land_market_value),
        ("land assessed value", totals.land_assessed_value),
        ("view market value", totals.view_market_value),
        ("waterfront market value", totals.waterfront_market_value),
        ("total market value", totals.total_market_value),
        ("total current-use credit", totals.total_current_use_credit),
        ("total assessed value", totals.total_assessed_value),
    ] {
        println!("{label:<26}{value:>12}");
    }
    println!(
        "acreage {} / frontage {} / lines {} ({} failed)",
        totals.total_acreage,
        totals.total_frontage,
        totals.land_line_count,
        totals.lines_with_errors
    );
}
