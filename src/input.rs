//! Station input series: JSON arrays with `null` for missing periods.

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use palmer_index::MISSING;

/// Raw station input as it appears on disk.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct StationInputJson {
    precip: Vec<Option<f64>>,
    #[serde(default)]
    pet: Option<Vec<Option<f64>>>,
    #[serde(default)]
    temperature: Option<Vec<Option<f64>>>,
}

/// Second series accompanying precipitation.
#[derive(Debug, Clone, PartialEq)]
pub enum Demand {
    /// Potential evapotranspiration, same depth units as precipitation.
    Pet(Vec<f64>),
    /// Mean temperature for Thornthwaite PE.
    Temperature(Vec<f64>),
}

/// Station series with `null` entries replaced by MISSING.
#[derive(Debug, Clone, PartialEq)]
pub struct StationInput {
    pub precip: Vec<f64>,
    pub demand: Demand,
}

/// Reads a station input file.
pub fn read_station_input(path: &Path) -> Result<StationInput> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read station input: {}", path.display()))?;
    parse_station_input(&text)
        .with_context(|| format!("invalid station input: {}", path.display()))
}

/// Parses a station input document.
///
/// Exactly one of `pet` and `temperature` must be present.
pub fn parse_station_input(text: &str) -> Result<StationInput> {
    let raw: StationInputJson = serde_json::from_str(text).context("failed to parse JSON")?;
    let demand = match (raw.pet, raw.temperature) {
        (Some(pet), None) => Demand::Pet(with_missing(&pet)),
        (None, Some(t)) => Demand::Temperature(with_missing(&t)),
        (Some(_), Some(_)) => bail!("input must have exactly one of pet or temperature, got both"),
        (None, None) => bail!("input must have exactly one of pet or temperature, got neither"),
    };
    Ok(StationInput {
        precip: with_missing(&raw.precip),
        demand,
    })
}

fn with_missing(values: &[Option<f64>]) -> Vec<f64> {
    values.iter().map(|v| v.unwrap_or(MISSING)).collect()
}
