use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level Palmer configuration: one or more independent stations.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PalmerToml {
    /// Output JSON path. Relative paths resolve against the config file.
    #[serde(default)]
    pub output: Option<PathBuf>,

    /// Stations to compute, in output order.
    #[serde(rename = "station", default)]
    pub stations: Vec<StationToml>,
}

/// One station run.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StationToml {
    /// Station identifier carried into the output.
    pub name: String,
    /// JSON input with `precip` and either `pet` or `temperature`.
    pub input: PathBuf,
    /// Available water capacity, in the station's units.
    pub awc: f64,
    /// First year of the series.
    pub start_year: i32,
    /// Last year of the series.
    pub end_year: i32,
    /// Calibration interval `[start, end]`; the whole series when omitted.
    #[serde(default)]
    pub calibration: Option<[i32; 2]>,
    #[serde(default = "default_frequency")]
    pub frequency: String,
    #[serde(default = "default_units")]
    pub units: String,
    #[serde(default = "default_method")]
    pub method: String,
    #[serde(default = "default_calibration_passes")]
    pub calibration_passes: usize,
    #[serde(default)]
    pub crop_moisture: bool,
    /// Fixed duration factors `[m, b]` for the original method.
    #[serde(default)]
    pub duration_factors: Option<[f64; 2]>,
    #[serde(default)]
    pub coefficients: CoefficientsToml,
    /// Required when the input carries temperature instead of PE.
    #[serde(default)]
    pub thornthwaite: Option<ThornthwaiteToml>,
}

fn default_frequency() -> String {
    "monthly".to_string()
}
fn default_units() -> String {
    "metric".to_string()
}
fn default_method() -> String {
    "self-calibrating".to_string()
}
fn default_calibration_passes() -> usize {
    3
}

/// Overrides of the empirical Palmer coefficients. Unset fields keep the
/// published values.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoefficientsToml {
    pub k1_1: Option<f64>,
    pub k1_2: Option<f64>,
    pub k1_3: Option<f64>,
    pub k2: Option<f64>,
    pub p: Option<f64>,
    pub q: Option<f64>,
}

/// Thornthwaite site description.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThornthwaiteToml {
    /// Latitude in decimal degrees, negative in the southern hemisphere.
    pub latitude: f64,
    /// Long-term mean temperature for each period of the year.
    pub normals: Vec<f64>,
}

impl PalmerToml {
    /// Reads and parses a config file, resolving station input and output
    /// paths against the file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let toml_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let mut config: Self = toml::from_str(&toml_str).context("failed to parse TOML config")?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    fn resolve_paths(&mut self, base: &Path) {
        if let Some(out) = self.output.as_mut()
            && out.is_relative()
        {
            *out = base.join(&*out);
        }
        for station in &mut self.stations {
            if station.input.is_relative() {
                station.input = base.join(&station.input);
            }
        }
    }
}
