//! Run command: compute the drought indices for every configured station.

use anyhow::{Context, Result, bail};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, info_span};

use palmer_index::{
    PalmerConfig, PalmerResult, ThornthwaiteSite, compute_palmer, compute_palmer_from_temperature,
};

use crate::cli::RunArgs;
use crate::config::{PalmerToml, StationToml};
use crate::convert;
use crate::input::{Demand, StationInput, read_station_input};

/// A station with its engine config, input series and optional site.
pub struct PreparedStation {
    pub config: PalmerConfig,
    pub input: StationInput,
    pub site: Option<ThornthwaiteSite>,
}

/// Converts a station table and reads its input.
///
/// Temperature inputs require a `[station.thornthwaite]` table.
pub fn prepare(station: &StationToml) -> Result<PreparedStation> {
    let config = convert::build_palmer_config(station)?;
    let input = read_station_input(&station.input)?;
    let site = match (&input.demand, &station.thornthwaite) {
        (Demand::Temperature(_), None) => bail!(
            "station {:?} has temperature input but no [station.thornthwaite] table",
            station.name
        ),
        (Demand::Temperature(_), Some(site)) => {
            Some(convert::build_site(site, config.units())?)
        }
        (Demand::Pet(_), _) => None,
    };
    Ok(PreparedStation {
        config,
        input,
        site,
    })
}

#[derive(Serialize)]
struct StationOutput<'a> {
    name: &'a str,
    #[serde(flatten)]
    result: PalmerResult,
}

#[derive(Serialize)]
struct RunOutput<'a> {
    stations: Vec<StationOutput<'a>>,
}

fn run_station(station: &StationToml) -> Result<PalmerResult> {
    let _span = info_span!("station", name = %station.name).entered();
    let prepared = prepare(station)?;
    let precip = &prepared.input.precip;
    let result = match (&prepared.input.demand, &prepared.site) {
        (Demand::Pet(pet), _) => compute_palmer(precip, pet, &prepared.config),
        (Demand::Temperature(t), Some(site)) => {
            compute_palmer_from_temperature(precip, t, site, &prepared.config)
        }
        (Demand::Temperature(_), None) => bail!("missing thornthwaite site"),
    }
    .with_context(|| format!("station {:?} failed", station.name))?;
    info!(n_periods = result.len(), "station complete");
    Ok(result)
}

/// Serializes every station's result as one pretty JSON document.
fn compute_all(config: &PalmerToml) -> Result<String> {
    if config.stations.is_empty() {
        bail!("no [[station]] tables in config");
    }
    let results: Vec<PalmerResult> = config
        .stations
        .par_iter()
        .map(run_station)
        .collect::<Result<_>>()?;
    let output = RunOutput {
        stations: config
            .stations
            .iter()
            .zip(results)
            .map(|(s, result)| StationOutput {
                name: &s.name,
                result,
            })
            .collect(),
    };
    serde_json::to_string_pretty(&output).context("failed to serialize results")
}

/// Run the full index pipeline.
pub fn run(args: RunArgs) -> Result<()> {
    let _cmd = info_span!("run").entered();
    let config = PalmerToml::load(&args.config)?;
    info!(n_stations = config.stations.len(), "config loaded");

    let json = compute_all(&config)?;

    match args.output.or(config.output) {
        Some(path) => {
            std::fs::write(&path, &json)
                .with_context(|| format!("failed to write output: {}", path.display()))?;
            info!(path = %path.display(), "results written");
        }
        None => println!("{json}"),
    }
    Ok(())
}
