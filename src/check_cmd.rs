//! Check command: validate the config and station inputs without computing.

use anyhow::{Result, bail};
use tracing::{info, info_span};

use crate::cli::CheckArgs;
use crate::config::{PalmerToml, StationToml};
use crate::input::Demand;
use crate::run_cmd::prepare;

/// Checks one station: config conversion, input parsing, series lengths and
/// year coverage.
fn check_station(station: &StationToml) -> Result<()> {
    let prepared = prepare(station)?;
    let n_precip = prepared.input.precip.len();
    let (other_name, n_other) = match &prepared.input.demand {
        Demand::Pet(pet) => ("pet", pet.len()),
        Demand::Temperature(t) => ("temperature", t.len()),
    };
    if n_precip != n_other {
        bail!(
            "station {:?}: precip has {n_precip} values but {other_name} has {n_other}",
            station.name
        );
    }

    let layout = prepared.config.layout()?;
    let years = n_precip.div_ceil(layout.periods_per_year());
    if years < layout.total_years() {
        bail!(
            "station {:?}: input covers {years} years, configuration requires {}",
            station.name,
            layout.total_years()
        );
    }
    let expected_normals = if prepared.config.frequency().is_weekly() { 52 } else { 12 };
    if let Some(site) = &prepared.site
        && site.normals_per_year() != expected_normals
    {
        bail!(
            "station {:?}: {} series need {expected_normals} thornthwaite normals, got {}",
            station.name,
            prepared.config.frequency(),
            site.normals_per_year()
        );
    }
    info!(station = %station.name, n_periods = n_precip, "station ok");
    Ok(())
}

fn check_all(config: &PalmerToml) -> Result<()> {
    if config.stations.is_empty() {
        bail!("no [[station]] tables in config");
    }
    for station in &config.stations {
        check_station(station)?;
    }
    Ok(())
}

/// Validate every station in the config.
pub fn run(args: CheckArgs) -> Result<()> {
    let _cmd = info_span!("check").entered();
    let config = PalmerToml::load(&args.config)?;
    check_all(&config)?;
    eprintln!("{}: {} station(s) ok", args.config.display(), config.stations.len());
    Ok(())
}
