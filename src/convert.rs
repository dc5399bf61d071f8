//! Pure conversion functions: TOML config structs -> crate API config types.

use anyhow::{Context, Result, bail};
use tracing::warn;

use palmer_index::{
    CoefficientSet, DurationFactors, Frequency, Method, PalmerConfig, ThornthwaiteSite, Units,
};

use crate::config::{CoefficientsToml, StationToml, ThornthwaiteToml};

/// Parses a frequency name into the corresponding enum variant.
pub fn parse_frequency(s: &str) -> Result<Frequency> {
    match s.to_lowercase().as_str() {
        "monthly" => Ok(Frequency::Monthly),
        "weekly" => Ok(Frequency::Weekly),
        "biweekly" => Ok(Frequency::Biweekly),
        "four-weekly" | "fourweekly" => Ok(Frequency::FourWeekly),
        "quarterly" => Ok(Frequency::Quarterly),
        other => bail!("unknown frequency: {other:?}"),
    }
}

/// Parses a unit system name into the corresponding enum variant.
pub fn parse_units(s: &str) -> Result<Units> {
    match s.to_lowercase().as_str() {
        "metric" => Ok(Units::Metric),
        "imperial" => Ok(Units::Imperial),
        other => bail!("unknown units: {other:?}"),
    }
}

/// Parses a method name into the corresponding enum variant.
pub fn parse_method(s: &str) -> Result<Method> {
    match s.to_lowercase().as_str() {
        "self-calibrating" | "sc" => Ok(Method::SelfCalibrating),
        "original" => Ok(Method::Original),
        other => bail!("unknown method: {other:?}"),
    }
}

/// Clamps a requested calibration interval to the series years.
///
/// The core engine rejects intervals outside the series; the command line
/// accepts them and narrows them instead.
pub fn clamp_calibration(
    name: &str,
    requested: [i32; 2],
    start_year: i32,
    end_year: i32,
) -> (i32, i32) {
    let [cal_start, cal_end] = requested;
    let clamped = (cal_start.max(start_year), cal_end.min(end_year));
    if clamped != (cal_start, cal_end) {
        warn!(
            station = name,
            requested_start = cal_start,
            requested_end = cal_end,
            start = clamped.0,
            end = clamped.1,
            "calibration interval clamped to the series"
        );
    }
    clamped
}

/// Applies coefficient overrides on top of Palmer's published constants.
pub fn build_coefficients(c: &CoefficientsToml) -> CoefficientSet {
    let mut set = CoefficientSet::new();
    if let Some(v) = c.k1_1 {
        set = set.with_k1_1(v);
    }
    if let Some(v) = c.k1_2 {
        set = set.with_k1_2(v);
    }
    if let Some(v) = c.k1_3 {
        set = set.with_k1_3(v);
    }
    if let Some(v) = c.k2 {
        set = set.with_k2(v);
    }
    let p = c.p.unwrap_or(set.p());
    let q = c.q.unwrap_or(set.q());
    set.with_pq(p, q)
}

/// Builds a validated [`PalmerConfig`] from a station table.
pub fn build_palmer_config(station: &StationToml) -> Result<PalmerConfig> {
    let frequency = parse_frequency(&station.frequency)?;
    let units = parse_units(&station.units)?;
    let method = parse_method(&station.method)?;

    let mut cfg = PalmerConfig::new(station.awc, station.start_year, station.end_year)
        .with_frequency(frequency)
        .with_units(units)
        .with_method(method)
        .with_calibration_passes(station.calibration_passes)
        .with_coefficients(build_coefficients(&station.coefficients))
        .with_crop_moisture(station.crop_moisture);
    if let Some(requested) = station.calibration {
        let (start, end) =
            clamp_calibration(&station.name, requested, station.start_year, station.end_year);
        cfg = cfg.with_calibration(start, end);
    }
    if let Some([m, b]) = station.duration_factors {
        cfg = cfg.with_duration_factors(DurationFactors::new(m, b));
    }
    cfg.validate()
        .with_context(|| format!("invalid configuration for station {:?}", station.name))?;
    Ok(cfg)
}

/// Builds a [`ThornthwaiteSite`] from the station's site table.
pub fn build_site(site: &ThornthwaiteToml, units: Units) -> Result<ThornthwaiteSite> {
    ThornthwaiteSite::new(site.latitude, &site.normals, units)
        .context("invalid thornthwaite site")
}
