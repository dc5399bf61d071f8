//! Station runs: validation, unit handling and the full index pipeline.

use palmer_calendar::{CalibrationWindow, SeriesLayout};
use palmer_pet::{ThornthwaiteSite, potential_evapotranspiration};
use palmer_stats::MISSING;
use palmer_water_balance::{ClimaticCoefficients, WaterBalanceRun, climatic_coefficients, simulate};
use tracing::{info, warn};

use crate::anomaly::{Departures, departures};
use crate::calibrate::{CalibrationRatios, self_calibrate};
use crate::cmi::crop_moisture_index;
use crate::config::{Method, PalmerConfig};
use crate::duration::{DurationFactors, Sign, estimate};
use crate::error::PalmerError;
use crate::result::{
    CalibrationParameters, PalmerResult, PeriodCoefficients, PeriodRecord, phdi_value, wplm_value,
};
use crate::spell::{SpellHistory, run_spells};
use crate::zindex::{original_scale, weighting_factors, z_index};

/// Computes the Palmer indices from precipitation and potential
/// evapotranspiration, both in the configured units.
///
/// Values beyond the configured years are ignored; a short final year is
/// padded with MISSING.
///
/// # Errors
///
/// - [`PalmerError::Calendar`] for invalid year ranges.
/// - [`PalmerError::LengthMismatch`] if `precip` and `pet` differ in length.
/// - [`PalmerError::InsufficientData`] if the series covers fewer years
///   than configured.
/// - [`PalmerError::InvalidCoefficient`] or
///   [`PalmerError::InvalidCalibrationPasses`] for invalid settings.
///
/// # Example
///
/// ```
/// use palmer_index::{PalmerConfig, compute_palmer};
///
/// let precip: Vec<f64> = (0..360).map(|i| 60.0 + 40.0 * ((i as f64) * 0.7).sin()).collect();
/// let pet: Vec<f64> = (0..360).map(|i| 55.0 + 30.0 * ((i as f64) * 0.52).cos()).collect();
/// let config = PalmerConfig::new(150.0, 1971, 2000);
///
/// let result = compute_palmer(&precip, &pet, &config).unwrap();
/// assert_eq!(result.pdsi().len(), 360);
/// ```
#[tracing::instrument(skip_all, fields(n_periods = precip.len(), method = ?config.method()))]
pub fn compute_palmer(
    precip: &[f64],
    pet: &[f64],
    config: &PalmerConfig,
) -> Result<PalmerResult, PalmerError> {
    config.validate()?;
    if precip.len() != pet.len() {
        return Err(PalmerError::LengthMismatch {
            precip: precip.len(),
            other: pet.len(),
            other_name: "pet",
        });
    }
    let layout = config.layout()?;
    check_coverage(precip.len(), &layout)?;

    let units = config.units();
    let precip = units.depths_to_inches(&fit_to_layout(precip, &layout));
    let pet = units.depths_to_inches(&fit_to_layout(pet, &layout));
    run(&precip, &pet, config, &layout)
}

/// Computes the Palmer indices from precipitation and temperature, deriving
/// potential evapotranspiration with the Thornthwaite method at `site`.
///
/// # Errors
///
/// As [`compute_palmer`], plus [`PalmerError::Pet`] if the site normals do
/// not match the configured frequency.
#[tracing::instrument(skip_all, fields(n_periods = precip.len(), method = ?config.method()))]
pub fn compute_palmer_from_temperature(
    precip: &[f64],
    temperature: &[f64],
    site: &ThornthwaiteSite,
    config: &PalmerConfig,
) -> Result<PalmerResult, PalmerError> {
    config.validate()?;
    if precip.len() != temperature.len() {
        return Err(PalmerError::LengthMismatch {
            precip: precip.len(),
            other: temperature.len(),
            other_name: "temperature",
        });
    }
    let layout = config.layout()?;
    check_coverage(precip.len(), &layout)?;

    let units = config.units();
    let precip = units.depths_to_inches(&fit_to_layout(precip, &layout));
    let temps_f = units.temperatures_to_fahrenheit(&fit_to_layout(temperature, &layout));
    let pet = potential_evapotranspiration(&temps_f, &layout, site)?;
    run(&precip, &pet, config, &layout)
}

/// Rejects inputs that cover fewer years than the layout, counting a
/// partial final year.
fn check_coverage(len: usize, layout: &SeriesLayout) -> Result<(), PalmerError> {
    let years = len.div_ceil(layout.periods_per_year());
    if years < layout.total_years() {
        return Err(PalmerError::InsufficientData {
            years,
            required: layout.total_years(),
        });
    }
    Ok(())
}

/// Truncates or MISSING-pads `values` to the layout's period count.
fn fit_to_layout(values: &[f64], layout: &SeriesLayout) -> Vec<f64> {
    let n = layout.n_periods();
    let mut out: Vec<f64> = values.iter().take(n).copied().collect();
    out.resize(n, MISSING);
    out
}

/// Runs the pipeline on inputs already in inches and fitted to `layout`.
fn run(
    precip: &[f64],
    pet: &[f64],
    config: &PalmerConfig,
    layout: &SeriesLayout,
) -> Result<PalmerResult, PalmerError> {
    let window = config.window(layout)?;
    let awc = config.units().depth_to_inches(config.awc());

    let balance = simulate(precip, pet, awc, layout, &window)?;
    let coefs = climatic_coefficients(balance.totals());
    let dep = departures(&balance, &coefs, layout, &window);
    let k = weighting_factors(balance.totals(), &dep.mean_abs(), config.coefficients());

    let (z, history, parameters, calibration) = match config.method() {
        Method::SelfCalibrating => {
            let mut z = z_index(dep.d(), &k, 1.0, layout);
            let fallback = config.coefficients().duration_factors();
            let wet = usable_or(
                estimate(&z, &window, layout.frequency(), Sign::Wet),
                fallback,
                Sign::Wet,
            );
            let dry = usable_or(
                estimate(&z, &window, layout.frequency(), Sign::Dry),
                fallback,
                Sign::Dry,
            );
            let cal = self_calibrate(&mut z, wet, dry, &window, config.calibration_passes());
            let parameters = CalibrationParameters::new(wet, dry, cal.k_wet(), cal.k_dry());
            let ratios = cal.passes().to_vec();
            (z, cal.into_history(), parameters, ratios)
        }
        Method::Original => {
            let scale = original_scale(&dep.mean_abs(), &k, config.coefficients().k2());
            let z = z_index(dep.d(), &k, scale, layout);
            let factors = config.duration_factors();
            let history = run_spells(&z, factors, factors);
            let parameters = CalibrationParameters::new(factors, factors, scale, scale);
            (z, history, parameters, Vec::<CalibrationRatios>::new())
        }
    };

    let records = period_records(layout, &balance, &dep, &z, &history);
    let coefficients = coefficient_table(&balance, &coefs, &dep, &k, &parameters, &window);

    let cmi = if config.crop_moisture() {
        let alpha: Vec<f64> = coefs.iter().map(|c| c.alpha).collect();
        Some(crop_moisture_index(precip, pet, balance.awc(), &alpha, layout)?)
    } else {
        None
    };

    info!(
        n_periods = records.len(),
        n_valid = balance.n_valid(),
        wet_m = parameters.wet_m,
        wet_b = parameters.wet_b,
        dry_m = parameters.dry_m,
        dry_b = parameters.dry_b,
        k_wet = parameters.k_wet,
        k_dry = parameters.k_dry,
        "palmer indices computed"
    );

    Ok(PalmerResult::new(
        layout,
        records,
        coefficients,
        parameters,
        calibration,
        cmi,
    ))
}

fn usable_or(factors: DurationFactors, fallback: DurationFactors, sign: Sign) -> DurationFactors {
    if factors.is_usable() {
        factors
    } else {
        warn!(
            sign = ?sign,
            m = factors.m(),
            b = factors.b(),
            "degenerate duration factors, using fixed factors"
        );
        fallback
    }
}

fn period_records(
    layout: &SeriesLayout,
    balance: &WaterBalanceRun,
    dep: &Departures,
    z: &[f64],
    history: &SpellHistory,
) -> Vec<PeriodRecord> {
    balance
        .records()
        .iter()
        .enumerate()
        .map(|(i, wb)| {
            let (p, pe, pr, pro, pl) = match wb {
                Some(wb) => (wb.p, wb.pe, wb.pr, wb.pro, wb.pl),
                None => (MISSING, MISSING, MISSING, MISSING, MISSING),
            };
            let (x, x1, x2, x3, prob) = (
                history.x()[i],
                history.x1()[i],
                history.x2()[i],
                history.x3()[i],
                history.prob()[i],
            );
            PeriodRecord {
                year: layout.year_of(i),
                period: layout.period_of(i),
                p,
                pe,
                pr,
                pro,
                pl,
                d: dep.d()[i],
                z: z[i],
                prob,
                x1,
                x2,
                x3,
                pdsi: x,
                phdi: phdi_value(x, x3),
                wplm: wplm_value(x1, x2, x3, prob),
            }
        })
        .collect()
}

fn coefficient_table(
    balance: &WaterBalanceRun,
    coefs: &[ClimaticCoefficients],
    dep: &Departures,
    k: &[f64],
    parameters: &CalibrationParameters,
    window: &CalibrationWindow,
) -> Vec<PeriodCoefficients> {
    let years = window.years() as f64;
    balance
        .totals()
        .as_slice()
        .iter()
        .zip(coefs)
        .zip(dep.stats())
        .zip(k)
        .enumerate()
        .map(|(per, (((t, c), s), &k))| PeriodCoefficients {
            period: per + 1,
            alpha: c.alpha,
            beta: c.beta,
            gamma: c.gamma,
            delta: c.delta,
            k,
            k_wet: k * parameters.k_wet,
            k_dry: k * parameters.k_dry,
            d_abs: s.mean_abs,
            sigma_d: s.sigma,
            dep: (t.et + t.r - t.pe + t.ro) / years,
            cafec: s.mean_cafec,
            p: t.p / years,
            s: t.pro / years,
            pr: t.pr / years,
            pe: t.pe / years,
            pl: t.pl / years,
            et: t.et / years,
            r: t.r / years,
            l: t.l / years,
            ro: t.ro / years,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use palmer_calendar::Frequency;

    #[test]
    fn coverage_counts_partial_year() {
        let layout = SeriesLayout::new(2000, 2002, Frequency::Monthly).unwrap();
        assert!(check_coverage(25, &layout).is_ok());
        assert_eq!(
            check_coverage(24, &layout),
            Err(PalmerError::InsufficientData {
                years: 2,
                required: 3
            })
        );
    }

    #[test]
    fn fit_pads_and_truncates() {
        let layout = SeriesLayout::new(2000, 2001, Frequency::Quarterly).unwrap();
        let padded = fit_to_layout(&[1.0, 2.0, 3.0, 4.0, 5.0], &layout);
        assert_eq!(padded, vec![1.0, 2.0, 3.0, 4.0, 5.0, MISSING, MISSING, MISSING]);
        let cut = fit_to_layout(&[1.0; 10], &layout);
        assert_eq!(cut.len(), 8);
    }

    #[test]
    fn degenerate_factors_fall_back() {
        let f = usable_or(
            DurationFactors::new(0.0, 0.0),
            DurationFactors::PALMER,
            Sign::Wet,
        );
        assert_eq!(f, DurationFactors::PALMER);
        let g = usable_or(DurationFactors::CPC_WEEKLY, DurationFactors::PALMER, Sign::Dry);
        assert_eq!(g, DurationFactors::CPC_WEEKLY);
    }
}
