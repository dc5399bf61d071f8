//! Moisture departures from climatically appropriate (CAFEC) precipitation.

use palmer_calendar::{CalibrationWindow, SeriesLayout};
use palmer_stats::MISSING;
use palmer_water_balance::{ClimaticCoefficients, WaterBalance, WaterBalanceRun};
use tracing::debug;

/// Precipitation the calibration climate would need for the period's
/// potentials: `α·PE + β·PR + γ·PRO − δ·PL`.
#[inline]
pub fn cafec_precipitation(coef: &ClimaticCoefficients, wb: &WaterBalance) -> f64 {
    coef.alpha * wb.pe + coef.beta * wb.pr + coef.gamma * wb.pro - coef.delta * wb.pl
}

/// Calibration statistics of the departures of one period of the year.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DepartureStats {
    /// Mean absolute departure `D`.
    pub mean_abs: f64,
    /// Mean departure.
    pub mean: f64,
    /// Standard deviation of the departures about zero.
    pub sigma: f64,
    /// Mean CAFEC precipitation.
    pub mean_cafec: f64,
}

/// Departures `d = P − P̂` for a whole series.
#[derive(Debug, Clone, PartialEq)]
pub struct Departures {
    d: Vec<f64>,
    stats: Vec<DepartureStats>,
}

impl Departures {
    /// Departure per series period; MISSING for invalid periods.
    pub fn d(&self) -> &[f64] {
        &self.d
    }

    /// Calibration statistics per period of the year.
    pub fn stats(&self) -> &[DepartureStats] {
        &self.stats
    }

    /// Mean absolute departure `D` per period of the year.
    pub fn mean_abs(&self) -> Vec<f64> {
        self.stats.iter().map(|s| s.mean_abs).collect()
    }
}

/// Computes the departure of every period and the per-period-of-year
/// calibration statistics.
///
/// Sums run over valid periods inside `window` and are divided by the
/// number of calibration years, not the number of valid periods.
pub fn departures(
    run: &WaterBalanceRun,
    coefs: &[ClimaticCoefficients],
    layout: &SeriesLayout,
    window: &CalibrationWindow,
) -> Departures {
    let ppy = layout.periods_per_year();
    let mut sum_abs = vec![0.0; ppy];
    let mut sum = vec![0.0; ppy];
    let mut sum_sq = vec![0.0; ppy];
    let mut sum_cafec = vec![0.0; ppy];

    let d: Vec<f64> = run
        .records()
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let Some(wb) = record else {
                return MISSING;
            };
            let per = layout.period_index(i);
            let cafec = cafec_precipitation(&coefs[per], wb);
            let d = wb.p - cafec;
            if window.contains_index(i) {
                sum_abs[per] += d.abs();
                sum[per] += d;
                sum_sq[per] += d * d;
                sum_cafec[per] += cafec;
            }
            d
        })
        .collect();

    let years = window.years() as f64;
    let stats = (0..ppy)
        .map(|per| DepartureStats {
            mean_abs: sum_abs[per] / years,
            mean: sum[per] / years,
            sigma: if years > 1.0 {
                (sum_sq[per] / (years - 1.0)).sqrt()
            } else {
                0.0
            },
            mean_cafec: sum_cafec[per] / years,
        })
        .collect();

    debug!(n_periods = d.len(), "departures computed");
    Departures { d, stats }
}
