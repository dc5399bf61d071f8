//! Climatic weighting factor `k` and the Z-index.

use palmer_calendar::SeriesLayout;
use palmer_stats::{MISSING, is_missing};
use palmer_water_balance::PeriodAccumulators;
use tracing::warn;

use crate::config::CoefficientSet;

/// Climatic characteristic `T = (PE + R + RO) / (P + L)` of each period of
/// the year, 0 when `P + L` is zero.
pub fn climatic_characteristic(totals: &PeriodAccumulators) -> Vec<f64> {
    totals
        .as_slice()
        .iter()
        .map(|t| {
            let supply = t.p + t.l;
            if supply == 0.0 {
                0.0
            } else {
                (t.pe + t.r + t.ro) / supply
            }
        })
        .collect()
}

/// Weighting factor `k = K1_1·log10((T + K1_2) / D) + K1_3` per period of
/// the year, where `D` is the mean absolute departure. A zero `D` gives
/// `K1_3`.
pub fn weighting_factors(
    totals: &PeriodAccumulators,
    mean_abs_departure: &[f64],
    coefs: &CoefficientSet,
) -> Vec<f64> {
    climatic_characteristic(totals)
        .into_iter()
        .zip(mean_abs_departure)
        .map(|(t, &d)| {
            if d == 0.0 {
                coefs.k1_3()
            } else {
                coefs.k1_1() * ((t + coefs.k1_2()) / d).log10() + coefs.k1_3()
            }
        })
        .collect()
}

/// Global scale `K2 / Σ(D·k)` of the original method.
///
/// Falls back to 1 when the sum is zero or not finite.
pub fn original_scale(mean_abs_departure: &[f64], k: &[f64], k2: f64) -> f64 {
    let dk_sum: f64 = mean_abs_departure.iter().zip(k).map(|(d, k)| d * k).sum();
    if dk_sum == 0.0 || !dk_sum.is_finite() {
        warn!(dk_sum, "degenerate departure-weight sum, using unit scale");
        return 1.0;
    }
    k2 / dk_sum
}

/// Z-index `z = d · scale · k[period]`; MISSING departures stay MISSING.
pub fn z_index(d: &[f64], k: &[f64], scale: f64, layout: &SeriesLayout) -> Vec<f64> {
    d.iter()
        .enumerate()
        .map(|(i, &d)| {
            if is_missing(d) {
                MISSING
            } else {
                d * scale * k[layout.period_index(i)]
            }
        })
        .collect()
}
