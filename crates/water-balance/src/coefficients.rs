//! Climatic coefficients: how the calibration climate converts potential
//! quantities into actual ones.

use crate::accumulate::{PeriodAccumulators, PeriodTotals};

/// Coefficients of evapotranspiration (alpha), recharge (beta), runoff
/// (gamma) and loss (delta) for one period of the year.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimaticCoefficients {
    /// ET / PE.
    pub alpha: f64,
    /// R / PR.
    pub beta: f64,
    /// RO / PRO.
    pub gamma: f64,
    /// L / PL.
    pub delta: f64,
}

impl ClimaticCoefficients {
    /// Derives the coefficients from calibration totals.
    ///
    /// A zero potential sum gives 1 when the actual sum is also zero and 0
    /// otherwise; delta is 0 whenever the potential-loss sum is zero.
    pub fn from_totals(t: &PeriodTotals) -> Self {
        Self {
            alpha: ratio_or_default(t.et, t.pe),
            beta: ratio_or_default(t.r, t.pr),
            gamma: ratio_or_default(t.ro, t.pro),
            delta: if t.pl != 0.0 { t.l / t.pl } else { 0.0 },
        }
    }
}

/// Coefficients for every period of the year.
pub fn climatic_coefficients(acc: &PeriodAccumulators) -> Vec<ClimaticCoefficients> {
    acc.as_slice()
        .iter()
        .map(ClimaticCoefficients::from_totals)
        .collect()
}

fn ratio_or_default(actual: f64, potential: f64) -> f64 {
    if potential != 0.0 {
        actual / potential
    } else if actual == 0.0 {
        1.0
    } else {
        0.0
    }
}
