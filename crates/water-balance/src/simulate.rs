//! Full-series water-balance pass.

use palmer_calendar::{CalibrationWindow, SeriesLayout};
use palmer_stats::is_missing;
use tracing::debug;

use crate::accumulate::PeriodAccumulators;
use crate::error::WaterBalanceError;
use crate::soil::{SoilMoisture, WaterBalance};

/// Result of a water-balance pass over a whole series.
#[derive(Debug, Clone)]
pub struct WaterBalanceRun {
    records: Vec<Option<WaterBalance>>,
    totals: PeriodAccumulators,
    awc: f64,
}

impl WaterBalanceRun {
    /// Per-period balances; `None` marks an invalid period.
    pub fn records(&self) -> &[Option<WaterBalance>] {
        &self.records
    }

    /// Calibration-interval totals per period of the year.
    pub fn totals(&self) -> &PeriodAccumulators {
        &self.totals
    }

    /// Effective available water capacity in inches.
    pub fn awc(&self) -> f64 {
        self.awc
    }

    /// Number of valid periods.
    pub fn n_valid(&self) -> usize {
        self.records.iter().flatten().count()
    }
}

/// Returns `true` if a period with precipitation `p` and potential
/// evapotranspiration `pe` takes part in the water balance.
#[inline]
pub fn is_valid_period(p: f64, pe: f64) -> bool {
    p >= 0.0 && !is_missing(pe)
}

/// Runs the soil model over `precip` and `pet` (inches) starting from a
/// saturated column of `awc` inches.
///
/// Invalid periods (negative or MISSING precipitation, MISSING PE) leave the
/// soil untouched and are recorded as `None`. Only valid periods inside
/// `window` contribute to the totals.
///
/// # Errors
///
/// - [`WaterBalanceError::LengthMismatch`] if the series lengths differ.
/// - [`WaterBalanceError::PeriodCountMismatch`] if they do not match `layout`.
/// - [`WaterBalanceError::InvalidAwc`] if `awc` is not positive.
pub fn simulate(
    precip: &[f64],
    pet: &[f64],
    awc: f64,
    layout: &SeriesLayout,
    window: &CalibrationWindow,
) -> Result<WaterBalanceRun, WaterBalanceError> {
    if precip.len() != pet.len() {
        return Err(WaterBalanceError::LengthMismatch {
            precip: precip.len(),
            pet: pet.len(),
        });
    }
    if precip.len() != layout.n_periods() {
        return Err(WaterBalanceError::PeriodCountMismatch {
            expected: layout.n_periods(),
            got: precip.len(),
        });
    }

    let mut soil = SoilMoisture::new(awc)?;
    let mut totals = PeriodAccumulators::new(layout.periods_per_year());
    let mut records = Vec::with_capacity(precip.len());

    for (i, (&p, &pe)) in precip.iter().zip(pet).enumerate() {
        if !is_valid_period(p, pe) {
            records.push(None);
            continue;
        }
        let wb = soil.step(p, pe);
        if window.contains_index(i) {
            totals.add(layout.period_index(i), &wb);
        }
        records.push(Some(wb));
    }

    let run = WaterBalanceRun {
        records,
        totals,
        awc: soil.awc(),
    };
    debug!(
        n_periods = precip.len(),
        n_valid = run.n_valid(),
        awc = run.awc,
        "water balance complete"
    );
    Ok(run)
}

#[cfg(test)]
mod tests {
    use super::*;
    use palmer_calendar::Frequency;
    use palmer_stats::MISSING;

    fn layout() -> SeriesLayout {
        SeriesLayout::new(2000, 2001, Frequency::Monthly).unwrap()
    }

    #[test]
    fn invalid_periods_recorded_as_none() {
        let layout = layout();
        let window = CalibrationWindow::full(&layout);
        let mut precip = vec![2.0; 24];
        let mut pet = vec![1.5; 24];
        precip[3] = MISSING;
        pet[7] = MISSING;
        precip[9] = -0.1;
        let run = simulate(&precip, &pet, 5.0, &layout, &window).unwrap();
        assert!(run.records()[3].is_none());
        assert!(run.records()[7].is_none());
        assert!(run.records()[9].is_none());
        assert_eq!(run.n_valid(), 21);
    }

    #[test]
    fn only_calibration_years_accumulate() {
        let layout = SeriesLayout::new(2000, 2003, Frequency::Monthly).unwrap();
        let window = CalibrationWindow::new(&layout, 2001, 2002).unwrap();
        let run = simulate(&[1.0; 48], &[1.0; 48], 5.0, &layout, &window).unwrap();
        for t in run.totals().as_slice() {
            assert_eq!(t.count, 2);
        }
    }

    #[test]
    fn length_mismatch_rejected() {
        let layout = layout();
        let window = CalibrationWindow::full(&layout);
        assert_eq!(
            simulate(&[1.0; 24], &[1.0; 23], 5.0, &layout, &window).unwrap_err(),
            WaterBalanceError::LengthMismatch {
                precip: 24,
                pet: 23
            }
        );
        assert_eq!(
            simulate(&[1.0; 12], &[1.0; 12], 5.0, &layout, &window).unwrap_err(),
            WaterBalanceError::PeriodCountMismatch {
                expected: 24,
                got: 12
            }
        );
    }
}
