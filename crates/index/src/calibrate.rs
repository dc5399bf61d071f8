//! Self-calibration: rescale the Z-index so the calibration-interval
//! extremes of the index reach about ±4, then re-run the spell machine.

use palmer_calendar::CalibrationWindow;
use palmer_stats::{HistoryList, is_missing};
use serde::Serialize;
use tracing::{debug, warn};

use crate::duration::DurationFactors;
use crate::spell::{SpellHistory, run_spells};

/// Index value the calibration extremes are scaled to.
const CALIBRATION_RANGE: f64 = 4.0;

/// Multipliers applied to positive (`wet`) and negative (`dry`) Z values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CalibrationRatios {
    /// `4 / P98` of the calibration-interval index.
    pub wet: f64,
    /// `-4 / P2` of the calibration-interval index.
    pub dry: f64,
}

impl CalibrationRatios {
    /// Ratios that leave the Z-index unchanged.
    pub const IDENTITY: Self = Self { wet: 1.0, dry: 1.0 };
}

/// Derives the calibration ratios from the index `x`, restricted to the
/// calibration interval.
///
/// A percentile that is absent or on the wrong side of zero leaves its
/// ratio at 1.
pub fn calibration_ratios(x: &[f64], window: &CalibrationWindow) -> CalibrationRatios {
    let mut list = HistoryList::from(x.to_vec());
    list.truncate_front(window.start_skip_periods());
    list.truncate_back(window.end_skip_periods());
    if list.len() != window.calibration_periods() {
        warn!(
            expected = window.calibration_periods(),
            got = list.len(),
            "index series does not cover the calibration interval"
        );
    }

    let dry = match list.percentile(0.02) {
        Some(p02) if p02 < 0.0 => -CALIBRATION_RANGE / p02,
        other => {
            warn!(p02 = ?other, "no dry extreme in calibration interval, dry ratio kept at 1");
            1.0
        }
    };
    let wet = match list.percentile(0.98) {
        Some(p98) if p98 > 0.0 => CALIBRATION_RANGE / p98,
        other => {
            warn!(p98 = ?other, "no wet extreme in calibration interval, wet ratio kept at 1");
            1.0
        }
    };
    CalibrationRatios { wet, dry }
}

/// Multiplies non-negative Z values by the wet ratio and negative ones by
/// the dry ratio. MISSING values are left alone.
pub fn rescale(z: &mut [f64], ratios: CalibrationRatios) {
    for v in z.iter_mut().filter(|v| !is_missing(**v)) {
        *v *= if *v >= 0.0 { ratios.wet } else { ratios.dry };
    }
}

/// Outcome of [`self_calibrate`].
#[derive(Debug, Clone, PartialEq)]
pub struct Calibration {
    history: SpellHistory,
    k_wet: f64,
    k_dry: f64,
    passes: Vec<CalibrationRatios>,
}

impl Calibration {
    /// Spell outputs of the final pass.
    pub fn history(&self) -> &SpellHistory {
        &self.history
    }

    /// Consumes the outcome, returning the final spell outputs.
    pub fn into_history(self) -> SpellHistory {
        self.history
    }

    /// Product of all wet ratios.
    pub fn k_wet(&self) -> f64 {
        self.k_wet
    }

    /// Product of all dry ratios.
    pub fn k_dry(&self) -> f64 {
        self.k_dry
    }

    /// Ratios applied by each pass, in order.
    pub fn passes(&self) -> &[CalibrationRatios] {
        &self.passes
    }
}

/// Runs the spell machine over `z`, then `passes` times derives ratios
/// from the index, rescales `z` in place and re-runs.
///
/// The duration factors are not re-estimated between passes.
#[tracing::instrument(skip(z, wet, dry, window))]
pub fn self_calibrate(
    z: &mut [f64],
    wet: DurationFactors,
    dry: DurationFactors,
    window: &CalibrationWindow,
    passes: usize,
) -> Calibration {
    let mut history = run_spells(z, wet, dry);
    let mut k_wet = 1.0;
    let mut k_dry = 1.0;
    let mut applied = Vec::with_capacity(passes);

    for pass in 0..passes {
        let ratios = calibration_ratios(history.x(), window);
        k_wet *= ratios.wet;
        k_dry *= ratios.dry;
        rescale(z, ratios);
        history = run_spells(z, wet, dry);
        debug!(pass, wet = ratios.wet, dry = ratios.dry, "calibration pass");
        applied.push(ratios);
    }

    Calibration {
        history,
        k_wet,
        k_dry,
        passes: applied,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use palmer_calendar::{Frequency, SeriesLayout};
    use palmer_stats::MISSING;

    fn full_window(years: i32) -> CalibrationWindow {
        let layout = SeriesLayout::new(2000, 2000 + years - 1, Frequency::Monthly).unwrap();
        CalibrationWindow::full(&layout)
    }

    #[test]
    fn ratios_from_percentiles() {
        // 100 values from -2.5 to 2.45: P2 = -2.45, P98 = 2.35.
        let x: Vec<f64> = (-50..50).map(|v| v as f64 * 0.05).collect();
        let layout = SeriesLayout::new(2000, 2024, Frequency::Quarterly).unwrap();
        let r = calibration_ratios(&x, &CalibrationWindow::full(&layout));
        assert_relative_eq!(r.dry, 4.0 / 2.45, max_relative = 1e-12);
        assert_relative_eq!(r.wet, 4.0 / 2.35, max_relative = 1e-12);
    }

    #[test]
    fn ratios_use_calibration_interval_only() {
        let layout = SeriesLayout::new(2000, 2002, Frequency::Quarterly).unwrap();
        let window = CalibrationWindow::new(&layout, 2001, 2002).unwrap();
        let mut x = vec![0.0; 12];
        x[0] = -100.0;
        x[1] = 100.0;
        for (i, v) in x[4..].iter_mut().enumerate() {
            *v = i as f64 - 3.5;
        }
        // Eight calibration values are too few for a 2nd percentile.
        let r = calibration_ratios(&x, &window);
        assert_eq!(r.dry, 1.0);
        assert_relative_eq!(r.wet, 4.0 / 2.5, max_relative = 1e-12);
    }

    #[test]
    fn degenerate_index_keeps_identity() {
        let r = calibration_ratios(&[0.0; 120], &full_window(10));
        assert_eq!(r, CalibrationRatios::IDENTITY);
    }

    #[test]
    fn rescale_by_sign() {
        let mut z = vec![2.0, -2.0, 0.0, MISSING];
        rescale(&mut z, CalibrationRatios { wet: 0.5, dry: 3.0 });
        assert_eq!(z, vec![1.0, -6.0, 0.0, MISSING]);
    }

    #[test]
    fn zero_passes_is_a_single_run() {
        let mut z = vec![1.0, -2.0, 0.5, 3.0];
        let before = z.clone();
        let cal = self_calibrate(
            &mut z,
            DurationFactors::PALMER,
            DurationFactors::PALMER,
            &full_window(2),
            0,
        );
        assert_eq!(z, before);
        assert_eq!(cal.k_wet(), 1.0);
        assert_eq!(cal.k_dry(), 1.0);
        assert!(cal.passes().is_empty());
        assert_eq!(cal.history().len(), 4);
    }

    #[test]
    fn accumulated_scale_is_product_of_passes() {
        let mut z: Vec<f64> = (0..240)
            .map(|i| 3.0 * ((i as f64) * 0.37).sin() + if i % 50 < 12 { -2.0 } else { 0.4 })
            .collect();
        let cal = self_calibrate(
            &mut z,
            DurationFactors::PALMER,
            DurationFactors::PALMER,
            &full_window(20),
            3,
        );
        assert_eq!(cal.passes().len(), 3);
        let wet: f64 = cal.passes().iter().map(|r| r.wet).product();
        let dry: f64 = cal.passes().iter().map(|r| r.dry).product();
        assert_relative_eq!(cal.k_wet(), wet, max_relative = 1e-12);
        assert_relative_eq!(cal.k_dry(), dry, max_relative = 1e-12);
    }
}
