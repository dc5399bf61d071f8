//! Engine outputs.

use palmer_calendar::SeriesLayout;
use palmer_stats::{MISSING, is_missing};
use serde::Serialize;

use crate::TOLERANCE;
use crate::calibrate::CalibrationRatios;
use crate::duration::DurationFactors;

/// Palmer Hydrological Drought Index: the established spell index, or the
/// PDSI when no spell is established.
pub fn phdi_value(x: f64, x3: f64) -> f64 {
    if is_missing(x3) {
        MISSING
    } else if x3 != 0.0 {
        x3
    } else {
        x
    }
}

/// Weighted Palmer index.
///
/// Without an established spell it is X1, or X2 when X2 is the stronger
/// track. With a spell that may be ending (`0 < prob < 100` percent) it
/// blends X3 with the opposite incipient track by the end probability.
/// Otherwise it is X3.
pub fn wplm_value(x1: f64, x2: f64, x3: f64, prob: f64) -> f64 {
    if [x1, x2, x3, prob].into_iter().any(is_missing) {
        return MISSING;
    }
    let p = prob / 100.0;
    if x3 == 0.0 {
        if -x2 > x1 + TOLERANCE { x2 } else { x1 }
    } else if p > TOLERANCE / 100.0 && p < 1.0 - TOLERANCE / 100.0 {
        let opposite = if x3 < 0.0 { x1 } else { x2 };
        (1.0 - p) * x3 + p * opposite
    } else {
        x3
    }
}

/// All quantities of one series period.
///
/// Water-balance terms are in inches; MISSING marks invalid periods.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PeriodRecord {
    /// Calendar year.
    pub year: i32,
    /// 1-based period of the year.
    pub period: usize,
    /// Precipitation.
    pub p: f64,
    /// Potential evapotranspiration.
    pub pe: f64,
    /// Potential recharge.
    pub pr: f64,
    /// Potential runoff.
    pub pro: f64,
    /// Potential loss.
    pub pl: f64,
    /// Departure from CAFEC precipitation.
    pub d: f64,
    /// Z-index (final scale).
    pub z: f64,
    /// Probability in percent that the established spell has ended.
    pub prob: f64,
    /// Incipient wet index.
    pub x1: f64,
    /// Incipient dry index.
    pub x2: f64,
    /// Established spell index.
    pub x3: f64,
    /// Palmer Drought Severity Index.
    pub pdsi: f64,
    /// Palmer Hydrological Drought Index.
    pub phdi: f64,
    /// Weighted Palmer index.
    pub wplm: f64,
}

/// Coefficients and calibration means of one period of the year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PeriodCoefficients {
    /// 1-based period of the year.
    pub period: usize,
    /// Evapotranspiration coefficient.
    pub alpha: f64,
    /// Recharge coefficient.
    pub beta: f64,
    /// Runoff coefficient.
    pub gamma: f64,
    /// Loss coefficient.
    pub delta: f64,
    /// Climatic weighting factor.
    pub k: f64,
    /// Effective weighting factor for positive departures.
    pub k_wet: f64,
    /// Effective weighting factor for negative departures.
    pub k_dry: f64,
    /// Mean absolute departure `D`.
    pub d_abs: f64,
    /// Standard deviation of the departures.
    pub sigma_d: f64,
    /// Mean of `ET + R − PE + RO`.
    pub dep: f64,
    /// Mean CAFEC precipitation.
    pub cafec: f64,
    /// Mean precipitation.
    pub p: f64,
    /// Mean stored moisture at the start of the period (potential runoff).
    pub s: f64,
    /// Mean potential recharge.
    pub pr: f64,
    /// Mean potential evapotranspiration.
    pub pe: f64,
    /// Mean potential loss.
    pub pl: f64,
    /// Mean actual evapotranspiration.
    pub et: f64,
    /// Mean actual recharge.
    pub r: f64,
    /// Mean actual loss.
    pub l: f64,
    /// Mean actual runoff.
    pub ro: f64,
}

/// Duration factors and weighting constants of a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CalibrationParameters {
    /// Wet slope.
    pub wet_m: f64,
    /// Dry slope.
    pub dry_m: f64,
    /// Wet intercept.
    pub wet_b: f64,
    /// Dry intercept.
    pub dry_b: f64,
    /// Wet persistence `1 − m/(m+b)`.
    pub wet_p: f64,
    /// Dry persistence `1 − m/(m+b)`.
    pub dry_p: f64,
    /// Wet Z weight `1/(m+b)`.
    pub wet_q: f64,
    /// Dry Z weight `1/(m+b)`.
    pub dry_q: f64,
    /// Global weighting constant for positive departures.
    pub k_wet: f64,
    /// Global weighting constant for negative departures.
    pub k_dry: f64,
}

impl CalibrationParameters {
    pub(crate) fn new(wet: DurationFactors, dry: DurationFactors, k_wet: f64, k_dry: f64) -> Self {
        Self {
            wet_m: wet.m(),
            dry_m: dry.m(),
            wet_b: wet.b(),
            dry_b: dry.b(),
            wet_p: wet.p(),
            dry_p: dry.p(),
            wet_q: wet.q(),
            dry_q: dry.q(),
            k_wet,
            k_dry,
        }
    }

    /// Wet duration factors.
    pub fn wet_factors(&self) -> DurationFactors {
        DurationFactors::new(self.wet_m, self.wet_b)
    }

    /// Dry duration factors.
    pub fn dry_factors(&self) -> DurationFactors {
        DurationFactors::new(self.dry_m, self.dry_b)
    }

    /// Parameters in the order wet m, dry m, wet b, dry b, wet p, dry p,
    /// wet q, dry q, K wet, K dry.
    pub fn to_array(&self) -> [f64; 10] {
        [
            self.wet_m, self.dry_m, self.wet_b, self.dry_b, self.wet_p, self.dry_p, self.wet_q,
            self.dry_q, self.k_wet, self.k_dry,
        ]
    }
}

/// Complete result of one station run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PalmerResult {
    start_year: i32,
    periods_per_year: usize,
    records: Vec<PeriodRecord>,
    coefficients: Vec<PeriodCoefficients>,
    parameters: CalibrationParameters,
    calibration: Vec<CalibrationRatios>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cmi: Option<Vec<f64>>,
}

impl PalmerResult {
    pub(crate) fn new(
        layout: &SeriesLayout,
        records: Vec<PeriodRecord>,
        coefficients: Vec<PeriodCoefficients>,
        parameters: CalibrationParameters,
        calibration: Vec<CalibrationRatios>,
        cmi: Option<Vec<f64>>,
    ) -> Self {
        Self {
            start_year: layout.start_year(),
            periods_per_year: layout.periods_per_year(),
            records,
            coefficients,
            parameters,
            calibration,
            cmi,
        }
    }

    /// Per-period records, oldest first.
    pub fn records(&self) -> &[PeriodRecord] {
        &self.records
    }

    /// Number of periods.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the result holds no periods.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn column(&self, f: impl Fn(&PeriodRecord) -> f64) -> Vec<f64> {
        self.records.iter().map(f).collect()
    }

    /// PDSI series.
    pub fn pdsi(&self) -> Vec<f64> {
        self.column(|r| r.pdsi)
    }

    /// PHDI series.
    pub fn phdi(&self) -> Vec<f64> {
        self.column(|r| r.phdi)
    }

    /// WPLM series.
    pub fn wplm(&self) -> Vec<f64> {
        self.column(|r| r.wplm)
    }

    /// Z-index series on its final scale.
    pub fn z_index(&self) -> Vec<f64> {
        self.column(|r| r.z)
    }

    /// Crop moisture index, when requested.
    pub fn cmi(&self) -> Option<&[f64]> {
        self.cmi.as_deref()
    }

    /// Coefficient table, one row per period of the year.
    pub fn coefficients(&self) -> &[PeriodCoefficients] {
        &self.coefficients
    }

    /// Duration factors and weighting constants.
    pub fn parameters(&self) -> &CalibrationParameters {
        &self.parameters
    }

    /// Ratios applied by each self-calibration pass; empty for the
    /// original method.
    pub fn calibration(&self) -> &[CalibrationRatios] {
        &self.calibration
    }

    /// Extracts `series` (one value per result period) from
    /// (`start_year`, `start_period`) through (`end_year`, `end_period`),
    /// both inclusive with 1-based periods. Periods outside the result are
    /// filled with MISSING.
    ///
    /// Returns an empty vector when the end precedes the start.
    pub fn select(
        &self,
        series: &[f64],
        start_year: i32,
        start_period: usize,
        end_year: i32,
        end_period: usize,
    ) -> Vec<f64> {
        let offset = |year: i32, period: usize| {
            (year - self.start_year) as i64 * self.periods_per_year as i64 + period as i64 - 1
        };
        let (first, last) = (offset(start_year, start_period), offset(end_year, end_period));
        (first..=last)
            .map(|i| {
                usize::try_from(i)
                    .ok()
                    .and_then(|i| series.get(i))
                    .copied()
                    .unwrap_or(MISSING)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use palmer_calendar::Frequency;

    #[test]
    fn phdi_rule() {
        assert_eq!(phdi_value(0.4, 0.0), 0.4);
        assert_eq!(phdi_value(0.0, -2.1), -2.1);
        assert_eq!(phdi_value(MISSING, MISSING), MISSING);
    }

    #[test]
    fn wplm_without_spell() {
        assert_eq!(wplm_value(0.3, -0.1, 0.0, 0.0), 0.3);
        assert_eq!(wplm_value(0.1, -0.3, 0.0, 0.0), -0.3);
        // Ties go to the wet track.
        assert_eq!(wplm_value(0.2, -0.2, 0.0, 0.0), 0.2);
    }

    #[test]
    fn wplm_blends_ending_spell() {
        assert_relative_eq!(wplm_value(0.4, -0.2, -2.0, 25.0), 0.75 * -2.0 + 0.25 * 0.4);
        assert_relative_eq!(wplm_value(0.4, -0.2, 2.0, 50.0), 0.5 * 2.0 + 0.5 * -0.2);
    }

    #[test]
    fn wplm_settled_spell() {
        assert_eq!(wplm_value(0.0, 0.0, -2.0, 0.0), -2.0);
        assert_eq!(wplm_value(0.0, 0.0, 2.5, 100.0), 2.5);
        assert_eq!(wplm_value(MISSING, MISSING, MISSING, MISSING), MISSING);
    }

    #[test]
    fn parameters_array_order() {
        let p = CalibrationParameters::new(
            DurationFactors::PALMER,
            DurationFactors::CPC_WEEKLY,
            1.1,
            0.9,
        );
        let a = p.to_array();
        assert_eq!(a[0], 0.309);
        assert_eq!(a[1], 2.925);
        assert_eq!(a[2], 2.691);
        assert_eq!(a[3], 0.075);
        assert_relative_eq!(a[5], 0.025, max_relative = 1e-12);
        assert_relative_eq!(a[7], 1.0 / 3.0, max_relative = 1e-12);
        assert_eq!(&a[8..], &[1.1, 0.9]);
        assert_eq!(p.dry_factors(), DurationFactors::CPC_WEEKLY);
    }

    #[test]
    fn select_pads_outside_series() {
        let layout = SeriesLayout::new(2000, 2001, Frequency::Quarterly).unwrap();
        let params =
            CalibrationParameters::new(DurationFactors::PALMER, DurationFactors::PALMER, 1.0, 1.0);
        let result = PalmerResult::new(&layout, Vec::new(), Vec::new(), params, Vec::new(), None);
        let series: Vec<f64> = (0..8).map(f64::from).collect();

        assert_eq!(result.select(&series, 2000, 3, 2001, 2), vec![2.0, 3.0, 4.0, 5.0]);
        assert_eq!(
            result.select(&series, 1999, 4, 2000, 2),
            vec![MISSING, 0.0, 1.0]
        );
        assert_eq!(
            result.select(&series, 2001, 3, 2002, 1),
            vec![6.0, 7.0, MISSING]
        );
        assert!(result.select(&series, 2001, 1, 2000, 1).is_empty());
    }
}
