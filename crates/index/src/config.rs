//! Engine configuration.

use palmer_calendar::{CalibrationWindow, Frequency, SeriesLayout};
use palmer_pet::Units;

use crate::duration::DurationFactors;
use crate::error::PalmerError;

/// Empirical constants of the Palmer model.
///
/// `k1_1`, `k1_2` and `k1_3` shape the climatic weighting factor `k`; `k2`
/// scales it in the original (non-calibrating) method. `p` and `q` are the
/// duration-factor constants used when factors are not estimated from data.
///
/// # Example
///
/// ```
/// use palmer_index::CoefficientSet;
///
/// let coefs = CoefficientSet::new().with_k2(17.67).with_pq(0.897, 1.0 / 3.0);
/// assert!(coefs.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoefficientSet {
    k1_1: f64,
    k1_2: f64,
    k1_3: f64,
    k2: f64,
    p: f64,
    q: f64,
}

impl CoefficientSet {
    /// Palmer's published constants.
    ///
    /// Defaults: `k1_1 = 1.5`, `k1_2 = 2.8`, `k1_3 = 0.5`, `k2 = 17.67`,
    /// `p = 0.897`, `q = 1/3`.
    pub fn new() -> Self {
        Self {
            k1_1: 1.5,
            k1_2: 2.8,
            k1_3: 0.5,
            k2: 17.67,
            p: 0.897,
            q: 1.0 / 3.0,
        }
    }

    /// Sets the slope of the weighting-factor log term.
    pub fn with_k1_1(mut self, v: f64) -> Self {
        self.k1_1 = v;
        self
    }

    /// Sets the offset inside the weighting-factor log term.
    pub fn with_k1_2(mut self, v: f64) -> Self {
        self.k1_2 = v;
        self
    }

    /// Sets the additive weighting-factor constant (also the fallback `k`).
    pub fn with_k1_3(mut self, v: f64) -> Self {
        self.k1_3 = v;
        self
    }

    /// Sets the original-method scaling constant.
    pub fn with_k2(mut self, v: f64) -> Self {
        self.k2 = v;
        self
    }

    /// Sets the duration constants `p` and `q`.
    pub fn with_pq(mut self, p: f64, q: f64) -> Self {
        self.p = p;
        self.q = q;
        self
    }

    // --- Accessors ---

    /// Slope of the weighting-factor log term.
    pub fn k1_1(&self) -> f64 {
        self.k1_1
    }

    /// Offset inside the weighting-factor log term.
    pub fn k1_2(&self) -> f64 {
        self.k1_2
    }

    /// Additive weighting-factor constant.
    pub fn k1_3(&self) -> f64 {
        self.k1_3
    }

    /// Original-method scaling constant.
    pub fn k2(&self) -> f64 {
        self.k2
    }

    /// Duration constant `p`.
    pub fn p(&self) -> f64 {
        self.p
    }

    /// Duration constant `q`.
    pub fn q(&self) -> f64 {
        self.q
    }

    /// Duration factors `m = (1 - p) / q`, `b = p / q`.
    pub fn duration_factors(&self) -> DurationFactors {
        DurationFactors::from_pq(self.p, self.q)
    }

    /// Validates this coefficient set.
    ///
    /// All constants must be finite; `q` must be positive and `p` must lie
    /// in `[0, 1)`.
    pub fn validate(&self) -> Result<(), PalmerError> {
        for (name, value) in [
            ("k1_1", self.k1_1),
            ("k1_2", self.k1_2),
            ("k1_3", self.k1_3),
            ("k2", self.k2),
        ] {
            if !value.is_finite() {
                return Err(PalmerError::InvalidCoefficient {
                    name,
                    value,
                    reason: "must be finite",
                });
            }
        }
        if !self.q.is_finite() || self.q <= 0.0 {
            return Err(PalmerError::InvalidCoefficient {
                name: "q",
                value: self.q,
                reason: "must be finite and > 0",
            });
        }
        if !self.p.is_finite() || !(0.0..1.0).contains(&self.p) {
            return Err(PalmerError::InvalidCoefficient {
                name: "p",
                value: self.p,
                reason: "must be within [0, 1)",
            });
        }
        Ok(())
    }
}

impl Default for CoefficientSet {
    fn default() -> Self {
        Self::new()
    }
}

/// How the Z-index scale and duration factors are obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    /// Duration factors fitted to the station's own Z-index and the index
    /// rescaled so its calibration extremes reach about ±4.
    #[default]
    SelfCalibrating,
    /// Palmer's fixed constants: `K = K2 / Σ(D·k)` and fixed duration factors.
    Original,
}

/// Configuration of one station run.
///
/// # Example
///
/// ```
/// use palmer_index::{Method, PalmerConfig};
///
/// let config = PalmerConfig::new(150.0, 1950, 2000)
///     .with_calibration(1961, 1990)
///     .with_method(Method::SelfCalibrating);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PalmerConfig {
    awc: f64,
    start_year: i32,
    end_year: i32,
    calibration: Option<(i32, i32)>,
    frequency: Frequency,
    units: Units,
    coefficients: CoefficientSet,
    method: Method,
    calibration_passes: usize,
    duration_factors: Option<DurationFactors>,
    crop_moisture: bool,
}

impl PalmerConfig {
    /// Creates a configuration for a series spanning `start_year..=end_year`
    /// with available water capacity `awc` (in the configured units).
    ///
    /// Defaults: monthly, metric, calibration over the whole series,
    /// self-calibrating with 3 calibration passes, Palmer coefficients, no
    /// crop moisture index.
    pub fn new(awc: f64, start_year: i32, end_year: i32) -> Self {
        Self {
            awc,
            start_year,
            end_year,
            calibration: None,
            frequency: Frequency::Monthly,
            units: Units::Metric,
            coefficients: CoefficientSet::new(),
            method: Method::SelfCalibrating,
            calibration_passes: 3,
            duration_factors: None,
            crop_moisture: false,
        }
    }

    /// Restricts calibration to `start_year..=end_year`.
    pub fn with_calibration(mut self, start_year: i32, end_year: i32) -> Self {
        self.calibration = Some((start_year, end_year));
        self
    }

    /// Sets the sampling frequency.
    pub fn with_frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = frequency;
        self
    }

    /// Sets the unit system of the inputs and AWC.
    pub fn with_units(mut self, units: Units) -> Self {
        self.units = units;
        self
    }

    /// Sets the model coefficients.
    pub fn with_coefficients(mut self, coefficients: CoefficientSet) -> Self {
        self.coefficients = coefficients;
        self
    }

    /// Sets the computation method.
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Sets how many times the self-calibrating method rescales the Z-index.
    pub fn with_calibration_passes(mut self, passes: usize) -> Self {
        self.calibration_passes = passes;
        self
    }

    /// Overrides the fixed duration factors of the original method.
    pub fn with_duration_factors(mut self, factors: DurationFactors) -> Self {
        self.duration_factors = Some(factors);
        self
    }

    /// Enables the crop moisture index second pass.
    pub fn with_crop_moisture(mut self, enabled: bool) -> Self {
        self.crop_moisture = enabled;
        self
    }

    // --- Accessors ---

    /// Available water capacity in the configured units.
    pub fn awc(&self) -> f64 {
        self.awc
    }

    /// First year of the series.
    pub fn start_year(&self) -> i32 {
        self.start_year
    }

    /// Last year of the series.
    pub fn end_year(&self) -> i32 {
        self.end_year
    }

    /// Calibration interval; the whole series when unset.
    pub fn calibration(&self) -> (i32, i32) {
        self.calibration.unwrap_or((self.start_year, self.end_year))
    }

    /// Sampling frequency.
    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Unit system of the inputs.
    pub fn units(&self) -> Units {
        self.units
    }

    /// Model coefficients.
    pub fn coefficients(&self) -> &CoefficientSet {
        &self.coefficients
    }

    /// Computation method.
    pub fn method(&self) -> Method {
        self.method
    }

    /// Number of self-calibration passes.
    pub fn calibration_passes(&self) -> usize {
        self.calibration_passes
    }

    /// Fixed duration factors for the original method.
    ///
    /// Unless overridden, weekly-family series use the CPC weekly factors and
    /// monthly series derive them from `p` and `q`.
    pub fn duration_factors(&self) -> DurationFactors {
        match self.duration_factors {
            Some(f) => f,
            None if self.frequency.is_weekly() => DurationFactors::CPC_WEEKLY,
            None => self.coefficients.duration_factors(),
        }
    }

    /// Whether the crop moisture index is computed.
    pub fn crop_moisture(&self) -> bool {
        self.crop_moisture
    }

    /// Series layout described by this configuration.
    pub fn layout(&self) -> Result<SeriesLayout, PalmerError> {
        Ok(SeriesLayout::new(
            self.start_year,
            self.end_year,
            self.frequency,
        )?)
    }

    /// Calibration window within `layout`.
    pub fn window(&self, layout: &SeriesLayout) -> Result<CalibrationWindow, PalmerError> {
        match self.calibration {
            Some((start, end)) => Ok(CalibrationWindow::new(layout, start, end)?),
            None => Ok(CalibrationWindow::full(layout)),
        }
    }

    /// Validates this configuration without touching any data.
    ///
    /// Checks the year range and calibration interval, the coefficients,
    /// the AWC and the calibration pass count.
    pub fn validate(&self) -> Result<(), PalmerError> {
        let layout = self.layout()?;
        self.window(&layout)?;
        self.coefficients.validate()?;
        if !self.awc.is_finite() || self.awc <= 0.0 {
            return Err(PalmerError::InvalidCoefficient {
                name: "awc",
                value: self.awc,
                reason: "must be finite and > 0",
            });
        }
        if self.method == Method::SelfCalibrating && self.calibration_passes == 0 {
            return Err(PalmerError::InvalidCalibrationPasses {
                passes: self.calibration_passes,
            });
        }
        if let Some(f) = self.duration_factors
            && !f.is_usable()
        {
            return Err(PalmerError::InvalidCoefficient {
                name: "duration_factors",
                value: f.m() + f.b(),
                reason: "m + b must be finite and > 0",
            });
        }
        Ok(())
    }
}
