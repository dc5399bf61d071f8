//! Depth and temperature unit conversion.
//!
//! The water balance runs in inches and degrees Fahrenheit. Metric inputs
//! (millimetres, degrees Celsius) are converted on entry. MISSING values
//! pass through unchanged.

use palmer_stats::is_missing;

/// Millimetres per inch.
const MM_PER_INCH: f64 = 25.4;

/// Unit system of the caller's inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Units {
    /// Millimetres and degrees Celsius.
    #[default]
    Metric,
    /// Inches and degrees Fahrenheit.
    Imperial,
}

impl Units {
    /// Converts a depth (precipitation, PE, AWC) to inches.
    pub fn depth_to_inches(self, value: f64) -> f64 {
        match self {
            Self::Metric if !is_missing(value) => mm_to_inches(value),
            _ => value,
        }
    }

    /// Converts a temperature to degrees Fahrenheit.
    pub fn temperature_to_fahrenheit(self, value: f64) -> f64 {
        match self {
            Self::Metric if !is_missing(value) => celsius_to_fahrenheit(value),
            _ => value,
        }
    }

    /// Converts a depth series to inches.
    pub fn depths_to_inches(self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|&v| self.depth_to_inches(v)).collect()
    }

    /// Converts a temperature series to degrees Fahrenheit.
    pub fn temperatures_to_fahrenheit(self, values: &[f64]) -> Vec<f64> {
        values
            .iter()
            .map(|&v| self.temperature_to_fahrenheit(v))
            .collect()
    }
}

/// Millimetres to inches.
#[inline]
pub fn mm_to_inches(mm: f64) -> f64 {
    mm / MM_PER_INCH
}

/// Degrees Celsius to degrees Fahrenheit.
#[inline]
pub fn celsius_to_fahrenheit(c: f64) -> f64 {
    c * (9.0 / 5.0) + 32.0
}
