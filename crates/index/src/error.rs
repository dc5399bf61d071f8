//! Error types for the palmer-index crate.

use palmer_calendar::CalendarError;
use palmer_pet::PetError;
use palmer_water_balance::WaterBalanceError;

/// Error type for all fallible operations in the palmer-index crate.
///
/// Every variant is a configuration or input-shape problem detected before
/// any index arithmetic runs. Numerical degeneracies inside a run are
/// resolved with fallback constants instead.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PalmerError {
    /// Invalid year range, calibration interval or period number.
    #[error(transparent)]
    Calendar(#[from] CalendarError),

    /// Invalid Thornthwaite site or temperature series.
    #[error(transparent)]
    Pet(#[from] PetError),

    /// Invalid soil capacity or water-balance input.
    #[error(transparent)]
    WaterBalance(#[from] WaterBalanceError),

    /// Returned when the precipitation and PE (or temperature) series
    /// differ in length.
    #[error("length mismatch: precip has {precip} values, {other_name} has {other}")]
    LengthMismatch {
        /// Length of the precipitation series.
        precip: usize,
        /// Length of the other series.
        other: usize,
        /// Name of the other series.
        other_name: &'static str,
    },

    /// Returned when the input covers fewer years than the configured range.
    #[error("insufficient data: input covers {years} years, configuration needs {required}")]
    InsufficientData {
        /// Years covered by the input, counting a partial final year.
        years: usize,
        /// Years between the configured start and end year.
        required: usize,
    },

    /// Returned when a model coefficient is out of its valid range.
    #[error("invalid coefficient {name}: {value} ({reason})")]
    InvalidCoefficient {
        /// Coefficient name.
        name: &'static str,
        /// The rejected value.
        value: f64,
        /// Description of the constraint.
        reason: &'static str,
    },

    /// Returned when the self-calibrating method is asked for zero passes.
    #[error("calibration passes must be at least 1, got {passes}")]
    InvalidCalibrationPasses {
        /// The rejected pass count.
        passes: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_calendar_is_transparent() {
        let e = PalmerError::from(CalendarError::InvalidYearRange {
            start: 2000,
            end: 1990,
        });
        assert_eq!(
            e.to_string(),
            "invalid year range: start 2000 must be before end 1990"
        );
    }

    #[test]
    fn error_water_balance_is_transparent() {
        let e = PalmerError::from(WaterBalanceError::InvalidAwc { awc: 0.0 });
        assert_eq!(
            e.to_string(),
            "invalid available water capacity: 0 (must be finite and > 0)"
        );
    }

    #[test]
    fn error_length_mismatch() {
        let e = PalmerError::LengthMismatch {
            precip: 120,
            other: 118,
            other_name: "pet",
        };
        assert_eq!(
            e.to_string(),
            "length mismatch: precip has 120 values, pet has 118"
        );
    }

    #[test]
    fn error_insufficient_data() {
        let e = PalmerError::InsufficientData {
            years: 9,
            required: 10,
        };
        assert_eq!(
            e.to_string(),
            "insufficient data: input covers 9 years, configuration needs 10"
        );
    }

    #[test]
    fn error_invalid_coefficient() {
        let e = PalmerError::InvalidCoefficient {
            name: "q",
            value: 0.0,
            reason: "must be finite and > 0",
        };
        assert_eq!(
            e.to_string(),
            "invalid coefficient q: 0 (must be finite and > 0)"
        );
    }

    #[test]
    fn error_invalid_calibration_passes() {
        let e = PalmerError::InvalidCalibrationPasses { passes: 0 };
        assert_eq!(
            e.to_string(),
            "calibration passes must be at least 1, got 0"
        );
    }

    #[test]
    fn error_is_std_error() {
        fn assert_impl<T: std::error::Error>() {}
        assert_impl::<PalmerError>();
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync>() {}
        assert_impl::<PalmerError>();
    }
}
