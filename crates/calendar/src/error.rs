//! Error types for the palmer-calendar crate.

/// Error type for all fallible operations in the palmer-calendar crate.
///
/// Covers validation of year ranges, calibration intervals, sampling
/// frequencies and month/period numbers.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalendarError {
    /// Returned when the series end year is not after its start year.
    #[error("invalid year range: start {start} must be before end {end}")]
    InvalidYearRange {
        /// First year of the series.
        start: i32,
        /// Last year of the series.
        end: i32,
    },

    /// Returned when the calibration end year is not after its start year.
    #[error("invalid calibration range: start {start} must be before end {end}")]
    InvalidCalibrationRange {
        /// First calibration year.
        start: i32,
        /// Last calibration year.
        end: i32,
    },

    /// Returned when the calibration interval is not contained in the series.
    #[error(
        "calibration interval {calibration_start}..={calibration_end} \
         outside series {start}..={end}"
    )]
    CalibrationOutsideSeries {
        /// First calibration year.
        calibration_start: i32,
        /// Last calibration year.
        calibration_end: i32,
        /// First year of the series.
        start: i32,
        /// Last year of the series.
        end: i32,
    },

    /// Returned when no supported frequency has the requested period count.
    #[error("unsupported periods per year: {n} (must be 4, 12, 13, 26 or 52)")]
    UnsupportedPeriodsPerYear {
        /// The requested number of periods per year.
        n: usize,
    },

    /// Returned when a month number is outside the valid range 1..=12.
    #[error("invalid month: {month} (must be 1..=12)")]
    InvalidMonth {
        /// The invalid month number that was provided.
        month: u8,
    },

    /// Returned when a period number is outside 1..=periods_per_year.
    #[error("invalid period: {period} (must be 1..={periods_per_year})")]
    InvalidPeriod {
        /// The invalid 1-based period number.
        period: usize,
        /// Number of periods in a year for the series frequency.
        periods_per_year: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_invalid_year_range() {
        let e = CalendarError::InvalidYearRange {
            start: 2000,
            end: 1990,
        };
        assert_eq!(
            e.to_string(),
            "invalid year range: start 2000 must be before end 1990"
        );
    }

    #[test]
    fn error_invalid_calibration_range() {
        let e = CalendarError::InvalidCalibrationRange {
            start: 1980,
            end: 1980,
        };
        assert_eq!(
            e.to_string(),
            "invalid calibration range: start 1980 must be before end 1980"
        );
    }

    #[test]
    fn error_calibration_outside_series() {
        let e = CalendarError::CalibrationOutsideSeries {
            calibration_start: 1940,
            calibration_end: 1990,
            start: 1950,
            end: 2000,
        };
        assert_eq!(
            e.to_string(),
            "calibration interval 1940..=1990 outside series 1950..=2000"
        );
    }

    #[test]
    fn error_unsupported_periods() {
        let e = CalendarError::UnsupportedPeriodsPerYear { n: 7 };
        assert_eq!(
            e.to_string(),
            "unsupported periods per year: 7 (must be 4, 12, 13, 26 or 52)"
        );
    }

    #[test]
    fn error_invalid_month() {
        let e = CalendarError::InvalidMonth { month: 13 };
        assert_eq!(e.to_string(), "invalid month: 13 (must be 1..=12)");
    }

    #[test]
    fn error_invalid_period() {
        let e = CalendarError::InvalidPeriod {
            period: 0,
            periods_per_year: 52,
        };
        assert_eq!(e.to_string(), "invalid period: 0 (must be 1..=52)");
    }

    #[test]
    fn error_is_std_error() {
        fn assert_impl<T: std::error::Error>() {}
        assert_impl::<CalendarError>();
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync>() {}
        assert_impl::<CalendarError>();
    }
}
