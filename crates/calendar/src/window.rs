//! Calibration interval within a series.

use crate::error::CalendarError;
use crate::layout::SeriesLayout;

/// Whole calendar years `start_year..=end_year` of a series over which the
/// climatic coefficients, duration factors and calibration percentiles are
/// estimated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalibrationWindow {
    start_year: i32,
    end_year: i32,
    series_start: i32,
    series_end: i32,
    periods_per_year: usize,
}

impl CalibrationWindow {
    /// Creates a calibration window for `layout`.
    ///
    /// # Errors
    ///
    /// - [`CalendarError::InvalidCalibrationRange`] unless `start_year < end_year`.
    /// - [`CalendarError::CalibrationOutsideSeries`] if the interval is not
    ///   contained in the series years.
    pub fn new(layout: &SeriesLayout, start_year: i32, end_year: i32) -> Result<Self, CalendarError> {
        if start_year >= end_year {
            return Err(CalendarError::InvalidCalibrationRange {
                start: start_year,
                end: end_year,
            });
        }
        if start_year < layout.start_year() || end_year > layout.end_year() {
            return Err(CalendarError::CalibrationOutsideSeries {
                calibration_start: start_year,
                calibration_end: end_year,
                start: layout.start_year(),
                end: layout.end_year(),
            });
        }
        Ok(Self {
            start_year,
            end_year,
            series_start: layout.start_year(),
            series_end: layout.end_year(),
            periods_per_year: layout.periods_per_year(),
        })
    }

    /// Window covering the whole series.
    pub fn full(layout: &SeriesLayout) -> Self {
        Self {
            start_year: layout.start_year(),
            end_year: layout.end_year(),
            series_start: layout.start_year(),
            series_end: layout.end_year(),
            periods_per_year: layout.periods_per_year(),
        }
    }

    /// First calibration year.
    pub fn start_year(&self) -> i32 {
        self.start_year
    }

    /// Last calibration year.
    pub fn end_year(&self) -> i32 {
        self.end_year
    }

    /// Number of calibration years.
    pub fn years(&self) -> usize {
        (self.end_year - self.start_year + 1) as usize
    }

    /// Number of series periods before the calibration interval.
    pub fn start_skip_periods(&self) -> usize {
        (self.start_year - self.series_start) as usize * self.periods_per_year
    }

    /// Number of series periods after the calibration interval.
    pub fn end_skip_periods(&self) -> usize {
        (self.series_end - self.end_year) as usize * self.periods_per_year
    }

    /// Number of periods inside the calibration interval.
    pub fn calibration_periods(&self) -> usize {
        self.years() * self.periods_per_year
    }

    /// Returns `true` if `year` lies inside the calibration interval.
    pub fn contains_year(&self, year: i32) -> bool {
        (self.start_year..=self.end_year).contains(&year)
    }

    /// Returns `true` if series index `i` lies inside the calibration interval.
    pub fn contains_index(&self, i: usize) -> bool {
        let start = self.start_skip_periods();
        i >= start && i < start + self.calibration_periods()
    }
}
