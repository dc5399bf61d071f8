//! Year/period geometry of a regularly sampled series.

use crate::error::CalendarError;
use crate::frequency::Frequency;

/// Describes a series covering whole years `start_year..=end_year` at a
/// fixed [`Frequency`]. Index 0 is period 1 of `start_year`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesLayout {
    start_year: i32,
    end_year: i32,
    frequency: Frequency,
}

impl SeriesLayout {
    /// Creates a layout.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidYearRange`] unless
    /// `start_year < end_year`.
    pub fn new(start_year: i32, end_year: i32, frequency: Frequency) -> Result<Self, CalendarError> {
        if start_year >= end_year {
            return Err(CalendarError::InvalidYearRange {
                start: start_year,
                end: end_year,
            });
        }
        Ok(Self {
            start_year,
            end_year,
            frequency,
        })
    }

    /// First year of the series.
    pub fn start_year(&self) -> i32 {
        self.start_year
    }

    /// Last year of the series.
    pub fn end_year(&self) -> i32 {
        self.end_year
    }

    /// Sampling frequency.
    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Number of periods per year.
    pub fn periods_per_year(&self) -> usize {
        self.frequency.periods_per_year()
    }

    /// Number of years covered, inclusive of both ends.
    pub fn total_years(&self) -> usize {
        (self.end_year - self.start_year + 1) as usize
    }

    /// Number of periods covered.
    pub fn n_periods(&self) -> usize {
        self.total_years() * self.periods_per_year()
    }

    /// Calendar year of series index `i`.
    pub fn year_of(&self, i: usize) -> i32 {
        self.start_year + (i / self.periods_per_year()) as i32
    }

    /// 1-based period-of-year of series index `i`.
    pub fn period_of(&self, i: usize) -> usize {
        i % self.periods_per_year() + 1
    }

    /// 0-based period-of-year of series index `i`.
    pub fn period_index(&self, i: usize) -> usize {
        i % self.periods_per_year()
    }

    /// Series index of (`year`, 1-based `period`), or `None` if the year
    /// lies outside the series.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidPeriod`] if `period` is outside
    /// `1..=periods_per_year`.
    pub fn index_of(&self, year: i32, period: usize) -> Result<Option<usize>, CalendarError> {
        let ppy = self.periods_per_year();
        if !(1..=ppy).contains(&period) {
            return Err(CalendarError::InvalidPeriod {
                period,
                periods_per_year: ppy,
            });
        }
        if year < self.start_year || year > self.end_year {
            return Ok(None);
        }
        Ok(Some((year - self.start_year) as usize * ppy + period - 1))
    }

    /// Signed offset of (`year`, 1-based `period`) from the first period,
    /// which may fall before or after the series.
    pub fn offset_of(&self, year: i32, period: usize) -> i64 {
        (year - self.start_year) as i64 * self.periods_per_year() as i64 + period as i64 - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monthly() -> SeriesLayout {
        SeriesLayout::new(1950, 1959, Frequency::Monthly).unwrap()
    }

    #[test]
    fn rejects_reversed_years() {
        assert_eq!(
            SeriesLayout::new(2000, 2000, Frequency::Monthly),
            Err(CalendarError::InvalidYearRange {
                start: 2000,
                end: 2000
            })
        );
    }

    #[test]
    fn counts() {
        let layout = monthly();
        assert_eq!(layout.total_years(), 10);
        assert_eq!(layout.n_periods(), 120);
    }

    #[test]
    fn index_geometry() {
        let layout = monthly();
        assert_eq!(layout.year_of(0), 1950);
        assert_eq!(layout.period_of(0), 1);
        assert_eq!(layout.year_of(13), 1951);
        assert_eq!(layout.period_of(13), 2);
        assert_eq!(layout.period_index(13), 1);
        assert_eq!(layout.index_of(1951, 2).unwrap(), Some(13));
    }

    #[test]
    fn index_outside_series() {
        let layout = monthly();
        assert_eq!(layout.index_of(1949, 12).unwrap(), None);
        assert_eq!(layout.index_of(1960, 1).unwrap(), None);
        assert_eq!(layout.offset_of(1949, 12), -1);
    }

    #[test]
    fn invalid_period() {
        let layout = monthly();
        assert!(matches!(
            layout.index_of(1950, 13),
            Err(CalendarError::InvalidPeriod { period: 13, .. })
        ));
    }
}
