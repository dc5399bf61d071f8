//! Sampling frequencies of a climate series.

use crate::error::CalendarError;

/// Sampling frequency of a precipitation / evapotranspiration series.
///
/// Weekly-family frequencies aggregate whole weeks: a 52-week year split
/// into periods of 1, 2, 4 or 13 weeks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Frequency {
    /// Twelve calendar months per year.
    #[default]
    Monthly,
    /// 52 one-week periods per year.
    Weekly,
    /// 26 two-week periods per year.
    Biweekly,
    /// 13 four-week periods per year.
    FourWeekly,
    /// 4 thirteen-week periods per year.
    Quarterly,
}

impl Frequency {
    /// Number of periods in one year.
    pub fn periods_per_year(self) -> usize {
        match self {
            Self::Monthly => 12,
            Self::Weekly => 52,
            Self::Biweekly => 26,
            Self::FourWeekly => 13,
            Self::Quarterly => 4,
        }
    }

    /// Length of one period in weeks, or `None` for monthly series.
    pub fn period_length_weeks(self) -> Option<usize> {
        match self {
            Self::Monthly => None,
            Self::Weekly => Some(1),
            Self::Biweekly => Some(2),
            Self::FourWeekly => Some(4),
            Self::Quarterly => Some(13),
        }
    }

    /// Returns `true` for the weekly-family frequencies.
    pub fn is_weekly(self) -> bool {
        self.period_length_weeks().is_some()
    }

    /// Looks up the frequency with `n` periods per year.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::UnsupportedPeriodsPerYear`] if no frequency
    /// matches.
    pub fn from_periods_per_year(n: usize) -> Result<Self, CalendarError> {
        match n {
            12 => Ok(Self::Monthly),
            52 => Ok(Self::Weekly),
            26 => Ok(Self::Biweekly),
            13 => Ok(Self::FourWeekly),
            4 => Ok(Self::Quarterly),
            _ => Err(CalendarError::UnsupportedPeriodsPerYear { n }),
        }
    }

    /// Candidate run lengths (in periods) used when fitting spell duration
    /// factors. Monthly lengths span 3 months to 4 years; the weekly family
    /// covers the same quarter-year to four-year horizon in its own units.
    pub fn duration_lengths(self) -> [usize; 10] {
        match self {
            Self::Monthly => [3, 6, 9, 12, 18, 24, 30, 36, 42, 48],
            Self::Weekly => [13, 26, 39, 52, 78, 104, 130, 156, 182, 208],
            Self::Biweekly => [6, 13, 19, 26, 39, 52, 65, 78, 91, 104],
            Self::FourWeekly => [3, 6, 10, 13, 20, 26, 33, 39, 46, 52],
            Self::Quarterly => [2, 3, 4, 5, 6, 8, 10, 12, 14, 16],
        }
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Monthly => "monthly",
            Self::Weekly => "weekly",
            Self::Biweekly => "biweekly",
            Self::FourWeekly => "four-weekly",
            Self::Quarterly => "quarterly",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_periods_per_year() {
        for freq in [
            Frequency::Monthly,
            Frequency::Weekly,
            Frequency::Biweekly,
            Frequency::FourWeekly,
            Frequency::Quarterly,
        ] {
            let n = freq.periods_per_year();
            assert_eq!(Frequency::from_periods_per_year(n).unwrap(), freq);
        }
    }

    #[test]
    fn weekly_family_covers_52_weeks() {
        for freq in [
            Frequency::Weekly,
            Frequency::Biweekly,
            Frequency::FourWeekly,
            Frequency::Quarterly,
        ] {
            let len = freq.period_length_weeks().unwrap();
            assert_eq!(len * freq.periods_per_year(), 52, "{freq}");
        }
        assert!(Frequency::Monthly.period_length_weeks().is_none());
    }

    #[test]
    fn unsupported_periods_rejected() {
        assert_eq!(
            Frequency::from_periods_per_year(365),
            Err(CalendarError::UnsupportedPeriodsPerYear { n: 365 })
        );
    }

    #[test]
    fn duration_lengths_strictly_increasing() {
        for freq in [
            Frequency::Monthly,
            Frequency::Weekly,
            Frequency::Biweekly,
            Frequency::FourWeekly,
            Frequency::Quarterly,
        ] {
            let lengths = freq.duration_lengths();
            assert!(lengths.windows(2).all(|w| w[0] < w[1]), "{freq}");
        }
    }

    #[test]
    fn monthly_lengths_span_quarter_to_four_years() {
        let lengths = Frequency::Monthly.duration_lengths();
        assert_eq!(lengths[0], 3);
        assert_eq!(lengths[9], 48);
    }
}
