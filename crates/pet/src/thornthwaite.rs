//! Thornthwaite potential evapotranspiration.

use palmer_calendar::{Frequency, SeriesLayout, days_in_month};
use palmer_stats::{MISSING, is_missing};
use tracing::debug;

use crate::error::PetError;
use crate::units::Units;

/// Monthly daylight constants for the northern hemisphere, January first.
const MONTHLY_PHI: [f64; 12] = [
    -0.3865982, -0.2316132, -0.0378180, 0.1715539, 0.3458803, 0.4308320, 0.3916645, 0.2452467,
    0.0535511, -0.15583436, -0.3340551, -0.4310691,
];

/// Weekly daylight constants, averaged over the weekday on which 1 January
/// falls.
const WEEKLY_PHI: [f64; 52] = [
    -0.39796983, -0.38279708, -0.36154002, -0.33468535, -0.30281503, -0.26657407, -0.22664177,
    -0.18370885, -0.13846106, -0.09156812, -0.04368365, 0.00456585, 0.05256951, 0.09973421,
    0.14548036, 0.18923931, 0.23045239, 0.26857222, 0.30306721, 0.33342965, 0.35918741,
    0.37991898, 0.39527047, 0.40497267, 0.40885593, 0.40686015, 0.3990384, 0.38555316,
    0.36666599, 0.34272229, 0.31413363, 0.28136006, 0.24489444, 0.20524994, 0.16295153,
    0.11853109, 0.0725259, 0.02547986, -0.02205355, -0.06950714, -0.11629575, -0.16181268,
    -0.20542804, -0.24649005, -0.28433068, -0.31827697, -0.3476688, -0.37188342, -0.3903656,
    -0.40266061, -0.40844587, -0.40755601,
];

/// Site constants for the Thornthwaite method: latitude and the heat index
/// derived from long-term normal temperatures.
///
/// A site built from 12 normals serves monthly series; one built from 52
/// weekly normals serves the weekly-family frequencies.
#[derive(Debug, Clone, PartialEq)]
pub struct ThornthwaiteSite {
    latitude: f64,
    tla: f64,
    heat_index: f64,
    exponent: f64,
    normals_per_year: usize,
}

impl ThornthwaiteSite {
    /// Builds a site from its latitude (degrees, negative south) and normal
    /// temperatures expressed in `units`.
    ///
    /// # Errors
    ///
    /// - [`PetError::InvalidLatitude`] if the latitude is not within [-90, 90].
    /// - [`PetError::WrongNormalCount`] unless 12 or 52 normals are given.
    /// - [`PetError::ZeroHeatIndex`] if no normal is above 32°F.
    pub fn new(latitude: f64, normals: &[f64], units: Units) -> Result<Self, PetError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(PetError::InvalidLatitude { latitude });
        }
        let normals_per_year = normals.len();
        if normals_per_year != 12 && normals_per_year != 52 {
            return Err(PetError::WrongNormalCount {
                got: normals_per_year,
            });
        }

        let raw_index: f64 = normals
            .iter()
            .map(|&t| units.temperature_to_fahrenheit(t))
            .filter(|&t| t > 32.0)
            .map(|t| ((t - 32.0) / 9.0).powf(1.514))
            .sum();
        if raw_index == 0.0 {
            return Err(PetError::ZeroHeatIndex);
        }
        // Weekly normals are rescaled to the monthly-equivalent index.
        let heat_index = if normals_per_year == 52 {
            raw_index / 52.0 * 12.0
        } else {
            raw_index
        };
        let exponent = thornthwaite_exponent(heat_index);
        let tla = -latitude.abs().to_radians().tan();

        debug!(latitude, heat_index, exponent, "thornthwaite site constants");

        Ok(Self {
            latitude,
            tla,
            heat_index,
            exponent,
            normals_per_year,
        })
    }

    /// Latitude in degrees.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Thornthwaite heat index `I`.
    pub fn heat_index(&self) -> f64 {
        self.heat_index
    }

    /// Thornthwaite exponent `A`.
    pub fn exponent(&self) -> f64 {
        self.exponent
    }

    /// Returns `true` for southern-hemisphere sites.
    pub fn is_southern(&self) -> bool {
        self.latitude < 0.0
    }

    /// Number of normals the site was built from (12 or 52).
    pub fn normals_per_year(&self) -> usize {
        self.normals_per_year
    }

    /// PE in inches for one calendar month (1-based) at `temp_f` °F.
    pub fn monthly_pe(&self, temp_f: f64, year: i32, month: u8) -> Result<f64, PetError> {
        let offset = if self.is_southern() { 6 } else { 0 };
        let phi = MONTHLY_PHI[(usize::from(month) - 1 + offset) % 12];
        let days = days_in_month(year, month)?;
        Ok(self.daily_rate(temp_f, phi) * f64::from(days))
    }

    /// PE in inches for 0-based `period` of a year split into periods of
    /// `period_length` weeks.
    pub fn weekly_pe(&self, temp_f: f64, period: usize, period_length: usize) -> f64 {
        let offset = if self.is_southern() { 26 } else { 0 };
        let phi = (0..period_length)
            .map(|j| WEEKLY_PHI[(period * period_length + j + offset) % 52])
            .sum::<f64>()
            / period_length as f64;
        self.daily_rate(temp_f, phi) * (period_length * 7) as f64
    }

    fn daily_rate(&self, temp_f: f64, phi: f64) -> f64 {
        if temp_f <= 32.0 {
            return 0.0;
        }
        let dk = self.daylight_factor(phi);
        if temp_f >= 80.0 {
            ((temp_f / 57.3 - 0.166).sin() - 0.76) * dk
        } else {
            let a = self.exponent;
            (-3.863233 + a * 1.715598 - a * self.heat_index.ln() + a * (temp_f - 32.0).ln()).exp()
                * dk
        }
    }

    fn daylight_factor(&self, phi: f64) -> f64 {
        // Clamped so polar day and polar night stay finite.
        let dum = (phi * self.tla).clamp(-1.0, 1.0);
        let mut dk = ((1.0 - dum * dum).sqrt() / dum).atan();
        if dk < 0.0 || dum == -1.0 {
            dk += 3.141593;
        }
        (dk + 0.0157) / 1.57
    }
}

fn thornthwaite_exponent(i: f64) -> f64 {
    6.75e-7 * i.powi(3) - 7.71e-5 * i.powi(2) + 0.0179 * i + 0.49
}

/// Computes Thornthwaite PE in inches for a temperature series in °F laid
/// out by `layout`. MISSING temperatures yield MISSING PE.
///
/// # Errors
///
/// - [`PetError::FrequencyMismatch`] if monthly normals are used with a
///   weekly series or weekly normals with a monthly one.
pub fn potential_evapotranspiration(
    temps_f: &[f64],
    layout: &SeriesLayout,
    site: &ThornthwaiteSite,
) -> Result<Vec<f64>, PetError> {
    let frequency = layout.frequency();
    let expected_normals = if frequency == Frequency::Monthly { 12 } else { 52 };
    if site.normals_per_year != expected_normals {
        return Err(PetError::FrequencyMismatch {
            normals: site.normals_per_year,
            frequency: frequency.to_string(),
        });
    }

    temps_f
        .iter()
        .enumerate()
        .map(|(i, &t)| {
            if is_missing(t) {
                return Ok(MISSING);
            }
            let period = layout.period_index(i);
            match frequency.period_length_weeks() {
                None => site.monthly_pe(t, layout.year_of(i), period as u8 + 1),
                Some(len) => Ok(site.weekly_pe(t, period, len)),
            }
        })
        .collect()
}
