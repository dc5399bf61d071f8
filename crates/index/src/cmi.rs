//! Crop Moisture Index: a short-memory index of evapotranspiration deficit
//! and excess moisture, computed in a second water-balance pass.

use palmer_calendar::SeriesLayout;
use palmer_stats::MISSING;
use palmer_water_balance::{SoilMoisture, WaterBalanceError, is_valid_period};
use tracing::debug;

/// Decay of the evapotranspiration anomaly index between periods.
const Y_DECAY: f64 = 0.67;

/// Weight of the current evapotranspiration anomaly.
const Y_WEIGHT: f64 = 1.8;

/// Carried state of the crop moisture index.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct CmiState {
    y_prime: f64,
    g: f64,
}

impl CmiState {
    /// Advances the state with one period and returns its CMI.
    ///
    /// `m` is the fraction of field capacity after the period, `de` the
    /// relative evapotranspiration anomaly, `r` and `ro` the actual
    /// recharge and runoff.
    fn advance(&mut self, m: f64, de: f64, r: f64, ro: f64) -> f64 {
        let y_prime = Y_DECAY * self.y_prime + Y_WEIGHT * de;
        let y = if y_prime < 0.0 { y_prime } else { m * y_prime };

        let old_g = self.g;
        let h = if old_g == 0.0 {
            0.0
        } else if old_g < 0.5 {
            old_g
        } else if old_g < 1.0 {
            0.5
        } else {
            0.5 * old_g
        };
        let g = old_g - h + m * r + ro;

        self.y_prime = y_prime;
        self.g = g;
        y + g
    }
}

/// Computes the crop moisture index from `precip` and `pet` (inches) with
/// a freshly saturated soil of capacity `awc` and the evapotranspiration
/// coefficient `alpha` of each period of the year.
///
/// Invalid periods yield MISSING and leave both soil and index state
/// untouched.
///
/// # Errors
///
/// - [`WaterBalanceError::LengthMismatch`] if the series lengths differ.
/// - [`WaterBalanceError::InvalidAwc`] if `awc` is not positive.
pub fn crop_moisture_index(
    precip: &[f64],
    pet: &[f64],
    awc: f64,
    alpha: &[f64],
    layout: &SeriesLayout,
) -> Result<Vec<f64>, WaterBalanceError> {
    if precip.len() != pet.len() {
        return Err(WaterBalanceError::LengthMismatch {
            precip: precip.len(),
            pet: pet.len(),
        });
    }
    let mut soil = SoilMoisture::new(awc)?;
    let mut state = CmiState::default();

    let cmi: Vec<f64> = precip
        .iter()
        .zip(pet)
        .enumerate()
        .map(|(i, (&p, &pe))| {
            if !is_valid_period(p, pe) {
                return MISSING;
            }
            let wb = soil.step(p, pe);
            let m = soil.total() / soil.awc();
            let a = alpha[layout.period_index(i)];
            let de = if a > 0.0 {
                (wb.et - a * wb.pe) / a.sqrt()
            } else {
                0.0
            };
            state.advance(m, de, wb.r, wb.ro)
        })
        .collect();

    debug!(n_periods = cmi.len(), "crop moisture index computed");
    Ok(cmi)
}
