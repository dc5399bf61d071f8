//! Two-layer soil moisture state and the single-period water balance.

use crate::error::WaterBalanceError;

/// Capacity of the surface layer in inches.
pub const SURFACE_CAPACITY: f64 = 1.0;

/// Potential quantities for one period, computed from the soil state
/// before it is updated.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Potentials {
    /// Potential recharge: the capacity not currently filled.
    pub pr: f64,
    /// Potential runoff: the moisture currently stored.
    pub pro: f64,
    /// Potential loss.
    pub pl: f64,
}

/// Water balance of one valid period. All depths in inches.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WaterBalance {
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
    /// Actual evapotranspiration.
    pub et: f64,
    /// Actual recharge.
    pub r: f64,
    /// Actual runoff.
    pub ro: f64,
    /// Actual loss.
    pub l: f64,
}

/// Moisture stored in the surface (`Ss`) and underlying (`Su`) layers.
///
/// Invariant: `0 <= Ss <= 1` and `0 <= Su <= AWC - 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoilMoisture {
    awc: f64,
    surface: f64,
    under: f64,
}

impl SoilMoisture {
    /// Creates a saturated soil column with capacity `awc` inches.
    ///
    /// Capacities below one inch are raised to one so the surface layer is
    /// always complete.
    ///
    /// # Errors
    ///
    /// Returns [`WaterBalanceError::InvalidAwc`] if `awc` is non-finite or
    /// not positive.
    pub fn new(awc: f64) -> Result<Self, WaterBalanceError> {
        if !awc.is_finite() || awc <= 0.0 {
            return Err(WaterBalanceError::InvalidAwc { awc });
        }
        let awc = awc.max(SURFACE_CAPACITY);
        Ok(Self {
            awc,
            surface: SURFACE_CAPACITY,
            under: (awc - SURFACE_CAPACITY).max(0.0),
        })
    }

    /// Total available water capacity in inches.
    pub fn awc(&self) -> f64 {
        self.awc
    }

    /// Moisture in the surface layer.
    pub fn surface(&self) -> f64 {
        self.surface
    }

    /// Moisture in the underlying layer.
    pub fn underlying(&self) -> f64 {
        self.under
    }

    /// Total stored moisture.
    pub fn total(&self) -> f64 {
        self.surface + self.under
    }

    /// Potentials for a period with potential evapotranspiration `pe`.
    pub fn potentials(&self, pe: f64) -> Potentials {
        let pro = self.surface + self.under;
        let pl = if self.surface >= pe {
            pe
        } else {
            ((pe - self.surface) * self.under / self.awc + self.surface).min(pro)
        };
        Potentials {
            pr: self.awc - pro,
            pro,
            pl,
        }
    }

    /// Advances the soil state by one period and returns its water balance.
    ///
    /// Callers must only pass valid periods (`p >= 0`, `pe` present).
    pub fn step(&mut self, p: f64, pe: f64) -> WaterBalance {
        let Potentials { pr, pro, pl } = self.potentials(pe);
        let mut wb = WaterBalance {
            p,
            pe,
            pr,
            pro,
            pl,
            ..WaterBalance::default()
        };

        if p >= pe {
            wb.et = pe;
            let excess = p - pe;
            let surface_room = SURFACE_CAPACITY - self.surface;
            if excess > surface_room {
                let under_room = (self.awc - SURFACE_CAPACITY) - self.under;
                let recharge_under = (excess - surface_room).min(under_room);
                wb.ro = if excess - surface_room < under_room {
                    0.0
                } else {
                    excess - (surface_room + under_room)
                };
                self.surface = SURFACE_CAPACITY;
                self.under += recharge_under;
                wb.r = surface_room + recharge_under;
            } else {
                self.surface += excess;
                wb.r = excess;
            }
        } else {
            let deficit = pe - p;
            let (surface_loss, under_loss) = if self.surface > deficit {
                (deficit, 0.0)
            } else {
                let surface_loss = self.surface;
                let under_loss = ((deficit - surface_loss) * self.under / self.awc).min(self.under);
                (surface_loss, under_loss)
            };
            self.surface -= surface_loss;
            self.under -= under_loss;
            wb.l = surface_loss + under_loss;
            wb.et = p + wb.l;
        }
        wb
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn saturated_surplus_runs_off() {
        let mut soil = SoilMoisture::new(5.0).unwrap();
        let wb = soil.step(2.0, 1.0);
        assert_relative_eq!(wb.pr, 0.0);
        assert_relative_eq!(wb.pro, 5.0);
        assert_relative_eq!(wb.pl, 1.0);
        assert_relative_eq!(wb.et, 1.0);
        assert_relative_eq!(wb.r, 0.0);
        assert_relative_eq!(wb.l, 0.0);
        assert_relative_eq!(wb.ro, 1.0);
        assert_relative_eq!(soil.surface(), 1.0);
        assert_relative_eq!(soil.underlying(), 4.0);
    }

    #[test]
    fn small_awc_raised_to_surface_capacity() {
        let soil = SoilMoisture::new(0.5).unwrap();
        assert_relative_eq!(soil.awc(), 1.0);
        assert_relative_eq!(soil.surface(), 1.0);
        assert_relative_eq!(soil.underlying(), 0.0);
    }

    #[test]
    fn rejects_non_positive_awc() {
        assert_eq!(
            SoilMoisture::new(0.0),
            Err(WaterBalanceError::InvalidAwc { awc: 0.0 })
        );
        assert!(SoilMoisture::new(f64::NAN).is_err());
    }

    #[test]
    fn dry_period_from_saturated_ten_inch_column() {
        let mut soil = SoilMoisture::new(10.0).unwrap();
        let wb = soil.step(0.0, 5.0);
        assert_relative_eq!(wb.pr, 0.0);
        assert_relative_eq!(wb.pro, 10.0);
        assert_relative_eq!(wb.pl, 4.6, epsilon = 1e-12);
        assert_relative_eq!(wb.l, 4.6, epsilon = 1e-12);
        assert_relative_eq!(wb.et, 4.6, epsilon = 1e-12);
        assert_relative_eq!(wb.r, 0.0);
        assert_relative_eq!(wb.ro, 0.0);
        assert_relative_eq!(soil.surface(), 0.0);
        assert_relative_eq!(soil.underlying(), 5.4, epsilon = 1e-12);
    }

    #[test]
    fn deficit_taken_from_surface_first() {
        let mut soil = SoilMoisture::new(5.0).unwrap();
        let wb = soil.step(0.0, 0.4);
        assert_relative_eq!(wb.l, 0.4);
        assert_relative_eq!(wb.et, 0.4);
        assert_relative_eq!(soil.surface(), 0.6);
        assert_relative_eq!(soil.underlying(), 4.0);
    }

    #[test]
    fn deficit_spills_into_underlying_layer() {
        let mut soil = SoilMoisture::new(5.0).unwrap();
        // Surface empties (1.0); remaining demand 1.0 draws 1.0 * 4/5 from below.
        let wb = soil.step(0.0, 2.0);
        assert_relative_eq!(wb.l, 1.0 + 0.8);
        assert_relative_eq!(wb.et, 1.8);
        assert_relative_eq!(soil.surface(), 0.0);
        assert_relative_eq!(soil.underlying(), 3.2);
        // PL with a full surface covering PE.
        assert_relative_eq!(wb.pl, (2.0 - 1.0) * 4.0 / 5.0 + 1.0);
    }

    #[test]
    fn recharge_fills_surface_then_underlying() {
        let mut soil = SoilMoisture::new(5.0).unwrap();
        soil.step(0.0, 3.0);
        let before = soil;
        let wb = soil.step(3.0, 0.5);
        let room = 5.0 - before.total();
        assert_relative_eq!(wb.pr, room);
        assert_relative_eq!(wb.r, 2.5_f64.min(room));
        assert_relative_eq!(wb.ro, (2.5 - room).max(0.0), epsilon = 1e-12);
        assert_relative_eq!(soil.surface(), 1.0);
    }

    #[test]
    fn partial_surface_recharge() {
        let mut soil = SoilMoisture::new(5.0).unwrap();
        soil.step(0.0, 0.5);
        let wb = soil.step(0.8, 0.5);
        assert_relative_eq!(wb.r, 0.3);
        assert_relative_eq!(wb.ro, 0.0);
        assert_relative_eq!(soil.surface(), 0.8);
    }
}
