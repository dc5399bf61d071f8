use approx::assert_relative_eq;
use palmer_calendar::{CalibrationWindow, Frequency, SeriesLayout};
use palmer_water_balance::{SoilMoisture, climatic_coefficients, simulate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seeded uniform draws in `[0, scale)`.
fn uniform(seed: u64, n: usize, scale: f64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| rng.random_range(0.0..scale)).collect()
}

// ---------------------------------------------------------------------------
// Layer bounds and mass balance
// ---------------------------------------------------------------------------

#[test]
fn layers_stay_within_capacity() {
    let precip = uniform(1, 600, 6.0);
    let pet = uniform(2, 600, 5.0);
    for awc in [0.5, 1.0, 3.0, 7.5, 12.0] {
        let mut soil = SoilMoisture::new(awc).unwrap();
        let cap = soil.awc();
        for (&p, &pe) in precip.iter().zip(&pet) {
            soil.step(p, pe);
            assert!(soil.surface() >= -1e-12 && soil.surface() <= 1.0 + 1e-12);
            assert!(soil.underlying() >= -1e-12 && soil.underlying() <= cap - 1.0 + 1e-12);
        }
    }
}

#[test]
fn each_period_balances_water() {
    let precip = uniform(3, 240, 5.0);
    let pet = uniform(4, 240, 5.0);
    let mut soil = SoilMoisture::new(6.0).unwrap();
    for (&p, &pe) in precip.iter().zip(&pet) {
        let before = soil.total();
        let wb = soil.step(p, pe);
        let after = soil.total();
        // P = ET + R + RO - L, and storage changes by R - L.
        assert_relative_eq!(p, wb.et + wb.r + wb.ro - wb.l, epsilon = 1e-9);
        assert_relative_eq!(after - before, wb.r - wb.l, epsilon = 1e-9);
        assert!(wb.pl <= wb.pro + 1e-12);
        assert_relative_eq!(wb.pr + wb.pro, soil.awc(), epsilon = 1e-12);
    }
}

// ---------------------------------------------------------------------------
// Coefficients from a full pass
// ---------------------------------------------------------------------------

#[test]
fn loss_and_recharge_coefficients_are_fractions() {
    let layout = SeriesLayout::new(1951, 1980, Frequency::Monthly).unwrap();
    let window = CalibrationWindow::full(&layout);
    let n = layout.n_periods();
    let run = simulate(&uniform(5, n, 5.0), &uniform(6, n, 4.0), 4.0, &layout, &window).unwrap();
    let coefs = climatic_coefficients(run.totals());
    assert_eq!(coefs.len(), 12);
    for c in coefs {
        // Runoff may exceed stored moisture after heavy rain, so gamma is
        // only bounded below.
        for v in [c.alpha, c.beta, c.delta] {
            assert!((0.0..=1.0 + 1e-12).contains(&v), "coefficient {v}");
        }
        assert!(c.gamma >= 0.0);
    }
}
