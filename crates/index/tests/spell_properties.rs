use approx::assert_relative_eq;
use palmer_index::{DurationFactors, MISSING, SpellMachine, is_missing, run_spells};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_z(rng: &mut StdRng, n: usize) -> Vec<f64> {
    (0..n)
        .map(|_| {
            if rng.random_range(0..40) == 0 {
                MISSING
            } else {
                rng.random_range(-3.0..3.0)
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Output membership
// ---------------------------------------------------------------------------

#[test]
fn output_is_one_of_the_tracked_indices() {
    let mut rng = StdRng::seed_from_u64(42);
    let wet = DurationFactors::new(0.4, 2.2);
    let dry = DurationFactors::new(0.25, 3.1);
    for _ in 0..50 {
        let z = random_z(&mut rng, 300);
        let h = run_spells(&z, wet, dry);
        for i in 0..z.len() {
            if is_missing(z[i]) {
                assert_eq!(h.x()[i], MISSING);
                continue;
            }
            let x = h.x()[i];
            assert!(
                x == h.x1()[i] || x == h.x2()[i] || x == h.x3()[i],
                "period {i}: x = {x} not in ({}, {}, {})",
                h.x1()[i],
                h.x2()[i],
                h.x3()[i]
            );
        }
    }
}

#[test]
fn incipient_tracks_keep_their_sign() {
    let mut rng = StdRng::seed_from_u64(7);
    let z = random_z(&mut rng, 2000);
    let h = run_spells(&z, DurationFactors::PALMER, DurationFactors::PALMER);
    for i in 0..z.len() {
        if is_missing(z[i]) {
            continue;
        }
        assert!(h.x1()[i] >= 0.0);
        assert!(h.x2()[i] <= 0.0);
        assert!(h.prob()[i] <= 100.0);
    }
}

// ---------------------------------------------------------------------------
// Backtracking
// ---------------------------------------------------------------------------

#[test]
fn establishing_a_spell_resolves_all_pending() {
    let mut rng = StdRng::seed_from_u64(3);
    let z = random_z(&mut rng, 3000);
    let mut m = SpellMachine::new(DurationFactors::PALMER, DurationFactors::PALMER);
    let mut established = 0;
    for &v in &z {
        let before = m.state().x3;
        m.step(v);
        if before == 0.0 && m.state().x3 != 0.0 {
            established += 1;
            assert_eq!(m.pending_len(), 0);
        }
    }
    assert!(established > 0);
}

#[test]
fn dry_confirmation_rewrites_each_pending_slot() {
    // Palmer factors: c = 0.897, z / (m + b) = z / 3.
    let mut m = SpellMachine::new(DurationFactors::PALMER, DurationFactors::PALMER);
    m.step(1.2);
    m.step(-0.6);
    m.step(-0.3);
    assert_eq!(m.pending_len(), 2);
    assert_eq!(&m.history().x()[1..], &[0.0, 0.0]);
    assert_relative_eq!(m.state().x1, 0.0424436, epsilon = 1e-12);
    assert_relative_eq!(m.state().x2, -0.2794, epsilon = 1e-12);

    m.step(-1.2);
    assert_eq!(m.pending_len(), 0);
    let h = m.finish();
    // Slot 0 was already final; slots 1 and 2 take their dry candidates.
    assert_relative_eq!(h.x()[0], 0.4, epsilon = 1e-12);
    assert_relative_eq!(h.x()[1], -0.2, epsilon = 1e-12);
    assert_relative_eq!(h.x()[2], -0.2794, epsilon = 1e-12);
    assert_relative_eq!(h.x()[3], -0.6506218, epsilon = 1e-12);
    assert_relative_eq!(h.x3()[3], -0.6506218, epsilon = 1e-12);
    assert_eq!(h.x1()[3], 0.0);
    assert_eq!(h.x2()[3], 0.0);
}

#[test]
fn pending_slots_are_provisional_until_resolved() {
    let mut rng = StdRng::seed_from_u64(11);
    let z: Vec<f64> = (0..1500).map(|_| rng.random_range(-1.2..1.2)).collect();
    let mut m = SpellMachine::new(DurationFactors::PALMER, DurationFactors::PALMER);
    for &v in &z {
        m.step(v);
        if m.pending_len() > 0 && m.state().x3 == 0.0 {
            assert_eq!(*m.history().x().last().unwrap(), 0.0);
        }
    }
}

#[test]
fn neutral_run_never_defers() {
    let mut m = SpellMachine::new(DurationFactors::PALMER, DurationFactors::PALMER);
    for _ in 0..5 {
        m.step(0.0);
        assert_eq!(m.pending_len(), 0);
    }
    assert!(m.finish().x().iter().all(|&v| v == 0.0));
}
