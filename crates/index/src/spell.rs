//! Spell state machine: turns the Z-index sequence into the incipient
//! (X1 wet, X2 dry) and established (X3) spell indices and the final PDSI.
//!
//! While neither incipient track is strong enough to establish a spell the
//! machine emits a provisional value and keeps both candidates pending.
//! When a spell is confirmed the pending slots are rewritten, newest first.

use palmer_stats::{MISSING, is_missing};

use crate::TOLERANCE;
use crate::duration::DurationFactors;

/// Incipient index magnitude at which a spell becomes established.
const ESTABLISH: f64 = 0.5;

/// Carried state between periods.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpellState {
    /// Incipient wet spell index.
    pub x1: f64,
    /// Incipient dry spell index.
    pub x2: f64,
    /// Established spell index; 0 when no spell is established.
    pub x3: f64,
    /// Effective wetness (or dryness) accumulated towards ending the spell.
    pub v: f64,
    /// Probability in percent that the established spell has ended.
    pub prob: f64,
    /// Moisture needed to end the spell, as of the last computation.
    pub q: f64,
}

/// Per-period outputs of one spell run, oldest first.
///
/// MISSING Z periods hold MISSING in every list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpellHistory {
    x: Vec<f64>,
    x1: Vec<f64>,
    x2: Vec<f64>,
    x3: Vec<f64>,
    prob: Vec<f64>,
}

impl SpellHistory {
    fn with_capacity(n: usize) -> Self {
        Self {
            x: Vec::with_capacity(n),
            x1: Vec::with_capacity(n),
            x2: Vec::with_capacity(n),
            x3: Vec::with_capacity(n),
            prob: Vec::with_capacity(n),
        }
    }

    fn push(&mut self, x: f64, state: &SpellState) {
        self.x.push(x);
        self.x1.push(state.x1);
        self.x2.push(state.x2);
        self.x3.push(state.x3);
        self.prob.push(state.prob);
    }

    fn push_missing(&mut self) {
        for list in [
            &mut self.x,
            &mut self.x1,
            &mut self.x2,
            &mut self.x3,
            &mut self.prob,
        ] {
            list.push(MISSING);
        }
    }

    /// Final index (PDSI) per period.
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    /// Incipient wet index per period.
    pub fn x1(&self) -> &[f64] {
        &self.x1
    }

    /// Incipient dry index per period.
    pub fn x2(&self) -> &[f64] {
        &self.x2
    }

    /// Established spell index per period.
    pub fn x3(&self) -> &[f64] {
        &self.x3
    }

    /// Probability in percent that the established spell has ended.
    pub fn prob(&self) -> &[f64] {
        &self.prob
    }

    /// Number of periods recorded.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Returns `true` if no period has been recorded.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Unresolved period: its output slot and both candidate values.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Pending {
    slot: usize,
    x1: f64,
    x2: f64,
}

/// Values computed for the current period before they are committed.
#[derive(Debug, Clone, Copy, Default)]
struct Next {
    x: f64,
    x1: f64,
    x2: f64,
    x3: f64,
    v: f64,
    prob: f64,
}

/// Sequential spell state machine.
///
/// # Example
///
/// ```
/// use palmer_index::{DurationFactors, SpellMachine};
///
/// let mut machine = SpellMachine::new(DurationFactors::PALMER, DurationFactors::PALMER);
/// for z in [1.2, -0.6, 1.5] {
///     machine.step(z);
/// }
/// let history = machine.finish();
/// assert_eq!(history.len(), 3);
/// assert!(history.x()[1] > 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct SpellMachine {
    wet: DurationFactors,
    dry: DurationFactors,
    state: SpellState,
    history: SpellHistory,
    pending: Vec<Pending>,
}

impl SpellMachine {
    /// Creates a machine in the neutral state with the given wet and dry
    /// duration factors.
    pub fn new(wet: DurationFactors, dry: DurationFactors) -> Self {
        Self {
            wet,
            dry,
            state: SpellState::default(),
            history: SpellHistory::default(),
            pending: Vec::new(),
        }
    }

    /// Current carried state.
    pub fn state(&self) -> &SpellState {
        &self.state
    }

    /// Number of periods whose final value is still provisional.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Outputs recorded so far.
    pub fn history(&self) -> &SpellHistory {
        &self.history
    }

    /// Consumes one Z-index value.
    ///
    /// A MISSING value records MISSING everywhere and leaves the state
    /// untouched.
    pub fn step(&mut self, z: f64) {
        if is_missing(z) {
            self.history.push_missing();
            return;
        }

        let x3 = self.state.x3;
        let (factors, wd) = if x3 >= 0.0 {
            (self.wet, 1.0)
        } else {
            (self.dry, -1.0)
        };
        let mb = factors.m() + factors.b();
        let c = factors.c();

        let mut next = Next::default();
        if x3 == 0.0 {
            self.choose_x(z, &mut next);
        } else {
            next.x3 = c * x3 + z / mb;
            let ze = mb * (wd * 0.5 - c * x3);
            let v = self.state.v;
            self.state.q = ze + v;
            let new_v = z - wd * factors.m() * 0.5 + wd * (wd * v + TOLERANCE).min(0.0);

            if wd * new_v > 0.0 {
                // The established spell is strengthening.
                next.x = next.x3;
                self.pending.clear();
            } else {
                next.v = new_v;
                next.prob = if self.state.q != 0.0 {
                    new_v / self.state.q * 100.0
                } else {
                    0.0
                };
                if next.prob >= 100.0 - TOLERANCE {
                    next.x3 = 0.0;
                    next.v = 0.0;
                    next.prob = 100.0;
                }
                self.choose_x(z, &mut next);
            }
        }

        self.state.x1 = next.x1;
        self.state.x2 = next.x2;
        self.state.x3 = next.x3;
        self.state.v = next.v;
        self.state.prob = next.prob;
        self.history.push(next.x, &self.state);
    }

    /// Consumes the machine and returns its outputs. Values still pending
    /// keep their provisional output.
    pub fn finish(self) -> SpellHistory {
        self.history
    }

    /// Updates both incipient tracks and decides the period's output when
    /// no established spell continues on its own.
    fn choose_x(&mut self, z: f64, next: &mut Next) {
        let x1 = (self.wet.c() * self.state.x1 + z / (self.wet.m() + self.wet.b())).max(0.0);
        let x2 = (self.dry.c() * self.state.x2 + z / (self.dry.m() + self.dry.b())).min(0.0);
        next.x1 = x1;
        next.x2 = x2;

        if x1 >= ESTABLISH && next.x3 == 0.0 {
            self.backtrack(x1);
            next.x = x1;
            next.x3 = x1;
            next.x1 = 0.0;
        } else if x2 <= -ESTABLISH && next.x3 == 0.0 {
            self.backtrack(x2);
            next.x = x2;
            next.x3 = x2;
            next.x2 = 0.0;
        } else if next.x3 == 0.0 {
            if x1 == 0.0 {
                self.backtrack(x2);
                next.x = x2;
            } else if x2 == 0.0 {
                self.backtrack(x1);
                next.x = x1;
            } else {
                self.defer(x1, x2);
                next.x = next.x3;
            }
        } else {
            self.defer(x1, x2);
            next.x = next.x3;
        }
    }

    fn defer(&mut self, x1: f64, x2: f64) {
        self.pending.push(Pending {
            slot: self.history.len(),
            x1,
            x2,
        });
    }

    /// Resolves every pending slot, newest first. Each slot takes the wet
    /// candidate after a positive value and the dry candidate otherwise,
    /// falling back to the other candidate when the chosen one is zero.
    fn backtrack(&mut self, confirmed: f64) {
        let mut last = confirmed;
        while let Some(p) = self.pending.pop() {
            let (pick, other) = if last > 0.0 { (p.x1, p.x2) } else { (p.x2, p.x1) };
            last = if pick.abs() <= TOLERANCE { other } else { pick };
            self.history.x[p.slot] = last;
        }
    }
}

/// Runs a fresh [`SpellMachine`] over the whole Z-index sequence.
pub fn run_spells(z: &[f64], wet: DurationFactors, dry: DurationFactors) -> SpellHistory {
    let mut machine = SpellMachine::new(wet, dry);
    machine.history = SpellHistory::with_capacity(z.len());
    for &v in z {
        machine.step(v);
    }
    machine.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn palmer() -> SpellMachine {
        SpellMachine::new(DurationFactors::PALMER, DurationFactors::PALMER)
    }

    #[test]
    fn zero_z_stays_neutral() {
        let mut m = palmer();
        for _ in 0..5 {
            m.step(0.0);
            assert_eq!(m.pending_len(), 0);
        }
        let h = m.finish();
        assert_eq!(h.x(), &[0.0; 5]);
        assert_eq!(h.x3(), &[0.0; 5]);
    }

    #[test]
    fn wet_confirmation_backtracks_provisional_slot() {
        let mut m = palmer();
        m.step(1.2);
        m.step(-0.6);
        assert_eq!(m.pending_len(), 1);
        assert_eq!(m.history().x()[1], 0.0);
        m.step(1.5);
        assert_eq!(m.pending_len(), 0);

        let h = m.finish();
        assert_relative_eq!(h.x()[0], 0.4, epsilon = 1e-12);
        assert_relative_eq!(h.x()[1], 0.1588, epsilon = 1e-12);
        assert_relative_eq!(h.x()[2], 0.6424436, epsilon = 1e-12);
        assert_relative_eq!(h.x3()[2], 0.6424436, epsilon = 1e-12);
        assert_eq!(h.x1()[2], 0.0);
    }

    #[test]
    fn dry_confirmation_from_neutral() {
        let h = run_spells(&[-2.0], DurationFactors::PALMER, DurationFactors::PALMER);
        assert_relative_eq!(h.x()[0], -2.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(h.x3()[0], -2.0 / 3.0, epsilon = 1e-12);
        assert_eq!(h.x2()[0], 0.0);
    }

    #[test]
    fn missing_holds_state() {
        let mut m = palmer();
        m.step(-2.0);
        let before = *m.state();
        m.step(MISSING);
        assert_eq!(*m.state(), before);
        let h = m.history();
        assert_eq!(h.x()[1], MISSING);
        assert_eq!(h.x1()[1], MISSING);
        assert_eq!(h.x2()[1], MISSING);
        assert_eq!(h.x3()[1], MISSING);
        assert_eq!(h.prob()[1], MISSING);
    }

    #[test]
    fn strengthening_spell_clears_pending() {
        let mut m = palmer();
        m.step(-2.0);
        // Weak recovery leaves the spell in place and defers the period.
        m.step(0.1);
        assert_eq!(m.pending_len(), 1);
        assert!(m.state().prob > 0.0);
        m.step(-3.0);
        assert_eq!(m.pending_len(), 0);
        let s = m.state();
        assert!(s.x3 < 0.0);
        assert_eq!(s.v, 0.0);
        assert_eq!(s.prob, 0.0);
        assert_eq!(s.x1, 0.0);
        assert_eq!(s.x2, 0.0);
    }

    #[test]
    fn strong_reversal_ends_spell() {
        let mut m = palmer();
        m.step(-2.0);
        m.step(6.0);
        let s = m.state();
        assert_eq!(s.prob, 100.0);
        assert!(s.x3 > 0.0, "a wet spell replaces the ended dry one");
        assert_eq!(m.pending_len(), 0);
    }

    #[test]
    fn run_spells_matches_stepping() {
        let z = [0.3, -1.1, 0.2, MISSING, 2.5, -0.4, -3.0, 0.0];
        let mut m = palmer();
        for &v in &z {
            m.step(v);
        }
        assert_eq!(
            run_spells(&z, DurationFactors::PALMER, DurationFactors::PALMER),
            m.finish()
        );
    }
}
