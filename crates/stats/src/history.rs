//! Double-ended history list used for output series and rolling windows.

use std::collections::VecDeque;

use crate::select::kth_smallest;
use crate::is_missing;

/// Ordered sequence of period values, oldest at the front.
///
/// Values are appended at the newest end and may be removed from either
/// end. [`crate::MISSING`] entries may be stored; the order statistics skip them.
/// `Clone` produces an independent deep copy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryList {
    values: VecDeque<f64>,
}

impl HistoryList {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty list with room for `capacity` values.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: VecDeque::with_capacity(capacity),
        }
    }

    /// Appends `value` at the newest end.
    pub fn push(&mut self, value: f64) {
        self.values.push_back(value);
    }

    /// Removes and returns the oldest value, or `None` if empty.
    pub fn pop_front(&mut self) -> Option<f64> {
        self.values.pop_front()
    }

    /// Removes and returns the newest value, or `None` if empty.
    pub fn pop_back(&mut self) -> Option<f64> {
        self.values.pop_back()
    }

    /// Returns the oldest value without removing it.
    pub fn front(&self) -> Option<f64> {
        self.values.front().copied()
    }

    /// Returns the newest value without removing it.
    pub fn back(&self) -> Option<f64> {
        self.values.back().copied()
    }

    /// Number of stored values, including MISSING entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the list holds no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Removes up to `n` values from the oldest end.
    pub fn truncate_front(&mut self, n: usize) {
        let n = n.min(self.values.len());
        self.values.drain(..n);
    }

    /// Removes up to `n` values from the newest end.
    pub fn truncate_back(&mut self, n: usize) {
        let keep = self.values.len().saturating_sub(n);
        self.values.truncate(keep);
    }

    /// Iterates from oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = f64> + '_ {
        self.values.iter().copied()
    }

    /// Copies the values into a vector ordered oldest to newest.
    pub fn to_vec(&self) -> Vec<f64> {
        self.values.iter().copied().collect()
    }

    /// Sum of the non-missing values.
    pub fn sum(&self) -> f64 {
        self.valid().sum()
    }

    /// Smallest non-missing value.
    pub fn min(&self) -> Option<f64> {
        self.valid().reduce(f64::min)
    }

    /// Largest non-missing value.
    pub fn max(&self) -> Option<f64> {
        self.valid().reduce(f64::max)
    }

    /// Order-statistic percentile of the non-missing values.
    ///
    /// `p` is a fraction in `[0, 1]`; values above 1 are read as a whole
    /// percentage and divided by 100. The result is the `floor(p * n)`-th
    /// smallest of the `n` valid values, except that `p = 0.5` follows the
    /// [`HistoryList::median`] rule, so `percentile(0.5)` of `[1, 2, 3, 4]`
    /// is 2.5.
    ///
    /// Returns `None` when no valid values remain or the rank falls outside
    /// `1..=n`.
    ///
    /// The two scales overlap at 1: `percentile(1.0)` is the maximum, not
    /// the 1st percentile. Pass `0.01` (or any value in `(0, 1]`) as a
    /// fraction when a low percentile is meant.
    pub fn percentile(&self, p: f64) -> Option<f64> {
        let p = if p > 1.0 { p / 100.0 } else { p };
        if p == 0.5 {
            return self.median();
        }
        let valid: Vec<f64> = self.valid().collect();
        let rank = (p * valid.len() as f64).floor();
        if rank < 1.0 {
            return None;
        }
        kth_smallest(&valid, rank as usize)
    }

    /// Median of the non-missing values; an even count averages the two
    /// central order statistics.
    pub fn median(&self) -> Option<f64> {
        let valid: Vec<f64> = self.valid().collect();
        let n = valid.len();
        if n == 0 {
            return None;
        }
        if n % 2 == 1 {
            kth_smallest(&valid, n.div_ceil(2))
        } else {
            let lo = kth_smallest(&valid, n / 2)?;
            let hi = kth_smallest(&valid, n / 2 + 1)?;
            Some((lo + hi) / 2.0)
        }
    }

    /// Quartile `q` of the non-missing values: 0 is the minimum, 2 the
    /// median, 4 the maximum.
    ///
    /// Q1 and Q3 interpolate between neighbouring order statistics with
    /// weights in quarters, depending on `(n - 1) % 4`.
    pub fn quartile(&self, q: u8) -> Option<f64> {
        let valid: Vec<f64> = self.valid().collect();
        let n = valid.len();
        if n == 0 {
            return None;
        }
        match q {
            0 => kth_smallest(&valid, 1),
            2 => self.median(),
            4 => kth_smallest(&valid, n),
            1 | 3 => {
                let q = q as usize;
                let rem = (n - 1) % 4;
                if rem == 0 {
                    kth_smallest(&valid, 1 + q * (n - 1) / 4)
                } else {
                    let bottom = q * (n - 1) / 4;
                    let lower = kth_smallest(&valid, bottom + 1)?;
                    let upper = kth_smallest(&valid, bottom + 2)?;
                    Some(((4 - rem) as f64 * lower + rem as f64 * upper) / 4.0)
                }
            }
            _ => None,
        }
    }

    fn valid(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied().filter(|v| !is_missing(*v))
    }
}

impl From<Vec<f64>> for HistoryList {
    fn from(values: Vec<f64>) -> Self {
        Self {
            values: values.into(),
        }
    }
}

impl FromIterator<f64> for HistoryList {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl Extend<f64> for HistoryList {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        self.values.extend(iter);
    }
}
