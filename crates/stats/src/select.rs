//! Order-statistic selection.

use std::cmp::Ordering;

/// Partially reorders `values` so the `k`-th smallest (1-based) sits at
/// index `k - 1`, with nothing larger to its left and nothing smaller to
/// its right.
///
/// Quickselect with a Lomuto partition around the rightmost element of the
/// active range.
///
/// # Panics
///
/// Panics if `k` is 0 or greater than `values.len()`.
pub fn select_kth(values: &mut [f64], k: usize) {
    assert!(
        k >= 1 && k <= values.len(),
        "select_kth: k={k} out of range 1..={}",
        values.len()
    );
    let target = k - 1;
    let mut lo = 0;
    let mut hi = values.len() - 1;
    while lo < hi {
        let pivot = partition(values, lo, hi);
        match pivot.cmp(&target) {
            Ordering::Equal => return,
            Ordering::Greater => hi = pivot - 1,
            Ordering::Less => lo = pivot + 1,
        }
    }
}

fn partition(values: &mut [f64], lo: usize, hi: usize) -> usize {
    let pivot = values[hi];
    let mut store = lo;
    for i in lo..hi {
        if values[i] < pivot {
            values.swap(i, store);
            store += 1;
        }
    }
    values.swap(store, hi);
    store
}

/// Returns the `k`-th smallest value (1-based) without modifying `values`.
///
/// `k == 1` and `k == len` are answered with a linear min/max scan.
/// Returns `None` if `k` is 0 or exceeds the number of values.
pub fn kth_smallest(values: &[f64], k: usize) -> Option<f64> {
    let n = values.len();
    if k < 1 || k > n {
        return None;
    }
    if k == 1 {
        return values.iter().copied().reduce(f64::min);
    }
    if k == n {
        return values.iter().copied().reduce(f64::max);
    }
    let mut scratch = values.to_vec();
    select_kth(&mut scratch, k);
    Some(scratch[k - 1])
}
