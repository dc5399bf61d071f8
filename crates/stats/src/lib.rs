//! Order statistics and sequential history containers for the Palmer engine.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `select` | In-place quickselect and k-th order statistics |
//! | `history` | Double-ended history list with MISSING-aware percentiles |

mod history;
mod select;

pub use history::HistoryList;
pub use select::{kth_smallest, select_kth};

/// Sentinel marking an absent or invalid period value.
pub const MISSING: f64 = -999.0;

/// Returns `true` if `value` is the [`MISSING`] sentinel or NaN.
#[inline]
pub fn is_missing(value: f64) -> bool {
    value == MISSING || value.is_nan()
}

/// Arithmetic mean of the non-missing values. Returns `None` if there are none.
pub fn mean(data: &[f64]) -> Option<f64> {
    let (sum, n) = data
        .iter()
        .filter(|v| !is_missing(**v))
        .fold((0.0, 0usize), |(s, n), &v| (s + v, n + 1));
    if n == 0 { None } else { Some(sum / n as f64) }
}
