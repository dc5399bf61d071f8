//! Duration factors: how strongly one period's Z-index moves the
//! cumulative spell index.
//!
//! For each candidate spell length the most extreme calibration-interval
//! Z sum is found. A line through (length, sum) is fitted and read as the
//! accumulation needed to reach an index of ±4, giving `m` (slope) and `b`
//! (intercept) for the recurrence `X[i] = c·X[i-1] + Z[i] / (m + b)`.

use palmer_calendar::{CalibrationWindow, Frequency};
use palmer_stats::{HistoryList, is_missing};
use tracing::debug;

/// Correlation the regression must reach before it stops dropping the
/// longest candidate lengths.
const CORRELATION_TARGET: f64 = 0.85;

/// Minimum number of points the regression keeps.
const MIN_POINTS: usize = 4;

/// Wet window sums beyond this multiple of their 98th percentile are
/// treated as anomalies.
const REASONABLE_TOL: f64 = 1.25;

/// Direction of a spell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    /// Wet spells (positive Z sums).
    Wet,
    /// Dry spells (negative Z sums).
    Dry,
}

impl Sign {
    /// `1.0` for wet, `-1.0` for dry.
    #[inline]
    pub fn value(self) -> f64 {
        match self {
            Sign::Wet => 1.0,
            Sign::Dry => -1.0,
        }
    }
}

/// Duration factors `(m, b)` of one spell sign.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DurationFactors {
    m: f64,
    b: f64,
}

impl DurationFactors {
    /// Palmer's monthly factors (`p = 0.897`, `q = 1/3`).
    pub const PALMER: Self = Self { m: 0.309, b: 2.691 };

    /// Weekly factors used by the Climate Prediction Center.
    pub const CPC_WEEKLY: Self = Self { m: 2.925, b: 0.075 };

    /// Creates factors from slope `m` and intercept `b`.
    pub fn new(m: f64, b: f64) -> Self {
        Self { m, b }
    }

    /// Creates factors from the duration constants: `m = (1 - p) / q`,
    /// `b = p / q`.
    pub fn from_pq(p: f64, q: f64) -> Self {
        Self {
            m: (1.0 - p) / q,
            b: p / q,
        }
    }

    /// Slope.
    pub fn m(&self) -> f64 {
        self.m
    }

    /// Intercept.
    pub fn b(&self) -> f64 {
        self.b
    }

    /// Persistence `1 - m / (m + b)`; equal to `c`.
    pub fn p(&self) -> f64 {
        1.0 - self.m / (self.m + self.b)
    }

    /// Weight of the current Z-index, `1 / (m + b)`.
    pub fn q(&self) -> f64 {
        1.0 / (self.m + self.b)
    }

    /// Decay applied to the previous index value.
    #[inline]
    pub fn c(&self) -> f64 {
        self.p()
    }

    /// Returns `true` if the factors can drive the spell recurrence.
    pub fn is_usable(&self) -> bool {
        self.m.is_finite() && self.b.is_finite() && self.m + self.b > 0.0
    }
}

/// Least-squares line fitted by [`anchored_regression`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchoredFit {
    /// Slope of the fitted line.
    pub slope: f64,
    /// Intercept, anchored on the point with the largest signed residual.
    pub intercept: f64,
    /// Correlation of the kept points.
    pub correlation: f64,
    /// Number of leading points kept.
    pub points: usize,
}

/// Most extreme sum of `length` consecutive non-missing Z values inside the
/// calibration window.
///
/// MISSING values are skipped and extend the window. At most
/// `window.calibration_periods()` values are consumed after skipping the
/// periods before the calibration interval.
///
/// The dry sign returns the lowest sum. The wet sign returns the highest
/// positive sum that is less than 25% above the 98th percentile of all
/// window sums, or 0 when no such sum exists; the wet sign alone is filtered.
pub fn extreme_z_sum(z: &[f64], window: &CalibrationWindow, length: usize, sign: Sign) -> f64 {
    let s = sign.value();
    let mut values = z.iter().copied().skip(window.start_skip_periods());
    let mut left = window.calibration_periods();

    let mut in_window = HistoryList::with_capacity(length);
    let mut sum = 0.0;
    while in_window.len() < length {
        let Some(v) = values.next() else { break };
        left = left.saturating_sub(1);
        if !is_missing(v) {
            sum += v;
            in_window.push(v);
        }
    }

    let mut max_sum = sum;
    let mut sums = HistoryList::new();
    sums.push(sum);
    while left > 0 {
        let Some(v) = values.next() else { break };
        left -= 1;
        if !is_missing(v) {
            if let Some(oldest) = in_window.pop_front() {
                sum -= oldest;
            }
            sum += v;
            in_window.push(v);
            sums.push(sum);
        }
        if s * sum > s * max_sum {
            max_sum = sum;
        }
    }

    match sign {
        Sign::Dry => max_sum,
        Sign::Wet => {
            let p98 = sums.percentile(0.98);
            sums.iter()
                .filter(|&v| v > 0.0)
                .filter(|&v| p98.is_none_or(|p| v / p < REASONABLE_TOL))
                .fold(0.0, f64::max)
        }
    }
}

/// Least-squares line through `(x, y)` that drops trailing points while the
/// signed correlation stays below 0.85 and more than four points remain.
///
/// The slope comes from the kept points. The intercept passes through the
/// kept point with the largest signed residual above the slope line, or is
/// `-slope * x[0]` when no residual has the requested sign.
///
/// # Panics
///
/// Panics if `x` and `y` differ in length or are empty.
pub fn anchored_regression(x: &[f64], y: &[f64], sign: Sign) -> AnchoredFit {
    assert_eq!(x.len(), y.len(), "x and y must have the same length");
    assert!(!x.is_empty(), "regression needs at least one point");
    let s = sign.value();

    let mut sum_x: f64 = x.iter().sum();
    let mut sum_y: f64 = y.iter().sum();
    let mut sum_x2: f64 = x.iter().map(|v| v * v).sum();
    let mut sum_y2: f64 = y.iter().map(|v| v * v).sum();
    let mut sum_xy: f64 = x.iter().zip(y).map(|(a, b)| a * b).sum();

    let moments = |n: f64, sx: f64, sy: f64, sx2: f64, sy2: f64, sxy: f64| {
        let ssx = sx2 - sx * sx / n;
        let ssy = sy2 - sy * sy / n;
        let ssxy = sxy - sx * sy / n;
        (ssx, ssxy, ssxy / (ssx.sqrt() * ssy.sqrt()))
    };

    let mut kept = x.len();
    let (mut ssx, mut ssxy, mut correlation) =
        moments(kept as f64, sum_x, sum_y, sum_x2, sum_y2, sum_xy);
    while s * correlation < CORRELATION_TARGET && kept > MIN_POINTS {
        kept -= 1;
        let (xi, yi) = (x[kept], y[kept]);
        sum_x -= xi;
        sum_y -= yi;
        sum_x2 -= xi * xi;
        sum_y2 -= yi * yi;
        sum_xy -= xi * yi;
        (ssx, ssxy, correlation) = moments(kept as f64, sum_x, sum_y, sum_x2, sum_y2, sum_xy);
    }

    let slope = ssxy / ssx;
    let mut anchor = (x[0], 0.0);
    let mut max_diff = 0.0;
    for (&xi, &yi) in x[..kept].iter().zip(&y[..kept]) {
        let diff = yi - slope * xi;
        if s * diff > s * max_diff {
            max_diff = diff;
            anchor = (xi, yi);
        }
    }

    AnchoredFit {
        slope,
        intercept: anchor.1 - slope * anchor.0,
        correlation,
        points: kept,
    }
}

/// Estimates the duration factors of one sign from the unscaled Z-index.
///
/// The candidate lengths come from [`Frequency::duration_lengths`]. The
/// fitted line represents an index of ±4, so slope and intercept are both
/// divided by `sign × 4`. The result may be unusable (see
/// [`DurationFactors::is_usable`]) for degenerate series; callers decide
/// the fallback.
#[tracing::instrument(skip_all, fields(sign = ?sign, frequency = %frequency))]
pub fn estimate(
    z: &[f64],
    window: &CalibrationWindow,
    frequency: Frequency,
    sign: Sign,
) -> DurationFactors {
    let lengths = frequency.duration_lengths();
    let x: Vec<f64> = lengths.iter().map(|&l| l as f64).collect();
    let y: Vec<f64> = lengths
        .iter()
        .map(|&l| extreme_z_sum(z, window, l, sign))
        .collect();
    let fit = anchored_regression(&x, &y, sign);
    let scale = sign.value() * 4.0;
    let factors = DurationFactors::new(fit.slope / scale, fit.intercept / scale);
    debug!(
        points = fit.points,
        correlation = fit.correlation,
        m = factors.m,
        b = factors.b,
        "duration factors estimated"
    );
    factors
}
