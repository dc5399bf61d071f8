//! Per-period-of-year sums over the calibration interval.

use crate::soil::WaterBalance;

/// Sums of the water-balance terms for one period of the year.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PeriodTotals {
    /// Actual evapotranspiration.
    pub et: f64,
    /// Actual recharge.
    pub r: f64,
    /// Actual runoff.
    pub ro: f64,
    /// Actual loss.
    pub l: f64,
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
    /// Number of periods accumulated.
    pub count: usize,
}

impl PeriodTotals {
    /// Adds one period's water balance.
    pub fn add(&mut self, wb: &WaterBalance) {
        self.et += wb.et;
        self.r += wb.r;
        self.ro += wb.ro;
        self.l += wb.l;
        self.p += wb.p;
        self.pe += wb.pe;
        self.pr += wb.pr;
        self.pro += wb.pro;
        self.pl += wb.pl;
        self.count += 1;
    }
}

/// One [`PeriodTotals`] per period of the year.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodAccumulators {
    totals: Vec<PeriodTotals>,
}

impl PeriodAccumulators {
    /// Creates zeroed accumulators for `periods_per_year` periods.
    pub fn new(periods_per_year: usize) -> Self {
        Self {
            totals: vec![PeriodTotals::default(); periods_per_year],
        }
    }

    /// Adds `wb` to the totals of 0-based period-of-year `period`.
    pub fn add(&mut self, period: usize, wb: &WaterBalance) {
        self.totals[period].add(wb);
    }

    /// Totals of 0-based period-of-year `period`.
    pub fn get(&self, period: usize) -> &PeriodTotals {
        &self.totals[period]
    }

    /// Totals for every period of the year, in order.
    pub fn as_slice(&self) -> &[PeriodTotals] {
        &self.totals
    }

    /// Number of periods per year.
    pub fn len(&self) -> usize {
        self.totals.len()
    }

    /// Returns `true` if there are no periods.
    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }
}
