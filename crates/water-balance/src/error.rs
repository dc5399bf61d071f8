//! Error types for the palmer-water-balance crate.

/// Error type for all fallible operations in the palmer-water-balance crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WaterBalanceError {
    /// Returned when the available water capacity is non-finite or not positive.
    #[error("invalid available water capacity: {awc} (must be finite and > 0)")]
    InvalidAwc {
        /// The rejected capacity in inches.
        awc: f64,
    },

    /// Returned when precipitation and PE series differ in length.
    #[error("length mismatch: precip has {precip} periods, pet has {pet}")]
    LengthMismatch {
        /// Length of the precipitation series.
        precip: usize,
        /// Length of the PE series.
        pet: usize,
    },

    /// Returned when the series length does not match the layout.
    #[error("period count mismatch: layout has {expected} periods, series has {got}")]
    PeriodCountMismatch {
        /// Number of periods in the layout.
        expected: usize,
        /// Number of periods provided.
        got: usize,
    },
}
