//! Error types for the palmer-pet crate.

/// Error type for all fallible operations in the palmer-pet crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PetError {
    /// Returned when the site latitude is non-finite or outside [-90, 90].
    #[error("invalid latitude: {latitude} (must be within -90..=90)")]
    InvalidLatitude {
        /// The rejected latitude in degrees.
        latitude: f64,
    },

    /// Returned when the normal temperature table is neither monthly nor weekly.
    #[error("wrong number of normal temperatures: got {got}, need 12 or 52")]
    WrongNormalCount {
        /// Number of normals provided.
        got: usize,
    },

    /// Returned when no normal temperature is above freezing.
    #[error("thornthwaite heat index is zero: no normal temperature above 32F")]
    ZeroHeatIndex,

    /// Returned when a monthly site is used with a weekly series or vice versa.
    #[error("site normals have {normals} periods but the series is {frequency}")]
    FrequencyMismatch {
        /// Number of normals the site was built from.
        normals: usize,
        /// Name of the series frequency.
        frequency: String,
    },

    /// Returned when a series period cannot be mapped to a calendar month.
    #[error(transparent)]
    Calendar(#[from] palmer_calendar::CalendarError),
}
