//! # palmer-index
//!
//! Self-calibrating Palmer drought indices: PDSI, PHDI, WPLM, the Z-index
//! and the Crop Moisture Index.
//!
//! ## Pipeline
//!
//! ```mermaid
//! graph LR
//!     A["P, PE (or T)"] -->|"simulate()"| B["water balance"]
//!     B -->|"climatic_coefficients()"| C["alpha, beta, gamma, delta"]
//!     C -->|"departures()"| D["d, D"]
//!     D -->|"weighting_factors(), z_index()"| E["Z-index"]
//!     E -->|"estimate()"| F["duration factors (m, b)"]
//!     E -->|"SpellMachine"| G["X1, X2, X3, PDSI"]
//!     G -->|"self_calibrate()"| E
//!     G --> H["PalmerResult"]
//! ```
//!
//! The self-calibrating method fits the duration factors to the station's
//! own Z-index and rescales the Z-index until the calibration-interval 2nd
//! and 98th percentiles of the PDSI sit near -4 and +4. The original
//! method uses Palmer's fixed constants.
//!
//! ## Quick Start
//!
//! ```ignore
//! use palmer_index::{PalmerConfig, compute_palmer};
//!
//! let config = PalmerConfig::new(150.0, 1950, 2010).with_calibration(1961, 1990);
//! let result = compute_palmer(&precip_mm, &pet_mm, &config)?;
//! let pdsi = result.pdsi();
//! let params = result.parameters();
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `anomaly` | CAFEC precipitation and departures |
//! | `zindex` | Weighting factor `k` and the Z-index |
//! | `duration` | Duration factor estimation |
//! | `spell` | Spell state machine with backtracking |
//! | `calibrate` | Percentile-based self-calibration |
//! | `cmi` | Crop Moisture Index |
//! | `engine` | Validation and the full pipeline |

mod anomaly;
mod calibrate;
mod cmi;
mod config;
mod duration;
mod engine;
mod error;
mod result;
mod spell;
mod zindex;

/// Comparison tolerance for probability snapping, WPLM selection and
/// backtracking.
pub const TOLERANCE: f64 = 0.00001;

pub use anomaly::{DepartureStats, Departures, cafec_precipitation, departures};
pub use calibrate::{Calibration, CalibrationRatios, calibration_ratios, rescale, self_calibrate};
pub use cmi::crop_moisture_index;
pub use config::{CoefficientSet, Method, PalmerConfig};
pub use duration::{
    AnchoredFit, DurationFactors, Sign, anchored_regression, estimate, extreme_z_sum,
};
pub use engine::{compute_palmer, compute_palmer_from_temperature};
pub use error::PalmerError;
pub use result::{
    CalibrationParameters, PalmerResult, PeriodCoefficients, PeriodRecord, phdi_value, wplm_value,
};
pub use spell::{SpellHistory, SpellMachine, SpellState, run_spells};
pub use zindex::{climatic_characteristic, original_scale, weighting_factors, z_index};

pub use palmer_calendar::Frequency;
pub use palmer_pet::{ThornthwaiteSite, Units};
pub use palmer_stats::{MISSING, is_missing};
