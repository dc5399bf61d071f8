//! # palmer-water-balance
//!
//! Two-layer bookkeeping soil model and the climatic coefficients derived
//! from it.
//!
//! ## Pipeline
//!
//! ```mermaid
//! graph LR
//!     A["P, PE (inches)"] -->|"simulate()"| B["WaterBalanceRun"]
//!     B -->|"per-period records"| C["ET, R, RO, L, PR, PRO, PL"]
//!     B -->|"calibration totals"| D["PeriodAccumulators"]
//!     D -->|"climatic_coefficients()"| E["alpha, beta, gamma, delta"]
//! ```
//!
//! The surface layer always holds one inch; the underlying layer holds the
//! remainder of the available water capacity (AWC). Moisture is removed
//! from the surface first and recharged into it first.
//!
//! ## Quick Start
//!
//! ```ignore
//! use palmer_water_balance::{climatic_coefficients, simulate};
//!
//! let run = simulate(&precip, &pet, awc, &layout, &window)?;
//! let coefs = climatic_coefficients(run.totals());
//! ```

mod accumulate;
mod coefficients;
mod error;
mod simulate;
mod soil;

pub use accumulate::{PeriodAccumulators, PeriodTotals};
pub use coefficients::{ClimaticCoefficients, climatic_coefficients};
pub use error::WaterBalanceError;
pub use simulate::{WaterBalanceRun, is_valid_period, simulate};
pub use soil::{Potentials, SURFACE_CAPACITY, SoilMoisture, WaterBalance};
