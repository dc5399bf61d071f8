//! # palmer-pet
//!
//! Unit handling and temperature-driven potential evapotranspiration for
//! the Palmer water balance.
//!
//! ## Pipeline
//!
//! ```text
//! normal temperatures + latitude ─▶ ThornthwaiteSite (heat index I, exponent A)
//! period temperatures (°F)       ─▶ potential_evapotranspiration() ─▶ PE (inches)
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use palmer_calendar::{Frequency, SeriesLayout};
//! use palmer_pet::{ThornthwaiteSite, Units, potential_evapotranspiration};
//!
//! let site = ThornthwaiteSite::new(40.0, &normals_c, Units::Metric)?;
//! let layout = SeriesLayout::new(1950, 2000, Frequency::Monthly)?;
//! let temps_f = Units::Metric.temperatures_to_fahrenheit(&temps_c);
//! let pe = potential_evapotranspiration(&temps_f, &layout, &site)?;
//! ```

mod error;
mod thornthwaite;
mod units;

pub use error::PetError;
pub use thornthwaite::{ThornthwaiteSite, potential_evapotranspiration};
pub use units::{Units, celsius_to_fahrenheit, mm_to_inches};
