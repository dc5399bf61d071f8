//! # palmer-calendar
//!
//! Period arithmetic for regularly sampled climate series: sampling
//! frequencies, year/period indexing, calibration windows and month lengths.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     A["Frequency"] -->|"periods_per_year()"| B["SeriesLayout"]
//!     B -->|"index_of / year_of / period_of"| C["series index"]
//!     B -->|"CalibrationWindow::new()"| D["CalibrationWindow"]
//!     D -->|"start_skip_periods / calibration_periods"| E["calibration subset"]
//!     A -->|"duration_lengths()"| F["spell window lengths"]
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use palmer_calendar::{CalibrationWindow, Frequency, SeriesLayout};
//!
//! let layout = SeriesLayout::new(1950, 2000, Frequency::Monthly)?;
//! let window = CalibrationWindow::new(&layout, 1961, 1990)?;
//! assert_eq!(window.start_skip_periods(), 132);
//! assert_eq!(window.calibration_periods(), 360);
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `frequency` | Sampling frequencies and duration window tables |
//! | `layout` | Year/period geometry of a series |
//! | `window` | Calibration interval within a series |
//! | `days` | Gregorian month lengths |
//! | `error` | Error types |

mod days;
mod error;
mod frequency;
mod layout;
mod window;

pub use days::{days_in_month, is_leap_year};
pub use error::CalendarError;
pub use frequency::Frequency;
pub use layout::SeriesLayout;
pub use window::CalibrationWindow;
