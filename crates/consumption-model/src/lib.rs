//! Consumption Data Model
//!
//! Domain types for monthly natural-gas consumption analysis: calendar
//! periods, winter seasons, per-installation reading series, and the
//! dataset with its building peer groups.

mod dataset;
mod period;
mod series;

pub use dataset::Dataset;
pub use period::{Period, PeriodParseError, WinterSeason, WINTER_MONTHS};
pub use series::{InstallationSeries, Observation};
