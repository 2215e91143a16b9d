//! Application services for statistics reporting.

mod reporting;

pub use reporting::{SectorReport, StatsError, StatsResult, StatsService, UserReport};
