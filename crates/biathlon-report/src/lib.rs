//! Per-competitor trackers and final standings for the biathlon reporter.
//!
//! A [`Reporter`] is an event sink that keeps three trackers per registered
//! competitor and turns them into a [`Report`] once the stream is consumed.
//!
//! # Modules
//!
//! - [`laps`] -- Main lap times and speeds.
//! - [`report`] -- Report records, standings order, and rendering.
//! - [`reporter`] -- The [`Reporter`] sink and its per-competitor trackers.
//! - [`shooting`] -- Hits, penalty laps, and penalty loop speed.
//! - [`total_time`] -- Total race time and final state.
//!
//! [`Reporter`]: reporter::Reporter
//! [`Report`]: report::Report

pub mod laps;
pub mod report;
pub mod reporter;
pub mod shooting;
pub mod total_time;

pub use laps::{LapSplit, LapTimeTracker};
pub use report::{FinalState, Report, ReportRecord};
pub use reporter::{CompetitorTrackers, Reporter};
pub use shooting::{ShootingState, ShootingSummary, ShootingTracker};
pub use total_time::{TotalTimeState, TotalTimeTracker};
