//! Shared type definitions for the biathlon race reporter.
//!
//! This crate is the single source of truth for the facts that flow through
//! the scoring engine. Every other crate in the workspace depends on it.
//!
//! # Modules
//!
//! - [`ids`] -- Competitor identifier newtype
//! - [`event`] -- The [`Event`] fact type and the closed [`EventKind`] enumeration
//! - [`time`] -- Clock time parsing and duration formatting (`HH:MM:SS.mmm`)

pub mod event;
pub mod ids;
pub mod time;

// Re-export all public types at crate root for convenience.
pub use event::{Event, EventKind};
pub use ids::CompetitorId;
pub use time::{
    CLOCK_FORMAT, TimeFormatError, format_clock_time, format_duration, parse_clock_duration,
    parse_clock_time, parse_clock_time_relaxed, seconds_f64, since_midnight,
};
