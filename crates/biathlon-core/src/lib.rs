//! Event dispatch, referees, and race configuration for the biathlon
//! reporter.
//!
//! Events flow from the [`parser`] into a [`Competition`], which pushes each
//! one through its root sink and then drains whatever the referees
//! synthesized in response before accepting the next event.
//!
//! # Modules
//!
//! - [`competition`] -- Root dispatch for one race and its traffic counters.
//! - [`config`] -- Race configuration loading from JSON or YAML.
//! - [`feedback`] -- Per-race queue of synthesized events.
//! - [`parser`] -- Line-oriented event log parsing.
//! - [`referee`] -- Start and finish referees that synthesize
//!   disqualification and finish events.
//! - [`registry`] -- Lazily populated per-competitor sink arena.
//! - [`rules`] -- Validated competition rules derived from the configuration.
//! - [`sink`] -- The [`EventSink`] trait and its ordered fan-out.
//!
//! [`Competition`]: competition::Competition
//! [`EventSink`]: sink::EventSink

pub mod competition;
pub mod config;
pub mod feedback;
pub mod parser;
pub mod referee;
pub mod registry;
pub mod rules;
pub mod sink;

pub use competition::{Competition, CompetitionStats};
pub use config::{ConfigError, RaceConfig};
pub use parser::{EventLines, ParseError, ReadError, parse_line, read_events};
pub use registry::CompetitorRegistry;
pub use rules::{CompetitionRules, RulesError};
pub use sink::{CompositeSink, EventSink, RecordingSink};
