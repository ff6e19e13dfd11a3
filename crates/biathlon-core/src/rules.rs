//! Competition rules derived from the race configuration.
//!
//! [`CompetitionRules`] is the validated, strongly-typed form of a
//! [`RaceConfig`]. It is built once before the event stream is opened; a
//! malformed value is a configuration error and processing never starts.

use chrono::TimeDelta;

use biathlon_types::{TimeFormatError, parse_clock_duration, parse_clock_time_relaxed};

use crate::config::RaceConfig;

/// Errors that can occur when deriving rules from a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RulesError {
    /// `startDelta` is not an `HH:MM:SS` duration.
    #[error("failed to parse startDelta: {source}")]
    StartDelta {
        /// The underlying format error.
        source: TimeFormatError,
    },

    /// `start` is not a clock time.
    #[error("failed to parse start: {source}")]
    Start {
        /// The underlying format error.
        source: TimeFormatError,
    },

    /// A race must have at least one main lap.
    #[error("laps must be at least 1")]
    NoLaps,

    /// A firing line must have at least one target.
    #[error("targets must be at least 1")]
    NoTargets,
}

/// Parameters that drive the referees and trackers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompetitionRules {
    /// Number of main laps to complete the race.
    pub laps: u32,
    /// Maximum allowed delay between assigned and actual start.
    pub max_start_delta: TimeDelta,
    /// Length of one main lap.
    pub lap_len: u32,
    /// Length of one penalty lap.
    pub penalty_len: u32,
    /// Number of firing lines in the race.
    pub firing_lines: u32,
    /// Number of targets on every firing line.
    pub targets: u32,
}

impl CompetitionRules {
    /// Validate a configuration and derive the rules from it.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError`] if a time field is malformed, or if there are
    /// no laps to run or no targets to shoot.
    pub fn from_config(config: &RaceConfig) -> Result<Self, RulesError> {
        let max_start_delta = parse_clock_duration(&config.start_delta)
            .map_err(|source| RulesError::StartDelta { source })?;
        parse_clock_time_relaxed(&config.start).map_err(|source| RulesError::Start { source })?;

        if config.laps == 0 {
            return Err(RulesError::NoLaps);
        }
        if config.targets == 0 {
            return Err(RulesError::NoTargets);
        }

        Ok(Self {
            laps: config.laps,
            max_start_delta,
            lap_len: config.lap_len,
            penalty_len: config.penalty_len,
            firing_lines: config.firing_lines,
            targets: config.targets,
        })
    }
}
