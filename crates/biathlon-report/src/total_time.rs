//! Total race time of one competitor.
//!
//! Total time runs from the drawn start time (not the actual departure) to
//! the synthesized finish event. A competitor who never gets going resolves
//! to [`FinalState::NotStarted`]; one who drops out resolves to
//! [`FinalState::NotFinished`].

use chrono::{NaiveTime, TimeDelta};

use biathlon_core::EventSink;
use biathlon_types::{Event, EventKind, parse_clock_time, since_midnight};
use tracing::warn;

use crate::report::FinalState;

/// Progress of a [`TotalTimeTracker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TotalTimeState {
    /// Registered, not yet started.
    Initial,
    /// On course.
    Running,
    /// Disqualified at the start.
    NotStarted,
    /// Could not continue.
    NotFinished,
    /// Crossed the finish.
    Finished {
        /// Time of the finish event.
        end: NaiveTime,
    },
}

/// Tracks total race time.
#[derive(Debug, Clone)]
pub struct TotalTimeTracker {
    assigned_start: Option<NaiveTime>,
    state: TotalTimeState,
}

impl Default for TotalTimeTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl TotalTimeTracker {
    /// Create a tracker in the initial state.
    pub const fn new() -> Self {
        Self {
            assigned_start: None,
            state: TotalTimeState::Initial,
        }
    }

    /// Current state, before finalization.
    pub const fn state(&self) -> TotalTimeState {
        self.state
    }

    /// Final total time and state.
    ///
    /// A competitor still in the initial state resolves to not started and
    /// one still running resolves to not finished. The time is zero unless
    /// the competitor finished. Without a recorded start assignment the
    /// finish is measured from midnight.
    pub fn result(&self) -> (TimeDelta, FinalState) {
        match self.state {
            TotalTimeState::Finished { end } => {
                let total = self.assigned_start.map_or_else(
                    || since_midnight(end),
                    |start| end.signed_duration_since(start),
                );
                (total, FinalState::Finished)
            }
            TotalTimeState::Initial | TotalTimeState::NotStarted => {
                (TimeDelta::zero(), FinalState::NotStarted)
            }
            TotalTimeState::Running | TotalTimeState::NotFinished => {
                (TimeDelta::zero(), FinalState::NotFinished)
            }
        }
    }
}

impl EventSink for TotalTimeTracker {
    fn notify(&mut self, event: &Event) {
        match (self.state, event.kind) {
            (TotalTimeState::Initial, EventKind::StartTimeAssigned) => {
                match parse_clock_time(&event.payload) {
                    Ok(start) => self.assigned_start = Some(start),
                    Err(err) => warn!(
                        competitor = %event.competitor_id,
                        %err,
                        "total time ignores unparsable start time"
                    ),
                }
            }
            // The disqualification for a late start is synthesized while the
            // start itself is being dispatched, so the tracker may already
            // be running.
            (TotalTimeState::Initial | TotalTimeState::Running, EventKind::Disqualified) => {
                self.state = TotalTimeState::NotStarted;
            }
            (TotalTimeState::Initial, EventKind::Started) => {
                self.state = TotalTimeState::Running;
            }
            (TotalTimeState::Running, EventKind::Finished) => {
                self.state = TotalTimeState::Finished { end: event.time };
            }
            (TotalTimeState::Running, EventKind::CannotContinue) => {
                self.state = TotalTimeState::NotFinished;
            }
            _ => {}
        }
    }
}
