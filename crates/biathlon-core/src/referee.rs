//! Referees: per-competitor state machines that synthesize events.
//!
//! Each registered competitor gets a pair of referees:
//!
//! - [`StartReferee`] disqualifies a competitor who starts later than the
//!   assigned start time plus the allowed start delta.
//! - [`FinishReferee`] declares a competitor finished once the configured
//!   number of main laps has been completed.
//!
//! Synthesized events carry the timestamp and competitor of the event that
//! triggered them and are pushed onto the race's [`Feedback`] queue, from
//! where they reach every sink exactly like real events.

use chrono::{NaiveTime, TimeDelta};

use biathlon_types::{CompetitorId, Event, EventKind, parse_clock_time};
use tracing::{debug, warn};

use crate::feedback::Feedback;
use crate::registry::CompetitorRegistry;
use crate::rules::CompetitionRules;
use crate::sink::{CompositeSink, EventSink};

// ---------------------------------------------------------------------------
// Start referee
// ---------------------------------------------------------------------------

/// Progress of a [`StartReferee`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartRefereeState {
    /// No start time has been drawn yet.
    AwaitingAssignment,
    /// A start time has been drawn; waiting for the competitor to start.
    AwaitingDeparture {
        /// The drawn start time.
        assigned: NaiveTime,
    },
    /// The start has been judged. Nothing else is looked at.
    Settled,
}

/// Checks that a competitor starts within the allowed delay.
#[derive(Debug)]
pub struct StartReferee {
    feedback: Feedback,
    max_start_delta: TimeDelta,
    state: StartRefereeState,
}

impl StartReferee {
    /// Create a referee that emits into `feedback`.
    pub const fn new(feedback: Feedback, max_start_delta: TimeDelta) -> Self {
        Self {
            feedback,
            max_start_delta,
            state: StartRefereeState::AwaitingAssignment,
        }
    }

    /// Current state.
    pub const fn state(&self) -> StartRefereeState {
        self.state
    }

    fn disqualify(&self, started: &Event) {
        debug!(
            competitor = %started.competitor_id,
            time = %started.time,
            "competitor disqualified for late start"
        );
        self.feedback.emit(started.derive(EventKind::Disqualified));
    }
}

impl EventSink for StartReferee {
    fn notify(&mut self, event: &Event) {
        match (self.state, event.kind) {
            (StartRefereeState::AwaitingAssignment, EventKind::StartTimeAssigned) => {
                match parse_clock_time(&event.payload) {
                    Ok(assigned) => {
                        self.state = StartRefereeState::AwaitingDeparture { assigned };
                    }
                    Err(err) => warn!(
                        competitor = %event.competitor_id,
                        %err,
                        "ignoring unparsable start time assignment"
                    ),
                }
            }
            // Starting without a drawn start time can never be within the
            // allowed delay.
            (StartRefereeState::AwaitingAssignment, EventKind::Started) => {
                self.disqualify(event);
                self.state = StartRefereeState::Settled;
            }
            (StartRefereeState::AwaitingDeparture { assigned }, EventKind::Started) => {
                let delta = event.time.signed_duration_since(assigned);
                if delta > self.max_start_delta {
                    self.disqualify(event);
                }
                self.state = StartRefereeState::Settled;
            }
            _ => {}
        }
    }
}

// ---------------------------------------------------------------------------
// Finish referee
// ---------------------------------------------------------------------------

/// Progress of a [`FinishReferee`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishRefereeState {
    /// The competitor has not started.
    NotStarted,
    /// The competitor is on course.
    Running,
    /// The competitor was disqualified. Terminal.
    Disqualified,
    /// The competitor could not continue. Terminal.
    CannotContinue,
    /// The competitor completed every main lap. Terminal.
    Finished,
}

/// Declares a competitor finished after the last main lap.
#[derive(Debug)]
pub struct FinishReferee {
    feedback: Feedback,
    laps: u32,
    laps_completed: u32,
    state: FinishRefereeState,
}

impl FinishReferee {
    /// Create a referee for a race of `laps` main laps.
    pub const fn new(feedback: Feedback, laps: u32) -> Self {
        Self {
            feedback,
            laps,
            laps_completed: 0,
            state: FinishRefereeState::NotStarted,
        }
    }

    /// Current state.
    pub const fn state(&self) -> FinishRefereeState {
        self.state
    }

    /// Main laps completed while running.
    pub const fn laps_completed(&self) -> u32 {
        self.laps_completed
    }
}

impl EventSink for FinishReferee {
    fn notify(&mut self, event: &Event) {
        match (self.state, event.kind) {
            (FinishRefereeState::NotStarted, EventKind::Started) => {
                self.state = FinishRefereeState::Running;
            }
            (FinishRefereeState::Running, EventKind::CannotContinue) => {
                self.state = FinishRefereeState::CannotContinue;
            }
            (FinishRefereeState::Running, EventKind::Disqualified) => {
                self.state = FinishRefereeState::Disqualified;
            }
            (FinishRefereeState::Running, EventKind::EndedMainLap) => {
                self.laps_completed = self.laps_completed.saturating_add(1);
                if self.laps_completed == self.laps {
                    debug!(
                        competitor = %event.competitor_id,
                        time = %event.time,
                        laps = self.laps,
                        "competitor finished"
                    );
                    self.state = FinishRefereeState::Finished;
                    self.feedback.emit(event.derive(EventKind::Finished));
                }
            }
            _ => {}
        }
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Build the referee registry for a race.
///
/// On registration every competitor gets a start referee followed by a
/// finish referee, both emitting into `feedback`.
pub fn referees(
    rules: &CompetitionRules,
    feedback: &Feedback,
) -> CompetitorRegistry<CompositeSink<'static>> {
    let feedback = feedback.clone();
    let max_start_delta = rules.max_start_delta;
    let laps = rules.laps;

    CompetitorRegistry::new(move |_id: &CompetitorId| {
        CompositeSink::new()
            .with_sink(StartReferee::new(feedback.clone(), max_start_delta))
            .with_sink(FinishReferee::new(feedback.clone(), laps))
    })
}
