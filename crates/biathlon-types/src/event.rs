//! The event fact type and its closed kind enumeration.
//!
//! An [`Event`] is an immutable record of something that happened to a
//! competitor at a point in time. Kinds with ids 1 through 11 arrive in the
//! raw event log; [`EventKind::Disqualified`] and [`EventKind::Finished`] are
//! only ever synthesized by referees inside the engine, but they travel
//! through the same sinks as real events.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::ids::CompetitorId;
use crate::time::format_clock_time;

// ---------------------------------------------------------------------------
// Event kinds
// ---------------------------------------------------------------------------

/// What happened to a competitor.
///
/// Discriminants are the numeric ids used in the event log and are stable
/// across the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum EventKind {
    /// The competitor registered for the race.
    Registered = 1,
    /// A start time was drawn for the competitor. Payload: clock time.
    StartTimeAssigned = 2,
    /// The competitor is on the start line.
    OnStartLine = 3,
    /// The competitor has started.
    Started = 4,
    /// The competitor is on a firing range. Payload: range id.
    OnFiringRange = 5,
    /// A target has been hit. Payload: target id.
    TargetHit = 6,
    /// The competitor left the firing range.
    LeftFiringRange = 7,
    /// The competitor entered the penalty laps.
    EnteredPenaltyLaps = 8,
    /// The competitor left the penalty laps.
    LeftPenaltyLaps = 9,
    /// The competitor ended a main lap.
    EndedMainLap = 10,
    /// The competitor cannot continue. Payload: free-text reason.
    CannotContinue = 11,
    /// The competitor was disqualified (synthesized).
    Disqualified = 32,
    /// The competitor finished the race (synthesized).
    Finished = 33,
}

impl EventKind {
    /// Every incoming kind, in id order.
    pub const INCOMING: [Self; 11] = [
        Self::Registered,
        Self::StartTimeAssigned,
        Self::OnStartLine,
        Self::Started,
        Self::OnFiringRange,
        Self::TargetHit,
        Self::LeftFiringRange,
        Self::EnteredPenaltyLaps,
        Self::LeftPenaltyLaps,
        Self::EndedMainLap,
        Self::CannotContinue,
    ];

    /// Look up an incoming kind by its numeric id.
    ///
    /// Returns `None` for ids outside `1..=11`, including the ids of the
    /// synthesized kinds: those never appear in a raw log.
    pub fn from_incoming_id(id: u8) -> Option<Self> {
        Self::INCOMING.into_iter().find(|kind| kind.id() == id)
    }

    /// Numeric id of this kind.
    pub const fn id(self) -> u8 {
        self as u8
    }
}

impl core::fmt::Display for EventKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{self:?}({})", self.id())
    }
}

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// An immutable fact about one competitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// When the event happened.
    pub time: NaiveTime,
    /// What happened.
    pub kind: EventKind,
    /// The competitor the event relates to.
    pub competitor_id: CompetitorId,
    /// Extra argument: assigned start time, range id, target id or reason.
    /// Empty when the kind takes no argument.
    pub payload: String,
}

impl Event {
    /// Create an event with a payload.
    pub fn new(
        time: NaiveTime,
        kind: EventKind,
        competitor_id: impl Into<CompetitorId>,
        payload: impl Into<String>,
    ) -> Self {
        Self {
            time,
            kind,
            competitor_id: competitor_id.into(),
            payload: payload.into(),
        }
    }

    /// Create an event that carries no payload.
    pub fn bare(time: NaiveTime, kind: EventKind, competitor_id: impl Into<CompetitorId>) -> Self {
        Self::new(time, kind, competitor_id, String::new())
    }

    /// Derive a payload-less event of `kind` for the same competitor at the
    /// same instant. Referees use this to synthesize outcomes.
    pub fn derive(&self, kind: EventKind) -> Self {
        Self::bare(self.time, kind, self.competitor_id.clone())
    }
}

impl core::fmt::Display for Event {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let id = &self.competitor_id;
        let extra = &self.payload;
        write!(f, "[{}] ", format_clock_time(self.time))?;
        match self.kind {
            EventKind::Registered => write!(f, "The competitor({id}) registered"),
            EventKind::StartTimeAssigned => write!(
                f,
                "The start time for the competitor({id}) was set by a draw to {extra}"
            ),
            EventKind::OnStartLine => write!(f, "The competitor({id}) is on the start line"),
            EventKind::Started => write!(f, "The competitor({id}) has started"),
            EventKind::OnFiringRange => {
                write!(f, "The competitor({id}) is on the firing range({extra})")
            }
            EventKind::TargetHit => {
                write!(f, "The target({extra}) has been hit by competitor({id})")
            }
            EventKind::LeftFiringRange => write!(f, "The competitor({id}) left the firing range"),
            EventKind::EnteredPenaltyLaps => {
                write!(f, "The competitor({id}) entered the penalty laps")
            }
            EventKind::LeftPenaltyLaps => write!(f, "The competitor({id}) left the penalty laps"),
            EventKind::EndedMainLap => write!(f, "The competitor({id}) ended the main lap"),
            EventKind::CannotContinue => {
                write!(f, "The competitor({id}) can`t continue: {extra}")
            }
            EventKind::Disqualified => write!(f, "The competitor({id}) has been disqualified"),
            EventKind::Finished => write!(f, "The competitor({id}) has finished"),
        }
    }
}
