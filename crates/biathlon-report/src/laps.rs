//! Per-lap times and speeds.
//!
//! The first lap is timed from the drawn start time, every later lap from
//! the end of the previous one. Time spent on penalty laps is not
//! subtracted: a lap is the wall-clock interval between two main-lap
//! boundaries.

use chrono::{NaiveTime, TimeDelta};

use biathlon_core::EventSink;
use biathlon_types::{Event, EventKind, parse_clock_time, seconds_f64, since_midnight};
use tracing::{trace, warn};

/// Time and average speed of one completed main lap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LapSplit {
    /// Time spent on the lap.
    pub interval: TimeDelta,
    /// Lap length divided by the lap time in seconds.
    pub speed: f64,
}

/// Times every main lap of one competitor.
#[derive(Debug, Clone)]
pub struct LapTimeTracker {
    lap_len: u32,
    lap_start: Option<NaiveTime>,
    slots: Vec<TimeDelta>,
    completed: usize,
    stopped: bool,
}

impl LapTimeTracker {
    /// Create a tracker for `laps` main laps of `lap_len` each.
    pub fn new(laps: u32, lap_len: u32) -> Self {
        let laps = usize::try_from(laps).unwrap_or(usize::MAX);
        Self {
            lap_len,
            lap_start: None,
            slots: vec![TimeDelta::zero(); laps],
            completed: 0,
            stopped: false,
        }
    }

    /// Number of main laps timed so far.
    pub const fn laps_completed(&self) -> usize {
        self.completed
    }

    /// One entry per main lap: the split, or `None` for a lap that was
    /// never completed.
    pub fn lap_times_and_speed(&self) -> Vec<Option<LapSplit>> {
        self.slots
            .iter()
            .map(|&interval| {
                (!interval.is_zero()).then(|| LapSplit {
                    interval,
                    speed: f64::from(self.lap_len) / seconds_f64(interval),
                })
            })
            .collect()
    }

    fn end_lap(&mut self, event: &Event) {
        let interval = self.lap_start.map_or_else(
            || since_midnight(event.time),
            |start| event.time.signed_duration_since(start),
        );

        if let Some(slot) = self.slots.get_mut(self.completed) {
            *slot = interval;
            self.completed = self.completed.saturating_add(1);
        }
        self.lap_start = Some(event.time);

        if self.completed >= self.slots.len() {
            trace!(competitor = %event.competitor_id, "all main laps timed");
            self.stopped = true;
        }
    }
}

impl EventSink for LapTimeTracker {
    fn notify(&mut self, event: &Event) {
        if self.stopped {
            return;
        }

        match event.kind {
            EventKind::StartTimeAssigned if self.completed == 0 && self.lap_start.is_none() => {
                match parse_clock_time(&event.payload) {
                    Ok(start) => self.lap_start = Some(start),
                    Err(err) => warn!(
                        competitor = %event.competitor_id,
                        %err,
                        "lap timing ignores unparsable start time"
                    ),
                }
            }
            EventKind::EndedMainLap => self.end_lap(event),
            EventKind::Disqualified | EventKind::CannotContinue => self.stopped = true,
            _ => {}
        }
    }
}
