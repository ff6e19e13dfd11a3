//! Shooting results and penalty laps.
//!
//! Every firing line owes one penalty lap per target left standing. The
//! tracker counts hits per bout, converts misses into penalty laps owed, and
//! credits them when the competitor leaves the penalty loop. Penalty laps
//! are accounted here rather than separately because their number depends
//! on the shooting that precedes them.

use std::collections::BTreeSet;

use chrono::{NaiveTime, TimeDelta};

use biathlon_core::{CompetitionRules, EventSink};
use biathlon_types::{Event, EventKind, seconds_f64};
use tracing::trace;

/// Progress of a [`ShootingTracker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShootingState {
    /// On a main lap.
    RunningMainLap,
    /// At a firing line.
    Shooting,
    /// In the penalty loop.
    RunningPenaltyLaps {
        /// When the penalty loop was entered.
        entered: NaiveTime,
    },
    /// Out of the race. Terminal.
    Ended,
}

/// Shooting outcome of one competitor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShootingSummary {
    /// Targets available over the whole race.
    pub total_targets: u32,
    /// Targets hit.
    pub total_hit: u32,
    /// Time spent in the penalty loop.
    pub time_on_penalty: TimeDelta,
    /// Average speed on penalty laps, zero when none were run.
    pub avg_penalty_speed: f64,
}

impl Default for ShootingSummary {
    fn default() -> Self {
        Self {
            total_targets: 0,
            total_hit: 0,
            time_on_penalty: TimeDelta::zero(),
            avg_penalty_speed: 0.0,
        }
    }
}

/// Tracks hits, penalty laps owed, and time spent on them.
#[derive(Debug, Clone)]
pub struct ShootingTracker {
    targets: u32,
    firing_lines: u32,
    penalty_len: u32,

    hit_this_bout: BTreeSet<String>,
    completed_shootings: u32,
    total_hit: u32,
    pending_penalty: u32,
    penalty_laps: u32,
    time_on_penalty: TimeDelta,

    state: ShootingState,
}

impl ShootingTracker {
    /// Create a tracker for the given rules.
    pub fn new(rules: &CompetitionRules) -> Self {
        Self {
            targets: rules.targets,
            firing_lines: rules.firing_lines,
            penalty_len: rules.penalty_len,
            hit_this_bout: BTreeSet::new(),
            completed_shootings: 0,
            total_hit: 0,
            pending_penalty: 0,
            penalty_laps: 0,
            time_on_penalty: TimeDelta::zero(),
            state: ShootingState::RunningMainLap,
        }
    }

    /// Current state.
    pub const fn state(&self) -> ShootingState {
        self.state
    }

    /// Penalty laps credited so far.
    pub const fn penalty_laps(&self) -> u32 {
        self.penalty_laps
    }

    /// Shooting outcome so far.
    pub fn summary(&self) -> ShootingSummary {
        let avg_penalty_speed = if self.time_on_penalty > TimeDelta::zero() {
            f64::from(self.penalty_laps.saturating_mul(self.penalty_len))
                / seconds_f64(self.time_on_penalty)
        } else {
            0.0
        };

        ShootingSummary {
            total_targets: self.firing_lines.saturating_mul(self.targets),
            total_hit: self.total_hit,
            time_on_penalty: self.time_on_penalty,
            avg_penalty_speed,
        }
    }

    fn on_main_lap(&mut self, event: &Event) {
        match event.kind {
            EventKind::OnFiringRange if self.completed_shootings < self.firing_lines => {
                self.hit_this_bout.clear();
                self.pending_penalty = self.targets;
                self.state = ShootingState::Shooting;
            }
            EventKind::EnteredPenaltyLaps => {
                self.state = ShootingState::RunningPenaltyLaps { entered: event.time };
            }
            _ => {}
        }
    }

    fn on_shooting(&mut self, event: &Event) {
        match event.kind {
            EventKind::TargetHit => self.hit(event),
            EventKind::LeftFiringRange => {
                self.completed_shootings = self.completed_shootings.saturating_add(1);
                self.state = ShootingState::RunningMainLap;
            }
            _ => {}
        }
    }

    fn hit(&mut self, event: &Event) {
        let target = event.payload.as_str();
        if !self.hit_this_bout.insert(target.to_owned()) {
            trace!(competitor = %event.competitor_id, target_id = target, "ignoring repeated hit");
            return;
        }

        self.total_hit = self.total_hit.saturating_add(1);
        self.pending_penalty = self.pending_penalty.saturating_sub(1);
    }

    fn on_penalty_laps(&mut self, entered: NaiveTime, event: &Event) {
        if event.kind == EventKind::LeftPenaltyLaps {
            self.penalty_laps = self.penalty_laps.saturating_add(self.pending_penalty);
            self.pending_penalty = 0;
            self.time_on_penalty = self
                .time_on_penalty
                .checked_add(&event.time.signed_duration_since(entered))
                .unwrap_or(self.time_on_penalty);
            self.state = ShootingState::RunningMainLap;
        }
    }
}

impl EventSink for ShootingTracker {
    fn notify(&mut self, event: &Event) {
        if self.state == ShootingState::Ended {
            return;
        }

        if matches!(
            event.kind,
            EventKind::CannotContinue | EventKind::Disqualified | EventKind::Finished
        ) {
            // An open penalty segment is not credited.
            self.state = ShootingState::Ended;
            return;
        }

        match self.state {
            ShootingState::RunningMainLap => self.on_main_lap(event),
            ShootingState::Shooting => self.on_shooting(event),
            ShootingState::RunningPenaltyLaps { entered } => self.on_penalty_laps(entered, event),
            ShootingState::Ended => {}
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use biathlon_types::parse_clock_time;

    use super::*;

    fn rules(firing_lines: u32, penalty_len: u32) -> CompetitionRules {
        CompetitionRules {
            laps: 2,
            max_start_delta: TimeDelta::seconds(30),
            lap_len: 3651,
            penalty_len,
            firing_lines,
            targets: 5,
        }
    }

    fn event(at: &str, kind: EventKind, payload: &str) -> Event {
        Event::new(parse_clock_time(at).unwrap(), kind, "1", payload)
    }

    fn bout(tracker: &mut ShootingTracker, at: &str, hits: &[&str]) {
        tracker.notify(&event(at, EventKind::OnFiringRange, "1"));
        for target in hits {
            tracker.notify(&event(at, EventKind::TargetHit, target));
        }
        tracker.notify(&event(at, EventKind::LeftFiringRange, ""));
    }

    #[test]
    fn misses_become_penalty_laps() {
        let mut tracker = ShootingTracker::new(&rules(2, 50));
        bout(&mut tracker, "09:49:33.123", &["1", "2", "4", "5"]);
        tracker.notify(&event("09:50:01.000", EventKind::EnteredPenaltyLaps, ""));
        tracker.notify(&event("09:51:48.000", EventKind::LeftPenaltyLaps, ""));

        let summary = tracker.summary();
        assert_eq!(tracker.penalty_laps(), 1);
        assert_eq!(summary.total_targets, 10);
        assert_eq!(summary.total_hit, 4);
        assert_eq!(summary.time_on_penalty, TimeDelta::seconds(107));
        assert_eq!(format!("{:.3}", summary.avg_penalty_speed), "0.467");
    }

    #[test]
    fn repeated_hits_count_once() {
        let mut tracker = ShootingTracker::new(&rules(1, 50));
        bout(&mut tracker, "09:49:33.123", &["3", "3", "3", "1"]);

        assert_eq!(tracker.summary().total_hit, 2);
        tracker.notify(&event("09:50:00.000", EventKind::EnteredPenaltyLaps, ""));
        tracker.notify(&event("09:51:00.000", EventKind::LeftPenaltyLaps, ""));
        assert_eq!(tracker.penalty_laps(), 3);
    }

    #[test]
    fn any_target_id_counts_once_per_bout() {
        let mut tracker = ShootingTracker::new(&rules(1, 50));
        bout(&mut tracker, "09:49:33.123", &["0", "01", "5", "5"]);

        assert_eq!(tracker.summary().total_hit, 3);
        tracker.notify(&event("09:50:00.000", EventKind::EnteredPenaltyLaps, ""));
        tracker.notify(&event("09:51:00.000", EventKind::LeftPenaltyLaps, ""));
        assert_eq!(tracker.penalty_laps(), 2);
    }

    #[test]
    fn more_hits_than_targets_owe_no_penalty() {
        let mut tracker = ShootingTracker::new(&rules(1, 50));
        bout(&mut tracker, "09:49:33.123", &["1", "2", "3", "4", "5", "6", "7"]);

        assert_eq!(tracker.summary().total_hit, 7);
        tracker.notify(&event("09:50:00.000", EventKind::EnteredPenaltyLaps, ""));
        tracker.notify(&event("09:51:00.000", EventKind::LeftPenaltyLaps, ""));
        assert_eq!(tracker.penalty_laps(), 0);
    }

    #[test]
    fn hits_reset_between_bouts() {
        let mut tracker = ShootingTracker::new(&rules(2, 50));
        bout(&mut tracker, "09:49:33.123", &["1", "2", "3", "4", "5"]);
        bout(&mut tracker, "10:19:33.123", &["1", "2", "3", "4", "5"]);

        assert_eq!(tracker.summary().total_hit, 10);
    }

    #[test]
    fn extra_firing_ranges_are_ignored() {
        let mut tracker = ShootingTracker::new(&rules(1, 50));
        bout(&mut tracker, "09:49:33.123", &["1"]);
        bout(&mut tracker, "10:19:33.123", &["1", "2", "3"]);

        assert_eq!(tracker.summary().total_hit, 1);
        assert_eq!(tracker.state(), ShootingState::RunningMainLap);
    }

    #[test]
    fn no_penalty_time_means_zero_speed() {
        let mut tracker = ShootingTracker::new(&rules(2, 50));
        bout(&mut tracker, "09:49:33.123", &["1", "2", "3", "4", "5"]);

        let summary = tracker.summary();
        assert!(summary.time_on_penalty.is_zero());
        assert!(summary.avg_penalty_speed.abs() < f64::EPSILON);
    }

    #[test]
    fn open_penalty_segment_is_discarded_on_exit() {
        let mut tracker = ShootingTracker::new(&rules(1, 50));
        bout(&mut tracker, "09:49:33.123", &[]);
        tracker.notify(&event("09:50:00.000", EventKind::EnteredPenaltyLaps, ""));
        tracker.notify(&event("09:55:00.000", EventKind::CannotContinue, "Lost in the forest"));
        tracker.notify(&event("09:56:00.000", EventKind::LeftPenaltyLaps, ""));

        assert_eq!(tracker.state(), ShootingState::Ended);
        assert_eq!(tracker.penalty_laps(), 0);
        assert!(tracker.summary().time_on_penalty.is_zero());
    }

    #[test]
    fn penalty_time_accumulates_over_several_visits() {
        let mut tracker = ShootingTracker::new(&rules(2, 100));
        bout(&mut tracker, "09:49:33.123", &["1", "2", "3", "4"]);
        tracker.notify(&event("09:50:00.000", EventKind::EnteredPenaltyLaps, ""));
        tracker.notify(&event("09:51:00.000", EventKind::LeftPenaltyLaps, ""));
        bout(&mut tracker, "10:19:33.123", &["1", "2", "3"]);
        tracker.notify(&event("10:20:00.000", EventKind::EnteredPenaltyLaps, ""));
        tracker.notify(&event("10:22:00.000", EventKind::LeftPenaltyLaps, ""));

        let summary = tracker.summary();
        assert_eq!(tracker.penalty_laps(), 3);
        assert_eq!(summary.time_on_penalty, TimeDelta::minutes(3));
        assert_eq!(format!("{:.3}", summary.avg_penalty_speed), "1.667");
    }
}
