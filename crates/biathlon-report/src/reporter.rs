//! The reporter: per-competitor trackers and report assembly.

use biathlon_core::{CompetitionRules, CompetitorRegistry, EventSink};
use biathlon_types::{CompetitorId, Event};

use crate::laps::LapTimeTracker;
use crate::report::{Report, ReportRecord};
use crate::shooting::ShootingTracker;
use crate::total_time::TotalTimeTracker;

/// The three trackers kept for one competitor.
#[derive(Debug, Clone)]
pub struct CompetitorTrackers {
    /// Total race time.
    pub total_time: TotalTimeTracker,
    /// Per-lap times.
    pub laps: LapTimeTracker,
    /// Shooting and penalty laps.
    pub shooting: ShootingTracker,
}

impl CompetitorTrackers {
    /// Fresh trackers for a newly registered competitor.
    pub fn new(rules: &CompetitionRules) -> Self {
        Self {
            total_time: TotalTimeTracker::new(),
            laps: LapTimeTracker::new(rules.laps, rules.lap_len),
            shooting: ShootingTracker::new(rules),
        }
    }

    /// Summarize the trackers into a report record.
    pub fn record(&self, competitor_id: &CompetitorId) -> ReportRecord {
        let (total_time, final_state) = self.total_time.result();
        ReportRecord {
            competitor_id: competitor_id.clone(),
            total_time,
            final_state,
            laps: self.laps.lap_times_and_speed(),
            shooting: self.shooting.summary(),
        }
    }
}

impl EventSink for CompetitorTrackers {
    fn notify(&mut self, event: &Event) {
        self.total_time.notify(event);
        self.laps.notify(event);
        self.shooting.notify(event);
    }
}

/// Observes the whole race and produces the final report.
#[derive(Debug)]
pub struct Reporter {
    competitors: CompetitorRegistry<CompetitorTrackers>,
}

impl Reporter {
    /// Create a reporter for a race run under `rules`.
    pub fn new(rules: &CompetitionRules) -> Self {
        let rules = rules.clone();
        Self {
            competitors: CompetitorRegistry::new(move |_id: &CompetitorId| {
                CompetitorTrackers::new(&rules)
            }),
        }
    }

    /// Number of registered competitors.
    pub fn competitors(&self) -> usize {
        self.competitors.len()
    }

    /// Trackers of one competitor, if registered.
    pub fn trackers(&self, id: &CompetitorId) -> Option<&CompetitorTrackers> {
        self.competitors.get(id)
    }

    /// Assemble one record per registered competitor, in id order. Call
    /// [`Report::sort`] for standings order.
    pub fn make_report(&self) -> Report {
        Report::new(
            self.competitors
                .iter()
                .map(|(id, trackers)| trackers.record(id))
                .collect(),
        )
    }
}

impl EventSink for Reporter {
    fn notify(&mut self, event: &Event) {
        self.competitors.notify(event);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeDelta;

    use biathlon_types::{EventKind, parse_clock_time};

    use super::*;
    use crate::report::FinalState;

    fn rules() -> CompetitionRules {
        CompetitionRules {
            laps: 2,
            max_start_delta: TimeDelta::seconds(30),
            lap_len: 3651,
            penalty_len: 50,
            firing_lines: 2,
            targets: 5,
        }
    }

    fn event(at: &str, kind: EventKind, id: &str) -> Event {
        Event::bare(parse_clock_time(at).unwrap(), kind, id)
    }

    #[test]
    fn one_record_per_registered_competitor() {
        let mut reporter = Reporter::new(&rules());
        reporter.notify(&event("09:05:59.867", EventKind::Registered, "2"));
        reporter.notify(&event("09:06:00.000", EventKind::Registered, "1"));
        reporter.notify(&event("09:07:00.000", EventKind::Started, "ghost"));

        let report = reporter.make_report();
        assert_eq!(reporter.competitors(), 2);
        let ids: Vec<&str> = report.records().iter().map(|r| r.competitor_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert!(report.records().iter().all(|r| r.final_state == FinalState::NotStarted));
        assert!(report.records().iter().all(|r| r.laps.len() == 2));
        assert!(report.records().iter().all(|r| r.shooting.total_targets == 10));
    }

    #[test]
    fn events_reach_every_tracker() {
        let mut reporter = Reporter::new(&rules());
        reporter.notify(&event("09:05:59.867", EventKind::Registered, "1"));
        reporter.notify(&Event::new(
            parse_clock_time("09:15:00.841").unwrap(),
            EventKind::StartTimeAssigned,
            "1",
            "09:30:00.000",
        ));
        reporter.notify(&event("09:30:01.005", EventKind::Started, "1"));
        reporter.notify(&event("09:59:14.007", EventKind::EndedMainLap, "1"));

        let trackers = reporter.trackers(&CompetitorId::from("1")).unwrap();
        assert_eq!(trackers.laps.laps_completed(), 1);
        let record = trackers.record(&CompetitorId::from("1"));
        assert_eq!(record.final_state, FinalState::NotFinished);
        assert!(record.laps.first().unwrap().is_some());
    }
}
