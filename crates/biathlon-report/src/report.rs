//! Final standings: one record per competitor, sorted and rendered.
//!
//! A rendered line reads
//!
//! ```text
//! [<status>] <id> [<lap>, <lap>, ...] {<penalty time>, <penalty speed>} <hit>/<total>
//! ```
//!
//! where status is the total time for finishers, and a lap is either
//! `{<time>, <speed>}` or `{,}` when it was never completed.

use core::cmp::Ordering;
use core::fmt;

use chrono::TimeDelta;

use biathlon_types::{CompetitorId, format_duration};

use crate::laps::LapSplit;
use crate::shooting::ShootingSummary;

/// How a competitor's race ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FinalState {
    /// Never started, or disqualified at the start.
    NotStarted,
    /// Started but never finished.
    NotFinished,
    /// Completed every main lap.
    Finished,
}

impl FinalState {
    /// Position of the state's block in the standings.
    const fn rank(self) -> u8 {
        match self {
            Self::NotStarted => 0,
            Self::Finished => 1,
            Self::NotFinished => 2,
        }
    }
}

impl fmt::Display for FinalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotStarted => f.write_str("NotStarted"),
            Self::NotFinished => f.write_str("NotFinished"),
            Self::Finished => f.write_str("Finished"),
        }
    }
}

/// Everything the report says about one competitor.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRecord {
    /// The competitor.
    pub competitor_id: CompetitorId,
    /// Total time; zero unless the competitor finished.
    pub total_time: TimeDelta,
    /// How the race ended for the competitor.
    pub final_state: FinalState,
    /// One entry per main lap.
    pub laps: Vec<Option<LapSplit>>,
    /// Shooting and penalty lap outcome.
    pub shooting: ShootingSummary,
}

impl ReportRecord {
    /// Standings order: not started first, then finishers by total time,
    /// then those who did not finish. Ties are broken by competitor id.
    pub fn standing_order(&self, other: &Self) -> Ordering {
        self.final_state
            .rank()
            .cmp(&other.final_state.rank())
            .then_with(|| match (self.final_state, other.final_state) {
                (FinalState::Finished, FinalState::Finished) => {
                    self.total_time.cmp(&other.total_time)
                }
                _ => Ordering::Equal,
            })
            .then_with(|| self.competitor_id.cmp(&other.competitor_id))
    }
}

impl fmt::Display for ReportRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.final_state {
            FinalState::Finished => write!(f, "[{}] ", format_duration(self.total_time))?,
            state => write!(f, "[{state}] ")?,
        }
        write!(f, "{} [", self.competitor_id)?;

        for (index, lap) in self.laps.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            match lap {
                Some(split) => {
                    write!(f, "{{{}, {:.3}}}", format_duration(split.interval), split.speed)?;
                }
                None => f.write_str("{,}")?,
            }
        }

        let shooting = &self.shooting;
        write!(
            f,
            "] {{{}, {:.3}}} {}/{}",
            format_duration(shooting.time_on_penalty),
            shooting.avg_penalty_speed,
            shooting.total_hit,
            shooting.total_targets
        )
    }
}

/// The final report: one record per registered competitor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report(Vec<ReportRecord>);

impl Report {
    /// Wrap a list of records, in the given order.
    pub const fn new(records: Vec<ReportRecord>) -> Self {
        Self(records)
    }

    /// Sort into standings order.
    pub fn sort(&mut self) {
        self.0.sort_by(ReportRecord::standing_order);
    }

    /// The records, in their current order.
    pub fn records(&self) -> &[ReportRecord] {
        &self.0
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the report has no records.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for record in &self.0 {
            writeln!(f, "{record}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use super::*;

    fn record(id: &str, final_state: FinalState, total_ms: i64) -> ReportRecord {
        ReportRecord {
            competitor_id: CompetitorId::from(id),
            total_time: TimeDelta::milliseconds(total_ms),
            final_state,
            laps: vec![None, None],
            shooting: ShootingSummary {
                total_targets: 10,
                ..ShootingSummary::default()
            },
        }
    }

    #[test]
    fn renders_a_finisher() {
        let record = ReportRecord {
            competitor_id: CompetitorId::from("1"),
            total_time: TimeDelta::milliseconds(62_345),
            final_state: FinalState::Finished,
            laps: vec![
                Some(LapSplit {
                    interval: TimeDelta::minutes(29) + TimeDelta::milliseconds(14_007),
                    speed: 2.04,
                }),
                Some(LapSplit {
                    interval: TimeDelta::minutes(31) + TimeDelta::milliseconds(2_056),
                    speed: 1.92,
                }),
            ],
            shooting: ShootingSummary {
                total_targets: 10,
                total_hit: 8,
                time_on_penalty: TimeDelta::minutes(2) + TimeDelta::seconds(32),
                avg_penalty_speed: 1.87,
            },
        };

        assert_eq!(
            record.to_string(),
            "[00:01:02.345] 1 [{00:29:14.007, 2.040}, {00:31:02.056, 1.920}] {00:02:32.000, 1.870} 8/10"
        );
    }

    #[test]
    fn renders_non_finishers_with_absent_laps() {
        assert_eq!(
            record("2", FinalState::NotStarted, 0).to_string(),
            "[NotStarted] 2 [{,}, {,}] {00:00:00.000, 0.000} 0/10"
        );

        let mut dropped = record("3", FinalState::NotFinished, 0);
        dropped.laps = vec![
            Some(LapSplit {
                interval: TimeDelta::minutes(29) + TimeDelta::milliseconds(3_872),
                speed: 2.093,
            }),
            None,
        ];
        assert_eq!(
            dropped.to_string(),
            "[NotFinished] 3 [{00:29:03.872, 2.093}, {,}] {00:00:00.000, 0.000} 0/10"
        );
    }

    #[test]
    fn report_ends_every_line_with_newline() {
        let report = Report::new(vec![
            record("1", FinalState::NotStarted, 0),
            record("2", FinalState::NotStarted, 0),
        ]);
        let text = report.to_string();
        assert_eq!(text.lines().count(), 2);
        assert!(text.ends_with('\n'));

        assert_eq!(Report::default().to_string(), "");
    }

    #[test]
    fn standings_order() {
        let mut report = Report::new(vec![
            record("9", FinalState::NotFinished, 0),
            record("5", FinalState::Finished, 3_000),
            record("4", FinalState::NotStarted, 0),
            record("3", FinalState::Finished, 1_000),
            record("2", FinalState::NotFinished, 0),
            record("8", FinalState::Finished, 1_000),
            record("1", FinalState::NotStarted, 0),
        ]);
        report.sort();

        let order: Vec<(&str, FinalState)> = report
            .records()
            .iter()
            .map(|r| (r.competitor_id.as_str(), r.final_state))
            .collect();
        assert_eq!(
            order,
            vec![
                ("1", FinalState::NotStarted),
                ("4", FinalState::NotStarted),
                ("3", FinalState::Finished),
                ("8", FinalState::Finished),
                ("5", FinalState::Finished),
                ("2", FinalState::NotFinished),
                ("9", FinalState::NotFinished),
            ]
        );
    }

    #[test]
    fn competitor_ids_sort_lexically() {
        let mut report = Report::new(vec![
            record("10", FinalState::NotStarted, 0),
            record("9", FinalState::NotStarted, 0),
        ]);
        report.sort();
        assert_eq!(report.records().first().unwrap().competitor_id.as_str(), "10");
    }
}
