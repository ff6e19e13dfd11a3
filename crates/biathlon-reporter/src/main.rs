//! Biathlon race reporter binary.
//!
//! Replays an incoming event log through a competition and writes the
//! final standings to a report file.
//!
//! # Run Sequence
//!
//! 1. Initialize structured logging (tracing, to stderr)
//! 2. Load the race configuration and derive the competition rules
//! 3. Stream the events file through the competition, echoing every
//!    dispatched event to stdout unless `--quiet` is given
//! 4. Assemble, sort, and write the report

mod cli;
mod error;
mod event_log;

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::Path;
use std::process::ExitCode;

use biathlon_core::{
    Competition, CompetitionRules, CompetitionStats, CompositeSink, EventSink, RaceConfig,
    read_events,
};
use biathlon_report::Reporter;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::error::ReporterError;
use crate::event_log::EventLog;

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Execute one reporter run as described by `cli`.
fn run(cli: &Cli) -> Result<(), ReporterError> {
    let config = load_config(&cli.config)?;
    if cli.print_config {
        let json = config.to_json().map_err(|source| ReporterError::Config {
            path: cli.config.clone(),
            source,
        })?;
        println!("{json}");
    }

    let rules = CompetitionRules::from_config(&config)?;
    let events_path = cli.events.as_deref().ok_or(ReporterError::NoEvents)?;

    let mut reporter = Reporter::new(&rules);
    let (stats, skipped) = replay(cli, &rules, events_path, &mut reporter)?;
    info!(
        events = stats.events_handled,
        synthesized = stats.events_synthesized,
        skipped,
        competitors = reporter.competitors(),
        "Event stream consumed"
    );

    let mut report = reporter.make_report();
    report.sort();
    fs::write(&cli.report, report.to_string()).map_err(|source| ReporterError::WriteReport {
        path: cli.report.clone(),
        source,
    })?;
    info!(
        path = %cli.report.display(),
        records = report.len(),
        "Report written"
    );

    Ok(())
}

/// Load the race configuration and log what was loaded.
fn load_config(path: &Path) -> Result<RaceConfig, ReporterError> {
    let config = RaceConfig::from_file(path).map_err(|source| ReporterError::Config {
        path: path.to_path_buf(),
        source,
    })?;
    info!(
        path = %path.display(),
        laps = config.laps,
        lap_len = config.lap_len,
        penalty_len = config.penalty_len,
        firing_lines = config.firing_lines,
        targets = config.targets,
        start = config.start,
        start_delta = config.start_delta,
        "Configuration loaded"
    );
    Ok(config)
}

/// Stream the events file through a competition observed by `reporter`
/// and, unless quiet, the stdout event log.
///
/// Returns the competition's traffic counters and the number of malformed
/// lines skipped.
fn replay(
    cli: &Cli,
    rules: &CompetitionRules,
    events_path: &Path,
    reporter: &mut Reporter,
) -> Result<(CompetitionStats, u64), ReporterError> {
    let file = File::open(events_path).map_err(|source| ReporterError::OpenEvents {
        path: events_path.to_path_buf(),
        source,
    })?;

    let event_log = (!cli.quiet).then(|| EventLog::new(io::stdout().lock()));
    let mut observers = CompositeSink::new();
    observers.add_sinks([
        event_log.map(|log| Box::new(log) as Box<dyn EventSink + '_>),
        Some(Box::new(reporter) as Box<dyn EventSink + '_>),
    ]);
    let mut competition = Competition::new(rules, observers);

    let mut skipped: u64 = 0;
    for item in read_events(BufReader::new(file)) {
        match item {
            Ok(event) => competition.handle_event(&event),
            Err(err) if cli.skip_invalid && err.is_recoverable() => {
                warn!(%err, "Skipping malformed event line");
                skipped = skipped.saturating_add(1);
            }
            Err(source) => {
                return Err(ReporterError::Events {
                    path: events_path.to_path_buf(),
                    source,
                });
            }
        }
    }

    Ok((competition.stats(), skipped))
}
