//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

/// Biathlon race reporter.
#[derive(Debug, Parser)]
#[command(name = "biathlon-reporter")]
#[command(about = "Replay a biathlon event log and write the final standings", long_about = None)]
pub struct Cli {
    /// Race configuration file (JSON, or YAML with a .yaml/.yml extension)
    #[arg(long)]
    pub config: PathBuf,

    /// Incoming events file
    #[arg(long)]
    pub events: Option<PathBuf>,

    /// Where to write the report
    #[arg(long, default_value = "report.txt")]
    pub report: PathBuf,

    /// Print the loaded configuration as JSON to stdout
    #[arg(long)]
    pub print_config: bool,

    /// Skip malformed event lines instead of aborting
    #[arg(long)]
    pub skip_invalid: bool,

    /// Do not print the event log to stdout
    #[arg(long)]
    pub quiet: bool,
}
