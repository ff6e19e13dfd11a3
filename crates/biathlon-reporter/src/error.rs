//! Error types for the reporter binary.
//!
//! [`ReporterError`] wraps every failure that stops a run. Each variant
//! names the file involved so the message printed by `main` is enough to
//! act on.

use std::io;
use std::path::PathBuf;

use biathlon_core::{ConfigError, ReadError, RulesError};

/// Top-level error for the reporter binary.
#[derive(Debug, thiserror::Error)]
pub enum ReporterError {
    /// The configuration file could not be loaded or printed.
    #[error("config '{}': {source}", .path.display())]
    Config {
        /// The configuration file.
        path: PathBuf,
        /// The underlying config error.
        source: ConfigError,
    },

    /// The configuration does not describe a valid race.
    #[error("invalid race rules: {source}")]
    Rules {
        /// The underlying rules error.
        #[from]
        source: RulesError,
    },

    /// No events file was given.
    #[error("no events file, provide it with --events option")]
    NoEvents,

    /// The events file could not be opened.
    #[error("open events file '{}': {source}", .path.display())]
    OpenEvents {
        /// The events file.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },

    /// The events file could not be read or contains a malformed line.
    #[error("events file '{}': {source}", .path.display())]
    Events {
        /// The events file.
        path: PathBuf,
        /// The underlying read error.
        source: ReadError,
    },

    /// The report could not be written.
    #[error("write report '{}': {source}", .path.display())]
    WriteReport {
        /// The report file.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },
}
