//! Configuration loading and typed config structures for a race.
//!
//! A race is described by a small JSON document (or its YAML equivalent)
//! with camelCase keys:
//!
//! ```json
//! {
//!     "laps": 2,
//!     "lapLen": 3651,
//!     "penaltyLen": 50,
//!     "firingLines": 1,
//!     "start": "09:30:00",
//!     "startDelta": "00:00:30"
//! }
//! ```
//!
//! The config is a plain data mirror of the file. Validation and conversion
//! into engine parameters happen in [`CompetitionRules::from_config`].
//!
//! [`CompetitionRules::from_config`]: crate::rules::CompetitionRules::from_config

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse or produce JSON content.
    #[error("failed to parse config JSON: {source}")]
    Json {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Race configuration as read from disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceConfig {
    /// Number of main laps.
    pub laps: u32,

    /// Length of one main lap, in distance units.
    pub lap_len: u32,

    /// Length of one penalty lap, in distance units.
    pub penalty_len: u32,

    /// Number of firing lines (shooting bouts) in the race.
    pub firing_lines: u32,

    /// Planned start time of the first competitor (`HH:MM:SS[.mmm]`).
    pub start: String,

    /// Maximum allowed delay between the assigned and the actual start
    /// (`HH:MM:SS`).
    pub start_delta: String,

    /// Number of targets on each firing line.
    #[serde(default = "default_targets")]
    pub targets: u32,
}

impl RaceConfig {
    /// Load configuration from a file at the given path.
    ///
    /// Files ending in `.yaml` or `.yml` are read as YAML, everything else
    /// as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or a parse
    /// error if its content does not describe a race.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

        if is_yaml {
            Self::parse_yaml(&contents)
        } else {
            Self::parse_json(&contents)
        }
    }

    /// Parse configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] if the string is not a valid race config.
    pub fn parse_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not a valid race config.
    pub fn parse_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Render the configuration as a single-line JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }
}

const fn default_targets() -> u32 {
    5
}
