//! Type-safe identifier wrapper for competitors.
//!
//! Competitor identifiers arrive as free text in the event log (`"1"`,
//! `"vasya"`, ...). Wrapping them keeps them from being mixed up with event
//! payloads, which are also plain strings. Ordering is lexical, which is the
//! tie-break order used by the standings.

use serde::{Deserialize, Serialize};

/// Unique identifier for a competitor in a race.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompetitorId(String);

impl CompetitorId {
    /// Create a competitor identifier from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for CompetitorId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CompetitorId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for CompetitorId {
    fn from(id: String) -> Self {
        Self(id)
    }
}
