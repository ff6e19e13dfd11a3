//! Incoming event log parsing.
//!
//! The log is line oriented. Every line has the form
//!
//! ```text
//! [HH:MM:SS.mmm] <eventID> <competitorID> [<payload>]
//! ```
//!
//! split on single spaces into at most four parts, so the payload is the
//! rest of the line and may itself contain spaces. Only incoming event ids
//! are accepted; synthesized kinds never appear in a log.
//!
//! [`parse_line`] handles one line. [`EventLines`] wraps a [`BufRead`] and
//! yields one result per line. Bytes that are not valid UTF-8 are replaced
//! with U+FFFD before parsing. A malformed line yields an error but does not
//! end the sequence, so the caller decides whether to skip it or stop. A read
//! failure is yielded once and ends the sequence.

use std::io::{self, BufRead};
use std::num::ParseIntError;

use biathlon_types::{Event, EventKind, TimeFormatError, parse_clock_time};

const MAX_FIELDS: usize = 4;

/// Errors that can occur when parsing a single line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Fewer than three space separated fields.
    #[error("not enough fields, expected at least 3, got {found}")]
    NotEnoughFields {
        /// Number of fields present. An empty line has none.
        found: usize,
    },

    /// The leading timestamp is not a clock time.
    #[error("failed to parse event timestamp: {source}")]
    Timestamp {
        /// The underlying format error.
        source: TimeFormatError,
    },

    /// The event id is not an unsigned integer.
    #[error("failed to parse event id '{value}': {source}")]
    EventId {
        /// The offending field.
        value: String,
        /// The underlying integer parse error.
        source: ParseIntError,
    },

    /// The event id is a number but not one a log may contain.
    #[error("invalid event id: {id}")]
    UnknownEventId {
        /// The parsed id.
        id: u64,
    },
}

/// Errors yielded while reading an event log.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    /// A line could not be parsed. Reading may continue.
    #[error("line {line}: '{content}': {source}")]
    Malformed {
        /// One-based line number.
        line: usize,
        /// The line as read.
        content: String,
        /// Why it was rejected.
        source: ParseError,
    },

    /// The underlying reader failed. No further lines are yielded.
    #[error("failed to read line {line}: {source}")]
    Io {
        /// One-based number of the line that could not be read.
        line: usize,
        /// The underlying I/O error.
        source: io::Error,
    },
}

impl ReadError {
    /// Whether reading can continue after this error.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Malformed { .. })
    }
}

/// Parse one log line into an event.
///
/// # Errors
///
/// Returns [`ParseError`] if the line has too few fields, a malformed
/// timestamp, or an event id that is not an incoming kind.
pub fn parse_line(line: &str) -> Result<Event, ParseError> {
    let fields: Vec<&str> = line.splitn(MAX_FIELDS, ' ').collect();

    let (stamp, id, competitor, payload) = match fields.as_slice() {
        [stamp, id, competitor] => (*stamp, *id, *competitor, ""),
        [stamp, id, competitor, payload] => (*stamp, *id, *competitor, *payload),
        _ => {
            let found = if line.is_empty() { 0 } else { fields.len() };
            return Err(ParseError::NotEnoughFields { found });
        }
    };

    let time = parse_clock_time(stamp.trim_matches(|c| c == '[' || c == ']'))
        .map_err(|source| ParseError::Timestamp { source })?;
    let kind = parse_event_id(id)?;

    Ok(Event::new(time, kind, competitor, payload))
}

fn parse_event_id(value: &str) -> Result<EventKind, ParseError> {
    let id = value.parse::<u64>().map_err(|source| ParseError::EventId {
        value: value.to_owned(),
        source,
    })?;

    u8::try_from(id)
        .ok()
        .and_then(EventKind::from_incoming_id)
        .ok_or(ParseError::UnknownEventId { id })
}

/// Iterator over the events of a line-oriented log.
#[derive(Debug)]
pub struct EventLines<R> {
    reader: R,
    buf: Vec<u8>,
    line: usize,
    failed: bool,
}

impl<R: BufRead> EventLines<R> {
    /// Wrap a reader.
    pub const fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            line: 0,
            failed: false,
        }
    }
}

impl<R: BufRead> Iterator for EventLines<R> {
    type Item = Result<Event, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        self.buf.clear();
        let read = self.reader.read_until(b'\n', &mut self.buf);
        if matches!(read, Ok(0)) {
            return None;
        }
        self.line = self.line.saturating_add(1);
        let line = self.line;

        Some(match read {
            Ok(_) => {
                let content = String::from_utf8_lossy(strip_line_ending(&self.buf)).into_owned();
                parse_line(&content).map_err(|source| ReadError::Malformed {
                    line,
                    content,
                    source,
                })
            }
            Err(source) => {
                self.failed = true;
                Err(ReadError::Io { line, source })
            }
        })
    }
}

fn strip_line_ending(bytes: &[u8]) -> &[u8] {
    let bytes = bytes.strip_suffix(b"\n").unwrap_or(bytes);
    bytes.strip_suffix(b"\r").unwrap_or(bytes)
}

impl<R: BufRead> core::iter::FusedIterator for EventLines<R> {}

/// Read events from a line-oriented log.
pub fn read_events<R: BufRead>(reader: R) -> EventLines<R> {
    EventLines::new(reader)
}
