//! Human-readable event log.

use std::io::Write;

use biathlon_core::EventSink;
use biathlon_types::Event;
use tracing::warn;

/// Writes one line per observed event, synthesized ones included, in
/// dispatch order.
#[derive(Debug)]
pub struct EventLog<W> {
    out: W,
}

impl<W: Write> EventLog<W> {
    /// Log into `out`.
    pub const fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> EventSink for EventLog<W> {
    fn notify(&mut self, event: &Event) {
        if let Err(err) = writeln!(self.out, "{event}") {
            warn!(%err, event = %event, "failed to write event log line");
        }
    }
}
