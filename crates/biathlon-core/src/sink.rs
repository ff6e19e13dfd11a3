//! Event sinks: the observer capability every downstream component shares.
//!
//! An [`EventSink`] accepts one event at a time and updates its own state.
//! The contract has no error channel: a sink that cannot handle an event
//! absorbs the failure and stays in a safe state, so one misbehaving sink
//! never prevents its siblings from seeing the event.
//!
//! [`CompositeSink`] fans an event out to an ordered list of children. The
//! children are stored as trait objects, so referees, trackers, registries
//! and output logs can all be wired together without knowing each other.

use biathlon_types::Event;

/// A component that observes events.
pub trait EventSink {
    /// Update internal state according to the given event.
    fn notify(&mut self, event: &Event);
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn notify(&mut self, event: &Event) {
        (**self).notify(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    fn notify(&mut self, event: &Event) {
        (**self).notify(event);
    }
}

/// An ordered fan-out of child sinks.
///
/// Notifying the composite notifies every child in registration order.
/// The lifetime lets a composite borrow sinks owned by the caller (for
/// example a reporter that is read back once the stream is exhausted).
#[derive(Default)]
pub struct CompositeSink<'a> {
    /// Children, in registration order.
    sinks: Vec<Box<dyn EventSink + 'a>>,
}

impl<'a> CompositeSink<'a> {
    /// Create an empty composite.
    pub const fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    /// Append one child and return the composite (builder style).
    #[must_use]
    pub fn with_sink(mut self, sink: impl EventSink + 'a) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    /// Append several children, preserving their order. Absent children
    /// are skipped.
    pub fn add_sinks<I>(&mut self, sinks: I) -> &mut Self
    where
        I: IntoIterator<Item = Option<Box<dyn EventSink + 'a>>>,
    {
        self.sinks.extend(sinks.into_iter().flatten());
        self
    }

    /// Number of registered children.
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    /// Whether no children are registered.
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl EventSink for CompositeSink<'_> {
    fn notify(&mut self, event: &Event) {
        for sink in &mut self.sinks {
            sink.notify(event);
        }
    }
}

impl core::fmt::Debug for CompositeSink<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CompositeSink")
            .field("sinks", &self.sinks.len())
            .finish()
    }
}

/// A sink that records every event it sees, in order.
///
/// Handy as a test double and for callers that want the full dispatched
/// stream, synthesized events included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingSink {
    /// Every event observed so far.
    pub events: Vec<Event>,
}

impl RecordingSink {
    /// Create an empty recorder.
    pub const fn new() -> Self {
        Self { events: Vec::new() }
    }
}

impl EventSink for RecordingSink {
    fn notify(&mut self, event: &Event) {
        self.events.push(event.clone());
    }
}
