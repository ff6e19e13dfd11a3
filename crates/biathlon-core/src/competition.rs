//! The competition: root dispatch for one race.
//!
//! A [`Competition`] owns the root sink of a race: the caller's observers
//! followed by the referee registry. Each real event is pushed through the
//! root, then every event the referees synthesized while handling it is
//! drained through the root as well, until the feedback queue is empty.
//! Only then does [`Competition::handle_event`] return, so the effects of
//! one real event always precede the effects of the next.

use biathlon_types::Event;
use tracing::trace;

use crate::feedback::Feedback;
use crate::referee;
use crate::rules::CompetitionRules;
use crate::sink::{CompositeSink, EventSink};

/// Counters describing the traffic a competition has dispatched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompetitionStats {
    /// Real events handed to [`Competition::handle_event`].
    pub events_handled: u64,
    /// Events synthesized by referees and dispatched through the root sink.
    pub events_synthesized: u64,
}

/// One race: root sink plus referees.
#[derive(Debug)]
pub struct Competition<'a> {
    root: CompositeSink<'a>,
    feedback: Feedback,
    stats: CompetitionStats,
}

impl<'a> Competition<'a> {
    /// Create a competition that notifies `observer` of every real and
    /// synthesized event.
    pub fn new(rules: &CompetitionRules, observer: impl EventSink + 'a) -> Self {
        let feedback = Feedback::new();
        let root = CompositeSink::new()
            .with_sink(observer)
            .with_sink(referee::referees(rules, &feedback));

        Self {
            root,
            feedback,
            stats: CompetitionStats::default(),
        }
    }

    /// Dispatch one real event and everything it causes.
    pub fn handle_event(&mut self, event: &Event) {
        self.stats.events_handled = self.stats.events_handled.saturating_add(1);
        self.root.notify(event);

        while let Some(synthesized) = self.feedback.take() {
            trace!(event = %synthesized, "dispatching synthesized event");
            self.stats.events_synthesized = self.stats.events_synthesized.saturating_add(1);
            self.root.notify(&synthesized);
        }
    }

    /// Traffic counters so far.
    pub const fn stats(&self) -> CompetitionStats {
        self.stats
    }
}

impl EventSink for Competition<'_> {
    fn notify(&mut self, event: &Event) {
        self.handle_event(event);
    }
}
