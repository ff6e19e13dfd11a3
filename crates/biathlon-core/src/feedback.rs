//! Feedback queue for synthesized events.
//!
//! Referees are wired into the same root sink they emit into. Calling the
//! root sink from inside one of its own children would need the root to be
//! borrowed twice, so referees push synthesized events onto a [`Feedback`]
//! queue instead. The competition drains that queue through the root sink
//! before it accepts the next real event.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use biathlon_types::Event;

/// A shared FIFO of synthesized events, one per race.
///
/// Cloning yields another handle to the same queue.
#[derive(Debug, Clone, Default)]
pub struct Feedback {
    queue: Rc<RefCell<VecDeque<Event>>>,
}

impl Feedback {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a synthesized event for dispatch.
    pub fn emit(&self, event: Event) {
        self.queue.borrow_mut().push_back(event);
    }

    /// Take the oldest queued event, if any.
    pub fn take(&self) -> Option<Event> {
        self.queue.borrow_mut().pop_front()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveTime;

    use biathlon_types::EventKind;

    use super::*;

    #[test]
    fn clones_share_one_queue_in_fifo_order() {
        let time = NaiveTime::from_hms_opt(10, 0, 0).unwrap();
        let feedback = Feedback::new();
        let handle = feedback.clone();

        handle.emit(Event::bare(time, EventKind::Disqualified, "a"));
        handle.emit(Event::bare(time, EventKind::Finished, "b"));

        assert_eq!(feedback.take().unwrap().competitor_id.as_str(), "a");
        assert_eq!(feedback.take().unwrap().competitor_id.as_str(), "b");
        assert!(feedback.take().is_none());
    }
}
