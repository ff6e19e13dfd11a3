//! Per-competitor arena of lazily created sinks.
//!
//! A [`CompetitorRegistry`] owns one sink per competitor. The entry is built
//! by the registry's factory the first time a registration event for that
//! competitor is observed, and lives as long as the race. Events for
//! competitors that have not registered are dropped.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use biathlon_types::{CompetitorId, Event, EventKind};
use tracing::{debug, trace};

use crate::sink::EventSink;

/// Builds the per-competitor sink on registration.
type Factory<T> = Box<dyn FnMut(&CompetitorId) -> T>;

/// Mapping from competitor id to that competitor's sink.
pub struct CompetitorRegistry<T> {
    entries: BTreeMap<CompetitorId, T>,
    factory: Factory<T>,
}

impl<T> CompetitorRegistry<T> {
    /// Create an empty registry that builds entries with `factory`.
    pub fn new(factory: impl FnMut(&CompetitorId) -> T + 'static) -> Self {
        Self {
            entries: BTreeMap::new(),
            factory: Box::new(factory),
        }
    }

    /// Look up the entry of a registered competitor.
    pub fn get(&self, id: &CompetitorId) -> Option<&T> {
        self.entries.get(id)
    }

    /// Iterate over registered competitors in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&CompetitorId, &T)> {
        self.entries.iter()
    }

    /// Number of registered competitors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no competitor has registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: EventSink> EventSink for CompetitorRegistry<T> {
    fn notify(&mut self, event: &Event) {
        if event.kind == EventKind::Registered {
            if let Entry::Vacant(slot) = self.entries.entry(event.competitor_id.clone()) {
                debug!(competitor = %event.competitor_id, "competitor registered");
                slot.insert((self.factory)(&event.competitor_id));
            }
        }

        match self.entries.get_mut(&event.competitor_id) {
            Some(entry) => entry.notify(event),
            None => trace!(
                competitor = %event.competitor_id,
                kind = %event.kind,
                "dropping event for unregistered competitor"
            ),
        }
    }
}

impl<T> core::fmt::Debug for CompetitorRegistry<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CompetitorRegistry")
            .field("competitors", &self.entries.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use chrono::NaiveTime;

    use super::*;
    use crate::sink::RecordingSink;

    fn at(kind: EventKind, id: &str) -> Event {
        Event::bare(NaiveTime::from_hms_opt(9, 0, 0).unwrap(), kind, id)
    }

    #[test]
    fn entry_is_created_on_registration() {
        let mut registry = CompetitorRegistry::new(|_id: &CompetitorId| RecordingSink::new());
        registry.notify(&at(EventKind::Registered, "1"));
        registry.notify(&at(EventKind::Started, "1"));

        let entry = registry.get(&CompetitorId::from("1")).unwrap();
        let kinds: Vec<EventKind> = entry.events.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![EventKind::Registered, EventKind::Started]);
    }

    #[test]
    fn events_for_unregistered_competitors_are_dropped() {
        let mut registry = CompetitorRegistry::new(|_id: &CompetitorId| RecordingSink::new());
        registry.notify(&at(EventKind::Started, "ghost"));
        assert!(registry.is_empty());
        assert!(registry.get(&CompetitorId::from("ghost")).is_none());
    }

    #[test]
    fn repeated_registration_keeps_existing_state() {
        let built = Rc::new(Cell::new(0_u32));
        let counter = Rc::clone(&built);
        let mut registry = CompetitorRegistry::new(move |_id: &CompetitorId| {
            counter.set(counter.get().saturating_add(1));
            RecordingSink::new()
        });
        registry.notify(&at(EventKind::Registered, "1"));
        registry.notify(&at(EventKind::Started, "1"));
        registry.notify(&at(EventKind::Registered, "1"));

        assert_eq!(registry.len(), 1);
        assert_eq!(built.get(), 1);
        let sink = registry.get(&CompetitorId::from("1")).unwrap();
        assert_eq!(sink.events.len(), 3);
    }

    #[test]
    fn competitors_are_iterated_in_id_order() {
        let mut registry = CompetitorRegistry::new(|_id: &CompetitorId| RecordingSink::new());
        for id in ["b", "c", "a"] {
            registry.notify(&at(EventKind::Registered, id));
        }
        let ids: Vec<&str> = registry.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }
}
