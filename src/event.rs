//! Publish-subscribe event bus for reasoner lifecycle events (spec §4.13).
//!
//! Delivery is synchronous, in subscription order; a subscriber that
//! panics is caught so it cannot abort the emitting cycle (spec §4.13,
//! §7's fault-isolation policy).

use crate::budget::Budget;
use crate::stamp::Stamp;
use crate::term::Term;
use crate::truth::Truth;
use std::panic::{self, AssertUnwindSafe};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    TaskInput,
    TaskAdded,
    TaskProcessed,
    BeliefAdded,
    GoalAdded,
    QuestionAdded,
    QuestionAnswered,
    ConceptCreated,
    ConceptEvicted,
    CycleStart,
    CycleComplete,
    Derivation,
    ErrorRaised,
}

/// The payload carried by a published event: the affected term (as its
/// canonical string), truth/budget/stamp when applicable, and the cycle
/// counter (spec §6 "Published event payloads").
#[derive(Debug, Clone)]
pub struct Event {
    pub kind: EventKind,
    pub term: String,
    pub truth: Option<Truth>,
    pub budget: Option<Budget>,
    pub evidence: Vec<u64>,
    pub cycle: u64,
    pub message: Option<String>,
}

impl Event {
    pub fn new(kind: EventKind, term: &Term, cycle: u64) -> Self {
        Event { kind, term: term.to_string(), truth: None, budget: None, evidence: Vec::new(), cycle, message: None }
    }

    pub fn with_truth(mut self, truth: Truth) -> Self {
        self.truth = Some(truth);
        self
    }

    pub fn with_budget(mut self, budget: Budget) -> Self {
        self.budget = Some(budget);
        self
    }

    pub fn with_stamp(mut self, stamp: &Stamp) -> Self {
        self.evidence = stamp.evidence().to_vec();
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

type Subscriber = Box<dyn FnMut(&Event) + Send>;

#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<(EventKind, Subscriber)>,
}

impl EventBus {
    pub fn new() -> Self {
        EventBus::default()
    }

    pub fn subscribe(&mut self, kind: EventKind, callback: impl FnMut(&Event) + Send + 'static) {
        self.subscribers.push((kind, Box::new(callback)));
    }

    /// Deliver `event` to every subscriber registered for its kind, in
    /// subscription order. A subscriber panic is caught and logged, never
    /// propagated.
    pub fn publish(&mut self, event: Event) {
        for (kind, callback) in self.subscribers.iter_mut() {
            if *kind != event.kind {
                continue;
            }
            let result = panic::catch_unwind(AssertUnwindSafe(|| callback(&event)));
            if result.is_err() {
                log::warn!("event subscriber for {:?} panicked; event dropped for that observer", event.kind);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::TermStore;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn subscribers_receive_matching_events_in_order() {
        let mut store = TermStore::new();
        let cat = store.intern_atomic("cat").unwrap();
        let mut bus = EventBus::new();
        let log = Arc::new(std::sync::Mutex::new(Vec::new()));
        let log2 = log.clone();
        bus.subscribe(EventKind::TaskInput, move |e| log2.lock().unwrap().push(e.cycle));
        bus.publish(Event::new(EventKind::TaskInput, &cat, 1));
        bus.publish(Event::new(EventKind::CycleStart, &cat, 2));
        bus.publish(Event::new(EventKind::TaskInput, &cat, 3));
        assert_eq!(*log.lock().unwrap(), vec![1, 3]);
    }

    #[test]
    fn panicking_subscriber_does_not_abort_publish() {
        let mut store = TermStore::new();
        let cat = store.intern_atomic("cat").unwrap();
        let mut bus = EventBus::new();
        let count = Arc::new(AtomicUsize::new(0));
        let count2 = count.clone();
        bus.subscribe(EventKind::TaskInput, |_| panic!("boom"));
        bus.subscribe(EventKind::TaskInput, move |_| {
            count2.fetch_add(1, Ordering::SeqCst);
        });
        bus.publish(Event::new(EventKind::TaskInput, &cat, 1));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
