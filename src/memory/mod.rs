//! Memory: the concept index plus the bounded "focus" working set
//! (spec §3 Memory, §4.7).
//!
//! Replaces the teacher's radix-tree-backed `Memory`/`lru`-backed
//! `SimpleMemory` pair with one `hashbrown`-keyed map from interned term to
//! `Concept`, overlaid with a `Bag` of terms that tracks which concepts the
//! reasoner is currently attending to (spec's "focus set").

use crate::bag::{Bag, BagItem, DecayableItem, EvictionPolicy};
use crate::concept::Concept;
use crate::config::NarConfig;
use crate::event::{Event, EventBus, EventKind};
use crate::table::InsertOutcome;
use crate::task::{Punctuation, Task};
use crate::term::Term;
use hashbrown::HashMap;

#[derive(Clone)]
struct FocusEntry {
    term: Term,
    priority: f32,
}

impl BagItem for FocusEntry {
    type Key = Term;

    fn key(&self) -> Term {
        self.term.clone()
    }

    fn priority(&self) -> f32 {
        self.priority
    }
}

impl DecayableItem for FocusEntry {
    fn apply_decay(&mut self, rate: f32) {
        self.priority *= 1.0 - rate;
    }
}

pub struct Memory {
    concepts: HashMap<Term, Concept>,
    focus: Bag<FocusEntry>,
    capacity: usize,
    belief_capacity: usize,
    task_capacity: usize,
    link_capacity: usize,
    policy: EvictionPolicy,
}

impl Memory {
    pub fn new(config: &NarConfig) -> Self {
        Memory {
            concepts: HashMap::new(),
            focus: Bag::new(config.concept_bag_capacity, config.forget_policy),
            capacity: config.memory_capacity,
            belief_capacity: config.task_bag_capacity,
            task_capacity: config.task_bag_capacity,
            link_capacity: config.concept_bag_capacity,
            policy: config.forget_policy,
        }
    }

    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }

    pub fn concept_of(&self, term: &Term) -> Option<&Concept> {
        self.concepts.get(term)
    }

    pub fn concept_of_mut(&mut self, term: &Term) -> Option<&mut Concept> {
        self.concepts.get_mut(term)
    }

    pub fn contains(&self, term: &Term) -> bool {
        self.concepts.contains_key(term)
    }

    pub fn iter_concepts(&self) -> impl Iterator<Item = (&Term, &Concept)> {
        self.concepts.iter()
    }

    /// Locate or create the concept for `term`, without touching focus.
    fn concept_or_create(&mut self, term: &Term, bus: &mut EventBus, cycle: u64) -> &mut Concept {
        if !self.concepts.contains_key(term) {
            self.evict_if_full(bus, cycle);
            let concept =
                Concept::new(term.clone(), self.belief_capacity, self.task_capacity, self.link_capacity, self.policy);
            self.concepts.insert(term.clone(), concept);
            bus.publish(Event::new(EventKind::ConceptCreated, term, cycle));
            self.link_subterms(term);
        }
        self.concepts.get_mut(term).expect("just inserted or already present")
    }

    /// Wire term links between `term`'s concept and a concept for each of
    /// its direct subterms, creating the subterm concepts if needed (spec
    /// §3 Concept, "term links... other concepts reachable via subterm or
    /// enclosing-compound relations").
    fn link_subterms(&mut self, term: &Term) {
        for sub in term.subterms().to_vec() {
            if !self.concepts.contains_key(&sub) {
                let concept =
                    Concept::new(sub.clone(), self.belief_capacity, self.task_capacity, self.link_capacity, self.policy);
                self.concepts.insert(sub.clone(), concept);
            }
            if let Some(c) = self.concepts.get_mut(term) {
                c.add_term_link(sub.clone(), 0.5);
            }
            if let Some(c) = self.concepts.get_mut(&sub) {
                c.add_term_link(term.clone(), 0.5);
            }
        }
    }

    /// Ensure `term`'s concept is in the bounded focus overlay (spec §4.7
    /// "ensure concept is in focus").
    fn bring_into_focus(&mut self, term: &Term, priority: f32) {
        if self.focus.contains(term) {
            return;
        }
        self.focus.add(FocusEntry { term: term.clone(), priority });
    }

    /// Ingest one task: locate-or-create its concept, forward to
    /// `accept_task`, bring the concept into focus, publish the matching
    /// lifecycle events (spec §4.7 `input`).
    pub fn input(&mut self, task: Task, truth_k: f32, bus: &mut EventBus, cycle: u64) {
        let term = task.term().clone();
        bus.publish(Event::new(EventKind::TaskInput, &term, cycle).with_budget(*task.budget()));
        let punctuation = task.punctuation();
        let priority = task.budget().priority();
        let concept = self.concept_or_create(&term, bus, cycle);
        let outcome = concept.accept_task(task.clone(), truth_k);
        self.bring_into_focus(&term, priority);

        if let Some((outcome, stored)) = outcome {
            let kind = match punctuation {
                Punctuation::Belief => EventKind::BeliefAdded,
                Punctuation::Goal => EventKind::GoalAdded,
                Punctuation::Question | Punctuation::Quest => EventKind::QuestionAdded,
                Punctuation::Command => return,
            };
            let mut event = Event::new(kind, &term, cycle).with_budget(*stored.budget());
            if let Some(truth) = stored.truth() {
                event = event.with_truth(*truth);
            }
            event = event.with_stamp(stored.stamp());
            bus.publish(event);
            debug_assert!(matches!(
                outcome,
                InsertOutcome::Inserted | InsertOutcome::Revised | InsertOutcome::Choice
            ));
        }
    }

    /// Priority-weighted pick of a concept's term from the focus set (spec
    /// §4.7 `sample_concept`).
    pub fn sample_concept_term(&mut self) -> Option<Term> {
        self.focus.sample().map(|entry| entry.term.clone())
    }

    /// Evict the globally lowest-priority concept when over capacity (spec
    /// §4.7 `evict_if_full`, AIKR: tasks inside are silently discarded).
    pub fn evict_if_full(&mut self, bus: &mut EventBus, cycle: u64) {
        if self.concepts.len() < self.capacity {
            return;
        }
        let victim = self
            .concepts
            .iter()
            .min_by(|(_, a), (_, b)| a.activation().partial_cmp(&b.activation()).unwrap())
            .map(|(t, _)| t.clone());
        if let Some(term) = victim {
            self.concepts.remove(&term);
            self.focus.remove(&term);
            bus.publish(Event::new(EventKind::ConceptEvicted, &term, cycle));
        }
    }

    /// Global forgetting: decay every concept, plus the focus bag itself
    /// (spec §4.12 "decaying" state, §4.5 `apply_decay`).
    pub fn decay_all(&mut self, rate: f32) {
        for concept in self.concepts.values_mut() {
            concept.decay(rate);
        }
        self.focus.apply_decay(rate);
    }

    pub fn reset(&mut self) {
        self.concepts.clear();
        self.focus = Bag::new(self.focus.capacity(), self.policy);
    }
}
