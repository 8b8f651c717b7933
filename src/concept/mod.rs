//! Concepts — the per-term memory node (spec §3 Concept, §4.6).
//!
//! A concept owns four `Table`s (belief/goal/question/quest), a bag of
//! term links to neighboring concepts, and a rolling activation score.
//! Unlike the teacher's `Concept`/`TaskConcept` split, there is exactly one
//! concept type; the teacher's duplicated belief/goal/question/quest
//! storage collapses into four uses of `table::Table`.

use crate::bag::{Bag, BagItem, DecayableItem, EvictionPolicy};
use crate::task::{Punctuation, Task};
use crate::table::{InsertOutcome, Table};
use crate::term::Term;

/// A link from this concept to a neighboring one, reachable via a
/// subterm/enclosing-compound relation (spec §3 Concept, "term link").
#[derive(Debug, Clone)]
pub struct TermLink {
    pub term: Term,
    priority: f32,
}

impl BagItem for TermLink {
    type Key = Term;

    fn key(&self) -> Term {
        self.term.clone()
    }

    fn priority(&self) -> f32 {
        self.priority
    }
}

impl DecayableItem for TermLink {
    fn apply_decay(&mut self, rate: f32) {
        self.priority *= 1.0 - rate;
    }
}

pub struct Concept {
    term: Term,
    beliefs: Table,
    goals: Table,
    questions: Table,
    quests: Table,
    term_links: Bag<TermLink>,
    /// Bounded exponential moving average of recent attention (spec §3).
    activation: f32,
}

impl Concept {
    pub fn new(term: Term, belief_capacity: usize, task_capacity: usize, link_capacity: usize, policy: EvictionPolicy) -> Self {
        Concept {
            term,
            beliefs: Table::new(belief_capacity, policy, true),
            goals: Table::new(belief_capacity, policy, true),
            questions: Table::new(task_capacity, policy, false),
            quests: Table::new(task_capacity, policy, false),
            term_links: Bag::new(link_capacity, policy),
            activation: 0.0,
        }
    }

    pub fn term(&self) -> &Term {
        &self.term
    }

    pub fn beliefs(&self) -> &Table {
        &self.beliefs
    }

    pub fn goals(&self) -> &Table {
        &self.goals
    }

    pub fn questions(&self) -> &Table {
        &self.questions
    }

    pub fn quests(&self) -> &Table {
        &self.quests
    }

    pub fn activation(&self) -> f32 {
        self.activation
    }

    /// Bounded EMA bump on every cycle this concept is touched (spec §3
    /// "activation (rolling attention score)").
    pub fn touch(&mut self, weight: f32) {
        const ALPHA: f32 = 0.3;
        self.activation = (self.activation * (1.0 - ALPHA) + weight * ALPHA).clamp(0.0, 1.0);
    }

    pub fn decay_activation(&mut self, rate: f32) {
        self.activation = (self.activation * (1.0 - rate)).max(0.0);
    }

    /// Route `task` to the table matching its punctuation, applying the
    /// belief/goal revision-or-choice dedup policy (spec §4.6). Returns the
    /// outcome plus the task actually stored, for the caller to publish
    /// events off of; `None` for commands (not modeled as concept state).
    pub fn accept_task(&mut self, task: Task, truth_k: f32) -> Option<(InsertOutcome, Task)> {
        self.touch(task.budget().priority());
        match task.punctuation() {
            Punctuation::Belief => Some(self.beliefs.add(task, truth_k)),
            Punctuation::Goal => Some(self.goals.add(task, truth_k)),
            Punctuation::Question => Some(self.questions.add(task, truth_k)),
            Punctuation::Quest => Some(self.quests.add(task, truth_k)),
            Punctuation::Command => None,
        }
    }

    pub fn sample_belief(&mut self) -> Option<&Task> {
        self.beliefs.sample()
    }

    pub fn sample_goal(&mut self) -> Option<&Task> {
        self.goals.sample()
    }

    pub fn best_belief(&self) -> Option<&Task> {
        self.beliefs.highest_priority()
    }

    pub fn best_goal(&self) -> Option<&Task> {
        self.goals.highest_priority()
    }

    pub fn add_term_link(&mut self, term: Term, priority: f32) -> bool {
        if term == self.term {
            return false;
        }
        self.term_links.add(TermLink { term, priority })
    }

    pub fn term_links(&self) -> &Bag<TermLink> {
        &self.term_links
    }

    pub fn sample_term_link(&mut self) -> Option<&TermLink> {
        self.term_links.sample()
    }

    /// Called once per cycle the concept is *not* selected as primary —
    /// decays every table and the term-link bag plus activation itself
    /// (spec §3 "budgets decay multiplicatively on each cycle the owner is
    /// not selected").
    pub fn decay(&mut self, rate: f32) {
        self.beliefs.apply_decay(rate);
        self.goals.apply_decay(rate);
        self.questions.apply_decay(rate);
        self.quests.apply_decay(rate);
        self.term_links.apply_decay(rate);
        self.decay_activation(rate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stamp::Stamp;
    use crate::budget::Budget;
    use crate::task::{TaskBuilder, Tense};
    use crate::term::TermStore;
    use crate::truth::Truth;

    fn belief(store: &mut TermStore, name: &str) -> Task {
        let term = store.intern_atomic(name).unwrap();
        TaskBuilder::new()
            .term(term)
            .punctuation(Punctuation::Belief)
            .tense(Tense::Eternal)
            .truth(Truth::new(0.9, 0.8))
            .budget(Budget::new(0.6, 0.6, 0.6))
            .stamp(Stamp::new_input(0, 0, 8))
            .build()
            .unwrap()
    }

    #[test]
    fn accept_task_routes_by_punctuation() {
        let mut store = TermStore::new();
        let cat = store.intern_atomic("cat").unwrap();
        let mut concept = Concept::new(cat, 8, 8, 8, EvictionPolicy::Priority);
        let b = belief(&mut store, "cat");
        concept.accept_task(b, 1.0);
        assert_eq!(concept.beliefs().len(), 1);
        assert_eq!(concept.goals().len(), 0);
    }

    #[test]
    fn touching_concept_raises_activation() {
        let mut store = TermStore::new();
        let cat = store.intern_atomic("cat").unwrap();
        let mut concept = Concept::new(cat, 8, 8, 8, EvictionPolicy::Priority);
        let before = concept.activation();
        concept.touch(0.9);
        assert!(concept.activation() > before);
    }

    #[test]
    fn term_links_reject_self_link() {
        let mut store = TermStore::new();
        let cat = store.intern_atomic("cat").unwrap();
        let mut concept = Concept::new(cat.clone(), 8, 8, 8, EvictionPolicy::Priority);
        assert!(!concept.add_term_link(cat, 0.5));
    }

    #[test]
    fn decay_reduces_activation() {
        let mut store = TermStore::new();
        let cat = store.intern_atomic("cat").unwrap();
        let mut concept = Concept::new(cat, 8, 8, 8, EvictionPolicy::Priority);
        concept.touch(1.0);
        let before = concept.activation();
        concept.decay(0.5);
        assert!(concept.activation() < before);
    }
}
