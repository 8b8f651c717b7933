//! Per-punctuation task table, shared by belief/goal/question/quest slots
//! of a `Concept` (spec §3 Concept, §4.6).
//!
//! Collapses the teacher's separate `BeliefTable`/`TaskTable` types into one
//! generic, `Bag`-backed table. Judgments (beliefs/goals) get the
//! concept-level dedup spec §4.6 requires: a same-term insert with a
//! disjoint stamp triggers revision, one with an overlapping stamp
//! triggers choice. Questions/quests (no truth) just insert.

use crate::bag::{Bag, BagItem, DecayableItem, EvictionPolicy};
use crate::task::Task;
use crate::truth::Truth;

impl BagItem for Task {
    type Key = u64;

    fn key(&self) -> u64 {
        self.id()
    }

    fn priority(&self) -> f32 {
        self.budget().priority()
    }
}

impl DecayableItem for Task {
    fn apply_decay(&mut self, rate: f32) {
        *self = self.with_budget(self.budget().decay(rate));
    }
}

/// Outcome of inserting a judgment into a `Table`, reported so the caller
/// (Concept) can publish the right event (spec §4.13 `belief.added`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// No prior entry shared the term; the task was inserted as-is.
    Inserted,
    /// Merged with an existing entry whose stamp was disjoint.
    Revised,
    /// Kept the higher-confidence of two entries with overlapping stamps,
    /// discarded the other.
    Choice,
}

/// A bounded, priority-sampled table of tasks that all share one concept's
/// term. All entries are about the *same* statement, so any two judgments
/// inserted here are always dedup candidates (spec §4.6).
pub struct Table {
    bag: Bag<Task>,
    carries_truth: bool,
}

impl Table {
    pub fn new(capacity: usize, policy: EvictionPolicy, carries_truth: bool) -> Self {
        Table { bag: Bag::new(capacity, policy), carries_truth }
    }

    pub fn len(&self) -> usize {
        self.bag.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bag.is_empty()
    }

    pub fn tasks(&self) -> Vec<&Task> {
        self.bag.iter_by_priority().collect()
    }

    pub fn highest_priority(&self) -> Option<&Task> {
        self.bag.peek()
    }

    pub fn sample(&mut self) -> Option<&Task> {
        self.bag.sample()
    }

    pub fn apply_decay(&mut self, rate: f32) {
        self.bag.apply_decay(rate);
    }

    /// Insert `task`, applying the revision/choice dedup policy for
    /// judgments. Returns the outcome and the task actually stored (the
    /// revised merge, the winning side of a choice, or `task` unchanged).
    pub fn add(&mut self, task: Task, truth_k: f32) -> (InsertOutcome, Task) {
        if !self.carries_truth {
            self.bag.add(task.clone());
            return (InsertOutcome::Inserted, task);
        }

        let rival_key = self
            .bag
            .iter_by_priority()
            .find(|existing| existing.term() == task.term())
            .map(|existing| existing.key());

        let Some(rival_key) = rival_key else {
            self.bag.add(task.clone());
            return (InsertOutcome::Inserted, task);
        };
        let rival = self.bag.remove(&rival_key).expect("key just found");

        if rival.stamp().is_disjoint(task.stamp()) {
            let (Some(rt), Some(tt)) = (rival.truth(), task.truth()) else {
                self.bag.add(task.clone());
                return (InsertOutcome::Inserted, task);
            };
            if let (Some(truth), Ok(stamp)) =
                (Truth::revision(rt, tt, truth_k), rival.stamp().merge(task.stamp()))
            {
                let budget = rival.budget().merge(task.budget());
                let merged = task.with_budget(budget).with_truth_stamp(truth, stamp);
                self.bag.add(merged.clone());
                return (InsertOutcome::Revised, merged);
            }
            // Revision declined to produce a conclusion (zero evidence);
            // fall back to choice between the two as-is.
        }

        let winner = match (rival.truth(), task.truth()) {
            (Some(rt), Some(tt)) if rt.confidence() >= tt.confidence() => rival,
            _ => task,
        };
        self.bag.add(winner.clone());
        (InsertOutcome::Choice, winner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stamp::Stamp;
    use crate::task::{Punctuation, TaskBuilder, Tense};
    use crate::term::TermStore;

    fn belief(store: &mut TermStore, name: &str, f: f32, c: f32, stamp: Stamp) -> Task {
        let term = store.intern_atomic(name).unwrap();
        TaskBuilder::new()
            .term(term)
            .punctuation(Punctuation::Belief)
            .tense(Tense::Eternal)
            .truth(Truth::new(f, c))
            .stamp(stamp)
            .build()
            .unwrap()
    }

    #[test]
    fn disjoint_same_term_beliefs_revise() {
        let mut store = TermStore::new();
        let mut table = Table::new(8, EvictionPolicy::Priority, true);
        let a = belief(&mut store, "sky", 0.9, 0.7, Stamp::new_input(0, 0, 8));
        let b = belief(&mut store, "sky", 1.0, 0.6, Stamp::new_input(0, 0, 8));
        table.add(a, 1.0);
        let (outcome, merged) = table.add(b, 1.0);
        assert_eq!(outcome, InsertOutcome::Revised);
        assert_eq!(table.len(), 1);
        assert!(merged.truth().unwrap().confidence() > 0.7);
    }

    #[test]
    fn overlapping_same_term_beliefs_choose_higher_confidence() {
        let mut store = TermStore::new();
        let mut table = Table::new(8, EvictionPolicy::Priority, true);
        let shared = Stamp::new_input(0, 0, 8);
        let a = belief(&mut store, "sky", 0.9, 0.7, shared.clone());
        let b = belief(&mut store, "sky", 0.2, 0.9, shared);
        table.add(a, 1.0);
        let (outcome, winner) = table.add(b, 1.0);
        assert_eq!(outcome, InsertOutcome::Choice);
        assert_eq!(table.len(), 1);
        assert!((winner.truth().unwrap().confidence() - 0.9).abs() < 1e-6);
    }

    #[test]
    fn distinct_terms_do_not_interact() {
        let mut store = TermStore::new();
        let mut table = Table::new(8, EvictionPolicy::Priority, true);
        let a = belief(&mut store, "sky", 0.9, 0.7, Stamp::new_input(0, 0, 8));
        let b = belief(&mut store, "grass", 0.8, 0.7, Stamp::new_input(0, 0, 8));
        table.add(a, 1.0);
        let (outcome, _) = table.add(b, 1.0);
        assert_eq!(outcome, InsertOutcome::Inserted);
        assert_eq!(table.len(), 2);
    }
}
