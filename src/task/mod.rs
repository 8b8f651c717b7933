//! Tasks — immutable sentences flowing through the kernel (spec §3, §3 Task).
//!
//! A task pairs a term with punctuation, an optional truth (absent for
//! questions/quests), a budget and a stamp. Once built, a task's term and
//! stamp never change; derivation produces a brand new task rather than
//! mutating one.

use crate::budget::Budget;
use crate::stamp::{Instant, Stamp};
use crate::term::Term;
use crate::truth::Truth;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Punctuation {
    Belief,
    Goal,
    Question,
    Quest,
    Command,
}

impl Punctuation {
    pub fn carries_truth(self) -> bool {
        matches!(self, Punctuation::Belief | Punctuation::Goal)
    }
}

impl fmt::Display for Punctuation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Punctuation::Belief => write!(f, "."),
            Punctuation::Goal => write!(f, "!"),
            Punctuation::Question => write!(f, "?"),
            Punctuation::Quest => write!(f, "@"),
            Punctuation::Command => write!(f, ";"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tense {
    Eternal,
    At(Instant),
}

static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(1);

pub fn fresh_task_id() -> u64 {
    NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed)
}

/// An immutable sentence: term + punctuation + truth + budget + stamp.
#[derive(Debug, Clone)]
pub struct Task {
    id: u64,
    term: Term,
    truth: Option<Truth>,
    punctuation: Punctuation,
    tense: Tense,
    budget: Budget,
    stamp: Stamp,
}

impl Task {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        term: Term,
        truth: Option<Truth>,
        punctuation: Punctuation,
        tense: Tense,
        budget: Budget,
        stamp: Stamp,
    ) -> Self {
        Task { id: fresh_task_id(), term, truth, punctuation, tense, budget, stamp }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn term(&self) -> &Term {
        &self.term
    }

    pub fn truth(&self) -> Option<&Truth> {
        self.truth.as_ref()
    }

    pub fn punctuation(&self) -> Punctuation {
        self.punctuation
    }

    pub fn tense(&self) -> Tense {
        self.tense
    }

    pub fn budget(&self) -> &Budget {
        &self.budget
    }

    pub fn stamp(&self) -> &Stamp {
        &self.stamp
    }

    pub fn with_budget(&self, budget: Budget) -> Task {
        Task { budget, ..self.clone() }
    }

    /// Build the merged task a revision/choice produces: same term and
    /// punctuation, fresh id (it is a new derivation), new truth and
    /// stamp, budget carried over from whichever side called this.
    pub fn with_truth_stamp(&self, truth: Truth, stamp: Stamp) -> Task {
        Task { id: fresh_task_id(), truth: Some(truth), stamp, ..self.clone() }
    }

    pub fn is_input(&self) -> bool {
        self.stamp.len() <= 1
    }

    pub fn is_belief(&self) -> bool {
        matches!(self.punctuation, Punctuation::Belief)
    }

    pub fn is_goal(&self) -> bool {
        matches!(self.punctuation, Punctuation::Goal)
    }

    pub fn is_question(&self) -> bool {
        matches!(self.punctuation, Punctuation::Question)
    }

    pub fn is_quest(&self) -> bool {
        matches!(self.punctuation, Punctuation::Quest)
    }

    pub fn is_command(&self) -> bool {
        matches!(self.punctuation, Punctuation::Command)
    }

    pub fn is_judgment(&self) -> bool {
        self.is_belief() || self.is_goal()
    }

    pub fn is_question_like(&self) -> bool {
        self.is_question() || self.is_quest()
    }

    pub fn is_eternal(&self) -> bool {
        matches!(self.tense, Tense::Eternal)
    }

    pub fn complexity(&self) -> usize {
        self.term.complexity()
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(truth) = self.truth {
            write!(f, "{}{} {}", self.term, self.punctuation, truth)
        } else {
            write!(f, "{}{}", self.term, self.punctuation)
        }
    }
}

impl Hash for Task {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialEq for Task {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Task {}

#[derive(Default)]
pub struct TaskBuilder {
    term: Option<Term>,
    truth: Option<Truth>,
    punctuation: Option<Punctuation>,
    tense: Option<Tense>,
    budget: Option<Budget>,
    stamp: Option<Stamp>,
}

impl TaskBuilder {
    pub fn new() -> Self {
        TaskBuilder::default()
    }

    pub fn term(mut self, term: Term) -> Self {
        self.term = Some(term);
        self
    }

    pub fn truth(mut self, truth: Truth) -> Self {
        self.truth = Some(truth);
        self
    }

    pub fn punctuation(mut self, punctuation: Punctuation) -> Self {
        self.punctuation = Some(punctuation);
        self
    }

    pub fn tense(mut self, tense: Tense) -> Self {
        self.tense = Some(tense);
        self
    }

    pub fn budget(mut self, budget: Budget) -> Self {
        self.budget = Some(budget);
        self
    }

    pub fn stamp(mut self, stamp: Stamp) -> Self {
        self.stamp = Some(stamp);
        self
    }

    pub fn build(self) -> Result<Task, &'static str> {
        let term = self.term.ok_or("term is required")?;
        let punctuation = self.punctuation.ok_or("punctuation is required")?;
        let stamp = self.stamp.ok_or("stamp is required")?;

        if !punctuation.carries_truth() && self.truth.is_some() {
            return Err("questions and quests cannot carry a truth value");
        }
        let truth = if punctuation.carries_truth() { self.truth } else { None };

        Ok(Task::new(
            term,
            truth,
            punctuation,
            self.tense.unwrap_or(Tense::Eternal),
            self.budget.unwrap_or_default(),
            stamp,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::TermStore;

    fn stamp() -> Stamp {
        Stamp::new_input(0, 0, 8)
    }

    #[test]
    fn punctuation_display() {
        assert_eq!(format!("{}", Punctuation::Belief), ".");
        assert_eq!(format!("{}", Punctuation::Question), "?");
    }

    #[test]
    fn builder_rejects_truth_on_questions() {
        let mut store = TermStore::new();
        let cat = store.intern_atomic("cat").unwrap();
        let result = TaskBuilder::new()
            .term(cat)
            .punctuation(Punctuation::Question)
            .truth(Truth::new(0.9, 0.8))
            .stamp(stamp())
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn builder_requires_term_and_stamp() {
        let result = TaskBuilder::new().punctuation(Punctuation::Belief).build();
        assert!(result.is_err());
    }

    #[test]
    fn input_task_has_single_evidence_id() {
        let mut store = TermStore::new();
        let cat = store.intern_atomic("cat").unwrap();
        let task = TaskBuilder::new()
            .term(cat)
            .punctuation(Punctuation::Belief)
            .truth(Truth::new(0.9, 0.8))
            .stamp(stamp())
            .build()
            .unwrap();
        assert!(task.is_input());
        assert!(task.is_belief());
        assert!(task.is_judgment());
    }

    #[test]
    fn display_includes_truth_for_judgments_only() {
        let mut store = TermStore::new();
        let cat = store.intern_atomic("cat").unwrap();
        let belief = TaskBuilder::new()
            .term(cat.clone())
            .punctuation(Punctuation::Belief)
            .truth(Truth::new(0.9, 0.8))
            .stamp(stamp())
            .build()
            .unwrap();
        assert!(format!("{}", belief).starts_with("cat."));

        let question =
            TaskBuilder::new().term(cat).punctuation(Punctuation::Question).stamp(stamp()).build().unwrap();
        assert_eq!(format!("{}", question), "cat?");
    }
}
