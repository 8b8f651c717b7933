//! `Nar` — the top-level reasoner, wiring every component into one handle
//! (spec §3 "the kernel", §6 External Interfaces).
//!
//! Grounded on the teacher's top-level `NAR` struct (`nal::nar`, not wired
//! into `lib.rs`): same role — own the term store, memory, clock and
//! event bus behind one type — generalized to the spec's config-driven
//! construction, compiled rule set, and pull-based cycle loop.

use crate::config::NarConfig;
use crate::cycle::ReasoningCycle;
use crate::error::NarError;
use crate::event::{EventBus, EventKind};
use crate::memory::Memory;
use crate::parser;
use crate::premise::PremiseSource;
use crate::rule::{self, DiscriminationTree, Rule};
use crate::task::Task;
use crate::term::{Term, TermStore};
use crate::time::Clock;
use crate::unify::{unify, Substitution};

/// Snapshot counters surfaced by [`Nar::stats`] (spec §6 "stats").
#[derive(Debug, Clone, Copy, Default)]
pub struct Stats {
    pub cycles: u64,
    pub concepts: usize,
}

/// One answer to a [`Nar::query`] call: the belief term found (with query
/// variables substituted by their bindings) plus its truth value.
#[derive(Debug, Clone)]
pub struct Answer {
    pub term: Term,
    pub truth: crate::truth::Truth,
}

/// The reasoner. Owns the term store, memory, compiled rule set, event
/// bus, clock and cycle state; every public method is the one way to
/// touch the kernel from outside (spec §6).
pub struct Nar {
    store: TermStore,
    memory: Memory,
    bus: EventBus,
    clock: Clock,
    config: NarConfig,
    rules: Vec<Rule>,
    tree: DiscriminationTree,
    premises: PremiseSource,
    cycle: ReasoningCycle,
}

impl Nar {
    pub fn new(config: NarConfig) -> Self {
        let mut store = TermStore::new();
        let rules = rule::default_rules(&mut store);
        let tree = DiscriminationTree::build(&rules, rule::default_discriminators());
        let memory = Memory::new(&config);
        let cycle = ReasoningCycle::new(&config);
        Nar {
            store,
            memory,
            bus: EventBus::new(),
            clock: Clock::new(),
            config,
            rules,
            tree,
            premises: PremiseSource::new(),
            cycle,
        }
    }

    pub fn with_default_config() -> Self {
        Nar::new(NarConfig::default())
    }

    pub fn subscribe(&mut self, kind: EventKind, callback: impl FnMut(&crate::event::Event) + Send + 'static) {
        self.bus.subscribe(kind, callback);
    }

    /// Parse one line of Narsese and ingest it as a task (spec §6
    /// `input(line)`).
    pub fn input(&mut self, narsese: &str) -> Result<(), NarError> {
        let task = parser::parse_task(&mut self.store, narsese, &self.clock, self.config.stamp_max_length)?;
        self.memory.input(task, self.config.truth_k, &mut self.bus, self.cycle.count());
        Ok(())
    }

    /// Ingest an already-built task directly, bypassing the parser.
    pub fn input_task(&mut self, task: Task) {
        self.memory.input(task, self.config.truth_k, &mut self.bus, self.cycle.count());
    }

    /// Run exactly one reasoning cycle (spec §6 `step()`).
    pub fn step(&mut self) -> usize {
        self.cycle.step(
            &mut self.store,
            &mut self.memory,
            &mut self.premises,
            &self.rules,
            &self.tree,
            &self.config,
            &self.clock,
            &mut self.bus,
        )
    }

    /// Run up to `n` cycles (spec §6 `run(n)`), stopping early if the
    /// cycle halts.
    pub fn run(&mut self, n: usize) -> usize {
        let mut total = 0;
        for _ in 0..n {
            if self.cycle.is_halted() {
                break;
            }
            total += self.step();
        }
        total
    }

    pub fn stop(&mut self) {
        self.cycle.halt();
    }

    pub fn reset(&mut self) {
        self.memory.reset();
        self.clock.reset();
    }

    /// Question-answering via unification: parse `narsese` as a query term
    /// (ignoring its punctuation), look up its concept, and unify each
    /// stored belief's term against it — query variables bind to whatever
    /// the matching belief names there (spec §8 scenario 3).
    pub fn query(&mut self, narsese: &str) -> Result<Vec<Answer>, NarError> {
        let task = parser::parse_task(&mut self.store, narsese, &self.clock, self.config.stamp_max_length)?;
        let query_term = task.term().clone();
        let mut answers = Vec::new();

        if let Some(concept) = self.memory.concept_of(&query_term) {
            for belief in concept.beliefs().tasks() {
                if let Some(truth) = belief.truth() {
                    answers.push(Answer { term: belief.term().clone(), truth: *truth });
                }
            }
        }

        for (term, concept) in self.memory.iter_concepts() {
            if term == &query_term {
                continue;
            }
            for belief in concept.beliefs().tasks() {
                if let Ok(sub) = unify(&query_term, belief.term(), &Substitution::new(), self.config.unifier_max_commutative_permutations) {
                    if let Some(truth) = belief.truth() {
                        if let Ok(bound) = crate::unify::substitute(&mut self.store, &query_term, &sub) {
                            answers.push(Answer { term: bound, truth: *truth });
                        }
                    }
                }
            }
        }

        answers.sort_by(|a, b| b.truth.confidence().partial_cmp(&a.truth.confidence()).unwrap());
        if !answers.is_empty() {
            self.bus.publish(crate::event::Event::new(EventKind::QuestionAnswered, &query_term, self.cycle.count()));
        }
        Ok(answers)
    }

    pub fn stats(&self) -> Stats {
        Stats { cycles: self.cycle.count(), concepts: self.memory.len() }
    }

    pub fn store(&self) -> &TermStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut TermStore {
        &mut self.store
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn config(&self) -> &NarConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_and_step_derive_transitively() {
        let mut nar = Nar::with_default_config();
        nar.input("<bird --> animal>. %1.0;0.9%").unwrap();
        nar.input("<robin --> bird>. %1.0;0.9%").unwrap();
        // See the identical comment in cycle::tests::
        // step_derives_and_ingests_from_two_beliefs: premise sampling is
        // probabilistic, so this needs enough cycles to make the term-link
        // pairing near-certain, not just likely.
        nar.run(300);
        let answers = nar.query("<robin --> animal>?").unwrap();
        assert!(!answers.is_empty(), "expected <robin --> animal> to be derivable");
    }

    #[test]
    fn stats_tracks_cycle_count() {
        let mut nar = Nar::with_default_config();
        nar.input("<a --> b>. %1.0;0.9%").unwrap();
        nar.run(3);
        assert_eq!(nar.stats().cycles, 3);
    }
}
