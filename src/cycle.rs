//! The reasoning cycle: samples a premise pair, derives, ingests the
//! results, and periodically decays memory (spec §3 ReasoningCycle,
//! §4.12).
//!
//! Grounded on the teacher's unused `control::deriver_exec` sketch, which
//! wired a deriver and a budget controller together in a loop but never
//! modeled decay or a depth guard; both are added here per spec §4.12.

use crate::config::NarConfig;
use crate::event::{Event, EventBus, EventKind};
use crate::memory::Memory;
use crate::premise::PremiseSource;
use crate::rule::{DerivationContext, DiscriminationTree, Rule};
use crate::term::TermStore;
use crate::time::Clock;

/// Where the cycle currently sits in its own state machine (spec §4.12
/// "state: idle | sampling | matching | deriving | ingesting | decaying |
/// halted").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    Idle,
    Sampling,
    Matching,
    Deriving,
    Ingesting,
    Decaying,
    Halted,
}

/// Orchestrates one reasoning step at a time: pull a premise pair, run it
/// through the rule engine, feed derived tasks back into memory, and
/// periodically decay. Owns nothing the caller doesn't hand it except its
/// own counters and state.
pub struct ReasoningCycle {
    state: CycleState,
    count: u64,
    decay_every_n_cycles: u32,
    decay_rate: f32,
}

impl ReasoningCycle {
    pub fn new(config: &NarConfig) -> Self {
        ReasoningCycle {
            state: CycleState::Idle,
            count: 0,
            decay_every_n_cycles: config.cpu_throttle_interval.max(1),
            decay_rate: 0.05,
        }
    }

    pub fn state(&self) -> CycleState {
        self.state
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn halt(&mut self) {
        self.state = CycleState::Halted;
    }

    pub fn is_halted(&self) -> bool {
        self.state == CycleState::Halted
    }

    /// Run exactly one cycle: sample, match, derive, ingest, maybe decay.
    /// Returns the number of tasks ingested back into memory. A `None`
    /// result from the premise source (nothing to sample) is not an error
    /// — it is a suspension point (spec §5): the cycle idles and returns 0.
    #[allow(clippy::too_many_arguments)]
    pub fn step(
        &mut self,
        store: &mut TermStore,
        memory: &mut Memory,
        premises: &mut PremiseSource,
        rules: &[Rule],
        tree: &DiscriminationTree,
        config: &NarConfig,
        clock: &Clock,
        bus: &mut EventBus,
    ) -> usize {
        if self.is_halted() {
            return 0;
        }

        self.count += 1;
        bus.publish(Event::new(EventKind::CycleStart, &placeholder_term(store), self.count));

        self.state = CycleState::Sampling;
        let Some((primary, secondary, _strategy)) = premises.next(memory) else {
            self.state = CycleState::Idle;
            self.maybe_decay(memory, bus);
            return 0;
        };

        self.state = CycleState::Matching;

        // Derivation-depth guard (spec §4.12 step 3): a primary whose
        // stamp already carries maxDerivationDepth-or-more evidence ids
        // sits too deep in its chain to derive further.
        if primary.stamp().len() >= config.max_derivation_depth as usize {
            self.state = CycleState::Idle;
            self.maybe_decay(memory, bus);
            return 0;
        }

        self.state = CycleState::Deriving;
        let mut ctx = DerivationContext {
            store,
            truth_k: config.truth_k,
            stamp_max_length: config.stamp_max_length,
            time: clock.now(),
            max_commutative_permutations: config.unifier_max_commutative_permutations,
        };
        let derived = crate::rule::execute(rules, tree, &primary, &secondary, &mut ctx, bus, self.count);

        self.state = CycleState::Ingesting;
        let cap = config.max_tasks_per_cycle.min(derived.len().max(1));
        let mut ingested = 0;
        for task in derived.into_iter().take(cap) {
            memory.input(task, config.truth_k, bus, self.count);
            ingested += 1;
        }

        bus.publish(Event::new(EventKind::TaskProcessed, primary.term(), self.count).with_budget(*primary.budget()));
        bus.publish(Event::new(EventKind::CycleComplete, primary.term(), self.count));
        self.state = CycleState::Idle;
        self.maybe_decay(memory, bus);
        ingested
    }

    fn maybe_decay(&mut self, memory: &mut Memory, _bus: &mut EventBus) {
        if self.decay_every_n_cycles == 0 || self.count % self.decay_every_n_cycles as u64 != 0 {
            return;
        }
        self.state = CycleState::Decaying;
        memory.decay_all(self.decay_rate);
        self.state = CycleState::Idle;
    }
}

/// `cycle.start`/`cycle.complete` need *a* term to attach to even though
/// they are not about any one term; reuse whatever atom the store already
/// interned for that purpose, falling back to a dedicated sentinel.
fn placeholder_term(store: &mut TermStore) -> crate::term::Term {
    store.intern_atomic("__cycle__").expect("sentinel atom name is always valid")
}
